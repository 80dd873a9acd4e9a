use serde::{Deserialize, Serialize};

/// Subset of `GET /users/{username}` kept on a lead. Every field may be
/// missing; a failed lookup is the all-`None` default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    pub public_repos: Option<u32>,
    pub followers: Option<u32>,
}

impl Profile {
    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|email| !email.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Organization {
    pub login: String,
}

/// Everything looked up for one username.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub profile: Profile,
    pub orgs: Vec<String>,
    pub company_clean: String,
}
