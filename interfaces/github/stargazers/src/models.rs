use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct StargazerUser {
    pub login: String,
    pub html_url: String,
}

/// One element of a stargazers page.
///
/// With the `star+json` media type GitHub wraps the user next to a
/// `starred_at` timestamp; without it the user object comes bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StargazerEntry {
    Starred {
        starred_at: DateTime<Utc>,
        user: StargazerUser,
    },
    Plain(StargazerUser),
}

impl StargazerEntry {
    pub fn into_star_event(self, repository: &str) -> StarEvent {
        let (user, starred_at) = match self {
            StargazerEntry::Starred { starred_at, user } => (user, Some(starred_at)),
            StargazerEntry::Plain(user) => (user, None),
        };

        StarEvent {
            username: user.login,
            source_repository: repository.to_string(),
            profile_url: user.html_url,
            starred_at,
        }
    }
}

/// A user starring a watched repository, one per (user, repository) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StarEvent {
    pub username: String,
    pub source_repository: String,
    pub profile_url: String,
    pub starred_at: Option<DateTime<Utc>>,
}
