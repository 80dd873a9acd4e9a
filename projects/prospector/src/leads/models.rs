use chrono::{DateTime, Utc};
use interfaces_github_stargazers::StarEvent;
use interfaces_github_users::{Enrichment, Profile};
use serde::Serialize;

/// One prospect, keyed by GitHub username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub username: String,
    pub profile_url: String,
    pub first_starred_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub profile: Profile,
    pub company_clean: String,
    pub orgs: Vec<String>,
    pub org_count: usize,
    /// Distinct, in the order first seen.
    pub repos_starred: Vec<String>,
    pub score: i64,
}

impl Lead {
    /// Unscored lead from the first star seen for a username.
    pub fn from_first_star(event: StarEvent, enrichment: Enrichment) -> Self {
        let Enrichment {
            profile,
            orgs,
            company_clean,
        } = enrichment;

        Self {
            username: event.username,
            profile_url: event.profile_url,
            first_starred_at: event.starred_at,
            profile,
            company_clean,
            org_count: orgs.len(),
            orgs,
            repos_starred: vec![event.source_repository],
            score: 0,
        }
    }

    pub fn add_repository(&mut self, repository: String) {
        if !self.repos_starred.contains(&repository) {
            self.repos_starred.push(repository);
        }
    }
}
