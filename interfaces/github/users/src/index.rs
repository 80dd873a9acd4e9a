use interfaces_github_client::{FetchError, GitHubClient};
use thiserror::Error;
use tracing::{debug, warn};

use crate::company::clean_company_name;
use crate::models::{Enrichment, Organization, Profile};

#[derive(Debug, Error)]
pub enum FetchProfileError {
    #[error("Fetch: {source}")]
    Fetch {
        #[from]
        source: FetchError,
    },
}

/// Public profile of `username`. Any non-200 answer, or a body that does
/// not decode, degrades to an empty profile.
pub async fn fetch_profile(
    client: &GitHubClient,
    username: &str,
) -> Result<Profile, FetchProfileError> {
    let response = client.get(&format!("users/{username}"), &[]).await?;

    if !response.is_ok() {
        warn!(username, status = response.status.as_u16(), "profile unavailable");
        return Ok(Profile::default());
    }

    Ok(response.json::<Profile>().unwrap_or_else(|error| {
        warn!(username, %error, "unreadable profile");
        Profile::default()
    }))
}

#[derive(Debug, Error)]
pub enum FetchOrgsError {
    #[error("Fetch: {source}")]
    Fetch {
        #[from]
        source: FetchError,
    },
}

/// Logins of the public organizations `username` belongs to.
pub async fn fetch_orgs(
    client: &GitHubClient,
    username: &str,
) -> Result<Vec<String>, FetchOrgsError> {
    let response = client.get(&format!("users/{username}/orgs"), &[]).await?;

    if !response.is_ok() {
        debug!(username, status = response.status.as_u16(), "orgs unavailable");
        return Ok(Vec::new());
    }

    let orgs = response
        .json::<Vec<Organization>>()
        .map(|orgs| orgs.into_iter().map(|org| org.login).collect())
        .unwrap_or_else(|error| {
            warn!(username, %error, "unreadable orgs");
            Vec::new()
        });

    Ok(orgs)
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("FetchProfile: {source}")]
    FetchProfile {
        #[from]
        source: FetchProfileError,
    },

    #[error("FetchOrgs: {source}")]
    FetchOrgs {
        #[from]
        source: FetchOrgsError,
    },
}

/// Profile, then orgs, one request after the other.
pub async fn enrich(client: &GitHubClient, username: &str) -> Result<Enrichment, EnrichError> {
    let profile = fetch_profile(client, username).await?;
    let orgs = fetch_orgs(client, username).await?;
    let company_clean = clean_company_name(profile.company.as_deref());

    Ok(Enrichment {
        profile,
        orgs,
        company_clean,
    })
}
