use std::ops::RangeInclusive;

use interfaces_github_client::{FetchError, GitHubClient};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{StarEvent, StargazerEntry};

pub const PER_PAGE: u32 = 100;

/// Hard ceiling on pages fetched per repository.
pub const MAX_PAGES: u32 = 5;

pub const MAX_ENTRIES: usize = (PER_PAGE * MAX_PAGES) as usize;

#[derive(Debug, Error)]
pub enum FetchRecentStargazersError {
    #[error("Fetch: {source}")]
    Fetch {
        #[from]
        source: FetchError,
    },
}

/// Pages (at `PER_PAGE` per page) holding the `max` most recent of `total`
/// stargazers. `None` when there is nothing to fetch.
///
/// The last page is usually partial, so it counts for what it holds.
pub fn plan_pages(total: u32, max: usize) -> Option<RangeInclusive<u32>> {
    if total == 0 || max == 0 {
        return None;
    }

    let last = total.div_ceil(PER_PAGE);
    let on_last_page = total - (last - 1) * PER_PAGE;
    let wanted = max.min(MAX_ENTRIES) as u32;

    let needed = 1 + wanted.saturating_sub(on_last_page).div_ceil(PER_PAGE);
    let needed = needed.min(MAX_PAGES).min(last);

    Some(last - needed + 1..=last)
}

/// Up to `max` most recent stargazers of `repository` (`owner/name`),
/// oldest of the window first.
///
/// Best effort: a failing discovery yields nothing and a failing page is
/// skipped. Transport errors propagate.
pub async fn fetch_recent_stargazers(
    client: &GitHubClient,
    repository: &str,
    max: usize,
) -> Result<Vec<StarEvent>, FetchRecentStargazersError> {
    let path = format!("repos/{repository}/stargazers");

    let Some(total) = discover_total(client, &path, repository).await? else {
        return Ok(Vec::new());
    };

    let Some(pages) = plan_pages(total, max) else {
        info!(repository, "no stargazers");
        return Ok(Vec::new());
    };

    debug!(repository, total, first = pages.start(), last = pages.end(), "fetching stargazer pages");

    let mut events = Vec::new();
    for page in pages {
        let response = client
            .get(
                &path,
                &[("per_page", PER_PAGE.to_string()), ("page", page.to_string())],
            )
            .await?;

        if !response.is_ok() {
            warn!(repository, page, status = response.status.as_u16(), "skipping stargazer page");
            continue;
        }

        let entries = match response.json::<Vec<serde_json::Value>>() {
            Ok(entries) => entries,
            Err(error) => {
                warn!(repository, page, %error, "unreadable stargazer page");
                continue;
            }
        };

        for entry in entries {
            match serde_json::from_value::<StargazerEntry>(entry) {
                Ok(entry) => events.push(entry.into_star_event(repository)),
                Err(error) => warn!(repository, page, %error, "skipping unreadable stargazer"),
            }
        }
    }

    let max = max.min(MAX_ENTRIES);
    if events.len() > max {
        events.drain(..events.len() - max);
    }

    info!(repository, count = events.len(), "collected recent stargazers");
    Ok(events)
}

/// Total stargazer count, read off a one-item request for page 1: the last page
/// number equals the count. Without a `rel="last"` link there is a single
/// page holding zero or one entry.
async fn discover_total(
    client: &GitHubClient,
    path: &str,
    repository: &str,
) -> Result<Option<u32>, FetchError> {
    let first = client
        .get(path, &[("per_page", "1".to_string()), ("page", "1".to_string())])
        .await?;

    if !first.is_ok() {
        warn!(repository, status = first.status.as_u16(), "stargazer discovery failed");
        return Ok(None);
    }

    let total = match first.last_page() {
        Some(last) => last,
        None => first
            .json::<Vec<serde_json::Value>>()
            .map(|entries| entries.len() as u32)
            .unwrap_or(0),
    };

    Ok(Some(total))
}
