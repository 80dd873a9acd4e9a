//! Most recent stargazers of a repository.
//!
//! GitHub lists stargazers oldest-first, so the recent window lives on the
//! trailing pages. A one-item request reveals the total count through the
//! `rel="last"` link; only the pages covering the window are fetched.

pub mod index;
pub mod models;

pub use index::{fetch_recent_stargazers, plan_pages, FetchRecentStargazersError};
pub use models::{StarEvent, StargazerEntry, StargazerUser};
