//! Throttled GitHub REST client shared by the stargazer and user interfaces.
//!
//! - every request is followed by a fixed pause (`ClientConfig::request_delay`)
//! - a 403/429 answer is retried exactly once after `ClientConfig::rate_limit_cooldown`
//! - pagination metadata is read from the `Link` header (see [`link`])

pub mod index;
pub mod link;

pub use index::{BuildClientError, ClientConfig, FetchError, FetchResponse, GitHubClient};
pub use reqwest::{header::HeaderMap, StatusCode};
