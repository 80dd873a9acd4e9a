//! Stargazer lead prospector
//!
//! - recent stargazers of the watched repositories, enriched with public
//!   profile data (`interfaces/github/*`)
//! - deduplicated and scored leads in `leads/`
//! - JSON snapshot in `sink/`, then the CRM webhook (`interfaces/webhook`)
//! - GITHUB_TOKEN is optional, it only raises the rate limit

pub mod config;
pub mod leads;
pub mod pipeline;
pub mod report;
pub mod sink;
