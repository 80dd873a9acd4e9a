//! Public profile and organization lookups for a GitHub login.

pub mod company;
pub mod index;
pub mod models;

pub use company::clean_company_name;
pub use index::{enrich, fetch_orgs, fetch_profile, EnrichError, FetchOrgsError, FetchProfileError};
pub use models::{Enrichment, Profile};
