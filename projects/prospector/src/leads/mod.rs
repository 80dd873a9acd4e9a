pub mod aggregate;
pub mod models;

pub use aggregate::{aggregate, rank, score};
pub use models::Lead;
