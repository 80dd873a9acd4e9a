//! Hands the scored leads to a CRM webhook as one JSON batch.

pub mod index;

pub use index::{deliver, DeliverError, DeliveryOutcome, LeadEnvelope};
