//! Infrastructure layer implementations.

pub mod backend;
pub mod ids;

pub use backend::{BackendClient, BackendConfig, HttpProfileStore, HttpTransactionLedger};
pub use ids::UuidIdGenerator;
