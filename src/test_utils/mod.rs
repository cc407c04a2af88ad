//! Test helpers shared by unit and integration tests.

pub mod mocks;

pub use mocks::{MockConfig, MockProfileStore, MockTransactionLedger, SequentialIdGenerator};
