//! Withdrawal submission workflow.
//!
//! Hosts the step-two withdrawal screen server side: payout details are
//! loaded from the client profile, edited and validated, synced back to the
//! profile when they changed, and recorded as a pending withdrawal in the
//! transaction ledger.

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
