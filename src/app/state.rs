//! Application state management.

use std::sync::Arc;

use crate::domain::{IdGenerator, ProfileStore, TransactionLedger};

use super::service::{WithdrawalService, WorkflowConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WithdrawalService>,
}

impl AppState {
    /// Create a new application state with default workflow settings
    #[must_use]
    pub fn new(
        profile_store: Arc<dyn ProfileStore>,
        ledger: Arc<dyn TransactionLedger>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self::with_config(profile_store, ledger, ids, WorkflowConfig::default())
    }

    #[must_use]
    pub fn with_config(
        profile_store: Arc<dyn ProfileStore>,
        ledger: Arc<dyn TransactionLedger>,
        ids: Arc<dyn IdGenerator>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            service: Arc::new(WithdrawalService::with_config(
                profile_store,
                ledger,
                ids,
                config,
            )),
        }
    }
}
