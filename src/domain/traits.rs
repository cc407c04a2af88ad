//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::{Profile, ProfileUpdate, Transaction};

/// Store holding the user's payout destinations and balance
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Check connectivity to the profile service
    async fn health_check(&self) -> Result<(), AppError>;

    /// Fetch the current profile
    async fn get_profile(&self) -> Result<Profile, AppError>;

    /// Merge-patch the profile; fields omitted from `update` are left untouched
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), AppError>;
}

/// Ledger of deposits and withdrawals
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Check connectivity to the ledger
    async fn health_check(&self) -> Result<(), AppError>;

    /// Append a transaction. Not idempotent: a duplicate call creates a
    /// duplicate record.
    async fn create_transaction(&self, transaction: &Transaction) -> Result<Transaction, AppError>;

    /// Transactions belonging to the current user
    async fn list_user_transactions(&self) -> Result<Vec<Transaction>, AppError>;

    /// Every transaction in the ledger (operator view)
    async fn list_all_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Err(AppError::NotSupported(
            "list_all_transactions not implemented".to_string(),
        ))
    }
}

/// Source of process-wide unique identifiers
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}
