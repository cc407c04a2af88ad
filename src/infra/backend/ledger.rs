use async_trait::async_trait;
use reqwest::Method;
use tracing::{instrument, warn};

use super::{BackendClient, BackendConfig};
use crate::domain::{AppError, Transaction, TransactionLedger};

const TRANSACTIONS_PATH: &str = "/transactions";
const USER_TRANSACTIONS_PATH: &str = "/transactions/profile";
const ALL_TRANSACTIONS_PATH: &str = "/transactions/admin";
const HEALTH_PATH: &str = "/health";

/// `TransactionLedger` backed by the transactions endpoints.
///
/// Creation is never retried: the back end does not deduplicate.
#[derive(Debug, Clone)]
pub struct HttpTransactionLedger {
    client: BackendClient,
}

impl HttpTransactionLedger {
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        Ok(Self::with_client(BackendClient::new(config)?))
    }

    #[must_use]
    pub fn with_client(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransactionLedger for HttpTransactionLedger {
    async fn health_check(&self) -> Result<(), AppError> {
        self.client.probe(HEALTH_PATH).await
    }

    #[instrument(skip(self, transaction), fields(transaction_id = %transaction.transaction_id))]
    async fn create_transaction(&self, transaction: &Transaction) -> Result<Transaction, AppError> {
        let created: Option<Transaction> = self
            .client
            .send_json(Method::POST, TRANSACTIONS_PATH, transaction)
            .await?;

        Ok(created.unwrap_or_else(|| {
            warn!("Transaction accepted without a readable echo; using the submitted record");
            transaction.clone()
        }))
    }

    #[instrument(skip(self))]
    async fn list_user_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.client.get_json(USER_TRANSACTIONS_PATH).await
    }

    #[instrument(skip(self))]
    async fn list_all_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.client.get_json(ALL_TRANSACTIONS_PATH).await
    }
}
