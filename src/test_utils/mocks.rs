//! Mock implementations for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::{
    AppError, ExternalServiceError, IdGenerator, Profile, ProfileStore, ProfileUpdate,
    Transaction, TransactionLedger,
};

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub should_fail: bool,
    pub error_message: Option<String>,
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
        }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.should_fail {
            let msg = self
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock error".to_string());
            return Err(AppError::ExternalService(ExternalServiceError::ApiError {
                status_code: 500,
                message: msg,
            }));
        }
        Ok(())
    }
}

fn unhealthy() -> AppError {
    AppError::ExternalService(ExternalServiceError::Unavailable(
        "Unhealthy".to_string(),
    ))
}

/// Mock profile store for testing
pub struct MockProfileStore {
    profile: Arc<Mutex<Profile>>,
    updates: Arc<Mutex<Vec<ProfileUpdate>>>,
    load_config: MockConfig,
    update_config: MockConfig,
    is_healthy: AtomicBool,
}

impl MockProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_profile(Profile::default())
    }

    #[must_use]
    pub fn with_profile(profile: Profile) -> Self {
        Self {
            profile: Arc::new(Mutex::new(profile)),
            updates: Arc::new(Mutex::new(Vec::new())),
            load_config: MockConfig::success(),
            update_config: MockConfig::success(),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Every call fails
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        let mut store = Self::new();
        store.load_config = MockConfig::failure(message.clone());
        store.update_config = MockConfig::failure(message);
        store
    }

    /// Loading works, updates fail
    #[must_use]
    pub fn with_failing_updates(mut self, message: impl Into<String>) -> Self {
        self.update_config = MockConfig::failure(message);
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Current stored profile (for testing)
    pub fn profile(&self) -> Profile {
        self.profile.lock().unwrap().clone()
    }

    /// Updates received so far, in order (for testing)
    pub fn updates(&self) -> Vec<ProfileUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl Default for MockProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(unhealthy());
        }
        Ok(())
    }

    async fn get_profile(&self) -> Result<Profile, AppError> {
        self.load_config.check()?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), AppError> {
        self.update_config.check()?;
        update.apply_to(&mut self.profile.lock().unwrap());
        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }
}

/// Mock transaction ledger for testing
pub struct MockTransactionLedger {
    transactions: Arc<Mutex<Vec<Transaction>>>,
    config: MockConfig,
    is_healthy: AtomicBool,
    delay: Option<Duration>,
    create_calls: AtomicUsize,
}

impl MockTransactionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            transactions: Arc::new(Mutex::new(Vec::new())),
            config,
            is_healthy: AtomicBool::new(true),
            delay: None,
            create_calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Pre-populate the ledger
    #[must_use]
    pub fn with_transactions(self, transactions: Vec<Transaction>) -> Self {
        *self.transactions.lock().unwrap() = transactions;
        self
    }

    /// Hold every `create_transaction` call for `delay` before answering
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Get all stored transactions (for testing)
    pub fn get_transactions(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }

    /// Number of `create_transaction` calls, failed ones included
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTransactionLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionLedger for MockTransactionLedger {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(unhealthy());
        }
        Ok(())
    }

    async fn create_transaction(&self, transaction: &Transaction) -> Result<Transaction, AppError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.config.check()?;
        self.transactions.lock().unwrap().push(transaction.clone());
        Ok(transaction.clone())
    }

    async fn list_user_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.config.check()?;
        Ok(self.get_transactions())
    }

    async fn list_all_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.config.check()?;
        Ok(self.get_transactions())
    }
}

/// Deterministic ids `tx-1`, `tx-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicUsize,
}

impl SequentialIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        format!("tx-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
