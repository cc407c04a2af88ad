//! Application service hosting live withdrawal workflows.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use super::coordinator::{PhaseResult, SubmissionCoordinator};
use super::dialog::{DialogMessages, DialogView, Navigation};
use super::form::FormField;
use super::workflow::{SubmissionState, WithdrawalWorkflow, WorkflowView};
use crate::domain::{
    AppError, HealthResponse, HealthStatus, IdGenerator, ProfileStore, Transaction,
    TransactionLedger, WithdrawalMethod,
};

/// Behaviour knobs for workflow instances
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Route the client is sent to after confirming the outcome dialog
    pub landing_route: String,
    pub messages: DialogMessages,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            landing_route: "/".to_string(),
            messages: DialogMessages::default(),
        }
    }
}

impl WorkflowConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let landing_route = std::env::var("LANDING_ROUTE")
            .ok()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "/".to_string());

        Self {
            landing_route,
            ..Default::default()
        }
    }
}

/// Result of a submit click as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub transaction_id: String,
    pub success: bool,
    pub dialog: DialogView,
    /// Phases that ran, in order
    pub phases: Vec<PhaseResult>,
    /// True when the profile was written, even if the transaction failed
    pub profile_committed: bool,
    pub transaction: Option<Transaction>,
}

/// Application service containing the workflow registry
pub struct WithdrawalService {
    profile_store: Arc<dyn ProfileStore>,
    ledger: Arc<dyn TransactionLedger>,
    ids: Arc<dyn IdGenerator>,
    coordinator: Arc<SubmissionCoordinator>,
    workflows: DashMap<String, Arc<WithdrawalWorkflow>>,
    config: WorkflowConfig,
}

impl WithdrawalService {
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
        let coordinator = Arc::new(SubmissionCoordinator::new(
            Arc::clone(&profile_store),
            Arc::clone(&ledger),
        ));
        Self {
            profile_store,
            ledger,
            ids,
            coordinator,
            workflows: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Number of live workflow instances
    pub fn active_workflows(&self) -> usize {
        self.workflows.len()
    }

    fn workflow(&self, id: &str) -> Result<Arc<WithdrawalWorkflow>, AppError> {
        self.workflows
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AppError::NotFound(format!("Withdrawal {}", id)))
    }

    /// Enter step two for `method`: generate the transaction id, load the
    /// profile and seed the form. Nothing is registered if loading fails.
    #[instrument(skip(self))]
    pub async fn begin_withdrawal(
        &self,
        method: WithdrawalMethod,
    ) -> Result<WorkflowView, AppError> {
        let workflow =
            WithdrawalWorkflow::mount(method, self.profile_store.as_ref(), self.ids.as_ref())
                .await?;
        let view = workflow.view();
        self.workflows
            .insert(workflow.id().to_string(), Arc::new(workflow));
        Ok(view)
    }

    #[instrument(skip(self))]
    pub fn get_withdrawal(&self, id: &str) -> Result<WorkflowView, AppError> {
        Ok(self.workflow(id)?.view())
    }

    #[instrument(skip(self, value))]
    pub fn edit_field(
        &self,
        id: &str,
        field: FormField,
        value: &str,
    ) -> Result<WorkflowView, AppError> {
        self.workflow(id)?.edit(field, value)
    }

    #[instrument(skip(self))]
    pub fn set_terms_accepted(&self, id: &str, accepted: bool) -> Result<WorkflowView, AppError> {
        self.workflow(id)?.set_terms_accepted(accepted)
    }

    /// Run the two-phase submission for `id`.
    ///
    /// The pipeline runs on its own task so that a dropped request cannot
    /// stop it between the profile write and the transaction create.
    #[instrument(skip(self))]
    pub async fn submit_withdrawal(&self, id: &str) -> Result<SubmissionResponse, AppError> {
        let workflow = self.workflow(id)?;
        let coordinator = Arc::clone(&self.coordinator);
        let messages = self.config.messages.clone();

        let task = tokio::spawn(async move {
            let report = workflow.submit(&coordinator, &messages).await?;
            let dialog = workflow.view().dialog;
            Ok::<_, AppError>((report, dialog))
        });

        let (report, dialog) = task.await.map_err(|e| {
            error!(error = %e, "Submission task aborted");
            AppError::Internal(format!("Submission task failed: {}", e))
        })??;

        if report.is_success() {
            info!(transaction_id = %id, "Withdrawal submitted");
        } else if report.is_partial_failure() {
            warn!(transaction_id = %id, "Withdrawal failed after profile update");
        } else {
            warn!(transaction_id = %id, failed_phase = ?report.failed_phase(), "Withdrawal failed");
        }

        Ok(SubmissionResponse {
            transaction_id: id.to_string(),
            success: report.is_success(),
            dialog,
            profile_committed: report.profile_committed(),
            transaction: report.transaction().cloned(),
            phases: report.phases,
        })
    }

    /// Confirm the outcome dialog; ends the workflow instance
    #[instrument(skip(self))]
    pub fn confirm_outcome(&self, id: &str) -> Result<Navigation, AppError> {
        let navigation = self.workflow(id)?.confirm(&self.config.landing_route)?;
        self.workflows.remove(id);
        info!(transaction_id = %id, route = %navigation.route, "Withdrawal workflow closed");
        Ok(navigation)
    }

    /// Navigate away from the screen; discards the form
    #[instrument(skip(self))]
    pub fn abandon_withdrawal(&self, id: &str) -> Result<(), AppError> {
        let (_, workflow) = self
            .workflows
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Withdrawal {}", id)))?;

        if workflow.submission_state() == SubmissionState::Submitting {
            warn!(transaction_id = %id, "Workflow abandoned while submission in flight");
        } else {
            info!(transaction_id = %id, "Workflow abandoned");
        }
        Ok(())
    }

    /// Drop instances idle for at least `ttl`. In-flight submissions are kept.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let candidates: Vec<String> = self
            .workflows
            .iter()
            .map(|entry| entry.key().clone())
            .collect();

        candidates
            .into_iter()
            .filter(|id| {
                self.workflows
                    .remove_if(id, |_, workflow| {
                        workflow.submission_state() != SubmissionState::Submitting
                            && workflow.idle_for() >= ttl
                    })
                    .is_some()
            })
            .count()
    }

    /// Transaction history of the current user
    #[instrument(skip(self))]
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.ledger.list_user_transactions().await
    }

    /// Transaction history across all users
    #[instrument(skip(self))]
    pub async fn list_all_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.ledger.list_all_transactions().await
    }

    /// Perform health check on all dependencies
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let profile_health = match self.profile_store.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(_) => HealthStatus::Unhealthy,
        };
        let ledger_health = match self.ledger.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(_) => HealthStatus::Unhealthy,
        };
        HealthResponse::new(profile_health, ledger_health, self.active_workflows())
    }
}
