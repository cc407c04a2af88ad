//! One run of the withdrawal step-two screen, from mount to navigation away.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use super::coordinator::{SubmissionCoordinator, SubmissionReport};
use super::dialog::{DialogMessages, DialogView, Navigation, OutcomeDialog};
use super::form::{FormField, FormState};
use super::validator::can_submit;
use crate::domain::{
    AppError, IdGenerator, Profile, ProfileStore, ValidationError, WithdrawalMethod,
};

/// Re-entrancy state of the submit action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Done,
}

impl SubmissionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Submitting,
            _ => Self::Done,
        }
    }
}

/// Single-shot guard around the submit action: `idle -> submitting -> done`
#[derive(Debug)]
pub struct SubmitGuard {
    state: AtomicU8,
}

impl Default for SubmitGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitGuard {
    const IDLE: u8 = 0;
    const SUBMITTING: u8 = 1;
    const DONE: u8 = 2;

    #[must_use]
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(Self::IDLE),
        }
    }

    pub fn state(&self) -> SubmissionState {
        SubmissionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move `idle -> submitting`; fails if a submission is running or done
    pub fn try_begin(&self) -> Result<(), AppError> {
        self.state
            .compare_exchange(
                Self::IDLE,
                Self::SUBMITTING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|current| match SubmissionState::from_u8(current) {
                SubmissionState::Submitting => {
                    AppError::Conflict("Withdrawal submission already in progress".to_string())
                }
                _ => AppError::Conflict("Withdrawal already submitted".to_string()),
            })
    }

    /// Back to `idle` when the submission was refused before any network call
    pub fn release(&self) {
        let _ = self.state.compare_exchange(
            Self::SUBMITTING,
            Self::IDLE,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub fn finish(&self) {
        self.state.store(Self::DONE, Ordering::Release);
    }
}

/// Current value of one input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct FieldView {
    pub field: FormField,
    pub value: String,
}

/// Everything the client needs to draw the step-two screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
    pub transaction_id: String,
    pub method: WithdrawalMethod,
    #[schema(example = "PayPal")]
    pub method_label: String,
    pub fields: Vec<FieldView>,
    pub amount: String,
    pub terms_required: bool,
    pub terms_accepted: bool,
    pub can_submit: bool,
    pub submission: SubmissionState,
    pub dialog: DialogView,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A live withdrawal workflow instance
#[derive(Debug)]
pub struct WithdrawalWorkflow {
    transaction_id: String,
    method: WithdrawalMethod,
    /// Balance captured on mount, used for the projected balance
    balance: String,
    form: Mutex<FormState>,
    guard: SubmitGuard,
    dialog: Mutex<OutcomeDialog>,
    last_activity: Mutex<Instant>,
}

impl WithdrawalWorkflow {
    /// Start an instance: generate the transaction id, then load the profile
    #[instrument(skip(profile_store, ids))]
    pub async fn mount(
        method: WithdrawalMethod,
        profile_store: &dyn ProfileStore,
        ids: &dyn IdGenerator,
    ) -> Result<Self, AppError> {
        let transaction_id = ids.next_id();

        let profile = profile_store.get_profile().await.map_err(|e| {
            warn!(transaction_id = %transaction_id, error = %e, "Failed to fetch profile");
            AppError::ProfileLoad(e.to_string())
        })?;

        info!(transaction_id = %transaction_id, "Withdrawal workflow mounted");
        Ok(Self::from_profile(method, &profile, transaction_id))
    }

    #[must_use]
    pub fn from_profile(method: WithdrawalMethod, profile: &Profile, transaction_id: String) -> Self {
        Self {
            form: Mutex::new(FormState::new(method, profile, transaction_id.clone())),
            transaction_id,
            method,
            balance: profile.balance.clone(),
            guard: SubmitGuard::new(),
            dialog: Mutex::new(OutcomeDialog::new()),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> &str {
        &self.transaction_id
    }

    pub fn method(&self) -> WithdrawalMethod {
        self.method
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.guard.state()
    }

    pub fn can_submit(&self) -> bool {
        can_submit(&lock(&self.form))
    }

    /// Time since the last interaction
    pub fn idle_for(&self) -> Duration {
        lock(&self.last_activity).elapsed()
    }

    fn touch(&self) {
        *lock(&self.last_activity) = Instant::now();
    }

    pub fn view(&self) -> WorkflowView {
        let form = lock(&self.form);
        let dialog = lock(&self.dialog);

        WorkflowView {
            transaction_id: self.transaction_id.clone(),
            method: self.method,
            method_label: self.method.label().to_string(),
            fields: FormField::payout_fields(self.method)
                .iter()
                .map(|field| FieldView {
                    field: *field,
                    value: form.value(*field).to_string(),
                })
                .collect(),
            amount: form.amount().to_string(),
            terms_required: self.method.requires_terms(),
            terms_accepted: form.terms_accepted(),
            can_submit: self.guard.state() == SubmissionState::Idle && can_submit(&form),
            submission: self.guard.state(),
            dialog: dialog.view(),
        }
    }

    fn ensure_editable(&self) -> Result<(), AppError> {
        match self.guard.state() {
            SubmissionState::Idle => Ok(()),
            state => Err(AppError::Conflict(format!(
                "Form is locked while submission is {:?}",
                state
            ))),
        }
    }

    /// Apply a user edit to a text field
    pub fn edit(&self, field: FormField, raw: &str) -> Result<WorkflowView, AppError> {
        {
            let mut form = lock(&self.form);
            self.ensure_editable()?;
            form.set(field, raw)?;
        }
        self.touch();
        Ok(self.view())
    }

    pub fn set_terms_accepted(&self, accepted: bool) -> Result<WorkflowView, AppError> {
        {
            let mut form = lock(&self.form);
            self.ensure_editable()?;
            if !self.method.requires_terms() {
                return Err(AppError::Validation(ValidationError::FieldNotAvailable {
                    field: "termsAccepted".to_string(),
                    method: self.method.as_str().to_string(),
                }));
            }
            form.set_terms_accepted(accepted);
        }
        self.touch();
        Ok(self.view())
    }

    /// Run the submission once. Rejected while another submission runs,
    /// after one has finished, or when the form does not validate.
    pub async fn submit(
        &self,
        coordinator: &SubmissionCoordinator,
        messages: &DialogMessages,
    ) -> Result<SubmissionReport, AppError> {
        self.guard.try_begin()?;
        self.touch();

        let snapshot = {
            let form = lock(&self.form);
            if !can_submit(&form) {
                drop(form);
                self.guard.release();
                return Err(AppError::Validation(ValidationError::SubmitDisabled));
            }
            form.clone()
        };

        let report = coordinator.submit(&snapshot, &self.balance).await;

        lock(&self.dialog).resolve(&report, messages)?;
        self.guard.finish();
        self.touch();

        Ok(report)
    }

    /// Confirm the outcome dialog
    pub fn confirm(&self, landing_route: &str) -> Result<Navigation, AppError> {
        lock(&self.dialog).confirm(landing_route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paypal_workflow() -> WithdrawalWorkflow {
        let profile = Profile {
            balance: "100".to_string(),
            paypal_address: "a@b.com".to_string(),
            ..Default::default()
        };
        WithdrawalWorkflow::from_profile(WithdrawalMethod::PaypalAddress, &profile, "tx-1".into())
    }

    #[test]
    fn test_guard_transitions() {
        let guard = SubmitGuard::new();
        assert_eq!(guard.state(), SubmissionState::Idle);

        guard.try_begin().unwrap();
        assert_eq!(guard.state(), SubmissionState::Submitting);
        assert!(matches!(guard.try_begin(), Err(AppError::Conflict(_))));

        guard.finish();
        assert_eq!(guard.state(), SubmissionState::Done);
        assert!(matches!(guard.try_begin(), Err(AppError::Conflict(_))));

        // release only undoes an in-flight begin
        guard.release();
        assert_eq!(guard.state(), SubmissionState::Done);
    }

    #[test]
    fn test_view_lists_method_fields() {
        let workflow = paypal_workflow();
        let view = workflow.view();

        assert_eq!(view.transaction_id, "tx-1");
        assert_eq!(view.method_label, "PayPal");
        assert_eq!(view.fields.len(), 1);
        assert_eq!(view.fields[0].value, "a@b.com");
        assert!(!view.terms_required);
        assert!(!view.can_submit);
        assert!(!view.dialog.open);
    }

    #[test]
    fn test_edit_updates_can_submit() {
        let workflow = paypal_workflow();
        let view = workflow.edit(FormField::Amount, "5x0").unwrap();

        assert_eq!(view.amount, "50");
        assert!(view.can_submit);
    }

    #[test]
    fn test_terms_rejected_for_non_wire_method() {
        let workflow = paypal_workflow();
        assert!(matches!(
            workflow.set_terms_accepted(true),
            Err(AppError::Validation(ValidationError::FieldNotAvailable { .. }))
        ));
    }

    #[test]
    fn test_edit_refused_once_submission_started() {
        let workflow = paypal_workflow();
        workflow.guard.try_begin().unwrap();

        assert!(matches!(
            workflow.edit(FormField::Amount, "10"),
            Err(AppError::Conflict(_))
        ));
    }
}
