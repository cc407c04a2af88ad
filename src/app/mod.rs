//! Application layer containing the withdrawal workflow and shared state.

pub mod coordinator;
pub mod dialog;
pub mod form;
pub mod reaper;
pub mod service;
pub mod state;
pub mod validator;
pub mod workflow;

pub use coordinator::{
    Phase, PhaseResult, SubmissionCoordinator, SubmissionOutcome, SubmissionReport,
    prepare_transaction,
};
pub use dialog::{
    DialogMessages, DialogState, DialogView, LOAD_FAILURE_MESSAGE, Navigation, OutcomeDialog,
};
pub use form::{FormField, FormState, PayoutFields, decimal_text, digits_only};
pub use reaper::{ReaperConfig, spawn_reaper};
pub use service::{SubmissionResponse, WithdrawalService, WorkflowConfig};
pub use state::AppState;
pub use validator::can_submit;
pub use workflow::{FieldView, SubmissionState, SubmitGuard, WithdrawalWorkflow, WorkflowView};
