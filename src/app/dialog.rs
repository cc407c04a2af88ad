//! Outcome dialog shown after a submission.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::coordinator::SubmissionReport;
use crate::domain::AppError;

/// Message key shown when the profile cannot be loaded on entry
pub const LOAD_FAILURE_MESSAGE: &str = "error occurred";

/// Dialog state. `Success` and `Failure` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DialogState {
    #[default]
    Idle,
    Success,
    Failure,
}

/// Message keys for each terminal state; translated by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogMessages {
    pub success: Vec<String>,
    pub failure: Vec<String>,
}

impl Default for DialogMessages {
    fn default() -> Self {
        Self {
            success: vec!["ready-steady".to_string()],
            failure: vec![
                "oops".to_string(),
                "writing to support".to_string(),
                "we help".to_string(),
            ],
        }
    }
}

/// Where the client should go next
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Navigation {
    #[schema(example = "/")]
    pub route: String,
}

/// Snapshot of the dialog for the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct DialogView {
    pub state: DialogState,
    pub open: bool,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OutcomeDialog {
    state: DialogState,
    messages: Vec<String>,
}

impl OutcomeDialog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogState::Idle
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Open the dialog for `report`. Only valid once, from `Idle`.
    pub fn resolve(
        &mut self,
        report: &SubmissionReport,
        messages: &DialogMessages,
    ) -> Result<DialogState, AppError> {
        if self.state != DialogState::Idle {
            return Err(AppError::Conflict(format!(
                "Outcome already shown ({:?})",
                self.state
            )));
        }

        if report.is_success() {
            self.state = DialogState::Success;
            self.messages = messages.success.clone();
        } else {
            self.state = DialogState::Failure;
            self.messages = messages.failure.clone();
        }
        Ok(self.state)
    }

    /// Confirm the open dialog. Both outcomes lead to the landing route.
    pub fn confirm(&self, landing_route: &str) -> Result<Navigation, AppError> {
        match self.state {
            DialogState::Idle => Err(AppError::Conflict(
                "No outcome to confirm; the withdrawal has not been submitted".to_string(),
            )),
            DialogState::Success | DialogState::Failure => Ok(Navigation {
                route: landing_route.to_string(),
            }),
        }
    }

    pub fn view(&self) -> DialogView {
        DialogView {
            state: self.state,
            open: self.is_open(),
            messages: self.messages.clone(),
        }
    }
}
