//! Two-phase submission pipeline: profile sync, then transaction creation.
//!
//! The phases are sequential and not atomic. A profile write that succeeds
//! stays committed when the transaction create fails; the report records
//! this as a partial commit so callers can tell it apart from a clean
//! failure.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use super::form::FormState;
use crate::domain::{
    AppError, ProfileStore, Transaction, TransactionLedger, ValidationError, format_fixed2,
    parse_decimal,
};

/// Network phase of a submission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Profile,
    Transaction,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Transaction => "transaction",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one executed phase. Skipped phases are not recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct PhaseResult {
    pub phase: Phase,
    pub ok: bool,
    /// Error detail, kept for logs and never sent to the client
    #[serde(skip)]
    pub detail: Option<String>,
}

impl PhaseResult {
    fn succeeded(phase: Phase) -> Self {
        Self {
            phase,
            ok: true,
            detail: None,
        }
    }

    fn failed(phase: Phase, err: &AppError) -> Self {
        Self {
            phase,
            ok: false,
            detail: Some(err.to_string()),
        }
    }
}

/// Combined outcome of a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Transaction created
    Success { transaction: Transaction },
    /// The pipeline stopped at `failed_phase`
    Failure { failed_phase: Phase },
}

/// Per-phase record of a submission plus its combined outcome
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub phases: Vec<PhaseResult>,
    pub outcome: SubmissionOutcome,
}

impl SubmissionReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Success { .. })
    }

    /// Whether phase 1 ran and wrote the profile
    pub fn profile_committed(&self) -> bool {
        self.phases
            .iter()
            .any(|result| result.phase == Phase::Profile && result.ok)
    }

    /// Profile written but no transaction recorded
    pub fn is_partial_failure(&self) -> bool {
        !self.is_success() && self.profile_committed()
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        match &self.outcome {
            SubmissionOutcome::Success { transaction } => Some(transaction),
            SubmissionOutcome::Failure { .. } => None,
        }
    }

    pub fn failed_phase(&self) -> Option<Phase> {
        match self.outcome {
            SubmissionOutcome::Success { .. } => None,
            SubmissionOutcome::Failure { failed_phase } => Some(failed_phase),
        }
    }
}

/// Build the pending withdrawal record for `form`.
///
/// The projected balance is `balance - amount` with exact decimal arithmetic;
/// a negative projection is allowed.
pub fn prepare_transaction(
    form: &FormState,
    balance: &str,
    date: DateTime<Utc>,
) -> Result<Transaction, AppError> {
    let amount = parse_decimal(form.amount())
        .filter(|value| *value > Decimal::ZERO)
        .ok_or_else(|| ValidationError::InvalidAmount(form.amount().to_string()))?;

    let balance = parse_decimal(balance).ok_or_else(|| ValidationError::InvalidField {
        field: "balance".to_string(),
        message: format!("Profile balance is not a decimal number: {:?}", balance),
    })?;

    let projected = balance
        .checked_sub(amount)
        .ok_or_else(|| ValidationError::InvalidAmount("balance projection overflow".into()))?;
    if projected < Decimal::ZERO {
        warn!(
            transaction_id = %form.transaction_id(),
            projected = %projected,
            "Withdrawal exceeds current balance"
        );
    }

    Ok(Transaction::withdrawal(
        form.transaction_id().to_string(),
        format_fixed2(amount),
        format_fixed2(projected),
        form.method(),
        date,
    ))
}

/// Runs the profile-sync and transaction-create phases
pub struct SubmissionCoordinator {
    profile_store: Arc<dyn ProfileStore>,
    ledger: Arc<dyn TransactionLedger>,
}

impl SubmissionCoordinator {
    #[must_use]
    pub fn new(profile_store: Arc<dyn ProfileStore>, ledger: Arc<dyn TransactionLedger>) -> Self {
        Self {
            profile_store,
            ledger,
        }
    }

    /// Execute one submission of `form` against the balance captured on mount.
    ///
    /// Never returns an error: every failure is folded into the report.
    #[instrument(skip(self, form, balance), fields(transaction_id = %form.transaction_id(), method = %form.method()))]
    pub async fn submit(&self, form: &FormState, balance: &str) -> SubmissionReport {
        let mut phases = Vec::with_capacity(2);

        let transaction = match prepare_transaction(form, balance, Utc::now()) {
            Ok(transaction) => transaction,
            Err(e) => {
                error!(error = %e, "Could not prepare withdrawal transaction");
                phases.push(PhaseResult::failed(Phase::Transaction, &e));
                return SubmissionReport {
                    phases,
                    outcome: SubmissionOutcome::Failure {
                        failed_phase: Phase::Transaction,
                    },
                };
            }
        };

        match form.profile_update() {
            Some(update) => match self.profile_store.update_profile(&update).await {
                Ok(()) => {
                    info!("Payout details synced to profile");
                    phases.push(PhaseResult::succeeded(Phase::Profile));
                }
                Err(e) => {
                    error!(error = %e, "Profile update failed; transaction not created");
                    phases.push(PhaseResult::failed(Phase::Profile, &e));
                    return SubmissionReport {
                        phases,
                        outcome: SubmissionOutcome::Failure {
                            failed_phase: Phase::Profile,
                        },
                    };
                }
            },
            None => info!("Payout details unchanged; profile sync skipped"),
        }

        match self.ledger.create_transaction(&transaction).await {
            Ok(created) => {
                info!(amount = %created.amount, balance = %created.balance, "Withdrawal transaction created");
                phases.push(PhaseResult::succeeded(Phase::Transaction));
                SubmissionReport {
                    phases,
                    outcome: SubmissionOutcome::Success {
                        transaction: created,
                    },
                }
            }
            Err(e) => {
                phases.push(PhaseResult::failed(Phase::Transaction, &e));
                let report = SubmissionReport {
                    phases,
                    outcome: SubmissionOutcome::Failure {
                        failed_phase: Phase::Transaction,
                    },
                };
                if report.profile_committed() {
                    error!(
                        error = %e,
                        "Partial commit: profile updated but transaction creation failed"
                    );
                } else {
                    error!(error = %e, "Transaction creation failed");
                }
                report
            }
        }
    }
}
