use aksi_core::DomainError;
use thiserror::Error;

use crate::step::WizardStep;

pub type WizardResult<T> = Result<T, WizardError>;

/// Why a wizard operation was refused.
///
/// Every variant except [`WizardError::Domain`] is a precondition or
/// validation failure: the requested mutation did not happen and the wizard is
/// unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("wizard not initialized")]
    NotInitialized,

    #[error("step unavailable: {0}")]
    StepUnavailable(WizardStep),

    #[error("cannot go back")]
    CannotGoBack,

    #[error("cannot go forward")]
    CannotGoForward,

    #[error("invalid parent step for item wizard: {0}")]
    InvalidParentStep(WizardStep),

    #[error("item wizard not active")]
    ItemWizardNotActive,

    #[error("item wizard is active; finish it before leaving the item flow")]
    ItemWizardActive,

    #[error("transition {from} -> {to} rejected: {}", .errors.join("; "))]
    TransitionRejected {
        from: WizardStep,
        to: WizardStep,
        errors: Vec<String>,
    },

    #[error("invalid wizard context: {}", .0.join("; "))]
    InvalidContext(Vec<String>),

    #[error("step {step} cannot be completed: {reason}")]
    StepNotCompletable { step: WizardStep, reason: String },

    #[error("price calculation failed: {0}")]
    Pricing(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
