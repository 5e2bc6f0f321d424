//! Validation services: step data, transition legality, and completion.
//!
//! [`WizardValidator`] composes the three and only delegates.

mod completion;
mod result;
mod step;
mod transition;

pub use completion::{CompletionReport, CompletionValidator};
pub(crate) use completion::rounded_percent;
pub use result::ValidationResult;
pub use step::{StepRule, StepValidator};
pub use transition::TransitionValidator;

use serde_json::Value;

use crate::config::WizardConfig;
use crate::step::{StepCatalog, WizardStep};

#[derive(Debug, Clone)]
pub struct WizardValidator {
    steps: StepValidator,
    transitions: TransitionValidator,
    completion: CompletionValidator,
}

impl WizardValidator {
    pub fn new(config: WizardConfig) -> Self {
        Self {
            steps: StepValidator::new(config),
            transitions: TransitionValidator,
            completion: CompletionValidator,
        }
    }

    pub fn step_validator_mut(&mut self) -> &mut StepValidator {
        &mut self.steps
    }

    pub fn validate_step(&self, step: WizardStep, data: &Value) -> ValidationResult {
        self.steps.validate(step, data)
    }

    pub fn validate_transition(&self, from: WizardStep, to: WizardStep) -> ValidationResult {
        self.transitions.validate(from, to)
    }

    pub fn validate_transition_tags(&self, from: &str, to: &str) -> ValidationResult {
        self.transitions.validate_tags(from, to)
    }

    pub fn completion_report(&self, completed: &[WizardStep]) -> CompletionReport {
        self.completion.report(completed)
    }

    pub fn can_complete_wizard(&self, completed: &[WizardStep]) -> bool {
        self.completion.can_complete_wizard(completed)
    }

    pub fn completion_percentage(&self, completed: &[WizardStep], catalog: StepCatalog) -> u8 {
        self.completion.completion_percentage(completed, catalog)
    }
}
