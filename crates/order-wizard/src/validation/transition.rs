use crate::step::{StepCatalog, WizardStep};
use crate::validation::ValidationResult;

/// Decides whether a move between two steps is legal at all.
///
/// Availability is a separate concern checked by the navigator.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransitionValidator;

impl TransitionValidator {
    pub fn validate(&self, from: WizardStep, to: WizardStep) -> ValidationResult {
        if from.catalog() == to.catalog() || Self::is_sanctioned_crossing(from, to) {
            return ValidationResult::valid();
        }
        ValidationResult::invalid(format!(
            "cannot move from {from} ({:?} flow) to {to} ({:?} flow)",
            from.catalog(),
            to.catalog()
        ))
    }

    /// Same as [`Self::validate`] for raw tags, rejecting unknown ones.
    pub fn validate_tags(&self, from: &str, to: &str) -> ValidationResult {
        let mut result = ValidationResult::valid();
        let parsed_from = from.parse::<WizardStep>();
        let parsed_to = to.parse::<WizardStep>();

        for parsed in [&parsed_from, &parsed_to] {
            if let Err(err) = parsed {
                result.push_error(err.to_string());
            }
        }

        if let (Ok(from), Ok(to)) = (parsed_from, parsed_to) {
            result.merge(self.validate(from, to));
        }
        result
    }

    /// item management → first item step, and any item step → item management.
    fn is_sanctioned_crossing(from: WizardStep, to: WizardStep) -> bool {
        let entering = from == WizardStep::ItemManager && to == StepCatalog::Item.first();
        let leaving = from.is_item_step() && to == WizardStep::ItemManager;
        entering || leaving
    }
}
