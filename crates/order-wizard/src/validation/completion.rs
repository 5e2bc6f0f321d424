use serde::{Deserialize, Serialize};

use crate::step::{StepCatalog, WizardStep};

/// Completion status of both flows for a set of completed steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub main_flow_complete: bool,
    pub item_flow_started: bool,
    pub item_flow_complete: bool,
    pub can_complete_wizard: bool,
    pub main_progress: u8,
    pub item_progress: u8,
    pub missing_main_steps: Vec<WizardStep>,
    pub missing_item_steps: Vec<WizardStep>,
}

/// Judges whether the flows are done.
///
/// Every step of a catalog is required. Once any item step has been completed
/// the item flow must be finished before the order can be.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompletionValidator;

impl CompletionValidator {
    pub fn missing_steps(&self, completed: &[WizardStep], catalog: StepCatalog) -> Vec<WizardStep> {
        catalog
            .steps()
            .iter()
            .copied()
            .filter(|step| !completed.contains(step))
            .collect()
    }

    pub fn is_flow_complete(&self, completed: &[WizardStep], catalog: StepCatalog) -> bool {
        self.missing_steps(completed, catalog).is_empty()
    }

    pub fn is_main_flow_complete(&self, completed: &[WizardStep]) -> bool {
        self.is_flow_complete(completed, StepCatalog::Main)
    }

    pub fn is_item_flow_complete(&self, completed: &[WizardStep]) -> bool {
        self.is_flow_complete(completed, StepCatalog::Item)
    }

    pub fn is_item_flow_started(&self, completed: &[WizardStep]) -> bool {
        completed.iter().any(|step| step.is_item_step())
    }

    pub fn can_complete_wizard(&self, completed: &[WizardStep]) -> bool {
        self.is_main_flow_complete(completed)
            && (!self.is_item_flow_started(completed) || self.is_item_flow_complete(completed))
    }

    /// `round(100 × completed / required)` for `catalog`.
    pub fn completion_percentage(&self, completed: &[WizardStep], catalog: StepCatalog) -> u8 {
        let total = catalog.step_count();
        let done = total - self.missing_steps(completed, catalog).len();
        rounded_percent(done, total)
    }

    pub fn report(&self, completed: &[WizardStep]) -> CompletionReport {
        CompletionReport {
            main_flow_complete: self.is_main_flow_complete(completed),
            item_flow_started: self.is_item_flow_started(completed),
            item_flow_complete: self.is_item_flow_complete(completed),
            can_complete_wizard: self.can_complete_wizard(completed),
            main_progress: self.completion_percentage(completed, StepCatalog::Main),
            item_progress: self.completion_percentage(completed, StepCatalog::Item),
            missing_main_steps: self.missing_steps(completed, StepCatalog::Main),
            missing_item_steps: self.missing_steps(completed, StepCatalog::Item),
        }
    }
}

/// Integer percentage rounded half up.
pub(crate) fn rounded_percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (200 * part + total) / (2 * total);
    percent.min(100) as u8
}
