//! Availability matrix: which steps the operator may navigate to right now.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::step::{StepCatalog, WizardStep};

/// Total mapping from every [`WizardStep`] to "may navigate here now".
///
/// Deserializing a partial map fills the missing steps with `false`, so the
/// mapping stays total whatever the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<WizardStep, bool>", into = "BTreeMap<WizardStep, bool>")]
pub struct StepAvailability {
    flags: BTreeMap<WizardStep, bool>,
}

impl Default for StepAvailability {
    fn default() -> Self {
        Self::initial()
    }
}

impl StepAvailability {
    /// Every step unavailable.
    pub fn none() -> Self {
        Self {
            flags: WizardStep::ALL.into_iter().map(|s| (s, false)).collect(),
        }
    }

    /// Fresh-session matrix: only the first main step is available.
    pub fn initial() -> Self {
        let mut availability = Self::none();
        availability.set(StepCatalog::Main.first(), true);
        availability
    }

    /// Recompute the matrix from completed steps.
    ///
    /// A main step is available once every earlier main step is completed.
    /// Item steps are only reachable while the item sub-wizard runs. Its first
    /// two steps are open from the start; later ones need every earlier item
    /// step completed.
    pub fn derive(completed: &BTreeSet<WizardStep>, item_wizard_active: bool) -> Self {
        let mut availability = Self::none();

        for (index, step) in StepCatalog::Main.steps().iter().enumerate() {
            let prior_done = StepCatalog::Main.steps()[..index]
                .iter()
                .all(|s| completed.contains(s));
            availability.set(*step, prior_done);
        }

        if item_wizard_active {
            for (index, step) in StepCatalog::Item.steps().iter().enumerate() {
                let prior_done = StepCatalog::Item.steps()[..index]
                    .iter()
                    .all(|s| completed.contains(s));
                availability.set(*step, index < 2 || prior_done);
            }
        }

        availability
    }

    pub fn is_available(&self, step: WizardStep) -> bool {
        self.flags.get(&step).copied().unwrap_or(false)
    }

    pub fn set(&mut self, step: WizardStep, is_available: bool) {
        self.flags.insert(step, is_available);
    }

    /// Available steps in catalog order (main first, then item).
    pub fn available_steps(&self) -> Vec<WizardStep> {
        WizardStep::ALL
            .into_iter()
            .filter(|s| self.is_available(*s))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WizardStep, bool)> + '_ {
        self.flags.iter().map(|(s, a)| (*s, *a))
    }
}

impl From<BTreeMap<WizardStep, bool>> for StepAvailability {
    fn from(partial: BTreeMap<WizardStep, bool>) -> Self {
        let mut availability = Self::none();
        for (step, is_available) in partial {
            availability.set(step, is_available);
        }
        availability
    }
}

impl From<StepAvailability> for BTreeMap<WizardStep, bool> {
    fn from(value: StepAvailability) -> Self {
        value.flags
    }
}
