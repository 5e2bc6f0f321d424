//! Nested per-item flow.
//!
//! The controller owns no state. It swaps the navigator's history and the
//! item part of the availability matrix, then hands control back through the
//! same state holder and navigator contracts the main flow uses.

use crate::error::{WizardError, WizardResult};
use crate::navigation::Navigator;
use crate::state::WizardState;
use crate::step::{StepCatalog, WizardStep};

/// Item steps open as soon as the sub-wizard starts.
const ITEM_STEPS_OPEN_ON_START: usize = 2;

/// What the caller asked for when leaving the item flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemWizardOutcome {
    /// Whether the item collaborator should persist (true) or discard (false)
    /// the item being edited.
    pub save_item: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ItemWizardController;

impl ItemWizardController {
    /// Enter the item flow from the item-management step.
    pub fn start(&self, state: &mut WizardState, navigator: &mut Navigator) -> WizardResult<()> {
        let parent = state.current_step();
        if parent != WizardStep::ItemManager {
            tracing::warn!(current = %parent, "item wizard refused: invalid parent step");
            return Err(WizardError::InvalidParentStep(parent));
        }

        for (index, step) in StepCatalog::Item.steps().iter().enumerate() {
            if index < ITEM_STEPS_OPEN_ON_START {
                state.open_step(*step);
            } else {
                state.update_step_availability(*step, false)?;
            }
        }

        let entry = StepCatalog::Item.first();
        state.set_item_wizard_active(true);
        state.update_current_step(entry);
        navigator.reseed(entry);

        tracing::info!(entry = %entry, "item wizard started");
        Ok(())
    }

    /// Leave the item flow and return to item management.
    ///
    /// `save_item` is passed through to the caller; navigation state is the
    /// same either way.
    pub fn finish(
        &self,
        state: &mut WizardState,
        navigator: &mut Navigator,
        save_item: bool,
    ) -> WizardResult<ItemWizardOutcome> {
        if !state.is_item_wizard_active() {
            tracing::warn!(current = %state.current_step(), "item wizard finish refused: not active");
            return Err(WizardError::ItemWizardNotActive);
        }

        let parent = WizardStep::ItemManager;
        state.open_step(parent);
        state.set_item_wizard_active(false);
        state.update_current_step(parent);
        navigator.reseed(parent);

        for step in StepCatalog::Item.steps() {
            state.update_step_availability(*step, false)?;
        }

        tracing::info!(save_item, "item wizard finished");
        Ok(ItemWizardOutcome { save_item })
    }
}
