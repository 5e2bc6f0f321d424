//! Navigation history and availability-gated step transitions.
//!
//! The same [`Navigator`] drives the main flow and the item sub-wizard; only
//! the catalog reported by the state holder differs.

use aksi_core::{DomainError, DomainResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{WizardError, WizardResult};
use crate::state::WizardState;
use crate::step::{NavigationDirection, StepCatalog, WizardStep};

/// One visited step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepHistoryEntry {
    pub step: WizardStep,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub direction: NavigationDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl StepHistoryEntry {
    pub fn new(step: WizardStep, direction: NavigationDirection) -> Self {
        Self {
            step,
            timestamp: Utc::now().timestamp_millis(),
            direction,
            metadata: None,
        }
    }
}

/// Ordered log of visited steps. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    history: Vec<StepHistoryEntry>,
}

impl Navigator {
    /// History rooted at `root` with a single JUMP entry.
    pub fn new(root: WizardStep) -> Self {
        Self {
            history: vec![StepHistoryEntry::new(root, NavigationDirection::Jump)],
        }
    }

    /// Rebuild from stored entries; the last entry must be `current_step` and
    /// every entry must belong to its catalog.
    pub fn from_entries(entries: Vec<StepHistoryEntry>, current_step: WizardStep) -> DomainResult<Self> {
        let catalog = current_step.catalog();
        if let Some(stray) = entries.iter().find(|e| e.step.catalog() != catalog) {
            return Err(DomainError::invariant(format!(
                "step history holds {} outside the {catalog:?} flow of {current_step}",
                stray.step
            )));
        }

        match entries.last() {
            None => Err(DomainError::invariant("step history is empty")),
            Some(last) if last.step != current_step => Err(DomainError::invariant(format!(
                "step history ends at {} but current step is {current_step}",
                last.step
            ))),
            Some(_) => Ok(Self { history: entries }),
        }
    }

    pub fn entries(&self) -> Vec<StepHistoryEntry> {
        self.history.clone()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Step visited before the current one, if any.
    pub fn previous_step(&self) -> Option<WizardStep> {
        self.history
            .len()
            .checked_sub(2)
            .map(|index| self.history[index].step)
    }

    /// Plain history pop is not allowed inside the item sub-wizard; it is left
    /// through its own exit.
    pub fn can_go_back(&self, state: &WizardState) -> bool {
        self.history.len() > 1 && !state.is_item_wizard_active()
    }

    pub fn can_go_forward(&self, state: &WizardState) -> bool {
        next_step(state).is_some_and(|next| state.is_available(next))
    }

    /// Move to `step` if it is available and record the move.
    pub fn navigate_to_step(
        &mut self,
        state: &mut WizardState,
        step: WizardStep,
    ) -> WizardResult<NavigationDirection> {
        if !state.is_available(step) {
            tracing::warn!(step = %step, current = %state.current_step(), "navigation refused: step unavailable");
            return Err(WizardError::StepUnavailable(step));
        }

        let from = state.current_step();
        let direction = NavigationDirection::between(state.active_catalog(), from, step);

        state.update_current_step(step);
        self.history.push(StepHistoryEntry::new(step, direction));

        tracing::debug!(from = %from, to = %step, ?direction, "navigated");
        Ok(direction)
    }

    /// Pop the last entry and return to the one before it.
    pub fn go_back(&mut self, state: &mut WizardState) -> WizardResult<WizardStep> {
        if !self.can_go_back(state) {
            tracing::warn!(current = %state.current_step(), "navigation refused: cannot go back");
            return Err(WizardError::CannotGoBack);
        }

        let target = self.previous_step().ok_or(WizardError::CannotGoBack)?;
        if !state.is_available(target) {
            tracing::warn!(step = %target, "navigation refused: previous step no longer available");
            return Err(WizardError::StepUnavailable(target));
        }

        let from = state.current_step();
        self.history.pop();
        state.update_current_step(target);

        tracing::debug!(from = %from, to = %target, direction = ?NavigationDirection::Backward, "navigated back");
        Ok(target)
    }

    /// Advance to the catalog-defined next step.
    pub fn go_forward(&mut self, state: &mut WizardState) -> WizardResult<WizardStep> {
        let next = match next_step(state) {
            Some(next) if state.is_available(next) => next,
            _ => {
                tracing::warn!(current = %state.current_step(), "navigation refused: cannot go forward");
                return Err(WizardError::CannotGoForward);
            }
        };

        self.navigate_to_step(state, next)?;
        Ok(next)
    }

    /// Truncate to a single JUMP entry at the first main step and move there.
    pub fn reset(&mut self, state: &mut WizardState) {
        let first = StepCatalog::Main.first();
        state.open_step(first);
        self.reseed(first);
        state.update_current_step(first);
    }

    /// Discard history and root it at `root`. Used when switching flows.
    pub(crate) fn reseed(&mut self, root: WizardStep) {
        self.history.clear();
        self.history
            .push(StepHistoryEntry::new(root, NavigationDirection::Jump));
    }
}

fn next_step(state: &WizardState) -> Option<WizardStep> {
    state.active_catalog().next_after(state.current_step())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::WizardContext;
    use aksi_core::AggregateId;

    fn setup() -> (WizardState, Navigator) {
        let state = WizardState::new(AggregateId::new(), WizardContext::default(), 128);
        let nav = Navigator::new(state.current_step());
        (state, nav)
    }

    fn open(state: &mut WizardState, steps: &[WizardStep]) {
        for step in steps {
            state.update_step_availability(*step, true).unwrap();
        }
    }

    #[test]
    fn navigate_to_unavailable_step_fails_without_mutation() {
        let (mut state, mut nav) = setup();
        let err = nav
            .navigate_to_step(&mut state, WizardStep::BranchSelection)
            .unwrap_err();
        assert_eq!(err, WizardError::StepUnavailable(WizardStep::BranchSelection));
        assert_eq!(state.current_step(), WizardStep::ClientSelection);
        assert_eq!(nav.len(), 1);
        assert!(state.events().is_empty());
    }

    #[test]
    fn directions_follow_catalog_order() {
        let (mut state, mut nav) = setup();
        open(&mut state, &[WizardStep::BranchSelection, WizardStep::ItemManager]);

        assert_eq!(
            nav.navigate_to_step(&mut state, WizardStep::ItemManager).unwrap(),
            NavigationDirection::Forward
        );
        assert_eq!(
            nav.navigate_to_step(&mut state, WizardStep::BranchSelection).unwrap(),
            NavigationDirection::Backward
        );
        assert_eq!(
            nav.navigate_to_step(&mut state, WizardStep::BranchSelection).unwrap(),
            NavigationDirection::Jump
        );

        let directions: Vec<_> = nav.entries().iter().map(|e| e.direction).collect();
        assert_eq!(
            directions,
            vec![
                NavigationDirection::Jump,
                NavigationDirection::Forward,
                NavigationDirection::Backward,
                NavigationDirection::Jump,
            ]
        );
    }

    #[test]
    fn go_back_pops_and_restores_previous_step() {
        let (mut state, mut nav) = setup();
        open(&mut state, &[WizardStep::BranchSelection]);
        nav.navigate_to_step(&mut state, WizardStep::BranchSelection).unwrap();

        assert!(nav.can_go_back(&state));
        assert_eq!(nav.previous_step(), Some(WizardStep::ClientSelection));

        let target = nav.go_back(&mut state).unwrap();
        assert_eq!(target, WizardStep::ClientSelection);
        assert_eq!(state.current_step(), WizardStep::ClientSelection);
        assert_eq!(nav.len(), 1);
        assert!(!nav.can_go_back(&state));
    }

    #[test]
    fn go_back_at_root_fails() {
        let (mut state, mut nav) = setup();
        assert_eq!(nav.go_back(&mut state).unwrap_err(), WizardError::CannotGoBack);
        assert_eq!(nav.len(), 1);
    }

    #[test]
    fn go_back_refuses_revoked_previous_step() {
        let (mut state, mut nav) = setup();
        open(&mut state, &[WizardStep::BranchSelection]);
        nav.navigate_to_step(&mut state, WizardStep::BranchSelection).unwrap();
        state
            .update_step_availability(WizardStep::ClientSelection, false)
            .unwrap();

        let err = nav.go_back(&mut state).unwrap_err();
        assert_eq!(err, WizardError::StepUnavailable(WizardStep::ClientSelection));
        assert_eq!(state.current_step(), WizardStep::BranchSelection);
        assert_eq!(nav.len(), 2);
    }

    #[test]
    fn go_forward_requires_available_next_step() {
        let (mut state, mut nav) = setup();
        assert!(!nav.can_go_forward(&state));
        assert_eq!(nav.go_forward(&mut state).unwrap_err(), WizardError::CannotGoForward);

        open(&mut state, &[WizardStep::BranchSelection]);
        assert!(nav.can_go_forward(&state));
        assert_eq!(nav.go_forward(&mut state).unwrap(), WizardStep::BranchSelection);
        assert_eq!(nav.entries()[1].direction, NavigationDirection::Forward);
    }

    #[test]
    fn go_forward_at_end_of_catalog_fails() {
        let (mut state, mut nav) = setup();
        open(&mut state, &StepCatalog::Main.steps()[1..]);
        nav.navigate_to_step(&mut state, WizardStep::OrderConfirmation).unwrap();

        assert_eq!(nav.go_forward(&mut state).unwrap_err(), WizardError::CannotGoForward);
        assert_eq!(state.current_step(), WizardStep::OrderConfirmation);
    }

    #[test]
    fn reset_truncates_to_single_jump_at_first_step() {
        let (mut state, mut nav) = setup();
        open(&mut state, &[WizardStep::BranchSelection, WizardStep::ItemManager]);
        nav.go_forward(&mut state).unwrap();
        nav.go_forward(&mut state).unwrap();

        nav.reset(&mut state);
        assert_eq!(nav.len(), 1);
        assert_eq!(nav.entries()[0].step, WizardStep::ClientSelection);
        assert_eq!(nav.entries()[0].direction, NavigationDirection::Jump);
        assert_eq!(state.current_step(), WizardStep::ClientSelection);
    }

    #[test]
    fn from_entries_checks_invariants() {
        assert!(Navigator::from_entries(vec![], WizardStep::ClientSelection).is_err());

        let entries = vec![StepHistoryEntry::new(WizardStep::ItemManager, NavigationDirection::Jump)];
        assert!(Navigator::from_entries(entries.clone(), WizardStep::ClientSelection).is_err());

        let nav = Navigator::from_entries(entries.clone(), WizardStep::ItemManager).unwrap();
        assert_eq!(nav.entries(), entries);

        let mixed = vec![
            StepHistoryEntry::new(WizardStep::ItemBasicInfo, NavigationDirection::Jump),
            StepHistoryEntry::new(WizardStep::ItemManager, NavigationDirection::Jump),
        ];
        let err = Navigator::from_entries(mixed, WizardStep::ItemManager).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn history_entry_serializes_camel_case() {
        let entry = StepHistoryEntry {
            step: WizardStep::ItemManager,
            timestamp: 1_700_000_000_000,
            direction: NavigationDirection::Forward,
            metadata: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["step"], "itemManager");
        assert_eq!(json["direction"], "FORWARD");
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert!(json.get("metadata").is_none());
    }
}
