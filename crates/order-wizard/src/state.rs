//! State holder: the single writer of step, mode, status, context and
//! availability for one wizard session.

use aksi_core::{AggregateId, DomainError, DomainResult};
use aksi_events::{EventEnvelope, EventLog};
use serde_json::{Value, json};

use crate::availability::StepAvailability;
use crate::context::{WizardContext, WizardMode, WizardStatus};
use crate::event::{WizardDomainEvent, WizardEventKind};
use crate::step::{StepCatalog, WizardStep};

/// Everything needed to rebuild a [`WizardState`] without deriving anything.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSeed {
    pub current_step: WizardStep,
    pub mode: WizardMode,
    pub status: WizardStatus,
    pub context: WizardContext,
    pub availability: StepAvailability,
    pub item_wizard_active: bool,
}

/// Mutable session state.
///
/// Invariant: `availability[current_step]` is always `true`.
#[derive(Debug, Clone)]
pub struct WizardState {
    current_step: WizardStep,
    status: WizardStatus,
    context: WizardContext,
    availability: StepAvailability,
    item_wizard_active: bool,
    events: EventLog<WizardDomainEvent>,
}

impl WizardState {
    /// Fresh state on the first main step.
    pub fn new(stream_id: AggregateId, context: WizardContext, event_capacity: usize) -> Self {
        Self {
            current_step: StepCatalog::Main.first(),
            status: WizardStatus::Idle,
            context,
            availability: StepAvailability::initial(),
            item_wizard_active: false,
            events: EventLog::new(stream_id, event_capacity),
        }
    }

    /// Rebuild state from stored values.
    ///
    /// Fails if the seed describes a state the engine can never be in.
    pub fn from_seed(
        stream_id: AggregateId,
        seed: StateSeed,
        event_capacity: usize,
    ) -> DomainResult<Self> {
        if !seed.availability.is_available(seed.current_step) {
            return Err(DomainError::invariant(format!(
                "current step {} is not marked available",
                seed.current_step
            )));
        }
        if seed.item_wizard_active != seed.current_step.is_item_step() {
            return Err(DomainError::invariant(format!(
                "item wizard active = {} while on step {}",
                seed.item_wizard_active, seed.current_step
            )));
        }

        let mut context = seed.context;
        context.mode = seed.mode;

        Ok(Self {
            current_step: seed.current_step,
            status: seed.status,
            context,
            availability: seed.availability,
            item_wizard_active: seed.item_wizard_active,
            events: EventLog::new(stream_id, event_capacity),
        })
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn mode(&self) -> WizardMode {
        self.context.mode
    }

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn context(&self) -> WizardContext {
        self.context.clone()
    }

    pub fn availability(&self) -> StepAvailability {
        self.availability.clone()
    }

    pub fn is_available(&self, step: WizardStep) -> bool {
        self.availability.is_available(step)
    }

    pub fn is_item_wizard_active(&self) -> bool {
        self.item_wizard_active
    }

    /// Catalog that orders the steps the operator is currently moving through.
    pub fn active_catalog(&self) -> StepCatalog {
        if self.item_wizard_active {
            StepCatalog::Item
        } else {
            StepCatalog::Main
        }
    }

    /// Move to `step` and emit STEP_ENTERED.
    ///
    /// # Panics
    ///
    /// If `step` is not available. Callers check availability first; reaching
    /// this with an unavailable step means the engine is corrupt.
    pub fn update_current_step(&mut self, step: WizardStep) {
        let previous = self.current_step;
        self.current_step = step;
        self.emit(
            WizardEventKind::StepEntered,
            json!({ "previousStep": previous }),
        );

        assert!(
            self.availability.is_available(self.current_step),
            "wizard entered unavailable step {}",
            self.current_step
        );
    }

    /// Set one availability flag.
    ///
    /// Revoking the current step is refused: it would leave the engine on an
    /// unavailable step.
    pub fn update_step_availability(&mut self, step: WizardStep, is_available: bool) -> DomainResult<()> {
        if !is_available && step == self.current_step {
            return Err(DomainError::invariant(format!(
                "cannot revoke availability of current step {step}"
            )));
        }
        self.availability.set(step, is_available);
        Ok(())
    }

    /// Mark `step` available. Opening a step can never break the invariant.
    pub(crate) fn open_step(&mut self, step: WizardStep) {
        self.availability.set(step, true);
    }

    /// Swap the whole matrix; same rule as [`Self::update_step_availability`].
    pub fn replace_availability(&mut self, availability: StepAvailability) -> DomainResult<()> {
        if !availability.is_available(self.current_step) {
            return Err(DomainError::invariant(format!(
                "replacement matrix leaves current step {} unavailable",
                self.current_step
            )));
        }
        self.availability = availability;
        Ok(())
    }

    pub fn set_item_wizard_active(&mut self, is_active: bool) {
        self.item_wizard_active = is_active;
        let kind = if is_active {
            WizardEventKind::ItemWizardStarted
        } else {
            WizardEventKind::ItemWizardCompleted
        };
        self.emit(kind, Value::Null);
    }

    /// Change mode; emits WIZARD_STARTED carrying the previous mode.
    pub fn update_mode(&mut self, mode: WizardMode) {
        let previous = self.context.mode;
        self.context.mode = mode;
        self.emit(
            WizardEventKind::WizardStarted,
            json!({ "mode": mode, "previousMode": previous }),
        );
    }

    pub fn update_status(&mut self, status: WizardStatus) {
        self.status = status;
    }

    /// Back to the fresh-session values, keeping context and undrained events.
    pub(crate) fn reseed(&mut self) {
        self.current_step = StepCatalog::Main.first();
        self.status = WizardStatus::Idle;
        self.availability = StepAvailability::initial();
        self.item_wizard_active = false;
    }

    pub(crate) fn emit(&mut self, kind: WizardEventKind, payload: Value) {
        self.events
            .append(WizardDomainEvent::new(kind, self.current_step, payload));
    }

    pub fn events(&self) -> Vec<WizardDomainEvent> {
        self.events.payloads()
    }

    pub fn drain_events(&mut self) -> Vec<EventEnvelope<WizardDomainEvent>> {
        self.events.drain()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> WizardState {
        WizardState::new(AggregateId::new(), WizardContext::default(), 64)
    }

    fn seed() -> StateSeed {
        StateSeed {
            current_step: WizardStep::ClientSelection,
            mode: WizardMode::Create,
            status: WizardStatus::Idle,
            context: WizardContext::default(),
            availability: StepAvailability::initial(),
            item_wizard_active: false,
        }
    }

    #[test]
    fn new_state_starts_on_first_main_step() {
        let state = fresh();
        assert_eq!(state.current_step(), WizardStep::ClientSelection);
        assert!(state.is_available(state.current_step()));
        assert!(!state.is_item_wizard_active());
        assert_eq!(state.status(), WizardStatus::Idle);
        assert!(state.events().is_empty());
    }

    #[test]
    fn update_current_step_emits_step_entered() {
        let mut state = fresh();
        state.update_step_availability(WizardStep::BranchSelection, true).unwrap();
        state.update_current_step(WizardStep::BranchSelection);

        let events = state.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, WizardEventKind::StepEntered);
        assert_eq!(events[0].step, WizardStep::BranchSelection);
        assert_eq!(events[0].payload["previousStep"], "clientSelection");
    }

    #[test]
    #[should_panic(expected = "unavailable step")]
    fn entering_unavailable_step_is_fatal() {
        let mut state = fresh();
        state.update_current_step(WizardStep::OrderConfirmation);
    }

    #[test]
    fn revoking_current_step_is_refused() {
        let mut state = fresh();
        let err = state
            .update_step_availability(WizardStep::ClientSelection, false)
            .unwrap_err();
        assert!(err.is_invariant_violation());
        assert!(state.is_available(WizardStep::ClientSelection));
    }

    #[test]
    fn mode_change_records_previous_mode() {
        let mut state = fresh();
        state.update_mode(WizardMode::Edit);

        assert_eq!(state.mode(), WizardMode::Edit);
        let events = state.events();
        assert_eq!(events[0].kind, WizardEventKind::WizardStarted);
        assert_eq!(events[0].payload["previousMode"], "create");
        assert_eq!(events[0].payload["mode"], "edit");
    }

    #[test]
    fn item_flag_emits_start_and_completion() {
        let mut state = fresh();
        state.set_item_wizard_active(true);
        state.set_item_wizard_active(false);
        let kinds: Vec<_> = state.events().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![WizardEventKind::ItemWizardStarted, WizardEventKind::ItemWizardCompleted]
        );
    }

    #[test]
    fn accessors_return_copies() {
        let state = fresh();
        let mut availability = state.availability();
        availability.set(WizardStep::OrderConfirmation, true);
        assert!(!state.is_available(WizardStep::OrderConfirmation));
    }

    #[test]
    fn from_seed_rejects_unavailable_current_step() {
        let mut bad = seed();
        bad.current_step = WizardStep::ItemManager;
        let err = WizardState::from_seed(AggregateId::new(), bad, 8).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn from_seed_rejects_item_flag_mismatch() {
        let mut bad = seed();
        bad.item_wizard_active = true;
        let err = WizardState::from_seed(AggregateId::new(), bad, 8).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn from_seed_keeps_mode_authoritative() {
        let mut s = seed();
        s.mode = WizardMode::View;
        let state = WizardState::from_seed(AggregateId::new(), s, 8).unwrap();
        assert_eq!(state.mode(), WizardMode::View);
        assert_eq!(state.context().mode, WizardMode::View);
    }

    #[test]
    fn drain_returns_envelopes_and_clears() {
        let mut state = fresh();
        state.update_status(WizardStatus::Loading);
        state.set_item_wizard_active(true);

        let drained = state.drain_events();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].sequence_number(), 1);
        assert!(state.events().is_empty());
    }
}
