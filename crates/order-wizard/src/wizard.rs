//! The order wizard: one session's state holder, navigator, item sub-wizard
//! and validators behind a single API.

use std::collections::BTreeSet;

use aksi_core::{AggregateId, AggregateRoot};
use aksi_events::EventEnvelope;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::availability::StepAvailability;
use crate::collaborators::{PriceBreakdown, PriceCalculator, PriceRequest};
use crate::config::WizardConfig;
use crate::context::{WizardContext, WizardMode, WizardStatus};
use crate::error::{WizardError, WizardResult};
use crate::event::{WizardDomainEvent, WizardEventKind};
use crate::item_wizard::{ItemWizardController, ItemWizardOutcome};
use crate::navigation::{Navigator, StepHistoryEntry};
use crate::snapshot::WizardSnapshot;
use crate::state::{StateSeed, WizardState};
use crate::step::{NavigationDirection, StepCatalog, WizardStep};
use crate::validation::{CompletionReport, ValidationResult, WizardValidator, rounded_percent};

/// Wizard session identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WizardId(pub AggregateId);

impl WizardId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for WizardId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What the UI renders from. Built from copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub current_step: WizardStep,
    pub mode: WizardMode,
    pub status: WizardStatus,
    pub availability: StepAvailability,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub previous_step: Option<WizardStep>,
    pub progress: u8,
    pub is_item_wizard_active: bool,
    pub history_len: usize,
}

#[derive(Debug, Clone)]
struct Session {
    state: WizardState,
    navigator: Navigator,
    completed: BTreeSet<WizardStep>,
    price_breakdown: Option<PriceBreakdown>,
}

impl Session {
    fn completed_list(&self) -> Vec<WizardStep> {
        self.completed.iter().copied().collect()
    }

    fn forget_item_cycle(&mut self) {
        self.completed.retain(|step| !step.is_item_step());
        self.price_breakdown = None;
    }
}

/// Aggregate root for one order-intake session.
///
/// Constructed once per editing session and passed to whatever needs it.
/// Every operation either fully applies or fails with the wizard unchanged.
#[derive(Debug, Clone)]
pub struct OrderWizard {
    id: WizardId,
    config: WizardConfig,
    validator: WizardValidator,
    items: ItemWizardController,
    session: Option<Session>,
    version: u64,
}

impl OrderWizard {
    pub fn new(config: WizardConfig) -> Self {
        Self::with_id(WizardId::new(AggregateId::new()), config)
    }

    pub fn with_id(id: WizardId, config: WizardConfig) -> Self {
        Self {
            id,
            validator: WizardValidator::new(config.clone()),
            config,
            items: ItemWizardController,
            session: None,
            version: 0,
        }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn validator_mut(&mut self) -> &mut WizardValidator {
        &mut self.validator
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Start a session. Replaces any session already running.
    pub fn initialize(&mut self, context: WizardContext) -> WizardResult<()> {
        let errors = context.validate();
        if !errors.is_empty() {
            tracing::warn!(wizard_id = %self.id, ?errors, "initialize refused: invalid context");
            return Err(WizardError::InvalidContext(errors));
        }

        let mode = context.mode;
        let mut state = WizardState::new(self.id.0, context, self.config.event_log_capacity);
        state.emit(
            WizardEventKind::WizardStarted,
            json!({ "mode": mode, "previousMode": Value::Null }),
        );
        let navigator = Navigator::new(state.current_step());

        self.session = Some(Session {
            state,
            navigator,
            completed: BTreeSet::new(),
            price_breakdown: None,
        });
        self.version += 1;

        tracing::info!(wizard_id = %self.id, mode = mode.as_str(), "wizard initialized");
        Ok(())
    }

    /// Back to the first step with initial availability; context is kept.
    pub fn reset(&mut self) -> WizardResult<()> {
        let session = self.session.as_mut().ok_or(WizardError::NotInitialized)?;

        session.navigator.reset(&mut session.state);
        session.state.reseed();
        session.completed.clear();
        session.price_breakdown = None;
        session.state.emit(WizardEventKind::WizardReset, Value::Null);
        self.version += 1;

        tracing::info!(wizard_id = %self.id, "wizard reset");
        Ok(())
    }

    fn session(&self) -> WizardResult<&Session> {
        self.session.as_ref().ok_or(WizardError::NotInitialized)
    }

    fn session_mut(&mut self) -> WizardResult<&mut Session> {
        self.session.as_mut().ok_or(WizardError::NotInitialized)
    }

    // ---- reads ----

    pub fn current_step(&self) -> WizardResult<WizardStep> {
        Ok(self.session()?.state.current_step())
    }

    pub fn mode(&self) -> WizardResult<WizardMode> {
        Ok(self.session()?.state.mode())
    }

    pub fn status(&self) -> WizardResult<WizardStatus> {
        Ok(self.session()?.state.status())
    }

    pub fn context(&self) -> WizardResult<WizardContext> {
        Ok(self.session()?.state.context())
    }

    pub fn availability(&self) -> WizardResult<StepAvailability> {
        Ok(self.session()?.state.availability())
    }

    pub fn history(&self) -> WizardResult<Vec<StepHistoryEntry>> {
        Ok(self.session()?.navigator.entries())
    }

    pub fn completed_steps(&self) -> WizardResult<Vec<WizardStep>> {
        Ok(self.session()?.completed_list())
    }

    pub fn is_item_wizard_active(&self) -> WizardResult<bool> {
        Ok(self.session()?.state.is_item_wizard_active())
    }

    pub fn can_go_back(&self) -> WizardResult<bool> {
        let session = self.session()?;
        Ok(session.navigator.can_go_back(&session.state))
    }

    pub fn can_go_forward(&self) -> WizardResult<bool> {
        let session = self.session()?;
        Ok(session.navigator.can_go_forward(&session.state))
    }

    pub fn previous_step(&self) -> WizardResult<Option<WizardStep>> {
        Ok(self.session()?.navigator.previous_step())
    }

    pub fn price_breakdown(&self) -> WizardResult<Option<PriceBreakdown>> {
        Ok(self.session()?.price_breakdown.clone())
    }

    /// Position within the active catalog: `round(100 × (index + 1) / len)`.
    pub fn calculate_progress(&self) -> WizardResult<u8> {
        let state = &self.session()?.state;
        let catalog = state.active_catalog();
        let position = catalog
            .index_of(state.current_step())
            .map_or(0, |index| index + 1);
        Ok(rounded_percent(position, catalog.step_count()))
    }

    pub fn view(&self) -> WizardResult<WizardView> {
        let session = self.session()?;
        let state = &session.state;
        Ok(WizardView {
            current_step: state.current_step(),
            mode: state.mode(),
            status: state.status(),
            availability: state.availability(),
            can_go_back: session.navigator.can_go_back(state),
            can_go_forward: session.navigator.can_go_forward(state),
            previous_step: session.navigator.previous_step(),
            progress: self.calculate_progress()?,
            is_item_wizard_active: state.is_item_wizard_active(),
            history_len: session.navigator.len(),
        })
    }

    // ---- navigation ----

    /// Move to `step` if the transition is legal and the step is available.
    pub fn navigate_to_step(&mut self, step: WizardStep) -> WizardResult<NavigationDirection> {
        let from = self.current_step()?;

        let transition = self.validator.validate_transition(from, step);
        if !transition.is_valid {
            tracing::warn!(wizard_id = %self.id, from = %from, to = %step, "transition rejected");
            return Err(WizardError::TransitionRejected {
                from,
                to: step,
                errors: transition.errors,
            });
        }

        let session = self.session_mut()?;
        match (session.state.is_item_wizard_active(), step.is_item_step()) {
            (true, false) => return Err(WizardError::ItemWizardActive),
            (false, true) => return Err(WizardError::ItemWizardNotActive),
            _ => {}
        }

        let direction = session
            .navigator
            .navigate_to_step(&mut session.state, step)?;
        self.version += 1;
        Ok(direction)
    }

    pub fn go_back(&mut self) -> WizardResult<WizardStep> {
        let session = self.session_mut()?;
        let step = session.navigator.go_back(&mut session.state)?;
        self.version += 1;
        Ok(step)
    }

    pub fn go_forward(&mut self) -> WizardResult<WizardStep> {
        let session = self.session_mut()?;
        let step = session.navigator.go_forward(&mut session.state)?;
        self.version += 1;
        Ok(step)
    }

    pub fn set_step_availability(&mut self, step: WizardStep, is_available: bool) -> WizardResult<()> {
        let session = self.session_mut()?;
        session.state.update_step_availability(step, is_available)?;
        self.version += 1;
        Ok(())
    }

    /// Record `step` (the current step) as done and open the next one.
    pub fn complete_step(&mut self, step: WizardStep) -> WizardResult<()> {
        let session = self.session_mut()?;
        let current = session.state.current_step();
        if step != current {
            return Err(WizardError::StepNotCompletable {
                step,
                reason: format!("current step is {current}"),
            });
        }

        session.completed.insert(step);
        let next = step.catalog().next_after(step);
        if let Some(next) = next {
            session.state.open_step(next);
        }
        session
            .state
            .emit(WizardEventKind::StepCompleted, json!({ "next": next }));
        self.version += 1;

        tracing::debug!(wizard_id = %self.id, step = %step, "step completed");
        Ok(())
    }

    /// Recompute availability from completed steps; the current step stays open.
    pub fn refresh_availability(&mut self) -> WizardResult<()> {
        let session = self.session_mut()?;
        let mut availability =
            StepAvailability::derive(&session.completed, session.state.is_item_wizard_active());
        availability.set(session.state.current_step(), true);
        session.state.replace_availability(availability)?;
        self.version += 1;
        Ok(())
    }

    // ---- item sub-wizard ----

    pub fn start_item_wizard(&mut self) -> WizardResult<()> {
        let items = self.items;
        let session = self.session_mut()?;
        items.start(&mut session.state, &mut session.navigator)?;
        session.forget_item_cycle();
        self.version += 1;
        Ok(())
    }

    /// Leave the item flow. With `save_item == false` the item's completion
    /// marks and price are dropped; the item data itself belongs to the
    /// item-management collaborator.
    pub fn finish_item_wizard(&mut self, save_item: bool) -> WizardResult<ItemWizardOutcome> {
        let items = self.items;
        let session = self.session_mut()?;
        let outcome = items.finish(&mut session.state, &mut session.navigator, save_item)?;
        if !save_item {
            session.forget_item_cycle();
        }
        self.version += 1;
        Ok(outcome)
    }

    /// Ask the pricing collaborator and keep its answer for the current item.
    pub fn apply_pricing(
        &mut self,
        calculator: &dyn PriceCalculator,
        request: &PriceRequest,
    ) -> WizardResult<PriceBreakdown> {
        let session = self.session_mut()?;
        if !session.state.is_item_wizard_active() {
            return Err(WizardError::ItemWizardNotActive);
        }

        let breakdown = calculator.calculate(request).map_err(|failure| {
            tracing::warn!(error = %failure, "price calculation failed");
            WizardError::Pricing(failure.0)
        })?;
        session.price_breakdown = Some(breakdown.clone());
        self.version += 1;
        Ok(breakdown)
    }

    // ---- mode / status ----

    pub fn update_mode(&mut self, mode: WizardMode) -> WizardResult<()> {
        let session = self.session_mut()?;
        let mut candidate = session.state.context();
        candidate.mode = mode;
        let errors = candidate.validate();
        if !errors.is_empty() {
            return Err(WizardError::InvalidContext(errors));
        }

        session.state.update_mode(mode);
        self.version += 1;
        Ok(())
    }

    pub fn update_status(&mut self, status: WizardStatus) -> WizardResult<()> {
        self.session_mut()?.state.update_status(status);
        self.version += 1;
        Ok(())
    }

    // ---- validation ----

    pub fn validate_step(&self, step: WizardStep, data: &Value) -> ValidationResult {
        self.validator.validate_step(step, data)
    }

    pub fn validate_transition(&self, from: WizardStep, to: WizardStep) -> ValidationResult {
        self.validator.validate_transition(from, to)
    }

    /// Transition check for raw step tags, as received from a client.
    pub fn validate_transition_tags(&self, from: &str, to: &str) -> ValidationResult {
        self.validator.validate_transition_tags(from, to)
    }

    pub fn completion_report(&self) -> WizardResult<CompletionReport> {
        let completed = self.session()?.completed_list();
        Ok(self.validator.completion_report(&completed))
    }

    pub fn can_complete_wizard(&self) -> WizardResult<bool> {
        let completed = self.session()?.completed_list();
        Ok(self.validator.can_complete_wizard(&completed))
    }

    pub fn completion_percentage(&self, catalog: StepCatalog) -> WizardResult<u8> {
        let completed = self.session()?.completed_list();
        Ok(self.validator.completion_percentage(&completed, catalog))
    }

    // ---- events ----

    pub fn events(&self) -> Vec<WizardDomainEvent> {
        self.session
            .as_ref()
            .map(|s| s.state.events())
            .unwrap_or_default()
    }

    pub fn drain_events(&mut self) -> Vec<EventEnvelope<WizardDomainEvent>> {
        self.session
            .as_mut()
            .map(|s| s.state.drain_events())
            .unwrap_or_default()
    }

    pub fn clear_events(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.state.clear_events();
        }
    }

    // ---- persistence ----

    pub fn snapshot(&self) -> WizardResult<WizardSnapshot> {
        let session = self.session()?;
        let state = &session.state;
        Ok(WizardSnapshot {
            id: self.id,
            current_step: state.current_step(),
            mode: state.mode(),
            status: state.status(),
            context: state.context(),
            step_history: session.navigator.entries(),
            availability: state.availability(),
            is_item_wizard_active: state.is_item_wizard_active(),
            completed_steps: session.completed.clone(),
            price_breakdown: session.price_breakdown.clone(),
            version: self.version,
        })
    }

    /// Rebuild a session exactly as stored.
    pub fn restore(snapshot: WizardSnapshot, config: WizardConfig) -> WizardResult<Self> {
        let id = snapshot.id;
        let seed = StateSeed {
            current_step: snapshot.current_step,
            mode: snapshot.mode,
            status: snapshot.status,
            context: snapshot.context,
            availability: snapshot.availability,
            item_wizard_active: snapshot.is_item_wizard_active,
        };

        let restored = WizardState::from_seed(id.0, seed, config.event_log_capacity).and_then(|state| {
            let navigator = Navigator::from_entries(snapshot.step_history, state.current_step())?;
            Ok((state, navigator))
        });
        let (state, navigator) = restored.map_err(|err| {
            tracing::error!(wizard_id = %id, error = %err, "snapshot violates wizard invariants");
            err
        })?;

        let mut wizard = Self::with_id(id, config);
        wizard.session = Some(Session {
            state,
            navigator,
            completed: snapshot.completed_steps,
            price_breakdown: snapshot.price_breakdown,
        });
        wizard.version = snapshot.version;
        Ok(wizard)
    }
}

impl AggregateRoot for OrderWizard {
    type Id = WizardId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
