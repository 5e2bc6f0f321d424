use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use aksi_events::Event;

use crate::step::WizardStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardEventKind {
    StepEntered,
    WizardStarted,
    ItemWizardStarted,
    ItemWizardCompleted,
    StepCompleted,
    WizardReset,
}

/// Something that happened to a wizard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardDomainEvent {
    #[serde(rename = "type")]
    pub kind: WizardEventKind,
    pub timestamp: DateTime<Utc>,
    /// Current step when the event was emitted.
    pub step: WizardStep,
    #[serde(default)]
    pub payload: Value,
}

impl WizardDomainEvent {
    pub fn new(kind: WizardEventKind, step: WizardStep, payload: Value) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            step,
            payload,
        }
    }
}

impl Event for WizardDomainEvent {
    fn event_type(&self) -> &'static str {
        match self.kind {
            WizardEventKind::StepEntered => "wizard.step.entered",
            WizardEventKind::WizardStarted => "wizard.started",
            WizardEventKind::ItemWizardStarted => "wizard.item.started",
            WizardEventKind::ItemWizardCompleted => "wizard.item.completed",
            WizardEventKind::StepCompleted => "wizard.step.completed",
            WizardEventKind::WizardReset => "wizard.reset",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
