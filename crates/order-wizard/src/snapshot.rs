//! Persistence contract: everything needed to rebuild a wizard session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::availability::StepAvailability;
use crate::collaborators::PriceBreakdown;
use crate::context::{WizardContext, WizardMode, WizardStatus};
use crate::navigation::StepHistoryEntry;
use crate::step::WizardStep;
use crate::wizard::WizardId;

/// Serializable copy of a wizard session.
///
/// Restoring reads every field as stored; nothing is recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub id: WizardId,
    pub current_step: WizardStep,
    pub mode: WizardMode,
    pub status: WizardStatus,
    pub context: WizardContext,
    pub step_history: Vec<StepHistoryEntry>,
    pub availability: StepAvailability,
    pub is_item_wizard_active: bool,
    #[serde(default)]
    pub completed_steps: BTreeSet<WizardStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_breakdown: Option<PriceBreakdown>,
    #[serde(default)]
    pub version: u64,
}
