//! Step catalog: the two fixed step sequences and their ordering.

use core::fmt;
use core::str::FromStr;

use aksi_core::DomainError;
use serde::{Deserialize, Serialize};

/// One of the ten known wizard steps (five main + five item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    ClientSelection,
    BranchSelection,
    ItemManager,
    OrderParameters,
    OrderConfirmation,
    ItemBasicInfo,
    ItemProperties,
    DefectsStains,
    PriceCalculator,
    PhotoDocumentation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 10] = [
        WizardStep::ClientSelection,
        WizardStep::BranchSelection,
        WizardStep::ItemManager,
        WizardStep::OrderParameters,
        WizardStep::OrderConfirmation,
        WizardStep::ItemBasicInfo,
        WizardStep::ItemProperties,
        WizardStep::DefectsStains,
        WizardStep::PriceCalculator,
        WizardStep::PhotoDocumentation,
    ];

    /// Stable wire tag (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::ClientSelection => "clientSelection",
            WizardStep::BranchSelection => "branchSelection",
            WizardStep::ItemManager => "itemManager",
            WizardStep::OrderParameters => "orderParameters",
            WizardStep::OrderConfirmation => "orderConfirmation",
            WizardStep::ItemBasicInfo => "itemBasicInfo",
            WizardStep::ItemProperties => "itemProperties",
            WizardStep::DefectsStains => "defectsStains",
            WizardStep::PriceCalculator => "priceCalculator",
            WizardStep::PhotoDocumentation => "photoDocumentation",
        }
    }

    /// The catalog this step belongs to. Catalogs never overlap.
    pub fn catalog(self) -> StepCatalog {
        match self {
            WizardStep::ClientSelection
            | WizardStep::BranchSelection
            | WizardStep::ItemManager
            | WizardStep::OrderParameters
            | WizardStep::OrderConfirmation => StepCatalog::Main,
            WizardStep::ItemBasicInfo
            | WizardStep::ItemProperties
            | WizardStep::DefectsStains
            | WizardStep::PriceCalculator
            | WizardStep::PhotoDocumentation => StepCatalog::Item,
        }
    }

    pub fn is_item_step(self) -> bool {
        self.catalog() == StepCatalog::Item
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStep {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WizardStep::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown wizard step: {s}")))
    }
}

const MAIN_STEPS: [WizardStep; 5] = [
    WizardStep::ClientSelection,
    WizardStep::BranchSelection,
    WizardStep::ItemManager,
    WizardStep::OrderParameters,
    WizardStep::OrderConfirmation,
];

const ITEM_STEPS: [WizardStep; 5] = [
    WizardStep::ItemBasicInfo,
    WizardStep::ItemProperties,
    WizardStep::DefectsStains,
    WizardStep::PriceCalculator,
    WizardStep::PhotoDocumentation,
];

/// An ordered step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepCatalog {
    /// client → branch → item management → order parameters → confirmation
    Main,
    /// basic info → properties → defects/stains → price → photos
    Item,
}

impl StepCatalog {
    pub fn steps(self) -> &'static [WizardStep] {
        match self {
            StepCatalog::Main => &MAIN_STEPS,
            StepCatalog::Item => &ITEM_STEPS,
        }
    }

    pub fn step_count(self) -> usize {
        self.steps().len()
    }

    pub fn first(self) -> WizardStep {
        self.steps()[0]
    }

    pub fn last(self) -> WizardStep {
        self.steps()[self.step_count() - 1]
    }

    pub fn contains(self, step: WizardStep) -> bool {
        step.catalog() == self
    }

    pub fn index_of(self, step: WizardStep) -> Option<usize> {
        self.steps().iter().position(|s| *s == step)
    }

    /// The step after `step`, or `None` at the end or for a foreign step.
    pub fn next_after(self, step: WizardStep) -> Option<WizardStep> {
        let index = self.index_of(step)?;
        self.steps().get(index + 1).copied()
    }

    /// The step before `step`, or `None` at the start or for a foreign step.
    pub fn previous_before(self, step: WizardStep) -> Option<WizardStep> {
        let index = self.index_of(step)?;
        index.checked_sub(1).map(|i| self.steps()[i])
    }
}

/// How a history entry was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationDirection {
    Forward,
    Backward,
    Jump,
}

impl NavigationDirection {
    /// Direction of a move from `from` to `to` within `catalog`.
    ///
    /// Equal positions, or either step outside `catalog`, count as a jump.
    pub fn between(catalog: StepCatalog, from: WizardStep, to: WizardStep) -> Self {
        match (catalog.index_of(from), catalog.index_of(to)) {
            (Some(a), Some(b)) if b > a => NavigationDirection::Forward,
            (Some(a), Some(b)) if b < a => NavigationDirection::Backward,
            _ => NavigationDirection::Jump,
        }
    }
}
