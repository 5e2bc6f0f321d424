//! Order-intake wizard engine.
//!
//! Drives an operator through the main order flow and the nested per-item
//! flow: which step is current, which steps are reachable, how the user moved
//! between them, and whether the collected data is acceptable. Pure domain
//! logic; persistence, pricing and catalog lookups are supplied by callers.

pub mod availability;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod item_wizard;
pub mod navigation;
pub mod snapshot;
pub mod state;
pub mod step;
pub mod validation;
pub mod wizard;

pub use availability::StepAvailability;
pub use collaborators::{
    LookupFailure, LookupResult, PriceBreakdown, PriceCalculator, PriceRequest, PricingFailure,
    surface_lookup,
};
pub use config::WizardConfig;
pub use context::{WizardContext, WizardMode, WizardStatus};
pub use error::{WizardError, WizardResult};
pub use event::{WizardDomainEvent, WizardEventKind};
pub use item_wizard::{ItemWizardController, ItemWizardOutcome};
pub use navigation::{Navigator, StepHistoryEntry};
pub use snapshot::WizardSnapshot;
pub use state::{StateSeed, WizardState};
pub use step::{NavigationDirection, StepCatalog, WizardStep};
pub use validation::{
    CompletionReport, CompletionValidator, StepRule, StepValidator, TransitionValidator,
    ValidationResult, WizardValidator,
};
pub use wizard::{OrderWizard, WizardId, WizardView};
