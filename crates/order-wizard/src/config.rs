//! Engine limits and sizing.

use serde::{Deserialize, Serialize};

/// Tunables for one wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Undrained events kept before the oldest is dropped.
    pub event_log_capacity: usize,
    pub max_items_per_order: usize,
    pub max_photos_per_item: usize,
    pub max_item_quantity: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            event_log_capacity: 256,
            max_items_per_order: 50,
            max_photos_per_item: 5,
            max_item_quantity: 100,
        }
    }
}

impl WizardConfig {
    /// Read overrides from `AKSI_WIZARD_*` variables.
    ///
    /// Unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            event_log_capacity: parse("AKSI_WIZARD_EVENT_CAPACITY")
                .map(|v| v as usize)
                .unwrap_or(defaults.event_log_capacity),
            max_items_per_order: parse("AKSI_WIZARD_MAX_ITEMS")
                .map(|v| v as usize)
                .unwrap_or(defaults.max_items_per_order),
            max_photos_per_item: parse("AKSI_WIZARD_MAX_PHOTOS")
                .map(|v| v as usize)
                .unwrap_or(defaults.max_photos_per_item),
            max_item_quantity: parse("AKSI_WIZARD_MAX_QUANTITY").unwrap_or(defaults.max_item_quantity),
        }
    }
}
