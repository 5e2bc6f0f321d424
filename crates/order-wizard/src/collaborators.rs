//! Seams to the data-fetch and pricing collaborators.
//!
//! The engine never calls the network. It receives already-resolved lookups
//! and hands pricing to a [`PriceCalculator`] whose answer it stores as is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::validation::ValidationResult;

/// A client/branch/item/pricing lookup that did not return data.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{collaborator} lookup failed: {message}")]
pub struct LookupFailure {
    pub collaborator: String,
    pub message: String,
}

impl LookupFailure {
    pub fn new(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }
}

pub type LookupResult<T> = Result<T, LookupFailure>;

/// Unwrap a resolved lookup, turning a failure into a warning on `validation`.
pub fn surface_lookup<T>(result: LookupResult<T>, validation: &mut ValidationResult) -> Option<T> {
    match result {
        Ok(data) => Some(data),
        Err(failure) => {
            tracing::warn!(collaborator = %failure.collaborator, message = %failure.message, "lookup failed");
            validation.push_warning(failure.to_string());
            None
        }
    }
}

/// Item characteristics sent for pricing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    pub category: String,
    pub item_name: String,
    pub quantity: u64,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub characteristics: Map<String, Value>,
}

/// Calculator result. Stored and returned untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceBreakdown(Value);

impl PriceBreakdown {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PricingFailure(pub String);

/// Pure pricing function provided by the surrounding application.
pub trait PriceCalculator {
    fn calculate(&self, request: &PriceRequest) -> Result<PriceBreakdown, PricingFailure>;
}

impl<F> PriceCalculator for F
where
    F: Fn(&PriceRequest) -> Result<PriceBreakdown, PricingFailure>,
{
    fn calculate(&self, request: &PriceRequest) -> Result<PriceBreakdown, PricingFailure> {
        self(request)
    }
}
