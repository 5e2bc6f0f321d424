use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the operator is doing with the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardMode {
    #[default]
    Create,
    Edit,
    View,
}

impl WizardMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WizardMode::Create => "create",
            WizardMode::Edit => "edit",
            WizardMode::View => "view",
        }
    }
}

/// Coarse activity indicator for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStatus {
    #[default]
    Idle,
    Loading,
    Submitting,
    Error,
}

/// Session context supplied at initialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardContext {
    pub mode: WizardMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl WizardContext {
    pub fn new(mode: WizardMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Errors that make this context unusable; empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let has_order = self.order_id.as_deref().is_some_and(|id| !id.trim().is_empty());
        if matches!(self.mode, WizardMode::Edit | WizardMode::View) && !has_order {
            errors.push(format!("{} mode requires an order id", self.mode.as_str()));
        }

        if self.customer_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            errors.push("customer id must not be blank".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_mode_needs_nothing() {
        assert!(WizardContext::new(WizardMode::Create).validate().is_empty());
    }

    #[test]
    fn edit_and_view_need_an_order() {
        for mode in [WizardMode::Edit, WizardMode::View] {
            let errors = WizardContext::new(mode).validate();
            assert_eq!(errors.len(), 1);

            let ok = WizardContext::new(mode).with_order_id("ord-1").validate();
            assert!(ok.is_empty());
        }

        let blank = WizardContext::new(WizardMode::Edit).with_order_id("  ").validate();
        assert_eq!(blank.len(), 1);
    }

    #[test]
    fn blank_customer_is_rejected() {
        let errors = WizardContext::new(WizardMode::Create)
            .with_customer_id("")
            .validate();
        assert_eq!(errors, vec!["customer id must not be blank".to_string()]);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let ctx = WizardContext::new(WizardMode::Edit)
            .with_order_id("ord-1")
            .with_metadata("sessionId", Value::from("s-1"));
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["mode"], "edit");
        assert_eq!(json["orderId"], "ord-1");
        assert!(json.get("customerId").is_none());
        assert_eq!(json["metadata"]["sessionId"], "s-1");
    }
}
