//! Per-step data checks.
//!
//! Rules are looked up in a table keyed by step. Payloads are opaque JSON; a
//! payload that is not an object carries nothing to check and passes.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::WizardConfig;
use crate::step::WizardStep;
use crate::validation::ValidationResult;

/// A single step's check over an object payload.
pub type StepRule = fn(&Map<String, Value>, &WizardConfig, &mut ValidationResult);

const PAYMENT_METHODS: [&str; 3] = ["terminal", "cash", "account"];
const URGENCY_TYPES: [&str; 3] = ["normal", "urgent_48h", "urgent_24h"];
const DISCOUNT_TYPES: [&str; 5] = ["none", "evercard", "social", "military", "other"];
const COLOR_LEN: (usize, usize) = (2, 30);
const MAX_ITEM_NOTES_LEN: usize = 300;

#[derive(Debug, Clone)]
pub struct StepValidator {
    config: WizardConfig,
    rules: BTreeMap<WizardStep, StepRule>,
}

impl StepValidator {
    pub fn new(config: WizardConfig) -> Self {
        let mut rules: BTreeMap<WizardStep, StepRule> = BTreeMap::new();
        rules.insert(WizardStep::ClientSelection, client_selection);
        rules.insert(WizardStep::BranchSelection, branch_selection);
        rules.insert(WizardStep::ItemManager, item_manager);
        rules.insert(WizardStep::OrderParameters, order_parameters);
        rules.insert(WizardStep::OrderConfirmation, order_confirmation);
        rules.insert(WizardStep::ItemBasicInfo, item_basic_info);
        rules.insert(WizardStep::ItemProperties, item_properties);
        rules.insert(WizardStep::DefectsStains, defects_stains);
        rules.insert(WizardStep::PriceCalculator, price_calculator);
        rules.insert(WizardStep::PhotoDocumentation, photo_documentation);
        Self { config, rules }
    }

    /// Replace the rule for `step`.
    pub fn register(&mut self, step: WizardStep, rule: StepRule) {
        self.rules.insert(step, rule);
    }

    pub fn validate(&self, step: WizardStep, data: &Value) -> ValidationResult {
        let mut result = ValidationResult::valid();
        if let (Some(rule), Some(fields)) = (self.rules.get(&step), data.as_object()) {
            rule(fields, &self.config, &mut result);
        }
        result
    }
}

fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn flag(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn require_text(fields: &Map<String, Value>, key: &str, result: &mut ValidationResult) {
    if text(fields, key).is_none() {
        result.push_error(format!("{key} is required"));
    }
}

fn require_one_of(
    fields: &Map<String, Value>,
    key: &str,
    allowed: &[&str],
    required: bool,
    result: &mut ValidationResult,
) {
    match text(fields, key) {
        Some(value) if allowed.contains(&value) => {}
        Some(value) => result.push_error(format!(
            "{key} must be one of {}, got {value}",
            allowed.join(", ")
        )),
        None if required => result.push_error(format!("{key} is required")),
        None => {}
    }
}

fn client_selection(fields: &Map<String, Value>, _: &WizardConfig, result: &mut ValidationResult) {
    require_text(fields, "customerId", result);
    if flag(fields, "isNewClient") {
        for key in ["firstName", "lastName", "phone"] {
            require_text(fields, key, result);
        }
    }
}

fn branch_selection(fields: &Map<String, Value>, _: &WizardConfig, result: &mut ValidationResult) {
    require_text(fields, "branchId", result);
}

fn item_manager(fields: &Map<String, Value>, config: &WizardConfig, result: &mut ValidationResult) {
    match fields.get("items").and_then(Value::as_array) {
        Some(items) if items.is_empty() => result.push_error("order must contain at least one item"),
        Some(items) if items.len() > config.max_items_per_order => result.push_error(format!(
            "order may contain at most {} items, got {}",
            config.max_items_per_order,
            items.len()
        )),
        Some(_) => {}
        None => result.push_error("items is required"),
    }
}

fn order_parameters(fields: &Map<String, Value>, _: &WizardConfig, result: &mut ValidationResult) {
    require_text(fields, "executionDate", result);
    require_one_of(fields, "paymentMethod", &PAYMENT_METHODS, true, result);
    require_one_of(fields, "urgencyType", &URGENCY_TYPES, false, result);
    require_one_of(fields, "discountType", &DISCOUNT_TYPES, false, result);

    let urgent = text(fields, "urgencyType").is_some_and(|u| u != "normal");
    let discounted = text(fields, "discountType").is_some_and(|d| d != "none");
    if urgent && discounted {
        result.push_warning("discount combined with urgent execution; check that both apply");
    }
}

fn order_confirmation(fields: &Map<String, Value>, _: &WizardConfig, result: &mut ValidationResult) {
    if !flag(fields, "termsAccepted") {
        result.push_error("terms must be accepted");
    }
    if flag(fields, "requireSignature") {
        require_text(fields, "signatureData", result);
    }
}

fn item_basic_info(fields: &Map<String, Value>, config: &WizardConfig, result: &mut ValidationResult) {
    for key in ["categoryName", "itemName", "unit"] {
        require_text(fields, key, result);
    }
    match fields.get("quantity").and_then(Value::as_f64) {
        Some(q) if q >= 1.0 && q <= config.max_item_quantity as f64 => {}
        Some(q) => result.push_error(format!(
            "quantity must be between 1 and {}, got {q}",
            config.max_item_quantity
        )),
        None => result.push_error("quantity is required"),
    }
}

fn item_properties(fields: &Map<String, Value>, _: &WizardConfig, result: &mut ValidationResult) {
    if let Some(color) = text(fields, "color") {
        let len = color.chars().count();
        if len < COLOR_LEN.0 || len > COLOR_LEN.1 {
            result.push_error(format!(
                "color must be {}-{} characters",
                COLOR_LEN.0, COLOR_LEN.1
            ));
        }
    }
    if text(fields, "material").is_none() {
        result.push_warning("material not specified");
    }
}

fn defects_stains(fields: &Map<String, Value>, _: &WizardConfig, result: &mut ValidationResult) {
    if let Some(notes) = fields.get("notes").and_then(Value::as_str) {
        if notes.chars().count() > MAX_ITEM_NOTES_LEN {
            result.push_error(format!("notes may be at most {MAX_ITEM_NOTES_LEN} characters"));
        }
    }
    if flag(fields, "noGuarantee") {
        require_text(fields, "noGuaranteeReason", result);
    }
}

fn price_calculator(fields: &Map<String, Value>, _: &WizardConfig, result: &mut ValidationResult) {
    match fields.get("finalPrice").and_then(Value::as_f64) {
        Some(price) if price > 0.0 => {}
        Some(_) => result.push_error("finalPrice must be greater than 0"),
        None => result.push_error("finalPrice is required"),
    }
}

fn photo_documentation(fields: &Map<String, Value>, config: &WizardConfig, result: &mut ValidationResult) {
    let count = fields
        .get("photos")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    if count == 0 {
        result.push_warning("no photos attached");
    } else if count > config.max_photos_per_item {
        result.push_error(format!(
            "at most {} photos per item, got {count}",
            config.max_photos_per_item
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> StepValidator {
        StepValidator::new(WizardConfig::default())
    }

    #[test]
    fn non_object_payload_has_nothing_to_validate() {
        let v = validator();
        for step in WizardStep::ALL {
            let result = v.validate(step, &Value::Null);
            assert!(result.is_valid, "{step}");
            assert!(v.validate(step, &json!([1, 2])).is_valid);
        }
    }

    #[test]
    fn client_selection_needs_customer() {
        let v = validator();
        assert!(!v.validate(WizardStep::ClientSelection, &json!({ "customerId": "" })).is_valid);
        assert!(v.validate(WizardStep::ClientSelection, &json!({ "customerId": "c-1" })).is_valid);

        let new_client = v.validate(
            WizardStep::ClientSelection,
            &json!({ "customerId": "c-1", "isNewClient": true, "firstName": "Olena" }),
        );
        assert_eq!(
            new_client.errors,
            vec!["lastName is required".to_string(), "phone is required".to_string()]
        );
    }

    #[test]
    fn item_manager_needs_items_within_limit() {
        let v = validator();
        let empty = v.validate(WizardStep::ItemManager, &json!({ "items": [] }));
        assert_eq!(empty.errors, vec!["order must contain at least one item".to_string()]);
        assert!(!empty.can_proceed);

        assert!(v.validate(WizardStep::ItemManager, &json!({ "items": [{ "id": "i-1" }] })).is_valid);

        let small = StepValidator::new(WizardConfig {
            max_items_per_order: 1,
            ..WizardConfig::default()
        });
        assert!(!small.validate(WizardStep::ItemManager, &json!({ "items": [1, 2] })).is_valid);
    }

    #[test]
    fn order_parameters_checks_enums_and_warns_on_combination() {
        let v = validator();
        let bad = v.validate(
            WizardStep::OrderParameters,
            &json!({ "executionDate": "2026-10-20", "paymentMethod": "crypto" }),
        );
        assert_eq!(bad.errors.len(), 1);
        assert!(bad.errors[0].starts_with("paymentMethod must be one of"));

        let warned = v.validate(
            WizardStep::OrderParameters,
            &json!({
                "executionDate": "2026-10-20",
                "paymentMethod": "cash",
                "urgencyType": "urgent_24h",
                "discountType": "military"
            }),
        );
        assert!(warned.is_valid);
        assert_eq!(warned.warnings.len(), 1);
    }

    #[test]
    fn confirmation_requires_terms_and_optional_signature() {
        let v = validator();
        assert!(!v.validate(WizardStep::OrderConfirmation, &json!({})).is_valid);
        assert!(v.validate(WizardStep::OrderConfirmation, &json!({ "termsAccepted": true })).is_valid);
        assert!(
            !v.validate(
                WizardStep::OrderConfirmation,
                &json!({ "termsAccepted": true, "requireSignature": true })
            )
            .is_valid
        );
    }

    #[test]
    fn item_basic_info_checks_quantity_range() {
        let v = validator();
        let base = json!({ "categoryName": "Clothing", "itemName": "Coat", "unit": "pcs", "quantity": 2 });
        assert!(v.validate(WizardStep::ItemBasicInfo, &base).is_valid);

        let mut zero = base.clone();
        zero["quantity"] = json!(0);
        assert!(!v.validate(WizardStep::ItemBasicInfo, &zero).is_valid);

        let mut fraction = base.clone();
        fraction["quantity"] = json!(0.5);
        let result = v.validate(WizardStep::ItemBasicInfo, &fraction);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);

        let mut huge = base;
        huge["quantity"] = json!(101);
        assert!(!v.validate(WizardStep::ItemBasicInfo, &huge).is_valid);
    }

    #[test]
    fn item_rules() {
        let v = validator();

        let props = v.validate(WizardStep::ItemProperties, &json!({ "color": "r" }));
        assert!(!props.is_valid);
        assert_eq!(props.warnings, vec!["material not specified".to_string()]);

        let defects = v.validate(WizardStep::DefectsStains, &json!({ "noGuarantee": true }));
        assert_eq!(defects.errors, vec!["noGuaranteeReason is required".to_string()]);

        assert!(!v.validate(WizardStep::PriceCalculator, &json!({ "finalPrice": 0 })).is_valid);
        assert!(v.validate(WizardStep::PriceCalculator, &json!({ "finalPrice": 125.5 })).is_valid);

        let no_photos = v.validate(WizardStep::PhotoDocumentation, &json!({ "photos": [] }));
        assert!(no_photos.is_valid);
        assert_eq!(no_photos.warnings.len(), 1);
        let too_many = v.validate(WizardStep::PhotoDocumentation, &json!({ "photos": [1, 2, 3, 4, 5, 6] }));
        assert!(!too_many.is_valid);
    }

    #[test]
    fn registered_rule_replaces_default() {
        fn always_fails(_: &Map<String, Value>, _: &WizardConfig, result: &mut ValidationResult) {
            result.push_error("branch closed");
        }

        let mut v = validator();
        v.register(WizardStep::BranchSelection, always_fails);
        let result = v.validate(WizardStep::BranchSelection, &json!({ "branchId": "b-1" }));
        assert_eq!(result.errors, vec!["branch closed".to_string()]);
    }
}
