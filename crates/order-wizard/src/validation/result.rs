use serde::{Deserialize, Serialize};

/// Outcome of a validation pass. Warnings never block; errors do.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub can_proceed: bool,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            can_proceed: true,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        let mut result = Self::valid();
        result.push_error(error);
        result
    }

    pub fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
        self.can_proceed = false;
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        for error in other.errors {
            self.push_error(error);
        }
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_block() {
        let mut result = ValidationResult::valid();
        result.push_warning("no photos attached");
        assert!(result.is_valid);
        assert!(result.can_proceed);
    }

    #[test]
    fn errors_block_and_merge_accumulates() {
        let mut result = ValidationResult::valid();
        let mut other = ValidationResult::invalid("branch is required");
        other.push_warning("lookup failed");

        result.merge(other);
        assert!(!result.is_valid);
        assert!(!result.can_proceed);
        assert_eq!(result.errors, vec!["branch is required".to_string()]);
        assert_eq!(result.warnings, vec!["lookup failed".to_string()]);
    }
}
