//! Field validation shared by the request types.

use crate::error::TreeError;

/// Upper bound for `title` and `type`, matching their `VARCHAR(255)` columns.
pub const MAX_LABEL_LENGTH: usize = 255;

/// Reject empty or whitespace-only values.
pub trait ValidateNonEmpty {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), TreeError>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), TreeError> {
        if self.trim().is_empty() {
            return Err(TreeError::validation(format!("{field_name} is required")));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), TreeError> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), TreeError> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(TreeError::validation(format!("{field_name} is required"))),
        }
    }
}

/// Reject values longer than `max` characters.
pub trait ValidateMaxLength {
    fn validate_max_length(&self, field_name: &str, max: usize) -> Result<(), TreeError>;
}

impl ValidateMaxLength for str {
    fn validate_max_length(&self, field_name: &str, max: usize) -> Result<(), TreeError> {
        if self.chars().count() > max {
            return Err(TreeError::validation(format!(
                "{field_name} must be at most {max} characters"
            )));
        }
        Ok(())
    }
}

impl ValidateMaxLength for String {
    fn validate_max_length(&self, field_name: &str, max: usize) -> Result<(), TreeError> {
        self.as_str().validate_max_length(field_name, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_rejects_blank_and_missing() {
        assert!("folder".validate_non_empty("type").is_ok());
        assert!(matches!(
            "   ".validate_non_empty("type"),
            Err(TreeError::Validation(msg)) if msg == "type is required"
        ));
        assert!(None::<String>.validate_non_empty("title").is_err());
    }

    #[test]
    fn max_length_counts_characters() {
        let accented = "é".repeat(MAX_LABEL_LENGTH);
        assert!(accented.validate_max_length("title", MAX_LABEL_LENGTH).is_ok());
        assert!("x"
            .repeat(MAX_LABEL_LENGTH + 1)
            .validate_max_length("title", MAX_LABEL_LENGTH)
            .is_err());
    }
}
