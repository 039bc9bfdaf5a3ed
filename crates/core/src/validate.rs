//! Helpers for flattening `validator` errors into a single field/message
//! pair for error responses.

use validator::ValidationErrors;

/// Extract the first field-level error as `(field, message)`.
///
/// Field iteration order is not guaranteed by `validator`, so callers must
/// not depend on which error is reported when several fields fail at once.
pub fn first_error(errors: &ValidationErrors) -> (String, String) {
    for (field, field_errors) in errors.field_errors() {
        if let Some(err) = field_errors.first() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("failed rule '{}'", err.code));
            return (field.to_string(), message);
        }
    }
    ("_".to_string(), "validation failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
    }

    #[test]
    fn test_first_error_reports_field_and_message() {
        let probe = Probe {
            name: String::new(),
        };
        let errors = probe.validate().unwrap_err();
        let (field, message) = first_error(&errors);
        assert_eq!(field, "name");
        assert_eq!(message, "must not be empty");
    }
}
