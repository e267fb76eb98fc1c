//! Common validation utilities for submitted form values.

use validator::ValidationError;

/// Longest description accepted for a template.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Parses a trimmed integer and checks it lies in `min..=max`.
///
/// Returns `None` for blank, non-numeric or out-of-range input.
pub fn parse_bounded_int(raw: &str, min: i32, max: i32) -> Option<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|value| (min..=max).contains(value))
}

/// Validates a free-text description: bounded length, no control characters
/// other than line breaks and tabs.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        let mut err = ValidationError::new("description_length");
        err.message = Some(
            format!(
                "Description cannot exceed {} characters",
                MAX_DESCRIPTION_LENGTH
            )
            .into(),
        );
        return Err(err);
    }

    if description
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        let mut err = ValidationError::new("description_chars");
        err.message = Some("Description contains invalid characters".into());
        return Err(err);
    }

    Ok(())
}
