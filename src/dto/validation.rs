//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that `value`, once trimmed, holds between `min` and `max` characters.
///
/// # Examples
///
/// ```ignore
/// validate_trimmed_length("  Main  ", 1, 50) // Ok
/// validate_trimmed_length("   ", 1, 50)      // Err - blank
/// ```
pub fn validate_trimmed_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let count = value.trim().chars().count();
    if count < min || count > max {
        let mut err = ValidationError::new("length");
        err.message = Some(
            format!("must be between {min} and {max} characters (got {count})").into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Trim `value` and drop it when nothing is left.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trimmed_length_valid() {
        assert!(validate_trimmed_length("Main", 1, 50).is_ok());
        assert!(validate_trimmed_length("  padded  ", 1, 6).is_ok());
        assert!(validate_trimmed_length(&"é".repeat(30), 1, 30).is_ok());
    }

    #[test]
    fn test_validate_trimmed_length_invalid() {
        assert!(validate_trimmed_length("", 1, 50).is_err());
        assert!(validate_trimmed_length("   ", 1, 50).is_err());
        assert!(validate_trimmed_length(&"x".repeat(51), 1, 50).is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some(" s1mple ".into())), Some("s1mple".into()));
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(None), None);
    }
}
