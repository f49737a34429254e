//! # Validation Module
//!
//! Field-level rules used by the product-creation wizard and commission offers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form inputs (web client)                                     │
//! │  └── Immediate feedback while typing                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Wizard step check (wizard.rs)                                │
//! │  ├── THIS MODULE: one rule per field                                   │
//! │  └── Collected into FieldErrors, blocks "Next"                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend draft/product API                                    │
//! │  └── Final authority on submit                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use spyke_core::validation::{validate_text, validate_email};
//!
//! assert!(validate_text("title", "Invoice Bot", 3, 100).is_ok());
//! assert!(validate_email("supportEmail", "help@example.com").is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_TAG_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a field is present (not empty after trimming).
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a required free-text field and its length in characters.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Trimmed length must be within `min..=max` characters
///
/// ## Example
/// ```rust
/// use spyke_core::validation::validate_text;
///
/// assert!(validate_text("title", "CRM Sync", 3, 100).is_ok());
/// assert!(validate_text("title", "  ", 3, 100).is_err());
/// assert!(validate_text("title", "ab", 3, 100).is_err());
/// ```
pub fn validate_text(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let value = value.trim();
    validate_required(field, value)?;

    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@`, non-empty local part
/// - Domain contains a dot, no empty labels
/// - No whitespace anywhere
pub fn validate_email(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();
    validate_required(field, value)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    if value.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = value
        .split_once('@')
        .ok_or_else(|| invalid("must contain '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must be a single address like name@example.com"));
    }

    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(invalid("must have a valid domain"));
    }

    Ok(())
}

/// Validates an absolute `http://` or `https://` URL with a host.
///
/// ## Example
/// ```rust
/// use spyke_core::validation::validate_url;
///
/// assert!(validate_url("images", "https://cdn.example.com/a.png").is_ok());
/// assert!(validate_url("images", "ftp://example.com/a.png").is_err());
/// assert!(validate_url("images", "https://").is_err());
/// ```
pub fn validate_url(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();
    validate_required(field, value)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| invalid("must start with http:// or https://"))?;

    if value.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(invalid("must include a host"));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a listing price.
///
/// ## Rules
/// - Must be greater than zero (free listings are not sold through the cart)
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a commission rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_commission_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "rateBps".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of entries in a list field.
pub fn validate_count(field: &str, len: usize, min: usize, max: usize) -> ValidationResult<()> {
    if len < min {
        return Err(ValidationError::TooFew {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooMany {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates a tag list.
///
/// ## Rules
/// - Each tag is non-empty and at most `MAX_TAG_LEN` characters
/// - Tags are unique, ignoring case
pub fn validate_tags(field: &str, tags: &[String]) -> ValidationResult<()> {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());

    for tag in tags {
        validate_text(field, tag, 1, MAX_TAG_LEN)?;

        let normalized = tag.trim().to_lowercase();
        if seen.contains(&normalized) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: tag.trim().to_string(),
            });
        }
        seen.push(normalized);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("title", "Invoice Bot", 3, 100).is_ok());
        assert!(validate_text("title", "  abc  ", 3, 100).is_ok());

        assert_eq!(
            validate_text("title", "", 3, 100),
            Err(ValidationError::Required {
                field: "title".into()
            })
        );
        assert!(matches!(
            validate_text("title", "ab", 3, 100),
            Err(ValidationError::TooShort { min: 3, .. })
        ));
        assert!(matches!(
            validate_text("title", &"A".repeat(101), 3, 100),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }

    #[test]
    fn test_validate_text_counts_chars_not_bytes() {
        // 3 characters, 9 bytes
        assert!(validate_text("title", "日本語", 3, 3).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "help@example.com").is_ok());
        assert!(validate_email("email", "a.b+c@sub.example.io").is_ok());

        assert!(validate_email("email", "").is_err());
        assert!(validate_email("email", "no-at-sign").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_email("email", "a@b@example.com").is_err());
        assert!(validate_email("email", "a@localhost").is_err());
        assert!(validate_email("email", "a@example..com").is_err());
        assert!(validate_email("email", "a b@example.com").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("demoUrl", "https://demo.example.com").is_ok());
        assert!(validate_url("demoUrl", "http://localhost:3000/x?y=1").is_ok());

        assert!(validate_url("demoUrl", "").is_err());
        assert!(validate_url("demoUrl", "example.com").is_err());
        assert!(validate_url("demoUrl", "https://").is_err());
        assert!(validate_url("demoUrl", "https:///path").is_err());
        assert!(validate_url("demoUrl", "https://exa mple.com").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", Money::from_cents(1)).is_ok());
        assert!(validate_price("price", Money::zero()).is_err());
        assert!(validate_price("price", Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_commission_rate_bps() {
        assert!(validate_commission_rate_bps(0).is_ok());
        assert!(validate_commission_rate_bps(1500).is_ok());
        assert!(validate_commission_rate_bps(10_000).is_ok());
        assert!(validate_commission_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count("images", 1, 1, 8).is_ok());
        assert!(matches!(
            validate_count("images", 0, 1, 8),
            Err(ValidationError::TooFew { min: 1, .. })
        ));
        assert!(matches!(
            validate_count("images", 9, 1, 8),
            Err(ValidationError::TooMany { max: 8, .. })
        ));
    }

    #[test]
    fn test_validate_tags() {
        let ok = vec!["crm".to_string(), "sales".to_string()];
        assert!(validate_tags("tags", &ok).is_ok());

        let dup = vec!["CRM".to_string(), "crm ".to_string()];
        assert_eq!(
            validate_tags("tags", &dup),
            Err(ValidationError::Duplicate {
                field: "tags".into(),
                value: "crm".into()
            })
        );

        let blank = vec!["  ".to_string()];
        assert!(validate_tags("tags", &blank).is_err());

        let long = vec!["x".repeat(MAX_TAG_LEN + 1)];
        assert!(validate_tags("tags", &long).is_err());
    }
}
