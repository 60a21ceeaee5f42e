//! Centralized request validation helpers.

/// Maximum number of variant IDs accepted in one request (DOS protection)
pub const MAX_VARIANT_IDS: usize = 16;

/// Security-related constants for input validation
pub const MAX_VARIANT_ID_LENGTH: usize = 1024;
pub const MAX_DATASET_ID_LENGTH: usize = 64;

/// Security validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Too many variant IDs: at most {MAX_VARIANT_IDS} are accepted")]
    TooManyVariantIds,
    #[error("Variant ID too long: exceeds {MAX_VARIANT_ID_LENGTH} characters")]
    VariantIdTooLong,
    #[error("Dataset ID too long: exceeds {MAX_DATASET_ID_LENGTH} characters")]
    DatasetIdTooLong,
    #[error("Empty identifier provided")]
    EmptyIdentifier,
    #[error("Identifier contains control characters")]
    InvalidCharacters,
}

fn check_identifier(
    s: &str,
    max_len: usize,
    too_long: ValidationError,
) -> Result<(), ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    if s.len() > max_len {
        return Err(too_long);
    }
    if s.chars().any(char::is_control) {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(())
}

/// Validate untrusted request identifiers before they reach the engine.
///
/// This only bounds size and rejects control characters; the pair-count and
/// distinctness rules are enforced by the engine itself.
///
/// # Errors
///
/// Returns the first `ValidationError` found.
pub fn validate_request_ids(
    variant_ids: &[String],
    dataset_id: &str,
) -> Result<(), ValidationError> {
    if variant_ids.len() > MAX_VARIANT_IDS {
        return Err(ValidationError::TooManyVariantIds);
    }
    for id in variant_ids {
        check_identifier(id, MAX_VARIANT_ID_LENGTH, ValidationError::VariantIdTooLong)?;
    }
    check_identifier(dataset_id, MAX_DATASET_ID_LENGTH, ValidationError::DatasetIdTooLong)
}

/// Split a comma-separated list of variant IDs, dropping empty entries
#[must_use]
pub fn split_variant_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
