//! Input validation helpers
//!
//! Text length limits and field-level error collection used by the listing
//! form and the owner edit path.

use serde::Serialize;

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Restaurant name
pub const MAX_NAME_LEN: usize = 200;

/// Street address
pub const MAX_ADDRESS_LEN: usize = 500;

/// Description, safety instructions, additional info
pub const MAX_TEXT_LEN: usize = 5000;

/// Phone number and other short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Single tag (payment method, cuisine, atmosphere, ...)
pub const MAX_TAG_LEN: usize = 100;

/// Tags per list
pub const MAX_TAGS: usize = 50;

// ── Field errors ────────────────────────────────────────────────────

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip)]
    pub code: ErrorCode,
}

/// All field errors found while validating one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, code: ErrorCode, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
            code,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any error was recorded for `field`
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Required, trimmed non-empty, within `max_len` characters
    pub fn required_text(&mut self, field: &str, value: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.push(field, ErrorCode::RequiredField, format!("{field} must not be empty"));
        } else {
            self.optional_text(field, value, max_len);
        }
    }

    pub fn optional_text(&mut self, field: &str, value: &str, max_len: usize) {
        let len = value.chars().count();
        if len > max_len {
            self.push(
                field,
                ErrorCode::ValueOutOfRange,
                format!("{field} is too long ({len} chars, max {max_len})"),
            );
        }
    }

    pub fn tags(&mut self, field: &str, values: &[String]) {
        if values.len() > MAX_TAGS {
            self.push(
                field,
                ErrorCode::ValueOutOfRange,
                format!("{field} has too many entries ({}, max {MAX_TAGS})", values.len()),
            );
        }
        if values.iter().any(|v| v.trim().is_empty()) {
            self.push(field, ErrorCode::ValidationFailed, format!("{field} contains an empty entry"));
        }
        if let Some(long) = values.iter().find(|v| v.chars().count() > MAX_TAG_LEN) {
            self.push(
                field,
                ErrorCode::ValueOutOfRange,
                format!("{field} entry '{long}' is too long (max {MAX_TAG_LEN})"),
            );
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.first() {
            Some(first) if self.0.len() == 1 => f.write_str(&first.message),
            Some(first) => write!(f, "{} (and {} more)", first.message, self.0.len() - 1),
            None => f.write_str("Validation failed"),
        }
    }
}

impl From<FieldErrors> for AppError {
    /// The first error decides the code; every error is listed under `fields`.
    fn from(errors: FieldErrors) -> Self {
        let code = errors
            .0
            .first()
            .map(|e| e.code)
            .unwrap_or(ErrorCode::ValidationFailed);
        let fields = serde_json::to_value(&errors.0).unwrap_or_default();
        AppError::with_message(code, errors.to_string()).with_detail("fields", fields)
    }
}
