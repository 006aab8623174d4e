//! Declarative request validation.
//!
//! A route's rule list runs in full before its handler: every failing rule is
//! collected into `[{field, message, value}]` and the whole body is rejected
//! as one 400 response. Handlers only ever see input that passed every rule,
//! already trimmed and normalized.
pub mod rules;

use crate::types::dto::common::FieldError;

/// Accumulates field failures across a rule list (no short-circuit)
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one rule, echoing the rejected value on failure.
    pub fn rule(&mut self, field: &str, rejected: &str, outcome: Result<(), String>) {
        if let Err(message) = outcome {
            self.errors.push(FieldError::new(field, message, Some(rejected.to_string())));
        }
    }

    /// Record a rule outcome without echoing the value (passwords).
    pub fn rule_hidden(&mut self, field: &str, outcome: Result<(), String>) {
        if let Err(message) = outcome {
            self.errors.push(FieldError::new(field, message, None));
        }
    }

    /// Record a failure directly, for coercion-style rules that produce a
    /// value as well as an outcome.
    pub fn fail(&mut self, field: &str, message: impl Into<String>, rejected: Option<String>) {
        self.errors.push(FieldError::new(field, message, rejected));
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume the validator; `Err` carries every recorded failure.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
