//! Declarative field validation
//!
//! A type implements [`Validate`] by listing its fields together with the
//! [`Rule`]s each must satisfy. [`check`] runs the rules and collects one
//! [`ValidationError`] per failed rule; [`validate`] turns the outcome into
//! an [`AppError`] ready for the HTTP boundary.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::error::{AppError, ErrorCode};

/// A constraint checked against one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present (and non-blank for text)
    Required,
    /// Text must look like an email address
    Email,
    /// Text must parse as a UUID
    Uuid,
    /// Lower bound: character count for text, value for integers
    Min(i64),
    /// Upper bound: character count for text, value for integers
    Max(i64),
    /// Text must equal one of the listed options
    OneOf(&'static [&'static str]),
}

impl Rule {
    /// Short rule name used in default messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::Uuid => "uuid",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::OneOf(_) => "oneof",
        }
    }

    fn message(self, field: &str) -> String {
        match self {
            Rule::Required => "This field is required".to_string(),
            Rule::Email => "Invalid email format".to_string(),
            Rule::Min(_) => "Value is too short".to_string(),
            Rule::Max(_) => "Value is too long".to_string(),
            Rule::Uuid | Rule::OneOf(_) => format!(
                "Field validation for '{field}' failed on the '{}' rule",
                self.name()
            ),
        }
    }
}

/// Value of a field as seen by the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Integer(Option<i64>),
}

impl FieldValue<'_> {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
        }
    }

    fn is_absent(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_none_or(|t| t.trim().is_empty()),
            FieldValue::Integer(number) => number.is_none(),
        }
    }
}

/// A field together with the rules declared for it
#[derive(Debug, Clone)]
pub struct FieldRules<'a> {
    field: &'static str,
    value: FieldValue<'a>,
    rules: Vec<Rule>,
}

impl<'a> FieldRules<'a> {
    /// Declare a text field
    pub fn text(field: &'static str, value: impl Into<Option<&'a str>>) -> Self {
        Self {
            field,
            value: FieldValue::Text(value.into()),
            rules: Vec::new(),
        }
    }

    /// Declare an integer field
    pub fn integer(field: &'static str, value: impl Into<Option<i64>>) -> Self {
        Self {
            field,
            value: FieldValue::Integer(value.into()),
            rules: Vec::new(),
        }
    }

    /// Add a rule
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Types whose fields carry validation rules
pub trait Validate {
    /// Fields and their rules, in reporting order
    fn fields(&self) -> Vec<FieldRules<'_>>;
}

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Every rule violation found in a value
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed")]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Individual violations in the order they were found
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Field to message mapping; a field failing several rules keeps the last message
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for error in &self.0 {
            map.insert(error.field.clone(), Value::String(error.message.clone()));
        }
        map
    }
}

/// A rule was declared on a field it cannot apply to
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule '{rule}' does not apply to {kind} field '{field}'")]
    Unsupported {
        field: &'static str,
        rule: &'static str,
        kind: &'static str,
    },
}

/// Run every declared rule against `value`
///
/// Returns `Ok(None)` when all rules pass.
///
/// # Errors
/// Returns `RuleError` if a rule is declared on a field of the wrong kind.
pub fn check<T: Validate + ?Sized>(value: &T) -> Result<Option<ValidationErrors>, RuleError> {
    let mut errors = Vec::new();

    for field in value.fields() {
        for rule in &field.rules {
            if !passes(*rule, field.field, field.value)? {
                errors.push(ValidationError {
                    field: field.field.to_string(),
                    message: rule.message(field.field),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(None)
    } else {
        Ok(Some(ValidationErrors(errors)))
    }
}

/// Validate `value` and convert failures into an [`AppError`]
///
/// # Errors
/// `VALIDATION_ERROR` with `details.errors` mapping field to message when a
/// rule fails, `INTERNAL_ERROR` when the rules themselves are malformed.
pub fn validate<T: Validate + ?Sized>(value: &T) -> Result<(), AppError> {
    match check(value) {
        Ok(None) => Ok(()),
        Ok(Some(errors)) => Err(AppError::new(ErrorCode::Validation, "Validation failed")
            .with_detail("errors", errors.to_map())),
        Err(err) => Err(AppError::wrap(
            err,
            ErrorCode::Internal,
            "Failed to validate request",
        )),
    }
}

fn passes(rule: Rule, field: &'static str, value: FieldValue<'_>) -> Result<bool, RuleError> {
    if rule == Rule::Required {
        return Ok(!value.is_absent());
    }

    let unsupported = || RuleError::Unsupported {
        field,
        rule: rule.name(),
        kind: value.kind(),
    };

    match (rule, value) {
        (Rule::Email | Rule::Uuid | Rule::OneOf(_), FieldValue::Integer(_)) => Err(unsupported()),
        (_, FieldValue::Text(None) | FieldValue::Integer(None)) => Ok(true),
        (Rule::Email, FieldValue::Text(Some(text))) => Ok(is_email(text)),
        (Rule::Uuid, FieldValue::Text(Some(text))) => Ok(Uuid::parse_str(text).is_ok()),
        (Rule::OneOf(options), FieldValue::Text(Some(text))) => {
            Ok(options.iter().any(|option| *option == text))
        }
        (Rule::Min(min), FieldValue::Text(Some(text))) => Ok(char_count(text) >= min),
        (Rule::Max(max), FieldValue::Text(Some(text))) => Ok(char_count(text) <= max),
        (Rule::Min(min), FieldValue::Integer(Some(number))) => Ok(number >= min),
        (Rule::Max(max), FieldValue::Integer(Some(number))) => Ok(number <= max),
        (Rule::Required, _) => Ok(!value.is_absent()),
    }
}

fn char_count(text: &str) -> i64 {
    i64::try_from(text.chars().count()).unwrap_or(i64::MAX)
}

/// Basic `local@domain.tld` shape check
fn is_email(text: &str) -> bool {
    let text = text.trim();
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
