use thiserror::Error;

use crate::fields::Field;

/// Parse result for one input. Invalid text is carried through to validation
/// instead of being coerced to a number.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Number(f64),
    Invalid(String),
}

impl FieldInput {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldInput::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }
}

/// Field values in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    entries: Vec<(Field, FieldInput)>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, input: FieldInput) {
        self.entries.push((field, input));
    }

    pub fn from_numbers(values: &[(Field, f64)]) -> Self {
        let mut out = Self::new();
        for (field, value) in values {
            out.push(*field, FieldInput::Number(*value));
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Field, FieldInput)> {
        self.entries.iter()
    }

    pub fn get(&self, field: Field) -> Option<&FieldInput> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, input)| input)
    }

    pub fn number(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(FieldInput::as_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldIssue {
    #[error("Invalid value for {field}")]
    NotANumber { field: Field },
    #[error("{field} cannot be less than {minimum}")]
    BelowMinimum { field: Field, minimum: f64 },
    #[error("{field} cannot be more than {maximum}")]
    AboveMaximum { field: Field, maximum: f64 },
}

impl FieldIssue {
    pub fn field(&self) -> Field {
        match self {
            FieldIssue::NotANumber { field }
            | FieldIssue::BelowMinimum { field, .. }
            | FieldIssue::AboveMaximum { field, .. } => *field,
        }
    }
}

/// Parses raw input text for `field`. Empty, non-finite and (for count
/// fields) fractional input is rejected.
pub fn parse_field_input(field: Field, raw: &str) -> FieldInput {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return FieldInput::Invalid(raw.to_string());
    }
    let Ok(value) = cleaned.parse::<f64>() else {
        return FieldInput::Invalid(raw.to_string());
    };
    if !value.is_finite() {
        return FieldInput::Invalid(raw.to_string());
    }
    if field.is_integer() && value.fract() != 0.0 {
        return FieldInput::Invalid(raw.to_string());
    }
    FieldInput::Number(value)
}

/// Every issue for every field, in collection order. All three checks run
/// for each field.
pub fn field_issues(values: &FormValues) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    for (field, input) in values.iter() {
        let field = *field;
        let bounds = field.bounds();
        let number = input.as_number();

        if number.is_none() {
            issues.push(FieldIssue::NotANumber { field });
        }
        if let Some(value) = number
            && value < bounds.minimum
        {
            issues.push(FieldIssue::BelowMinimum {
                field,
                minimum: bounds.minimum,
            });
        }
        if let Some(value) = number
            && value > bounds.maximum
        {
            issues.push(FieldIssue::AboveMaximum {
                field,
                maximum: bounds.maximum,
            });
        }
    }
    issues
}

/// Human-readable validation errors; empty means the values may be submitted.
pub fn validate(values: &FormValues) -> Vec<String> {
    field_issues(values)
        .into_iter()
        .map(|issue| issue.to_string())
        .collect()
}

/// Inline message for a single field, first failing check only.
pub fn check_field(field: Field, input: &FieldInput) -> Option<String> {
    let bounds = field.bounds();
    let Some(value) = input.as_number() else {
        return Some("Please enter a valid number".to_string());
    };
    if value < bounds.minimum {
        return Some(format!("Minimum value is {}", bounds.minimum));
    }
    if value > bounds.maximum {
        return Some(format!("Maximum value is {}", bounds.maximum));
    }
    None
}
