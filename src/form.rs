use crate::fields::Field;
use crate::validation::{FieldInput, FormValues, check_field, parse_field_input};

const MAX_INPUT_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub field: Field,
    pub buffer: String,
    pub error: Option<String>,
}

impl FieldState {
    fn new(field: Field) -> Self {
        Self {
            field,
            buffer: String::new(),
            error: None,
        }
    }

    pub fn parsed(&self) -> FieldInput {
        parse_field_input(self.field, &self.buffer)
    }

    pub fn is_marked_invalid(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Field),
    Submit,
}

/// The `predictionForm`: one input per field plus the submit control.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub fields: Vec<FieldState>,
    pub focus: Focus,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            fields: Field::ALL.into_iter().map(FieldState::new).collect(),
            focus: Focus::Field(Field::ALL[0]),
        }
    }

    pub fn field(&self, field: Field) -> &FieldState {
        &self.fields[field.index()]
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldState {
        &mut self.fields[field.index()]
    }

    pub fn set_value(&mut self, field: Field, value: &str) {
        self.field_mut(field).buffer = value.to_string();
    }

    pub fn focused_field(&self) -> Option<Field> {
        match self.focus {
            Focus::Field(field) => Some(field),
            Focus::Submit => None,
        }
    }

    /// Returns the edited field, if any text changed.
    pub fn insert_char(&mut self, c: char) -> Option<Field> {
        let field = self.focused_field()?;
        if c.is_control() {
            return None;
        }
        let state = self.field_mut(field);
        if state.buffer.chars().count() >= MAX_INPUT_LEN {
            return None;
        }
        state.buffer.push(c);
        Some(field)
    }

    pub fn backspace(&mut self) -> Option<Field> {
        let field = self.focused_field()?;
        self.field_mut(field).buffer.pop().map(|_| field)
    }

    pub fn clear_focused(&mut self) -> Option<Field> {
        let field = self.focused_field()?;
        let state = self.field_mut(field);
        if state.buffer.is_empty() {
            return None;
        }
        state.buffer.clear();
        Some(field)
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Field(field) => match Field::ALL.get(field.index() + 1) {
                Some(next) => Focus::Field(*next),
                None => Focus::Submit,
            },
            Focus::Submit => Focus::Field(Field::ALL[0]),
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Field(field) if field.index() == 0 => Focus::Submit,
            Focus::Field(field) => Focus::Field(Field::ALL[field.index() - 1]),
            Focus::Submit => Focus::Field(Field::ALL[Field::ALL.len() - 1]),
        };
    }

    /// Fresh `FormValues` from the current buffers, in field order.
    pub fn collect(&self) -> FormValues {
        let mut values = FormValues::new();
        for state in &self.fields {
            values.push(state.field, state.parsed());
        }
        values
    }

    pub fn show_error(&mut self, field: Field, message: impl Into<String>) {
        self.field_mut(field).error = Some(message.into());
    }

    pub fn clear_error(&mut self, field: Field) {
        self.field_mut(field).error = None;
    }

    /// Live check against the field's current text; either marks or unmarks.
    /// Returns whether the field ended up marked invalid.
    pub fn apply_check(&mut self, field: Field) -> bool {
        let input = self.field(field).parsed();
        match check_field(field, &input) {
            Some(message) => {
                self.show_error(field, message);
                true
            }
            None => {
                self.clear_error(field);
                false
            }
        }
    }

    pub fn invalid_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_marked_invalid()).count()
    }
}
