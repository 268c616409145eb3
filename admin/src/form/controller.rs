//! Per-form field state.

use crate::form::schema::{FieldValue, FormValues, Schema};
use std::collections::{BTreeMap, BTreeSet};

/// Where a field is in `untouched → touched → (valid | invalid)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    /// Not yet edited or blurred; errors are not shown
    Untouched,
    /// Touched and passing every rule
    Valid,
    /// Touched and failing a rule
    Invalid(String),
}

/// Binds a [`Schema`] to a set of values
///
/// The whole schema is re-evaluated on every change, but an error is only
/// reported for a field once it has been touched by an edit or a blur.
#[derive(Debug, Clone)]
pub struct FormController {
    schema: Schema,
    initial: FormValues,
    values: FormValues,
    touched: BTreeSet<&'static str>,
    errors: BTreeMap<&'static str, String>,
}

impl FormController {
    /// Empty form
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self::with_values(schema, FormValues::new())
    }

    /// Form pre-filled with `initial`, as an edit form starts
    #[must_use]
    pub fn with_values(schema: Schema, initial: FormValues) -> Self {
        let errors = schema.validate(&initial);
        Self {
            schema,
            values: initial.clone(),
            initial,
            touched: BTreeSet::new(),
            errors,
        }
    }

    /// Current values
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Change a field; the field becomes touched
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.values.set(name, value);
        self.touch(name);
        self.errors = self.schema.validate(&self.values);
    }

    /// The field lost focus; it becomes touched
    pub fn blur(&mut self, name: &str) {
        self.touch(name);
    }

    fn touch(&mut self, name: &str) {
        if let Some(field) = self.schema.names().find(|n| *n == name) {
            self.touched.insert(field);
        }
    }

    /// Status of one field
    #[must_use]
    pub fn status(&self, name: &str) -> FieldStatus {
        if !self.touched.contains(name) {
            return FieldStatus::Untouched;
        }
        match self.errors.get(name) {
            Some(error) => FieldStatus::Invalid(error.clone()),
            None => FieldStatus::Valid,
        }
    }

    /// Error to display for a field (only once touched)
    #[must_use]
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        self.touched
            .contains(name)
            .then(|| self.errors.get(name).map(String::as_str))
            .flatten()
    }

    /// Whether every field passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of failing fields, in schema order
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.schema.names().filter(|n| self.errors.contains_key(n)).collect()
    }

    /// Attempt a submit
    ///
    /// Every field becomes touched so all errors render. Returns the values
    /// when the form is valid; otherwise the submit is blocked and the names
    /// of the failing fields are returned.
    ///
    /// # Errors
    ///
    /// The failing field names when any field is invalid.
    pub fn submit(&mut self) -> Result<&FormValues, Vec<&'static str>> {
        self.touched.extend(self.schema.names());
        self.errors = self.schema.validate(&self.values);
        if self.errors.is_empty() {
            Ok(&self.values)
        } else {
            tracing::debug!(fields = ?self.invalid_fields(), "Submit blocked by validation");
            Err(self.invalid_fields())
        }
    }

    /// Clear every value and the touched set
    pub fn reset(&mut self) {
        self.values = FormValues::new();
        self.touched.clear();
        self.errors = self.schema.validate(&self.values);
    }

    /// Back to the values the form was created with
    pub fn restore(&mut self) {
        self.values = self.initial.clone();
        self.touched.clear();
        self.errors = self.schema.validate(&self.values);
    }
}
