//! Add/edit form state: values, inline errors, and the submit lifecycle.

use std::collections::BTreeMap;

use crate::{
    entity::{FieldContext, FieldKey, FieldValues, FormSchema},
    error::{ClientError, ValidationErrors},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase<Id> {
    IdleCreate,
    IdleEdit(Id),
    Submitting { editing: Option<Id> },
}

/// What to send once a submit passes validation.
#[derive(Debug, Clone)]
pub struct Submission<E: FormSchema> {
    pub editing: Option<E::Id>,
    pub draft: E::Draft,
}

#[derive(Debug)]
pub struct FormController<E: FormSchema> {
    values: FieldValues<E::Field>,
    defaults: FieldValues<E::Field>,
    errors: BTreeMap<E::Field, String>,
    phase: FormPhase<E::Id>,
}

impl<E: FormSchema> Default for FormController<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FormSchema> FormController<E> {
    pub fn new() -> Self {
        Self {
            values: FieldValues::blank(),
            defaults: FieldValues::blank(),
            errors: BTreeMap::new(),
            phase: FormPhase::IdleCreate,
        }
    }

    pub fn phase(&self) -> FormPhase<E::Id> {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting { .. })
    }

    pub fn editing(&self) -> Option<E::Id> {
        match self.phase {
            FormPhase::IdleCreate => None,
            FormPhase::IdleEdit(id) => Some(id),
            FormPhase::Submitting { editing } => editing,
        }
    }

    pub fn value(&self, field: E::Field) -> &str {
        self.values.get(field)
    }

    pub fn values(&self) -> &FieldValues<E::Field> {
        &self.values
    }

    pub fn error(&self, field: E::Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for (field, message) in &self.errors {
            errors.insert(field.name(), message.clone());
        }
        errors
    }

    /// The single per-field transition: store the value, re-check it, and
    /// record or clear its inline error.
    pub fn set_field(
        &mut self,
        field: E::Field,
        value: impl Into<String>,
        records: &[E],
    ) -> Option<&str> {
        let value = value.into();
        let ctx = FieldContext {
            records,
            editing: self.editing(),
        };
        match E::check_field(field, &value, &ctx) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
        self.values.set(field, value);
        self.error(field)
    }

    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
        records: &[E],
    ) -> Result<Option<&str>, ClientError> {
        let field =
            E::Field::parse(name).ok_or_else(|| ClientError::UnknownField(name.to_string()))?;
        Ok(self.set_field(field, value, records))
    }

    /// Copies a record into the form and starts an edit session. Ignored
    /// while a submit is in flight.
    pub fn load(&mut self, record: &E) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.values = record.field_values();
        self.errors.clear();
        self.phase = FormPhase::IdleEdit(record.id());
        true
    }

    pub fn cancel_edit(&mut self) {
        if let FormPhase::IdleEdit(_) = self.phase {
            self.reset();
        }
    }

    /// Runs every field check; on success moves to `Submitting` and returns
    /// the request body.
    pub fn begin_submit(&mut self, records: &[E]) -> Result<Submission<E>, ClientError> {
        if self.is_submitting() {
            return Err(ClientError::SubmitInFlight);
        }

        let editing = self.editing();
        let ctx = FieldContext { records, editing };
        self.errors = E::Field::ALL
            .iter()
            .filter_map(|field| {
                E::check_field(*field, self.values.get(*field), &ctx)
                    .map(|message| (*field, message))
            })
            .collect();
        if !self.errors.is_empty() {
            return Err(ClientError::Validation(self.errors()));
        }

        let draft = E::build_draft(&self.values).map_err(ClientError::Validation)?;
        self.phase = FormPhase::Submitting { editing };
        Ok(Submission { editing, draft })
    }

    /// Success ends any edit session and resets to defaults; failure returns
    /// to the idle state the submit started from with values untouched.
    pub fn finish_submit(&mut self, succeeded: bool) {
        let FormPhase::Submitting { editing } = self.phase else {
            return;
        };
        if succeeded {
            self.reset();
        } else {
            self.phase = editing.map_or(FormPhase::IdleCreate, FormPhase::IdleEdit);
        }
    }

    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.errors.clear();
        self.phase = FormPhase::IdleCreate;
    }

    pub fn default_value(&self, field: E::Field) -> &str {
        self.defaults.get(field)
    }

    /// Installs a new reset default for `field`. A create-mode value still
    /// equal to the previous default follows it; anything the operator typed
    /// is kept. Returns whether the visible value changed.
    pub fn reseed(&mut self, field: E::Field, value: &str) -> bool {
        let previous = self.defaults.get(field).to_string();
        self.defaults.set(field, value);
        let follows = matches!(self.phase, FormPhase::IdleCreate)
            && self.values.get(field) == previous
            && previous != value;
        if follows {
            self.values.set(field, value);
            self.errors.remove(&field);
        }
        follows
    }
}
