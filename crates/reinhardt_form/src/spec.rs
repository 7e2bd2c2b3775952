//! Form field models and errors.

use std::collections::BTreeMap;

use reinhardt_model::EntityId;
use thiserror::Error;

use crate::conf::{C_FALSE_LABEL_DEFAULT, C_NULL_LABEL_DEFAULT, C_TRUE_LABEL_DEFAULT};

////////////////////////////////////////////////////////////////////////////////
// #region Widgets

/// `(value, label)` option of a choice field.
pub type TupChoice = (String, String);

/// Rendering widget of a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumWidget {
    TextInput {
        placeholder: Option<String>,
    },
    Textarea,
    NumberInput,
    CheckboxInput,
    /// Three-state select; see [`EnumWidget::null_boolean_select`].
    NullBooleanSelect {
        choices: Vec<TupChoice>,
    },
    DateInput {
        /// Display format, e.g. `%m/%d/%Y`.
        format: Option<String>,
    },
    TimeInput,
    DateTimeInput,
    FileInput,
    Select,
    SelectMultiple,
    HiddenInput,
}

impl EnumWidget {
    /// Null-boolean select with options `1`, `2`, `3` for unknown, true and
    /// false. Missing labels fall back to `Unknown`, `True`, `False`.
    pub fn null_boolean_select(
        null_label: Option<&str>,
        true_label: Option<&str>,
        false_label: Option<&str>,
    ) -> Self {
        Self::NullBooleanSelect {
            choices: vec![
                ("1".to_string(), null_label.unwrap_or(C_NULL_LABEL_DEFAULT).to_string()),
                ("2".to_string(), true_label.unwrap_or(C_TRUE_LABEL_DEFAULT).to_string()),
                ("3".to_string(), false_label.unwrap_or(C_FALSE_LABEL_DEFAULT).to_string()),
            ],
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Fields

/// Value kind accepted by a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumFormFieldKind {
    Char { max_length: Option<usize> },
    Slug,
    Integer,
    Float,
    Boolean,
    NullBoolean,
    Date,
    Time,
    DateTime,
    Image,
    /// Fixed list of options.
    Choice { choices: Vec<TupChoice> },
    /// One instance of an entity.
    ModelChoice { entity: EntityId },
    /// Any number of instances of an entity.
    ModelMultipleChoice { entity: EntityId },
}

impl EnumFormFieldKind {
    /// Widget used when the field does not specify one.
    pub fn default_widget(&self) -> EnumWidget {
        match self {
            Self::Char { max_length: None } => EnumWidget::Textarea,
            Self::Char { .. } | Self::Slug => EnumWidget::TextInput { placeholder: None },
            Self::Integer | Self::Float => EnumWidget::NumberInput,
            Self::Boolean => EnumWidget::CheckboxInput,
            Self::NullBoolean => EnumWidget::null_boolean_select(None, None, None),
            Self::Date => EnumWidget::DateInput { format: None },
            Self::Time => EnumWidget::TimeInput,
            Self::DateTime => EnumWidget::DateTimeInput,
            Self::Image => EnumWidget::FileInput,
            Self::Choice { .. } | Self::ModelChoice { .. } => EnumWidget::Select,
            Self::ModelMultipleChoice { .. } => EnumWidget::SelectMultiple,
        }
    }
}

/// One form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFormField {
    pub name: String,
    pub kind: EnumFormFieldKind,
    pub widget: EnumWidget,
    pub required: bool,
    pub label: Option<String>,
    /// Accepted input formats for temporal fields; empty means the host
    /// defaults.
    pub input_formats: Vec<String>,
}

impl SpecFormField {
    /// Required field with the kind's default widget.
    pub fn new(name: impl Into<String>, kind: EnumFormFieldKind) -> Self {
        Self {
            name: name.into(),
            widget: kind.default_widget(),
            kind,
            required: true,
            label: None,
            input_formats: Vec::new(),
        }
    }

    pub fn with_widget(mut self, widget: EnumWidget) -> Self {
        self.widget = widget;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Ordered field collection with unique names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecFormFields {
    l_fields: Vec<SpecFormField>,
}

impl SpecFormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `field`; names must be unique.
    pub fn push(&mut self, field: SpecFormField) -> Result<(), FormError> {
        if self.contains(&field.name) {
            return Err(FormError::DuplicateField { name: field.name });
        }
        self.l_fields.push(field);
        Ok(())
    }

    /// Replace the field with the same name in place, or append.
    pub fn upsert(&mut self, field: SpecFormField) {
        match self.get_mut(&field.name) {
            Some(existing) => *existing = field,
            None => self.l_fields.push(field),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SpecFormField> {
        self.l_fields.iter().find(|field| field.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SpecFormField> {
        self.l_fields.iter_mut().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in order.
    pub fn names(&self) -> Vec<&str> {
        self.l_fields.iter().map(|field| field.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpecFormField> {
        self.l_fields.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SpecFormField> {
        self.l_fields.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.l_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l_fields.is_empty()
    }
}

/// Built form: its fields plus free-form options forwarded by callers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecForm {
    pub fields: SpecFormFields,
    pub extra_kwargs: BTreeMap<String, String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Form construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unknown field {name:?} specified")]
    UnknownField { name: String },
    #[error("Field {name:?} declared more than once")]
    DuplicateField { name: String },
    #[error("Field {name:?} cannot be specified for {entity} model form as it is a non-editable field")]
    NonEditableField { entity: String, name: String },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
