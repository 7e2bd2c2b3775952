//! Forms generated from entity schemas.

use reinhardt_model::{EntityId, SchemaRegistry};
use tracing::debug;

use crate::conf::SpecFormSettings;
use crate::field::{FormfieldCallback, apply_field_config, datetime_formfield_callback};
use crate::spec::{FormError, SpecForm, SpecFormField, SpecFormFields};

/// Model form options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecModelFormMeta {
    pub entity: EntityId,
    /// Explicit field list; all editable fields when `None`.
    pub fields: Option<Vec<String>>,
    pub exclude: Vec<String>,
    /// Forced required after construction.
    pub required_fields: Vec<String>,
    /// Rendered with a hidden input after construction.
    pub hidden_fields: Vec<String>,
}

impl SpecModelFormMeta {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            fields: None,
            exclude: Vec::new(),
            required_fields: Vec::new(),
            hidden_fields: Vec::new(),
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required_fields<I, S>(mut self, required_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = required_fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hidden_fields<I, S>(mut self, hidden_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_fields = hidden_fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Builds a [`SpecForm`] for one entity of a registry.
pub struct ModelFormBuilder<'a> {
    registry: &'a SchemaRegistry,
    meta: SpecModelFormMeta,
    settings: SpecFormSettings,
    l_declared_fields: Vec<SpecFormField>,
    formfield_callback: Option<FormfieldCallback>,
}

impl<'a> ModelFormBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry, meta: SpecModelFormMeta) -> Self {
        Self {
            registry,
            meta,
            settings: SpecFormSettings::default(),
            l_declared_fields: Vec::new(),
            formfield_callback: None,
        }
    }

    pub fn settings(mut self, settings: SpecFormSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Declare a field that takes precedence over the model field of the
    /// same name.
    pub fn declared_field(mut self, field: SpecFormField) -> Self {
        self.l_declared_fields.push(field);
        self
    }

    /// Replace [`datetime_formfield_callback`] as the model field hook.
    pub fn formfield_callback(mut self, callback: FormfieldCallback) -> Self {
        self.formfield_callback = Some(callback);
        self
    }

    /// Build the form.
    ///
    /// Model fields come first in schema order (or `fields` order), declared
    /// fields replace same-named model fields in place and the rest are
    /// appended. Then `required_fields` and `hidden_fields` are applied.
    ///
    /// # Panics
    ///
    /// Panics if `meta.entity` does not belong to the registry.
    pub fn build(self) -> Result<SpecForm, FormError> {
        let schema = self.registry.entity(self.meta.entity);
        let callback = self
            .formfield_callback
            .unwrap_or(datetime_formfield_callback);
        let if_excluded = |name: &str| self.meta.exclude.iter().any(|excluded| excluded == name);
        let find_declared = |name: &str| {
            self.l_declared_fields
                .iter()
                .find(|declared| declared.name == name)
        };

        let mut fields = SpecFormFields::new();
        match &self.meta.fields {
            Some(l_names) => {
                for name in l_names {
                    if if_excluded(name) {
                        continue;
                    }
                    if let Some(declared) = find_declared(name) {
                        fields.push(declared.clone())?;
                        continue;
                    }
                    let descriptor = schema.field(name).ok_or_else(|| FormError::UnknownField {
                        name: name.clone(),
                    })?;
                    if !descriptor.editable() {
                        return Err(FormError::NonEditableField {
                            entity: schema.name().to_string(),
                            name: name.clone(),
                        });
                    }
                    if let Some(formfield) = callback(descriptor, &self.settings) {
                        fields.push(formfield)?;
                    }
                }
            }
            None => {
                for descriptor in schema.fields() {
                    if !descriptor.editable() || if_excluded(&descriptor.name) {
                        continue;
                    }
                    if let Some(formfield) = callback(descriptor, &self.settings) {
                        fields.push(formfield)?;
                    }
                }
            }
        }

        for declared in self.l_declared_fields.iter().cloned() {
            fields.upsert(declared);
        }

        apply_field_config(
            &mut fields,
            &self.meta.required_fields,
            &self.meta.hidden_fields,
        )?;

        debug!(
            entity = schema.name(),
            n_fields = fields.len(),
            "model form built"
        );
        Ok(SpecForm {
            fields,
            ..SpecForm::default()
        })
    }
}
