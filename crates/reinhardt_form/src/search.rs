//! Search forms: optional-field model forms and the single-box search.

use std::collections::BTreeMap;

use tracing::debug;

use crate::conf::{C_SEARCH_FIELD_NAME, N_SEARCH_MAX_LENGTH};
use crate::model_form::ModelFormBuilder;
use crate::spec::{EnumFormFieldKind, EnumWidget, FormError, SpecForm, SpecFormField};

/// Model form whose fields are optional search filters.
pub struct ModelSearchFormBuilder<'a> {
    model_form: ModelFormBuilder<'a>,
    l_required_fields: Vec<String>,
    extra_kwargs: BTreeMap<String, String>,
}

impl<'a> ModelSearchFormBuilder<'a> {
    pub fn new(model_form: ModelFormBuilder<'a>) -> Self {
        Self {
            model_form,
            l_required_fields: Vec::new(),
            extra_kwargs: BTreeMap::new(),
        }
    }

    /// Fields that stay required. Names not on the form are ignored.
    pub fn required_fields<I, S>(mut self, required_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.l_required_fields = required_fields.into_iter().map(Into::into).collect();
        self
    }

    /// Options carried on the built form for the caller's filtering code.
    pub fn extra_kwargs(mut self, extra_kwargs: BTreeMap<String, String>) -> Self {
        self.extra_kwargs = extra_kwargs;
        self
    }

    /// Build the model form, then make every field not listed in
    /// `required_fields` optional. This overrides the model form meta's
    /// own `required_fields`.
    pub fn build(self) -> Result<SpecForm, FormError> {
        let mut form = self.model_form.build()?;
        for field in form.fields.iter_mut() {
            if !self.l_required_fields.contains(&field.name) {
                field.required = false;
            }
        }
        form.extra_kwargs = self.extra_kwargs;

        debug!(n_fields = form.fields.len(), "model search form built");
        Ok(form)
    }
}

/// Form with one optional `search` text box showing `search_placeholder`.
pub fn build_simple_search_form(search_placeholder: &str) -> SpecForm {
    let mut form = SpecForm::default();
    form.fields.upsert(
        SpecFormField::new(
            C_SEARCH_FIELD_NAME,
            EnumFormFieldKind::Char {
                max_length: Some(N_SEARCH_MAX_LENGTH),
            },
        )
        .with_required(false)
        .with_widget(EnumWidget::TextInput {
            placeholder: Some(search_placeholder.to_string()),
        }),
    );
    form
}
