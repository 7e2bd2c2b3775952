//! Form field derivation from model field descriptors.

use reinhardt_model::{EnumFieldKind, EnumRelationKind, EnumScalarKind, SpecFieldDescriptor};

use crate::conf::SpecFormSettings;
use crate::spec::{EnumFormFieldKind, EnumWidget, FormError, SpecFormField, SpecFormFields};

/// Hook turning a model field into a form field; `None` leaves it out.
pub type FormfieldCallback = fn(&SpecFieldDescriptor, &SpecFormSettings) -> Option<SpecFormField>;

/// `date_added` -> `Date added`.
pub fn derive_label(name: &str) -> String {
    let c_text = name.replace('_', " ");
    let mut chars = c_text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Plain form field for `descriptor`; `None` for non-editable fields.
///
/// Blank-allowed fields are optional. Boolean checkboxes are never
/// required since an unchecked box is a valid answer.
pub fn derive_formfield(descriptor: &SpecFieldDescriptor) -> Option<SpecFormField> {
    if !descriptor.editable() {
        return None;
    }

    let kind = match &descriptor.kind {
        EnumFieldKind::Scalar(scalar_kind) => match scalar_kind {
            EnumScalarKind::Char { max_length } => EnumFormFieldKind::Char {
                max_length: Some(*max_length),
            },
            EnumScalarKind::Text => EnumFormFieldKind::Char { max_length: None },
            EnumScalarKind::Slug => EnumFormFieldKind::Slug,
            EnumScalarKind::Integer => EnumFormFieldKind::Integer,
            EnumScalarKind::Float => EnumFormFieldKind::Float,
            EnumScalarKind::Boolean => EnumFormFieldKind::Boolean,
            EnumScalarKind::NullBoolean => EnumFormFieldKind::NullBoolean,
            EnumScalarKind::Date => EnumFormFieldKind::Date,
            EnumScalarKind::Time => EnumFormFieldKind::Time,
            EnumScalarKind::DateTime { .. } => EnumFormFieldKind::DateTime,
            EnumScalarKind::Image => EnumFormFieldKind::Image,
        },
        EnumFieldKind::Relation(relation) => match relation.kind {
            EnumRelationKind::ForeignKey | EnumRelationKind::OneToOne => {
                EnumFormFieldKind::ModelChoice {
                    entity: relation.related_entity,
                }
            }
            EnumRelationKind::ManyToMany => EnumFormFieldKind::ModelMultipleChoice {
                entity: relation.related_entity,
            },
        },
    };

    let if_required = !descriptor.if_blank
        && !matches!(
            kind,
            EnumFormFieldKind::Boolean | EnumFormFieldKind::NullBoolean
        );

    Some(
        SpecFormField::new(descriptor.name.clone(), kind)
            .with_required(if_required)
            .with_label(derive_label(&descriptor.name)),
    )
}

/// Default formfield callback.
///
/// Date widgets display `default_datefield_format`; time and datetime
/// fields accept only the configured input format.
pub fn datetime_formfield_callback(
    descriptor: &SpecFieldDescriptor,
    settings: &SpecFormSettings,
) -> Option<SpecFormField> {
    let mut formfield = derive_formfield(descriptor)?;

    match formfield.kind {
        EnumFormFieldKind::Date => {
            if let EnumWidget::DateInput { format } = &mut formfield.widget {
                *format = Some(settings.default_datefield_format.clone());
            }
        }
        EnumFormFieldKind::Time => {
            formfield.input_formats = vec![settings.default_timefield_format.clone()];
        }
        EnumFormFieldKind::DateTime => {
            formfield.input_formats = vec![settings.default_datetimefield_format.clone()];
        }
        _ => {}
    }
    Some(formfield)
}

/// Mark `required_fields` as required and swap the widget of
/// `hidden_fields` for a hidden input.
pub fn apply_field_config<S: AsRef<str>>(
    fields: &mut SpecFormFields,
    required_fields: &[S],
    hidden_fields: &[S],
) -> Result<(), FormError> {
    for name in required_fields {
        get_field_mut(fields, name.as_ref())?.required = true;
    }
    for name in hidden_fields {
        get_field_mut(fields, name.as_ref())?.widget = EnumWidget::HiddenInput;
    }
    Ok(())
}

fn get_field_mut<'a>(
    fields: &'a mut SpecFormFields,
    name: &str,
) -> Result<&'a mut SpecFormField, FormError> {
    fields.get_mut(name).ok_or_else(|| FormError::UnknownField {
        name: name.to_string(),
    })
}
