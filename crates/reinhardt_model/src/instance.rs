//! Runtime entity instances as supplied by the persistence layer.

use std::collections::BTreeMap;

use crate::spec::EntityId;

/// Scalar value stored in an instance field.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumScalarValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

/// Value of one declared field on an instance.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumFieldValue {
    /// Missing value (SQL `NULL`, unset relation).
    Null,
    /// Plain value.
    Scalar(EnumScalarValue),
    /// Single related instance (foreign key, one-to-one).
    Related(Box<SpecEntityInstance>),
    /// Related instances (many-to-many, reverse foreign key).
    RelatedMany(Vec<SpecEntityInstance>),
}

/// One row of an entity, with its populated specializations.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecEntityInstance {
    entity: EntityId,
    dict_values: BTreeMap<String, EnumFieldValue>,
    dict_children: BTreeMap<String, SpecEntityInstance>,
}

impl SpecEntityInstance {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            dict_values: BTreeMap::new(),
            dict_children: BTreeMap::new(),
        }
    }

    /// Schema this instance conforms to.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Builder-style [`Self::set_value`].
    pub fn with_value(mut self, name: impl Into<String>, value: EnumFieldValue) -> Self {
        self.set_value(name, value);
        self
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: EnumFieldValue) {
        self.dict_values.insert(name.into(), value);
    }

    /// Stored value of field `name`; `None` when the field was never loaded.
    pub fn value(&self, name: &str) -> Option<&EnumFieldValue> {
        self.dict_values.get(name)
    }

    /// Populated specialization stored under reverse accessor `accessor_name`.
    pub fn child(&self, accessor_name: &str) -> Option<&SpecEntityInstance> {
        self.dict_children.get(accessor_name)
    }

    pub(crate) fn insert_child(&mut self, accessor_name: String, child: SpecEntityInstance) {
        self.dict_children.insert(accessor_name, child);
    }
}

impl From<EnumScalarValue> for EnumFieldValue {
    fn from(value: EnumScalarValue) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for EnumFieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(EnumScalarValue::Text(value.to_string()))
    }
}

impl From<String> for EnumFieldValue {
    fn from(value: String) -> Self {
        Self::Scalar(EnumScalarValue::Text(value))
    }
}

impl From<i64> for EnumFieldValue {
    fn from(value: i64) -> Self {
        Self::Scalar(EnumScalarValue::Integer(value))
    }
}

impl From<f64> for EnumFieldValue {
    fn from(value: f64) -> Self {
        Self::Scalar(EnumScalarValue::Float(value))
    }
}

impl From<bool> for EnumFieldValue {
    fn from(value: bool) -> Self {
        Self::Scalar(EnumScalarValue::Boolean(value))
    }
}

impl From<SpecEntityInstance> for EnumFieldValue {
    fn from(value: SpecEntityInstance) -> Self {
        Self::Related(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_keyed_by_field_name() {
        let author = SpecEntityInstance::new(EntityId(0)).with_value("email", "a@b.c".into());
        let post = SpecEntityInstance::new(EntityId(1))
            .with_value("title", "Hello".into())
            .with_value("views", 3_i64.into())
            .with_value("author", author.clone().into())
            .with_value("image", EnumFieldValue::Null);

        assert_eq!(
            post.value("title"),
            Some(&EnumFieldValue::Scalar(EnumScalarValue::Text(
                "Hello".to_string()
            )))
        );
        assert_eq!(
            post.value("author"),
            Some(&EnumFieldValue::Related(Box::new(author)))
        );
        assert_eq!(post.value("image"), Some(&EnumFieldValue::Null));
        assert_eq!(post.value("body"), None);
        assert_eq!(post.child("anything"), None);
    }
}
