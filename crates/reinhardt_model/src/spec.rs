//! Entity schema models and top-level error types.

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region FieldKinds

/// Index of an entity schema inside its [`crate::registry::SchemaRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    /// Zero-based declaration position in the owning registry.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Storage kind of a scalar (non-relation) field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumScalarKind {
    /// Bounded text.
    Char {
        /// Maximum length in characters.
        max_length: usize,
    },
    /// Unbounded text.
    Text,
    /// URL slug (letters, digits, `-`, `_`).
    Slug,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Float,
    /// Two-state boolean.
    Boolean,
    /// Three-state boolean (`true`, `false`, unknown).
    NullBoolean,
    /// Calendar date.
    Date,
    /// Wall-clock time.
    Time,
    /// Timestamp.
    DateTime {
        /// Refreshed on every save.
        auto_now: bool,
        /// Set once on creation.
        auto_now_add: bool,
    },
    /// Uploaded image reference.
    Image,
}

/// Cardinality of a relation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRelationKind {
    /// Many-to-one.
    ForeignKey,
    /// One-to-one.
    OneToOne,
    /// Many-to-many.
    ManyToMany,
}

/// Relation payload of a [`SpecFieldDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRelation {
    /// Relation cardinality.
    pub kind: EnumRelationKind,
    /// Related entity schema.
    pub related_entity: EntityId,
    /// Name of the reverse accessor on the related schema, if declared.
    pub related_name: Option<String>,
    /// Marks this schema as a specialization of `related_entity`.
    pub if_parent_link: bool,
}

/// Kind tag of a declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumFieldKind {
    /// Plain value field.
    Scalar(EnumScalarKind),
    /// Field referencing another entity.
    Relation(SpecRelation),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SchemaModels

/// Metadata for one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFieldDescriptor {
    /// Field name, unique within the owning schema.
    pub name: String,
    /// Scalar or relation kind.
    pub kind: EnumFieldKind,
    /// Whether a missing value may be stored.
    pub if_null: bool,
    /// Whether forms may leave the field empty.
    pub if_blank: bool,
}

impl SpecFieldDescriptor {
    /// Return the relation payload when this is a relation field.
    pub fn relation(&self) -> Option<&SpecRelation> {
        match &self.kind {
            EnumFieldKind::Relation(relation) => Some(relation),
            EnumFieldKind::Scalar(_) => None,
        }
    }

    /// Return the scalar kind when this is a scalar field.
    pub fn scalar_kind(&self) -> Option<EnumScalarKind> {
        match &self.kind {
            EnumFieldKind::Scalar(kind) => Some(*kind),
            EnumFieldKind::Relation(_) => None,
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.kind, EnumFieldKind::Relation(_))
    }

    /// Whether user input may set this field.
    ///
    /// Auto-maintained timestamps and parent links are managed by the
    /// persistence layer.
    pub fn editable(&self) -> bool {
        match &self.kind {
            EnumFieldKind::Scalar(EnumScalarKind::DateTime {
                auto_now,
                auto_now_add,
            }) => !(*auto_now || *auto_now_add),
            EnumFieldKind::Scalar(_) => true,
            EnumFieldKind::Relation(relation) => !relation.if_parent_link,
        }
    }
}

/// Reverse side of a parent-link relation declared on a subclass schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecParentLink {
    /// Accessor name on the base schema.
    pub accessor_name: String,
    /// Subclass schema declaring the link.
    pub child_entity: EntityId,
    /// Name of the one-to-one field on the subclass schema.
    pub field_name: String,
}

/// Static description of one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecEntitySchema {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) fields: Vec<SpecFieldDescriptor>,
    pub(crate) parent_links: Vec<SpecParentLink>,
    pub(crate) ordering: Vec<String>,
}

impl SpecEntitySchema {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[SpecFieldDescriptor] {
        &self.fields
    }

    /// Reverse parent links, in declaration order of the subclass schemas.
    pub fn parent_links(&self) -> &[SpecParentLink] {
        &self.parent_links
    }

    /// Default ordering expressions (`-` prefix means descending).
    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    /// Direct lookup of a declared field, no relation traversal.
    pub fn field(&self, name: &str) -> Option<&SpecFieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// The parent-link field of this schema, if it specializes another one.
    pub fn parent_link_field(&self) -> Option<&SpecFieldDescriptor> {
        self.fields
            .iter()
            .find(|field| field.relation().is_some_and(|rel| rel.if_parent_link))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Registry declaration and instance wiring errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Entity declared twice: {0:?}")]
    DuplicateEntity(String),
    #[error("Field {field:?} declared twice on entity {entity:?}")]
    DuplicateField { entity: String, field: String },
    #[error("Invalid field name {field:?} on entity {entity:?}: names must be non-empty and contain neither '.' nor '__'")]
    InvalidFieldName { entity: String, field: String },
    #[error("Field {entity:?}.{field:?} references undeclared entity {target:?}")]
    UnknownRelatedEntity {
        entity: String,
        field: String,
        target: String,
    },
    #[error("Entity {entity:?} declares more than one parent link: {fields:?}")]
    MultipleParentLinks { entity: String, fields: Vec<String> },
    #[error("Reverse accessor {accessor:?} for {child:?} clashes with a name on {base:?}")]
    ReverseAccessorClash {
        base: String,
        child: String,
        accessor: String,
    },
    #[error("Ordering entry {entry:?} on entity {entity:?} does not resolve to a declared field")]
    InvalidOrdering { entity: String, entry: String },
    #[error("Entity {child:?} is not a specialization of {base:?}")]
    NotASpecialization { base: String, child: String },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
