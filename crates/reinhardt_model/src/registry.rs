//! Schema declaration builders and the immutable schema registry.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::instance::SpecEntityInstance;
use crate::resolve::resolve_field_path;
use crate::spec::{
    EntityId, EnumFieldKind, EnumRelationKind, EnumScalarKind, SchemaError, SpecEntitySchema,
    SpecFieldDescriptor, SpecParentLink, SpecRelation,
};

////////////////////////////////////////////////////////////////////////////////
// #region Declarations

/// Relation declaration referencing its target entity by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRelationDecl {
    kind: EnumRelationKind,
    target: String,
    related_name: Option<String>,
    if_parent_link: bool,
    if_optional: bool,
}

impl SpecRelationDecl {
    /// Declare a relation of `kind` to entity `target`.
    pub fn new(kind: EnumRelationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            related_name: None,
            if_parent_link: false,
            if_optional: false,
        }
    }

    pub fn foreign_key(target: impl Into<String>) -> Self {
        Self::new(EnumRelationKind::ForeignKey, target)
    }

    pub fn one_to_one(target: impl Into<String>) -> Self {
        Self::new(EnumRelationKind::OneToOne, target)
    }

    pub fn many_to_many(target: impl Into<String>) -> Self {
        Self::new(EnumRelationKind::ManyToMany, target)
    }

    /// Set the reverse accessor name on the target entity.
    pub fn related_name(mut self, name: impl Into<String>) -> Self {
        self.related_name = Some(name.into());
        self
    }

    /// Allow the relation to be empty (`null` and `blank`).
    pub fn optional(mut self) -> Self {
        self.if_optional = true;
        self
    }
}

#[derive(Debug, Clone)]
enum EnumFieldDeclKind {
    Scalar(EnumScalarKind),
    Relation(SpecRelationDecl),
}

#[derive(Debug, Clone)]
struct SpecFieldDecl {
    name: String,
    kind: EnumFieldDeclKind,
    if_null: bool,
    if_blank: bool,
}

/// Declaration of one entity schema, consumed by [`SchemaRegistryBuilder`].
#[derive(Debug, Clone)]
pub struct SpecEntitySchemaBuilder {
    name: String,
    l_fields: Vec<SpecFieldDecl>,
    l_ordering: Vec<String>,
}

impl SpecEntitySchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            l_fields: Vec::new(),
            l_ordering: Vec::new(),
        }
    }

    /// Entity name this builder declares.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a required scalar field.
    pub fn scalar(mut self, name: impl Into<String>, kind: EnumScalarKind) -> Self {
        self.l_fields.push(SpecFieldDecl {
            name: name.into(),
            kind: EnumFieldDeclKind::Scalar(kind),
            if_null: false,
            if_blank: false,
        });
        self
    }

    /// Declare a scalar field that may be null and left blank.
    pub fn scalar_optional(mut self, name: impl Into<String>, kind: EnumScalarKind) -> Self {
        self.l_fields.push(SpecFieldDecl {
            name: name.into(),
            kind: EnumFieldDeclKind::Scalar(kind),
            if_null: true,
            if_blank: true,
        });
        self
    }

    /// Declare a relation field.
    pub fn relation(mut self, name: impl Into<String>, relation: SpecRelationDecl) -> Self {
        let if_optional = relation.if_optional;
        self.l_fields.push(SpecFieldDecl {
            name: name.into(),
            kind: EnumFieldDeclKind::Relation(relation),
            if_null: if_optional,
            if_blank: if_optional,
        });
        self
    }

    /// Declare the one-to-one link marking this entity as a specialization
    /// of `target`.
    pub fn parent_link(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        let mut relation = SpecRelationDecl::one_to_one(target);
        relation.if_parent_link = true;
        self.l_fields.push(SpecFieldDecl {
            name: name.into(),
            kind: EnumFieldDeclKind::Relation(relation),
            if_null: false,
            if_blank: false,
        });
        self
    }

    /// Same as [`Self::parent_link`] with an explicit reverse accessor name.
    pub fn parent_link_named(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        related_name: impl Into<String>,
    ) -> Self {
        let mut relation = SpecRelationDecl::one_to_one(target).related_name(related_name);
        relation.if_parent_link = true;
        self.l_fields.push(SpecFieldDecl {
            name: name.into(),
            kind: EnumFieldDeclKind::Relation(relation),
            if_null: false,
            if_blank: false,
        });
        self
    }

    /// Set default ordering expressions, e.g. `["-date_added"]`.
    pub fn ordering<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.l_ordering = entries.into_iter().map(Into::into).collect();
        self
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Registry

/// Collects entity declarations and validates them into a [`SchemaRegistry`].
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistryBuilder {
    l_entities: Vec<SpecEntitySchemaBuilder>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entity declaration. Declaration order is significant: it is
    /// the order in which reverse parent links are searched.
    pub fn entity(mut self, entity: SpecEntitySchemaBuilder) -> Self {
        self.l_entities.push(entity);
        self
    }

    /// Validate all declarations and freeze them.
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let mut dict_ids = BTreeMap::new();
        for (n_idx, decl) in self.l_entities.iter().enumerate() {
            if dict_ids.insert(decl.name.clone(), EntityId(n_idx)).is_some() {
                return Err(SchemaError::DuplicateEntity(decl.name.clone()));
            }
        }

        let mut l_schemas = Vec::with_capacity(self.l_entities.len());
        for (n_idx, decl) in self.l_entities.iter().enumerate() {
            l_schemas.push(derive_entity_schema(EntityId(n_idx), decl, &dict_ids)?);
        }

        attach_reverse_parent_links(&mut l_schemas)?;

        let registry = SchemaRegistry {
            schemas: l_schemas,
            dict_ids,
        };
        validate_ordering(&registry)?;

        debug!(
            n_entities = registry.schemas.len(),
            n_fields = registry
                .schemas
                .iter()
                .map(|schema| schema.fields.len())
                .sum::<usize>(),
            "schema registry built"
        );
        Ok(registry)
    }
}

/// Immutable set of entity schemas, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    schemas: Vec<SpecEntitySchema>,
    dict_ids: BTreeMap<String, EntityId>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// Schema for `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` was issued by another registry and is out of range.
    pub fn entity(&self, id: EntityId) -> &SpecEntitySchema {
        &self.schemas[id.0]
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&SpecEntitySchema> {
        self.dict_ids.get(name).map(|id| self.entity(*id))
    }

    /// All schemas in declaration order.
    pub fn entities(&self) -> &[SpecEntitySchema] {
        &self.schemas
    }

    /// Schema on the far side of `relation`.
    pub fn related_schema(&self, relation: &SpecRelation) -> &SpecEntitySchema {
        self.entity(relation.related_entity)
    }

    /// Attach `child` to `base` through the reverse parent link that the
    /// child's schema declares towards the base's schema.
    pub fn specialize(
        &self,
        base: &mut SpecEntityInstance,
        child: SpecEntityInstance,
    ) -> Result<(), SchemaError> {
        let schema_base = self.entity(base.entity());
        let Some(link) = schema_base
            .parent_links
            .iter()
            .find(|link| link.child_entity == child.entity())
        else {
            return Err(SchemaError::NotASpecialization {
                base: schema_base.name.clone(),
                child: self.entity(child.entity()).name.clone(),
            });
        };

        base.insert_child(link.accessor_name.clone(), child);
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BuildHelpers

fn validate_field_name(entity: &str, field: &str) -> Result<(), SchemaError> {
    if field.is_empty() || field.contains('.') || field.contains("__") {
        return Err(SchemaError::InvalidFieldName {
            entity: entity.to_string(),
            field: field.to_string(),
        });
    }
    Ok(())
}

fn derive_entity_schema(
    id: EntityId,
    decl: &SpecEntitySchemaBuilder,
    dict_ids: &BTreeMap<String, EntityId>,
) -> Result<SpecEntitySchema, SchemaError> {
    let mut set_names = BTreeSet::new();
    let mut l_fields = Vec::with_capacity(decl.l_fields.len());
    let mut l_parent_link_names = Vec::new();

    for field_decl in &decl.l_fields {
        validate_field_name(&decl.name, &field_decl.name)?;
        if !set_names.insert(field_decl.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                entity: decl.name.clone(),
                field: field_decl.name.clone(),
            });
        }

        let kind = match &field_decl.kind {
            EnumFieldDeclKind::Scalar(kind) => EnumFieldKind::Scalar(*kind),
            EnumFieldDeclKind::Relation(relation) => {
                let Some(related_entity) = dict_ids.get(&relation.target).copied() else {
                    return Err(SchemaError::UnknownRelatedEntity {
                        entity: decl.name.clone(),
                        field: field_decl.name.clone(),
                        target: relation.target.clone(),
                    });
                };
                if relation.if_parent_link {
                    l_parent_link_names.push(field_decl.name.clone());
                }
                EnumFieldKind::Relation(SpecRelation {
                    kind: relation.kind,
                    related_entity,
                    related_name: relation.related_name.clone(),
                    if_parent_link: relation.if_parent_link,
                })
            }
        };

        l_fields.push(SpecFieldDescriptor {
            name: field_decl.name.clone(),
            kind,
            if_null: field_decl.if_null,
            if_blank: field_decl.if_blank,
        });
    }

    if l_parent_link_names.len() > 1 {
        return Err(SchemaError::MultipleParentLinks {
            entity: decl.name.clone(),
            fields: l_parent_link_names,
        });
    }

    Ok(SpecEntitySchema {
        id,
        name: decl.name.clone(),
        fields: l_fields,
        parent_links: Vec::new(),
        ordering: decl.l_ordering.clone(),
    })
}

fn attach_reverse_parent_links(schemas: &mut [SpecEntitySchema]) -> Result<(), SchemaError> {
    let mut l_links: Vec<(EntityId, SpecParentLink)> = Vec::new();
    for schema in schemas.iter() {
        let Some(field) = schema.parent_link_field() else {
            continue;
        };
        let Some(relation) = field.relation() else {
            continue;
        };
        let accessor_name = relation
            .related_name
            .clone()
            .unwrap_or_else(|| schema.name.to_lowercase());
        l_links.push((
            relation.related_entity,
            SpecParentLink {
                accessor_name,
                child_entity: schema.id,
                field_name: field.name.clone(),
            },
        ));
    }

    for (base_id, link) in l_links {
        let child_name = schemas[link.child_entity.0].name.clone();
        let schema_base = &mut schemas[base_id.0];
        let if_clash = schema_base.field(&link.accessor_name).is_some()
            || schema_base
                .parent_links
                .iter()
                .any(|existing| existing.accessor_name == link.accessor_name);
        if if_clash {
            return Err(SchemaError::ReverseAccessorClash {
                base: schema_base.name.clone(),
                child: child_name,
                accessor: link.accessor_name,
            });
        }
        schema_base.parent_links.push(link);
    }

    Ok(())
}

fn validate_ordering(registry: &SchemaRegistry) -> Result<(), SchemaError> {
    for schema in registry.entities() {
        for entry in &schema.ordering {
            let c_path = entry.strip_prefix('-').unwrap_or(entry);
            if resolve_field_path(registry, schema, c_path).is_none() {
                return Err(SchemaError::InvalidOrdering {
                    entity: schema.name.clone(),
                    entry: entry.clone(),
                });
            }
        }
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
