//! Field-path and subclass resolution over registry metadata.
//!
//! Both resolvers only read the registry and the instance handed in; "not
//! found" is reported as `None`.

use crate::instance::SpecEntityInstance;
use crate::registry::SchemaRegistry;
use crate::spec::{SpecEntitySchema, SpecFieldDescriptor, SpecParentLink};

////////////////////////////////////////////////////////////////////////////////
// #region FieldPath

/// Split a dotted or double-underscore field path into its segments.
///
/// `__` is normalized to `.` first, so `"author__email"` and
/// `"author.email"` produce the same segments.
pub fn split_field_path(path: &str) -> Vec<String> {
    path.replace("__", ".")
        .split('.')
        .map(ToString::to_string)
        .collect()
}

/// Find a declared field by exact name in `fields`.
pub fn find_field<'a>(
    fields: &'a [SpecFieldDescriptor],
    field_name: &str,
) -> Option<&'a SpecFieldDescriptor> {
    fields.iter().find(|field| field.name == field_name)
}

/// Resolve `path` against `schema`, following relation hops.
///
/// Every segment except the last must name a relation field; the last
/// segment may name a field of any kind, so a path ending on a relation
/// returns the relation descriptor itself. Traversal through a scalar, an
/// unknown segment or an empty path yields `None`. Computed attributes are
/// never declared fields and therefore never resolve.
///
/// ```
/// use reinhardt_model::{EnumScalarKind, SchemaRegistry, SpecEntitySchemaBuilder, SpecRelationDecl};
/// use reinhardt_model::resolve_field_path;
///
/// let registry = SchemaRegistry::builder()
///     .entity(SpecEntitySchemaBuilder::new("Person").scalar("email", EnumScalarKind::Text))
///     .entity(
///         SpecEntitySchemaBuilder::new("Poll")
///             .relation("author", SpecRelationDecl::foreign_key("Person")),
///     )
///     .build()
///     .unwrap();
/// let poll = registry.entity_by_name("Poll").unwrap();
///
/// let field = resolve_field_path(&registry, poll, "author__email").unwrap();
/// assert_eq!(field.name, "email");
/// assert!(resolve_field_path(&registry, poll, "author.full_name").is_none());
/// ```
///
/// # Panics
///
/// Panics if `schema` belongs to another registry and a relation hop points
/// past the end of `registry`.
pub fn resolve_field_path<'a>(
    registry: &'a SchemaRegistry,
    schema: &'a SpecEntitySchema,
    path: &str,
) -> Option<&'a SpecFieldDescriptor> {
    if path.is_empty() {
        return None;
    }

    let l_segments = split_field_path(path);
    let n_idx_last = l_segments.len() - 1;
    let mut schema_current = schema;

    for (n_idx, segment) in l_segments.iter().enumerate() {
        let field = find_field(schema_current.fields(), segment)?;
        if n_idx == n_idx_last {
            return Some(field);
        }
        schema_current = registry.related_schema(field.relation()?);
    }

    None
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ChildResolution

/// An instance seen either as a plain base row or through its populated
/// specialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumEntityVariant<'a> {
    /// No specialization is populated.
    Base(&'a SpecEntityInstance),
    /// First populated specialization in declaration order.
    Specialized {
        /// Reverse parent link through which the child was reached.
        link: &'a SpecParentLink,
        /// The specialized (subclass) instance.
        child: &'a SpecEntityInstance,
    },
}

impl<'a> EnumEntityVariant<'a> {
    /// The specialized instance, if any.
    pub fn child(self) -> Option<&'a SpecEntityInstance> {
        match self {
            Self::Base(_) => None,
            Self::Specialized { child, .. } => Some(child),
        }
    }
}

/// Classify `instance` by its reverse parent links.
///
/// Candidate links are tried in the declaration order of the subclass
/// schemas; several populated links are tolerated and the first wins.
///
/// # Panics
///
/// Panics when `instance` belongs to an entity outside `registry`.
pub fn derive_entity_variant<'a>(
    registry: &'a SchemaRegistry,
    instance: &'a SpecEntityInstance,
) -> EnumEntityVariant<'a> {
    let schema = registry.entity(instance.entity());
    schema
        .parent_links()
        .iter()
        .find_map(|link| {
            instance
                .child(&link.accessor_name)
                .map(|child| EnumEntityVariant::Specialized { link, child })
        })
        .unwrap_or(EnumEntityVariant::Base(instance))
}

/// Most specific instance reachable from `instance` through one parent
/// link, or `None` when no specialization is populated.
pub fn get_child<'a>(
    registry: &'a SchemaRegistry,
    instance: &'a SpecEntityInstance,
) -> Option<&'a SpecEntityInstance> {
    derive_entity_variant(registry, instance).child()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{SpecEntitySchemaBuilder, SpecRelationDecl};
    use crate::spec::EnumScalarKind;

    fn poll_registry() -> SchemaRegistry {
        SchemaRegistry::builder()
            .entity(
                SpecEntitySchemaBuilder::new("Country")
                    .scalar("code", EnumScalarKind::Char { max_length: 2 }),
            )
            .entity(
                SpecEntitySchemaBuilder::new("Person")
                    .scalar("email", EnumScalarKind::Text)
                    .relation("country", SpecRelationDecl::foreign_key("Country")),
            )
            .entity(
                SpecEntitySchemaBuilder::new("Poll")
                    .scalar("name", EnumScalarKind::Text)
                    .relation("author", SpecRelationDecl::foreign_key("Person"))
                    .relation("voters", SpecRelationDecl::many_to_many("Person")),
            )
            .build()
            .expect("build registry")
    }

    #[test]
    fn split_field_path_treats_both_separators_alike() {
        assert_eq!(split_field_path("a__b.c"), vec!["a", "b", "c"]);
        assert_eq!(split_field_path("name"), vec!["name"]);
    }

    #[test]
    #[should_panic]
    fn resolve_panics_on_schema_from_a_larger_registry() {
        let registry = poll_registry();
        let poll = registry.entity_by_name("Poll").expect("Poll");
        let registry_small = SchemaRegistry::builder()
            .entity(SpecEntitySchemaBuilder::new("Country"))
            .build()
            .expect("build registry");

        let _ = resolve_field_path(&registry_small, poll, "author__email");
    }

    #[test]
    fn resolve_direct_fields() {
        let registry = poll_registry();
        for schema in registry.entities() {
            for field in schema.fields() {
                assert_eq!(
                    resolve_field_path(&registry, schema, &field.name),
                    Some(field)
                );
            }
        }
    }

    #[test]
    fn resolve_multi_hop_paths_with_either_separator() {
        let registry = poll_registry();
        let poll = registry.entity_by_name("Poll").expect("Poll");
        let country = registry.entity_by_name("Country").expect("Country");

        let dotted = resolve_field_path(&registry, poll, "author.country.code");
        let dunder = resolve_field_path(&registry, poll, "author__country__code");
        let mixed = resolve_field_path(&registry, poll, "author__country.code");
        assert_eq!(dotted, country.field("code"));
        assert_eq!(dotted, dunder);
        assert_eq!(dotted, mixed);

        let person = registry.entity_by_name("Person").expect("Person");
        assert_eq!(
            resolve_field_path(&registry, poll, "voters__email"),
            person.field("email")
        );
    }

    #[test]
    fn resolve_path_ending_on_relation_returns_relation() {
        let registry = poll_registry();
        let poll = registry.entity_by_name("Poll").expect("Poll");
        let person = registry.entity_by_name("Person").expect("Person");

        assert_eq!(
            resolve_field_path(&registry, poll, "author.country"),
            person.field("country")
        );
    }

    #[test]
    fn resolve_rejects_unknown_scalar_hops_and_empty_paths() {
        let registry = poll_registry();
        let poll = registry.entity_by_name("Poll").expect("Poll");

        assert_eq!(resolve_field_path(&registry, poll, ""), None);
        assert_eq!(resolve_field_path(&registry, poll, "nonexistent"), None);
        assert_eq!(resolve_field_path(&registry, poll, "name.anything"), None);
        assert_eq!(resolve_field_path(&registry, poll, "author.full_name"), None);
        assert_eq!(resolve_field_path(&registry, poll, "missing.email"), None);
        assert_eq!(resolve_field_path(&registry, poll, "author."), None);
        assert_eq!(resolve_field_path(&registry, poll, ".name"), None);
    }

    fn place_registry() -> SchemaRegistry {
        SchemaRegistry::builder()
            .entity(SpecEntitySchemaBuilder::new("Place").scalar("name", EnumScalarKind::Text))
            .entity(SpecEntitySchemaBuilder::new("Restaurant").parent_link("place_ptr", "Place"))
            .entity(SpecEntitySchemaBuilder::new("Bar").parent_link("place_ptr", "Place"))
            .build()
            .expect("build registry")
    }

    #[test]
    fn get_child_returns_none_without_specialization() {
        let registry = place_registry();
        let place = registry.entity_by_name("Place").expect("Place").id();
        let instance = SpecEntityInstance::new(place).with_value("name", "Corner".into());

        assert_eq!(get_child(&registry, &instance), None);
        assert_eq!(
            derive_entity_variant(&registry, &instance),
            EnumEntityVariant::Base(&instance)
        );

        let bar = registry.entity_by_name("Bar").expect("Bar").id();
        let leaf = SpecEntityInstance::new(bar);
        assert_eq!(get_child(&registry, &leaf), None);
    }

    #[test]
    fn get_child_returns_the_populated_specialization() {
        let registry = place_registry();
        let place = registry.entity_by_name("Place").expect("Place").id();
        let bar = registry.entity_by_name("Bar").expect("Bar").id();

        let mut instance = SpecEntityInstance::new(place);
        let child = SpecEntityInstance::new(bar).with_value("has_tap", true.into());
        registry
            .specialize(&mut instance, child.clone())
            .expect("specialize");

        assert_eq!(get_child(&registry, &instance), Some(&child));
        match derive_entity_variant(&registry, &instance) {
            EnumEntityVariant::Specialized { link, .. } => assert_eq!(link.accessor_name, "bar"),
            EnumEntityVariant::Base(_) => panic!("expected specialization"),
        }
    }

    #[test]
    fn get_child_prefers_first_declared_link() {
        let registry = place_registry();
        let place = registry.entity_by_name("Place").expect("Place").id();
        let restaurant = registry.entity_by_name("Restaurant").expect("Restaurant").id();
        let bar = registry.entity_by_name("Bar").expect("Bar").id();

        let mut instance = SpecEntityInstance::new(place);
        registry
            .specialize(&mut instance, SpecEntityInstance::new(bar))
            .expect("specialize bar");
        registry
            .specialize(&mut instance, SpecEntityInstance::new(restaurant))
            .expect("specialize restaurant");

        assert_eq!(
            get_child(&registry, &instance).map(SpecEntityInstance::entity),
            Some(restaurant)
        );
    }
}
