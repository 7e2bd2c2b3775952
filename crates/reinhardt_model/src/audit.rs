//! Audit columns shared by tracked entities.

use crate::instance::SpecEntityInstance;
use crate::registry::{SchemaRegistry, SpecEntitySchemaBuilder, SpecRelationDecl};
use crate::resolve::get_child;
use crate::spec::EnumScalarKind;

/// Names of the fields added by [`SpecEntitySchemaBuilder::with_audit_fields`].
pub const TUP_AUDIT_FIELD_NAMES: [&str; 4] = [
    "last_updated_by",
    "last_updated_at",
    "created_by",
    "created_at",
];

impl SpecEntitySchemaBuilder {
    /// Add "who/when" tracking: the current user on create and update, plus
    /// auto-maintained timestamps.
    ///
    /// Reverse accessors on `user_entity` are `<entity>_last_updated` and
    /// `<entity>_last_created`, with the entity name lowercased.
    pub fn with_audit_fields(self, user_entity: &str) -> Self {
        let c_prefix = self.name().to_lowercase();
        self.relation(
            "last_updated_by",
            SpecRelationDecl::foreign_key(user_entity)
                .related_name(format!("{c_prefix}_last_updated"))
                .optional(),
        )
        .scalar(
            "last_updated_at",
            EnumScalarKind::DateTime {
                auto_now: true,
                auto_now_add: false,
            },
        )
        .relation(
            "created_by",
            SpecRelationDecl::foreign_key(user_entity)
                .related_name(format!("{c_prefix}_last_created"))
                .optional(),
        )
        .scalar(
            "created_at",
            EnumScalarKind::DateTime {
                auto_now: false,
                auto_now_add: true,
            },
        )
    }
}

/// Instance view of an audited entity.
#[derive(Debug, Clone, Copy)]
pub struct AuditModel<'a> {
    registry: &'a SchemaRegistry,
    instance: &'a SpecEntityInstance,
}

impl<'a> AuditModel<'a> {
    pub fn new(registry: &'a SchemaRegistry, instance: &'a SpecEntityInstance) -> Self {
        Self { registry, instance }
    }

    pub fn instance(&self) -> &'a SpecEntityInstance {
        self.instance
    }

    /// Populated subclass instance, see [`get_child`].
    pub fn child(&self) -> Option<&'a SpecEntityInstance> {
        get_child(self.registry, self.instance)
    }
}
