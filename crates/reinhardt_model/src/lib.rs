//! `reinhardt_model` v1:
//! Entity schema metadata and the resolvers built on it.
//!
//! Modules:
//! - `spec`     : schema models and errors
//! - `registry` : declaration builders and the immutable registry
//! - `instance` : runtime instances
//! - `resolve`  : field-path and child resolution
//! - `audit`    : audit columns and the audit model view
//! - `mixins`   : permission hooks
//! - `manager`  : single-object lookup contract
//! - `blog`     : blog post/comment declarations
pub mod audit;
pub mod blog;
pub mod instance;
pub mod manager;
pub mod mixins;
pub mod registry;
pub mod resolve;
pub mod spec;

pub use audit::{AuditModel, TUP_AUDIT_FIELD_NAMES};
pub use blog::{derive_comment_schema, derive_post_schema, register_blog_schemas};
pub use instance::{EnumFieldValue, EnumScalarValue, SpecEntityInstance};
pub use manager::{ObjectLookupError, ObjectManager};
pub use mixins::ModelPermissions;
pub use registry::{
    SchemaRegistry, SchemaRegistryBuilder, SpecEntitySchemaBuilder, SpecRelationDecl,
};
pub use resolve::{
    EnumEntityVariant, derive_entity_variant, find_field, get_child, resolve_field_path,
    split_field_path,
};
pub use spec::{
    EntityId, EnumFieldKind, EnumRelationKind, EnumScalarKind, SchemaError, SpecEntitySchema,
    SpecFieldDescriptor, SpecParentLink, SpecRelation,
};
