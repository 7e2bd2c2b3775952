//! Blog post/comment entity declarations.

use crate::registry::{SchemaRegistryBuilder, SpecEntitySchemaBuilder, SpecRelationDecl};
use crate::spec::EnumScalarKind;

const KIND_DATE_ADDED: EnumScalarKind = EnumScalarKind::DateTime {
    auto_now: false,
    auto_now_add: true,
};

/// `Post`: slug, short title, body, creation timestamp and optional image,
/// newest first.
pub fn derive_post_schema() -> SpecEntitySchemaBuilder {
    SpecEntitySchemaBuilder::new("Post")
        .scalar("slug", EnumScalarKind::Slug)
        .scalar("title", EnumScalarKind::Char { max_length: 20 })
        .scalar("body", EnumScalarKind::Text)
        .scalar("date_added", KIND_DATE_ADDED)
        .scalar_optional("image", EnumScalarKind::Image)
        .ordering(["-date_added"])
}

/// `Comment`: belongs to a `Post` (reverse accessor `comments`), newest first.
pub fn derive_comment_schema() -> SpecEntitySchemaBuilder {
    SpecEntitySchemaBuilder::new("Comment")
        .relation(
            "post",
            SpecRelationDecl::foreign_key("Post").related_name("comments"),
        )
        .scalar("name", EnumScalarKind::Char { max_length: 100 })
        .scalar("body", EnumScalarKind::Text)
        .scalar("date_added", KIND_DATE_ADDED)
        .ordering(["-date_added"])
}

/// Declare `Post` and `Comment` on `builder`.
pub fn register_blog_schemas(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .entity(derive_post_schema())
        .entity(derive_comment_schema())
}
