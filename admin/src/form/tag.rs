//! Tag forms.

use crate::entities::{Tag, TagDraft, TagPatch, Tags};
use crate::form::schema::{FormValues, Rule, Schema};
use crate::form::{CreateForm, EditForm, normalized_slug};

/// Field names
pub mod fields {
    /// Display name
    pub const NAME: &str = "name";
    /// URL slug
    pub const SLUG: &str = "slug";
    /// Description
    pub const DESCRIPTION: &str = "description";
}

impl CreateForm for Tags {
    fn create_schema() -> Schema {
        Schema::new()
            .field(
                fields::NAME,
                [
                    Rule::required("Name is required"),
                    Rule::min_len(2, "Name must be at least 2 characters"),
                    Rule::max_len(100, "Name must not exceed 100 characters"),
                ],
            )
            .field(
                fields::SLUG,
                [
                    Rule::required("Slug is required"),
                    Rule::slug(),
                    Rule::min_len(2, "Slug must be at least 2 characters"),
                    Rule::max_len(100, "Slug must not exceed 100 characters"),
                ],
            )
            .field(
                fields::DESCRIPTION,
                [Rule::max_len(500, "Description must not exceed 500 characters")],
            )
    }

    fn draft(values: &FormValues) -> Option<TagDraft> {
        Some(TagDraft {
            name: values.owned_text(fields::NAME)?,
            slug: normalized_slug(values, fields::SLUG)?,
            description: values.owned_text(fields::DESCRIPTION),
        })
    }
}

impl EditForm for Tags {
    fn edit_schema() -> Schema {
        Self::create_schema()
    }

    fn edit_values(record: &Tag) -> FormValues {
        FormValues::new()
            .with(fields::NAME, record.name.as_str())
            .with(fields::SLUG, record.slug.as_str())
            .with(fields::DESCRIPTION, record.description.as_deref().unwrap_or_default())
    }

    fn patch(values: &FormValues, _current: Option<&Tag>) -> TagPatch {
        TagPatch {
            name: values.owned_text(fields::NAME),
            slug: normalized_slug(values, fields::SLUG),
            description: values.owned_text(fields::DESCRIPTION),
        }
    }
}
