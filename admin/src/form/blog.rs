//! Blog create and edit forms.

use crate::entities::{Blog, BlogDraft, BlogPatch, Blogs};
use crate::entity::PublishStatus;
use crate::form::schema::{FieldValue, FormValues, Rule, Schema};
use crate::form::{CreateForm, EditForm, new_upload, normalized_slug};

/// Field names
pub mod fields {
    /// Headline
    pub const TITLE: &str = "title";
    /// URL slug
    pub const SLUG: &str = "slug";
    /// Teaser
    pub const SHORT_DESCRIPTION: &str = "shortDescription";
    /// Body
    pub const DETAIL_DESCRIPTION: &str = "detailDescription";
    /// Cover image
    pub const IMAGE: &str = "image";
}

fn text_fields(schema: Schema) -> Schema {
    schema
        .field(
            fields::TITLE,
            [
                Rule::required("Title is required"),
                Rule::min_len(3, "Title must be at least 3 characters"),
                Rule::max_len(300, "Title must not exceed 300 characters"),
            ],
        )
        .field(
            fields::SLUG,
            [
                Rule::required("Slug is required"),
                Rule::slug(),
                Rule::min_len(3, "Slug must be at least 3 characters"),
                Rule::max_len(100, "Slug must not exceed 100 characters"),
            ],
        )
        .field(
            fields::SHORT_DESCRIPTION,
            [
                Rule::required("Description is required"),
                Rule::min_len(10, "Description must be at least 10 characters"),
                Rule::max_len(600, "Description must not exceed 600 characters"),
            ],
        )
        .field(
            fields::DETAIL_DESCRIPTION,
            [
                Rule::required("Content is required"),
                Rule::min_len(50, "Content must be at least 50 characters"),
            ],
        )
}

impl CreateForm for Blogs {
    fn create_schema() -> Schema {
        text_fields(Schema::new()).field(
            fields::IMAGE,
            [
                Rule::required("Primary image is required"),
                Rule::image_size(),
                Rule::image_type(),
            ],
        )
    }

    fn draft(values: &FormValues) -> Option<BlogDraft> {
        Some(BlogDraft {
            title: values.owned_text(fields::TITLE)?,
            slug: normalized_slug(values, fields::SLUG)?,
            short_description: values.owned_text(fields::SHORT_DESCRIPTION)?,
            detail_description: values.owned_text(fields::DETAIL_DESCRIPTION)?,
            image: values.file(fields::IMAGE)?.clone(),
            status: PublishStatus::Draft,
        })
    }
}

impl EditForm for Blogs {
    fn edit_schema() -> Schema {
        text_fields(Schema::new()).field(fields::IMAGE, [Rule::image_size(), Rule::image_type()])
    }

    fn edit_values(record: &Blog) -> FormValues {
        FormValues::new()
            .with(fields::TITLE, record.title.as_str())
            .with(fields::SLUG, record.slug.as_str())
            .with(fields::SHORT_DESCRIPTION, record.short_description.as_str())
            .with(fields::DETAIL_DESCRIPTION, record.detail_description.as_str())
            .with(
                fields::IMAGE,
                record
                    .image
                    .as_deref()
                    .map_or(FieldValue::Empty, FieldValue::from),
            )
    }

    fn patch(values: &FormValues, current: Option<&Blog>) -> BlogPatch {
        BlogPatch {
            title: values.owned_text(fields::TITLE),
            slug: normalized_slug(values, fields::SLUG),
            short_description: values.owned_text(fields::SHORT_DESCRIPTION),
            detail_description: values.owned_text(fields::DETAIL_DESCRIPTION),
            status: current.map_or(PublishStatus::Draft, |blog| blog.status),
            image: new_upload(values, fields::IMAGE),
        }
    }
}
