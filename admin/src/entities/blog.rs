//! Blog posts.

use crate::entity::{Entity, PublishStatus, Routes};
use chrono::{DateTime, Utc};
use faraway_admin_api::{FilePart, MultipartForm};
use serde::{Deserialize, Serialize};

/// Marker for the blog resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blogs;

/// A blog post as stored by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    /// Server identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Headline
    pub title: String,
    /// URL slug
    #[serde(default)]
    pub slug: String,
    /// Teaser shown in listings
    #[serde(default)]
    pub short_description: String,
    /// Body (HTML)
    #[serde(default)]
    pub detail_description: String,
    /// URL of the cover image
    #[serde(default)]
    pub image: Option<String>,
    /// Publication status
    #[serde(default)]
    pub status: PublishStatus,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated input for a new post
#[derive(Debug, Clone, PartialEq)]
pub struct BlogDraft {
    /// Headline, trimmed
    pub title: String,
    /// Slug, trimmed and lower-cased
    pub slug: String,
    /// Teaser, trimmed
    pub short_description: String,
    /// Body, trimmed
    pub detail_description: String,
    /// Cover image upload
    pub image: FilePart,
    /// Initial status
    pub status: PublishStatus,
}

/// Partial update; only populated fields are sent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPatch {
    /// New headline
    pub title: Option<String>,
    /// New slug
    pub slug: Option<String>,
    /// New teaser
    pub short_description: Option<String>,
    /// New body
    pub detail_description: Option<String>,
    /// Always sent; the API requires it on every edit
    pub status: PublishStatus,
    /// Replacement cover image
    pub image: Option<FilePart>,
}

impl Entity for Blogs {
    type Record = Blog;
    type Draft = BlogDraft;
    type Patch = BlogPatch;

    const NAME: &'static str = "blog";
    const PLURAL: &'static str = "blogs";
    const TITLE: &'static str = "Blog";
    const LIST_KEY: &'static str = "blogs";
    const ROUTES: Routes = Routes {
        base: "/blog",
        add: "add-blog",
        list: "all-blogs",
        by_id: "blogByID",
        get_alt: Some("get-blog"),
        edit: "edit-blog",
        delete: "delete-blog",
        status: Some("update-status"),
    };

    fn id(record: &Blog) -> &str {
        &record.id
    }

    fn display_title(record: &Blog) -> &str {
        &record.title
    }

    fn draft_form(draft: &BlogDraft) -> MultipartForm {
        MultipartForm::new()
            .text("title", draft.title.as_str())
            .text("slug", draft.slug.as_str())
            .text("status", draft.status.as_str())
            .text("shortDescription", draft.short_description.as_str())
            .text("detailDescription", draft.detail_description.as_str())
            .file("image", draft.image.clone())
    }

    fn patch_form(patch: &BlogPatch) -> MultipartForm {
        MultipartForm::new()
            .text_if_present("title", patch.title.as_deref())
            .text_if_present("slug", patch.slug.as_deref())
            .text_if_present("shortDescription", patch.short_description.as_deref())
            .text_if_present("detailDescription", patch.detail_description.as_deref())
            .text("status", patch.status.as_str())
            .file_if_present("image", patch.image.clone())
    }
}
