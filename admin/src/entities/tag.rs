//! Tags used to group content.

use crate::entity::{Entity, Routes};
use chrono::{DateTime, Utc};
use faraway_admin_api::MultipartForm;
use serde::{Deserialize, Serialize};

/// Marker for the tag resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags;

/// A tag as stored by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Server identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// URL slug
    #[serde(default)]
    pub slug: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated input for a new tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagDraft {
    /// Display name
    pub name: String,
    /// Slug, lower-cased
    pub slug: String,
    /// Optional description
    pub description: Option<String>,
}

/// Partial tag update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagPatch {
    /// New name
    pub name: Option<String>,
    /// New slug
    pub slug: Option<String>,
    /// New description
    pub description: Option<String>,
}

impl Entity for Tags {
    type Record = Tag;
    type Draft = TagDraft;
    type Patch = TagPatch;

    const NAME: &'static str = "tag";
    const PLURAL: &'static str = "tags";
    const TITLE: &'static str = "Tag";
    const LIST_KEY: &'static str = "tags";
    const ROUTES: Routes = Routes {
        base: "/tags",
        add: "add-tag",
        list: "all-tags",
        by_id: "tagByID",
        get_alt: None,
        edit: "edit-tag",
        delete: "delete-tag",
        status: None,
    };

    fn id(record: &Tag) -> &str {
        &record.id
    }

    fn display_title(record: &Tag) -> &str {
        &record.name
    }

    fn draft_form(draft: &TagDraft) -> MultipartForm {
        MultipartForm::new()
            .text("name", draft.name.as_str())
            .text("slug", draft.slug.as_str())
            .text_if_present("description", draft.description.as_deref())
    }

    fn patch_form(patch: &TagPatch) -> MultipartForm {
        MultipartForm::new()
            .text_if_present("name", patch.name.as_deref())
            .text_if_present("slug", patch.slug.as_deref())
            .text_if_present("description", patch.description.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_without_description() {
        let tag: Tag = serde_json::from_value(json!({ "_id": "t1", "name": "Diving", "slug": "diving" })).unwrap();
        assert_eq!(Tags::display_title(&tag), "Diving");
        assert!(tag.description.is_none());
    }

    #[test]
    fn test_draft_form_omits_blank_description() {
        let form = Tags::draft_form(&TagDraft {
            name: "Diving".to_string(),
            slug: "diving".to_string(),
            description: None,
        });
        assert!(!form.contains("description"));
        assert_eq!(form.text_value("slug"), Some("diving"));
    }
}
