//! Yacht listings.

use crate::entity::{Entity, Routes, lenient};
use chrono::{DateTime, Utc};
use faraway_admin_api::{FilePart, MultipartForm};
use serde::{Deserialize, Serialize};

/// Marker for the yacht resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Yachts;

/// A yacht listing as stored by the server
///
/// Counts and prices are kept as the text the server sent; the backend is
/// not consistent about numbers versus strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Yacht {
    /// Server identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Listing headline
    pub title: String,
    /// URL slug
    #[serde(default)]
    pub slug: String,
    /// Boat type, e.g. catamaran
    #[serde(default)]
    pub boat_type: String,
    /// Maximum passengers
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub capacity: String,
    /// Number of cabins
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub cabins: String,
    /// Overnight guests
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub guests: String,
    /// Day trip price
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub day_trip_price: String,
    /// Overnight price
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub overnight_price: String,
    /// Main photo URL
    #[serde(default)]
    pub primary_image: Option<String>,
    /// Additional photo URLs
    #[serde(default)]
    pub gallery_images: Vec<String>,
    /// Video URL
    #[serde(default)]
    pub video_link: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated input for a new listing
#[derive(Debug, Clone, PartialEq)]
pub struct YachtDraft {
    /// Listing headline
    pub title: String,
    /// Slug, lower-cased
    pub slug: String,
    /// Boat type
    pub boat_type: String,
    /// Maximum passengers, digits only
    pub capacity: String,
    /// Cabins, digits only
    pub cabins: Option<String>,
    /// Guests, digits only
    pub guests: Option<String>,
    /// Day trip price
    pub day_trip_price: Option<String>,
    /// Overnight price
    pub overnight_price: Option<String>,
    /// Video URL
    pub video_link: Option<String>,
    /// Main photo
    pub primary_image: FilePart,
    /// Additional photos
    pub gallery_images: Vec<FilePart>,
}

/// Partial listing update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YachtPatch {
    /// New headline
    pub title: Option<String>,
    /// New slug
    pub slug: Option<String>,
    /// New boat type
    pub boat_type: Option<String>,
    /// New capacity
    pub capacity: Option<String>,
    /// New cabin count
    pub cabins: Option<String>,
    /// New guest count
    pub guests: Option<String>,
    /// New day trip price
    pub day_trip_price: Option<String>,
    /// New overnight price
    pub overnight_price: Option<String>,
    /// New video URL
    pub video_link: Option<String>,
    /// Replacement main photo
    pub primary_image: Option<FilePart>,
    /// Photos to add to the gallery
    pub gallery_images: Vec<FilePart>,
}

fn with_gallery(form: MultipartForm, images: &[FilePart]) -> MultipartForm {
    images
        .iter()
        .fold(form, |form, image| form.file("galleryImages", image.clone()))
}

impl Entity for Yachts {
    type Record = Yacht;
    type Draft = YachtDraft;
    type Patch = YachtPatch;

    const NAME: &'static str = "yacht";
    const PLURAL: &'static str = "yachts";
    const TITLE: &'static str = "Yacht";
    const LIST_KEY: &'static str = "yachts";
    const ROUTES: Routes = Routes {
        base: "/yachts",
        add: "add-yacht",
        list: "all-yachts",
        by_id: "yachtByID",
        get_alt: None,
        edit: "edit-yacht",
        delete: "delete-yacht",
        status: None,
    };

    fn id(record: &Yacht) -> &str {
        &record.id
    }

    fn display_title(record: &Yacht) -> &str {
        &record.title
    }

    fn draft_form(draft: &YachtDraft) -> MultipartForm {
        let form = MultipartForm::new()
            .text("title", draft.title.as_str())
            .text("slug", draft.slug.as_str())
            .text("boatType", draft.boat_type.as_str())
            .text("capacity", draft.capacity.as_str())
            .text_if_present("cabins", draft.cabins.as_deref())
            .text_if_present("guests", draft.guests.as_deref())
            .text_if_present("dayTripPrice", draft.day_trip_price.as_deref())
            .text_if_present("overnightPrice", draft.overnight_price.as_deref())
            .text_if_present("videoLink", draft.video_link.as_deref())
            .file("primaryImage", draft.primary_image.clone());
        with_gallery(form, &draft.gallery_images)
    }

    fn patch_form(patch: &YachtPatch) -> MultipartForm {
        let form = MultipartForm::new()
            .text_if_present("title", patch.title.as_deref())
            .text_if_present("slug", patch.slug.as_deref())
            .text_if_present("boatType", patch.boat_type.as_deref())
            .text_if_present("capacity", patch.capacity.as_deref())
            .text_if_present("cabins", patch.cabins.as_deref())
            .text_if_present("guests", patch.guests.as_deref())
            .text_if_present("dayTripPrice", patch.day_trip_price.as_deref())
            .text_if_present("overnightPrice", patch.overnight_price.as_deref())
            .text_if_present("videoLink", patch.video_link.as_deref())
            .file_if_present("primaryImage", patch.primary_image.clone());
        with_gallery(form, &patch.gallery_images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_or_strings() {
        let yacht: Yacht = serde_json::from_value(json!({
            "_id": "y1",
            "title": "Sea Breeze",
            "capacity": 12,
            "cabins": "3",
            "dayTripPrice": 1499.5,
            "guests": null,
            "galleryImages": ["https://cdn.example.com/1.jpg"]
        }))
        .unwrap();

        assert_eq!(yacht.capacity, "12");
        assert_eq!(yacht.cabins, "3");
        assert_eq!(yacht.day_trip_price, "1499.5");
        assert_eq!(yacht.guests, "");
        assert_eq!(yacht.overnight_price, "");
        assert_eq!(yacht.gallery_images.len(), 1);
    }

    #[test]
    fn test_gallery_images_repeat_field() {
        let image = |name: &str| FilePart::new(name, "image/jpeg", vec![0]);
        let form = Yachts::draft_form(&YachtDraft {
            title: "Sea Breeze".to_string(),
            slug: "sea-breeze".to_string(),
            boat_type: "Catamaran".to_string(),
            capacity: "12".to_string(),
            cabins: None,
            guests: Some("8".to_string()),
            day_trip_price: None,
            overnight_price: None,
            video_link: None,
            primary_image: image("main.jpg"),
            gallery_images: vec![image("a.jpg"), image("b.jpg")],
        });

        let gallery = form.parts().iter().filter(|(name, _)| name == "galleryImages").count();
        assert_eq!(gallery, 2);
        assert!(!form.contains("cabins"));
        assert_eq!(form.text_value("guests"), Some("8"));
    }
}
