//! Yacht listing forms.

use crate::entities::{Yacht, YachtDraft, YachtPatch, Yachts};
use crate::form::schema::{FieldValue, FormValues, Rule, Schema};
use crate::form::{CreateForm, EditForm, new_upload, normalized_slug};

/// Field names
pub mod fields {
    /// Listing headline
    pub const TITLE: &str = "title";
    /// URL slug
    pub const SLUG: &str = "slug";
    /// Boat type
    pub const BOAT_TYPE: &str = "boatType";
    /// Maximum passengers
    pub const CAPACITY: &str = "capacity";
    /// Cabins
    pub const CABINS: &str = "cabins";
    /// Overnight guests
    pub const GUESTS: &str = "guests";
    /// Day trip price
    pub const DAY_TRIP_PRICE: &str = "dayTripPrice";
    /// Overnight price
    pub const OVERNIGHT_PRICE: &str = "overnightPrice";
    /// Video URL
    pub const VIDEO_LINK: &str = "videoLink";
    /// Main photo
    pub const PRIMARY_IMAGE: &str = "primaryImage";
    /// Additional photos
    pub const GALLERY_IMAGES: &str = "galleryImages";
}

fn schema(primary_image: Vec<Rule>) -> Schema {
    Schema::new()
        .field(
            fields::TITLE,
            [
                Rule::required("Title is required"),
                Rule::min_len(3, "Title must be at least 3 characters"),
                Rule::max_len(200, "Title must not exceed 200 characters"),
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
        .field(fields::BOAT_TYPE, [Rule::required("Boat type is required")])
        .field(
            fields::CAPACITY,
            [
                Rule::required("Capacity is required"),
                Rule::digits("Capacity must be a whole number"),
            ],
        )
        .field(fields::CABINS, [Rule::digits("Cabins must be a whole number")])
        .field(fields::GUESTS, [Rule::digits("Guests must be a whole number")])
        .field(fields::DAY_TRIP_PRICE, [Rule::decimal("Day trip price must be a number")])
        .field(fields::OVERNIGHT_PRICE, [Rule::decimal("Overnight price must be a number")])
        .field(fields::VIDEO_LINK, [Rule::http_url("Video link must be a valid URL")])
        .field(fields::PRIMARY_IMAGE, primary_image)
        .field(fields::GALLERY_IMAGES, [Rule::image_size(), Rule::image_type()])
}

impl CreateForm for Yachts {
    fn create_schema() -> Schema {
        schema(vec![
            Rule::required("Primary image is required"),
            Rule::image_size(),
            Rule::image_type(),
        ])
    }

    fn draft(values: &FormValues) -> Option<YachtDraft> {
        Some(YachtDraft {
            title: values.owned_text(fields::TITLE)?,
            slug: normalized_slug(values, fields::SLUG)?,
            boat_type: values.owned_text(fields::BOAT_TYPE)?,
            capacity: values.owned_text(fields::CAPACITY)?,
            cabins: values.owned_text(fields::CABINS),
            guests: values.owned_text(fields::GUESTS),
            day_trip_price: values.owned_text(fields::DAY_TRIP_PRICE),
            overnight_price: values.owned_text(fields::OVERNIGHT_PRICE),
            video_link: values.owned_text(fields::VIDEO_LINK),
            primary_image: values.file(fields::PRIMARY_IMAGE)?.clone(),
            gallery_images: values.get(fields::GALLERY_IMAGES).files().to_vec(),
        })
    }
}

impl EditForm for Yachts {
    fn edit_schema() -> Schema {
        schema(vec![Rule::image_size(), Rule::image_type()])
    }

    fn edit_values(record: &Yacht) -> FormValues {
        FormValues::new()
            .with(fields::TITLE, record.title.as_str())
            .with(fields::SLUG, record.slug.as_str())
            .with(fields::BOAT_TYPE, record.boat_type.as_str())
            .with(fields::CAPACITY, record.capacity.as_str())
            .with(fields::CABINS, record.cabins.as_str())
            .with(fields::GUESTS, record.guests.as_str())
            .with(fields::DAY_TRIP_PRICE, record.day_trip_price.as_str())
            .with(fields::OVERNIGHT_PRICE, record.overnight_price.as_str())
            .with(fields::VIDEO_LINK, record.video_link.as_deref().unwrap_or_default())
            .with(
                fields::PRIMARY_IMAGE,
                record
                    .primary_image
                    .as_deref()
                    .map_or(FieldValue::Empty, FieldValue::from),
            )
    }

    fn patch(values: &FormValues, _current: Option<&Yacht>) -> YachtPatch {
        YachtPatch {
            title: values.owned_text(fields::TITLE),
            slug: normalized_slug(values, fields::SLUG),
            boat_type: values.owned_text(fields::BOAT_TYPE),
            capacity: values.owned_text(fields::CAPACITY),
            cabins: values.owned_text(fields::CABINS),
            guests: values.owned_text(fields::GUESTS),
            day_trip_price: values.owned_text(fields::DAY_TRIP_PRICE),
            overnight_price: values.owned_text(fields::OVERNIGHT_PRICE),
            video_link: values.owned_text(fields::VIDEO_LINK),
            primary_image: new_upload(values, fields::PRIMARY_IMAGE),
            gallery_images: values.get(fields::GALLERY_IMAGES).files().to_vec(),
        }
    }
}
