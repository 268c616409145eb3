//! Forms: validation schemas, field state and payload shaping.
//!
//! A [`FormController`] tracks values, touched fields and errors against a
//! [`Schema`]. When a submit passes validation, [`CreateForm::draft`] or
//! [`EditForm::patch`] turns the values into the payload an entity slice
//! sends. Invalid forms never produce a payload, so nothing reaches the
//! network.

pub mod blog;
pub mod controller;
pub mod schema;
pub mod tag;
pub mod yacht;

pub use controller::{FieldStatus, FormController};
pub use schema::{FieldValue, FormValues, Rule, Schema};

use crate::root::AdminSlice;

/// An entity that can be created from a form
pub trait CreateForm: AdminSlice {
    /// Rules for the create form
    fn create_schema() -> Schema;

    /// Payload from validated values
    ///
    /// Text is trimmed and slugs are lower-cased. `None` only when a required
    /// value is missing, which a passing schema rules out.
    fn draft(values: &FormValues) -> Option<Self::Draft>;

    /// A fresh create form
    #[must_use]
    fn create_form() -> FormController {
        FormController::new(Self::create_schema())
    }
}

/// An entity that can be edited through a form
pub trait EditForm: CreateForm {
    /// Rules for the edit form; uploads are optional and may hold the URL
    /// of the current image
    fn edit_schema() -> Schema;

    /// Form values initialised from a cached record
    fn edit_values(record: &Self::Record) -> FormValues;

    /// Partial payload: only non-empty fields, new uploads only
    fn patch(values: &FormValues, current: Option<&Self::Record>) -> Self::Patch;

    /// An edit form pre-filled from `record`
    #[must_use]
    fn edit_form(record: &Self::Record) -> FormController {
        FormController::with_values(Self::edit_schema(), Self::edit_values(record))
    }
}

/// Trimmed, lower-cased slug
pub(crate) fn normalized_slug(values: &FormValues, name: &str) -> Option<String> {
    values.text(name).map(str::to_lowercase)
}

/// A newly chosen upload; URLs of existing images are not re-sent
pub(crate) fn new_upload(values: &FormValues, name: &str) -> Option<faraway_admin_api::FilePart> {
    match values.get(name) {
        FieldValue::File(file) => Some(file.clone()),
        _ => None,
    }
}
