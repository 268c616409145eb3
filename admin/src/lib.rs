//! # Faraway Admin
//!
//! Client-side core of the Faraway content dashboard.
//!
//! Blogs, tags and yacht listings are managed through the same pieces:
//!
//! - [`entity::Entity`] describes a content type: its records, its create
//!   and update payloads and the shape of its REST endpoints.
//! - [`slice`] holds one state container per content type and the reducer
//!   that turns commands into HTTP effects and results into state.
//! - [`root`] scopes every slice onto [`AdminState`] and combines them.
//! - [`form`] validates input and shapes it into payloads; an invalid form
//!   never reaches the network.
//! - [`list_view`] pages, searches and confirms deletes over a loaded page.
//! - [`dashboard::AdminDashboard`] runs the root reducer in a store and
//!   offers request/response calls on top of it.
//!
//! ## Example
//!
//! ```no_run
//! use faraway_admin::entities::Blogs;
//! use faraway_admin::form::CreateForm;
//! use faraway_admin::{AdminConfig, AdminDashboard, notify};
//! use faraway_admin::entity::Operation;
//!
//! # async fn run() -> Result<(), faraway_admin::DashboardError> {
//! let dashboard = AdminDashboard::from_config(&AdminConfig::from_env()?)?;
//!
//! let mut form = Blogs::create_form();
//! form.set_value("title", "Island hopping");
//! form.set_value("slug", "My Slug!");
//!
//! let result = dashboard.submit_create::<Blogs>(&mut form).await;
//! if let Some(toast) = notify::outcome::<Blogs, _>(Operation::Add, &result) {
//!     println!("{toast}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dashboard;
pub mod entities;
pub mod entity;
pub mod form;
pub mod list_view;
pub mod media;
pub mod notify;
pub mod root;
pub mod slice;

pub use config::AdminConfig;
pub use dashboard::{AdminDashboard, AdminStore, DashboardError};
pub use entity::{Entity, ListPage, Operation, PublishStatus};
pub use list_view::{ListDisplay, ListView};
pub use notify::Notification;
pub use root::{AdminAction, AdminReducer, AdminSlice, AdminState, admin_reducer};
