//! The content types the dashboard manages.

pub mod blog;
pub mod tag;
pub mod yacht;

pub use blog::{Blog, BlogDraft, BlogPatch, Blogs};
pub use tag::{Tag, TagDraft, TagPatch, Tags};
pub use yacht::{Yacht, YachtDraft, YachtPatch, Yachts};
