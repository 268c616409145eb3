//! Per-entity state slices.
//!
//! One [`EntityState`] per content type holds the loaded list page, the
//! single-record cache, a loading flag per operation and the last error.
//! [`EntityReducer`] is the only code that changes it:
//!
//! ```text
//! command ──► reducer: flag on, error cleared ──► Effect::Future (HTTP)
//!                                                      │
//! result  ◄────────────────────────────────────────────┘
//!    └──► reducer: flag off, cache slot or error slot filled
//! ```
//!
//! Results are applied in the order they resolve. Two overlapping list
//! fetches both write the same slot and the later response wins, while each
//! result still names the [`RequestId`] of the command that started it.

pub mod actions;
pub mod environment;
pub mod reducer;
#[cfg(test)]
mod tests;
pub mod types;

pub use actions::{EntityAction, RequestId};
pub use environment::AdminEnvironment;
pub use reducer::EntityReducer;
pub use types::{EntityState, ListState, OperationFlags};
