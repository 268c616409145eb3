//! Inputs of an entity slice.
//!
//! Every command carries a [`RequestId`] and its result echoes it back, so a
//! caller waiting on one request is never handed the outcome of another one
//! of the same kind.

use crate::entity::{Entity, ListPage, Operation, PublishStatus};
use std::fmt;
use std::num::NonZeroU32;
use uuid::Uuid;

/// Correlates a command with the result it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// A fresh random identifier
    #[must_use]
    pub fn next() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for RequestId {
    fn from(raw: Uuid) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Commands issued by views and forms, and results fed back by effects
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction<E: Entity> {
    // Commands
    /// Create a record
    Add {
        /// Correlation id
        request: RequestId,
        /// Validated payload
        draft: E::Draft,
    },
    /// Fetch one page
    GetList {
        /// Correlation id
        request: RequestId,
        /// 1-based page number
        page: NonZeroU32,
        /// Records per page
        limit: NonZeroU32,
    },
    /// Fetch one record
    GetById {
        /// Correlation id
        request: RequestId,
        /// Server identifier
        id: String,
    },
    /// Partially update a record
    Update {
        /// Correlation id
        request: RequestId,
        /// Server identifier
        id: String,
        /// Fields to change
        patch: E::Patch,
    },
    /// Delete a record
    Delete {
        /// Correlation id
        request: RequestId,
        /// Server identifier
        id: String,
    },
    /// Change publication status
    Publish {
        /// Correlation id
        request: RequestId,
        /// Server identifier
        id: String,
        /// Target status
        status: PublishStatus,
    },
    /// Clear the error slot
    ClearError,
    /// Clear the single-record cache
    ClearCurrent,

    // Results
    /// A create succeeded; `record` is `None` when the body held no record
    Added {
        /// Command this answers
        request: RequestId,
        /// Server-returned record
        record: Option<E::Record>,
    },
    /// A list page arrived
    ListLoaded {
        /// Command this answers
        request: RequestId,
        /// Parsed page
        page: ListPage<E::Record>,
    },
    /// A single record arrived
    Loaded {
        /// Command this answers
        request: RequestId,
        /// Server-returned record
        record: E::Record,
    },
    /// An update succeeded
    Updated {
        /// Command this answers
        request: RequestId,
        /// Server-returned record, when the body held one
        record: Option<E::Record>,
    },
    /// A delete succeeded
    Deleted {
        /// Command this answers
        request: RequestId,
        /// Identifier that was deleted
        id: String,
    },
    /// A status change succeeded
    Published {
        /// Command this answers
        request: RequestId,
        /// Identifier that was changed
        id: String,
        /// Server-returned record, when the body held one
        record: Option<E::Record>,
    },
    /// An operation failed
    Failed {
        /// Command this answers
        request: RequestId,
        /// Which operation
        operation: Operation,
        /// Text to show the user
        message: String,
    },
}

impl<E: Entity> EntityAction<E> {
    /// Create command with a fresh request id
    #[must_use]
    pub fn add(draft: E::Draft) -> Self {
        Self::Add {
            request: RequestId::next(),
            draft,
        }
    }

    /// Page fetch command with a fresh request id
    #[must_use]
    pub fn get_list(page: NonZeroU32, limit: NonZeroU32) -> Self {
        Self::GetList {
            request: RequestId::next(),
            page,
            limit,
        }
    }

    /// Single fetch command with a fresh request id
    #[must_use]
    pub fn get_by_id(id: impl Into<String>) -> Self {
        Self::GetById {
            request: RequestId::next(),
            id: id.into(),
        }
    }

    /// Update command with a fresh request id
    #[must_use]
    pub fn update(id: impl Into<String>, patch: E::Patch) -> Self {
        Self::Update {
            request: RequestId::next(),
            id: id.into(),
            patch,
        }
    }

    /// Delete command with a fresh request id
    #[must_use]
    pub fn delete(id: impl Into<String>) -> Self {
        Self::Delete {
            request: RequestId::next(),
            id: id.into(),
        }
    }

    /// Status change command with a fresh request id
    #[must_use]
    pub fn publish(id: impl Into<String>, status: PublishStatus) -> Self {
        Self::Publish {
            request: RequestId::next(),
            id: id.into(),
            status,
        }
    }

    /// The operation this command starts, if it is one
    #[must_use]
    pub const fn command_operation(&self) -> Option<Operation> {
        match self {
            Self::Add { .. } => Some(Operation::Add),
            Self::GetList { .. } => Some(Operation::GetList),
            Self::GetById { .. } => Some(Operation::GetOne),
            Self::Update { .. } => Some(Operation::Update),
            Self::Delete { .. } => Some(Operation::Delete),
            Self::Publish { .. } => Some(Operation::Publish),
            _ => None,
        }
    }

    /// The operation this result completes, if it is one
    #[must_use]
    pub const fn result_operation(&self) -> Option<Operation> {
        match self {
            Self::Added { .. } => Some(Operation::Add),
            Self::ListLoaded { .. } => Some(Operation::GetList),
            Self::Loaded { .. } => Some(Operation::GetOne),
            Self::Updated { .. } => Some(Operation::Update),
            Self::Deleted { .. } => Some(Operation::Delete),
            Self::Published { .. } => Some(Operation::Publish),
            Self::Failed { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// Request id of a command or a result; `None` for the clears
    #[must_use]
    pub const fn request(&self) -> Option<RequestId> {
        match self {
            Self::Add { request, .. }
            | Self::GetList { request, .. }
            | Self::GetById { request, .. }
            | Self::Update { request, .. }
            | Self::Delete { request, .. }
            | Self::Publish { request, .. }
            | Self::Added { request, .. }
            | Self::ListLoaded { request, .. }
            | Self::Loaded { request, .. }
            | Self::Updated { request, .. }
            | Self::Deleted { request, .. }
            | Self::Published { request, .. }
            | Self::Failed { request, .. } => Some(*request),
            Self::ClearError | Self::ClearCurrent => None,
        }
    }

    /// Whether this action is the outcome of `operation`
    #[must_use]
    pub fn completes(&self, operation: Operation) -> bool {
        self.result_operation() == Some(operation)
    }

    /// Whether this action is the result of the command sent as `request`
    #[must_use]
    pub fn answers(&self, request: RequestId) -> bool {
        self.result_operation().is_some() && self.request() == Some(request)
    }
}
