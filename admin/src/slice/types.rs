//! State held for each entity type.

use crate::entity::{Entity, ListPage, Operation};
use chrono::{DateTime, Utc};

/// The most recently loaded list page, replaced wholesale on each fetch
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<R> {
    /// Records in server order
    pub records: Vec<R>,
    /// Total records across all pages
    pub total: u64,
    /// Number of pages
    pub total_pages: u32,
    /// Page the records belong to
    pub current_page: u32,
}

impl<R> Default for ListState<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            total_pages: 0,
            current_page: 1,
        }
    }
}

impl<R> From<ListPage<R>> for ListState<R> {
    fn from(page: ListPage<R>) -> Self {
        Self {
            records: page.records,
            total: page.total,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

/// One loading flag per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct OperationFlags {
    /// Create in flight
    pub add: bool,
    /// List fetch in flight
    pub get_list: bool,
    /// Single fetch in flight
    pub get_one: bool,
    /// Update in flight
    pub update: bool,
    /// Delete in flight
    pub delete: bool,
    /// Status change in flight
    pub publish: bool,
}

impl OperationFlags {
    /// Set the flag for `operation`
    pub const fn set(&mut self, operation: Operation, loading: bool) {
        match operation {
            Operation::Add => self.add = loading,
            Operation::GetList => self.get_list = loading,
            Operation::GetOne => self.get_one = loading,
            Operation::Update => self.update = loading,
            Operation::Delete => self.delete = loading,
            Operation::Publish => self.publish = loading,
        }
    }

    /// Whether `operation` is in flight
    #[must_use]
    pub const fn get(&self, operation: Operation) -> bool {
        match operation {
            Operation::Add => self.add,
            Operation::GetList => self.get_list,
            Operation::GetOne => self.get_one,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
            Operation::Publish => self.publish,
        }
    }

    /// Whether anything is in flight
    #[must_use]
    pub const fn any(&self) -> bool {
        self.add || self.get_list || self.get_one || self.update || self.delete || self.publish
    }
}

/// Client-side cache and request status for one entity type
///
/// The cache is a read-through copy of server data. It only becomes
/// consistent with the server again after the next successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E: Entity> {
    /// Last loaded list page
    pub list: ListState<E::Record>,
    /// Single-record cache (last fetched, created, updated or published)
    pub current: Option<E::Record>,
    /// Loading flags
    pub flags: OperationFlags,
    /// Last error message; cleared explicitly or by the next operation
    pub error: Option<String>,
    /// When the list was last replaced
    pub last_synced: Option<DateTime<Utc>>,
}

impl<E: Entity> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            list: ListState::default(),
            current: None,
            flags: OperationFlags::default(),
            error: None,
            last_synced: None,
        }
    }
}

impl<E: Entity> EntityState<E> {
    /// Loaded record with identifier `id`
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&E::Record> {
        self.list.records.iter().find(|record| E::id(record) == id)
    }

    /// Cached record with identifier `id`, preferring the single-record cache
    #[must_use]
    pub fn cached(&self, id: &str) -> Option<&E::Record> {
        self.current
            .as_ref()
            .filter(|record| E::id(record) == id)
            .or_else(|| self.find(id))
    }
}
