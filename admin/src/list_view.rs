//! Paged, searchable list of one entity type.
//!
//! The view owns only presentation state: the requested page, the search
//! text and a pending delete. Records come from the entity slice, and the
//! search filters the loaded page only. Matches on other pages are not found.

use crate::entity::Entity;
use crate::slice::{EntityAction, EntityState, ListState};
use std::marker::PhantomData;
use std::num::NonZeroU32;

/// What the list area shows
#[derive(Debug, PartialEq)]
pub enum ListDisplay<'a, R> {
    /// A list fetch is in flight
    Loading,
    /// The search matches nothing on this page
    NoMatches,
    /// Nothing is loaded; carries the empty-state text
    Empty(String),
    /// Matching records in server order
    Items(Vec<&'a R>),
}

/// Presentation state of an entity list
pub struct ListView<E: Entity> {
    page: NonZeroU32,
    page_size: NonZeroU32,
    search: String,
    pending_delete: Option<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> ListView<E> {
    /// First page, no search
    #[must_use]
    pub const fn new(page_size: NonZeroU32) -> Self {
        Self {
            page: NonZeroU32::MIN,
            page_size,
            search: String::new(),
            pending_delete: None,
            _entity: PhantomData,
        }
    }

    /// Requested page
    #[must_use]
    pub const fn page(&self) -> NonZeroU32 {
        self.page
    }

    /// Records per page
    #[must_use]
    pub const fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Current search text
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search text
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Fetch command for the requested page
    #[must_use]
    pub fn load_action(&self) -> EntityAction<E> {
        EntityAction::get_list(self.page, self.page_size)
    }

    fn last_page(list: &ListState<E::Record>) -> u32 {
        list.total_pages.max(1)
    }

    /// Move to `page`, clamped to the loaded page count
    ///
    /// Returns whether the page changed; a fetch is only needed then.
    pub fn goto_page(&mut self, page: u32, list: &ListState<E::Record>) -> bool {
        let clamped = page.clamp(1, Self::last_page(list));
        let target = NonZeroU32::new(clamped).unwrap_or(NonZeroU32::MIN);
        let changed = target != self.page;
        self.page = target;
        changed
    }

    /// Next page, if there is one
    pub fn next_page(&mut self, list: &ListState<E::Record>) -> bool {
        self.goto_page(self.page.get().saturating_add(1), list)
    }

    /// Previous page, if there is one
    pub fn prev_page(&mut self, list: &ListState<E::Record>) -> bool {
        self.goto_page(self.page.get().saturating_sub(1), list)
    }

    /// Records on the loaded page whose title contains the search text,
    /// ignoring case
    #[must_use]
    pub fn filter<'a>(&self, records: &'a [E::Record]) -> Vec<&'a E::Record> {
        let needle = self.search.trim().to_lowercase();
        records
            .iter()
            .filter(|record| needle.is_empty() || E::display_title(record).to_lowercase().contains(&needle))
            .collect()
    }

    /// What to render for `state`
    #[must_use]
    pub fn display<'a>(&self, state: &'a EntityState<E>) -> ListDisplay<'a, E::Record> {
        if state.flags.get_list {
            return ListDisplay::Loading;
        }
        if state.list.records.is_empty() {
            return ListDisplay::Empty(format!("No {} available.", E::PLURAL));
        }
        let items = self.filter(&state.list.records);
        if items.is_empty() {
            ListDisplay::NoMatches
        } else {
            ListDisplay::Items(items)
        }
    }

    /// Open the delete confirmation for `id`
    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.pending_delete = Some(id.into());
    }

    /// Identifier awaiting confirmation
    #[must_use]
    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Close the confirmation without deleting
    pub fn cancel_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    /// Close the confirmation and produce the delete command
    pub fn confirm_delete(&mut self) -> Option<EntityAction<E>> {
        self.pending_delete.take().map(EntityAction::delete)
    }
}

impl<E: Entity> Clone for ListView<E> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
            pending_delete: self.pending_delete.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> std::fmt::Debug for ListView<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("entity", &E::PLURAL)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("search", &self.search)
            .field("pending_delete", &self.pending_delete)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Blog, Blogs, Tag, Tags};
    use proptest::prelude::*;
    use serde_json::json;

    fn tag(id: &str, name: &str) -> Tag {
        serde_json::from_value(json!({ "_id": id, "name": name, "slug": id })).unwrap()
    }

    fn view<E: Entity>() -> ListView<E> {
        ListView::new(NonZeroU32::new(10).unwrap())
    }

    fn loaded(total_pages: u32) -> ListState<Blog> {
        ListState {
            total_pages,
            ..ListState::default()
        }
    }

    #[test]
    fn test_load_action_passes_page_and_limit() {
        let mut view = view::<Blogs>();
        view.goto_page(3, &loaded(5));
        let EntityAction::GetList { page, limit, .. } = view.load_action() else {
            unreachable!("load_action must build a page fetch");
        };
        assert_eq!(page.get(), 3);
        assert_eq!(limit.get(), 10);
        assert_ne!(view.load_action().request(), view.load_action().request());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut view = view::<Blogs>();
        let list = loaded(2);

        assert!(!view.prev_page(&list));
        assert!(view.next_page(&list));
        assert_eq!(view.page().get(), 2);
        assert!(!view.next_page(&list));
        assert!(view.goto_page(99, &loaded(4)));
        assert_eq!(view.page().get(), 4);
        assert!(view.goto_page(0, &list));
        assert_eq!(view.page().get(), 1);
    }

    #[test]
    fn test_nothing_loaded_pins_page_one() {
        let mut view = view::<Blogs>();
        assert!(!view.next_page(&loaded(0)));
        assert_eq!(view.page().get(), 1);
    }

    #[test]
    fn test_display_states() {
        let view = view::<Tags>();
        let mut state = EntityState::<Tags>::default();
        assert_eq!(view.display(&state), ListDisplay::Empty("No tags available.".to_string()));

        state.flags.get_list = true;
        assert_eq!(view.display(&state), ListDisplay::Loading);

        state.flags.get_list = false;
        state.list.records = vec![tag("t1", "Diving"), tag("t2", "Sailing")];
        assert_eq!(view.display(&state), ListDisplay::Items(state.list.records.iter().collect()));
    }

    #[test]
    fn test_search_is_case_insensitive_and_page_local() {
        let mut view = view::<Tags>();
        let mut state = EntityState::<Tags>::default();
        state.list.records = vec![tag("t1", "Deep Diving"), tag("t2", "Sailing")];

        view.set_search("  DIV ");
        assert_eq!(view.display(&state), ListDisplay::Items(vec![&state.list.records[0]]));

        view.set_search("fishing");
        assert_eq!(view.display(&state), ListDisplay::NoMatches);
    }

    #[test]
    fn test_delete_confirmation() {
        let mut view = view::<Blogs>();
        assert_eq!(view.confirm_delete(), None);

        view.request_delete("abc123");
        assert_eq!(view.pending_delete(), Some("abc123"));
        assert_eq!(view.cancel_delete(), Some("abc123".to_string()));
        assert_eq!(view.pending_delete(), None);

        view.request_delete("abc123");
        assert!(matches!(
            view.confirm_delete(),
            Some(EntityAction::Delete { ref id, .. }) if id == "abc123"
        ));
        assert_eq!(view.pending_delete(), None);
    }

    proptest! {
        #[test]
        fn prop_filter_keeps_only_matches_in_order(
            names in proptest::collection::vec("[A-Za-z ]{0,12}", 0..12),
            search in "[A-Za-z]{0,3}",
        ) {
            let records: Vec<Tag> = names
                .iter()
                .enumerate()
                .map(|(i, name)| tag(&format!("t{i}"), name))
                .collect();
            let mut view = view::<Tags>();
            view.set_search(search.clone());

            let hits = view.filter(&records);
            let needle = search.to_lowercase();
            let expected: Vec<&Tag> = records
                .iter()
                .filter(|t| t.name.to_lowercase().contains(&needle))
                .collect();
            prop_assert_eq!(hits, expected);
        }
    }
}
