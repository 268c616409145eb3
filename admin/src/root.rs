//! The dashboard's single state container.
//!
//! Each entity slice is scoped onto its field of [`AdminState`] and the
//! scoped reducers are combined, so one store drives every content type.

use crate::entities::{Blogs, Tags, Yachts};
use crate::entity::Entity;
use crate::slice::{AdminEnvironment, EntityAction, EntityReducer, EntityState};
use faraway_admin_core::composition::{CombinedReducer, SharedReducer, combine_reducers, scope_reducer};
use std::sync::Arc;

/// State of every entity slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    /// Blog posts
    pub blogs: EntityState<Blogs>,
    /// Tags
    pub tags: EntityState<Tags>,
    /// Yacht listings
    pub yachts: EntityState<Yachts>,
}

/// Any slice action, tagged with its entity
#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    /// Blog slice
    Blog(EntityAction<Blogs>),
    /// Tag slice
    Tag(EntityAction<Tags>),
    /// Yacht slice
    Yacht(EntityAction<Yachts>),
}

/// Root reducer over [`AdminState`]
pub type AdminReducer = CombinedReducer<AdminState, AdminAction, AdminEnvironment>;

/// How an entity's slice is wired into the root state
pub trait AdminSlice: Entity {
    /// Tag a slice action
    fn embed(action: EntityAction<Self>) -> AdminAction;

    /// Untag a root action addressed to this slice
    fn extract(action: AdminAction) -> Option<EntityAction<Self>>;

    /// Borrowing form of [`extract`](Self::extract)
    fn extract_ref(action: &AdminAction) -> Option<&EntityAction<Self>>;

    /// This slice's state
    fn state(state: &AdminState) -> &EntityState<Self>;

    /// This slice's state, mutably
    fn state_mut(state: &mut AdminState) -> &mut EntityState<Self>;
}

macro_rules! admin_slice {
    ($entity:ty, $variant:ident, $field:ident) => {
        impl AdminSlice for $entity {
            fn embed(action: EntityAction<Self>) -> AdminAction {
                AdminAction::$variant(action)
            }

            fn extract(action: AdminAction) -> Option<EntityAction<Self>> {
                match action {
                    AdminAction::$variant(action) => Some(action),
                    _ => None,
                }
            }

            fn extract_ref(action: &AdminAction) -> Option<&EntityAction<Self>> {
                match action {
                    AdminAction::$variant(action) => Some(action),
                    _ => None,
                }
            }

            fn state(state: &AdminState) -> &EntityState<Self> {
                &state.$field
            }

            fn state_mut(state: &mut AdminState) -> &mut EntityState<Self> {
                &mut state.$field
            }
        }
    };
}

admin_slice!(Blogs, Blog, blogs);
admin_slice!(Tags, Tag, tags);
admin_slice!(Yachts, Yacht, yachts);

fn slice<E: AdminSlice>() -> SharedReducer<AdminState, AdminAction, AdminEnvironment> {
    Arc::new(scope_reducer(
        EntityReducer::<E>::new(),
        E::state_mut,
        E::extract,
        E::embed,
    ))
}

/// The root reducer: every slice scoped onto its field, combined
#[must_use]
pub fn admin_reducer() -> AdminReducer {
    combine_reducers(vec![slice::<Blogs>(), slice::<Tags>(), slice::<Yachts>()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use faraway_admin_core::reducer::Reducer;
    use faraway_admin_testing::{ReducerTest, ScriptedTransport, assertions, test_clock};
    use std::num::NonZeroU32;

    fn env() -> AdminEnvironment {
        AdminEnvironment::new(ScriptedTransport::new().client(), Arc::new(test_clock()))
    }

    #[test]
    fn test_actions_reach_only_their_slice() {
        let mut given = AdminState::default();
        given.blogs.error = Some("blog error".to_string());
        given.tags.error = Some("tag error".to_string());

        ReducerTest::new(admin_reducer())
            .with_env(env())
            .given_state(given)
            .when_action(AdminAction::Tag(EntityAction::ClearError))
            .then_state(|state| {
                assert!(state.tags.error.is_none());
                assert_eq!(state.blogs.error.as_deref(), Some("blog error"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_slice_command_produces_one_effect() {
        ReducerTest::new(admin_reducer())
            .with_env(env())
            .given_state(AdminState::default())
            .when_action(AdminAction::Yacht(EntityAction::get_list(NonZeroU32::MIN, NonZeroU32::MIN)))
            .then_state(|state| {
                assert!(state.yachts.flags.get_list);
                assert!(!state.blogs.flags.get_list);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[tokio::test]
    async fn test_child_results_are_embedded() {
        let transport = ScriptedTransport::new();
        let env = AdminEnvironment::new(transport.client(), Arc::new(test_clock()));
        let mut state = AdminState::default();

        let effects = admin_reducer().reduce(
            &mut state,
            AdminAction::Blog(EntityAction::delete("gone")),
            &env,
        );
        let results = faraway_admin_testing::run_effects(effects).await;

        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], AdminAction::Blog(EntityAction::Failed { .. })));
        assert!(Blogs::extract_ref(&results[0]).is_some());
        assert!(Tags::extract_ref(&results[0]).is_none());
    }

    #[test]
    fn test_slice_accessors() {
        let mut state = AdminState::default();
        Yachts::state_mut(&mut state).error = Some("x".to_string());
        assert_eq!(Yachts::state(&state).error.as_deref(), Some("x"));
        assert!(Blogs::state(&state).error.is_none());
    }
}
