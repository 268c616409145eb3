//! The generic entity slice reducer.

use crate::entity::{Entity, ListPage, Operation};
use crate::slice::{AdminEnvironment, EntityAction, EntityState, ListState, RequestId};
use faraway_admin_api::{ApiError, unwrap_data};
use faraway_admin_core::effect::Effect;
use faraway_admin_core::reducer::Reducer;
use faraway_admin_core::{SmallVec, async_effect, smallvec};
use serde_json::Value;
use std::marker::PhantomData;

/// Reducer for one entity type
///
/// Commands raise their loading flag, clear the error slot and return a
/// single HTTP effect. Results lower the flag and fill either the matching
/// cache slot or the error slot; a failure never touches cached data.
pub struct EntityReducer<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> EntityReducer<E> {
    /// Creates a new entity reducer
    #[must_use]
    pub const fn new() -> Self {
        Self { _entity: PhantomData }
    }
}

impl<E> Default for EntityReducer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EntityReducer<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EntityReducer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityReducer").finish()
    }
}

fn begin<E: Entity>(state: &mut EntityState<E>, operation: Operation, request: RequestId) {
    state.flags.set(operation, true);
    state.error = None;
    tracing::debug!(entity = E::NAME, %operation, %request, "Operation started");
}

fn failed<E: Entity>(request: RequestId, operation: Operation, error: &ApiError) -> EntityAction<E> {
    EntityAction::Failed {
        request,
        operation,
        message: error.user_message(&E::fallback_message(operation)),
    }
}

/// Record carried by a mutation response, if any
fn response_record<E: Entity>(body: Value, operation: Operation) -> Option<E::Record> {
    match serde_json::from_value(unwrap_data(body)) {
        Ok(record) => Some(record),
        Err(error) => {
            tracing::warn!(entity = E::NAME, %operation, %error, "Response carried no usable record");
            None
        },
    }
}

impl<E: Entity> Reducer for EntityReducer<E> {
    type State = EntityState<E>;
    type Action = EntityAction<E>;
    type Environment = AdminEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            EntityAction::Add { request: ticket, draft } => {
                begin(state, Operation::Add, ticket);
                let client = env.client.clone();
                let request = E::add_request(&draft);
                smallvec![async_effect! {
                    Some(match client.send(request).await {
                        Ok(body) => EntityAction::Added {
                            request: ticket,
                            record: response_record::<E>(body, Operation::Add),
                        },
                        Err(error) => failed(ticket, Operation::Add, &error),
                    })
                }]
            },

            EntityAction::GetList { request: ticket, page, limit } => {
                begin(state, Operation::GetList, ticket);
                let client = env.client.clone();
                let request = E::list_request(page, limit);
                smallvec![async_effect! {
                    let result = match client.send(request).await {
                        Ok(body) => ListPage::from_body(body, E::LIST_KEY, page).map_err(ApiError::from),
                        Err(error) => Err(error),
                    };
                    Some(match result {
                        Ok(page) => EntityAction::ListLoaded { request: ticket, page },
                        Err(error) => failed(ticket, Operation::GetList, &error),
                    })
                }]
            },

            EntityAction::GetById { request: ticket, id } => {
                begin(state, Operation::GetOne, ticket);
                let client = env.client.clone();
                let requests = E::get_requests(&id);
                smallvec![async_effect! {
                    let result = match client.send_first_ok(requests).await {
                        Ok(body) => serde_json::from_value(unwrap_data(body)).map_err(ApiError::from),
                        Err(error) => Err(error),
                    };
                    Some(match result {
                        Ok(record) => EntityAction::Loaded { request: ticket, record },
                        Err(error) => failed(ticket, Operation::GetOne, &error),
                    })
                }]
            },

            EntityAction::Update { request: ticket, id, patch } => {
                begin(state, Operation::Update, ticket);
                let client = env.client.clone();
                let requests = E::update_requests(&id, &patch);
                smallvec![async_effect! {
                    Some(match client.send_first_ok(requests).await {
                        Ok(body) => EntityAction::Updated {
                            request: ticket,
                            record: response_record::<E>(body, Operation::Update),
                        },
                        Err(error) => failed(ticket, Operation::Update, &error),
                    })
                }]
            },

            EntityAction::Delete { request: ticket, id } => {
                begin(state, Operation::Delete, ticket);
                let client = env.client.clone();
                let requests = E::delete_requests(&id);
                smallvec![async_effect! {
                    Some(match client.send_first_ok(requests).await {
                        Ok(_) => EntityAction::Deleted { request: ticket, id },
                        Err(error) => failed(ticket, Operation::Delete, &error),
                    })
                }]
            },

            EntityAction::Publish { request: ticket, id, status } => {
                begin(state, Operation::Publish, ticket);
                let Some(requests) = E::publish_requests(&id, status) else {
                    let message = format!("Publishing is not supported for {}", E::PLURAL);
                    return smallvec![async_effect! {
                        Some(EntityAction::Failed { request: ticket, operation: Operation::Publish, message })
                    }];
                };
                let client = env.client.clone();
                smallvec![async_effect! {
                    Some(match client.send_first_ok(requests).await {
                        Ok(body) => EntityAction::Published {
                            request: ticket,
                            record: response_record::<E>(body, Operation::Publish),
                            id,
                        },
                        Err(error) => failed(ticket, Operation::Publish, &error),
                    })
                }]
            },

            EntityAction::ClearError => {
                state.error = None;
                SmallVec::new()
            },

            EntityAction::ClearCurrent => {
                state.current = None;
                SmallVec::new()
            },

            EntityAction::Added { record, .. } => {
                state.flags.add = false;
                if record.is_some() {
                    state.current = record;
                }
                SmallVec::new()
            },

            EntityAction::ListLoaded { page, .. } => {
                state.flags.get_list = false;
                tracing::debug!(
                    entity = E::NAME,
                    page = page.current_page,
                    records = page.records.len(),
                    "List page loaded"
                );
                state.list = ListState::from(page);
                state.last_synced = Some(env.clock.now());
                SmallVec::new()
            },

            EntityAction::Loaded { record, .. } => {
                state.flags.get_one = false;
                state.current = Some(record);
                SmallVec::new()
            },

            EntityAction::Updated { record, .. } => {
                state.flags.update = false;
                if record.is_some() {
                    state.current = record;
                }
                SmallVec::new()
            },

            EntityAction::Deleted { id, .. } => {
                state.flags.delete = false;
                tracing::info!(entity = E::NAME, id = %id, "Record deleted");
                SmallVec::new()
            },

            EntityAction::Published { id, record, .. } => {
                state.flags.publish = false;
                if let Some(record) = record {
                    if let Some(slot) = state.list.records.iter_mut().find(|r| E::id(r) == id) {
                        *slot = record.clone();
                    }
                    if state.current.as_ref().is_some_and(|current| E::id(current) == id) {
                        state.current = Some(record);
                    }
                }
                SmallVec::new()
            },

            EntityAction::Failed { operation, message, .. } => {
                state.flags.set(operation, false);
                tracing::warn!(entity = E::NAME, %operation, %message, "Operation failed");
                state.error = Some(message);
                SmallVec::new()
            },
        }
    }
}
