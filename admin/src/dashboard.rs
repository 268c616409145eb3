//! The dashboard: one store, every entity slice, request/response helpers.
//!
//! Views and the CLI talk to [`AdminDashboard`] instead of the store. It
//! sends a command, waits for the matching result action and turns a
//! `Failed` result into an error, so callers can `?` their way through a
//! create-then-navigate flow.
//!
//! # Example
//!
//! ```no_run
//! use faraway_admin::{AdminConfig, AdminDashboard};
//! use faraway_admin::entities::Blogs;
//!
//! # async fn run() -> Result<(), faraway_admin::DashboardError> {
//! let dashboard = AdminDashboard::from_config(&AdminConfig::from_env()?)?;
//! let view = dashboard.list_view::<Blogs>();
//! dashboard.load_page(&view).await?;
//! let blogs = dashboard.slice::<Blogs>().await;
//! println!("{} blogs", blogs.list.total);
//! # Ok(())
//! # }
//! ```

use crate::config::AdminConfig;
use crate::entity::{Entity, Operation, PublishStatus};
use crate::form::{CreateForm, EditForm, FormController};
use crate::list_view::ListView;
use crate::root::{AdminAction, AdminReducer, AdminSlice, AdminState, admin_reducer};
use crate::slice::{AdminEnvironment, EntityAction, EntityState};
use faraway_admin_api::{ApiClient, ApiError, ConfigError};
use faraway_admin_core::environment::SystemClock;
use faraway_admin_runtime::{Store, StoreError};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// The store type behind the dashboard
pub type AdminStore = Store<AdminState, AdminAction, AdminEnvironment, AdminReducer>;

/// Why a dashboard call did not succeed
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The store rejected the command or the result did not arrive in time
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The API client could not be built
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operation ran and failed; `message` is ready for display
    #[error("{operation} failed: {message}")]
    Operation {
        /// Failed operation
        operation: Operation,
        /// Extracted message
        message: String,
    },

    /// The form did not validate; nothing was sent
    #[error("Invalid fields: {}", .0.join(", "))]
    Invalid(Vec<&'static str>),

    /// Only commands can be dispatched
    #[error("Action is not a command")]
    NotACommand,

    /// A result arrived that does not belong to the operation
    #[error("Unexpected result for {0}")]
    UnexpectedResult(Operation),
}

/// Facade over the admin store
#[derive(Clone)]
pub struct AdminDashboard {
    store: AdminStore,
    page_size: NonZeroU32,
    result_timeout: Duration,
}

impl AdminDashboard {
    /// Dashboard over `environment`
    #[must_use]
    pub fn new(environment: AdminEnvironment, page_size: NonZeroU32, result_timeout: Duration) -> Self {
        Self {
            store: Store::new(AdminState::default(), admin_reducer(), environment),
            page_size,
            result_timeout,
        }
    }

    /// Dashboard talking to the configured API over HTTP
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Api`] when the HTTP client cannot be built.
    pub fn from_config(config: &AdminConfig) -> Result<Self, DashboardError> {
        let client = ApiClient::from_config(&config.api)?;
        let environment = AdminEnvironment::new(client, Arc::new(SystemClock));
        tracing::info!(
            base_url = %config.api.base_url,
            page_size = config.page_size.get(),
            "Dashboard ready"
        );
        Ok(Self::new(environment, config.page_size, config.result_timeout))
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &AdminStore {
        &self.store
    }

    /// Configured page size
    #[must_use]
    pub const fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// A fresh list view with the configured page size
    #[must_use]
    pub const fn list_view<E: Entity>(&self) -> ListView<E> {
        ListView::new(self.page_size)
    }

    /// Copy of the whole state
    pub async fn snapshot(&self) -> AdminState {
        self.store.state(Clone::clone).await
    }

    /// Copy of one entity's state
    pub async fn slice<E: AdminSlice>(&self) -> EntityState<E> {
        self.store.state(|state| E::state(state).clone()).await
    }

    /// Send a command and wait for its result
    ///
    /// Only the result carrying the command's request id is accepted, so
    /// overlapping commands of the same kind each get their own outcome.
    /// The returned action has already been applied to the state.
    ///
    /// # Errors
    ///
    /// - [`DashboardError::Operation`]: the slice recorded a failure
    /// - [`DashboardError::Store`]: shutdown in progress or no result within
    ///   the configured timeout
    /// - [`DashboardError::NotACommand`]: `action` is a result or a clear
    pub async fn dispatch<E: AdminSlice>(&self, action: EntityAction<E>) -> Result<EntityAction<E>, DashboardError> {
        let (Some(operation), Some(request)) = (action.command_operation(), action.request()) else {
            return Err(DashboardError::NotACommand);
        };
        tracing::debug!(entity = E::NAME, %operation, %request, "Dispatching");

        let outcome = self
            .store
            .send_and_wait_for(
                E::embed(action),
                move |action| E::extract_ref(action).is_some_and(|a| a.answers(request)),
                self.result_timeout,
            )
            .await?;

        let result = match E::extract(outcome) {
            Some(EntityAction::Failed { operation, message, .. }) => Err(DashboardError::Operation { operation, message }),
            Some(result) => Ok(result),
            None => Err(DashboardError::UnexpectedResult(operation)),
        };
        metrics::counter!(
            "dashboard.operations.total",
            "entity" => E::NAME,
            "operation" => operation.to_string(),
            "outcome" => if result.is_ok() { "success" } else { "failure" }
        )
        .increment(1);
        result
    }

    /// Clear the entity's error slot
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] during shutdown.
    pub async fn clear_error<E: AdminSlice>(&self) -> Result<(), DashboardError> {
        self.store.send(E::embed(EntityAction::ClearError)).await?;
        Ok(())
    }

    /// Clear the entity's single-record cache
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] during shutdown.
    pub async fn clear_current<E: AdminSlice>(&self) -> Result<(), DashboardError> {
        self.store.send(E::embed(EntityAction::ClearCurrent)).await?;
        Ok(())
    }

    /// Fetch the page `view` is on
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn load_page<E: AdminSlice>(&self, view: &ListView<E>) -> Result<(), DashboardError> {
        self.dispatch(view.load_action()).await.map(drop)
    }

    /// Fetch one record into the single-record cache
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch).
    pub async fn get<E: AdminSlice>(&self, id: impl Into<String>) -> Result<E::Record, DashboardError> {
        match self.dispatch(EntityAction::<E>::get_by_id(id)).await? {
            EntityAction::Loaded { record, .. } => Ok(record),
            _ => Err(DashboardError::UnexpectedResult(Operation::GetOne)),
        }
    }

    /// Change a record's publication status
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch). Entities without a status endpoint
    /// fail with [`DashboardError::Operation`].
    pub async fn publish<E: AdminSlice>(
        &self,
        id: impl Into<String>,
        status: PublishStatus,
    ) -> Result<Option<E::Record>, DashboardError> {
        match self.dispatch(EntityAction::<E>::publish(id, status)).await? {
            EntityAction::Published { record, .. } => Ok(record),
            _ => Err(DashboardError::UnexpectedResult(Operation::Publish)),
        }
    }

    /// Validate a create form and, when it passes, create the record
    ///
    /// On success the form is cleared. A form that fails validation sends
    /// nothing and leaves every field touched.
    ///
    /// # Errors
    ///
    /// [`DashboardError::Invalid`] with the failing fields, or any error of
    /// [`dispatch`](Self::dispatch).
    pub async fn submit_create<E: CreateForm>(
        &self,
        form: &mut FormController,
    ) -> Result<Option<E::Record>, DashboardError> {
        let values = form.submit().map_err(DashboardError::Invalid)?;
        let Some(draft) = E::draft(values) else {
            return Err(DashboardError::Invalid(form.invalid_fields()));
        };

        match self.dispatch(EntityAction::<E>::add(draft)).await? {
            EntityAction::Added { record, .. } => {
                form.reset();
                Ok(record)
            },
            _ => Err(DashboardError::UnexpectedResult(Operation::Add)),
        }
    }

    /// Validate an edit form and send the changed fields of record `id`
    ///
    /// The status sent is the cached record's, and the form keeps its
    /// values afterwards.
    ///
    /// # Errors
    ///
    /// [`DashboardError::Invalid`] with the failing fields, or any error of
    /// [`dispatch`](Self::dispatch).
    pub async fn submit_update<E: EditForm>(
        &self,
        id: &str,
        form: &mut FormController,
    ) -> Result<Option<E::Record>, DashboardError> {
        let current = self.store.state(|state| E::state(state).cached(id).cloned()).await;
        let values = form.submit().map_err(DashboardError::Invalid)?;
        let patch = E::patch(values, current.as_ref());

        match self.dispatch(EntityAction::<E>::update(id, patch)).await? {
            EntityAction::Updated { record, .. } => Ok(record),
            _ => Err(DashboardError::UnexpectedResult(Operation::Update)),
        }
    }

    /// Delete the record awaiting confirmation in `view`, then re-fetch the
    /// page the view is on
    ///
    /// Returns the deleted identifier, or `None` when nothing was pending.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch). When the delete fails the page is not
    /// re-fetched.
    pub async fn confirm_delete<E: AdminSlice>(&self, view: &mut ListView<E>) -> Result<Option<String>, DashboardError> {
        let Some(action) = view.confirm_delete() else {
            return Ok(None);
        };
        let EntityAction::Deleted { id, .. } = self.dispatch(action).await? else {
            return Err(DashboardError::UnexpectedResult(Operation::Delete));
        };
        self.load_page(view).await?;
        Ok(Some(id))
    }

    /// Stop accepting commands and wait for in-flight requests
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] when requests are still running after
    /// `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), DashboardError> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }
}

impl std::fmt::Debug for AdminDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminDashboard")
            .field("page_size", &self.page_size)
            .field("result_timeout", &self.result_timeout)
            .field("pending_effects", &self.store.pending_effects())
            .finish_non_exhaustive()
    }
}
