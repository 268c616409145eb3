//! Dependencies injected into the slice reducers.

use faraway_admin_api::ApiClient;
use faraway_admin_core::environment::Clock;
use std::sync::Arc;

/// Environment shared by every entity slice
#[derive(Clone)]
pub struct AdminEnvironment {
    /// Content API client
    pub client: ApiClient,
    /// Clock for sync timestamps
    pub clock: Arc<dyn Clock>,
}

impl AdminEnvironment {
    /// Creates a new admin environment
    #[must_use]
    pub fn new(client: ApiClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }
}

impl std::fmt::Debug for AdminEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminEnvironment")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
