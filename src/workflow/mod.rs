pub mod fetch;
pub mod mutation;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use tracing::error;

use crate::context::AppContext;
use crate::domain::environment::Environment;
use crate::domain::ticket::{TicketId, TicketStatus};
use crate::error::AppError;
use crate::services::{FailureNotice, Notifier, Operation};

pub use fetch::{FetchCoordinator, RefreshOutcome};
pub use mutation::{MutationCoordinator, MutationOutcome};
pub use store::{BoardSnapshot, EnvironmentStore, PartitionSnapshot};

pub struct TicketBoard {
    store: Arc<EnvironmentStore>,
    fetch: Arc<FetchCoordinator>,
    mutation: MutationCoordinator,
}

impl TicketBoard {
    pub fn new(ctx: &AppContext) -> Self {
        let store = Arc::new(EnvironmentStore::new());
        let fetch = Arc::new(FetchCoordinator::new(
            ctx.ticket_api.clone(),
            ctx.notifier.clone(),
            store.clone(),
            ctx.config.fetch_ordering,
        ));
        let mutation = MutationCoordinator::new(
            ctx.ticket_api.clone(),
            ctx.notifier.clone(),
            fetch.clone(),
        );
        Self {
            store,
            fetch,
            mutation,
        }
    }

    pub async fn mount(&self) -> [RefreshOutcome; 2] {
        self.fetch.refresh_all().await
    }

    pub async fn refresh(&self, environment: Environment) -> RefreshOutcome {
        self.fetch.refresh(environment).await
    }

    pub async fn create(&self, environment: Environment, draft: &mut String) -> MutationOutcome {
        self.mutation.create(environment, draft).await
    }

    pub async fn set_status(
        &self,
        environment: Environment,
        id: &TicketId,
        status: TicketStatus,
    ) -> MutationOutcome {
        self.mutation.set_status(environment, id, status).await
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.store.snapshot()
    }
}

/// Logs a failed operation and hands it to the notifier. The error stops here.
fn report_failure(
    notifier: &dyn Notifier,
    operation: Operation,
    environment: Environment,
    err: &AppError,
) {
    error!(
        operation = %operation,
        environment = %environment,
        error = %err,
        "ticket operation failed"
    );
    notifier.failure(&FailureNotice {
        operation,
        environment,
        error: err,
    });
}
