use std::sync::Arc;

use tracing::info;

use super::fetch::FetchCoordinator;
use super::report_failure;
use crate::domain::environment::Environment;
use crate::domain::ticket::{TicketId, TicketStatus, TicketTitle};
use crate::services::{Notifier, Operation, TicketApi};

pub const EMPTY_TITLE_PROMPT: &str = "Please enter a ticket title";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Rejected,
    Failed,
}

pub struct MutationCoordinator {
    ticket_api: Arc<dyn TicketApi>,
    notifier: Arc<dyn Notifier>,
    fetch: Arc<FetchCoordinator>,
}

impl MutationCoordinator {
    pub fn new(
        ticket_api: Arc<dyn TicketApi>,
        notifier: Arc<dyn Notifier>,
        fetch: Arc<FetchCoordinator>,
    ) -> Self {
        Self {
            ticket_api,
            notifier,
            fetch,
        }
    }

    /// Creates a ticket from `draft`. The draft is cleared only on success.
    pub async fn create(&self, environment: Environment, draft: &mut String) -> MutationOutcome {
        let Some(title) = TicketTitle::parse(draft) else {
            self.notifier.prompt(EMPTY_TITLE_PROMPT);
            return MutationOutcome::Rejected;
        };

        match self.ticket_api.create_ticket(environment, &title).await {
            Ok(()) => {
                info!(%environment, title = title.as_str(), "ticket created");
                draft.clear();
                self.fetch.refresh(environment).await;
                MutationOutcome::Applied
            }
            Err(err) => {
                report_failure(self.notifier.as_ref(), Operation::Create, environment, &err);
                MutationOutcome::Failed
            }
        }
    }

    pub async fn set_status(
        &self,
        environment: Environment,
        id: &TicketId,
        status: TicketStatus,
    ) -> MutationOutcome {
        match self
            .ticket_api
            .update_status(environment, id, &status)
            .await
        {
            Ok(()) => {
                info!(%environment, %id, %status, "ticket status updated");
                self.fetch.refresh(environment).await;
                MutationOutcome::Applied
            }
            Err(err) => {
                report_failure(
                    self.notifier.as_ref(),
                    Operation::UpdateStatus,
                    environment,
                    &err,
                );
                MutationOutcome::Failed
            }
        }
    }
}
