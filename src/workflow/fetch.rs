use std::sync::Arc;

use tracing::{debug, info};

use super::report_failure;
use super::store::EnvironmentStore;
use crate::config::FetchOrdering;
use crate::domain::environment::Environment;
use crate::services::{Notifier, Operation, TicketApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied(usize),
    Discarded,
    Failed,
}

pub struct FetchCoordinator {
    ticket_api: Arc<dyn TicketApi>,
    notifier: Arc<dyn Notifier>,
    store: Arc<EnvironmentStore>,
    ordering: FetchOrdering,
}

impl FetchCoordinator {
    pub fn new(
        ticket_api: Arc<dyn TicketApi>,
        notifier: Arc<dyn Notifier>,
        store: Arc<EnvironmentStore>,
        ordering: FetchOrdering,
    ) -> Self {
        Self {
            ticket_api,
            notifier,
            store,
            ordering,
        }
    }

    pub async fn refresh(&self, environment: Environment) -> RefreshOutcome {
        let sequence = self.store.begin_fetch(environment);
        let _busy = BusyGuard {
            store: &self.store,
            environment,
        };

        match self.ticket_api.list_tickets(environment).await {
            Ok(list) => {
                let count = list.tickets.len();
                let reported_total = list.total;
                let backend = list.environment;
                if self
                    .store
                    .apply(environment, sequence, list.tickets, self.ordering)
                {
                    info!(
                        %environment,
                        count,
                        ?reported_total,
                        ?backend,
                        "tickets refreshed"
                    );
                    RefreshOutcome::Applied(count)
                } else {
                    debug!(%environment, sequence, "discarding stale ticket list");
                    RefreshOutcome::Discarded
                }
            }
            Err(err) => {
                report_failure(self.notifier.as_ref(), Operation::Fetch, environment, &err);
                RefreshOutcome::Failed
            }
        }
    }

    pub async fn refresh_all(&self) -> [RefreshOutcome; 2] {
        let (dev, prod) = tokio::join!(
            self.refresh(Environment::Dev),
            self.refresh(Environment::Prod)
        );
        [dev, prod]
    }
}

/// Clears the busy flag when the fetch settles, however it settles.
struct BusyGuard<'a> {
    store: &'a EnvironmentStore,
    environment: Environment,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.store.settle(self.environment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::TicketStatus;
    use crate::error::AppError;
    use crate::workflow::TicketBoard;
    use crate::workflow::test_support::{list_of, server_error, test_context, ticket};

    #[tokio::test]
    async fn refresh_replaces_sequence_and_clears_busy() {
        let (ctx, api, notifier) = test_context(FetchOrdering::LastResponse);
        api.push_list(
            Environment::Dev,
            Ok(list_of(vec![ticket(1, "A", TicketStatus::Open)])),
        );
        let board = TicketBoard::new(&ctx);

        let outcome = board.refresh(Environment::Dev).await;

        assert_eq!(outcome, RefreshOutcome::Applied(1));
        let snapshot = board.snapshot();
        assert_eq!(snapshot.dev.tickets[0].title, "A");
        assert!(!snapshot.dev.busy);
        assert!(notifier.failures().is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_sequence_and_clears_busy() {
        let (ctx, api, notifier) = test_context(FetchOrdering::LastResponse);
        api.push_list(
            Environment::Prod,
            Ok(list_of(vec![ticket(1, "kept", TicketStatus::Open)])),
        );
        api.push_list(
            Environment::Prod,
            Err(AppError::Transport("connection reset".to_string())),
        );
        let board = TicketBoard::new(&ctx);
        board.refresh(Environment::Prod).await;

        let outcome = board.refresh(Environment::Prod).await;

        assert_eq!(outcome, RefreshOutcome::Failed);
        let snapshot = board.snapshot();
        assert_eq!(snapshot.prod.tickets.len(), 1);
        assert_eq!(snapshot.prod.tickets[0].title, "kept");
        assert!(!snapshot.prod.busy);
        let failures = notifier.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Operation::Fetch);
        assert_eq!(failures[0].1, Environment::Prod);
    }

    #[tokio::test]
    async fn busy_is_set_while_request_is_in_flight() {
        let (ctx, api, _notifier) = test_context(FetchOrdering::LastResponse);
        let gate = api.push_gated_list(Environment::Dev);
        let board = TicketBoard::new(&ctx);

        let refresh = board.refresh(Environment::Dev);
        tokio::pin!(refresh);
        tokio::select! {
            biased;
            _ = &mut refresh => panic!("refresh settled before the response was released"),
            _ = tokio::task::yield_now() => {}
        }
        assert!(board.snapshot().dev.busy);
        assert!(!board.snapshot().prod.busy);

        gate.send(Err(server_error())).expect("release response");
        assert_eq!(refresh.await, RefreshOutcome::Failed);
        assert!(!board.snapshot().dev.busy);
    }

    #[tokio::test]
    async fn dropped_refresh_does_not_leave_busy_set() {
        let (ctx, api, _notifier) = test_context(FetchOrdering::LastResponse);
        let _gate = api.push_gated_list(Environment::Dev);
        let board = TicketBoard::new(&ctx);

        {
            let refresh = board.refresh(Environment::Dev);
            tokio::pin!(refresh);
            tokio::select! {
                biased;
                _ = &mut refresh => panic!("refresh settled early"),
                _ = tokio::task::yield_now() => {}
            }
            assert!(board.snapshot().dev.busy);
        }

        assert!(!board.snapshot().dev.busy);
    }

    #[tokio::test]
    async fn refreshing_one_environment_leaves_the_other_untouched() {
        let (ctx, api, _notifier) = test_context(FetchOrdering::LastResponse);
        api.push_list(
            Environment::Prod,
            Ok(list_of(vec![ticket(9, "prod only", TicketStatus::Closed)])),
        );
        api.push_list(
            Environment::Dev,
            Ok(list_of(vec![ticket(1, "dev", TicketStatus::Open)])),
        );
        api.push_list(Environment::Dev, Err(server_error()));
        let board = TicketBoard::new(&ctx);
        board.refresh(Environment::Prod).await;
        let prod_before = board.snapshot().prod;

        board.refresh(Environment::Dev).await;
        board.refresh(Environment::Dev).await;

        assert_eq!(board.snapshot().prod, prod_before);
        assert_eq!(api.list_calls(Environment::Prod), 1);
    }

    #[tokio::test]
    async fn mount_fetches_both_environments() {
        let (ctx, api, _notifier) = test_context(FetchOrdering::LastResponse);
        api.push_list(
            Environment::Dev,
            Ok(list_of(vec![ticket(1, "A", TicketStatus::Open)])),
        );
        api.push_list(Environment::Prod, Err(server_error()));
        let board = TicketBoard::new(&ctx);

        let outcomes = board.mount().await;

        assert_eq!(
            outcomes,
            [RefreshOutcome::Applied(1), RefreshOutcome::Failed]
        );
        assert_eq!(api.list_calls(Environment::Dev), 1);
        assert_eq!(api.list_calls(Environment::Prod), 1);
        let snapshot = board.snapshot();
        assert!(!snapshot.dev.busy && !snapshot.prod.busy);
    }

    #[tokio::test]
    async fn overlapping_refreshes_keep_last_settled_response_by_default() {
        let (ctx, api, _notifier) = test_context(FetchOrdering::LastResponse);
        let older = api.push_gated_list(Environment::Dev);
        let newer = api.push_gated_list(Environment::Dev);
        let board = TicketBoard::new(&ctx);

        let (first, second, ()) = tokio::join!(
            board.refresh(Environment::Dev),
            board.refresh(Environment::Dev),
            async {
                newer
                    .send(Ok(list_of(vec![ticket(1, "newer", TicketStatus::Closed)])))
                    .expect("release newer");
                tokio::task::yield_now().await;
                older
                    .send(Ok(list_of(vec![ticket(1, "older", TicketStatus::Open)])))
                    .expect("release older");
            }
        );

        assert_eq!(first, RefreshOutcome::Applied(1));
        assert_eq!(second, RefreshOutcome::Applied(1));
        let snapshot = board.snapshot();
        assert_eq!(snapshot.dev.tickets[0].title, "older");
        assert!(!snapshot.dev.busy);
    }

    #[tokio::test]
    async fn latest_request_ordering_drops_stale_response() {
        let (ctx, api, _notifier) = test_context(FetchOrdering::LatestRequest);
        let older = api.push_gated_list(Environment::Dev);
        let newer = api.push_gated_list(Environment::Dev);
        let board = TicketBoard::new(&ctx);

        let (first, second, ()) = tokio::join!(
            board.refresh(Environment::Dev),
            board.refresh(Environment::Dev),
            async {
                newer
                    .send(Ok(list_of(vec![ticket(1, "newer", TicketStatus::Closed)])))
                    .expect("release newer");
                tokio::task::yield_now().await;
                older
                    .send(Ok(list_of(vec![ticket(1, "older", TicketStatus::Open)])))
                    .expect("release older");
            }
        );

        assert_eq!(first, RefreshOutcome::Discarded);
        assert_eq!(second, RefreshOutcome::Applied(1));
        let snapshot = board.snapshot();
        assert_eq!(snapshot.dev.tickets[0].title, "newer");
        assert!(!snapshot.dev.busy);
    }
}
