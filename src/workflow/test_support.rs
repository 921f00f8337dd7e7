use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::config::{AppConfig, DEFAULT_API_BASE, FetchOrdering, NotifyMode};
use crate::context::AppContext;
use crate::domain::environment::Environment;
use crate::domain::ticket::{Ticket, TicketId, TicketStatus, TicketTitle};
use crate::error::{AppError, AppResult};
use crate::services::{FailureNotice, HealthReport, Notifier, Operation, TicketApi, TicketList};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List(Environment),
    Create(Environment, String),
    Update(Environment, String, TicketStatus),
    Health(Environment),
}

pub enum ListScript {
    Ready(AppResult<TicketList>),
    Gated(oneshot::Receiver<AppResult<TicketList>>),
}

/// Scripted backend. Unscripted calls succeed with an empty payload.
#[derive(Default)]
pub struct StubTicketApi {
    calls: Mutex<Vec<ApiCall>>,
    lists: Mutex<HashMap<Environment, VecDeque<ListScript>>>,
    creates: Mutex<VecDeque<AppResult<()>>>,
    updates: Mutex<VecDeque<AppResult<()>>>,
    healths: Mutex<VecDeque<AppResult<HealthReport>>>,
}

impl StubTicketApi {
    pub fn push_list(&self, environment: Environment, result: AppResult<TicketList>) {
        self.push_list_script(environment, ListScript::Ready(result));
    }

    pub fn push_gated_list(
        &self,
        environment: Environment,
    ) -> oneshot::Sender<AppResult<TicketList>> {
        let (tx, rx) = oneshot::channel();
        self.push_list_script(environment, ListScript::Gated(rx));
        tx
    }

    fn push_list_script(&self, environment: Environment, script: ListScript) {
        self.lists
            .lock()
            .expect("lists lock")
            .entry(environment)
            .or_default()
            .push_back(script);
    }

    pub fn push_create(&self, result: AppResult<()>) {
        self.creates.lock().expect("creates lock").push_back(result);
    }

    pub fn push_update(&self, result: AppResult<()>) {
        self.updates.lock().expect("updates lock").push_back(result);
    }

    pub fn push_health(&self, result: AppResult<HealthReport>) {
        self.healths.lock().expect("healths lock").push_back(result);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn list_calls(&self, environment: Environment) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == ApiCall::List(environment))
            .count()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl TicketApi for StubTicketApi {
    async fn list_tickets(&self, environment: Environment) -> AppResult<TicketList> {
        self.record(ApiCall::List(environment));
        let script = self
            .lists
            .lock()
            .expect("lists lock")
            .get_mut(&environment)
            .and_then(VecDeque::pop_front);
        match script {
            Some(ListScript::Ready(result)) => result,
            Some(ListScript::Gated(rx)) => rx.await.expect("gated list sender dropped"),
            None => Ok(TicketList::default()),
        }
    }

    async fn create_ticket(&self, environment: Environment, title: &TicketTitle) -> AppResult<()> {
        self.record(ApiCall::Create(environment, title.as_str().to_string()));
        self.creates
            .lock()
            .expect("creates lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn update_status(
        &self,
        environment: Environment,
        id: &TicketId,
        status: &TicketStatus,
    ) -> AppResult<()> {
        self.record(ApiCall::Update(
            environment,
            id.as_str().to_string(),
            status.clone(),
        ));
        self.updates
            .lock()
            .expect("updates lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn health(&self, environment: Environment) -> AppResult<HealthReport> {
        self.record(ApiCall::Health(environment));
        if let Some(result) = self.healths.lock().expect("healths lock").pop_front() {
            return result;
        }
        Ok(HealthReport {
            status: "healthy".to_string(),
            environment: Some(environment.label().to_lowercase()),
            timestamp: None,
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub failures: Mutex<Vec<(Operation, Environment, String)>>,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn failures(&self) -> Vec<(Operation, Environment, String)> {
        self.failures.lock().expect("failures lock").clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn failure(&self, notice: &FailureNotice<'_>) {
        self.failures.lock().expect("failures lock").push((
            notice.operation,
            notice.environment,
            notice.message(),
        ));
    }

    fn prompt(&self, message: &str) {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(message.to_string());
    }
}

pub fn ticket(id: u32, title: &str, status: TicketStatus) -> Ticket {
    Ticket {
        id: TicketId(id.to_string()),
        title: title.to_string(),
        status,
        created_at: "2024-01-01".to_string(),
    }
}

pub fn list_of(tickets: Vec<Ticket>) -> TicketList {
    TicketList {
        total: Some(tickets.len()),
        tickets,
        environment: None,
    }
}

pub fn server_error() -> AppError {
    AppError::ServerRejection {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: "{\"error\":\"boom\"}".to_string(),
    }
}

pub fn test_context(
    fetch_ordering: FetchOrdering,
) -> (AppContext, Arc<StubTicketApi>, Arc<RecordingNotifier>) {
    let api = Arc::new(StubTicketApi::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let config = AppConfig {
        api_base: DEFAULT_API_BASE.to_string(),
        notify: NotifyMode::Alert,
        fetch_ordering,
    };
    let ctx = AppContext::new(config, api.clone(), notifier.clone());
    (ctx, api, notifier)
}
