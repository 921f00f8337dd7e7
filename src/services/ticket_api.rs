use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::environment::Environment;
use crate::domain::ticket::{Ticket, TicketId, TicketStatus, TicketTitle};
use crate::error::AppResult;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketList {
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn list_tickets(&self, environment: Environment) -> AppResult<TicketList>;
    async fn create_ticket(&self, environment: Environment, title: &TicketTitle) -> AppResult<()>;
    async fn update_status(
        &self,
        environment: Environment,
        id: &TicketId,
        status: &TicketStatus,
    ) -> AppResult<()>;
    async fn health(&self, environment: Environment) -> AppResult<HealthReport>;
}
