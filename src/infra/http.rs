use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header::ACCEPT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::environment::Environment;
use crate::domain::ticket::{TicketId, TicketStatus, TicketTitle};
use crate::error::{AppError, AppResult};
use crate::services::{HealthReport, TicketApi, TicketList};

pub struct HttpTicketApi {
    http: Client,
    base_url: String,
}

impl HttpTicketApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn tickets_endpoint(&self, environment: Environment) -> String {
        format!("{}/{}/tickets", self.base_url, environment.as_str())
    }

    fn ticket_endpoint(&self, environment: Environment, id: &TicketId) -> String {
        format!("{}/{}", self.tickets_endpoint(environment), id.as_str())
    }

    fn health_endpoint(&self, environment: Environment) -> String {
        format!("{}/{}/health", self.base_url, environment.as_str())
    }

    async fn send(request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Transport(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::ServerRejection { status, body });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        response
            .json()
            .await
            .map_err(|err| AppError::Transport(format!("failed to parse response: {err}")))
    }
}

#[async_trait]
impl TicketApi for HttpTicketApi {
    async fn list_tickets(&self, environment: Environment) -> AppResult<TicketList> {
        let url = self.tickets_endpoint(environment);
        debug!(%url, "listing tickets");
        let response = Self::send(self.http.get(url)).await?;
        Self::decode(response).await
    }

    async fn create_ticket(&self, environment: Environment, title: &TicketTitle) -> AppResult<()> {
        let url = self.tickets_endpoint(environment);
        debug!(%url, title = title.as_str(), "creating ticket");
        Self::send(self.http.post(url).json(&CreateTicketRequest {
            title: title.as_str(),
        }))
        .await?;
        Ok(())
    }

    async fn update_status(
        &self,
        environment: Environment,
        id: &TicketId,
        status: &TicketStatus,
    ) -> AppResult<()> {
        let url = self.ticket_endpoint(environment, id);
        debug!(%url, %status, "updating ticket status");
        Self::send(self.http.put(url).json(&UpdateStatusRequest { status })).await?;
        Ok(())
    }

    async fn health(&self, environment: Environment) -> AppResult<HealthReport> {
        let url = self.health_endpoint(environment);
        let response = Self::send(self.http.get(url)).await?;
        Self::decode(response).await
    }
}

#[derive(Serialize)]
struct CreateTicketRequest<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct UpdateStatusRequest<'a> {
    status: &'a TicketStatus,
}
