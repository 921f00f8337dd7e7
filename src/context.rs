use std::sync::Arc;

use crate::config::{AppConfig, NotifyMode};
use crate::infra::http::HttpTicketApi;
use crate::infra::notify::{AlertNotifier, LogNotifier};
use crate::services::{Notifier, TicketApi};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub ticket_api: Arc<dyn TicketApi>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        ticket_api: Arc<dyn TicketApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            ticket_api,
            notifier,
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let ticket_api: Arc<dyn TicketApi> = Arc::new(HttpTicketApi::new(config.api_base.clone()));
        let notifier: Arc<dyn Notifier> = match config.notify {
            NotifyMode::Alert => Arc::new(AlertNotifier::stderr()),
            NotifyMode::Log => Arc::new(LogNotifier::stderr()),
        };
        Self::new(config, ticket_api, notifier)
    }
}
