pub mod notifier;
pub mod ticket_api;

pub use notifier::{FailureNotice, Notifier, Operation};
pub use ticket_api::{HealthReport, TicketApi, TicketList};
