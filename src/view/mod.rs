pub mod render;

use crate::domain::environment::Environment;
use crate::domain::ticket::{Ticket, TicketId, TicketStatus};
use crate::workflow::{BoardSnapshot, PartitionSnapshot};

pub use render::{RenderStyle, render};

pub const HEADER_TITLE: &str = "Multi-Environment Ticket Management";
pub const HEADER_SUBTITLE: &str =
    "Manage tickets across Development and Production environments";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub draft: String,
    pub environment: Environment,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            draft: String::new(),
            environment: Environment::Dev,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub form: FormView,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub draft: String,
    pub placeholder: &'static str,
    pub environments: Vec<OptionView>,
    pub submit_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub environment: Environment,
    pub heading: String,
    pub refresh: ButtonView,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: TicketId,
    pub title: String,
    pub status: TicketStatus,
    pub environment_badge: &'static str,
    pub created: String,
    pub status_options: Vec<OptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub fn build(snapshot: &BoardSnapshot, form: &FormState) -> BoardView {
    BoardView {
        title: HEADER_TITLE,
        subtitle: HEADER_SUBTITLE,
        form: build_form(form),
        sections: Environment::ALL
            .iter()
            .map(|environment| build_section(*environment, snapshot.partition(*environment)))
            .collect(),
    }
}

pub fn build_section(environment: Environment, partition: &PartitionSnapshot) -> SectionView {
    SectionView {
        environment,
        heading: format!("{} Environment", environment.label()),
        refresh: ButtonView {
            label: if partition.busy {
                "Refreshing..."
            } else {
                "Refresh"
            },
            disabled: partition.busy,
        },
        cards: partition
            .tickets
            .iter()
            .map(|ticket| build_card(environment, ticket))
            .collect(),
    }
}

fn build_form(form: &FormState) -> FormView {
    FormView {
        draft: form.draft.clone(),
        placeholder: "Enter ticket title...",
        environments: Environment::ALL
            .iter()
            .map(|environment| OptionView {
                value: environment.as_str().to_string(),
                label: environment.label().to_string(),
                selected: *environment == form.environment,
            })
            .collect(),
        submit_label: format!(
            "Create Ticket in {}",
            form.environment.as_str().to_uppercase()
        ),
    }
}

fn build_card(environment: Environment, ticket: &Ticket) -> CardView {
    CardView {
        id: ticket.id.clone(),
        title: ticket.title.clone(),
        status: ticket.status.clone(),
        environment_badge: environment.as_str(),
        created: format!("Created: {}", ticket.created_at),
        status_options: TicketStatus::ALL
            .iter()
            .map(|status| OptionView {
                value: status.as_str().to_string(),
                label: status.label().to_string(),
                selected: *status == ticket.status,
            })
            .collect(),
    }
}
