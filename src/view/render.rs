use std::fmt::Write;

use owo_colors::{OwoColorize, Stream};

use super::{BoardView, CardView, FormView, SectionView};
use crate::domain::ticket::TicketStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    Plain,
    Colored,
}

pub fn render(view: &BoardView, style: RenderStyle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", view.subtitle);
    out.push('\n');
    render_form(&mut out, &view.form);
    for section in &view.sections {
        out.push('\n');
        out.push_str(&render_section(section, style));
    }
    out
}

pub fn render_section(section: &SectionView, style: RenderStyle) -> String {
    let mut out = String::new();
    let button = if section.refresh.disabled {
        format!("({})", section.refresh.label)
    } else {
        format!("[{}]", section.refresh.label)
    };
    let _ = writeln!(out, "== {}  {button}", section.heading);
    if section.cards.is_empty() {
        out.push_str("   (no tickets)\n");
    }
    for card in &section.cards {
        render_card(&mut out, card, style);
    }
    out
}

fn render_form(out: &mut String, form: &FormView) {
    let draft = if form.draft.is_empty() {
        form.placeholder
    } else {
        form.draft.as_str()
    };
    let environments = form
        .environments
        .iter()
        .map(|option| {
            if option.selected {
                format!("*{}", option.label)
            } else {
                option.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(
        out,
        "New ticket: \"{draft}\"  env: {environments}  <{}>",
        form.submit_label
    );
}

fn render_card(out: &mut String, card: &CardView, style: RenderStyle) {
    let _ = writeln!(out, " #{} {}", card.id, card.title);
    let _ = writeln!(
        out,
        "    {} [{}] {}",
        status_badge(&card.status, style),
        card.environment_badge,
        card.created
    );
    let options = card
        .status_options
        .iter()
        .map(|option| {
            if option.selected {
                format!("({})", option.label)
            } else {
                option.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "    status: {options}");
}

fn status_badge(status: &TicketStatus, style: RenderStyle) -> String {
    let badge = format!("[{}]", status.as_str());
    if style == RenderStyle::Plain {
        return badge;
    }
    match status {
        TicketStatus::Open => badge
            .if_supports_color(Stream::Stdout, |text| text.green().to_string())
            .to_string(),
        TicketStatus::InProgress => badge
            .if_supports_color(Stream::Stdout, |text| text.yellow().to_string())
            .to_string(),
        TicketStatus::Closed => badge
            .if_supports_color(Stream::Stdout, |text| text.bright_black().to_string())
            .to_string(),
        TicketStatus::Other(_) => badge,
    }
}
