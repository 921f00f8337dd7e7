use crate::context::AppContext;
use crate::domain::environment::Environment;
use crate::domain::ticket::{TicketId, TicketStatus};
use crate::view::render::render_section;
use crate::view::{FormState, RenderStyle, build, build_section, render};
use crate::workflow::{MutationOutcome, RefreshOutcome, TicketBoard};

/// Returns false when any fetch failed.
pub async fn list(ctx: &AppContext, environment: Option<Environment>, style: RenderStyle) -> bool {
    let board = TicketBoard::new(ctx);
    match environment {
        Some(environment) => {
            let outcome = board.refresh(environment).await;
            print_section(&board, environment, style);
            outcome != RefreshOutcome::Failed
        }
        None => {
            let outcomes = board.mount().await;
            print!(
                "{}",
                render(&build(&board.snapshot(), &FormState::default()), style)
            );
            outcomes
                .iter()
                .all(|outcome| *outcome != RefreshOutcome::Failed)
        }
    }
}

pub async fn create(
    ctx: &AppContext,
    environment: Environment,
    title: String,
    style: RenderStyle,
) -> bool {
    let board = TicketBoard::new(ctx);
    let mut draft = title;
    let outcome = board.create(environment, &mut draft).await;
    if outcome == MutationOutcome::Applied {
        print_section(&board, environment, style);
    }
    outcome == MutationOutcome::Applied
}

pub async fn set_status(
    ctx: &AppContext,
    environment: Environment,
    id: TicketId,
    status: TicketStatus,
    style: RenderStyle,
) -> bool {
    let board = TicketBoard::new(ctx);
    let outcome = board.set_status(environment, &id, status).await;
    if outcome == MutationOutcome::Applied {
        print_section(&board, environment, style);
    }
    outcome == MutationOutcome::Applied
}

fn print_section(board: &TicketBoard, environment: Environment, style: RenderStyle) {
    let snapshot = board.snapshot();
    let section = build_section(environment, snapshot.partition(environment));
    print!("{}", render_section(&section, style));
}
