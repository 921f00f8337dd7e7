use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing::debug;

use crate::context::AppContext;
use crate::domain::environment::{Environment, parse_environment};
use crate::domain::ticket::{TicketId, TicketStatus, parse_status};
use crate::error::AppResult;
use crate::view::{FormState, RenderStyle, build, render};
use crate::workflow::{MutationOutcome, RefreshOutcome, TicketBoard};

const HELP: &str = "\
Commands:
  refresh <env>               re-fetch tickets for dev or prod
  env <env>                   choose the environment new tickets go to
  title <text>                set the draft ticket title
  create                      create the draft ticket in the chosen environment
  status <env> <id> <status>  set a ticket's status (open, in-progress, closed)
  show                        redraw the board
  help                        show this list
  quit                        leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Refresh(Environment),
    SelectEnvironment(Environment),
    Title(String),
    Create,
    Status(Environment, TicketId, TicketStatus),
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    match verb.to_lowercase().as_str() {
        "refresh" | "r" => parse_environment(rest).map(SessionCommand::Refresh),
        "env" | "e" => parse_environment(rest).map(SessionCommand::SelectEnvironment),
        // Validation of the title happens on create.
        "title" | "t" => Ok(SessionCommand::Title(rest.to_string())),
        "create" | "c" => Ok(SessionCommand::Create),
        "status" | "s" => {
            let parts = rest.split_whitespace().collect::<Vec<_>>();
            let [environment, id, status] = parts.as_slice() else {
                return Err("usage: status <env> <id> <status>".to_string());
            };
            Ok(SessionCommand::Status(
                parse_environment(environment)?,
                TicketId(id.to_string()),
                parse_status(status)?,
            ))
        }
        "show" | "" => Ok(SessionCommand::Show),
        "help" | "?" => Ok(SessionCommand::Help),
        "quit" | "q" | "exit" => Ok(SessionCommand::Quit),
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEvent {
    Refreshed(Environment, RefreshOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Redraw,
    Stay,
    Quit,
}

struct Session {
    board: Arc<TicketBoard>,
    form: FormState,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl Session {
    fn spawn_refresh(&self, environment: Environment) {
        let board = self.board.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = board.refresh(environment).await;
            // The session may already be gone.
            let _ = events.send(SessionEvent::Refreshed(environment, outcome));
        });
    }

    fn mount(&self) {
        for environment in Environment::ALL {
            self.spawn_refresh(environment);
        }
    }

    async fn apply(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::Refresh(environment) => {
                if self.board.snapshot().partition(environment).busy {
                    println!("{environment} is already refreshing");
                    return Flow::Stay;
                }
                self.spawn_refresh(environment);
                Flow::Redraw
            }
            SessionCommand::SelectEnvironment(environment) => {
                self.form.environment = environment;
                Flow::Redraw
            }
            SessionCommand::Title(title) => {
                self.form.draft = title;
                Flow::Redraw
            }
            SessionCommand::Create => {
                let outcome = self
                    .board
                    .create(self.form.environment, &mut self.form.draft)
                    .await;
                if outcome == MutationOutcome::Rejected {
                    Flow::Stay
                } else {
                    Flow::Redraw
                }
            }
            SessionCommand::Status(environment, id, status) => {
                self.board.set_status(environment, &id, status).await;
                Flow::Redraw
            }
            SessionCommand::Show => Flow::Redraw,
            SessionCommand::Help => {
                println!("{HELP}");
                Flow::Stay
            }
            SessionCommand::Quit => Flow::Quit,
        }
    }

    fn draw(&self, style: RenderStyle) {
        print!("{}", render(&build(&self.board.snapshot(), &self.form), style));
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Line(String),
    Unreadable,
    Closed,
}

async fn next_input<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> io::Result<Input> {
    match lines.next_line().await {
        Ok(Some(line)) => Ok(Input::Line(line)),
        Ok(None) => Ok(Input::Closed),
        Err(err) if err.kind() == io::ErrorKind::InvalidData => Ok(Input::Unreadable),
        Err(err) => Err(err),
    }
}

/// Interactive board: mounts, then redraws after every command and every
/// settled background refresh until stdin closes or `quit` is entered.
pub async fn run(ctx: &AppContext, style: RenderStyle) -> AppResult<()> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut session = Session {
        board: Arc::new(TicketBoard::new(ctx)),
        form: FormState::default(),
        events: events_tx,
    };

    session.mount();
    session.draw(style);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            input = next_input(&mut lines) => {
                let line = match input? {
                    Input::Line(line) => line,
                    Input::Unreadable => {
                        println!("could not read that line as UTF-8 text, try again");
                        continue;
                    }
                    Input::Closed => return Ok(()),
                };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                };
                match session.apply(command).await {
                    Flow::Redraw => session.draw(style),
                    Flow::Stay => {}
                    Flow::Quit => return Ok(()),
                }
            }
            Some(SessionEvent::Refreshed(environment, outcome)) = events_rx.recv() => {
                debug!(%environment, ?outcome, "background refresh settled");
                session.draw(style);
            }
        }
    }
}
