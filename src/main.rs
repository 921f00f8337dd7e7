mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod view;
mod workflow;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::{board, health, ticket};
use crate::config::{AppConfig, ConfigOverrides, NotifyMode};
use crate::context::AppContext;
use crate::domain::environment::{Environment, parse_environment};
use crate::domain::ticket::{TicketId, TicketStatus, parse_status};
use crate::error::AppResult;
use crate::view::RenderStyle;

#[derive(Parser)]
#[command(
    name = "tboard",
    author,
    version,
    about = "Ticket board for the development and production environments"
)]
struct Cli {
    /// Base URL of the ticket API, e.g. http://localhost:3000/api.
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,
    /// Show failures on screen as well as in the log.
    #[arg(long, global = true, conflicts_with = "quiet_alerts")]
    alerts: bool,
    /// Only log failures.
    #[arg(long, global = true)]
    quiet_alerts: bool,
    /// Disable colored status badges.
    #[arg(long, global = true)]
    no_color: bool,
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive board.
    Board,
    /// Fetch and print tickets.
    List(ListArgs),
    /// Create a ticket.
    Create(CreateArgs),
    /// Change a ticket's status.
    Status(StatusArgs),
    /// Check backend health.
    Health(HealthArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Only this environment (dev or prod).
    #[arg(value_parser = parse_environment)]
    environment: Option<Environment>,
}

#[derive(Args)]
struct CreateArgs {
    /// Title of the new ticket.
    title: String,
    /// Target environment.
    #[arg(short, long, value_parser = parse_environment, default_value = "dev")]
    env: Environment,
}

#[derive(Args)]
struct StatusArgs {
    #[arg(value_parser = parse_environment)]
    environment: Environment,
    id: String,
    /// open, in-progress or closed.
    #[arg(value_parser = parse_status)]
    status: TicketStatus,
}

#[derive(Args)]
struct HealthArgs {
    #[arg(value_parser = parse_environment)]
    environment: Option<Environment>,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

async fn run() -> AppResult<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = ConfigOverrides {
        api_base: cli.api_base,
        notify: if cli.alerts {
            Some(NotifyMode::Alert)
        } else if cli.quiet_alerts {
            Some(NotifyMode::Log)
        } else {
            None
        },
    };
    let style = if cli.no_color {
        RenderStyle::Plain
    } else {
        RenderStyle::Colored
    };

    let load_context = || -> AppResult<AppContext> {
        let config = AppConfig::load(overrides.clone())?;
        tracing::debug!(
            api_base = %config.api_base,
            notify = config.notify.as_str(),
            fetch_ordering = config.fetch_ordering.as_str(),
            "configuration loaded"
        );
        Ok(AppContext::from_config(config))
    };

    let ok = match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            true
        }
        Commands::Board => {
            board::run(&load_context()?, style).await?;
            true
        }
        Commands::List(args) => ticket::list(&load_context()?, args.environment, style).await,
        Commands::Create(args) => {
            ticket::create(&load_context()?, args.env, args.title, style).await
        }
        Commands::Status(args) => {
            ticket::set_status(
                &load_context()?,
                args.environment,
                TicketId(args.id),
                args.status,
                style,
            )
            .await
        }
        Commands::Health(args) => health::run(&load_context()?, args.environment).await,
    };
    Ok(ok)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,tboard=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
