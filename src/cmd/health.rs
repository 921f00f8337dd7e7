use tracing::error;

use crate::context::AppContext;
use crate::domain::environment::Environment;
use crate::error::AppError;

/// Prints backend health for each environment. Returns false if any check failed.
pub async fn run(ctx: &AppContext, environment: Option<Environment>) -> bool {
    let environments = match environment {
        Some(environment) => vec![environment],
        None => Environment::ALL.to_vec(),
    };

    let mut healthy = true;
    for environment in environments {
        match ctx.ticket_api.health(environment).await {
            Ok(report) => {
                let reported = report.environment.as_deref().unwrap_or("unknown");
                match report.timestamp.as_deref() {
                    Some(timestamp) => println!(
                        "{environment}: {} (backend environment: {reported}, at {timestamp})",
                        report.status
                    ),
                    None => println!(
                        "{environment}: {} (backend environment: {reported})",
                        report.status
                    ),
                }
            }
            Err(err) => {
                error!(%environment, error = %err, "health check failed");
                println!("{environment}: {} ({err})", failure_label(&err));
                healthy = false;
            }
        }
    }
    healthy
}

fn failure_label(err: &AppError) -> &'static str {
    match err {
        AppError::Transport(_) => "unreachable",
        _ => "unhealthy",
    }
}
