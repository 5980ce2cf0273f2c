//! Eats Application CLI

use std::process::ExitCode;

use eats_app::{backup::FileBackup, context::AppContext};
use tracing::{debug, error};

use crate::cli::{Cli, describe};

mod cli;
mod config;
mod observability;

#[tokio::main]
pub async fn main() -> ExitCode {
    let cli = Cli::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = observability::init(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("failed to initialise logging: {error}");
        }

        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");

            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let services = cli
        .store
        .services()
        .map_err(|error| format!("invalid time zone: {error}"))?;

    let backup = FileBackup::new(&cli.store.data_dir);

    let ctx = AppContext::restore(&backup, services)
        .await
        .map_err(|error| describe(&error))?;

    let outcome = cli.command.run(cli.store.user, &ctx).await?;

    let rendered = serde_json::to_string_pretty(&outcome.output)
        .map_err(|error| format!("failed to render output: {error}"))?;

    #[expect(clippy::print_stdout, reason = "command output is the CLI's product")]
    {
        println!("{rendered}");
    }

    if outcome.mutated {
        ctx.persist(&backup)
            .await
            .map_err(|error| describe(&error))?;

        debug!(dir = %backup.dir().display(), "saved snapshots");
    }

    Ok(())
}
