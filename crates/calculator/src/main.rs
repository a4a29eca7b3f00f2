use std::io;

use analytics::Telemetry;
use anyhow::{Context, Result};
use clap::Parser;

use calculator::cli::{run_calculate, Cli, Command};
use calculator::session::{run_tutorial, Session};
use calculator::tutorial::TutorialFlag;
use calculator::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays clean for results and --json
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env()?.with_overrides(cli.state_dir.clone(), cli.no_telemetry);
    tracing::debug!("State directory: {}", config.state_dir.display());

    let telemetry = Telemetry::new(&config.telemetry);
    let flag = TutorialFlag::new(&config.state_dir);

    let outcome = match cli.command.unwrap_or(Command::Interactive) {
        Command::Calculate(args) => run_calculate(&args, &telemetry, io::stdout().lock()).map(|_| ()),
        Command::Interactive => tokio::task::block_in_place(|| {
            Session::new(io::stdin().lock(), io::stdout().lock(), &telemetry, &flag)
                .run()
                .map(|_| ())
                .context("Interactive session failed")
        }),
        Command::Tutorial { reset: true } => flag
            .clear()
            .map(|()| println!("The tutorial will show again on the next interactive start."))
            .with_context(|| format!("Could not remove {}", flag.path().display())),
        Command::Tutorial { reset: false } => tokio::task::block_in_place(|| {
            run_tutorial(&mut io::stdin().lock(), &mut io::stdout().lock(), &flag)
                .context("Tutorial failed")
        }),
    };

    telemetry.flush(config.telemetry.flush_timeout).await;
    outcome
}
