//! CLI entry point - the composition root.
//!
//! This is the ONLY place where infrastructure is wired together via
//! bootstrap. Command dispatch routes to handlers.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use wordloop_cli::error::exit_code_for;
use wordloop_cli::{Cli, CliConfig, Commands, bootstrap, handlers};
use wordloop_speech::SimulatedTiming;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = CliConfig::with_defaults();
    config.data_dir = cli.data_dir;

    // Needs no database
    if let Commands::Paths = command {
        return handlers::paths::execute(&config);
    }
    if let Commands::Play(args) = &command {
        if args.instant {
            config.timing = SimulatedTiming::instant();
        }
    }

    let ctx = bootstrap(config).await?;
    let result = match command {
        Commands::Play(args) => handlers::play::execute(&ctx, &args).await,
        Commands::Next => handlers::navigate::execute(&ctx, true).await,
        Commands::Previous => handlers::navigate::execute(&ctx, false).await,
        Commands::Status => handlers::status::execute(&ctx).await,
        Commands::Set(args) => handlers::set::execute(&ctx, &args).await,
        Commands::Library(command) => handlers::library::execute(&ctx, command).await,
        Commands::Word(command) => handlers::word::execute(&ctx, command).await,
        Commands::Paths => Ok(()),
    };
    ctx.shutdown().await;
    result
}
