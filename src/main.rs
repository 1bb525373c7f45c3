//! KeepWatching CLI
//!
//! A command-line client for tracking the shows and movies of your profiles.

use clap::Parser;
use keepwatching::cli::{
    args::{Cli, Commands},
    commands::{announcements, content, profiles, session, views, Context},
};
use keepwatching::models::config::load_config;
use keepwatching::models::Config;
use keepwatching::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let mut config = load_config();
    if cli.account.is_some() {
        config.account_id = cli.account.clone();
    }

    if let Commands::Check = cli.command {
        return run_preflight_checks(&config).await;
    }

    // Logout works offline
    let remote_command = !matches!(cli.command, Commands::Logout);
    if remote_command && !cli.skip_preflight {
        run_preflight_checks(&config).await?;
    }

    let ctx = Context::open(config)?;

    let result = match cli.command {
        Commands::Profiles { action } => profiles::run(&ctx, action).await,
        Commands::Shows { action } => content::run_shows(&ctx, action).await,
        Commands::Movies { action } => content::run_movies(&ctx, action).await,
        Commands::Episodes { window } => views::episodes(&ctx, window).await,
        Commands::Releases { window } => views::releases(&ctx, window).await,
        Commands::Stats => views::stats(&ctx).await,
        Commands::Notifications { action } => announcements::run(&ctx, action).await,
        Commands::Refresh => session::refresh(&ctx).await,
        Commands::Logout => session::logout(&ctx),
        Commands::Check => Ok(()),
    };

    match result {
        Err(err @ keepwatching::Error::Sync { .. }) => {
            ctx.report_failure(&err);
            std::process::exit(1)
        }
        other => other.map_err(Into::into),
    }
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("keepwatching=debug")
    } else {
        EnvFilter::new("keepwatching=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await?;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
