//! Certificate expiry bot
//!
//! Tracks TLS certificate expiry for each user's hosts:
//! - `serve` answers `<user id> <text>` lines from stdin
//! - `summarize` prints every user's summary once and exits
//! - `check` looks up a single host

use cert_expiry_bot::checks::{ExpiryChecker, ExpiryLookup};
use cert_expiry_bot::cli::{Cli, Commands, OutputFormat};
use cert_expiry_bot::config::Settings;
use cert_expiry_bot::input::sanitize;
use cert_expiry_bot::output::{format_result, print_json};
use cert_expiry_bot::registry::RegistryStore;
use cert_expiry_bot::runner::Dispatcher;
use cert_expiry_bot::transport::{serve, StdioTransport};
use cert_expiry_bot::utils::{create_spinner, ConfigError, Result};
use clap::Parser;
use console::style;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Install the ring crypto provider for rustls
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();

    // Initialize logging; stdout carries replies, so logs go to stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from_file(path)?,
        None => Settings::load_default()?,
    };
    if let Some(path) = cli.store {
        settings.store.path = path;
    }
    if let Some(deadline) = cli.deadline {
        if deadline == 0 {
            return Err(ConfigError::InvalidValue {
                key: "--deadline".to_string(),
                message: "must be at least one second".to_string(),
            }
            .into());
        }
        settings.resolver.deadline_secs = deadline;
    }

    let lookup: Arc<dyn ExpiryLookup> = Arc::new(ExpiryChecker::new(settings.resolver.clone())?);

    match cli.command {
        Commands::Check(args) => {
            let host = sanitize(&args.host);
            let spinner = create_spinner(&format!("Checking {}...", host));
            let result = lookup.resolve(&host).await;
            spinner.finish_and_clear();
            println!("{}", format_result(&host, &result));
            Ok(())
        }
        Commands::Summarize(args) => {
            let store = RegistryStore::new(&settings.store.path);
            let registry = Arc::new(store.load_registry()?);
            let dispatcher = Dispatcher::new(registry, lookup, settings.messages);

            let spinner = create_spinner("Checking every tracked host...");
            let summaries = dispatcher.summarize_all().await;
            spinner.finish_and_clear();

            match args.format {
                OutputFormat::Json => print_json(&summaries)?,
                OutputFormat::Plain => {
                    for (user, summary) in &summaries {
                        println!("{}", style(format!("== {} ==", user)).cyan().bold());
                        println!("{}\n", summary);
                    }
                }
            }
            Ok(())
        }
        Commands::Serve => {
            let store = Arc::new(RegistryStore::new(&settings.store.path));
            let registry = Arc::new(store.load_registry()?);
            tracing::info!(
                "Serving {} users from {}",
                registry.users().len(),
                store.path().display()
            );
            let dispatcher =
                Arc::new(Dispatcher::new(registry, lookup, settings.messages).with_store(store));

            serve(Arc::new(StdioTransport::stdio()), dispatcher).await?;
            Ok(())
        }
    }
}
