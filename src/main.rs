mod app;
mod catalog;
mod command;
mod config;
mod dial;
mod error;
mod model;
mod services;
mod theme;
mod ui;
mod validate;
mod widgets;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Dispatch outbound voice-bot calls through an execution relay
#[derive(Parser)]
#[command(name = "voicebot-dialer", version, about)]
struct Cli {
    /// Path to a dialer.yaml file (skips discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Execution endpoint, e.g. http://localhost:5000/execute
    #[arg(long, global = true, env = "DIALER_ENDPOINT")]
    endpoint: Option<String>,

    /// Simulate execution locally instead of calling the relay
    #[arg(long, global = true)]
    simulate: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the inputs and dispatch a single call without the form UI
    Dial {
        /// Caller name
        #[arg(long)]
        name: String,
        /// Phone number to call
        #[arg(long)]
        phone: String,
        /// Voice agent identifier (see `bots`)
        #[arg(long)]
        bot: String,
        /// Print the generated command instead of executing it
        #[arg(long)]
        print_only: bool,
    },
    /// List configured voice agents
    Bots,
}

// Logs go to a file because the terminal belongs to the form.
// DIALER_LOG takes an env-filter directive, e.g. DIALER_LOG=debug; unset disables logging.
fn init_logging() {
    let Ok(directive) = std::env::var("DIALER_LOG") else {
        return;
    };
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), "voicebot-dialer.log");
    tracing_subscriber::fmt()
        .with_writer(file_appender)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let (mut cfg, cfg_path) = config::load_config(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        cfg.endpoint = endpoint;
    }
    if cli.simulate {
        cfg.executor = config::ExecutorKind::Simulate;
    }
    tracing::info!(config = ?cfg_path, endpoint = %cfg.endpoint, executor = ?cfg.executor, "configuration loaded");
    let catalog = Arc::new(cfg.catalog().context("building voice agent catalog")?);
    let executor = services::executor::executor_from_config(&cfg);

    match cli.command {
        Some(Commands::Bots) => {
            for e in catalog.entries() {
                println!("{:<32} {}", e.id, e.config.name);
            }
            Ok(())
        }
        Some(Commands::Dial {
            name,
            phone,
            bot,
            print_only,
        }) => {
            let mut state = ui::AppState::new(catalog, cfg.dispatch.clone());
            let req = dial::DialRequest {
                name,
                phone,
                bot,
                print_only,
            };
            let out = dial::dial(&mut state, executor.as_ref(), &req)?;
            println!("{out}");
            Ok(())
        }
        None => ui::run(catalog, cfg.dispatch.clone(), executor),
    }
}
