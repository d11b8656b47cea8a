//! mitto-connect CLI - Environment guard, migrations and shop management.
//!
//! # Usage
//!
//! ```bash
//! # Validate the environment before starting the app (exit 0 = ok, 1 = invalid)
//! mc-cli check-env
//! mc-cli --env-file deploy/production.env check-env
//!
//! # Run database migrations
//! mc-cli migrate
//!
//! # Probe database connectivity
//! mc-cli health
//!
//! # Inspect and edit shop records
//! mc-cli shop show your-store.myshopify.com
//! mc-cli shop upsert your-store.myshopify.com --set plan=pro --set credits=500
//! printf '%s' "$TOKEN" | mc-cli shop save-token your-store.myshopify.com
//! ```
//!
//! # Commands
//!
//! - `check-env` - Validate environment variables
//! - `migrate` - Run database migrations
//! - `health` - Check database connectivity
//! - `shop` - Show, upsert, and store offline tokens for shops

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mitto_connect::config::{self, AppConfig};
use mitto_connect::error::AppError;
use mitto_connect::state::AppState;
use mitto_connect::telemetry;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "mc-cli")]
#[command(author, version, about = "mitto-connect CLI tools")]
struct Cli {
    /// Load variables from this file before reading the environment
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate environment variables (exit 0 if valid, 1 otherwise)
    CheckEnv,
    /// Run database migrations
    Migrate,
    /// Check database connectivity (exit 0 if healthy, 1 otherwise)
    Health,
    /// Manage shop records
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// Print a shop record as JSON (the offline token is never shown)
    Show {
        /// Shop domain (e.g. your-store.myshopify.com)
        domain: String,
    },
    /// Create a shop or merge fields into it
    Upsert {
        /// Shop domain (e.g. your-store.myshopify.com)
        domain: String,

        /// Field to set; values are parsed as JSON, falling back to a string
        #[arg(short, long = "set", value_name = "KEY=VALUE", required = true)]
        set: Vec<String>,
    },
    /// Seal and store an offline access token read from stdin
    SaveToken {
        /// Shop domain (e.g. your-store.myshopify.com)
        domain: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Before tracing, so RUST_LOG and FLY_APP_NAME from the file apply
    let dotenv = config::load_dotenv(cli.env_file.as_deref());
    telemetry::init_tracing();

    if let Err(e) = dotenv {
        tracing::error!("{e}");
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{e}");
        }
        std::process::exit(1);
    }

    let code = match cli.command {
        Commands::CheckEnv => commands::check_env::run(),
        command => match run(command).await {
            Ok(()) => 0,
            Err(e) => {
                e.report();
                #[allow(clippy::print_stderr)]
                {
                    eprintln!("error: {e}");
                }
                1
            }
        },
    };

    std::process::exit(code);
}

async fn run(command: Commands) -> Result<(), CommandError> {
    let config = AppConfig::from_env().map_err(AppError::from)?;
    let _sentry_guard = telemetry::init_sentry(&config);
    let state = AppState::new(config)?;

    let result = match command {
        Commands::CheckEnv => Ok(()),
        Commands::Migrate => commands::migrate::run(&state).await,
        Commands::Health => commands::health::run(&state).await,
        Commands::Shop { action } => match action {
            ShopAction::Show { domain } => commands::shop::show(&state, &domain).await,
            ShopAction::Upsert { domain, set } => {
                commands::shop::upsert(&state, &domain, &set).await
            }
            ShopAction::SaveToken { domain } => commands::shop::save_token(&state, &domain).await,
        },
    };

    state.shutdown().await;
    result
}
