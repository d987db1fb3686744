use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{load_config, LoggingSettings, StorageBackend};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The main entry point for the Fleetbook record-keeping application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Api(args) => {
            if let Some(backend) = args.backend {
                settings.database.backend = backend;
            }
            web_server::run_server(&settings).await?;
        }
        Commands::Web => {
            web_frontend::run_server(&settings).await?;
        }
        Commands::Migrate => {
            let pool = database::connect(&settings.database).await?;
            database::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied.");
        }
    }
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Fleet, voyage and catch records with a JSON API and a web front end.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "fleetbook.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API over the record store.
    Api(ApiArgs),
    /// Serve the HTML front end, which talks to the API.
    Web,
    /// Apply pending PostgreSQL migrations and exit.
    Migrate,
}

#[derive(Parser)]
struct ApiArgs {
    /// Overrides `database.backend` from the configuration.
    #[arg(long, value_enum)]
    backend: Option<StorageBackend>,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Logs to stdout, and to daily rolling files when `logging.directory` is set.
/// `RUST_LOG` takes precedence over `logging.filter`.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.filter)
            .with_context(|| format!("Invalid logging.filter '{}'", settings.filter))?,
    };

    let (file_layer, guard) = match &settings.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "fleetbook.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;
    Ok(guard)
}
