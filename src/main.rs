use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use execdash::client::HttpExecutionSource;
use execdash::config::{ExecdashConfig, LoggingConfig};
use execdash::export::{self, ExportContext, ExportFormat};
use execdash::model::ExecutionId;
use execdash::present::{render_text, Dashboard};
use execdash::selection::StatusFilter;

#[derive(Parser)]
#[command(
    name = "execdash",
    about = "Test-execution dashboard: summary API, terminal report and export",
    version,
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (GET /executions)
    Serve {
        /// Bind address, overrides [server].bind
        #[arg(long)]
        bind: Option<String>,
    },

    /// Fetch executions and print the dashboard
    Report {
        /// API base URL, overrides [client].base_url
        #[arg(long)]
        url: Option<String>,

        /// Only show executions with this exact status (Passed, Failed, Incomplete, ...)
        #[arg(long)]
        filter: Option<StatusFilter>,

        /// Show the detail view for this execution
        #[arg(long)]
        select: Option<ExecutionId>,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Export one execution as a spreadsheet or document
    Export {
        /// Execution to export
        #[arg(long)]
        id: ExecutionId,

        /// spreadsheet or document
        #[arg(long, default_value = "spreadsheet")]
        format: ExportFormat,

        /// list (named after the execution) or detail (execution_data.*)
        #[arg(long, default_value = "list")]
        context: ExportContext,

        /// Directory to write the file into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// API base URL, overrides [client].base_url
        #[arg(long)]
        url: Option<String>,
    },
}

/// Stderr subscriber used while the config file is read, before `[logging]`
/// is known.
fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish()
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    // Logs go to stderr so report output on stdout stays parseable.
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        ExecdashConfig::resolve(cli.config.as_deref())
    })?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            tracing::info!(bind = %config.server.bind, "Starting execdash server");
            execdash::serve(&config).await?;
        }
        Commands::Report {
            url,
            filter,
            select,
            json,
        } => {
            let base_url = url.unwrap_or(config.client.base_url);
            let mut dashboard = Dashboard::new(HttpExecutionSource::new(&base_url));
            dashboard.refresh().await;
            dashboard.set_filter(filter.unwrap_or_default());

            if let Some(id) = select {
                if !dashboard.select(&id) {
                    tracing::warn!(%id, "execution not found, showing overview");
                }
            }

            let view = dashboard.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                if let Some(error) = dashboard.load_state().error() {
                    println!("(no data: {})", error);
                }
                print!("{}", render_text(&view));
            }
        }
        Commands::Export {
            id,
            format,
            context,
            out_dir,
            url,
        } => {
            let base_url = url.unwrap_or(config.client.base_url);
            let mut dashboard = Dashboard::new(HttpExecutionSource::new(&base_url));
            dashboard.refresh().await;

            if let Some(error) = dashboard.load_state().error() {
                bail!("could not load executions: {}", error);
            }
            if !dashboard.select(&id) {
                bail!("execution {} not found", id);
            }

            let file = dashboard
                .export_selected(context, format)?
                .with_context(|| format!("execution {} not selectable", id))?;
            let path = export::save(&file, &out_dir)?;
            println!("Exported execution {} to {}", id, path.display());
        }
    }

    Ok(())
}
