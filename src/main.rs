use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use diagramcraft::analysis::parse_selection;
use diagramcraft::config::{Config, LogFormat};
use diagramcraft::worker::ClientCache;
use diagramcraft::DiagramOrchestrator;

/// Generate planning diagrams for a project description via the AI worker.
///
/// Runs one anonymous generation batch and prints the aggregate report as
/// JSON. The worker endpoint comes from `WORKER_URL` (or
/// `PUBLIC_WORKER_URL`).
#[derive(Debug, Parser)]
#[command(name = "diagramcraft", version, about)]
struct Cli {
    /// Project description text. Reads stdin when neither this nor --file is
    /// given.
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// Read the project description from a file.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Diagrams to generate: erd, architecture, c4, user-stories, gantt,
    /// kanban, or mvp for all of them.
    #[arg(short, long, value_delimiter = ',', default_value = "mvp")]
    diagrams: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    let cli = Cli::parse();

    let kinds = parse_selection(&cli.diagrams)?;

    let text = match (cli.text, cli.file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read project description from stdin")?;
            buffer
        }
    };

    if text.trim().is_empty() {
        anyhow::bail!("Project description is empty");
    }

    let worker = config
        .worker
        .clone()
        .context("WORKER_URL is not configured")?;

    let cache = ClientCache::new(config.request.clone());
    let client = cache.get_or_create(&worker)?;

    info!(
        worker = %client.base_url(),
        diagrams = kinds.len(),
        "Starting one-shot generation"
    );

    let orchestrator = DiagramOrchestrator::new(client);
    let report = orchestrator.generate(&kinds, &text, true, None).await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.success {
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
