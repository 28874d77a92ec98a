// * Entity-Flow command line shell
// * Fetches listing pages, runs the refinery and writes the records out.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use entity_flow::config::keywords::KeywordTables;
use entity_flow::config::sources::sources_for;
use entity_flow::engine::{FetchStrategy, PageFetcher, RequestPacer};
use entity_flow::export::{self, ExportFormat};
use entity_flow::ops::telemetry;
use entity_flow::refinery::{ExtractionReport, Record, Refinery, RefineryConfig};

#[derive(Parser)]
#[command(name = "entity-flow")]
#[command(about = "Extracts entity names and addresses from listing web pages")]
#[command(version)]
struct Cli {
    /// JSON file replacing the built-in keyword tables
    #[arg(long, global = true)]
    keywords: Option<PathBuf>,

    /// Human-readable logs instead of JSON
    #[arg(long, global = true)]
    pretty_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format: csv, tsv, json or xlsx
    #[arg(long, default_value = "csv")]
    format: ExportFormat,

    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Add source URL, source type and table/row positions
    #[arg(long)]
    provenance: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one page and extract its records
    Extract {
        url: String,
        /// Render the page in a headless browser first
        #[arg(long)]
        render: bool,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Extract from a saved HTML file
    File {
        path: PathBuf,
        /// URL recorded as the records' source
        #[arg(long)]
        url: Option<String>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Fetch and extract several pages in turn
    Batch {
        #[arg(required = true)]
        urls: Vec<String>,
        #[arg(long)]
        render: bool,
        /// Maximum page fetches per minute
        #[arg(long, default_value_t = entity_flow::config::constants::DEFAULT_REQUESTS_PER_MINUTE)]
        per_minute: u32,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// List the predefined sources
    Sources {
        /// Only show sources of this kind (e.g. hospital)
        #[arg(long)]
        kind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.pretty_logs {
        telemetry::init_tracing_pretty();
    } else {
        telemetry::init_tracing();
    }

    let keywords = match &cli.keywords {
        Some(path) => KeywordTables::from_json_file(path)
            .with_context(|| format!("loading keyword tables from {}", path.display()))?,
        None => KeywordTables::global().clone(),
    };
    let refinery = Refinery::with_config(RefineryConfig::default(), &keywords);

    match cli.command {
        Commands::Extract { url, render, out } => {
            let fetcher = PageFetcher::new()?;
            let page = fetcher.fetch(&url, strategy(render)).await?;
            let report = refinery.process(&page.html, &url)?;
            log_summary(&report);
            emit(&report.records, &out)?;
        }
        Commands::File { path, url, out } => {
            let html = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let source_url = url.unwrap_or_else(|| file_url(&path));
            let report = refinery.process(&html, &source_url)?;
            log_summary(&report);
            emit(&report.records, &out)?;
        }
        Commands::Batch {
            urls,
            render,
            per_minute,
            out,
        } => {
            let fetcher = PageFetcher::new()?;
            let pacer = RequestPacer::per_minute(per_minute);
            let mut records = Vec::new();

            for url in &urls {
                pacer.wait().await;
                let page = match fetcher.fetch(url, strategy(render)).await {
                    Ok(page) => page,
                    Err(e) => {
                        error!(url = %url, error = %e, "fetch failed, skipping page");
                        continue;
                    }
                };
                match refinery.process(&page.html, url) {
                    Ok(report) => {
                        log_summary(&report);
                        records.extend(report.records);
                    }
                    Err(e) => warn!(url = %url, error = %e, "page skipped"),
                }
            }

            info!(pages = urls.len(), records = records.len(), "batch finished");
            emit(&records, &out)?;
        }
        Commands::Sources { kind } => {
            for source in sources_for(kind.as_deref()) {
                let marker = if source.requires_rendering { " [render]" } else { "" };
                println!("{}\t{}\t{}{}", source.kind, source.name, source.url, marker);
            }
        }
    }

    Ok(())
}

fn strategy(render: bool) -> FetchStrategy {
    if render {
        FetchStrategy::Rendered
    } else {
        FetchStrategy::Http
    }
}

fn file_url(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

fn log_summary(report: &ExtractionReport) {
    if report.is_empty() {
        info!(url = %report.source_url, "nothing found");
    } else {
        info!(
            url = %report.source_url,
            records = report.records.len(),
            dropped = report.stats.dropped,
            repaired = report.stats.repaired,
            "{} records",
            report.records.len()
        );
    }
}

fn emit(records: &[Record], out: &OutputArgs) -> Result<()> {
    match &out.output {
        Some(path) => {
            export::write_to_path(records, path, out.format, out.provenance)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), records = records.len(), "results written");
        }
        None if out.format == ExportFormat::Xlsx => {
            bail!("xlsx output needs --output PATH");
        }
        None => export::write_records(records, io::stdout().lock(), out.format, out.provenance)?,
    }
    Ok(())
}
