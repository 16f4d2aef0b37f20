use anyhow::{Context, Result};
use clap::Parser;
use pydocscraper::{
    config::{Dirs, Settings, Sources, MAIN_DOC_URL, PEP_URL},
    extract::{run_mode, status::ExpectedStatuses, Mode},
    fetch::{PageCache, RetryPolicy, Session},
    logging,
    output::{control_output, OutputMode},
};
use reqwest::Client;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pydocscraper", about = "Python documentation and PEP scraper")]
struct Cli {
    /// Which extractor to run
    #[arg(value_enum)]
    mode: Mode,

    /// Clear the response cache before running
    #[arg(short, long)]
    clear_cache: bool,

    /// Additional output target
    #[arg(short, long, value_enum)]
    output: Option<OutputMode>,

    /// Root directory for downloads/, results/, logs/ and cache/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    #[arg(long, default_value = MAIN_DOC_URL)]
    doc_url: String,

    #[arg(long, default_value = PEP_URL)]
    pep_url: String,

    /// JSON file replacing the built-in status letter table
    #[arg(long)]
    statuses: Option<PathBuf>,

    /// Retries for transport failures and 5xx responses
    #[arg(long, default_value_t = RetryPolicy::default().max_retries)]
    retries: u32,

    /// Do not read or write the response cache
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dirs = Dirs::new(&cli.base_dir);

    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init(&dirs.logs()).context("initialising logging")?;
    info!("parser started");
    info!(?cli, "command line arguments");

    // ─── 2) settings ─────────────────────────────────────────────────
    let statuses = match &cli.statuses {
        Some(path) => ExpectedStatuses::from_json_file(path)
            .with_context(|| format!("loading status table {}", path.display()))?,
        None => ExpectedStatuses::default(),
    };
    let settings = Settings {
        sources: Sources::new(&cli.doc_url, &cli.pep_url).context("parsing source urls")?,
        statuses,
        dirs,
    };

    // ─── 3) session ──────────────────────────────────────────────────
    let client = Client::builder()
        .user_agent(concat!("pydocscraper/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building http client")?;
    let cache = if cli.no_cache {
        None
    } else {
        Some(PageCache::new(settings.dirs.cache()).context("opening response cache")?)
    };
    let retry = RetryPolicy {
        max_retries: cli.retries,
        ..RetryPolicy::default()
    };
    let session = Session::new(client, cache, retry);

    if cli.clear_cache {
        let removed = session.clear_cache().context("clearing response cache")?;
        info!(removed, "cache cleared");
    }

    // ─── 4) extract & output ─────────────────────────────────────────
    let table = run_mode(cli.mode, &session, &settings)
        .await
        .with_context(|| format!("running {}", cli.mode))?;

    if let Some(table) = table {
        control_output(&table, cli.output, cli.mode, &settings.dirs.results())
            .context("writing results")?;
    }

    info!("parser finished");
    Ok(())
}
