//! `mushaf-seed`: bulk-load page documents into the remote store.
//!
//! ```text
//! mushaf-seed quran.page.1.json quran.pages.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use mushaf::core::config::{self, CliOverrides};
use mushaf::import;
use mushaf::store::HttpPageStore;

#[derive(Parser)]
#[command(name = "mushaf-seed", about = "Upload Quran page JSON files to the page store")]
struct Args {
    /// JSON files holding a page object or an array of pages
    #[arg(required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Page store base URL (overrides config and MUSHAF_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Log every skipped page and batch
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error during seeding: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let file_config = config::load_config()?;
    let cli = CliOverrides {
        base_url: args.base_url,
        ..Default::default()
    };
    let resolved = config::resolve(&file_config, &cli);

    let sink = HttpPageStore::new(resolved.base_url, resolved.api_key, resolved.timeout)?;
    info!("Seeding {} file(s) into {}", args.files.len(), sink.base_url());

    let stats = import::seed_files(&sink, &args.files).await?;
    info!(
        "Total pages processed: {} ({} written, {} skipped, {} batches)",
        stats.processed, stats.written, stats.skipped, stats.batches
    );
    Ok(())
}
