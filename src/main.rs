use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use mushaf::PageSource;
use mushaf::core::config::{self, CliOverrides, ResolvedConfig};
use mushaf::core::navigation::NavigationState;
use mushaf::core::persist::{FileStore, SessionPersistence};
use mushaf::store::{DemoPageStore, HttpPageStore, PageStore, StoreError};
use mushaf::tui;

#[derive(Parser)]
#[command(name = "mushaf", about = "Paginated Quran reader for the terminal")]
struct Args {
    /// Where pages come from
    #[arg(short, long, value_enum)]
    source: Option<PageSource>,

    /// Page store base URL (overrides config and MUSHAF_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
}

fn build_store(config: &ResolvedConfig) -> Result<Arc<dyn PageStore>, StoreError> {
    Ok(match config.source {
        PageSource::Demo => Arc::new(DemoPageStore::new()),
        PageSource::Remote => Arc::new(HttpPageStore::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.timeout,
        )?),
    })
}

fn open_persistence(config: &ResolvedConfig) -> std::io::Result<SessionPersistence> {
    let dir = match &config.session_dir {
        Some(dir) => dir.clone(),
        None => FileStore::default_dir()?,
    };
    info!("Session directory: {}", dir.display());
    Ok(SessionPersistence::new(Box::new(FileStore::new(dir))))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to mushaf.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("mushaf.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config()?;
    let cli = CliOverrides {
        source: args.source,
        base_url: args.base_url,
    };
    let config = config::resolve(&file_config, &cli);
    info!("Mushaf starting up with source: {:?}", config.source);

    let store = build_store(&config)?;
    let persistence = open_persistence(&config)?;
    let nav = match NavigationState::open(store, persistence, config.nav_options()).await {
        Ok(nav) => nav,
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(e.into());
        }
    };

    tui::run(nav)?;
    Ok(())
}
