use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use companion_assets::{
    application::LoggingHost, ApiClient, AppError, AssetDownloader, AssetFetcher,
    DownloadOutcome, ErrorReportGate, FetcherConfig,
};

#[derive(Parser)]
#[command(name = "companion-assets", about = "Pull companion assets onto this device")]
struct Cli {
    /// JSON file with fetcher settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the storage root from the config
    #[arg(long, global = true)]
    storage_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download one project asset
    Fetch {
        #[arg(long)]
        cookie: String,
        #[arg(long)]
        project: String,
        /// Base URI of the build server
        #[arg(long)]
        uri: String,
        asset: String,
    },
    /// Download a new companion package
    Upgrade {
        #[arg(long)]
        cookie: String,
        uri: String,
    },
    /// Load extension components from a JSON list of names
    Extensions { json: String },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FetcherConfig::from_json_file(path)?,
        None => FetcherConfig::default(),
    };
    if let Some(root) = cli.storage_root {
        config.storage_root = root;
    }

    let client = ApiClient::new(&config).map_err(|e| AppError::Api(e.to_string()))?;
    let downloader = AssetDownloader::new(
        &config,
        Arc::new(client),
        Arc::new(LoggingHost),
        Arc::new(ErrorReportGate::new()),
    );
    info!(asset_dir = %downloader.asset_dir().display(), "companion assets ready");

    let fetcher = AssetFetcher::spawn(downloader);
    let result = match cli.command {
        Command::Fetch {
            cookie,
            project,
            uri,
            asset,
        } => report(
            fetcher
                .fetch_assets(&cookie, &project, &uri, &asset)?
                .outcome()
                .await?,
        ),
        Command::Upgrade { cookie, uri } => report(
            fetcher
                .upgrade_companion(&cookie, &uri)?
                .outcome()
                .await?,
        ),
        Command::Extensions { json } => fetcher.load_extensions(&json),
    };

    fetcher.shutdown().await;
    result
}

fn report(outcome: DownloadOutcome) -> Result<(), AppError> {
    match outcome {
        DownloadOutcome::Success(path) => {
            println!("{}", path.display());
            Ok(())
        }
        DownloadOutcome::Failure { .. } => Err(AppError::Api("unable to load file".to_string())),
    }
}
