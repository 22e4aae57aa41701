pub mod asset_downloader;
pub mod fetcher;
pub mod gate;
pub mod host;

pub use asset_downloader::AssetDownloader;
pub use fetcher::{AssetFetcher, JobHandle};
pub use gate::ErrorReportGate;
pub use host::{CompanionHost, LoggingHost};
