//! Asset transfer side of the live-development companion: pulls project
//! assets and companion packages onto the device with bounded retries and
//! raises at most one fatal alert when a file cannot be loaded.

pub mod api;
pub mod application;
pub mod domain;
pub mod utils;

pub use api::{ApiClient, FetcherConfig};
pub use application::{AssetDownloader, AssetFetcher, CompanionHost, ErrorReportGate};
pub use domain::{AppError, DownloadOutcome, DownloadRequest};
