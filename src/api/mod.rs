pub mod client;
pub mod models;

pub use client::{ApiClient, ApiError, AssetSource, ByteStream};
pub use models::FetcherConfig;
