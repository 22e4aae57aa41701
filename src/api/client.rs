use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::COOKIE;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::models::FetcherConfig;

/// Name of the cookie the companion server authenticates with.
const AUTH_COOKIE_NAME: &str = "AppInventor";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

pub type ByteStream = BoxStream<'static, Result<bytes::Bytes>>;

/// Where asset bytes come from.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Open `url` authenticated with `cookie` and return the response body.
    async fn open(&self, url: &str, cookie: &str) -> Result<ByteStream>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.read_timeout() {
            builder = builder.read_timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

pub fn cookie_header(cookie: &str) -> String {
    format!("{}={}", AUTH_COOKIE_NAME, cookie)
}

#[async_trait]
impl AssetSource for ApiClient {
    async fn open(&self, url: &str, cookie: &str) -> Result<ByteStream> {
        let response = self
            .client
            .get(url)
            .header(COOKIE, cookie_header(cookie))
            .send()
            .await?;

        debug!(url = %url, status = %response.status(), "asset response");

        let response = response
            .error_for_status()
            .map_err(|e| ApiError::ApiError(format!("Download request failed: {}", e)))?;

        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok(stream.boxed())
    }
}
