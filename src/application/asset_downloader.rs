use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

use crate::{
    api::{AssetSource, ByteStream, FetcherConfig},
    application::gate::ErrorReportGate,
    application::host::{unable_to_load_message, CompanionHost, FATAL_DISMISS, FATAL_TITLE},
    domain::{AppError, DownloadOutcome, DownloadRequest},
    utils::resolve_asset_path,
};

const PARTIAL_SUFFIX: &str = ".part";

/// Pulls single assets into the asset directory with a bounded number of attempts.
pub struct AssetDownloader {
    source: Arc<dyn AssetSource>,
    host: Arc<dyn CompanionHost>,
    gate: Arc<ErrorReportGate>,
    asset_dir: PathBuf,
    max_attempts: u32,
}

impl AssetDownloader {
    pub fn new(
        config: &FetcherConfig,
        source: Arc<dyn AssetSource>,
        host: Arc<dyn CompanionHost>,
        gate: Arc<ErrorReportGate>,
    ) -> Self {
        Self {
            source,
            host,
            gate,
            asset_dir: config.asset_dir(),
            max_attempts: config.max_attempts.max(1),
        }
    }

    pub fn host(&self) -> Arc<dyn CompanionHost> {
        Arc::clone(&self.host)
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    /// Download `asset_name` from `source_url` and tell the host it arrived.
    pub async fn fetch(
        &self,
        source_url: &str,
        auth_cookie: &str,
        asset_name: &str,
    ) -> DownloadOutcome {
        let outcome = self
            .download(&DownloadRequest::new(source_url, auth_cookie, asset_name))
            .await;

        if outcome.is_success() {
            self.host.asset_transferred(asset_name);
        }
        outcome
    }

    /// Run the attempts for `request` without the transfer notification.
    ///
    /// Transient failures are retried silently. Once `max_attempts` have failed
    /// the request is terminal and the fatal alert goes out through the gate.
    pub async fn download(&self, request: &DownloadRequest) -> DownloadOutcome {
        let target = match resolve_asset_path(&self.asset_dir, &request.target_asset_name) {
            Ok(target) => target,
            Err(e) => {
                warn!(url = %request.source_url, error = %e, "refusing asset");
                return self.report_terminal(&request.source_url);
            }
        };

        let mut request = request.clone();
        while request.attempt < self.max_attempts {
            match self.attempt(&request, &target).await {
                Ok(written) => {
                    debug!(
                        asset = %request.target_asset_name,
                        attempt = request.attempt,
                        bytes = written,
                        "asset stored"
                    );
                    return DownloadOutcome::Success(target);
                }
                Err(e) => {
                    warn!(
                        url = %request.source_url,
                        attempt = request.attempt,
                        error = %e,
                        "asset download attempt failed"
                    );
                }
            }
            request = request.next_attempt();
        }

        error!(
            url = %request.source_url,
            attempts = request.attempt,
            "giving up on asset"
        );
        self.report_terminal(&request.source_url)
    }

    async fn attempt(&self, request: &DownloadRequest, target: &Path) -> Result<u64, AppError> {
        let stream = self
            .source
            .open(&request.source_url, &request.auth_cookie)
            .await
            .map_err(|e| AppError::Api(e.to_string()))?;

        let parent = target.parent().unwrap_or(&self.asset_dir);
        tokio::fs::create_dir_all(parent).await?;

        // Each attempt owns its partial file, so fetches of the same asset never share one.
        let (file, partial) = partial_file(parent, target)?.into_parts();
        let written = match write_stream(stream, tokio::fs::File::from_std(file)).await {
            Ok(written) => written,
            Err(e) => {
                discard_partial(partial);
                return Err(e);
            }
        };

        if let Err(e) = partial.persist(target) {
            discard_partial(e.path);
            return Err(e.error.into());
        }
        Ok(written)
    }

    fn report_terminal(&self, url: &str) -> DownloadOutcome {
        if self.gate.try_claim() {
            self.host
                .fatal_error(&unable_to_load_message(url), FATAL_TITLE, FATAL_DISMISS);
        } else {
            debug!(url = %url, "fatal alert already raised");
        }
        DownloadOutcome::Failure { terminal: true }
    }
}

fn partial_file(dir: &Path, target: &Path) -> Result<tempfile::NamedTempFile, AppError> {
    let name = target.file_name().unwrap_or_default().to_string_lossy();
    let file = tempfile::Builder::new()
        .prefix(&format!(".{}.", name))
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(dir)?;
    Ok(file)
}

fn discard_partial(partial: TempPath) {
    let path = partial.to_path_buf();
    if let Err(e) = partial.close() {
        warn!(path = %path.display(), error = %e, "could not remove partial file");
    }
}

async fn write_stream(mut stream: ByteStream, mut file: tokio::fs::File) -> Result<u64, AppError> {
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AppError::Api(e.to_string()))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;
    Ok(written)
}
