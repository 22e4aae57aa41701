use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    application::asset_downloader::AssetDownloader,
    application::host::{CompanionHost, INSTALL_FAILED_MESSAGE},
    domain::{AppError, DownloadOutcome, DownloadRequest},
    utils::{last_path_segment, project_asset_url},
};

enum Job {
    Asset {
        request: DownloadRequest,
        reply: oneshot::Sender<DownloadOutcome>,
    },
    Companion {
        request: DownloadRequest,
        reply: oneshot::Sender<DownloadOutcome>,
    },
}

/// Receives the outcome of a submitted job. Dropping it does not cancel the job.
pub struct JobHandle {
    rx: oneshot::Receiver<DownloadOutcome>,
}

impl JobHandle {
    pub async fn outcome(self) -> Result<DownloadOutcome, AppError> {
        self.rx.await.map_err(|_| AppError::JobAborted)
    }
}

/// Front door of the companion's asset transfers. All downloads run one at a
/// time on a single background task; submitting never waits for them.
pub struct AssetFetcher {
    tx: mpsc::UnboundedSender<Job>,
    host: Arc<dyn CompanionHost>,
    worker: JoinHandle<()>,
}

impl AssetFetcher {
    /// Start the background worker. Must be called inside a tokio runtime.
    pub fn spawn(downloader: AssetDownloader) -> Self {
        let host = downloader.host();
        let downloader = Arc::new(downloader);
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                // A panicking job only loses its own outcome; the queue keeps going.
                if let Err(e) = tokio::spawn(run_job(Arc::clone(&downloader), job)).await {
                    error!(error = %e, "asset job aborted");
                }
            }
            debug!("asset worker stopped");
        });

        Self { tx, host, worker }
    }

    /// Queue `asset` of project `project_id` for download from `base_uri`.
    pub fn fetch_assets(
        &self,
        cookie: &str,
        project_id: &str,
        base_uri: &str,
        asset: &str,
    ) -> Result<JobHandle, AppError> {
        let url = project_asset_url(base_uri, project_id, asset);
        let request = DownloadRequest::new(url, cookie, asset);
        self.submit(|reply| Job::Asset { request, reply })
    }

    /// Queue a download of a new companion package and hand it to the installer.
    pub fn upgrade_companion(&self, cookie: &str, uri: &str) -> Result<JobHandle, AppError> {
        let asset = last_path_segment(uri)
            .ok_or_else(|| AppError::InvalidInput(format!("no file name in {}", uri)))?;
        let request = DownloadRequest::new(uri, cookie, asset);
        self.submit(|reply| Job::Companion { request, reply })
    }

    /// Load the extension components listed in `json`, a JSON array of names.
    pub fn load_extensions(&self, json: &str) -> Result<(), AppError> {
        debug!(json = %json, "load extensions");

        let names: Vec<String> = serde_json::from_str(json).map_err(|e| {
            error!(error = %e, "could not parse extension list");
            AppError::Extension(format!("invalid extension list: {}", e))
        })?;

        if names.is_empty() {
            debug!("no extensions");
            self.host.extensions_loaded();
            return Ok(());
        }

        if let Err(e) = self.host.load_components(&names) {
            error!(error = %e, "loading extension components failed");
            return Err(e);
        }

        info!(count = names.len(), "extensions loaded");
        self.host.extensions_loaded();
        Ok(())
    }

    /// Stop accepting jobs and wait for queued ones to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            error!(error = %e, "asset worker panicked");
        }
    }

    fn submit(
        &self,
        job: impl FnOnce(oneshot::Sender<DownloadOutcome>) -> Job,
    ) -> Result<JobHandle, AppError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(job(reply))
            .map_err(|_| AppError::WorkerStopped)?;
        Ok(JobHandle { rx })
    }
}

async fn run_job(downloader: Arc<AssetDownloader>, job: Job) {
    match job {
        Job::Asset { request, reply } => {
            let outcome = downloader
                .fetch(
                    &request.source_url,
                    &request.auth_cookie,
                    &request.target_asset_name,
                )
                .await;
            let _ = reply.send(outcome);
        }
        Job::Companion { request, reply } => {
            let outcome = downloader.download(&request).await;
            if let DownloadOutcome::Success(path) = &outcome {
                if let Err(e) = downloader.host().install_package(path) {
                    warn!(path = %path.display(), error = %e, "companion install failed");
                    downloader.host().send_error(INSTALL_FAILED_MESSAGE);
                }
            }
            let _ = reply.send(outcome);
        }
    }
}
