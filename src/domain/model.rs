use std::path::PathBuf;

/// One download as seen by a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source_url: String,
    pub auth_cookie: String,
    pub target_asset_name: String,
    pub attempt: u32,
}

impl DownloadRequest {
    pub fn new(
        source_url: impl Into<String>,
        auth_cookie: impl Into<String>,
        target_asset_name: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            auth_cookie: auth_cookie.into(),
            target_asset_name: target_asset_name.into(),
            attempt: 0,
        }
    }

    /// The same request, one attempt later.
    pub fn next_attempt(&self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success(PathBuf),
    /// `terminal` is set once retries are exhausted or the request can never succeed.
    Failure { terminal: bool },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success(_))
    }

    pub fn local_path(&self) -> Option<&PathBuf> {
        match self {
            DownloadOutcome::Success(path) => Some(path),
            DownloadOutcome::Failure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_attempt_keeps_parameters() {
        let request = DownloadRequest::new("http://host/a.png", "c", "a.png");
        let retry = request.next_attempt().next_attempt();
        assert_eq!(retry.attempt, 2);
        assert_eq!(retry.source_url, request.source_url);
        assert_eq!(retry.target_asset_name, "a.png");
    }

    #[test]
    fn failure_has_no_path() {
        let outcome = DownloadOutcome::Failure { terminal: true };
        assert!(!outcome.is_success());
        assert!(outcome.local_path().is_none());
    }
}
