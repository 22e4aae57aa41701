use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Extension error: {0}")]
    Extension(String),

    #[error("Install error: {0}")]
    Install(String),

    #[error("Background worker is no longer running")]
    WorkerStopped,

    #[error("Job ended without an outcome")]
    JobAborted,
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}
