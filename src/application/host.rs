use std::path::Path;

use tracing::{error, info, warn};

use crate::domain::AppError;

pub const FATAL_TITLE: &str = "Error!";
pub const FATAL_DISMISS: &str = "End Application";
pub const INSTALL_FAILED_MESSAGE: &str = "Unable to Install new Companion Package.";

pub fn unable_to_load_message(url: &str) -> String {
    format!("Unable to load file: {}", url)
}

/// The app side of the companion: whatever shows alerts, reports results
/// back to the designer and installs or loads what was downloaded.
pub trait CompanionHost: Send + Sync {
    fn asset_transferred(&self, asset: &str);

    fn fatal_error(&self, message: &str, title: &str, dismiss: &str);

    fn send_error(&self, message: &str);

    fn extensions_loaded(&self);

    fn install_package(&self, path: &Path) -> Result<(), AppError>;

    fn load_components(&self, names: &[String]) -> Result<(), AppError>;
}

/// Host for headless use: every callback becomes a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHost;

impl CompanionHost for LoggingHost {
    fn asset_transferred(&self, asset: &str) {
        info!(asset = %asset, "asset transferred");
    }

    fn fatal_error(&self, message: &str, title: &str, dismiss: &str) {
        error!(title = %title, dismiss = %dismiss, "{}", message);
    }

    fn send_error(&self, message: &str) {
        warn!("{}", message);
    }

    fn extensions_loaded(&self) {
        info!("extensions loaded");
    }

    fn install_package(&self, path: &Path) -> Result<(), AppError> {
        info!(path = %path.display(), "companion package ready to install");
        Ok(())
    }

    fn load_components(&self, names: &[String]) -> Result<(), AppError> {
        info!(count = names.len(), "components requested: {}", names.join(", "));
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_host_accepts_packages() {
        let host = LoggingHost;
        assert!(host.install_package(Path::new("/sdcard/AppInventor/Companion.apk")).is_ok());
        assert!(host.load_components(&["edu.mit.Foo".to_string()]).is_ok());
    }

    #[test]
    fn load_message_names_the_url() {
        assert_eq!(
            unable_to_load_message("http://host/missing.png"),
            "Unable to load file: http://host/missing.png"
        );
    }
}
