use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::domain::AppError;

/// Join `asset_name` under `asset_dir`, keeping nested segments.
/// Absolute names and `..` segments are rejected.
pub fn resolve_asset_path(asset_dir: &Path, asset_name: &str) -> Result<PathBuf, AppError> {
    let relative = Path::new(asset_name);
    let mut resolved = asset_dir.to_path_buf();
    let mut has_file = false;

    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                resolved.push(segment);
                has_file = true;
            }
            Component::CurDir => {}
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "asset name escapes asset directory: {}",
                    asset_name
                )))
            }
        }
    }

    if !has_file {
        return Err(AppError::InvalidInput("empty asset name".to_string()));
    }

    Ok(resolved)
}

/// Download URL of a project asset on the companion server.
pub fn project_asset_url(base_uri: &str, project_id: &str, asset: &str) -> String {
    format!(
        "{}/ode/download/file/{}/{}",
        base_uri.trim_end_matches('/'),
        project_id,
        asset
    )
}

/// Last non-empty path segment of `uri`, ignoring query and fragment.
/// A trailing slash is skipped, so `http://host/packages/` yields `packages`.
pub fn last_path_segment(uri: &str) -> Option<String> {
    match Url::parse(uri) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string),
        Err(_) => uri
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
    }
}
