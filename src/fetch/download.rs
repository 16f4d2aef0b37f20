// src/fetch/download.rs

use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;

use super::Session;
use crate::error::Result;

/// Download `url` and save it under `dest_dir` using the URL's last path segment.
/// Returns the full path of the saved file.
pub async fn download_to_dir(
    session: &Session,
    url: &Url,
    dest_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    let filename = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or("download.bin");
    let dest_path = dest_dir.join(filename);

    fs::create_dir_all(dest_dir).await?;

    let bytes = session.get_bytes(url).await?;
    fs::write(&dest_path, &bytes).await?;

    Ok(dest_path)
}
