use std::path::{Path, PathBuf};

use crate::result::Result;

const FALLBACK_NAME: &str = "comic.png";

/// A downloaded comic image on the local filesystem.
///
/// The file belongs to the run that created it and is removed when the
/// value is dropped, whichever way the run ends.
#[derive(Debug)]
pub struct ImageFile {
    path: PathBuf,
    upload_name: String,
}

impl ImageFile {
    /// Writes `bytes` into `dir` under a per-run unique name derived from `source`.
    pub(crate) async fn create(dir: &Path, source: &str, bytes: &[u8]) -> Result<Self> {
        let upload_name = file_name_from_url(source);
        let path = dir.join(format!("{}-{upload_name}", uuid::Uuid::new_v4()));

        // guard first, so a partial write is removed too
        let file = ImageFile { path, upload_name };
        tokio::fs::write(&file.path, bytes).await?;
        log::debug!("wrote {} bytes to {}", bytes.len(), file.path.display());
        Ok(file)
    }

    /// Returns the local path of the image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the name the image is uploaded under (the source URL's last segment).
    pub fn upload_name(&self) -> &str {
        &self.upload_name
    }

    pub(crate) async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

impl Drop for ImageFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("removed {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("could not remove {}: {}", self.path.display(), e),
        }
    }
}

/// Last path segment of `url`, e.g. `barrel_cropped_(1).jpg`.
pub(crate) fn file_name_from_url(url: &str) -> String {
    let segment = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(ToString::to_string))
        })
        .unwrap_or_default();

    let segment: String = segment
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .collect();
    if segment.is_empty() || segment == "." || segment == ".." {
        FALLBACK_NAME.to_string()
    } else {
        segment
    }
}
