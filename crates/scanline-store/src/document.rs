//! Whole-file document helpers shared by the JSON stores.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use crate::error::{StoreError, StoreResult};

/// Reads a document, `None` if the file does not exist.
pub(crate) async fn read_optional(path: &Path) -> StoreResult<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Writes a document through a sibling temp file so readers never see a
/// half-written file.
pub(crate) async fn write_replace(path: &Path, contents: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

/// Removes a file, treating "already gone" as success.
pub(crate) async fn remove_if_exists(path: &Path) -> StoreResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}
