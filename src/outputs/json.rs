//! JSON document output.
//!
//! The document is serialized pretty-printed, written to a sibling temp file
//! and renamed over the target, so readers never see a partial file.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::OutputDocument;
use crate::utils::output_parent;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError {
    move |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `doc` to `path`, replacing any previous document.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_document(doc: &OutputDocument, path: &Path) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(doc)?;

    let dir = output_parent(path);
    fs::create_dir_all(&dir).await.map_err(io_err(&dir))?;

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "document.json".into());
    tmp_name.push(".tmp");
    let tmp_path = dir.join(tmp_name);

    fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(io_err(&tmp_path))?;
    if let Err(e) = fs::rename(&tmp_path, path).await {
        error!(error = %e, "Failed to move document into place");
        let _ = fs::remove_file(&tmp_path).await;
        return Err(io_err(path)(e));
    }

    info!(bytes = json.len(), "Wrote JSON document");
    Ok(())
}
