use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::leads::Lead;

#[derive(Debug, Error)]
pub enum WriteSnapshotError {
    #[error("Serialize: {source}")]
    Serialize { source: serde_json::Error },

    #[error("CreateDir {path}: {source}")]
    CreateDir { path: String, source: std::io::Error },

    #[error("Write {path}: {source}")]
    Write { path: String, source: std::io::Error },
}

/// Writes the ranked leads to `path` as a pretty-printed JSON array,
/// replacing any previous snapshot.
pub fn write_snapshot(path: &Path, leads: &[Lead]) -> Result<(), WriteSnapshotError> {
    let json = serde_json::to_string_pretty(leads)
        .map_err(|source| WriteSnapshotError::Serialize { source })?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| WriteSnapshotError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }

    std::fs::write(path, json).map_err(|source| WriteSnapshotError::Write {
        path: path.display().to_string(),
        source,
    })?;

    info!(count = leads.len(), path = %path.display(), "snapshot written");
    Ok(())
}
