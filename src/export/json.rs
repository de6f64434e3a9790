use crate::error::ExportError;
use crate::model::FamilyInventory;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the loaded records as a JSON snapshot that `SnapshotSource` reads back.
pub fn export_snapshot<P: AsRef<Path>>(inventory: &FamilyInventory, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(inventory).map_err(|e| ExportError::Write {
        message: e.to_string(),
    })?;

    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::Write {
            message: e.to_string(),
        })?;

    tracing::info!(path = %path_ref.display(), "wrote JSON snapshot");
    Ok(())
}
