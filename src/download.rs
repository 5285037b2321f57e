//! Local download of the fetched chemical file.

use std::path::{Path, PathBuf};

use crate::error::LigviewError;

/// MIME type for MDL structure-data (chemical table) files.
pub const SDF_MIME: &str = "chemical/x-mdl-sdfile";

/// A file ready to be saved locally: the raw bytes of the last
/// successfully fetched chemical file, named after the ligand.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPayload {
    /// Target file name, `<ligand name>.sdf`.
    pub file_name: String,
    /// MIME type of the content.
    pub mime: &'static str,
    /// Raw file content, byte-identical to the fetched resource.
    pub content: String,
}

impl DownloadPayload {
    /// Payload for an SDF download named after `ligand_name`.
    #[must_use]
    pub fn sdf(ligand_name: &str, content: String) -> Self {
        Self {
            file_name: format!("{}.sdf", sanitize(ligand_name)),
            mime: SDF_MIME,
            content,
        }
    }

    /// Write the payload into `dir` (created if missing), returning the
    /// written path.
    ///
    /// # Errors
    ///
    /// Returns [`LigviewError::Io`] if the directory or file cannot be
    /// written.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, LigviewError> {
        std::fs::create_dir_all(dir).map_err(LigviewError::Io)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.content.as_bytes())
            .map_err(LigviewError::Io)?;
        Ok(path)
    }
}

/// Replace path separators and control characters so the ligand name is a
/// safe file stem.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "ligand".to_owned()
    } else {
        trimmed.to_owned()
    }
}
