use crate::domain::model::ProcessedImage;
use crate::utils::error::{BotError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Moves published originals out of the source directory.
///
/// Archiving is two separate filesystem steps (drop the processed copy, then move the
/// original). A crash in between leaves the original in place without its processed copy,
/// which simply makes it eligible again on the next run.
#[derive(Debug, Clone)]
pub struct Archiver {
    source_dir: PathBuf,
    destination_dir: PathBuf,
}

impl Archiver {
    pub fn new(source_dir: impl Into<PathBuf>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            destination_dir: destination_dir.into(),
        }
    }

    /// Returns the original's new location.
    pub fn archive(&self, processed: &ProcessedImage) -> Result<PathBuf> {
        self.discard(processed)?;

        let from = self.source_dir.join(&processed.original);
        if !from.exists() {
            return Err(BotError::ArchiveError {
                message: format!("{} disappeared before it could be moved", from.display()),
            });
        }

        fs::create_dir_all(&self.destination_dir).map_err(|e| BotError::ArchiveError {
            message: format!("cannot create {}: {}", self.destination_dir.display(), e),
        })?;

        let to = self.destination_dir.join(&processed.original);
        move_file(&from, &to).map_err(|e| BotError::ArchiveError {
            message: format!("cannot move {} to {}: {}", from.display(), to.display(), e),
        })?;

        tracing::info!("Moved '{}' to {}", processed.original, self.destination_dir.display());
        Ok(to)
    }

    /// Deletes the transient processed copy; a copy that is already gone is fine.
    pub fn discard(&self, processed: &ProcessedImage) -> Result<()> {
        match fs::remove_file(&processed.path) {
            Ok(()) => {
                tracing::debug!("Removed {}", processed.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BotError::ArchiveError {
                message: format!("cannot remove {}: {}", processed.path.display(), e),
            }),
        }
    }
}

/// `rename`, falling back to copy + remove when source and destination are on different mounts.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            tracing::debug!("rename failed ({}), falling back to copy", rename_err);
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
