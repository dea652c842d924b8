use crate::core::validator::FilenameValidator;
use crate::domain::model::{Selection, PROCESSED_PREFIX};
use crate::utils::error::{BotError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_ATTEMPTS: usize = 20;

/// Picks one validated filename from the source directory by rejection sampling.
///
/// Sampling is with replacement, so a directory with very few valid names among many
/// invalid ones can report [`BotError::SelectionExhausted`] even though a match exists.
#[derive(Debug, Clone)]
pub struct FileSelector {
    source_dir: PathBuf,
    max_attempts: usize,
    validator: FilenameValidator,
}

impl FileSelector {
    pub fn new(source_dir: impl Into<PathBuf>, max_attempts: usize, validator: FilenameValidator) -> Self {
        Self {
            source_dir: source_dir.into(),
            max_attempts,
            validator,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Selection> {
        let entries = self.list_entries()?;
        tracing::info!(
            "Found {} entries in {}",
            entries.len(),
            self.source_dir.display()
        );

        if entries.is_empty() {
            return Err(BotError::SourceEmpty {
                path: self.source_dir.display().to_string(),
            });
        }

        for attempt in 1..=self.max_attempts {
            let Some(candidate) = entries.choose(rng) else {
                break;
            };
            tracing::debug!("Attempt {}: trying '{}'", attempt, candidate);

            if self.accepts(candidate) {
                tracing::info!("Selected '{}' after {} attempt(s)", candidate, attempt);
                return Ok(Selection {
                    file_name: candidate.clone(),
                    attempts: attempt,
                });
            }
        }

        tracing::warn!(
            "No valid filename found after {} attempts",
            self.max_attempts
        );
        Err(BotError::SelectionExhausted {
            attempts: self.max_attempts,
        })
    }

    fn accepts(&self, candidate: &str) -> bool {
        !candidate.starts_with(PROCESSED_PREFIX) && self.validator.is_valid(candidate)
    }

    fn list_entries(&self) -> Result<Vec<String>> {
        let read_dir = fs::read_dir(&self.source_dir).map_err(|e| self.map_io_error(e))?;

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| self.map_io_error(e))?;
            // lossy names never satisfy the grammar
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn map_io_error(&self, err: std::io::Error) -> BotError {
        let path = self.source_dir.display().to_string();
        match err.kind() {
            ErrorKind::NotFound => BotError::SourceNotFound { path },
            ErrorKind::PermissionDenied => BotError::SourceAccessDenied { path },
            _ => BotError::IoError(err),
        }
    }
}
