//! High-score persistence
//!
//! The store is a plain text file holding one decimal integer. A missing or
//! unreadable file counts as a high score of 0; only writes can fail.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Single-integer high score kept on disk
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored score, falling back to 0
    pub fn load(&self) -> u32 {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!(path = ?self.path, %err, "no stored high score");
                return 0;
            }
        };

        match contents.trim().parse() {
            Ok(score) => score,
            Err(err) => {
                warn!(path = ?self.path, %err, "ignoring corrupt high score file");
                0
            }
        }
    }

    /// Overwrite the stored score
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        std::fs::write(&self.path, score.to_string())
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;
        Ok(())
    }

    /// Store `final_score` if it beats the stored one
    ///
    /// Returns the high score after the update.
    pub fn record(&self, final_score: u32) -> Result<u32> {
        let stored = self.load();
        if final_score <= stored {
            return Ok(stored);
        }

        self.save(final_score)?;
        debug!(score = final_score, "new high score saved");
        Ok(final_score)
    }
}
