use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use papercast_common::AudioArtifact;
use tracing::{debug, info, warn};
use uuid::Uuid;

const FILE_PREFIX: &str = "papercast-audio-";

/// Owns the generated audio files in one directory and keeps at most
/// `max_files` of them, deleting the oldest first.
///
/// Only files named `papercast-audio-*` are managed; anything else in the
/// directory is left alone.
pub struct AudioStore {
    dir: PathBuf,
    max_files: usize,
    files: Mutex<VecDeque<PathBuf>>,
}

impl AudioStore {
    /// Open a store over `dir`, adopting audio left there by earlier runs
    /// (oldest first) so retention holds across process restarts.
    pub fn open(dir: impl Into<PathBuf>, max_files: usize) -> io::Result<Self> {
        let dir = dir.into();
        let mut existing = Vec::new();

        match std::fs::read_dir(&dir) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry?;
                    let name = entry.file_name();
                    if !name.to_string_lossy().starts_with(FILE_PREFIX) {
                        continue;
                    }
                    let meta = entry.metadata()?;
                    if meta.is_file() {
                        existing.push((meta.modified().ok(), entry.path()));
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        existing.sort();

        debug!(dir = %dir.display(), adopted = existing.len(), "Audio store opened");
        Ok(Self {
            dir,
            max_files: max_files.max(1),
            files: Mutex::new(existing.into_iter().map(|(_, path)| path).collect()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Paths currently retained, oldest first.
    pub fn retained(&self) -> Vec<PathBuf> {
        self.lock().iter().cloned().collect()
    }

    /// Write `audio` under a fresh unique name, then evict past the limit.
    pub async fn save(&self, audio: &[u8], extension: &str) -> io::Result<AudioArtifact> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self
            .dir
            .join(format!("{FILE_PREFIX}{}.{extension}", Uuid::new_v4()));
        tokio::fs::write(&path, audio).await?;

        let evicted: Vec<PathBuf> = {
            let mut files = self.lock();
            files.push_back(path.clone());
            let excess = files.len().saturating_sub(self.max_files);
            files.drain(..excess).collect()
        };
        for old in evicted {
            match tokio::fs::remove_file(&old).await {
                Ok(()) => debug!(path = %old.display(), "Evicted old audio"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %old.display(), error = %e, "Failed to evict old audio"),
            }
        }

        info!(path = %path.display(), bytes = audio.len(), "Audio saved");
        Ok(AudioArtifact {
            path,
            bytes: audio.len() as u64,
            created_at: Utc::now(),
        })
    }

    /// Delete an artifact once the caller is done serving it.
    pub async fn release(&self, artifact: &AudioArtifact) -> io::Result<()> {
        self.lock().retain(|p| p != &artifact.path);
        match tokio::fs::remove_file(&artifact.path).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<PathBuf>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
