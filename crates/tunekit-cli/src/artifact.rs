//! Artifact writing and drift detection
//!
//! Wraps a rendered sysctl drop-in with its content hash, writes it to the
//! destination, and compares the parameter body against what is installed
//! on disk. Drift comparison hashes only `key = value` lines, so a changed
//! generation timestamp in the header never reads as drift.

use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// A rendered artifact ready to be written
#[derive(Debug)]
pub struct Artifact {
    /// Destination path
    pub path: PathBuf,

    /// Full rendered content (header + body)
    pub content: String,

    /// SHA-256 of the parameter body
    pub body_hash: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        let body_hash = compute_hash(&parameter_body(&content));
        Self {
            path: path.into(),
            content,
            body_hash,
        }
    }

    /// Write the artifact, creating parent directories as needed
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CliError::FileWrite {
                path: self.path.clone(),
                source: e,
            })?;
        }
        std::fs::write(&self.path, &self.content).map_err(|e| CliError::FileWrite {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Back up any existing file at the destination to `<path>.bak`
    ///
    /// Returns the backup path if a file existed.
    pub fn backup_existing(&self) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let backup = backup_path(&self.path);
        std::fs::copy(&self.path, &backup).map_err(|e| CliError::BackupFailed {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(backup))
    }

    /// Check whether the installed file's parameter body matches this one
    pub fn matches_disk(&self) -> bool {
        match std::fs::read_to_string(&self.path) {
            Ok(installed) => compute_hash(&parameter_body(&installed)) == self.body_hash,
            Err(_) => false,
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

/// Extract only the `key = value` lines, dropping comments and blanks
fn parameter_body(content: &str) -> String {
    let mut body = String::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        body.push_str(trimmed);
        body.push('\n');
    }
    body
}

/// Compute SHA-256 hash of content
fn compute_hash(content: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_content(timestamp: &str) -> String {
        format!(
            "# header\n# Generated: {}\n\nnet.core.somaxconn = 4096\nvm.swappiness = 10\n",
            timestamp
        )
    }

    #[test]
    fn test_parameter_body_drops_comments() {
        let body = parameter_body(&sample_content("t1"));
        assert_eq!(body, "net.core.somaxconn = 4096\nvm.swappiness = 10\n");
    }

    #[test]
    fn test_hash_ignores_timestamp_changes() {
        let a = Artifact::new("/tmp/a.conf", sample_content("2026-01-01T00:00:00Z"));
        let b = Artifact::new("/tmp/b.conf", sample_content("2026-06-30T10:30:00Z"));
        assert_eq!(a.body_hash, b.body_hash);
    }

    #[test]
    fn test_hash_changes_with_parameters() {
        let a = Artifact::new("/tmp/a.conf", "vm.swappiness = 10\n");
        let b = Artifact::new("/tmp/b.conf", "vm.swappiness = 1\n");
        assert_ne!(a.body_hash, b.body_hash);
    }

    #[test]
    fn test_write_and_match_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sysctl.d/99-tunekit.conf");

        let artifact = Artifact::new(&path, sample_content("t1"));
        assert!(!artifact.matches_disk());

        artifact.write().unwrap();
        assert!(artifact.matches_disk());

        // Regenerated content with a new timestamp still matches
        let regenerated = Artifact::new(&path, sample_content("t2"));
        assert!(regenerated.matches_disk());
    }

    #[test]
    fn test_backup_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("99-tunekit.conf");
        std::fs::write(&path, "old content\n").unwrap();

        let artifact = Artifact::new(&path, "new content\n");
        let backup = artifact.backup_existing().unwrap().unwrap();

        assert_eq!(std::fs::read_to_string(backup).unwrap(), "old content\n");
    }

    #[test]
    fn test_backup_skipped_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::new(dir.path().join("absent.conf"), "content\n");
        assert!(artifact.backup_existing().unwrap().is_none());
    }
}
