//! Pre-upload file selection.
//!
//! Purely local: files accumulate here until the user commits them to
//! the upload queue. No network I/O.

use std::path::{Path, PathBuf};

/// A locally selected file, identified by `(name, size)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Filename as it will appear in the store.
    pub name: String,
    /// Size in bytes, fixed at staging time.
    pub size: u64,
    /// Where the bytes live locally.
    pub local_path: PathBuf,
}

impl StagedFile {
    /// Stats `path` and builds a staged entry from its metadata.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            size: metadata.len(),
            local_path: path.to_path_buf(),
        })
    }
}

/// Accumulates selected files ahead of a commit.
#[derive(Debug, Default)]
pub struct Staging {
    files: Vec<StagedFile>,
}

impl Staging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file unless one with the same `(name, size)` is already
    /// staged. A duplicate is a silent no-op, not an error; returns
    /// whether the file was added.
    pub fn add(&mut self, file: StagedFile) -> bool {
        if self.contains(&file.name, file.size) {
            return false;
        }
        self.files.push(file);
        true
    }

    /// Stats `path` and stages it. See [`add`](Self::add) for the
    /// duplicate rule.
    pub fn add_path(&mut self, path: &Path) -> std::io::Result<bool> {
        Ok(self.add(StagedFile::from_path(path)?))
    }

    /// Removes a staged file by its identity key.
    pub fn remove(&mut self, name: &str, size: u64) -> bool {
        let before = self.files.len();
        self.files.retain(|f| !(f.name == name && f.size == size));
        self.files.len() != before
    }

    /// Discards the whole selection.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Hands the selection over (to the upload queue), leaving the
    /// staging area empty.
    pub fn drain(&mut self) -> Vec<StagedFile> {
        std::mem::take(&mut self.files)
    }

    pub fn contains(&self, name: &str, size: u64) -> bool {
        self.files.iter().any(|f| f.name == name && f.size == size)
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(name: &str, size: u64) -> StagedFile {
        StagedFile {
            name: name.into(),
            size,
            local_path: PathBuf::from(format!("/tmp/{name}")),
        }
    }

    #[test]
    fn add_and_drain() {
        let mut staging = Staging::new();
        assert!(staging.add(staged("a.bin", 10)));
        assert!(staging.add(staged("b.bin", 20)));
        assert_eq!(staging.len(), 2);

        let drained = staging.drain();
        assert_eq!(drained.len(), 2);
        assert!(staging.is_empty());
    }

    #[test]
    fn duplicate_is_silent_no_op() {
        let mut staging = Staging::new();
        assert!(staging.add(staged("report.pdf", 1000)));
        assert!(!staging.add(staged("report.pdf", 1000)));
        assert_eq!(staging.len(), 1);
    }

    #[test]
    fn same_name_different_size_is_not_a_duplicate() {
        let mut staging = Staging::new();
        assert!(staging.add(staged("report.pdf", 1000)));
        assert!(staging.add(staged("report.pdf", 2000)));
        assert_eq!(staging.len(), 2);
    }

    #[test]
    fn remove_by_identity() {
        let mut staging = Staging::new();
        staging.add(staged("a.bin", 10));
        staging.add(staged("b.bin", 20));

        assert!(staging.remove("a.bin", 10));
        assert!(!staging.remove("a.bin", 10));
        assert_eq!(staging.len(), 1);
        assert!(staging.contains("b.bin", 20));
    }

    #[test]
    fn clear_discards_everything() {
        let mut staging = Staging::new();
        staging.add(staged("a.bin", 10));
        staging.clear();
        assert!(staging.is_empty());
    }

    #[test]
    fn from_path_reads_metadata() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sample.dat");
        std::fs::write(&path, b"12345").unwrap();

        let file = StagedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "sample.dat");
        assert_eq!(file.size, 5);
        assert_eq!(file.local_path, path);
    }
}
