//! In-memory index of the photos currently on disk.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use parking_lot::RwLock;

use crate::naming;

/// Set of photo filenames known to exist in the storage directory.
///
/// The filesystem stays the source of truth: the manifest is populated once
/// at startup by [`Manifest::scan`] and gains exactly one entry per
/// successful upload. Nothing is ever removed during normal operation.
#[derive(Debug, Default)]
pub struct Manifest {
    entries: RwLock<HashSet<String>>,
}

impl Manifest {
    /// Builds a manifest by listing `dir`, keeping regular files whose
    /// lowercase name ends in a recognized image extension.
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let mut entries = HashSet::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if naming::has_allowed_extension(&name) {
                entries.insert(name);
            }
        }

        Ok(Self {
            entries: RwLock::new(entries),
        })
    }

    /// Returns `true` when `name` is a known photo.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains(name)
    }

    /// Records a newly stored photo. Idempotent; returns `false` when the
    /// name was already present.
    pub fn add(&self, name: String) -> bool {
        self.entries.write().insert(name)
    }

    /// Sorted snapshot of all known photo names, for gallery rendering.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().iter().cloned().collect();
        names.sort();
        names
    }

    /// Number of known photos.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` when no photos are known.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"data").expect("write fixture file");
    }

    #[test]
    fn scan_keeps_only_recognized_image_files() {
        let tmp = TempDir::new().expect("create temp dir");
        touch(tmp.path(), "a.jpg");
        touch(tmp.path(), "b.PNG");
        touch(tmp.path(), "c.webp");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "a.jpg.json");
        std::fs::create_dir(tmp.path().join("sub.png")).expect("create subdir");

        let manifest = Manifest::scan(tmp.path()).expect("scan should succeed");
        assert_eq!(manifest.names(), vec!["a.jpg", "b.PNG", "c.webp"]);
    }

    #[test]
    fn scan_is_idempotent_without_writes() {
        let tmp = TempDir::new().expect("create temp dir");
        touch(tmp.path(), "one.gif");
        touch(tmp.path(), "two.jpeg");

        let first = Manifest::scan(tmp.path()).expect("first scan");
        let second = Manifest::scan(tmp.path()).expect("second scan");
        assert_eq!(first.names(), second.names());
    }

    #[test]
    fn scan_of_empty_directory_is_empty() {
        let tmp = TempDir::new().expect("create temp dir");
        let manifest = Manifest::scan(tmp.path()).expect("scan should succeed");
        assert!(manifest.is_empty());
        assert_eq!(manifest.len(), 0);
    }

    #[test]
    fn add_is_idempotent() {
        let manifest = Manifest::default();
        assert!(manifest.add("photo.jpg".to_owned()));
        assert!(!manifest.add("photo.jpg".to_owned()));
        assert_eq!(manifest.len(), 1);
        assert!(manifest.contains("photo.jpg"));
    }

    #[test]
    fn names_are_sorted() {
        let manifest = Manifest::default();
        manifest.add("b.png".to_owned());
        manifest.add("a.png".to_owned());
        manifest.add("c.png".to_owned());
        assert_eq!(manifest.names(), vec!["a.png", "b.png", "c.png"]);
    }
}
