//! In-memory file system for unit tests

use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory file system. Directories exist implicitly as ancestors of
/// added files.
#[derive(Debug, Default)]
pub struct MockFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file with the given contents
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .lock()
            .expect("mock fs lock")
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    fn is_ancestor(&self, path: &Path) -> bool {
        let files = self.files.lock().expect("mock fs lock");
        files
            .keys()
            .any(|p| p != path && p.starts_with(path))
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        !self.is_file(path) && self.is_ancestor(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().expect("mock fs lock").contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .lock()
            .expect("mock fs lock")
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        if !self.is_dir(path) {
            return Err(anyhow!("no such directory: {}", path.display()));
        }
        let files = self.files.lock().expect("mock fs lock");
        let mut children: BTreeMap<String, FileType> = BTreeMap::new();
        for file in files.keys() {
            if let Ok(rest) = file.strip_prefix(path) {
                let mut components = rest.components();
                if let Some(first) = components.next() {
                    let name = first.as_os_str().to_string_lossy().into_owned();
                    let kind = if components.next().is_some() {
                        FileType::Directory
                    } else {
                        FileType::File
                    };
                    children.entry(name).or_insert(kind);
                }
            }
        }
        Ok(children
            .into_iter()
            .map(|(name, file_type)| DirEntry {
                path: path.join(&name),
                name,
                file_type,
            })
            .collect())
    }
}
