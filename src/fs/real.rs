//! Standard library backed file system

use super::{DirEntry, FileSystem, FileType};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File system implementation backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in
            fs::read_dir(path).with_context(|| format!("failed to list {}", path.display()))?
        {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let kind = if file_type.is_dir() {
                FileType::Directory
            } else if file_type.is_symlink() {
                FileType::Symlink
            } else {
                FileType::File
            };
            entries.push(DirEntry {
                path: entry.path(),
                name: entry.file_name().to_string_lossy().into_owned(),
                file_type: kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.py"), "").unwrap();
        fs::write(dir.path().join("a.py"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let fs_impl = RealFileSystem::new();
        let entries = fs_impl.read_dir(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name()).collect();
        assert_eq!(names, vec!["a.py", "b.py", "sub"]);
        assert!(entries[2].is_dir());
    }

    #[test]
    fn test_read_missing_file() {
        let fs_impl = RealFileSystem::new();
        assert!(fs_impl
            .read_to_string(Path::new("/nonexistent/file.py"))
            .is_err());
        assert!(!fs_impl.exists(Path::new("/nonexistent/file.py")));
    }
}
