//! Package-walk discovery strategy (legacy fallback)

use super::{scan_package, TemplateLibraryDiscovery};
use crate::extract::TemplateLibrary;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};

/// Maximum directory depth below the project root
const MAX_DEPTH: usize = 8;

/// Walks the project tree for `templatetags/` packages when the settings
/// cannot tell us which apps are installed. Directories are visited in
/// sorted order so the resulting library order is stable.
pub struct PackageWalkDiscovery<'a, F: FileSystem> {
    fs: &'a F,
    root: PathBuf,
}

impl<'a, F: FileSystem> PackageWalkDiscovery<'a, F> {
    pub fn new(fs: &'a F, root: PathBuf) -> Self {
        Self { fs, root }
    }

    fn walk(&self, dir: &Path, depth: usize, libraries: &mut Vec<TemplateLibrary>) {
        if depth > MAX_DEPTH {
            return;
        }
        let entries = match self.fs.read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        for entry in entries {
            if !entry.is_dir() || entry.file_name().starts_with('.') {
                continue;
            }
            if entry.file_name() == "templatetags" {
                if self.fs.is_file(&entry.path().join("__init__.py")) {
                    let prefix = self.package_prefix(entry.path());
                    libraries.extend(scan_package(self.fs, &prefix, entry.path()));
                }
                continue;
            }
            self.walk(entry.path(), depth + 1, libraries);
        }
    }

    /// Dotted module prefix of a `templatetags` directory relative to the
    /// walk root.
    fn package_prefix(&self, dir: &Path) -> String {
        dir.strip_prefix(&self.root)
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .unwrap_or_else(|_| "templatetags".to_string())
    }
}

impl<F: FileSystem> TemplateLibraryDiscovery for PackageWalkDiscovery<'_, F> {
    fn libraries(&self) -> Vec<TemplateLibrary> {
        let mut libraries = Vec::new();
        self.walk(&self.root, 0, &mut libraries);
        libraries
    }
}
