//! Template library discovery strategies
//!
//! Third-party apps contribute template tags and filters through modules in
//! their `templatetags/` packages. Two strategies locate those modules:
//!
//! - [`InstalledAppsDiscovery`]: resolves every app listed in the
//!   project's `INSTALLED_APPS` setting and scans its `templatetags/`
//!   package. Preferred whenever the setting can be parsed.
//! - [`PackageWalkDiscovery`]: walks the project tree for `templatetags/`
//!   packages. Fallback for projects whose settings cannot be parsed.
//!
//! The strategy is picked once at startup by capability probing; extraction
//! code depends only on the [`TemplateLibraryDiscovery`] trait.

mod installed_apps;
mod package_walk;

pub use installed_apps::InstalledAppsDiscovery;
pub use package_walk::PackageWalkDiscovery;

use crate::extract::TemplateLibrary;
use crate::fs::FileSystem;
use crate::runtime::{DjangoInstall, ProjectContext};
use std::path::Path;
use tracing::debug;

/// Read-only catalog of installed template libraries
pub trait TemplateLibraryDiscovery {
    /// All discovered libraries, in a deterministic load order
    fn libraries(&self) -> Vec<TemplateLibrary>;
}

/// Pick the discovery strategy for this project.
///
/// Returns `None` when there is no project context at all; the pipeline
/// then emits only the framework's builtin libraries.
pub fn select_discovery<'a, F: FileSystem>(
    fs: &'a F,
    context: &ProjectContext,
    install: &DjangoInstall,
) -> Option<Box<dyn TemplateLibraryDiscovery + 'a>> {
    let site_packages = install.site_packages().map(Path::to_path_buf);

    if let Some(discovery) = InstalledAppsDiscovery::probe(fs, context, site_packages.clone()) {
        debug!("using installed-apps template library discovery");
        return Some(Box::new(discovery));
    }

    if let Some(base_dir) = &context.base_dir {
        debug!("settings not parseable, falling back to package walk discovery");
        return Some(Box::new(PackageWalkDiscovery::new(fs, base_dir.clone())));
    }

    None
}

/// Scan the modules of one `templatetags/` package directory, sorted by
/// file name. Modules that fail to scan are skipped.
pub(crate) fn scan_package<F: FileSystem>(
    fs: &F,
    package_prefix: &str,
    dir: &Path,
) -> Vec<TemplateLibrary> {
    let entries = match fs.read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut libraries = Vec::new();
    for entry in entries {
        if !entry.is_file() || !entry.file_name().ends_with(".py") {
            continue;
        }
        let stem = entry.file_name().trim_end_matches(".py").to_string();
        if stem == "__init__" {
            continue;
        }
        let module = format!("{package_prefix}.{stem}");
        if let Some(library) = crate::extract::templatetags::scan_file(fs, &module, entry.path()) {
            libraries.push(library);
        }
    }
    libraries
}
