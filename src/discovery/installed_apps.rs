//! Installed-apps discovery strategy

use super::{scan_package, TemplateLibraryDiscovery};
use crate::extract::TemplateLibrary;
use crate::fs::FileSystem;
use crate::runtime::ProjectContext;
use regex::Regex;
use std::path::PathBuf;
use tracing::debug;

/// Resolves each entry of the project's `INSTALLED_APPS` to a package
/// directory and scans its `templatetags/` modules. Apps keep their
/// declaration order, so earlier apps win first-seen-wins dedup.
pub struct InstalledAppsDiscovery<'a, F: FileSystem> {
    fs: &'a F,
    apps: Vec<String>,
    /// Package roots, tried in order: project dir, then site-packages
    roots: Vec<PathBuf>,
}

impl<'a, F: FileSystem> InstalledAppsDiscovery<'a, F> {
    /// Capability probe: available when some settings file declares a
    /// non-empty `INSTALLED_APPS` list.
    pub fn probe(
        fs: &'a F,
        context: &ProjectContext,
        site_packages: Option<PathBuf>,
    ) -> Option<Self> {
        let base_dir = context.base_dir.clone()?;

        let mut apps = Vec::new();
        for file in &context.settings_files {
            if let Ok(source) = fs.read_to_string(file) {
                apps = installed_apps(&source);
                if !apps.is_empty() {
                    break;
                }
            }
        }
        if apps.is_empty() {
            return None;
        }

        let mut roots = vec![base_dir];
        roots.extend(site_packages);
        Some(Self { fs, apps, roots })
    }

    /// Resolve an app's dotted path to a package directory, trying
    /// progressively shorter prefixes so app-config entries like
    /// `myapp.apps.MyAppConfig` resolve to `myapp/`.
    fn resolve_package(&self, app: &str) -> Option<(String, PathBuf)> {
        let mut segments: Vec<&str> = app.split('.').collect();
        while !segments.is_empty() {
            let rel: PathBuf = segments.iter().collect();
            for root in &self.roots {
                let dir = root.join(&rel);
                if self.fs.is_file(&dir.join("__init__.py")) {
                    return Some((segments.join("."), dir));
                }
            }
            segments.pop();
        }
        None
    }
}

impl<F: FileSystem> TemplateLibraryDiscovery for InstalledAppsDiscovery<'_, F> {
    fn libraries(&self) -> Vec<TemplateLibrary> {
        let mut libraries = Vec::new();
        for app in &self.apps {
            let Some((package, dir)) = self.resolve_package(app) else {
                debug!(app, "app package not found on disk, skipping");
                continue;
            };
            let tags_dir = dir.join("templatetags");
            if !self.fs.is_file(&tags_dir.join("__init__.py")) {
                continue;
            }
            let prefix = format!("{package}.templatetags");
            libraries.extend(scan_package(self.fs, &prefix, &tags_dir));
        }
        libraries
    }
}

/// Extract the string entries of a top-level `INSTALLED_APPS` assignment.
fn installed_apps(source: &str) -> Vec<String> {
    let start_re = Regex::new(r"(?m)^INSTALLED_APPS\s*=\s*[\[(]").expect("valid regex");
    let Some(found) = start_re.find(source) else {
        return Vec::new();
    };

    let rest = &source[found.end()..];
    let mut depth = 1usize;
    let mut end = rest.len();
    for (offset, ch) in rest.char_indices() {
        match ch {
            '[' | '(' => depth += 1,
            ']' | ')' => {
                depth -= 1;
                if depth == 0 {
                    end = offset;
                    break;
                }
            }
            _ => {}
        }
    }

    // Commented-out entries stay disabled
    let block: String = rest[..end]
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");

    let entry_re = Regex::new(r#"["']([A-Za-z_][\w.]*)["']"#).expect("valid regex");
    entry_re
        .captures_iter(&block)
        .map(|caps| caps[1].to_string())
        .collect()
}
