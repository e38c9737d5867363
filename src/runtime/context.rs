//! Project context resolution
//!
//! Resolves the editor-supplied launcher path into a settings module name
//! and the list of project settings files. Every failure here degrades to
//! "framework defaults only"; the pipeline never aborts on a project that
//! cannot be resolved.

use crate::config::Config;
use crate::fs::FileSystem;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Why a project context could not be resolved
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("launcher {0} could not be read")]
    LauncherUnreadable(PathBuf),

    #[error("no settings module declaration in {0}")]
    SettingsModuleNotFound(PathBuf),
}

/// A resolved management context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContext {
    /// Dotted settings module, e.g. `mysite.settings`
    pub settings_module: Option<String>,

    /// Directory containing the launcher
    pub base_dir: Option<PathBuf>,

    /// Project settings files, sorted by file name
    pub settings_files: Vec<PathBuf>,
}

/// Resolve the project context from the configured launcher path.
///
/// `Ok` with an empty context (no launcher configured) and `Err` (launcher
/// present but unusable) are both handled by the caller as "no
/// project-specific settings".
pub fn resolve_context<F: FileSystem>(
    fs: &F,
    config: &Config,
) -> Result<ProjectContext, ContextError> {
    let launcher = match &config.management {
        Some(path) => path.clone(),
        None => {
            debug!("no management launcher configured, framework defaults only");
            return Ok(ProjectContext::default());
        }
    };

    let source = fs
        .read_to_string(&launcher)
        .map_err(|_| ContextError::LauncherUnreadable(launcher.clone()))?;

    let settings_module = settings_module_from(&source)
        .ok_or_else(|| ContextError::SettingsModuleNotFound(launcher.clone()))?;

    let base_dir = launcher
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let settings_files = settings_files_in(fs, &base_dir, &settings_module);
    debug!(
        module = %settings_module,
        files = settings_files.len(),
        "resolved project context"
    );

    Ok(ProjectContext {
        settings_module: Some(settings_module),
        base_dir: Some(base_dir),
        settings_files,
    })
}

/// Extract the settings module from launcher source.
///
/// Matches `os.environ.setdefault("DJANGO_SETTINGS_MODULE", "mysite.settings")`
/// in either quote style.
fn settings_module_from(source: &str) -> Option<String> {
    let re = Regex::new(r#"["']DJANGO_SETTINGS_MODULE["'],\s*["']([^"']+)["']"#)
        .expect("valid regex");
    re.captures(source)
        .map(|caps| caps[1].to_string())
}

/// All `*.py` files directly inside the settings package directory.
///
/// The package is the first dotted segment of the settings module, resolved
/// relative to the launcher's directory. Non-recursive on purpose.
fn settings_files_in<F: FileSystem>(fs: &F, base: &Path, settings_module: &str) -> Vec<PathBuf> {
    let package = match settings_module.split('.').next() {
        Some(first) if !first.is_empty() => first,
        _ => return Vec::new(),
    };

    let package_dir = base.join(package);
    let entries = match fs.read_dir(&package_dir) {
        Ok(entries) => entries,
        Err(_) => {
            debug!(dir = %package_dir.display(), "settings package directory not readable");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter(|e| e.is_file() && e.file_name().ends_with(".py"))
        .map(|e| e.path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    const MANAGE_NEW: &str = r#"
import os
import sys

def main():
    os.environ.setdefault("DJANGO_SETTINGS_MODULE", "mysite.settings")
"#;

    const MANAGE_OLD: &str = r#"
if __name__ == "__main__":
    os.environ.setdefault('DJANGO_SETTINGS_MODULE', 'legacy.settings')
"#;

    fn config_for(launcher: &str) -> Config {
        Config {
            management: Some(PathBuf::from(launcher)),
            django_dir: None,
        }
    }

    #[test]
    fn test_resolve_double_quoted_launcher() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/manage.py", MANAGE_NEW);
        fs.add_file("/proj/mysite/__init__.py", "");
        fs.add_file("/proj/mysite/settings.py", "DEBUG = True\n");
        fs.add_file("/proj/mysite/urls.py", "urlpatterns = []\n");
        fs.add_file("/proj/mysite/templates/base.html", "");

        let ctx = resolve_context(&fs, &config_for("/proj/manage.py")).unwrap();
        assert_eq!(ctx.settings_module.as_deref(), Some("mysite.settings"));
        assert_eq!(ctx.base_dir, Some(PathBuf::from("/proj")));
        assert_eq!(
            ctx.settings_files,
            vec![
                PathBuf::from("/proj/mysite/__init__.py"),
                PathBuf::from("/proj/mysite/settings.py"),
                PathBuf::from("/proj/mysite/urls.py"),
            ]
        );
    }

    #[test]
    fn test_resolve_single_quoted_launcher() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/manage.py", MANAGE_OLD);
        fs.add_file("/proj/legacy/settings.py", "");

        let ctx = resolve_context(&fs, &config_for("/proj/manage.py")).unwrap();
        assert_eq!(ctx.settings_module.as_deref(), Some("legacy.settings"));
    }

    #[test]
    fn test_no_launcher_configured() {
        let fs = MockFileSystem::new();
        let ctx = resolve_context(&fs, &Config::default()).unwrap();
        assert_eq!(ctx, ProjectContext::default());
    }

    #[test]
    fn test_unreadable_launcher() {
        let fs = MockFileSystem::new();
        let err = resolve_context(&fs, &config_for("/proj/manage.py")).unwrap_err();
        assert!(matches!(err, ContextError::LauncherUnreadable(_)));
    }

    #[test]
    fn test_launcher_without_settings_module() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/manage.py", "print('not a django launcher')\n");

        let err = resolve_context(&fs, &config_for("/proj/manage.py")).unwrap_err();
        assert!(matches!(err, ContextError::SettingsModuleNotFound(_)));
    }

    #[test]
    fn test_missing_settings_package_yields_empty_list() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/manage.py", MANAGE_NEW);

        let ctx = resolve_context(&fs, &config_for("/proj/manage.py")).unwrap();
        assert_eq!(ctx.settings_module.as_deref(), Some("mysite.settings"));
        assert!(ctx.settings_files.is_empty());
    }
}
