//! Django installation discovery
//!
//! The tool never executes Python. The "framework runtime" is the installed
//! `django` package on disk; everything extracted from it is read as text.
//! A missing installation is not an error: the pipeline emits nothing and
//! the process still exits 0.

pub mod context;

pub use context::{resolve_context, ContextError, ProjectContext};

use crate::config::Config;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An installed `django` package located on disk.
///
/// `root` is the `django` package directory itself, e.g.
/// `<venv>/lib/python3.12/site-packages/django`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DjangoInstall {
    root: PathBuf,
}

impl DjangoInstall {
    /// Locate the Django installation.
    ///
    /// Candidates, in order: the configured override directory, the active
    /// `VIRTUAL_ENV`, and `.venv`/`venv` next to the project launcher.
    pub fn locate<F: FileSystem>(
        fs: &F,
        config: &Config,
        project_base: Option<&Path>,
    ) -> Option<Self> {
        if let Some(dir) = &config.django_dir {
            if let Some(install) = Self::from_dir(fs, dir) {
                return Some(install);
            }
            debug!(dir = %dir.display(), "configured django dir has no django package");
        }

        let mut env_roots = Vec::new();
        if let Some(venv) = std::env::var_os("VIRTUAL_ENV") {
            env_roots.push(PathBuf::from(venv));
        }
        if let Some(base) = project_base {
            env_roots.push(base.join(".venv"));
            env_roots.push(base.join("venv"));
        }

        for env_root in env_roots {
            if let Some(install) = Self::from_virtualenv(fs, &env_root) {
                debug!(root = %install.root.display(), "located django installation");
                return Some(install);
            }
        }

        None
    }

    /// Accept `dir` as either the `django` package itself or a directory
    /// containing one.
    fn from_dir<F: FileSystem>(fs: &F, dir: &Path) -> Option<Self> {
        for candidate in [dir.to_path_buf(), dir.join("django")] {
            if fs.is_file(&candidate.join("conf").join("global_settings.py")) {
                return Some(Self { root: candidate });
            }
        }
        None
    }

    /// Probe `<env>/lib/python*/site-packages/django`
    fn from_virtualenv<F: FileSystem>(fs: &F, env_root: &Path) -> Option<Self> {
        let lib = env_root.join("lib");
        let entries = fs.read_dir(&lib).ok()?;
        for entry in entries {
            if entry.is_dir() && entry.file_name().starts_with("python") {
                let candidate = entry.path().join("site-packages").join("django");
                if let Some(install) = Self::from_dir(fs, &candidate) {
                    return Some(install);
                }
            }
        }
        None
    }

    /// The `django` package directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The site-packages directory containing the installation, used to
    /// resolve installed third-party app packages.
    pub fn site_packages(&self) -> Option<&Path> {
        self.root.parent()
    }

    /// Builtin default settings, with doc comments for every setting
    pub fn global_settings(&self) -> PathBuf {
        self.root.join("conf").join("global_settings.py")
    }

    /// Source of the QuerySet base type
    pub fn queryset_source(&self) -> PathBuf {
        self.root.join("db").join("models").join("query.py")
    }

    /// The framework's builtin tag library
    pub fn default_tags(&self) -> PathBuf {
        self.root.join("template").join("defaulttags.py")
    }

    /// The framework's builtin filter library
    pub fn default_filters(&self) -> PathBuf {
        self.root.join("template").join("defaultfilters.py")
    }
}
