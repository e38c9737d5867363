//! Environment configuration for django-completions
//!
//! All inputs arrive through the environment or CLI flags:
//!
//! - `_DJANGOPLUS_MANAGEMENT`: path to the project's `manage.py`. Set by the
//!   consuming editor plugin. When absent, no project context is available
//!   and only framework defaults are emitted.
//! - `DJANGO_COMPLETIONS_DJANGO_DIR`: directory of the Django installation
//!   (the `django` package directory or a directory containing it). When
//!   absent, the installation is located by probing `VIRTUAL_ENV` and the
//!   project's `.venv`/`venv`.
//! - `DJANGO_COMPLETIONS_LOG_LEVEL`: logging level, see `util::logging`.

use std::env;
use std::path::PathBuf;

/// Environment variable naming the project's manage.py launcher
pub const MANAGEMENT_ENV: &str = "_DJANGOPLUS_MANAGEMENT";

/// Environment variable overriding Django installation discovery
pub const DJANGO_DIR_ENV: &str = "DJANGO_COMPLETIONS_DJANGO_DIR";

/// Runtime configuration resolved from environment and CLI flags
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path to the project's manage.py, if a management context exists
    pub management: Option<PathBuf>,

    /// Explicit Django installation directory, overriding probing
    pub django_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self {
            management: env::var_os(MANAGEMENT_ENV).map(PathBuf::from),
            django_dir: env::var_os(DJANGO_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Apply CLI overrides on top of environment values
    pub fn with_overrides(
        mut self,
        management: Option<PathBuf>,
        django_dir: Option<PathBuf>,
    ) -> Self {
        if management.is_some() {
            self.management = management;
        }
        if django_dir.is_some() {
            self.django_dir = django_dir;
        }
        self
    }
}
