//! django-completions - completion data generator for Django projects
//!
//! This library scans a Django installation and project sources as text and
//! produces a grouped completion stream for editor plugins: setting names
//! (with their documentation), QuerySet methods, template tags and template
//! filters, including those contributed by installed third-party apps.
//!
//! # Core Concepts
//!
//! - **Context resolution**: the editor supplies the project's `manage.py`
//!   through an environment variable; the settings module and its files are
//!   resolved from it. Without a project, framework defaults still emit.
//! - **Extraction**: settings, queryset members and template libraries are
//!   scraped from Python source text. Nothing is ever executed.
//! - **Discovery**: installed template libraries are found either through
//!   the project's `INSTALLED_APPS` or by walking for `templatetags/`
//!   packages, whichever the project supports.
//! - **Emission**: each group is written as a `@@group` header followed by
//!   `##word` entries with single-line documentation, ending in a bare
//!   `##` terminator.
//!
//! # Example Usage
//!
//! ```no_run
//! use django_completions::{pipeline, Config};
//! use django_completions::fs::RealFileSystem;
//!
//! let config = Config::from_env();
//! let fs = RealFileSystem::new();
//! let stdout = std::io::stdout();
//! pipeline::run(&fs, &config, stdout.lock()).ok();
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod emit;
pub mod extract;
pub mod fs;
pub mod pipeline;
pub mod runtime;
pub mod util;

// Re-export key types for convenient access
pub use config::Config;
pub use emit::Emitter;
pub use extract::{QuerySetMember, SettingDoc, TemplateLibrary, TemplateSymbol};
pub use runtime::{DjangoInstall, ProjectContext};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "django-completions");
    }
}
