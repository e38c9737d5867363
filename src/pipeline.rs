//! The discovery-and-emission pipeline
//!
//! Strictly sequential: each completion group is extracted and immediately
//! emitted, so memory stays flat no matter how many libraries a project
//! installs. All failures are contained locally; the run produces a
//! best-effort stream and the process exits 0 on every path.

use crate::config::Config;
use crate::discovery::select_discovery;
use crate::emit::{
    filter_word, tag_word, Emitter, GROUP_FILTERS, GROUP_QUERYSET, GROUP_SETTINGS, GROUP_TAGS,
};
use crate::extract::{queryset, settings, templatetags, QuerySetMember, TemplateLibrary};
use crate::fs::FileSystem;
use crate::runtime::{resolve_context, DjangoInstall, ProjectContext};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Run the whole pipeline, writing the completion stream to `out`.
///
/// A missing Django installation produces no output at all; every other
/// failure degrades to fewer completions.
pub fn run<F: FileSystem, W: Write>(fs: &F, config: &Config, out: W) -> Result<()> {
    let context = resolve_context(fs, config).unwrap_or_else(|err| {
        debug!(%err, "project context unavailable, continuing with defaults");
        ProjectContext::default()
    });

    let Some(install) = DjangoInstall::locate(fs, config, context.base_dir.as_deref()) else {
        info!("no django installation found, nothing to contribute");
        return Ok(());
    };

    let mut emitter = Emitter::new(out);

    emit_settings(fs, &context, &install, &mut emitter)?;
    emit_queryset(fs, &install, &mut emitter)?;
    emit_template_libraries(fs, &context, &install, &mut emitter)?;

    emitter.finish().context("failed to write stream terminator")
}

/// Settings group. The builtin defaults file is scanned first so its doc
/// comments win over typically-undocumented project re-assignments;
/// project-only settings still contribute their own entries.
fn emit_settings<F: FileSystem, W: Write>(
    fs: &F,
    context: &ProjectContext,
    install: &DjangoInstall,
    emitter: &mut Emitter<W>,
) -> Result<()> {
    let mut files: Vec<PathBuf> = vec![install.global_settings()];
    files.extend(context.settings_files.iter().cloned());

    emitter.group(GROUP_SETTINGS)?;
    let mut seen = HashSet::new();
    for file in files {
        for setting in settings::scan_file(fs, &file, &mut seen) {
            emitter.word(&setting.name, &setting.doc)?;
        }
    }
    Ok(())
}

fn emit_queryset<F: FileSystem, W: Write>(
    fs: &F,
    install: &DjangoInstall,
    emitter: &mut Emitter<W>,
) -> Result<()> {
    emitter.group(GROUP_QUERYSET)?;
    for member in queryset::scan_file(fs, &install.queryset_source()) {
        match member {
            QuerySetMember::Method { signature, doc } => emitter.word(&signature, &doc)?,
            QuerySetMember::Attribute { name } => emitter.bare_word(&name)?,
        }
    }
    Ok(())
}

/// Tag and filter groups: the framework's builtin libraries first, then
/// every library the selected discovery strategy finds. One seen-set per
/// group spans all libraries, so the first-loaded registration wins.
fn emit_template_libraries<F: FileSystem, W: Write>(
    fs: &F,
    context: &ProjectContext,
    install: &DjangoInstall,
    emitter: &mut Emitter<W>,
) -> Result<()> {
    let mut seen_tags = HashSet::new();
    let mut seen_filters = HashSet::new();

    let default_tags = templatetags::scan_file(fs, "django.template.defaulttags", &install.default_tags());
    let default_filters =
        templatetags::scan_file(fs, "django.template.defaultfilters", &install.default_filters());

    // Both groups are always opened, even when empty
    emitter.group(GROUP_TAGS)?;
    if let Some(library) = &default_tags {
        emit_tags(emitter, library, &mut seen_tags)?;
    }
    emitter.group(GROUP_FILTERS)?;
    if let Some(library) = &default_filters {
        emit_filters(emitter, library, &mut seen_filters)?;
    }

    let discovery = select_discovery(fs, context, install);
    let libraries = discovery
        .as_deref()
        .map(|strategy| strategy.libraries())
        .unwrap_or_default();
    debug!(count = libraries.len(), "discovered template libraries");

    for library in &libraries {
        if !library.tags.is_empty() {
            emitter.group(GROUP_TAGS)?;
            emit_tags(emitter, library, &mut seen_tags)?;
        }
        if !library.filters.is_empty() {
            emitter.group(GROUP_FILTERS)?;
            emit_filters(emitter, library, &mut seen_filters)?;
        }
    }
    Ok(())
}

fn emit_tags<W: Write>(
    emitter: &mut Emitter<W>,
    library: &TemplateLibrary,
    seen: &mut HashSet<String>,
) -> Result<()> {
    for tag in &library.tags {
        if !seen.insert(tag.name.clone()) {
            continue;
        }
        emitter.word(&tag_word(&tag.name), &tag.doc)?;
    }
    Ok(())
}

fn emit_filters<W: Write>(
    emitter: &mut Emitter<W>,
    library: &TemplateLibrary,
    seen: &mut HashSet<String>,
) -> Result<()> {
    for filter in &library.filters {
        if !seen.insert(filter.name.clone()) {
            continue;
        }
        emitter.word(&filter_word(&filter.name), &filter.doc)?;
    }
    Ok(())
}
