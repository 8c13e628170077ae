/*
 * inject.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reads a project file, applies the StyleCop operations and writes it back.
 */

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use stylecop_project::{PackageLayout, ProjectDescriptorEditor};
use tracing::{debug, info};

/// What to inject and where to find it.
#[derive(Debug, Clone, Default)]
pub struct InjectOptions {
    pub project: PathBuf,
    pub project_root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub skip_analyzers: bool,
    pub skip_rule_set: bool,
    pub skip_rules: bool,
}

/// Where the edited project goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

/// Edit the project file and return the new document text.
///
/// Operations run in the order analyzers, rule set, JSON rules. The input
/// file is never modified here.
pub fn run(options: &InjectOptions) -> Result<String> {
    let root = options
        .project_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let layout = match &options.config {
        Some(config) => PackageLayout::load(config, &root)
            .with_context(|| format!("Failed to load layout from {}", config.display()))?,
        None => PackageLayout::rooted_at(&root),
    };
    debug!(
        package_dir = %layout.package_dir.display(),
        settings_dir = %layout.settings_dir.display(),
        "Using package layout"
    );

    let xml = std::fs::read_to_string(&options.project)
        .with_context(|| format!("Failed to read {}", options.project.display()))?;
    let mut editor = ProjectDescriptorEditor::new(&xml, layout)
        .with_context(|| format!("Failed to load {}", options.project.display()))?;

    if !options.skip_analyzers {
        editor
            .reference_analyzer_assemblies()
            .context("Failed to reference analyzer assemblies")?;
    }
    if !options.skip_rule_set {
        editor
            .reference_rule_set()
            .context("Failed to reference rule set")?;
    }
    if !options.skip_rules {
        editor
            .reference_rule_configuration()
            .context("Failed to reference rule configuration")?;
    }

    info!(project = %options.project.display(), "Injected StyleCop references");
    Ok(editor.to_document_string()?)
}

/// Write `text` to its destination.
pub fn write_output(text: &str, destination: &Destination) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
        Destination::File(path) => write_file(path, text),
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote project file");
    Ok(())
}
