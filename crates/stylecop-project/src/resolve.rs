/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Locating the supporting files a project descriptor references.
 */

use crate::error::{EditorError, Result};
use crate::layout::PackageLayout;
use crate::probe::FileProbe;
use std::path::{Path, PathBuf};

/// A file the editor references from the project descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportingFile {
    /// The analyzer assembly (`StyleCop.Analyzers.dll`)
    AnalyzerAssembly,
    /// The code-fix assembly (`StyleCop.Analyzers.CodeFixes.dll`)
    CodeFixAssembly,
    /// JSON rule configuration (`stylecop.json`)
    RuleConfiguration,
    /// Rule-set file (`stylecop.ruleset`)
    RuleSet,
}

impl SupportingFile {
    /// The file name configured for this file in `layout`.
    pub fn file_name<'a>(&self, layout: &'a PackageLayout) -> &'a str {
        match self {
            SupportingFile::AnalyzerAssembly => &layout.analyzer_assembly,
            SupportingFile::CodeFixAssembly => &layout.code_fix_assembly,
            SupportingFile::RuleConfiguration => &layout.rule_configuration,
            SupportingFile::RuleSet => &layout.rule_set,
        }
    }

    /// Whether a project may override the packaged copy from its settings
    /// directory. Assemblies always come from the package.
    pub fn has_project_override(&self) -> bool {
        matches!(
            self,
            SupportingFile::RuleConfiguration | SupportingFile::RuleSet
        )
    }

    /// Candidate locations, in search order.
    pub fn candidates(&self, layout: &PackageLayout) -> Vec<PathBuf> {
        let file_name = self.file_name(layout);
        let mut candidates = Vec::with_capacity(2);
        if self.has_project_override() {
            candidates.push(layout.settings_dir.join(file_name));
        }
        candidates.push(layout.package_dir.join(file_name));
        candidates
    }
}

/// Fail with [`EditorError::DirectoryNotFound`] unless the package directory exists.
pub fn ensure_package_dir(probe: &dyn FileProbe, layout: &PackageLayout) -> Result<()> {
    let dir = &layout.package_dir;
    if checked(probe.is_dir(dir), dir)? {
        return Ok(());
    }

    tracing::debug!(dir = %dir.display(), "Package directory is missing");
    Err(EditorError::DirectoryNotFound(absolute(probe, dir)?))
}

/// Find the first existing candidate for `file` and return its absolute path.
///
/// When no candidate exists the error names the last location searched,
/// which is always the package directory.
pub fn resolve(
    probe: &dyn FileProbe,
    layout: &PackageLayout,
    file: SupportingFile,
) -> Result<PathBuf> {
    let mut searched = None;

    for candidate in file.candidates(layout) {
        if checked(probe.is_file(&candidate), &candidate)? {
            let path = absolute(probe, &candidate)?;
            tracing::debug!(file = ?file, path = %path.display(), "Resolved supporting file");
            return Ok(path);
        }
        tracing::debug!(file = ?file, candidate = %candidate.display(), "Candidate not found");
        searched = Some(candidate);
    }

    let missing = searched.unwrap_or_else(|| layout.package_dir.join(file.file_name(layout)));
    Err(EditorError::FileNotFound(absolute(probe, &missing)?))
}

fn checked(result: std::io::Result<bool>, path: &Path) -> Result<bool> {
    result.map_err(|source| EditorError::Probe {
        path: path.to_path_buf(),
        source,
    })
}

fn absolute(probe: &dyn FileProbe, path: &Path) -> Result<PathBuf> {
    probe.absolute(path).map_err(|source| EditorError::Probe {
        path: path.to_path_buf(),
        source,
    })
}
