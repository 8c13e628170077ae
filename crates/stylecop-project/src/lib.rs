/*
 * stylecop-project
 * Copyright (c) 2025 Posit, PBC
 *
 * Injects StyleCop analyzer references into MSBuild project descriptors.
 *
 * Given the text of a `.csproj` file, [`ProjectDescriptorEditor`] appends:
 *
 * - an `ItemGroup` of `Analyzer` entries for the analyzer and code-fix
 *   assemblies shipped in the package directory,
 * - an `ItemGroup` with an `AdditionalFiles` entry for `stylecop.json`,
 * - a `PropertyGroup` with a `CodeAnalysisRuleSet` path for `stylecop.ruleset`.
 *
 * Configuration files are looked up in the project settings directory first
 * and in the package directory second. All locations come from a
 * [`PackageLayout`], which defaults to the Unity package layout
 * (`./Packages/com.air.stylecop`, `./ProjectSettings`).
 *
 * The crate never writes files: callers serialize the edited document and
 * persist it themselves.
 *
 * # Usage
 *
 * ```ignore
 * use stylecop_project::{PackageLayout, ProjectDescriptorEditor};
 *
 * let layout = PackageLayout::rooted_at(project_root);
 * let mut editor = ProjectDescriptorEditor::new(&csproj, layout)?;
 * editor.reference_all()?;
 * let output = editor.to_document_string()?;
 * ```
 */

mod editor;
mod error;
mod layout;
mod probe;
mod resolve;

pub use editor::ProjectDescriptorEditor;
pub use error::{EditorError, Result};
pub use layout::{
    ANALYZER_ASSEMBLY, CODE_FIX_ASSEMBLY, DEFAULT_PACKAGE_DIR, DEFAULT_SETTINGS_DIR,
    PackageLayout, RULE_CONFIGURATION_FILE, RULE_SET_FILE,
};
pub use probe::{FileProbe, NativeProbe, PathKind};
pub use resolve::{SupportingFile, ensure_package_dir, resolve};

// Re-export the document model for callers that inspect the result
pub use stylecop_xml::{Namespace, XmlDocument, XmlElement};
