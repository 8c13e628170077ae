/*
 * editor.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * ProjectDescriptorEditor: appends StyleCop references to a project file.
 */

use crate::error::{EditorError, Result};
use crate::layout::PackageLayout;
use crate::probe::{FileProbe, NativeProbe};
use crate::resolve::{SupportingFile, ensure_package_dir, resolve};
use std::fmt;
use std::path::Path;
use stylecop_xml::{Namespace, WriteOptions, XmlDocument, XmlElement};

const INCLUDE_ATTRIBUTE: &str = "Include";
const ITEM_GROUP: &str = "ItemGroup";
const PROPERTY_GROUP: &str = "PropertyGroup";
const ANALYZER: &str = "Analyzer";
const ADDITIONAL_FILES: &str = "AdditionalFiles";
const CODE_ANALYSIS_RULE_SET: &str = "CodeAnalysisRuleSet";

/// Edits an MSBuild project descriptor in memory.
///
/// Every `reference_*` operation appends a new group as the last child of the
/// root element; existing groups are never merged or deduplicated, so calling
/// an operation twice yields two groups. A failed operation appends nothing,
/// but groups added by earlier successful calls stay in place.
///
/// # Example
///
/// ```ignore
/// use stylecop_project::{PackageLayout, ProjectDescriptorEditor};
///
/// let csproj = std::fs::read_to_string("Assembly-CSharp.csproj")?;
/// let mut editor = ProjectDescriptorEditor::new(&csproj, PackageLayout::default())?;
/// editor.reference_analyzer_assemblies()?;
/// editor.reference_rule_set()?;
/// editor.reference_rule_configuration()?;
/// std::fs::write("Assembly-CSharp.csproj", editor.to_document_string()?)?;
/// ```
#[derive(Debug)]
pub struct ProjectDescriptorEditor {
    document: XmlDocument,
    namespace: Namespace,
    layout: PackageLayout,
    probe: Box<dyn FileProbe>,
}

impl ProjectDescriptorEditor {
    /// Parse `xml` and check supporting files against the real filesystem.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Parse` if `xml` is not well-formed. A document
    /// without a root element is accepted; operations on it fail later with
    /// `EditorError::NoRootElement`.
    pub fn new(xml: &str, layout: PackageLayout) -> Result<Self> {
        Self::with_probe(xml, layout, NativeProbe)
    }

    /// Parse `xml`, using `probe` for every existence check.
    pub fn with_probe(
        xml: &str,
        layout: PackageLayout,
        probe: impl FileProbe + 'static,
    ) -> Result<Self> {
        let document = stylecop_xml::parse(xml)?;
        let namespace = document.root_namespace();

        if document.root.is_none() {
            tracing::debug!("Project document has no root element");
        }

        Ok(Self {
            document,
            namespace,
            layout,
            probe: Box::new(probe),
        })
    }

    /// Namespace of the root element; empty when there is no root.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// Append an `ItemGroup` with an `Analyzer` entry for the analyzer and
    /// code-fix assemblies.
    ///
    /// # Errors
    ///
    /// - `DirectoryNotFound` if the package directory is missing (checked first)
    /// - `NoRootElement` if the document has no root
    /// - `FileNotFound` if either assembly is missing from the package
    pub fn reference_analyzer_assemblies(&mut self) -> Result<()> {
        self.check_preconditions()?;

        let analyzer = resolve(
            self.probe.as_ref(),
            &self.layout,
            SupportingFile::AnalyzerAssembly,
        )?;
        let code_fixes = resolve(
            self.probe.as_ref(),
            &self.layout,
            SupportingFile::CodeFixAssembly,
        )?;

        let group = self
            .element(ITEM_GROUP)
            .with_child(self.include(ANALYZER, &analyzer))
            .with_child(self.include(ANALYZER, &code_fixes));

        self.append(group)
    }

    /// Append an `ItemGroup` with an `AdditionalFiles` entry for the JSON rule
    /// configuration.
    ///
    /// The settings directory copy wins over the packaged one.
    pub fn reference_rule_configuration(&mut self) -> Result<()> {
        self.check_preconditions()?;

        let rules = resolve(
            self.probe.as_ref(),
            &self.layout,
            SupportingFile::RuleConfiguration,
        )?;
        let group = self
            .element(ITEM_GROUP)
            .with_child(self.include(ADDITIONAL_FILES, &rules));

        self.append(group)
    }

    /// Append a `PropertyGroup` whose `CodeAnalysisRuleSet` text is the rule-set path.
    ///
    /// The settings directory copy wins over the packaged one.
    pub fn reference_rule_set(&mut self) -> Result<()> {
        self.check_preconditions()?;

        let rule_set = resolve(self.probe.as_ref(), &self.layout, SupportingFile::RuleSet)?;
        let group = self.element(PROPERTY_GROUP).with_child(
            self.element(CODE_ANALYSIS_RULE_SET)
                .with_text(path_text(&rule_set)),
        );

        self.append(group)
    }

    /// Run every operation: assemblies, rule set, then JSON rules.
    ///
    /// Stops at the first failure; groups appended before it remain.
    pub fn reference_all(&mut self) -> Result<()> {
        self.reference_analyzer_assemblies()?;
        self.reference_rule_set()?;
        self.reference_rule_configuration()
    }

    /// The document as it should be written to disk, XML declaration included.
    pub fn to_document_string(&self) -> Result<String> {
        stylecop_xml::document_to_string(&self.document, &WriteOptions::for_file())
            .map_err(EditorError::Serialize)
    }

    fn check_preconditions(&self) -> Result<()> {
        ensure_package_dir(self.probe.as_ref(), &self.layout)?;
        if self.document.root.is_none() {
            return Err(EditorError::NoRootElement);
        }
        Ok(())
    }

    fn element(&self, name: &str) -> XmlElement {
        XmlElement::in_namespace(name, &self.namespace)
    }

    fn include(&self, name: &str, path: &Path) -> XmlElement {
        self.element(name)
            .with_attribute(INCLUDE_ATTRIBUTE, path_text(path))
    }

    fn append(&mut self, group: XmlElement) -> Result<()> {
        let root = self
            .document
            .root
            .as_mut()
            .ok_or(EditorError::NoRootElement)?;

        tracing::debug!(
            group = %group.qualified_name(),
            entries = group.all_children().len(),
            "Appending group to project root"
        );
        root.append_child(group);
        Ok(())
    }
}

/// Indented XML without the declaration.
impl fmt::Display for ProjectDescriptorEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.document, f)
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
