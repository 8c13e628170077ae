/*
 * editor_integration.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for ProjectDescriptorEditor against a real filesystem.
 */

//! These tests lay out a Unity-style project in a temporary directory and run
//! the editor against it with the native probe.

use std::fs;
use std::path::{Path, PathBuf};
use stylecop_project::{EditorError, PackageLayout, ProjectDescriptorEditor};
use tempfile::TempDir;

const MSBUILD_NS: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

const CSPROJ: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" DefaultTargets="Build" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <LangVersion>9.0</LangVersion>
    <OutputType>Library</OutputType>
  </PropertyGroup>
  <ItemGroup>
    <Compile Include="Assets\Scripts\Player.cs" />
  </ItemGroup>
</Project>"#;

/// A project root with an (initially empty) package and settings directory.
struct Fixture {
    _temp: TempDir,
    layout: PackageLayout,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let layout = PackageLayout::rooted_at(temp.path());
        fs::create_dir_all(&layout.package_dir).expect("Failed to create package dir");
        fs::create_dir_all(&layout.settings_dir).expect("Failed to create settings dir");
        Self {
            _temp: temp,
            layout,
        }
    }

    /// A project root where the package directory was never installed.
    fn without_package() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let layout = PackageLayout::rooted_at(temp.path());
        Self {
            _temp: temp,
            layout,
        }
    }

    fn package_file(&self, name: &str) -> PathBuf {
        let path = self.layout.package_dir.join(name);
        fs::write(&path, b"").expect("Failed to write package file");
        path
    }

    fn settings_file(&self, name: &str) -> PathBuf {
        let path = self.layout.settings_dir.join(name);
        fs::write(&path, b"").expect("Failed to write settings file");
        path
    }

    fn full_package(self) -> Self {
        self.package_file("StyleCop.Analyzers.dll");
        self.package_file("StyleCop.Analyzers.CodeFixes.dll");
        self.package_file("stylecop.json");
        self.package_file("stylecop.ruleset");
        self
    }

    fn editor(&self, xml: &str) -> ProjectDescriptorEditor {
        ProjectDescriptorEditor::new(xml, self.layout.clone()).expect("Failed to parse project")
    }
}

fn text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn construction_preserves_root_namespace() {
    let fixture = Fixture::new();
    let editor = fixture.editor(CSPROJ);

    assert_eq!(editor.namespace().uri, MSBUILD_NS);
    assert_eq!(editor.namespace().prefix, None);
}

#[test]
fn construction_without_root_has_empty_namespace() {
    let fixture = Fixture::new();
    let editor = fixture.editor("<?xml version=\"1.0\"?>");

    assert!(editor.namespace().is_empty());
    assert!(editor.document().root.is_none());
}

#[test]
fn construction_rejects_malformed_xml() {
    let fixture = Fixture::new();
    let result = ProjectDescriptorEditor::new("<Project><ItemGroup></Project>", fixture.layout);

    assert!(matches!(result, Err(EditorError::Parse(_))));
}

#[test]
fn analyzer_assemblies_are_referenced_by_absolute_path() {
    let fixture = Fixture::new().full_package();
    let analyzer = fixture.layout.package_dir.join("StyleCop.Analyzers.dll");
    let code_fixes = fixture
        .layout
        .package_dir
        .join("StyleCop.Analyzers.CodeFixes.dll");

    let mut editor = fixture.editor(CSPROJ);
    editor.reference_analyzer_assemblies().unwrap();

    let root = editor.document().root.as_ref().unwrap();
    let groups = root.get_children("ItemGroup");
    assert_eq!(groups.len(), 2, "existing group plus the new one");

    let added = groups[1];
    let includes: Vec<&str> = added
        .get_children("Analyzer")
        .iter()
        .filter_map(|e| e.get_attribute("Include"))
        .collect();
    assert_eq!(includes, vec![text(&analyzer), text(&code_fixes)]);
    assert!(includes.iter().all(|p| Path::new(p).is_absolute()));
}

#[test]
fn missing_analyzer_assembly_fails_even_with_code_fixes_present() {
    let fixture = Fixture::new();
    fixture.package_file("StyleCop.Analyzers.CodeFixes.dll");
    let expected = fixture.layout.package_dir.join("StyleCop.Analyzers.dll");

    let mut editor = fixture.editor(CSPROJ);
    let err = editor.reference_analyzer_assemblies().unwrap_err();

    match err {
        EditorError::FileNotFound(path) => assert_eq!(path, expected),
        other => panic!("expected FileNotFound, got {:?}", other),
    }
    assert_eq!(count(&editor.to_string(), "<Analyzer"), 0);
}

#[test]
fn rule_configuration_prefers_project_settings() {
    let fixture = Fixture::new().full_package();
    let settings = fixture.settings_file("stylecop.json");

    let mut editor = fixture.editor(CSPROJ);
    editor.reference_rule_configuration().unwrap();

    let output = editor.to_string();
    assert!(
        output.contains(&format!(r#"<AdditionalFiles Include="{}"/>"#, text(&settings))),
        "{}",
        output
    );
}

#[test]
fn rule_configuration_falls_back_to_package() {
    let fixture = Fixture::new().full_package();
    let packaged = fixture.layout.package_dir.join("stylecop.json");

    let mut editor = fixture.editor(CSPROJ);
    editor.reference_rule_configuration().unwrap();

    let root = editor.document().root.as_ref().unwrap();
    let group = root.last_child().unwrap();
    assert_eq!(group.name, "ItemGroup");
    let entry = group.get_children("AdditionalFiles")[0];
    assert_eq!(entry.get_attribute("Include"), Some(text(&packaged).as_str()));
}

#[test]
fn rule_configuration_uses_settings_without_package_copy() {
    let fixture = Fixture::new();
    let settings = fixture.settings_file("stylecop.json");

    let mut editor = fixture.editor(CSPROJ);
    editor.reference_rule_configuration().unwrap();

    assert!(editor.to_string().contains(&text(&settings)));
}

#[test]
fn rule_configuration_missing_everywhere() {
    let fixture = Fixture::new();
    let expected = fixture.layout.package_dir.join("stylecop.json");

    let mut editor = fixture.editor(CSPROJ);
    let err = editor.reference_rule_configuration().unwrap_err();

    assert!(
        matches!(&err, EditorError::FileNotFound(p) if *p == expected),
        "got {:?}",
        err
    );
}

#[test]
fn rule_set_is_written_as_property_text() {
    let fixture = Fixture::new().full_package();
    let settings = fixture.settings_file("stylecop.ruleset");

    let mut editor = fixture.editor(CSPROJ);
    editor.reference_rule_set().unwrap();

    let root = editor.document().root.as_ref().unwrap();
    let group = root.last_child().unwrap();
    assert_eq!(group.name, "PropertyGroup");

    let rule_set = group.get_children("CodeAnalysisRuleSet")[0];
    assert_eq!(rule_set.text(), Some(text(&settings).as_str()));
    assert!(rule_set.attributes.is_empty());
}

#[test]
fn rule_set_falls_back_and_fails_like_rule_configuration() {
    let fixture = Fixture::new();
    let packaged = fixture.package_file("stylecop.ruleset");

    let mut editor = fixture.editor(CSPROJ);
    editor.reference_rule_set().unwrap();
    assert!(editor.to_string().contains(&format!(
        "<CodeAnalysisRuleSet>{}</CodeAnalysisRuleSet>",
        text(&packaged)
    )));

    fs::remove_file(&packaged).unwrap();
    assert!(matches!(
        editor.reference_rule_set(),
        Err(EditorError::FileNotFound(_))
    ));
}

#[test]
fn operations_are_not_deduplicated() {
    let fixture = Fixture::new().full_package();
    let mut editor = fixture.editor(CSPROJ);

    editor.reference_analyzer_assemblies().unwrap();
    editor.reference_analyzer_assemblies().unwrap();
    editor.reference_rule_configuration().unwrap();
    editor.reference_rule_configuration().unwrap();
    editor.reference_rule_set().unwrap();
    editor.reference_rule_set().unwrap();

    let output = editor.to_string();
    assert_eq!(count(&output, "<Analyzer "), 4);
    assert_eq!(count(&output, "<AdditionalFiles "), 2);
    assert_eq!(count(&output, "<CodeAnalysisRuleSet>"), 2);
    // 1 existing + 2 analyzer + 2 rule configuration
    assert_eq!(count(&output, "<ItemGroup>"), 5);
}

#[test]
fn serialization_without_operations_keeps_document() {
    let fixture = Fixture::new();
    let editor = fixture.editor(CSPROJ);

    let reparsed = stylecop_xml::parse(&editor.to_document_string().unwrap()).unwrap();
    assert_eq!(&reparsed, editor.document());
    assert_eq!(reparsed, stylecop_xml::parse(CSPROJ).unwrap());

    // Serializing twice gives the same text
    assert_eq!(editor.to_string(), editor.to_string());
    assert!(
        editor
            .to_document_string()
            .unwrap()
            .starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#)
    );
}

#[test]
fn missing_package_directory_fails_every_operation() {
    let fixture = Fixture::without_package();
    // Settings files exist but must never be consulted
    fs::create_dir_all(&fixture.layout.settings_dir).unwrap();
    fixture.settings_file("stylecop.json");
    fixture.settings_file("stylecop.ruleset");
    let expected = fixture.layout.package_dir.clone();

    let mut editor = fixture.editor(CSPROJ);

    for result in [
        editor.reference_analyzer_assemblies(),
        editor.reference_rule_configuration(),
        editor.reference_rule_set(),
    ] {
        match result {
            Err(EditorError::DirectoryNotFound(path)) => assert_eq!(path, expected),
            other => panic!("expected DirectoryNotFound, got {:?}", other),
        }
    }
    assert_eq!(editor.to_string(), fixture.editor(CSPROJ).to_string());
}

#[test]
fn earlier_groups_survive_a_later_failure() {
    let fixture = Fixture::new();
    fixture.package_file("StyleCop.Analyzers.dll");
    fixture.package_file("StyleCop.Analyzers.CodeFixes.dll");

    let mut editor = fixture.editor(CSPROJ);
    editor.reference_analyzer_assemblies().unwrap();
    assert!(editor.reference_rule_set().is_err());

    assert_eq!(count(&editor.to_string(), "<Analyzer "), 2);
}
