/*
 * layout.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Where the StyleCop package and its supporting files live.
 */

use crate::error::{EditorError, Result};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Package directory, relative to the project root.
pub const DEFAULT_PACKAGE_DIR: &str = "./Packages/com.air.stylecop";

/// Project-local settings directory, relative to the project root.
pub const DEFAULT_SETTINGS_DIR: &str = "./ProjectSettings";

pub const ANALYZER_ASSEMBLY: &str = "StyleCop.Analyzers.dll";
pub const CODE_FIX_ASSEMBLY: &str = "StyleCop.Analyzers.CodeFixes.dll";
pub const RULE_CONFIGURATION_FILE: &str = "stylecop.json";
pub const RULE_SET_FILE: &str = "stylecop.ruleset";

/// Locations of the analysis tool's files.
///
/// The defaults describe a Unity project with the package installed under
/// `Packages/com.air.stylecop` and overrides under `ProjectSettings`. Relative
/// paths are interpreted against the current directory when they are
/// resolved; use [`PackageLayout::rooted_at`] to anchor them elsewhere.
///
/// A layout can be read from TOML; every key is optional:
///
/// ```toml
/// package-dir = "Packages/com.air.stylecop"
/// settings-dir = "ProjectSettings"
/// rule-set = "team.ruleset"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackageLayout {
    /// Directory holding the assemblies and default configuration files
    pub package_dir: PathBuf,

    /// Directory searched first for configuration files
    pub settings_dir: PathBuf,

    pub analyzer_assembly: String,
    pub code_fix_assembly: String,
    pub rule_configuration: String,
    pub rule_set: String,
}

impl Default for PackageLayout {
    fn default() -> Self {
        Self {
            package_dir: PathBuf::from(DEFAULT_PACKAGE_DIR),
            settings_dir: PathBuf::from(DEFAULT_SETTINGS_DIR),
            analyzer_assembly: ANALYZER_ASSEMBLY.to_string(),
            code_fix_assembly: CODE_FIX_ASSEMBLY.to_string(),
            rule_configuration: RULE_CONFIGURATION_FILE.to_string(),
            rule_set: RULE_SET_FILE.to_string(),
        }
    }
}

impl PackageLayout {
    /// The default layout anchored at `root` instead of the current directory.
    pub fn rooted_at(root: &Path) -> Self {
        Self::default().rebase(root)
    }

    /// Anchor relative directories at `root`. Absolute directories are kept.
    pub fn rebase(self, root: &Path) -> Self {
        Self {
            package_dir: join_relative(root, &self.package_dir),
            settings_dir: join_relative(root, &self.settings_dir),
            ..self
        }
    }

    /// Parse a layout from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| EditorError::Config(err.to_string()))
    }

    /// Read a layout file.
    ///
    /// Relative directories in the file are anchored at `root`.
    pub fn load(path: &Path, root: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| EditorError::Config(format!("{}: {}", path.display(), err)))?;
        let layout = Self::from_toml_str(&content)?;

        tracing::debug!(path = %path.display(), "Loaded package layout");
        Ok(layout.rebase(root))
    }
}

/// `root.join(path)` with leading `./` components dropped.
fn join_relative(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    root.join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = PackageLayout::default();
        assert_eq!(layout.package_dir, Path::new("./Packages/com.air.stylecop"));
        assert_eq!(layout.settings_dir, Path::new("./ProjectSettings"));
        assert_eq!(layout.analyzer_assembly, "StyleCop.Analyzers.dll");
        assert_eq!(layout.code_fix_assembly, "StyleCop.Analyzers.CodeFixes.dll");
        assert_eq!(layout.rule_configuration, "stylecop.json");
        assert_eq!(layout.rule_set, "stylecop.ruleset");
    }

    #[test]
    fn test_rooted_at_drops_current_dir_components() {
        let layout = PackageLayout::rooted_at(Path::new("/work/game"));
        assert_eq!(
            layout.package_dir,
            PathBuf::from("/work/game/Packages/com.air.stylecop")
        );
        assert_eq!(layout.settings_dir, PathBuf::from("/work/game/ProjectSettings"));
    }

    #[test]
    fn test_rebase_keeps_absolute_dirs() {
        let layout = PackageLayout {
            package_dir: PathBuf::from("/opt/stylecop"),
            ..PackageLayout::default()
        }
        .rebase(Path::new("/work/game"));

        assert_eq!(layout.package_dir, PathBuf::from("/opt/stylecop"));
        assert_eq!(layout.settings_dir, PathBuf::from("/work/game/ProjectSettings"));
    }

    #[test]
    fn test_toml_overrides_only_given_keys() {
        let layout = PackageLayout::from_toml_str(
            r#"
package-dir = "Vendor/StyleCop"
rule-set = "team.ruleset"
"#,
        )
        .unwrap();

        assert_eq!(layout.package_dir, PathBuf::from("Vendor/StyleCop"));
        assert_eq!(layout.rule_set, "team.ruleset");
        assert_eq!(layout.settings_dir, Path::new(DEFAULT_SETTINGS_DIR));
        assert_eq!(layout.rule_configuration, RULE_CONFIGURATION_FILE);
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        let result = PackageLayout::from_toml_str("packages = \"x\"");
        assert!(matches!(result, Err(EditorError::Config(_))));
    }

    #[test]
    fn test_load_anchors_relative_dirs() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = temp.path().join("stylecop-layout.toml");
        std::fs::write(&config, "settings-dir = \"Config\"\n").unwrap();

        let layout = PackageLayout::load(&config, temp.path()).unwrap();
        assert_eq!(layout.settings_dir, temp.path().join("Config"));
        assert_eq!(
            layout.package_dir,
            temp.path().join("Packages").join("com.air.stylecop")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = PackageLayout::load(&temp.path().join("missing.toml"), temp.path());
        assert!(matches!(result, Err(EditorError::Config(_))));
    }
}
