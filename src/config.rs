use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;

/// Framework version stamped into the generated bundle
pub const FRAMEWORK_VERSION: &str = "1.0.0";

/// Default output locations
pub const DEFAULT_OUTPUT_DIR: &str = "dist";
pub const DEFAULT_OUTPUT_FILE: &str = "UIFramework.lua";
pub const DEFAULT_MINIFIED_FILE: &str = "UIFramework.min.lua";

/// One source module contributing to the bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    pub path: String,
}

impl ModuleEntry {
    pub fn new(name: &str, path: &str) -> Self {
        ModuleEntry {
            name: name.to_string(),
            path: path.to_string(),
        }
    }

    /// Component modules live under Components/ and get a different banner label
    pub fn is_component(&self) -> bool {
        self.path.contains("Components")
    }
}

/// Bundle configuration: output locations plus the hand-ordered module list.
///
/// Module order matters - dependencies (Theme, Icons, Utilities) must come
/// before the components that reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    #[serde(default = "default_output_dir", rename = "outputDir")]
    pub output_dir: String,
    #[serde(default = "default_output_file", rename = "outputFile")]
    pub output_file: String,
    #[serde(default = "default_minified_file", rename = "minifiedFile")]
    pub minified_file: String,
    #[serde(default = "default_modules")]
    pub modules: Vec<ModuleEntry>,
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_minified_file() -> String {
    DEFAULT_MINIFIED_FILE.to_string()
}

fn default_modules() -> Vec<ModuleEntry> {
    vec![
        ModuleEntry::new("Theme", "Theme.lua"),
        ModuleEntry::new("Icons", "Icons.lua"),
        ModuleEntry::new("Utilities", "Utilities.lua"),
        ModuleEntry::new("Label", "Components/Label.lua"),
        ModuleEntry::new("Input", "Components/Input.lua"),
        ModuleEntry::new("Button", "Components/Button.lua"),
        ModuleEntry::new("Toggle", "Components/Toggle.lua"),
        ModuleEntry::new("Slider", "Components/Slider.lua"),
        ModuleEntry::new("Checkbox", "Components/Checkbox.lua"),
        ModuleEntry::new("Dropdown", "Components/Dropdown.lua"),
        ModuleEntry::new("Tab", "Components/Tab.lua"),
        ModuleEntry::new("Container", "Components/Container.lua"),
    ]
}

impl Default for BundleConfig {
    fn default() -> Self {
        BundleConfig {
            output_dir: default_output_dir(),
            output_file: default_output_file(),
            minified_file: default_minified_file(),
            modules: default_modules(),
        }
    }
}

impl BundleConfig {
    /// Load config from a JSON file, falling back to defaults when it is absent.
    ///
    /// A present-but-malformed config is a hard error so a typo never silently
    /// builds the wrong bundle.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let config: BundleConfig = serde_json::from_str(&raw)?;
                info!(
                    path = %path.display(),
                    modules = config.modules.len(),
                    "Loaded bundle config"
                );
                Ok(config)
            }
            None => {
                let config = BundleConfig::default();
                warn!(
                    modules = config.modules.len(),
                    "No config file given, using built-in module list"
                );
                Ok(config)
            }
        }
    }

    /// Absolute path of the standalone output file
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir).join(&self.output_file)
    }

    /// Absolute path of the minified output file
    pub fn minified_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir).join(&self.minified_file)
    }

    /// Absolute paths of every source module, in bundle order
    pub fn module_source_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.modules.iter().map(|m| root.join(&m.path)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_module_order() {
        let config = BundleConfig::default();
        let names: Vec<&str> = config.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Theme", "Icons", "Utilities", "Label", "Input", "Button", "Toggle", "Slider",
                "Checkbox", "Dropdown", "Tab", "Container"
            ]
        );
    }

    #[test]
    fn test_dependencies_come_before_components() {
        let config = BundleConfig::default();
        let first_component = config
            .modules
            .iter()
            .position(|m| m.is_component())
            .unwrap();
        // Theme, Icons, Utilities are all before the first component
        assert_eq!(first_component, 3);
    }

    #[test]
    fn test_is_component() {
        assert!(ModuleEntry::new("Button", "Components/Button.lua").is_component());
        assert!(!ModuleEntry::new("Theme", "Theme.lua").is_component());
    }

    #[test]
    fn test_output_paths() {
        let config = BundleConfig::default();
        let root = Path::new("/project");
        assert_eq!(
            config.output_path(root),
            PathBuf::from("/project/dist/UIFramework.lua")
        );
        assert_eq!(
            config.minified_path(root),
            PathBuf::from("/project/dist/UIFramework.min.lua")
        );
    }

    #[test]
    fn test_deserialize_partial_config_uses_defaults() {
        let json = r#"{ "outputFile": "Custom.lua" }"#;
        let config: BundleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output_file, "Custom.lua");
        assert_eq!(config.output_dir, "dist");
        assert_eq!(config.modules.len(), 12);
    }

    #[test]
    fn test_deserialize_custom_modules() {
        let json = r#"{
            "outputDir": "out",
            "modules": [
                { "name": "Core", "path": "Core.lua" },
                { "name": "Panel", "path": "Components/Panel.lua" }
            ]
        }"#;
        let config: BundleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.modules.len(), 2);
        assert!(config.modules[1].is_component());
    }

    #[test]
    fn test_load_missing_config_falls_back_to_default() {
        let config = BundleConfig::load(None).unwrap();
        assert_eq!(config.output_file, DEFAULT_OUTPUT_FILE);
    }

    #[test]
    fn test_load_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(BundleConfig::load(Some(&path)).is_err());
    }
}
