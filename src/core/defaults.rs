//! Built-in defaults and the optional `shaderkit.json` override file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the directory scanned when no `--root` is given.
pub const SHADERS_DIR: &str = "shaders";

/// File inside the shader root that can override defaults.
pub const CONFIG_FILE: &str = "shaderkit.json";

/// Root configuration structure for shaderkit.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShaderkitConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via shaderkit.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Dot-prefixed, case-sensitive extension allow-list for the rewrite
    /// engine's file set.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![
        ".glsl".to_string(),
        ".fsh".to_string(),
        ".vsh".to_string(),
        ".csh".to_string(),
    ]
}

/// Load defaults for a shader root, merging `shaderkit.json` (if present
/// and valid) with built-ins. A missing or invalid config file silently
/// returns built-in defaults.
pub fn load_defaults(root: &Path) -> Defaults {
    load_config_from_file(root)
        .map(|c| c.defaults)
        .unwrap_or_default()
}

fn load_config_from_file(root: &Path) -> Option<ShaderkitConfig> {
    let path = root.join(CONFIG_FILE);
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
