use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::category_resolver::CategorySweep;

/// Top-level project configuration loaded from `.resmodel.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    pub input: String,
    /// Services to import; empty means every discovered service.
    pub services: Vec<String>,
    pub categories: CategoryConfig,
    pub naming: NamingConfig,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            services: Vec::new(),
            categories: CategoryConfig::default(),
            naming: NamingConfig::default(),
        }
    }
}

/// Category backfill options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub sweep: CategorySweep,
}

/// Entries added to the built-in naming tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Action verbs that keep a resource name verbatim as its operation name.
    pub verbs: Vec<String>,
    /// Namespace prefixes that mark a path segment as a cast.
    pub cast_prefixes: Vec<String>,
    /// Prefixes removed from schema titles to form model names.
    pub model_namespaces: Vec<String>,
    /// Literals that never start a collection.
    pub static_keywords: Vec<String>,
    pub odata_keywords: Vec<String>,
    /// Words with no distinct plural.
    pub uncountable: Vec<String>,
    /// Singular → plural pairs no suffix rule produces.
    pub irregular: BTreeMap<String, String>,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".resmodel.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ImporterConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: ImporterConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# resmodel configuration
input: openapi.yaml
services: []          # empty = every service found in the tags

categories:
  sweep: fixed_point  # single | fixed_point

naming:
  verbs: []           # extra action verbs, e.g. [escalate]
  cast_prefixes: []   # extra cast namespaces, e.g. [microsoft.graph.callRecords.]
  model_namespaces: []
  static_keywords: []
  odata_keywords: []
  uncountable: []
  irregular: {}       # singular: plural, e.g. {cactus: cacti}
"#
}
