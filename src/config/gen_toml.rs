//! gen.toml configuration parsing
//!
//! ```toml
//! [cmake]
//! generator = "Ninja"
//! jobs = 8
//!
//! [cmake.variables]
//! EZIO_ENABLE_SSL = "ON"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::GenError;

/// File name looked up at the project root
pub const CONFIG_FILE_NAME: &str = "gen.toml";

/// Root configuration from gen.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenConfig {
    /// CMake invocation defaults
    #[serde(default)]
    pub cmake: CMakeSection,
}

/// The `[cmake]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CMakeSection {
    /// Generator passed with `-G`
    pub generator: Option<String>,

    /// Parallel jobs for the build step
    pub jobs: Option<u32>,

    /// Extra `-D<name>=<value>` entries for the configuration step
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl GenConfig {
    /// Load gen.toml from the project root, falling back to defaults if absent
    pub fn load(project_root: &Path) -> Result<Self, GenError> {
        let path = project_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            GenError::config_error(&path, format!("failed to read file: {}", e), None)
        })?;

        let config = Self::parse(&content)
            .map_err(|e| GenError::config_error(&path, e.message().to_string(), Some(e)))?;

        if config.cmake.jobs == Some(0) {
            return Err(GenError::config_error(&path, "jobs must be at least 1", None));
        }
        if let Some(name) = config.cmake.variables.keys().find(|k| !is_cache_name(k)) {
            return Err(GenError::config_error(
                &path,
                format!("'{}' is not a valid CMake variable name", name),
                None,
            ));
        }

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// CMake cache names: letters, digits, `_`, `.`, `+`, `-`, and not empty
fn is_cache_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-'))
}
