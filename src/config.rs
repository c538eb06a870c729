//! Compiler configuration.
//!
//! Loaded from TOML, e.g.:
//!
//! ```toml
//! discrimination = "strict"
//! limit_depth = 8
//! limit_complexity = 200
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::Result;

/// How the default `is_type_of` treats values that are not container
/// instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discrimination {
    /// Accept any value that is not an instance of some other container type.
    #[default]
    Permissive,
    /// Only accept instances of the object's own container type.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Default discriminator policy for objects without a custom one.
    pub discrimination: Discrimination,
    /// Maximum query depth enforced by the engine.
    pub limit_depth: Option<usize>,
    /// Maximum query complexity enforced by the engine.
    pub limit_complexity: Option<usize>,
    /// Whether the engine answers introspection queries.
    pub introspection: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            discrimination: Discrimination::Permissive,
            limit_depth: None,
            limit_complexity: None,
            introspection: true,
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "loading compiler config");
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_discrimination(mut self, discrimination: Discrimination) -> Self {
        self.discrimination = discrimination;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn test_defaults_when_empty() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.discrimination, Discrimination::Permissive);
        assert!(config.introspection);
    }

    #[test]
    fn test_parse_all_keys() {
        let config = CompilerConfig::from_toml_str(
            r#"
discrimination = "strict"
limit_depth = 5
limit_complexity = 100
introspection = false
"#,
        )
        .unwrap();

        assert_eq!(config.discrimination, Discrimination::Strict);
        assert_eq!(config.limit_depth, Some(5));
        assert_eq!(config.limit_complexity, Some(100));
        assert!(!config.introspection);
    }

    #[test]
    fn test_unknown_mode_is_config_error() {
        let err = CompilerConfig::from_toml_str(r#"discrimination = "loose""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limit_depth = 3").unwrap();

        let config = CompilerConfig::load(file.path()).unwrap();
        assert_eq!(config.limit_depth, Some(3));
        assert_eq!(config.discrimination, Discrimination::Permissive);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CompilerConfig::load(Path::new("/nonexistent/typegraph.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
