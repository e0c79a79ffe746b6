//! Compiler configuration
//!
//! Every field has a default, so a partial JSON file only overrides what
//! it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Identifiers the generated program uses to reach the host runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Keywords {
    pub debug_build: String,
    pub context: String,
    pub uid: String,
    pub make_temp: String,
    pub get_temp: String,
    pub make_simple_call: String,
    pub make_nest_call: String,
    pub make_async_nest_call: String,
    pub start_run_function: String,
    pub debug_connector: String,
    pub debug_break: String,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            debug_build: "_DEBUG_BUILD".to_string(),
            context: "context".to_string(),
            uid: "uid".to_string(),
            make_temp: "makeTemp".to_string(),
            get_temp: "getTemp".to_string(),
            make_simple_call: "makeSimpleCall".to_string(),
            make_nest_call: "makeNestCall".to_string(),
            make_async_nest_call: "makeAsyncNestCall".to_string(),
            start_run_function: "startRunFunction".to_string(),
            debug_connector: "_DEBUG_CONNECTOR".to_string(),
            debug_break: "_DEBUG_BREAK".to_string(),
        }
    }
}

/// Graph compiler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerConfig {
    pub keywords: Keywords,
    /// Type guid of the entry node of `main` graphs
    pub main_entry_type: String,
    /// Type guid of the entry node of function-like graphs
    pub graph_entry_type: String,
    /// Helper fragment spliced after the debug flag
    pub helper_code: Option<String>,
    /// Helper fragment spliced in debug builds only
    pub debug_helper_code: Option<String>,
    /// Indentation of debug builds
    pub indent_width: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            keywords: Keywords::default(),
            main_entry_type: "core-script-entry".to_string(),
            graph_entry_type: "core-graph-entry".to_string(),
            helper_code: None,
            debug_helper_code: None,
            indent_width: 2,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CompilerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::debug!("Compiler configuration loaded from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CompilerConfig::from_json_str(
            r#"{ "mainEntryType": "entry", "keywords": { "context": "ctx" } }"#,
        )
        .unwrap();
        assert_eq!(config.main_entry_type, "entry");
        assert_eq!(config.keywords.context, "ctx");
        assert_eq!(config.keywords.make_temp, "makeTemp");
        assert_eq!(config.indent_width, 2);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "helperCode": "function h() {{}}", "indentWidth": 4 }}"#).unwrap();

        let config = CompilerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.helper_code.as_deref(), Some("function h() {}"));
        assert_eq!(config.indent_width, 4);
    }

    #[test]
    fn test_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompilerConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
