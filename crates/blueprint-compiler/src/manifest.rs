//! Declarative compile settings
//!
//! Node types whose compile strategy needs no custom generator (source
//! bodies and binary operators) can be described in JSON and turned into a
//! [`CompileSettingsRegistry`]. Generator-backed types are registered in
//! code and merged on top.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::BinaryOperator;
use crate::config::ConfigError;
use crate::settings::{CompileSettingsRegistry, FunctionBody, NodeCompileSettings};

/// Compile strategy of one node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ManifestEntry {
    SimpleCall { source: String },
    ContextNode {
        #[serde(default)]
        source: Option<String>,
    },
    Operator { op: BinaryOperator },
}

impl ManifestEntry {
    fn to_settings(&self) -> NodeCompileSettings {
        match self {
            Self::SimpleCall { source } => NodeCompileSettings::simple_call(FunctionBody::source(source.clone())),
            Self::ContextNode { source } => {
                NodeCompileSettings::context_node(source.clone().map(FunctionBody::Source))
            }
            Self::Operator { op } => NodeCompileSettings::operator(*op),
        }
    }
}

/// Node type guid to compile strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsManifest {
    pub nodes: BTreeMap<String, ManifestEntry>,
}

impl SettingsManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_registry(&self) -> CompileSettingsRegistry {
        let mut registry = CompileSettingsRegistry::new();
        for (type_guid, entry) in &self.nodes {
            registry.register(type_guid.clone(), entry.to_settings());
        }
        registry
    }
}
