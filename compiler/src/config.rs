use std::{fs, path::Path};
use indexmap::IndexMap;
use serde::Deserialize;
use crate::error::AstProtoError;

/// Knobs for the TypeScript generator. Missing keys in a config file keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Module holding the protobuf-generated message types.
    pub proto_import:     String,
    pub match_import:     String,
    pub intercept_import: String,
    /// Suffix marking node types; stripped to form node tags.
    pub node_suffix:      String,
    /// Joins ancestor names into a qualified message name.
    pub path_separator:   String,
    /// Qualified names whose encoder accepts a missing node and matches `"null"`.
    pub nullable_nodes:   Vec<String>,
    /// Qualified name -> guard expression replacing the node tag.
    pub fixed_guards:     IndexMap<String, String>,
    /// Qualified names whose field oneofs switch on the property's `typeof`.
    pub typeof_oneof_nodes: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let mut fixed_guards = IndexMap::new();
        fixed_guards.insert("LiteralNode_RegEx".to_string(), "\"undefined\"".to_string());

        GeneratorConfig {
            proto_import:       "generated/ecmascript2022".to_string(),
            match_import:       "helpers/matchEncoding".to_string(),
            intercept_import:   "helpers/interceptEnumError".to_string(),
            node_suffix:        "Node".to_string(),
            path_separator:     "_".to_string(),
            nullable_nodes:     vec!["ArrayPatternNode_Element".to_string()],
            fixed_guards,
            typeof_oneof_nodes: vec!["LiteralNode".to_string()],
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(text: &str) -> Result<Self, AstProtoError> {
        let config: GeneratorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AstProtoError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), AstProtoError> {
        if self.node_suffix.is_empty() {
            return Err(AstProtoError::ConfigError("node_suffix must not be empty".to_string()));
        }
        if self.path_separator.is_empty() {
            return Err(AstProtoError::ConfigError("path_separator must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn is_nullable(&self, qualified: &str) -> bool {
        self.nullable_nodes.iter().any(|n| n == qualified)
    }

    pub fn fixed_guard(&self, qualified: &str) -> Option<&str> {
        self.fixed_guards.get(qualified).map(String::as_str)
    }

    pub fn switches_on_typeof(&self, qualified: &str) -> bool {
        self.typeof_oneof_nodes.iter().any(|n| n == qualified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = GeneratorConfig::from_json(r#"{ "proto_import": "gen/es5" }"#).unwrap();
        assert_eq!(config.proto_import, "gen/es5");
        assert_eq!(config.node_suffix, "Node");
        assert!(config.is_nullable("ArrayPatternNode_Element"));
        assert_eq!(config.fixed_guard("LiteralNode_RegEx"), Some("\"undefined\""));
    }

    #[test]
    fn test_rejects_empty_suffix() {
        let err = GeneratorConfig::from_json(r#"{ "node_suffix": "" }"#).unwrap_err();
        assert!(matches!(err, AstProtoError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = GeneratorConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, AstProtoError::Json(_)));
    }
}
