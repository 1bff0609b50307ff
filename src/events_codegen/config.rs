// Generator configuration and project documents
//
// A project document describes a whole generation pass in one TOML file:
// generator settings, the metadata registry, both object containers, the
// external events links can refer to, and the events themselves.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::events_codegen::error::CodeGenError;
use crate::events_codegen::event::Event;
use crate::events_codegen::metadata::MetadataRegistry;
use crate::events_codegen::objects::ObjectsContainer;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Values of `yesorno` parameters meaning yes
    pub yes_aliases: Vec<String>,
    /// Values of `trueorfalse` parameters meaning true
    pub true_aliases: Vec<String>,
    /// Links followed from inside linked events before giving up
    pub max_link_depth: usize,
    /// Put the sub-events of an event in a block of their own
    pub sub_events_in_scope: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            yes_aliases: vec!["yes".to_string(), "oui".to_string()],
            true_aliases: vec!["True".to_string(), "Vrai".to_string()],
            max_link_depth: 16,
            sub_events_in_scope: true,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), CodeGenError> {
        // An empty alias would turn every missing boolean parameter on
        if self.yes_aliases.iter().any(String::is_empty) {
            return Err(CodeGenError::ConfigError(
                "yes_aliases must not contain an empty value".to_string(),
            ));
        }
        if self.true_aliases.iter().any(String::is_empty) {
            return Err(CodeGenError::ConfigError(
                "true_aliases must not contain an empty value".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDocument {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub metadata: MetadataRegistry,
    #[serde(default)]
    pub global_objects: ObjectsContainer,
    #[serde(default)]
    pub layout_objects: ObjectsContainer,
    /// Events that link events pull in, by name
    #[serde(default)]
    pub external_events: IndexMap<String, Vec<Event>>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl ProjectDocument {
    pub fn from_toml_str(source: &str) -> Result<Self, CodeGenError> {
        let document: ProjectDocument = toml::from_str(source)?;
        document.generator.validate()?;
        log::debug!(
            "Loaded project: {} events, {} conditions, {} actions",
            document.events.len(),
            document.metadata.conditions.len(),
            document.metadata.actions.len()
        );
        Ok(document)
    }

    pub fn from_file(path: &Path) -> Result<Self, CodeGenError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events_codegen::event::EventKind;
    use test_log::test;

    #[test]
    fn test_defaults_apply_to_missing_keys() {
        let document = ProjectDocument::from_toml_str(
            r#"
            [generator]
            max_link_depth = 4
            "#,
        )
        .unwrap();

        assert_eq!(document.generator.max_link_depth, 4);
        assert_eq!(document.generator.yes_aliases, vec!["yes", "oui"]);
        assert!(document.generator.sub_events_in_scope);
        assert!(document.events.is_empty());
    }

    #[test]
    fn test_events_and_links() {
        let document = ProjectDocument::from_toml_str(
            r#"
            [[events]]
            conditions = [{ type = "Timer", parameters = ["3"] }]
            actions = [{ type = "Quit" }]

            [[events]]
            kind = { type = "link", target = "Common" }

            [[external_events.Common]]
            actions = [{ type = "Quit" }]
            "#,
        )
        .unwrap();

        assert_eq!(document.events.len(), 2);
        assert_eq!(document.events[0].conditions[0].parameters, vec!["3"]);
        assert_eq!(
            document.events[1].kind,
            EventKind::Link {
                target: "Common".to_string()
            }
        );
        assert_eq!(document.external_events["Common"].len(), 1);
    }

    #[test]
    fn test_empty_alias_is_rejected() {
        let result = ProjectDocument::from_toml_str(
            r#"
            [generator]
            true_aliases = ["True", ""]
            "#,
        );
        assert!(matches!(result, Err(CodeGenError::ConfigError(_))));
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let result = ProjectDocument::from_toml_str("[[events]\n");
        assert!(matches!(result, Err(CodeGenError::ConfigError(_))));
    }
}
