//! Read-only view of the objects, behaviors and groups a generation pass
//! resolves names against.
//!
//! A pass always queries two containers: the layout (local) one and the
//! project (global) one. When both know a name the local definition wins.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    #[serde(rename = "type")]
    pub object_type: String,
    /// Behavior name -> behavior type
    #[serde(default)]
    pub behaviors: IndexMap<String, String>,
}

impl ObjectDefinition {
    pub fn new(object_type: &str) -> Self {
        ObjectDefinition {
            object_type: object_type.to_string(),
            behaviors: IndexMap::new(),
        }
    }

    pub fn with_behavior(mut self, name: &str, behavior_type: &str) -> Self {
        self.behaviors
            .insert(name.to_string(), behavior_type.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectsContainer {
    #[serde(default)]
    pub objects: IndexMap<String, ObjectDefinition>,
    /// Group name -> ordered member names
    #[serde(default)]
    pub groups: IndexMap<String, Vec<String>>,
}

impl ObjectsContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_object(&mut self, name: &str, definition: ObjectDefinition) {
        self.objects.insert(name.to_string(), definition);
    }

    pub fn insert_group(&mut self, name: &str, members: &[&str]) {
        self.groups.insert(
            name.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
    }

    pub fn has_object_named(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn has_group_named(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectDefinition> {
        self.objects.get(name)
    }

    pub fn group_members(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(|members| members.as_slice())
    }
}

fn type_of_single_object(
    global: &ObjectsContainer,
    local: &ObjectsContainer,
    name: &str,
) -> Option<String> {
    local
        .object(name)
        .or_else(|| global.object(name))
        .map(|definition| definition.object_type.clone())
}

/// Type of an object, or the common type of a group's members.
///
/// Returns an empty string when the name is unknown, when a group is empty,
/// or when the members of a group do not all share the same type.
pub fn type_of_object(global: &ObjectsContainer, local: &ObjectsContainer, name: &str) -> String {
    if let Some(object_type) = type_of_single_object(global, local, name) {
        return object_type;
    }

    let members = match local.group_members(name).or_else(|| global.group_members(name)) {
        Some(members) => members,
        None => return String::new(),
    };

    let mut group_type: Option<String> = None;
    for member in members {
        let member_type = type_of_single_object(global, local, member).unwrap_or_default();
        match &group_type {
            None => group_type = Some(member_type),
            Some(existing) if *existing != member_type => return String::new(),
            Some(_) => {}
        }
    }

    group_type.unwrap_or_default()
}

/// Type of the behavior with the given name, searching the objects of the
/// local container first
pub fn type_of_behavior(
    global: &ObjectsContainer,
    local: &ObjectsContainer,
    behavior_name: &str,
) -> String {
    local
        .objects
        .values()
        .chain(global.objects.values())
        .find_map(|definition| definition.behaviors.get(behavior_name))
        .cloned()
        .unwrap_or_default()
}
