//! Event tree consumed by the generator.
//!
//! Events and instructions are caller-owned. Code generation itself only
//! reads them; the preprocessing and dead-event passes are the only code
//! that rewrites an events list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A condition or action occurrence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(rename = "type")]
    pub instruction_type: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Only meaningful for conditions
    #[serde(default)]
    pub inverted: bool,
    #[serde(default)]
    pub sub_instructions: Vec<Instruction>,
}

impl Instruction {
    pub fn new(instruction_type: &str, parameters: &[&str]) -> Self {
        Instruction {
            instruction_type: instruction_type.to_string(),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            inverted: false,
            sub_instructions: Vec::new(),
        }
    }

    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    pub fn with_sub_instructions(mut self, sub_instructions: Vec<Instruction>) -> Self {
        self.sub_instructions = sub_instructions;
        self
    }

    /// Plain text of a parameter, empty when the parameter is absent
    pub fn parameter(&self, index: usize) -> &str {
        self.parameters.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Pad `declared` with empty values up to `schema_length`.
///
/// Never truncates: extra values beyond the schema are kept and simply not
/// consumed by parameter generation.
pub fn normalize_parameters(declared: &[String], schema_length: usize) -> Vec<String> {
    let mut parameters = declared.to_vec();
    if parameters.len() < schema_length {
        parameters.resize(schema_length, String::new());
    }
    parameters
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Conditions, actions and sub-events
    #[default]
    Standard,
    /// Documentation only, never executed
    Comment {
        #[serde(default)]
        text: String,
    },
    /// Only runs its sub-events
    Group {
        #[serde(default)]
        name: String,
    },
    /// Replaced during preprocessing by a copy of the named external events
    Link { target: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub kind: EventKind,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub conditions: Vec<Instruction>,
    #[serde(default)]
    pub actions: Vec<Instruction>,
    #[serde(default)]
    pub sub_events: Vec<Event>,
}

impl Event {
    pub fn standard(conditions: Vec<Instruction>, actions: Vec<Instruction>) -> Self {
        Event {
            conditions,
            actions,
            ..Default::default()
        }
    }

    pub fn comment(text: &str) -> Self {
        Event {
            kind: EventKind::Comment {
                text: text.to_string(),
            },
            ..Default::default()
        }
    }

    pub fn group(name: &str, sub_events: Vec<Event>) -> Self {
        Event {
            kind: EventKind::Group {
                name: name.to_string(),
            },
            sub_events,
            ..Default::default()
        }
    }

    pub fn link(target: &str) -> Self {
        Event {
            kind: EventKind::Link {
                target: target.to_string(),
            },
            ..Default::default()
        }
    }

    pub fn with_sub_events(mut self, sub_events: Vec<Event>) -> Self {
        self.sub_events = sub_events;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn can_have_sub_events(&self) -> bool {
        matches!(self.kind, EventKind::Standard | EventKind::Group { .. })
    }

    pub fn is_executable(&self) -> bool {
        !matches!(self.kind, EventKind::Comment { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Event(usize),
    Condition(usize),
    Action(usize),
    SubInstruction(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathSegment::Event(i) => write!(f, "event[{}]", i),
            PathSegment::Condition(i) => write!(f, "condition[{}]", i),
            PathSegment::Action(i) => write!(f, "action[{}]", i),
            PathSegment::SubInstruction(i) => write!(f, "sub[{}]", i),
        }
    }
}

/// Structural identity of an instruction: the chain of event indices leading
/// to it, then its slot in the conditions or actions list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstructionPath {
    pub segments: Vec<PathSegment>,
}

impl InstructionPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        InstructionPath { segments }
    }
}

impl fmt::Display for InstructionPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join("/"))
    }
}
