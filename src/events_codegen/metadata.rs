//! Declarative instruction, object and behavior schemas.
//!
//! The generator only borrows metadata through `MetadataProvider`. A lookup
//! returning `None` is the "unknown type" sentinel: callers degrade to a
//! placeholder comment instead of failing the pass.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::events_codegen::codegen::EventsCodeGenerator;
use crate::events_codegen::context::ContextId;
use crate::events_codegen::event::Instruction;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParameterMetadata {
    #[serde(rename = "type")]
    pub parameter_type: String,
    /// Required object type for object parameters, code blob for `inlineCode`
    #[serde(default)]
    pub supplementary_information: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
}

impl ParameterMetadata {
    pub fn new(parameter_type: &str) -> Self {
        ParameterMetadata {
            parameter_type: parameter_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_supplementary_information(mut self, information: &str) -> Self {
        self.supplementary_information = information.to_string();
        self
    }

    pub fn optional_with_default(mut self, default_value: &str) -> Self {
        self.optional = true;
        self.default_value = default_value.to_string();
        self
    }
}

/// How an instruction reaches its target
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstructionShape {
    /// Plain function call, no receiver
    #[default]
    Free,
    /// Called on each picked instance of the object in parameter 0
    Object {
        #[serde(default)]
        required_capability: String,
    },
    /// Called on the behavior named by parameter 1 of each instance of parameter 0
    Behavior,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    String,
    #[default]
    Other,
}

impl ValueKind {
    /// Number and string instructions compare or assign a value through an
    /// operator parameter instead of being plain calls
    pub fn is_value(&self) -> bool {
        matches!(self, ValueKind::Number | ValueKind::String)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    /// The call returns a reference: compound assignment (`+=`, `-=`...)
    #[default]
    AccessorOnly,
    /// Setter call, with the getter used to build `getter() OP (rhs)`
    MutatorAndOrAccessor,
    /// The operator literal selects a named mutator method
    MutatorsOnly,
}

pub type CustomCodeGeneratorFn = dyn Fn(&Instruction, &mut EventsCodeGenerator<'_>, ContextId) -> String;

/// Opaque code generation hook. Instructions carrying one bypass parameter
/// and call synthesis entirely.
#[derive(Clone)]
pub struct CustomCodeGenerator(Rc<CustomCodeGeneratorFn>);

impl CustomCodeGenerator {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&Instruction, &mut EventsCodeGenerator<'_>, ContextId) -> String + 'static,
    {
        CustomCodeGenerator(Rc::new(hook))
    }

    pub fn generate(
        &self,
        instruction: &Instruction,
        generator: &mut EventsCodeGenerator<'_>,
        context: ContextId,
    ) -> String {
        (self.0)(instruction, generator, context)
    }
}

impl fmt::Debug for CustomCodeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CustomCodeGenerator(..)")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtraInformation {
    #[serde(default)]
    pub function_call_name: String,
    #[serde(default, rename = "type")]
    pub value_kind: ValueKind,
    #[serde(default)]
    pub access: AccessKind,
    /// Getter call name used by `MutatorAndOrAccessor` operator calls
    #[serde(default)]
    pub getter: Option<String>,
    /// Operator literal -> mutator method name
    #[serde(default)]
    pub mutators: IndexMap<String, String>,
    #[serde(default)]
    pub include_files: Vec<String>,
    #[serde(skip)]
    pub custom_code_generator: Option<CustomCodeGenerator>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstructionMetadata {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterMetadata>,
    #[serde(default)]
    pub shape: InstructionShape,
    #[serde(default)]
    pub code: ExtraInformation,
}

impl InstructionMetadata {
    pub fn new(function_call_name: &str) -> Self {
        let mut metadata = InstructionMetadata::default();
        metadata.code.function_call_name = function_call_name.to_string();
        metadata
    }

    pub fn with_parameter(mut self, parameter: ParameterMetadata) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_shape(mut self, shape: InstructionShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_value(mut self, value_kind: ValueKind, access: AccessKind) -> Self {
        self.code.value_kind = value_kind;
        self.code.access = access;
        self
    }

    pub fn with_getter(mut self, getter: &str) -> Self {
        self.code.getter = Some(getter.to_string());
        self
    }

    pub fn with_mutator(mut self, operator: &str, mutator: &str) -> Self {
        self.code
            .mutators
            .insert(operator.to_string(), mutator.to_string());
        self
    }

    pub fn with_include_file(mut self, include_file: &str) -> Self {
        self.code.include_files.push(include_file.to_string());
        self
    }

    pub fn with_custom_code_generator(mut self, hook: CustomCodeGenerator) -> Self {
        self.code.custom_code_generator = Some(hook);
        self
    }

    pub fn is_object_instruction(&self) -> bool {
        matches!(self.shape, InstructionShape::Object { .. })
    }

    pub fn is_behavior_instruction(&self) -> bool {
        matches!(self.shape, InstructionShape::Behavior)
    }

    pub fn required_base_object_capability(&self) -> &str {
        match &self.shape {
            InstructionShape::Object {
                required_capability,
            } => required_capability,
            _ => "",
        }
    }

    pub fn has_custom_code_generator(&self) -> bool {
        self.code.custom_code_generator.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObjectMetadata {
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub include_files: Vec<String>,
    #[serde(default)]
    pub unsupported_base_object_capabilities: Vec<String>,
}

impl ObjectMetadata {
    pub fn is_unsupported_base_object_capability(&self, capability: &str) -> bool {
        !capability.is_empty()
            && self
                .unsupported_base_object_capabilities
                .iter()
                .any(|c| c == capability)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BehaviorMetadata {
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub include_files: Vec<String>,
}

/// Lookup service for the schemas of one platform
pub trait MetadataProvider {
    fn condition_metadata(&self, condition_type: &str) -> Option<&InstructionMetadata>;

    fn action_metadata(&self, action_type: &str) -> Option<&InstructionMetadata>;

    fn object_metadata(&self, object_type: &str) -> Option<&ObjectMetadata>;

    fn behavior_metadata(&self, behavior_type: &str) -> Option<&BehaviorMetadata>;
}

/// In-memory metadata registry, usually deserialised from the `[metadata]`
/// table of a project document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataRegistry {
    #[serde(default)]
    pub conditions: IndexMap<String, InstructionMetadata>,
    #[serde(default)]
    pub actions: IndexMap<String, InstructionMetadata>,
    #[serde(default)]
    pub objects: IndexMap<String, ObjectMetadata>,
    #[serde(default)]
    pub behaviors: IndexMap<String, BehaviorMetadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_condition(&mut self, condition_type: &str, metadata: InstructionMetadata) {
        self.conditions.insert(condition_type.to_string(), metadata);
    }

    pub fn add_action(&mut self, action_type: &str, metadata: InstructionMetadata) {
        self.actions.insert(action_type.to_string(), metadata);
    }

    pub fn add_object(&mut self, object_type: &str, metadata: ObjectMetadata) {
        self.objects.insert(object_type.to_string(), metadata);
    }

    pub fn add_behavior(&mut self, behavior_type: &str, metadata: BehaviorMetadata) {
        self.behaviors.insert(behavior_type.to_string(), metadata);
    }
}

impl MetadataProvider for MetadataRegistry {
    fn condition_metadata(&self, condition_type: &str) -> Option<&InstructionMetadata> {
        self.conditions.get(condition_type)
    }

    fn action_metadata(&self, action_type: &str) -> Option<&InstructionMetadata> {
        self.actions.get(action_type)
    }

    fn object_metadata(&self, object_type: &str) -> Option<&ObjectMetadata> {
        self.objects.get(object_type)
    }

    fn behavior_metadata(&self, behavior_type: &str) -> Option<&BehaviorMetadata> {
        self.behaviors.get(behavior_type)
    }
}
