// Instruction expansion
//
// Lowers one condition or action. The schema decides the call shape:
// custom generator, free call, or a call repeated for every object the
// first parameter expands to (directly, or on one of its behaviors).
// Failures stay local to the instruction and leave a comment in the code.

use crate::events_codegen::codegen::EventsCodeGenerator;
use crate::events_codegen::codegen_calls::{
    generate_arguments_list, generate_relational_operator_call, generate_value_action_call,
};
use crate::events_codegen::context::ContextId;
use crate::events_codegen::error::CodeGenError;
use crate::events_codegen::event::{normalize_parameters, Instruction};
use crate::events_codegen::metadata::{
    BehaviorMetadata, InstructionMetadata, InstructionShape, MetadataProvider, ObjectMetadata,
};
use crate::events_codegen::objects::{type_of_behavior, type_of_object};
use crate::events_codegen::parameter_types::{is_object, CONDITION_INVERTED};

pub const UNKNOWN_INSTRUCTION: &str = "/* Unknown instruction - skipped. */";
pub const UNKNOWN_OBJECT: &str = "/* Unknown object - skipped. */";
pub const MISMATCHED_OBJECT_TYPE: &str = "/* Mismatched object type - skipped. */";
pub const UNSUPPORTED_CAPABILITY: &str = "/* Object with unsupported capability - skipped. */\n";

#[derive(Debug, Clone, Copy)]
enum InstructionRole<'r> {
    Condition { return_boolean: &'r str, inverted: bool },
    Action,
}

/// Receiver of an object or behavior instruction
enum Target {
    Object,
    Behavior {
        behavior_name: String,
        metadata: BehaviorMetadata,
    },
}

impl<'a> EventsCodeGenerator<'a> {
    /// Expand an object or group name into the objects an instruction runs on.
    ///
    /// Groups of the project win over groups of the layout. If the context
    /// already iterates one of the expanded objects, only that object is
    /// kept. Names that are not real objects are dropped.
    pub fn expand_objects_name(&self, object_name: &str, context: ContextId) -> Vec<String> {
        let mut real_objects: Vec<String> = match self
            .global_objects
            .group_members(object_name)
            .or_else(|| self.objects.group_members(object_name))
        {
            Some(members) => members.to_vec(),
            None => vec![object_name.to_string()],
        };

        let current_object = self.contexts.get(context).current_object();
        if !current_object.is_empty() && real_objects.iter().any(|o| o == current_object) {
            real_objects = vec![current_object.to_string()];
        }

        real_objects.retain(|object| {
            self.objects.has_object_named(object) || self.global_objects.has_object_named(object)
        });
        real_objects
    }

    /// Every object parameter must name a known object or group, of the
    /// required type when the schema declares one
    fn validate_object_parameters(
        &mut self,
        metadata: &InstructionMetadata,
        parameters: &[String],
    ) -> Result<(), &'static str> {
        for (index, parameter) in metadata.parameters.iter().enumerate() {
            if !is_object(&parameter.parameter_type) {
                continue;
            }

            let object_name = parameters.get(index).map(String::as_str).unwrap_or("");
            let known = self.objects.has_object_named(object_name)
                || self.global_objects.has_object_named(object_name)
                || self.objects.has_group_named(object_name)
                || self.global_objects.has_group_named(object_name);
            if !known {
                self.warn(format!("Unknown object '{}'", object_name));
                return Err(UNKNOWN_OBJECT);
            }

            if !parameter.supplementary_information.is_empty() {
                let object_type = type_of_object(self.global_objects, self.objects, object_name);
                if object_type != parameter.supplementary_information {
                    self.warn(format!(
                        "Object '{}' is a '{}', expected '{}'",
                        object_name, object_type, parameter.supplementary_information
                    ));
                    return Err(MISMATCHED_OBJECT_TYPE);
                }
            }
        }
        Ok(())
    }

    pub fn generate_condition_code(
        &mut self,
        condition: &Instruction,
        return_boolean: &str,
        context: ContextId,
    ) -> String {
        let provider: &'a dyn MetadataProvider = self.metadata;
        let metadata = match provider.condition_metadata(&condition.instruction_type) {
            Some(metadata) => metadata,
            None => {
                self.warn(format!("Unknown condition '{}'", condition.instruction_type));
                return UNKNOWN_INSTRUCTION.to_string();
            }
        };

        self.add_include_files(&metadata.code.include_files);
        self.max_conditions_lists_size = self
            .max_conditions_lists_size
            .max(condition.sub_instructions.len());

        if let Some(hook) = &metadata.code.custom_code_generator {
            self.contexts.get_mut(context).enter_custom_condition();
            let mut code = self
                .conventions
                .reference_to_upper_scope_boolean("conditionTrue", return_boolean);
            code += &hook.generate(condition, self, context);

            let depth = self.contexts.get(context).current_condition_depth();
            self.max_custom_conditions_depth = self.max_custom_conditions_depth.max(depth);
            self.contexts.get_mut(context).leave_custom_condition();

            return format!("{{{}}}\n", code);
        }

        let role = InstructionRole::Condition {
            return_boolean,
            inverted: condition.inverted,
        };
        self.generate_instruction_code(condition, metadata, role, context)
    }

    pub fn generate_action_code(&mut self, action: &Instruction, context: ContextId) -> String {
        let provider: &'a dyn MetadataProvider = self.metadata;
        let metadata = match provider.action_metadata(&action.instruction_type) {
            Some(metadata) => metadata,
            None => {
                self.warn(format!("Unknown action '{}'", action.instruction_type));
                return UNKNOWN_INSTRUCTION.to_string();
            }
        };

        self.add_include_files(&metadata.code.include_files);

        if let Some(hook) = &metadata.code.custom_code_generator {
            return hook.generate(action, self, context);
        }

        self.generate_instruction_code(action, metadata, InstructionRole::Action, context)
    }

    fn generate_instruction_code(
        &mut self,
        instruction: &Instruction,
        metadata: &InstructionMetadata,
        role: InstructionRole<'_>,
        context: ContextId,
    ) -> String {
        let parameters = normalize_parameters(&instruction.parameters, metadata.parameters.len());

        if let Err(placeholder) = self.validate_object_parameters(metadata, &parameters) {
            return placeholder.to_string();
        }

        match &metadata.shape {
            InstructionShape::Object { .. } => {
                if metadata.parameters.is_empty() {
                    return String::new();
                }
                self.generate_for_each_object(metadata, &parameters, Target::Object, role, context)
            }
            InstructionShape::Behavior => {
                if metadata.parameters.len() < 2 {
                    return String::new();
                }
                let behavior_name = parameters[1].clone();
                let behavior_type = type_of_behavior(self.global_objects, self.objects, &behavior_name);
                let behavior_metadata = self
                    .metadata
                    .behavior_metadata(&behavior_type)
                    .cloned()
                    .unwrap_or_default();
                let target = Target::Behavior {
                    behavior_name,
                    metadata: behavior_metadata,
                };
                self.generate_for_each_object(metadata, &parameters, target, role, context)
            }
            InstructionShape::Free => self.generate_free_instruction(metadata, &parameters, role, context),
        }
    }

    /// One call per object the first parameter expands to. Parameters are
    /// regenerated for each object since they may refer to the current one.
    fn generate_for_each_object(
        &mut self,
        metadata: &InstructionMetadata,
        parameters: &[String],
        target: Target,
        role: InstructionRole<'_>,
        context: ContextId,
    ) -> String {
        let real_objects = self.expand_objects_name(&parameters[0], context);
        log::debug!(
            "Expanding '{}' into {} objects for '{}'",
            parameters[0],
            real_objects.len(),
            metadata.code.function_call_name
        );

        let mut code = String::new();
        for real_object in &real_objects {
            let object_metadata = match &target {
                Target::Object => {
                    let object_type = type_of_object(self.global_objects, self.objects, real_object);
                    let object_metadata = self
                        .metadata
                        .object_metadata(&object_type)
                        .cloned()
                        .unwrap_or_default();

                    let capability = metadata.required_base_object_capability();
                    if object_metadata.is_unsupported_base_object_capability(capability) {
                        self.warn(format!(
                            "Object '{}' does not support capability '{}'",
                            real_object, capability
                        ));
                        code += UNSUPPORTED_CAPABILITY;
                        continue;
                    }
                    self.add_include_files(&object_metadata.include_files);
                    object_metadata
                }
                Target::Behavior {
                    metadata: behavior_metadata,
                    ..
                } => {
                    self.add_include_files(&behavior_metadata.include_files);
                    ObjectMetadata::default()
                }
            };

            let context_data = self.contexts.get_mut(context);
            context_data.set_current_object(real_object);
            context_data.objects_list_needed(real_object);

            let arguments =
                self.generate_parameters_codes(parameters, &metadata.parameters, context, &[]);
            let list_name = self.object_list_name(real_object);

            let generated = match &target {
                Target::Object => {
                    // The receiver is only cast when the schema pins the object type
                    let class_name = if metadata.parameters[0].supplementary_information.is_empty() {
                        None
                    } else {
                        Some(object_metadata.class_name.as_str())
                    };
                    let call_start = self.conventions.object_call_prefix(
                        &list_name,
                        class_name,
                        &metadata.code.function_call_name,
                    );
                    let getter_start = metadata.code.getter.as_ref().map(|getter| {
                        self.conventions
                            .object_call_prefix(&list_name, class_name, getter)
                    });
                    self.generate_target_call(
                        metadata,
                        &arguments,
                        &list_name,
                        &call_start,
                        getter_start.as_deref(),
                        1,
                        role,
                    )
                }
                Target::Behavior {
                    behavior_name,
                    metadata: behavior_metadata,
                } => {
                    let behavior_name_code = self.generate_get_behavior_name_code(behavior_name);
                    let class_name = Some(behavior_metadata.class_name.as_str());
                    let call_start = self.conventions.behavior_call_prefix(
                        &list_name,
                        &behavior_name_code,
                        class_name,
                        &metadata.code.function_call_name,
                    );
                    let getter_start = metadata.code.getter.as_ref().map(|getter| {
                        self.conventions.behavior_call_prefix(
                            &list_name,
                            &behavior_name_code,
                            class_name,
                            getter,
                        )
                    });
                    self.generate_target_call(
                        metadata,
                        &arguments,
                        &list_name,
                        &call_start,
                        getter_start.as_deref(),
                        2,
                        role,
                    )
                }
            };
            code += &generated;

            self.contexts.get_mut(context).set_no_current_object();
        }

        code
    }

    /// Condition filter loop or action loop over one object list
    #[allow(clippy::too_many_arguments)]
    fn generate_target_call(
        &mut self,
        metadata: &InstructionMetadata,
        arguments: &[String],
        list_name: &str,
        call_start: &str,
        getter_start: Option<&str>,
        start_from: usize,
        role: InstructionRole<'_>,
    ) -> String {
        match role {
            InstructionRole::Condition {
                return_boolean,
                inverted,
            } => {
                let predicate = if metadata.code.value_kind.is_value() {
                    generate_relational_operator_call(metadata, arguments, call_start, start_from)
                } else {
                    Ok(format!(
                        "{}({})",
                        call_start,
                        generate_arguments_list(arguments, start_from)
                    ))
                };
                match self.call_or_report(predicate) {
                    Some(predicate) => {
                        let predicate = if inverted {
                            self.conventions.negated_predicate(&predicate)
                        } else {
                            predicate
                        };
                        self.conventions
                            .object_condition(list_name, &predicate, return_boolean)
                    }
                    None => String::new(),
                }
            }
            InstructionRole::Action => {
                let call = if metadata.code.value_kind.is_value() {
                    generate_value_action_call(metadata, arguments, call_start, getter_start, start_from)
                } else {
                    Ok(format!(
                        "{}({})",
                        call_start,
                        generate_arguments_list(arguments, start_from)
                    ))
                };
                match self.call_or_report(call) {
                    Some(call) => self.conventions.object_action(list_name, &call),
                    None => String::new(),
                }
            }
        }
    }

    fn generate_free_instruction(
        &mut self,
        metadata: &InstructionMetadata,
        parameters: &[String],
        role: InstructionRole<'_>,
        context: ContextId,
    ) -> String {
        let call_name = metadata.code.function_call_name.as_str();

        match role {
            InstructionRole::Condition {
                return_boolean,
                inverted,
            } => {
                let inverted_code = if inverted {
                    self.conventions.true_literal()
                } else {
                    self.conventions.false_literal()
                };
                let supplementary_types = [(CONDITION_INVERTED.to_string(), inverted_code)];
                let arguments = self.generate_parameters_codes(
                    parameters,
                    &metadata.parameters,
                    context,
                    &supplementary_types,
                );

                let predicate = if metadata.code.value_kind.is_value() {
                    generate_relational_operator_call(metadata, &arguments, call_name, 0)
                } else {
                    Ok(format!("{}({})", call_name, generate_arguments_list(&arguments, 0)))
                };
                let predicate = match self.call_or_report(predicate) {
                    Some(predicate) => predicate,
                    None => return String::new(),
                };

                // Some conditions take care of the inversion themselves
                let handles_inversion = metadata
                    .parameters
                    .iter()
                    .any(|p| p.parameter_type == CONDITION_INVERTED);
                let predicate = if inverted && !handles_inversion {
                    self.conventions.negated_predicate(&predicate)
                } else {
                    predicate
                };

                self.conventions.free_condition(return_boolean, &predicate)
            }
            InstructionRole::Action => {
                let arguments =
                    self.generate_parameters_codes(parameters, &metadata.parameters, context, &[]);
                let call = if metadata.code.value_kind.is_value() {
                    generate_value_action_call(
                        metadata,
                        &arguments,
                        call_name,
                        metadata.code.getter.as_deref(),
                        0,
                    )
                } else {
                    Ok(format!("{}({})", call_name, generate_arguments_list(&arguments, 0)))
                };
                match self.call_or_report(call) {
                    Some(call) => self.conventions.free_action(&call),
                    None => String::new(),
                }
            }
        }
    }

    /// A malformed schema only costs the call it was needed for
    fn call_or_report(&mut self, call: Result<String, CodeGenError>) -> Option<String> {
        match call {
            Ok(call) => Some(call),
            Err(err) => {
                self.report_error(err.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "instruction_tests.rs"]
mod tests;
