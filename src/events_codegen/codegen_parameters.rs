// Parameter code generation
//
// Turns one instruction parameter (its declared type plus the raw text the
// user typed) into a code fragment. Fragments are opaque to the rest of the
// generator, which only concatenates them positionally.

use crate::events_codegen::codegen::EventsCodeGenerator;
use crate::events_codegen::context::ContextId;
use crate::events_codegen::metadata::ParameterMetadata;
use crate::events_codegen::parameter_types::{is_object, ExpressionKind, ParameterKind};

const RELATIONAL_OPERATORS: &[&str] = &["==", "<", ">", "<=", ">=", "!="];
const ASSIGNMENT_OPERATORS: &[&str] = &["=", "+", "-", "/", "*"];

/// Literal substitutions for parameter types the generator does not know,
/// as (parameter type, code) pairs
pub type SupplementaryParameterTypes = [(String, String)];

/// Escape backslashes, carriage returns, newlines and double quotes, in that
/// order, so the text can be placed between double quotes
pub fn convert_to_string(plain_string: &str) -> String {
    plain_string
        .replace('\\', "\\\\")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
        .replace('"', "\\\"")
}

pub fn convert_to_string_explicit(plain_string: &str) -> String {
    format!("\"{}\"", convert_to_string(plain_string))
}

impl<'a> EventsCodeGenerator<'a> {
    pub fn generate_parameter_code(
        &mut self,
        parameter: &str,
        metadata: &ParameterMetadata,
        context: ContextId,
        last_object_name: &str,
        supplementary_types: &SupplementaryParameterTypes,
    ) -> String {
        match ParameterKind::classify(&metadata.parameter_type) {
            ParameterKind::Expression(ExpressionKind::Variable) => {
                self.expressions
                    .compile(&metadata.parameter_type, parameter, last_object_name)
            }
            ParameterKind::Expression(kind) => self.expressions.compile(kind.as_str(), parameter, ""),
            ParameterKind::Object => {
                self.generate_object(parameter, &metadata.parameter_type, context)
            }
            ParameterKind::RelationalOperator => {
                let mut operator = if parameter == "=" { "==" } else { parameter };
                if !RELATIONAL_OPERATORS.contains(&operator) {
                    self.warn(format!(
                        "Bad relational operator '{}': set to == by default",
                        parameter
                    ));
                    operator = "==";
                }
                format!("\"{}\"", operator)
            }
            ParameterKind::Operator => {
                let mut operator = parameter;
                if !ASSIGNMENT_OPERATORS.contains(&operator) {
                    self.warn(format!("Bad operator '{}': set to = by default", parameter));
                    operator = "=";
                }
                format!("\"{}\"", operator)
            }
            ParameterKind::Behavior => self.generate_get_behavior_name_code(parameter),
            ParameterKind::VerbatimString => convert_to_string_explicit(parameter),
            ParameterKind::YesOrNo => {
                if self.config.yes_aliases.iter().any(|alias| alias == parameter) {
                    self.conventions.true_literal()
                } else {
                    self.conventions.false_literal()
                }
            }
            ParameterKind::TrueOrFalse => {
                if self.config.true_aliases.iter().any(|alias| alias == parameter) {
                    self.conventions.true_literal()
                } else {
                    self.conventions.false_literal()
                }
            }
            ParameterKind::InlineCode => metadata.supplementary_information.clone(),
            ParameterKind::Other => {
                let mut output = String::new();
                for (parameter_type, code) in supplementary_types {
                    if *parameter_type == metadata.parameter_type {
                        output += code;
                    }
                }

                if output.is_empty() {
                    // An empty type marks a deliberately absent parameter
                    if !metadata.parameter_type.is_empty() {
                        self.warn(format!(
                            "Unknown type of parameter \"{}\"",
                            metadata.parameter_type
                        ));
                    }
                    output = convert_to_string_explicit(parameter);
                }
                output
            }
        }
    }

    /// Generate every parameter of an instruction in schema order.
    ///
    /// Empty values of optional parameters are replaced by their default, and
    /// each parameter sees the value of the last object parameter before it
    /// (object variables are resolved relative to it).
    pub fn generate_parameters_codes(
        &mut self,
        parameters: &[String],
        parameters_metadata: &[ParameterMetadata],
        context: ContextId,
        supplementary_types: &SupplementaryParameterTypes,
    ) -> Vec<String> {
        let mut arguments = Vec::with_capacity(parameters_metadata.len());
        let mut last_object_name = String::new();

        for (index, metadata) in parameters_metadata.iter().enumerate() {
            let value = parameters.get(index).map(String::as_str).unwrap_or("");
            let value_or_default = if value.is_empty() && metadata.optional {
                metadata.default_value.as_str()
            } else {
                value
            };

            let argument = self.generate_parameter_code(
                value_or_default,
                metadata,
                context,
                &last_object_name,
                supplementary_types,
            );
            arguments.push(argument);

            if is_object(&metadata.parameter_type) {
                last_object_name = value.to_string();
            }
        }

        arguments
    }

    pub fn generate_get_behavior_name_code(&self, behavior_name: &str) -> String {
        convert_to_string_explicit(behavior_name)
    }

    /// Lower an object parameter to a reference to object lists. What is
    /// referenced, and how the lists are declared, depends on the type.
    pub fn generate_object(
        &mut self,
        object_name: &str,
        parameter_type: &str,
        context: ContextId,
    ) -> String {
        match parameter_type {
            "objectList" | "objectListOrEmptyIfJustDeclared" | "objectListOrEmptyWithoutPicking" => {
                let real_objects = self.expand_objects_name(object_name, context);
                let mut lists = Vec::with_capacity(real_objects.len());
                for real_object in &real_objects {
                    let context_data = self.contexts.get_mut(context);
                    match parameter_type {
                        "objectList" => context_data.objects_list_needed(real_object),
                        "objectListOrEmptyIfJustDeclared" => {
                            context_data.objects_list_needed_or_empty_if_just_declared(real_object)
                        }
                        _ => context_data.objects_list_without_picking_needed(real_object),
                    }
                    let list_name = self.object_list_name(real_object);
                    lists.push((real_object.clone(), list_name));
                }
                self.conventions.objects_map(&lists)
            }
            "objectPtr" => {
                let real_objects = self.expand_objects_name(object_name, context);
                let current_object = self.contexts.get(context).current_object().to_string();

                if !current_object.is_empty() && real_objects.contains(&current_object) {
                    let list_name = self.object_list_name(&current_object);
                    self.conventions.current_object_pointer(&list_name)
                } else {
                    let mut list_names = Vec::with_capacity(real_objects.len());
                    for real_object in &real_objects {
                        self.contexts.get_mut(context).objects_list_needed(real_object);
                        list_names.push(self.object_list_name(real_object));
                    }
                    self.conventions.first_object_pointer(&list_names)
                }
            }
            _ => {
                let current_object = self.contexts.get(context).current_object().to_string();
                let target = if !current_object.is_empty()
                    && self
                        .expand_objects_name(object_name, context)
                        .contains(&current_object)
                {
                    current_object
                } else {
                    object_name.to_string()
                };
                self.object_list_name(&target)
            }
        }
    }
}

#[cfg(test)]
#[path = "parameter_tests.rs"]
mod tests;
