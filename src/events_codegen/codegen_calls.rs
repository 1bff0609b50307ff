// Call shape synthesis
//
// Builds the final call text of number/string instructions from the
// generated argument fragments. Where the operator sits is read from the
// schema's parameter types, never from the values: the scan starts at
// `start_from` and the last parameter of the requested type wins.
//
// These are pure functions. A malformed schema is returned as an error and
// the instruction expander turns it into an empty call plus a reported
// error.

use crate::events_codegen::error::CodeGenError;
use crate::events_codegen::metadata::{AccessKind, InstructionMetadata};
use crate::events_codegen::parameter_types::{OPERATOR, RELATIONAL_OPERATOR};

/// Position of the last parameter of `parameter_type` at or after
/// `start_from`. Requires at least one parameter after it (the operand).
fn locate_operator(
    metadata: &InstructionMetadata,
    parameter_type: &str,
    start_from: usize,
) -> Result<usize, CodeGenError> {
    let mut operator_index = metadata.parameters.len();
    for (index, parameter) in metadata.parameters.iter().enumerate().skip(start_from) {
        if parameter.parameter_type == parameter_type {
            operator_index = index;
        }
    }

    if operator_index + 1 >= metadata.parameters.len() {
        return Err(CodeGenError::MissingOperand(
            parameter_type.to_string(),
            metadata.code.function_call_name.clone(),
        ));
    }
    Ok(operator_index)
}

/// Operator arguments are generated as quoted literals
fn strip_quotes(argument: &str) -> &str {
    if argument.chars().count() > 2 {
        let mut chars = argument.chars();
        chars.next();
        chars.next_back();
        chars.as_str()
    } else {
        argument
    }
}

fn argument(arguments: &[String], index: usize) -> &str {
    arguments.get(index).map(String::as_str).unwrap_or("")
}

/// Arguments from `start_from`, minus the operator and its operand
fn other_arguments(arguments: &[String], start_from: usize, operator_index: usize) -> String {
    arguments
        .iter()
        .enumerate()
        .skip(start_from)
        .filter(|(index, _)| *index != operator_index && *index != operator_index + 1)
        .map(|(_, argument)| argument.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn generate_arguments_list(arguments: &[String], start_from: usize) -> String {
    arguments
        .iter()
        .skip(start_from)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `call(others...) OP rhs`
pub fn generate_relational_operator_call(
    metadata: &InstructionMetadata,
    arguments: &[String],
    call_start: &str,
    start_from: usize,
) -> Result<String, CodeGenError> {
    let operator_index = locate_operator(metadata, RELATIONAL_OPERATOR, start_from)?;
    let relational_operator = strip_quotes(argument(arguments, operator_index));
    let rhs = argument(arguments, operator_index + 1);
    let arguments_str = other_arguments(arguments, start_from, operator_index);

    Ok(format!(
        "{}({}) {} {}",
        call_start, arguments_str, relational_operator, rhs
    ))
}

/// Setter call. With `=` the operand replaces the value argument, otherwise
/// the value becomes `getter(others...) OP (rhs)`.
pub fn generate_operator_call(
    metadata: &InstructionMetadata,
    arguments: &[String],
    call_start: &str,
    getter_start: Option<&str>,
    start_from: usize,
) -> Result<String, CodeGenError> {
    let operator_index = locate_operator(metadata, OPERATOR, start_from)?;
    let operator = strip_quotes(argument(arguments, operator_index));
    let rhs = argument(arguments, operator_index + 1);
    let getter_arguments = other_arguments(arguments, start_from, operator_index);

    let value = if operator == "=" {
        rhs.to_string()
    } else {
        let getter_start = getter_start
            .ok_or_else(|| CodeGenError::MissingGetter(metadata.code.function_call_name.clone()))?;
        format!("{}({}) {} ({})", getter_start, getter_arguments, operator, rhs)
    };

    let mut setter_arguments: Vec<&str> = Vec::new();
    for (index, fragment) in arguments.iter().enumerate().skip(start_from) {
        if index == operator_index + 1 {
            setter_arguments.push(&value);
        } else if index != operator_index {
            setter_arguments.push(fragment);
        }
    }

    Ok(format!("{}({})", call_start, setter_arguments.join(", ")))
}

/// `call(others...) OP= (rhs)`, where the call returns a reference
pub fn generate_compound_operator_call(
    metadata: &InstructionMetadata,
    arguments: &[String],
    call_start: &str,
    start_from: usize,
) -> Result<String, CodeGenError> {
    let operator_index = locate_operator(metadata, OPERATOR, start_from)?;
    let operator = match strip_quotes(argument(arguments, operator_index)) {
        "+" => "+=",
        "-" => "-=",
        "/" => "/=",
        "*" => "*=",
        other => other,
    };
    let rhs = argument(arguments, operator_index + 1);
    let arguments_str = other_arguments(arguments, start_from, operator_index);

    Ok(format!(
        "{}({}) {} ({})",
        call_start, arguments_str, operator, rhs
    ))
}

/// `call(others...).mutator(rhs)`, the mutator being looked up by the
/// operator literal
pub fn generate_mutator_call(
    metadata: &InstructionMetadata,
    arguments: &[String],
    call_start: &str,
    start_from: usize,
) -> Result<String, CodeGenError> {
    let operator_index = locate_operator(metadata, OPERATOR, start_from)?;
    let operator = strip_quotes(argument(arguments, operator_index));
    let mutator = metadata.code.mutators.get(operator).ok_or_else(|| {
        CodeGenError::UnknownMutator(
            operator.to_string(),
            metadata.code.function_call_name.clone(),
        )
    })?;
    let rhs = argument(arguments, operator_index + 1);
    let arguments_str = other_arguments(arguments, start_from, operator_index);

    Ok(format!("{}({}).{}({})", call_start, arguments_str, mutator, rhs))
}

/// Pick the operator call form of a number/string action from its access kind
pub fn generate_value_action_call(
    metadata: &InstructionMetadata,
    arguments: &[String],
    call_start: &str,
    getter_start: Option<&str>,
    start_from: usize,
) -> Result<String, CodeGenError> {
    match metadata.code.access {
        AccessKind::MutatorAndOrAccessor => {
            generate_operator_call(metadata, arguments, call_start, getter_start, start_from)
        }
        AccessKind::MutatorsOnly => generate_mutator_call(metadata, arguments, call_start, start_from),
        AccessKind::AccessorOnly => {
            generate_compound_operator_call(metadata, arguments, call_start, start_from)
        }
    }
}

#[cfg(test)]
#[path = "call_shape_tests.rs"]
mod tests;
