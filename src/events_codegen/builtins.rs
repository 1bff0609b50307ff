//! Common instructions lowered by custom generators.
//!
//! Their code runs inside the block opened by the instruction expander,
//! where `conditionTrue` aliases the flag of the enclosing condition.

use crate::events_codegen::codegen::EventsCodeGenerator;
use crate::events_codegen::codegen_events::condition_flag_name;
use crate::events_codegen::context::ContextId;
use crate::events_codegen::event::{Instruction, PathSegment};
use crate::events_codegen::metadata::{CustomCodeGenerator, InstructionMetadata, MetadataRegistry};

pub const OR: &str = "BuiltinCommonInstructions::Or";
pub const AND: &str = "BuiltinCommonInstructions::And";
pub const NOT: &str = "BuiltinCommonInstructions::Not";
pub const ONCE: &str = "BuiltinCommonInstructions::Once";

const CONDITION_TRUE: &str = "conditionTrue";

pub fn register_common_instructions(registry: &mut MetadataRegistry) {
    let conditions: [(&str, fn(&Instruction, &mut EventsCodeGenerator<'_>, ContextId) -> String); 4] = [
        (OR, generate_or),
        (AND, generate_and),
        (NOT, generate_not),
        (ONCE, generate_once),
    ];

    for (condition_type, hook) in conditions {
        registry.add_condition(
            condition_type,
            InstructionMetadata::new("").with_custom_code_generator(CustomCodeGenerator::new(hook)),
        );
    }
}

/// True if any sub-condition is true. Every sub-condition is evaluated.
fn generate_or(condition: &Instruction, generator: &mut EventsCodeGenerator<'_>, context: ContextId) -> String {
    let mut flags = Vec::with_capacity(condition.sub_instructions.len());
    let mut code = String::new();

    for index in 0..condition.sub_instructions.len() {
        code += &generator
            .conventions()
            .boolean_initialization_to_false(&condition_flag_name(index));
    }

    for (index, sub_condition) in condition.sub_instructions.iter().enumerate() {
        if sub_condition.instruction_type.is_empty() {
            continue;
        }
        let flag = condition_flag_name(index);
        let sub_code = generator.with_path_segment(PathSegment::SubInstruction(index), |generator| {
            generator.generate_condition_code(sub_condition, &flag, context)
        });
        code += &generator.conventions().guarded_block(&[], &sub_code);
        code += "\n";
        flags.push(flag);
    }

    if !flags.is_empty() {
        let conventions = generator.conventions();
        let any_true = conventions.disjunction(&flags);
        code += &conventions.guarded_block(&[any_true], &conventions.assign_boolean(CONDITION_TRUE, true));
        code += "\n";
    }
    code
}

/// True if all sub-conditions are true, evaluated like an event's conditions
fn generate_and(condition: &Instruction, generator: &mut EventsCodeGenerator<'_>, context: ContextId) -> String {
    let sub_conditions = generator.generate_sub_conditions_list(&condition.sub_instructions, context);

    let conventions = generator.conventions();
    let mut code = sub_conditions.code;
    code += &conventions.guarded_block(
        &sub_conditions.flags,
        &conventions.assign_boolean(CONDITION_TRUE, true),
    );
    code += "\n";
    code
}

fn generate_not(condition: &Instruction, generator: &mut EventsCodeGenerator<'_>, context: ContextId) -> String {
    let sub_conditions = generator.generate_sub_conditions_list(&condition.sub_instructions, context);

    let conventions = generator.conventions();
    let mut code = sub_conditions.code;
    code += &conventions.assign_boolean(CONDITION_TRUE, true);
    code += &conventions.guarded_block(
        &sub_conditions.flags,
        &conventions.assign_boolean(CONDITION_TRUE, false),
    );
    code += "\n";
    code
}

/// True the first time it is reached after having been false
fn generate_once(_condition: &Instruction, generator: &mut EventsCodeGenerator<'_>, _context: ContextId) -> String {
    let path = generator.current_instruction_path();
    let unique_id = generator.generate_single_usage_unique_id_for(&path);

    let conventions = generator.conventions();
    conventions.free_condition(CONDITION_TRUE, &conventions.trigger_once(unique_id))
}

#[cfg(test)]
#[path = "builtins_tests.rs"]
mod tests;
