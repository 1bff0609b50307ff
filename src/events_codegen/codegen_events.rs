// Event tree walking
//
// Lowers a list of events into scoped blocks. Each event gets its own
// context forked from the enclosing one; the block is made of the scope
// wrapper, the object list declarations the event's code asked for, and the
// code itself. Declarations are computed last since lowering the body is
// what fills the context.

use crate::events_codegen::codegen::{EventBlock, EventsCodeGenerator};
use crate::events_codegen::context::ContextId;
use crate::events_codegen::event::{Event, EventKind, Instruction, PathSegment};

pub const SKIPPED_CONDITION: &str = "/* Skipped condition (empty type) */";
pub const SKIPPED_ACTION: &str = "/* Skipped action (empty type) */";

/// Lowered conditions and the flags they set, in evaluation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionsList {
    pub code: String,
    pub flags: Vec<String>,
}

/// What preprocessing did to the event at one index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preprocessed {
    Kept,
    Removed,
    /// Replaced by this many events, already preprocessed
    Replaced(usize),
}

pub fn condition_flag_name(index: usize) -> String {
    format!("condition{}IsTrue", index)
}

impl<'a> EventsCodeGenerator<'a> {
    /// One block per event, in event order
    pub fn generate_events_list_blocks(&mut self, events: &[Event], parent: ContextId) -> Vec<EventBlock> {
        let mut blocks = Vec::with_capacity(events.len());

        for (index, event) in events.iter().enumerate() {
            // Nothing runs after the last event of a list, so it may work on
            // the parent's lists directly
            let reuse_parent_context =
                self.contexts.get(parent).can_reuse() && index + 1 == events.len();
            let context = if reuse_parent_context {
                self.contexts.reuse(parent)
            } else {
                self.contexts.fork(parent)
            };

            let block = self.with_path_segment(PathSegment::Event(index), |generator| {
                let body = generator.generate_event_code(event, context);
                EventBlock {
                    scope_begin: generator.conventions.scope_begin(),
                    declarations: generator.generate_objects_declaration_code(context),
                    body,
                    scope_end: generator.conventions.scope_end(),
                }
            });
            blocks.push(block);
        }

        blocks
    }

    pub fn generate_events_list_code(&mut self, events: &[Event], parent: ContextId) -> String {
        self.generate_events_list_blocks(events, parent)
            .iter()
            .map(EventBlock::render)
            .collect()
    }

    pub fn generate_event_code(&mut self, event: &Event, context: ContextId) -> String {
        match &event.kind {
            EventKind::Standard => self.generate_standard_event_code(event, context),
            EventKind::Group { name } => {
                log::debug!("Lowering group '{}'", name);
                self.generate_sub_events_code(&event.sub_events, context)
            }
            EventKind::Comment { .. } | EventKind::Link { .. } => String::new(),
        }
    }

    fn generate_standard_event_code(&mut self, event: &Event, context: ContextId) -> String {
        let conditions = self.generate_conditions_list(&event.conditions, context, PathSegment::Condition);
        let actions_code = self.generate_actions_list_code(&event.actions, context);
        let sub_events_code = self.generate_sub_events_code(&event.sub_events, context);

        let mut code = conditions.code;
        code += &self.conventions.guarded_block(
            &conditions.flags,
            &format!("{}\n{}", actions_code, sub_events_code),
        );
        code += "\n";
        code
    }

    fn generate_sub_events_code(&mut self, sub_events: &[Event], context: ContextId) -> String {
        if sub_events.is_empty() {
            return String::new();
        }

        let code = self.generate_events_list_code(sub_events, context);
        if self.config.sub_events_in_scope {
            format!(
                "{}\n{}{}\n",
                self.conventions.scope_begin(),
                code,
                self.conventions.scope_end()
            )
        } else {
            code
        }
    }

    pub fn generate_conditions_list_code(&mut self, conditions: &[Instruction], context: ContextId) -> String {
        self.generate_conditions_list(conditions, context, PathSegment::Condition)
            .code
    }

    /// Conditions nested under another one (used by custom generators)
    pub fn generate_sub_conditions_list(
        &mut self,
        conditions: &[Instruction],
        context: ContextId,
    ) -> ConditionsList {
        self.generate_conditions_list(conditions, context, PathSegment::SubInstruction)
    }

    /// Each condition runs only when all the previous ones were true.
    /// Conditions with an empty type are skipped and get no flag.
    fn generate_conditions_list(
        &mut self,
        conditions: &[Instruction],
        context: ContextId,
        segment: fn(usize) -> PathSegment,
    ) -> ConditionsList {
        let flag_count = conditions
            .iter()
            .filter(|c| !c.instruction_type.is_empty())
            .count();

        let mut code = String::new();
        for index in 0..flag_count {
            code += &self
                .conventions
                .boolean_initialization_to_false(&condition_flag_name(index));
        }

        let mut flags: Vec<String> = Vec::with_capacity(flag_count);
        for (index, condition) in conditions.iter().enumerate() {
            if condition.instruction_type.is_empty() {
                code += SKIPPED_CONDITION;
                continue;
            }

            let flag = condition_flag_name(flags.len());
            let condition_code = self.with_path_segment(segment(index), |generator| {
                generator.generate_condition_code(condition, &flag, context)
            });
            code += &self.conventions.guarded_block(&flags, &condition_code);
            flags.push(flag);
        }

        self.max_conditions_lists_size = self.max_conditions_lists_size.max(conditions.len());

        ConditionsList { code, flags }
    }

    /// Actions are independent, each one gets its own block
    pub fn generate_actions_list_code(&mut self, actions: &[Instruction], context: ContextId) -> String {
        let mut code = String::new();
        for (index, action) in actions.iter().enumerate() {
            code += "{";
            if action.instruction_type.is_empty() {
                code += SKIPPED_ACTION;
            } else {
                code += &self.with_path_segment(PathSegment::Action(index), |generator| {
                    generator.generate_action_code(action, context)
                });
            }
            code += "}";
        }
        code
    }

    /// Declarations for every list the context needs: populated from the
    /// runtime, copied from (or aliased to) the parent's list, or empty.
    pub fn generate_objects_declaration_code(&mut self, context: ContextId) -> String {
        let mut code = String::new();

        let to_be_declared = self.contexts.get(context).objects_lists_to_be_declared().clone();
        for object in &to_be_declared {
            let declaration = if !self.contexts.get(context).object_already_declared(object) {
                let list_name = self.object_list_name(object);
                self.contexts.get_mut(context).set_object_declared(object);
                self.conventions.object_list_declaration(&list_name, object)
            } else {
                self.declare_inherited_object_list(object, context)
            };
            code += &declaration;
            code += "\n";
        }

        let without_picking = self
            .contexts
            .get(context)
            .objects_lists_to_be_declared_without_picking()
            .clone();
        for object in &without_picking {
            let declaration = if !self.contexts.get(context).object_already_declared(object) {
                let list_name = self.object_list_name(object);
                self.contexts.get_mut(context).set_object_declared(object);
                self.conventions.empty_object_list_declaration(&list_name)
            } else {
                self.declare_inherited_object_list(object, context)
            };
            code += &declaration;
            code += "\n";
        }

        let empty = self.contexts.get(context).objects_lists_to_be_declared_empty().clone();
        for object in &empty {
            let list_name = self.object_list_name(object);
            self.contexts.get_mut(context).set_object_declared(object);
            code += &self.conventions.empty_object_list_declaration(&list_name);
            code += "\n";
        }

        code
    }

    /// A list an enclosing scope declared: aliased when the parent's list is
    /// the one last used, otherwise copied
    fn declare_inherited_object_list(&mut self, object: &str, context: ContextId) -> String {
        let list_name = self.object_list_name(object);

        let parent = match self.contexts.parent_of(context) {
            Some(parent) => parent,
            None => {
                self.report_error(format!(
                    "Object list '{}' is declared by an enclosing scope but the context has no parent",
                    list_name
                ));
                return format!("/* Could not declare {} */", list_name);
            }
        };

        if self.contexts.is_same_objects_list(object, context, parent) {
            return self.conventions.object_list_reuse(&list_name);
        }

        let parent_list_name = self.object_list_name(object);
        self.conventions.object_list_copy(&list_name, &parent_list_name)
    }

    /// Run the event specific preprocessing on every event, sub-events
    /// included. Link events are replaced by the events they point to.
    pub fn preprocess_event_list(&mut self, events: &mut Vec<Event>) {
        self.preprocess_events(events, 0);
    }

    fn preprocess_events(&mut self, events: &mut Vec<Event>, link_depth: usize) {
        let mut index = 0;
        while index < events.len() {
            let outcome = self.with_path_segment(PathSegment::Event(index), |generator| {
                generator.preprocess_event(events, index, link_depth)
            });

            match outcome {
                // The next event moved to this index
                Preprocessed::Removed => {}
                Preprocessed::Replaced(count) => index += count,
                Preprocessed::Kept => {
                    if events[index].can_have_sub_events() {
                        let sub_events = &mut events[index].sub_events;
                        self.with_path_segment(PathSegment::Event(index), |generator| {
                            generator.preprocess_events(sub_events, link_depth)
                        });
                    }
                    index += 1;
                }
            }
        }
    }

    fn preprocess_event(&mut self, events: &mut Vec<Event>, index: usize, link_depth: usize) -> Preprocessed {
        let target = match &events[index].kind {
            EventKind::Link { target } => target.clone(),
            _ => return Preprocessed::Kept,
        };

        if events[index].disabled {
            events.remove(index);
            return Preprocessed::Removed;
        }

        if link_depth >= self.config.max_link_depth {
            self.report_error(format!(
                "Link to '{}' nested more than {} times, probably a cycle",
                target, self.config.max_link_depth
            ));
            events.remove(index);
            return Preprocessed::Removed;
        }

        let linked_events = self.external_events.get(&target).cloned();
        let mut linked_events = match linked_events {
            Some(linked_events) => linked_events,
            None => {
                self.warn(format!("Link to unknown external events '{}' removed", target));
                events.remove(index);
                return Preprocessed::Removed;
            }
        };

        log::debug!(
            "Replacing link to '{}' by {} events",
            target,
            linked_events.len()
        );
        self.preprocess_events(&mut linked_events, link_depth + 1);

        let count = linked_events.len();
        events.splice(index..index + 1, linked_events);
        Preprocessed::Replaced(count)
    }

    /// Remove disabled and non executable events, sub-events first.
    /// Walks the indices backwards so removals do not skip events.
    pub fn delete_useless_events(&self, events: &mut Vec<Event>) {
        for index in (0..events.len()).rev() {
            if events[index].can_have_sub_events() {
                self.delete_useless_events(&mut events[index].sub_events);
            }

            if !events[index].is_executable() || events[index].disabled {
                log::debug!("Removing useless event at index {}", index);
                events.remove(index);
            }
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
