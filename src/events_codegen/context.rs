//! Generation contexts: one scope node per lowered event.
//!
//! Contexts live in an arena owned by the generator and refer to their
//! parent by handle. A child copies the parent's bookkeeping when it is
//! created, so the parent only has to be consulted again to decide whether a
//! list can be aliased instead of copied.

use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    parent: Option<ContextId>,
    /// Lists visible from this scope that an enclosing scope already declared
    already_declared: IndexSet<String>,
    to_be_declared: IndexSet<String>,
    to_be_declared_without_picking: IndexSet<String>,
    to_be_declared_empty: IndexSet<String>,
    /// Object name -> context depth at which its list was last needed
    depth_of_last_use: IndexMap<String, usize>,
    current_object: Option<String>,
    context_depth: usize,
    custom_condition_depth: usize,
    reuse_forbidden: bool,
    reused: bool,
}

impl GenerationContext {
    pub fn parent(&self) -> Option<ContextId> {
        self.parent
    }

    pub fn context_depth(&self) -> usize {
        self.context_depth
    }

    /// True when this context aliases its parent's object lists
    pub fn is_reused(&self) -> bool {
        self.reused
    }

    // An object is in at most one of the three to-be-declared sets, so its
    // list is declared once per scope.

    /// The list of `object_name` must be declared in this scope, populated
    /// with the instances of the object (or copied from the parent when an
    /// enclosing scope already declared it). Takes over a pending
    /// declaration without picking.
    pub fn objects_list_needed(&mut self, object_name: &str) {
        if !self.to_be_declared_empty.contains(object_name) {
            self.to_be_declared_without_picking.shift_remove(object_name);
            self.to_be_declared.insert(object_name.to_string());
        }
        self.mark_used(object_name);
    }

    pub fn objects_list_without_picking_needed(&mut self, object_name: &str) {
        if !self.to_be_declared.contains(object_name)
            && !self.to_be_declared_empty.contains(object_name)
        {
            self.to_be_declared_without_picking
                .insert(object_name.to_string());
        }
        self.mark_used(object_name);
    }

    pub fn empty_objects_list_needed(&mut self, object_name: &str) {
        if !self.to_be_declared.contains(object_name)
            && !self.to_be_declared_without_picking.contains(object_name)
        {
            self.to_be_declared_empty.insert(object_name.to_string());
        }
        self.mark_used(object_name);
    }

    /// Needed as usual when an enclosing scope already picked the object,
    /// otherwise declared empty
    pub fn objects_list_needed_or_empty_if_just_declared(&mut self, object_name: &str) {
        if self.is_to_be_declared(object_name) {
            self.mark_used(object_name);
        } else if self.object_already_declared(object_name) {
            self.objects_list_needed(object_name);
        } else {
            self.empty_objects_list_needed(object_name);
        }
    }

    fn mark_used(&mut self, object_name: &str) {
        self.depth_of_last_use
            .insert(object_name.to_string(), self.context_depth);
    }

    pub fn is_to_be_declared(&self, object_name: &str) -> bool {
        self.to_be_declared.contains(object_name)
            || self.to_be_declared_without_picking.contains(object_name)
            || self.to_be_declared_empty.contains(object_name)
    }

    pub fn objects_lists_to_be_declared(&self) -> &IndexSet<String> {
        &self.to_be_declared
    }

    pub fn objects_lists_to_be_declared_without_picking(&self) -> &IndexSet<String> {
        &self.to_be_declared_without_picking
    }

    pub fn objects_lists_to_be_declared_empty(&self) -> &IndexSet<String> {
        &self.to_be_declared_empty
    }

    pub fn all_objects_to_be_declared(&self) -> IndexSet<String> {
        self.to_be_declared
            .iter()
            .chain(self.to_be_declared_without_picking.iter())
            .chain(self.to_be_declared_empty.iter())
            .cloned()
            .collect()
    }

    pub fn object_already_declared(&self, object_name: &str) -> bool {
        self.already_declared.contains(object_name)
    }

    /// Declarations are monotonic: a list declared once stays declared
    pub fn set_object_declared(&mut self, object_name: &str) {
        self.already_declared.insert(object_name.to_string());
    }

    pub fn last_depth_object_list_was_needed(&self, object_name: &str) -> Option<usize> {
        self.depth_of_last_use.get(object_name).copied()
    }

    pub fn set_current_object(&mut self, object_name: &str) {
        self.current_object = Some(object_name.to_string());
    }

    pub fn set_no_current_object(&mut self) {
        self.current_object = None;
    }

    /// Object being iterated by the instruction under expansion, empty if none
    pub fn current_object(&self) -> &str {
        self.current_object.as_deref().unwrap_or("")
    }

    pub fn enter_custom_condition(&mut self) {
        self.custom_condition_depth += 1;
    }

    pub fn leave_custom_condition(&mut self) {
        self.custom_condition_depth = self.custom_condition_depth.saturating_sub(1);
    }

    pub fn current_condition_depth(&self) -> usize {
        self.custom_condition_depth
    }

    /// Whether the last child of this context may alias its object lists
    pub fn can_reuse(&self) -> bool {
        !self.reuse_forbidden && self.parent.is_some()
    }

    /// Prevents the last child from aliasing this context's lists. Needed by
    /// code that reads the lists after its children ran.
    pub fn forbid_reuse(&mut self) {
        self.reuse_forbidden = true;
    }
}

#[derive(Debug, Default)]
pub struct ContextArena {
    contexts: Vec<GenerationContext>,
}

impl ContextArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parentless context at depth 0
    pub fn root(&mut self) -> ContextId {
        self.push(GenerationContext::default())
    }

    /// Child scope: everything the parent declared or is about to declare
    /// becomes "already declared" here, and nothing is to be declared yet
    pub fn fork(&mut self, parent: ContextId) -> ContextId {
        let parent_context = self.get(parent);

        let mut already_declared = parent_context.already_declared.clone();
        already_declared.extend(parent_context.all_objects_to_be_declared());

        let child = GenerationContext {
            parent: Some(parent),
            already_declared,
            depth_of_last_use: parent_context.depth_of_last_use.clone(),
            context_depth: parent_context.context_depth + 1,
            custom_condition_depth: parent_context.custom_condition_depth,
            ..Default::default()
        };
        self.push(child)
    }

    /// Child scope that stays at the parent's depth when the parent allows
    /// it, so lists needed again here are recognised as the parent's own
    pub fn reuse(&mut self, parent: ContextId) -> ContextId {
        let child = self.fork(parent);
        if self.get(parent).can_reuse() {
            let depth = self.get(parent).context_depth;
            let context = self.get_mut(child);
            context.context_depth = depth;
            context.reused = true;
        }
        child
    }

    fn push(&mut self, context: GenerationContext) -> ContextId {
        self.contexts.push(context);
        ContextId(self.contexts.len() - 1)
    }

    pub fn get(&self, id: ContextId) -> &GenerationContext {
        &self.contexts[id.0]
    }

    pub fn get_mut(&mut self, id: ContextId) -> &mut GenerationContext {
        &mut self.contexts[id.0]
    }

    /// Keep the last child of `id` from aliasing its lists
    pub fn forbid_reuse(&mut self, id: ContextId) {
        self.get_mut(id).forbid_reuse();
    }

    pub fn parent_of(&self, id: ContextId) -> Option<ContextId> {
        self.get(id).parent
    }

    /// Both contexts last needed the list at the same depth, so they refer
    /// to the same list and no copy is needed
    pub fn is_same_objects_list(&self, object_name: &str, id: ContextId, other: ContextId) -> bool {
        match (
            self.get(id).last_depth_object_list_was_needed(object_name),
            self.get(other).last_depth_object_list_was_needed(object_name),
        ) {
            (Some(depth), Some(other_depth)) => depth == other_depth,
            _ => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.contexts.len()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
