// Events Code Generator - state shared by one generation pass
//
// The generator is split like the rest of this module: this file owns the
// pass state and its bookkeeping, and the codegen_*.rs files each add an
// `impl EventsCodeGenerator` block for one stage (parameters, call shapes,
// instructions, events).

use std::hash::{Hash, Hasher};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashSet, FxHasher};

use crate::events_codegen::config::GeneratorConfig;
use crate::events_codegen::context::ContextArena;
use crate::events_codegen::conventions::{CppConventions, TargetConventions};
use crate::events_codegen::diagnostics::{Diagnostic, Diagnostics};
use crate::events_codegen::event::{Event, InstructionPath, PathSegment};
use crate::events_codegen::expression::{BasicExpressionGenerator, ExpressionCodeGenerator};
use crate::events_codegen::mangler::NameMangler;
use crate::events_codegen::metadata::MetadataProvider;
use crate::events_codegen::objects::ObjectsContainer;

/// Code generated for one event, before being concatenated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBlock {
    pub scope_begin: String,
    /// Object list declarations computed from the event's context
    pub declarations: String,
    pub body: String,
    pub scope_end: String,
}

impl EventBlock {
    pub fn render(&self) -> String {
        format!(
            "\n{}\n{}\n{}\n{}\n",
            self.scope_begin, self.declarations, self.body, self.scope_end
        )
    }
}

/// Everything a pass hands back to the code emission layer
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub code: String,
    /// One block per top-level event, in event order
    pub events: Vec<EventBlock>,
    pub include_files: IndexSet<String>,
    pub error_occurred: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub max_custom_conditions_depth: usize,
    pub max_conditions_lists_size: usize,
}

pub struct EventsCodeGenerator<'a> {
    pub(super) metadata: &'a dyn MetadataProvider,
    pub(super) global_objects: &'a ObjectsContainer,
    pub(super) objects: &'a ObjectsContainer,
    pub(super) expressions: Box<dyn ExpressionCodeGenerator + 'a>,
    pub(super) conventions: Box<dyn TargetConventions + 'a>,
    pub(super) config: GeneratorConfig,
    /// Events that link events can pull in, by name
    pub(super) external_events: IndexMap<String, Vec<Event>>,

    pub(super) mangler: NameMangler,
    pub(super) contexts: ContextArena,
    pub(super) include_files: IndexSet<String>,
    pub(super) diagnostics: Diagnostics,
    /// Position of the instruction being generated, for diagnostics and ids
    pub(super) current_path: Vec<PathSegment>,

    error_occurred: bool,
    pub(super) max_custom_conditions_depth: usize,
    pub(super) max_conditions_lists_size: usize,
    events_list_next_unique_id: usize,
    instruction_unique_ids: FxHashSet<u64>,
}

impl<'a> EventsCodeGenerator<'a> {
    pub fn new(
        metadata: &'a dyn MetadataProvider,
        global_objects: &'a ObjectsContainer,
        objects: &'a ObjectsContainer,
    ) -> Self {
        EventsCodeGenerator {
            metadata,
            global_objects,
            objects,
            expressions: Box::new(BasicExpressionGenerator),
            conventions: Box::new(CppConventions),
            config: GeneratorConfig::default(),
            external_events: IndexMap::new(),
            mangler: NameMangler::new(),
            contexts: ContextArena::new(),
            include_files: IndexSet::new(),
            diagnostics: Diagnostics::new(),
            current_path: Vec::new(),
            error_occurred: false,
            max_custom_conditions_depth: 0,
            max_conditions_lists_size: 0,
            events_list_next_unique_id: 0,
            instruction_unique_ids: FxHashSet::default(),
        }
    }

    pub fn with_expression_generator(mut self, expressions: Box<dyn ExpressionCodeGenerator + 'a>) -> Self {
        self.expressions = expressions;
        self
    }

    pub fn with_conventions(mut self, conventions: Box<dyn TargetConventions + 'a>) -> Self {
        self.conventions = conventions;
        self
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_external_events(mut self, external_events: IndexMap<String, Vec<Event>>) -> Self {
        self.external_events = external_events;
        self
    }

    /// Run a whole pass: preprocessing, dead event elimination, then lowering
    /// of every event in a child of a fresh root context.
    ///
    /// The events list is rewritten in place by the first two steps.
    pub fn generate(mut self, events: &mut Vec<Event>) -> GenerationOutput {
        log::debug!("EVENTS CODEGEN: Starting pass over {} events", events.len());

        self.preprocess_event_list(events);
        self.delete_useless_events(events);

        let root = self.contexts.root();
        let blocks = self.generate_events_list_blocks(events, root);
        let code: String = blocks.iter().map(EventBlock::render).collect();

        log::debug!(
            "EVENTS CODEGEN: Generated {} bytes for {} events using {} contexts",
            code.len(),
            blocks.len(),
            self.contexts.len()
        );
        if self.error_occurred {
            log::warn!("EVENTS CODEGEN: Pass finished with errors");
        }

        GenerationOutput {
            code,
            events: blocks,
            include_files: self.include_files,
            error_occurred: self.error_occurred,
            diagnostics: self.diagnostics.into_records(),
            max_custom_conditions_depth: self.max_custom_conditions_depth,
            max_conditions_lists_size: self.max_conditions_lists_size,
        }
    }

    /// Set the pass error flag. Once set it stays set; generation goes on.
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.error_occurred = true;
        let location = self.current_instruction_path();
        self.diagnostics.error(message, Some(location));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let location = self.current_instruction_path();
        self.diagnostics.warn(message, Some(location));
    }

    pub fn error_occurred(&self) -> bool {
        self.error_occurred
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn add_include_files(&mut self, include_files: &[String]) {
        for include_file in include_files {
            if !include_file.is_empty() {
                self.include_files.insert(include_file.clone());
            }
        }
    }

    pub fn include_files(&self) -> &IndexSet<String> {
        &self.include_files
    }

    pub fn contexts(&self) -> &ContextArena {
        &self.contexts
    }

    pub fn contexts_mut(&mut self) -> &mut ContextArena {
        &mut self.contexts
    }

    pub fn conventions(&self) -> &dyn TargetConventions {
        self.conventions.as_ref()
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn max_custom_conditions_depth(&self) -> usize {
        self.max_custom_conditions_depth
    }

    pub fn max_conditions_lists_size(&self) -> usize {
        self.max_conditions_lists_size
    }

    /// Name of the variable holding the picked instances of an object
    pub fn object_list_name(&mut self, object_name: &str) -> String {
        self.mangler.object_list_name(object_name)
    }

    /// Counter-based id, unique within this pass
    pub fn generate_single_usage_unique_id_for_events_list(&mut self) -> usize {
        let id = self.events_list_next_unique_id;
        self.events_list_next_unique_id += 1;
        id
    }

    /// Id derived from the structural position of an instruction. Stable
    /// across processes for the same events; when an instruction is reached
    /// twice (through a link) the id is bumped until it is unused.
    pub fn generate_single_usage_unique_id_for(&mut self, path: &InstructionPath) -> u64 {
        let mut hasher = FxHasher::default();
        path.hash(&mut hasher);
        let mut unique_id = hasher.finish();

        while self.instruction_unique_ids.contains(&unique_id) {
            unique_id = unique_id.wrapping_add(1);
        }
        self.instruction_unique_ids.insert(unique_id);
        unique_id
    }

    pub fn current_instruction_path(&self) -> InstructionPath {
        InstructionPath::new(self.current_path.clone())
    }

    pub(super) fn with_path_segment<T>(
        &mut self,
        segment: PathSegment,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.current_path.push(segment);
        let result = f(self);
        self.current_path.pop();
        result
    }
}
