// Events Code Generator Module
// Lowers event sheets (conditions, actions, sub-events) into target code

pub mod builtins;
pub mod codegen;
pub mod codegen_calls;
pub mod codegen_events;
pub mod codegen_instructions;
pub mod codegen_parameters;
pub mod config;
pub mod context;
pub mod conventions;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod expression;
pub mod mangler;
pub mod metadata;
pub mod objects;
pub mod parameter_types;

#[cfg(test)]
mod test_utils;

pub use codegen::{EventsCodeGenerator, GenerationOutput};
pub use config::{GeneratorConfig, ProjectDocument};
pub use error::CodeGenError;

/// Runs whole passes over project documents, with the common instructions
/// available next to the project's own metadata
pub struct EventsCompiler {
    register_builtins: bool,
}

impl Default for EventsCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventsCompiler {
    pub fn new() -> Self {
        EventsCompiler {
            register_builtins: true,
        }
    }

    /// Only use the metadata of the document
    pub fn without_builtins(mut self) -> Self {
        self.register_builtins = false;
        self
    }

    /// Generate the code of the document's events. The document is left
    /// untouched: preprocessing works on a copy of the events.
    pub fn compile(&self, document: &ProjectDocument) -> GenerationOutput {
        let mut metadata = document.metadata.clone();
        if self.register_builtins {
            builtins::register_common_instructions(&mut metadata);
        }

        let mut events = document.events.clone();
        let generator = EventsCodeGenerator::new(
            &metadata,
            &document.global_objects,
            &document.layout_objects,
        )
        .with_config(document.generator.clone())
        .with_external_events(document.external_events.clone());

        generator.generate(&mut events)
    }
}
