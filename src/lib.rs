pub mod events_codegen;
