// Events Code Generator Error Handling

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CodeGenError {
    // Schema errors, local to one call site
    MissingOperand(String, String), // operator parameter type, call name
    UnknownMutator(String, String), // operator literal, call name
    MissingGetter(String),          // call name

    // Pass setup errors
    ConfigError(String),
    IOError(String),
}

impl fmt::Display for CodeGenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodeGenError::MissingOperand(parameter_type, call) => {
                write!(
                    f,
                    "Schema of '{}' has no parameter after its '{}' parameter",
                    call, parameter_type
                )
            }
            CodeGenError::UnknownMutator(operator, call) => {
                write!(f, "No mutator registered for '{}' in '{}'", operator, call)
            }
            CodeGenError::MissingGetter(call) => {
                write!(f, "Operator call '{}' needs a getter but none is declared", call)
            }
            CodeGenError::ConfigError(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            CodeGenError::IOError(msg) => {
                write!(f, "IO error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CodeGenError {}

impl From<std::io::Error> for CodeGenError {
    fn from(err: std::io::Error) -> Self {
        CodeGenError::IOError(err.to_string())
    }
}

impl From<toml::de::Error> for CodeGenError {
    fn from(err: toml::de::Error) -> Self {
        CodeGenError::ConfigError(err.to_string())
    }
}
