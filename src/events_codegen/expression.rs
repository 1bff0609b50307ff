// Expression sub-generator seam
//
// Number, string and variable parameters are compiled by an external
// expression compiler. `BasicExpressionGenerator` is the deterministic
// stand-in used by the driver and the tests: it trusts the expression text
// and only maps variables to runtime lookups.

use crate::events_codegen::codegen_parameters::convert_to_string_explicit;

pub trait ExpressionCodeGenerator {
    /// Compile one expression. `kind` is `number`, `string` or the variable
    /// parameter type; `scoping_hint` is the last object named before the
    /// parameter (used by object variables).
    fn compile(&self, kind: &str, expression: &str, scoping_hint: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicExpressionGenerator;

impl ExpressionCodeGenerator for BasicExpressionGenerator {
    fn compile(&self, kind: &str, expression: &str, scoping_hint: &str) -> String {
        let expression = expression.trim();
        match kind {
            "number" if expression.is_empty() => "0".to_string(),
            "string" if expression.is_empty() => "\"\"".to_string(),
            "number" | "string" => expression.to_string(),
            "scenevar" => format!(
                "runtimeContext->GetSceneVariables().Get({})",
                convert_to_string_explicit(expression)
            ),
            "globalvar" => format!(
                "runtimeContext->GetGlobalVariables().Get({})",
                convert_to_string_explicit(expression)
            ),
            "objectvar" => format!(
                "runtimeContext->GetObjectVariables({}).Get({})",
                convert_to_string_explicit(scoping_hint),
                convert_to_string_explicit(expression)
            ),
            _ => {
                log::debug!("No expression rule for kind '{}', emitting literal", kind);
                convert_to_string_explicit(expression)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_expressions_get_neutral_values() {
        let expressions = BasicExpressionGenerator;
        assert_eq!(expressions.compile("number", "  ", ""), "0");
        assert_eq!(expressions.compile("string", "", ""), "\"\"");
    }

    #[test]
    fn test_object_variable_uses_scoping_hint() {
        let expressions = BasicExpressionGenerator;
        assert_eq!(
            expressions.compile("objectvar", "Lives", "Player"),
            "runtimeContext->GetObjectVariables(\"Player\").Get(\"Lives\")"
        );
    }
}
