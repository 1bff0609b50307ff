//! Closed taxonomy of instruction parameter types.
//!
//! Parameter types are plain strings in the metadata. `ParameterKind::classify`
//! folds them into the kinds the parameter code generator dispatches on; the
//! order of the checks is the precedence order (first match wins).

/// Parameter types compiled as number expressions
const NUMBER_EXPRESSION_TYPES: &[&str] = &["number", "expression", "camera", "forceMultiplier"];

/// Parameter types compiled as string expressions
const STRING_EXPRESSION_TYPES: &[&str] = &[
    "string",
    "layer",
    "color",
    "file",
    "joyaxis",
    "stringWithSelector",
    "sceneName",
    "layerEffectName",
    "layerEffectParameterName",
    "objectEffectName",
    "objectEffectParameterName",
    "objectPointName",
    "objectAnimationName",
    "functionParameterName",
    "externalLayoutName",
    "leaderboardId",
    "identifier",
];

/// Parameter types compiled as variable references
const VARIABLE_EXPRESSION_TYPES: &[&str] = &["objectvar", "globalvar", "scenevar"];

const OBJECT_TYPES: &[&str] = &[
    "object",
    "objectPtr",
    "objectList",
    "objectListOrEmptyIfJustDeclared",
    "objectListOrEmptyWithoutPicking",
];

// Emitted verbatim as escaped string literals. The last four are legacy names.
const VERBATIM_STRING_TYPES: &[&str] = &[
    "key",
    "mouse",
    "audioResource",
    "bitmapFontResource",
    "fontResource",
    "imageResource",
    "jsonResource",
    "videoResource",
    "password",
    "musicfile",
    "soundfile",
    "police",
];

pub const RELATIONAL_OPERATOR: &str = "relationalOperator";
pub const OPERATOR: &str = "operator";
pub const CONDITION_INVERTED: &str = "conditionInverted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    Number,
    String,
    Variable,
}

impl ExpressionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionKind::Number => "number",
            ExpressionKind::String => "string",
            ExpressionKind::Variable => "variable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Expression(ExpressionKind),
    Object,
    RelationalOperator,
    Operator,
    Behavior,
    VerbatimString,
    YesOrNo,
    TrueOrFalse,
    InlineCode,
    /// Anything else: resolved through the caller's type overrides, or
    /// emitted as a string literal with a warning
    Other,
}

impl ParameterKind {
    pub fn classify(parameter_type: &str) -> ParameterKind {
        if is_expression(ExpressionKind::Number, parameter_type) {
            ParameterKind::Expression(ExpressionKind::Number)
        } else if is_expression(ExpressionKind::String, parameter_type) {
            ParameterKind::Expression(ExpressionKind::String)
        } else if is_expression(ExpressionKind::Variable, parameter_type) {
            ParameterKind::Expression(ExpressionKind::Variable)
        } else if is_object(parameter_type) {
            ParameterKind::Object
        } else if parameter_type == RELATIONAL_OPERATOR {
            ParameterKind::RelationalOperator
        } else if parameter_type == OPERATOR {
            ParameterKind::Operator
        } else if is_behavior(parameter_type) {
            ParameterKind::Behavior
        } else if VERBATIM_STRING_TYPES.contains(&parameter_type) {
            ParameterKind::VerbatimString
        } else if parameter_type == "yesorno" {
            ParameterKind::YesOrNo
        } else if parameter_type == "trueorfalse" {
            ParameterKind::TrueOrFalse
        } else if parameter_type == "inlineCode" {
            ParameterKind::InlineCode
        } else {
            ParameterKind::Other
        }
    }
}

pub fn is_object(parameter_type: &str) -> bool {
    OBJECT_TYPES.contains(&parameter_type)
}

pub fn is_behavior(parameter_type: &str) -> bool {
    parameter_type == "behavior"
}

pub fn is_expression(kind: ExpressionKind, parameter_type: &str) -> bool {
    match kind {
        ExpressionKind::Number => NUMBER_EXPRESSION_TYPES.contains(&parameter_type),
        ExpressionKind::String => STRING_EXPRESSION_TYPES.contains(&parameter_type),
        ExpressionKind::Variable => VARIABLE_EXPRESSION_TYPES.contains(&parameter_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_expression_families() {
        assert_eq!(
            ParameterKind::classify("expression"),
            ParameterKind::Expression(ExpressionKind::Number)
        );
        assert_eq!(
            ParameterKind::classify("layer"),
            ParameterKind::Expression(ExpressionKind::String)
        );
        assert_eq!(
            ParameterKind::classify("scenevar"),
            ParameterKind::Expression(ExpressionKind::Variable)
        );
    }

    #[test]
    fn test_classify_references_and_literals() {
        assert_eq!(ParameterKind::classify("objectPtr"), ParameterKind::Object);
        assert_eq!(ParameterKind::classify("behavior"), ParameterKind::Behavior);
        assert_eq!(ParameterKind::classify("soundfile"), ParameterKind::VerbatimString);
        assert_eq!(ParameterKind::classify("mouse"), ParameterKind::VerbatimString);
        assert_eq!(ParameterKind::classify("inlineCode"), ParameterKind::InlineCode);
        assert_eq!(ParameterKind::classify("conditionInverted"), ParameterKind::Other);
        assert_eq!(ParameterKind::classify(""), ParameterKind::Other);
    }
}
