// Shared fixtures for the generator tests: a small platformer layout

use crate::events_codegen::metadata::{
    AccessKind, BehaviorMetadata, InstructionMetadata, InstructionShape, MetadataRegistry,
    ObjectMetadata, ParameterMetadata, ValueKind,
};
use crate::events_codegen::objects::{ObjectDefinition, ObjectsContainer};

pub const PLATFORMER_BEHAVIOR: &str = "Platformer::PlatformerObjectBehavior";

fn object_shape() -> InstructionShape {
    InstructionShape::Object {
        required_capability: String::new(),
    }
}

fn parameter(parameter_type: &str) -> ParameterMetadata {
    ParameterMetadata::new(parameter_type)
}

/// (global, layout) containers.
///
/// Layout: Player and Enemy sprites (Player has the platformer behavior),
/// Coin sprite, `Movers` = [Player, Enemy], `Ghosts` = [Player, Phantom]
/// where Phantom does not exist. Global: Score text, `Everything` group.
pub fn platformer_objects() -> (ObjectsContainer, ObjectsContainer) {
    let mut global = ObjectsContainer::new();
    global.insert_object("Score", ObjectDefinition::new("TextObject"));
    global.insert_group("Everything", &["Player", "Enemy", "Score"]);

    let mut layout = ObjectsContainer::new();
    layout.insert_object(
        "Player",
        ObjectDefinition::new("Sprite").with_behavior("PlatformerObject", PLATFORMER_BEHAVIOR),
    );
    layout.insert_object("Enemy", ObjectDefinition::new("Sprite"));
    layout.insert_object("Coin", ObjectDefinition::new("Sprite"));
    layout.insert_group("Movers", &["Player", "Enemy"]);
    layout.insert_group("Ghosts", &["Player", "Phantom"]);

    (global, layout)
}

pub fn platformer_metadata() -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();

    registry.add_object(
        "Sprite",
        ObjectMetadata {
            class_name: "SpriteObject".to_string(),
            include_files: vec!["SpriteObject.h".to_string()],
            unsupported_base_object_capabilities: Vec::new(),
        },
    );
    registry.add_object(
        "TextObject",
        ObjectMetadata {
            class_name: "TextObject".to_string(),
            include_files: vec!["TextObject.h".to_string()],
            unsupported_base_object_capabilities: vec!["effect".to_string()],
        },
    );
    registry.add_behavior(
        PLATFORMER_BEHAVIOR,
        BehaviorMetadata {
            class_name: "PlatformerObjectRuntimeBehavior".to_string(),
            include_files: vec!["PlatformerObject.h".to_string()],
        },
    );

    registry.add_condition(
        "PosX",
        InstructionMetadata::new("GetX")
            .with_shape(object_shape())
            .with_parameter(parameter("object"))
            .with_parameter(parameter("relationalOperator"))
            .with_parameter(parameter("expression"))
            .with_value(ValueKind::Number, AccessKind::AccessorOnly),
    );
    registry.add_condition(
        "Visible",
        InstructionMetadata::new("IsVisible")
            .with_shape(object_shape())
            .with_parameter(parameter("object")),
    );
    registry.add_condition(
        "SpriteVisible",
        InstructionMetadata::new("IsVisible")
            .with_shape(object_shape())
            .with_parameter(parameter("object").with_supplementary_information("Sprite")),
    );
    registry.add_condition(
        "HasEffect",
        InstructionMetadata::new("HasEffect")
            .with_shape(InstructionShape::Object {
                required_capability: "effect".to_string(),
            })
            .with_parameter(parameter("object"))
            .with_parameter(parameter("string")),
    );
    registry.add_condition(
        "Timer",
        InstructionMetadata::new("TimerElapsed")
            .with_parameter(parameter("expression"))
            .with_parameter(parameter("string")),
    );
    registry.add_condition(
        "VarScene",
        InstructionMetadata::new("GetVariableValue")
            .with_parameter(parameter("scenevar"))
            .with_parameter(parameter("relationalOperator"))
            .with_parameter(parameter("expression"))
            .with_value(ValueKind::Number, AccessKind::AccessorOnly),
    );
    registry.add_condition(
        "IsJumping",
        InstructionMetadata::new("IsJumping")
            .with_shape(InstructionShape::Behavior)
            .with_parameter(parameter("object"))
            .with_parameter(parameter("behavior")),
    );
    registry.add_condition(
        "Collision",
        InstructionMetadata::new("CollisionBetween")
            .with_parameter(parameter("objectList"))
            .with_parameter(parameter("objectList"))
            .with_parameter(parameter("conditionInverted"))
            .with_include_file("Collisions.h"),
    );

    registry.add_action(
        "SetX",
        InstructionMetadata::new("SetX")
            .with_shape(object_shape())
            .with_parameter(parameter("object"))
            .with_parameter(parameter("operator"))
            .with_parameter(parameter("expression"))
            .with_value(ValueKind::Number, AccessKind::MutatorAndOrAccessor)
            .with_getter("GetX"),
    );
    registry.add_action(
        "ModVarScene",
        InstructionMetadata::new("GetVariable")
            .with_parameter(parameter("scenevar"))
            .with_parameter(parameter("operator"))
            .with_parameter(parameter("expression"))
            .with_value(ValueKind::Number, AccessKind::AccessorOnly),
    );
    registry.add_action(
        "SimulateJump",
        InstructionMetadata::new("SimulateJumpKey")
            .with_shape(InstructionShape::Behavior)
            .with_parameter(parameter("object"))
            .with_parameter(parameter("behavior")),
    );
    registry.add_action(
        "JumpSpeed",
        InstructionMetadata::new("GetJumpSpeed")
            .with_shape(InstructionShape::Behavior)
            .with_parameter(parameter("object"))
            .with_parameter(parameter("behavior"))
            .with_parameter(parameter("operator"))
            .with_parameter(parameter("expression"))
            .with_value(ValueKind::Number, AccessKind::MutatorsOnly)
            .with_mutator("=", "SetJumpSpeed")
            .with_mutator("+", "IncreaseJumpSpeed"),
    );
    registry.add_action(
        "Create",
        InstructionMetadata::new("CreateObjectOnScene")
            .with_parameter(parameter("objectListOrEmptyIfJustDeclared"))
            .with_parameter(parameter("expression"))
            .with_parameter(parameter("expression")),
    );
    registry.add_action(
        "Delete",
        InstructionMetadata::new("DeleteFromScene")
            .with_shape(object_shape())
            .with_parameter(parameter("object")),
    );
    registry.add_action(
        "Shake",
        InstructionMetadata::new("ShakeCamera")
            .with_parameter(parameter("expression").optional_with_default("0.5"))
            .with_include_file("Camera.h"),
    );
    registry.add_action(
        "Pause",
        InstructionMetadata::new("PauseScene").with_parameter(parameter("yesorno")),
    );
    registry.add_action(
        "Broken",
        InstructionMetadata::new("Broken")
            .with_parameter(parameter("expression"))
            .with_parameter(parameter("operator"))
            .with_value(ValueKind::Number, AccessKind::AccessorOnly),
    );

    registry
}
