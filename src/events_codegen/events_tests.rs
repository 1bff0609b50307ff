// Event Tree Walking Tests

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use crate::events_codegen::codegen::{EventsCodeGenerator, GenerationOutput};
    use crate::events_codegen::codegen_events::{SKIPPED_ACTION, SKIPPED_CONDITION};
    use crate::events_codegen::config::GeneratorConfig;
    use crate::events_codegen::event::{Event, EventKind, Instruction, InstructionPath, PathSegment};
    use crate::events_codegen::metadata::{
        CustomCodeGenerator, InstructionMetadata, MetadataRegistry, ParameterMetadata,
    };
    use crate::events_codegen::objects::ObjectsContainer;
    use crate::events_codegen::test_utils::{platformer_metadata, platformer_objects};
    use test_log::test;

    struct Fixture {
        registry: MetadataRegistry,
        global: ObjectsContainer,
        layout: ObjectsContainer,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_registry(platformer_metadata())
        }

        fn with_registry(registry: MetadataRegistry) -> Self {
            let (global, layout) = platformer_objects();
            Fixture {
                registry,
                global,
                layout,
            }
        }

        fn generator(&self) -> EventsCodeGenerator<'_> {
            EventsCodeGenerator::new(&self.registry, &self.global, &self.layout)
        }

        fn generate(&self, events: &mut Vec<Event>) -> GenerationOutput {
            self.generator().generate(events)
        }
    }

    fn timer(seconds: &str) -> Instruction {
        Instruction::new("Timer", &[seconds, "\"t\""])
    }

    fn delete(object: &str) -> Instruction {
        Instruction::new("Delete", &[object])
    }

    fn pause() -> Instruction {
        Instruction::new("Pause", &["yes"])
    }

    fn common_events() -> IndexMap<String, Vec<Event>> {
        let mut external_events = IndexMap::new();
        external_events.insert(
            "Common".to_string(),
            vec![Event::standard(vec![], vec![pause()])],
        );
        external_events.insert(
            "Twice".to_string(),
            vec![
                Event::standard(vec![], vec![pause()]),
                Event::standard(vec![], vec![delete("Coin")]),
            ],
        );
        external_events.insert("Loop".to_string(), vec![Event::link("Loop")]);
        external_events
    }

    #[test]
    fn test_each_condition_is_guarded_by_the_previous_ones() {
        let fixture = Fixture::new();
        let mut generator = fixture.generator();
        let root = generator.contexts_mut().root();
        let context = generator.contexts_mut().fork(root);

        let conditions = vec![timer("1"), timer("2"), timer("3")];
        let code = generator.generate_conditions_list_code(&conditions, context);

        assert!(code.starts_with(
            "bool condition0IsTrue = false;\nbool condition1IsTrue = false;\nbool condition2IsTrue = false;\n"
        ));
        assert!(code.contains("{\ncondition0IsTrue = TimerElapsed(1, \"t\");\n}"));
        assert!(code.contains("if ( condition0IsTrue) {\ncondition1IsTrue = TimerElapsed(2, \"t\");\n}"));
        assert!(code.contains(
            "if ( condition0IsTrue && condition1IsTrue) {\ncondition2IsTrue = TimerElapsed(3, \"t\");\n}"
        ));
        assert_eq!(generator.max_conditions_lists_size(), 3);
    }

    #[test]
    fn test_empty_condition_is_skipped_without_flag() {
        let fixture = Fixture::new();
        let mut generator = fixture.generator();
        let root = generator.contexts_mut().root();
        let context = generator.contexts_mut().fork(root);

        let conditions = vec![timer("1"), Instruction::new("", &[]), timer("3")];
        let code = generator.generate_conditions_list_code(&conditions, context);

        assert!(code.contains(SKIPPED_CONDITION));
        assert!(!code.contains("condition2IsTrue"));
        assert!(code.contains("if ( condition0IsTrue) {\ncondition1IsTrue = TimerElapsed(3, \"t\");\n}"));
    }

    #[test]
    fn test_actions_are_isolated() {
        let fixture = Fixture::new();
        let mut generator = fixture.generator();
        let root = generator.contexts_mut().root();
        let context = generator.contexts_mut().fork(root);

        let actions = vec![pause(), Instruction::new("", &[]), Instruction::new("Shake", &["2"])];
        let code = generator.generate_actions_list_code(&actions, context);

        assert_eq!(
            code,
            format!("{{PauseScene(true);\n}}{{{}}}{{ShakeCamera(2);\n}}", SKIPPED_ACTION)
        );
    }

    #[test]
    fn test_single_event_pass() {
        let fixture = Fixture::new();
        let mut events = vec![Event::standard(
            vec![Instruction::new("PosX", &["Player", ">", "10"])],
            vec![delete("Player")],
        )];

        let output = fixture.generate(&mut events);

        assert!(!output.error_occurred);
        assert_eq!(output.events.len(), 1);
        let block = &output.events[0];
        assert_eq!(block.scope_begin, "{");
        assert_eq!(block.scope_end, "}");
        assert_eq!(
            block.declarations,
            "std::vector<RuntimeObject*> GDPlayerObjects = runtimeContext->GetObjectsRawPointers(\"Player\");\n\n"
        );
        assert!(block.body.starts_with("bool condition0IsTrue = false;\n"));
        assert!(block.body.contains("if ( condition0IsTrue) {\n{for (std::size_t i = 0;i < GDPlayerObjects.size();++i)"));
        assert_eq!(output.code, block.render());
        assert!(output.include_files.contains("SpriteObject.h"));
    }

    #[test]
    fn test_events_are_concatenated_in_order() {
        let fixture = Fixture::new();
        let mut events = vec![
            Event::standard(vec![], vec![Instruction::new("Shake", &["1"])]),
            Event::standard(vec![], vec![Instruction::new("Shake", &["2"])]),
            Event::standard(vec![], vec![Instruction::new("Shake", &["3"])]),
        ];

        let output = fixture.generate(&mut events);

        let first = output.code.find("ShakeCamera(1)").unwrap();
        let second = output.code.find("ShakeCamera(2)").unwrap();
        let third = output.code.find("ShakeCamera(3)").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_only_last_sub_event_reuses_parent_lists() {
        let fixture = Fixture::new();
        let mut events = vec![Event::standard(
            vec![Instruction::new("Visible", &["Player"])],
            vec![],
        )
        .with_sub_events(vec![
            Event::standard(vec![], vec![delete("Player")]),
            Event::standard(vec![], vec![delete("Player")]),
            Event::standard(vec![], vec![delete("Player")]),
        ])];

        let output = fixture.generate(&mut events);
        let code = &output.code;

        assert_eq!(
            code.matches("std::vector<RuntimeObject*> & GDPlayerObjectsT = GDPlayerObjects;\n")
                .count(),
            2
        );
        assert_eq!(code.matches("/* Reuse GDPlayerObjects */").count(), 1);
        // The reused list comes last
        assert!(code.rfind("GDPlayerObjectsT").unwrap() < code.find("/* Reuse").unwrap());
        assert!(!output.error_occurred);
    }

    #[test]
    fn test_top_level_events_never_reuse() {
        let fixture = Fixture::new();
        let mut events = vec![
            Event::standard(vec![], vec![delete("Player")]),
            Event::standard(vec![], vec![delete("Player")]),
        ];

        let output = fixture.generate(&mut events);

        assert!(!output.code.contains("/* Reuse"));
        assert_eq!(
            output
                .code
                .matches("GDPlayerObjects = runtimeContext->GetObjectsRawPointers(\"Player\")")
                .count(),
            2
        );
    }

    #[test]
    fn test_sub_event_not_using_parent_list_declares_its_own() {
        let fixture = Fixture::new();
        let mut events = vec![Event::standard(vec![], vec![delete("Player")])
            .with_sub_events(vec![Event::standard(vec![], vec![delete("Enemy")])])];

        let output = fixture.generate(&mut events);

        assert!(output
            .code
            .contains("GDEnemyObjects = runtimeContext->GetObjectsRawPointers(\"Enemy\")"));
        assert!(!output.code.contains("/* Reuse"));
    }

    #[test]
    fn test_forbidden_reuse_copies_lists() {
        let mut registry = platformer_metadata();
        registry.add_action(
            "Capture",
            InstructionMetadata::new("").with_custom_code_generator(CustomCodeGenerator::new(
                |_, generator, context| {
                    generator.contexts_mut().forbid_reuse(context);
                    "capture();\n".to_string()
                },
            )),
        );
        let fixture = Fixture::with_registry(registry);
        let mut events = vec![Event::standard(
            vec![Instruction::new("Visible", &["Player"])],
            vec![Instruction::new("Capture", &[])],
        )
        .with_sub_events(vec![Event::standard(vec![], vec![delete("Player")])])];

        let output = fixture.generate(&mut events);

        assert!(output.code.contains("capture();"));
        assert!(!output.code.contains("/* Reuse"));
        assert!(output
            .code
            .contains("std::vector<RuntimeObject*> & GDPlayerObjectsT = GDPlayerObjects;\n"));
    }

    #[test]
    fn test_list_needed_two_ways_is_declared_once() {
        let mut registry = platformer_metadata();
        registry.add_action(
            "Spawn",
            InstructionMetadata::new("SpawnAt")
                .with_parameter(ParameterMetadata::new("objectListOrEmptyWithoutPicking"))
                .with_parameter(ParameterMetadata::new("expression")),
        );
        let fixture = Fixture::with_registry(registry);
        let mut events = vec![Event::standard(
            vec![],
            vec![
                Instruction::new("Spawn", &["Coin", "3"]),
                delete("Coin"),
            ],
        )];

        let output = fixture.generate(&mut events);

        assert!(!output.error_occurred);
        assert_eq!(
            output.events[0].declarations,
            "std::vector<RuntimeObject*> GDCoinObjects = runtimeContext->GetObjectsRawPointers(\"Coin\");\n\n"
        );
        assert!(!output.code.contains("GDCoinObjectsT"));
    }

    #[test]
    fn test_sub_events_scope_is_configurable() {
        let fixture = Fixture::new();
        let make_events = || {
            vec![Event::standard(vec![], vec![])
                .with_sub_events(vec![Event::standard(vec![], vec![pause()])])]
        };

        let scoped = fixture.generate(&mut make_events());
        let config = GeneratorConfig {
            sub_events_in_scope: false,
            ..Default::default()
        };
        let unscoped = fixture.generator().with_config(config).generate(&mut make_events());

        assert_eq!(
            scoped.code.matches('{').count(),
            unscoped.code.matches('{').count() + 1
        );
    }

    #[test]
    fn test_group_runs_only_sub_events() {
        let fixture = Fixture::new();
        let mut events = vec![Event::group(
            "Enemies",
            vec![Event::standard(vec![timer("1")], vec![delete("Enemy")])],
        )];

        let output = fixture.generate(&mut events);

        assert_eq!(output.events.len(), 1);
        assert_eq!(output.events[0].declarations, "");
        assert!(output.code.contains("GDEnemyObjects[i]->DeleteFromScene()"));
        assert_eq!(output.code.matches("bool condition0IsTrue").count(), 1);
    }

    #[test]
    fn test_preprocessing_continues_after_removed_event() {
        let fixture = Fixture::new();
        let mut generator = fixture.generator().with_external_events(common_events());

        let mut events = vec![
            Event::standard(vec![], vec![pause()]),
            Event::standard(vec![], vec![pause()]),
            Event::link("Missing"),
            Event::standard(vec![], vec![]).with_sub_events(vec![Event::link("Common")]),
            Event::standard(vec![], vec![]).with_sub_events(vec![Event::link("Common")]),
        ];
        generator.preprocess_event_list(&mut events);

        assert_eq!(events.len(), 4);
        for event in &events[2..] {
            assert_eq!(event.sub_events.len(), 1);
            assert_eq!(event.sub_events[0].kind, EventKind::Standard);
            assert_eq!(event.sub_events[0].actions, vec![pause()]);
        }
        assert_eq!(generator.diagnostics().len(), 1);
        assert!(!generator.error_occurred());
    }

    #[test]
    fn test_link_is_replaced_by_all_linked_events() {
        let fixture = Fixture::new();
        let mut generator = fixture.generator().with_external_events(common_events());

        let mut events = vec![
            Event::link("Twice"),
            Event::link("Common"),
            Event::link("Common").disabled(),
        ];
        generator.preprocess_event_list(&mut events);

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].actions, vec![pause()]);
        assert_eq!(events[1].actions, vec![delete("Coin")]);
        assert_eq!(events[2].actions, vec![pause()]);
        assert!(events.iter().all(|e| e.kind == EventKind::Standard));
    }

    #[test]
    fn test_link_cycle_is_bounded() {
        let fixture = Fixture::new();
        let config = GeneratorConfig {
            max_link_depth: 3,
            ..Default::default()
        };
        let mut events = vec![Event::link("Loop"), Event::standard(vec![], vec![pause()])];

        let output = fixture
            .generator()
            .with_config(config)
            .with_external_events(common_events())
            .generate(&mut events);

        assert!(output.error_occurred);
        assert_eq!(events.len(), 1);
        assert_eq!(output.events.len(), 1);
        assert!(output.code.contains("PauseScene(true);"));
    }

    #[test]
    fn test_useless_events_are_deleted() {
        let fixture = Fixture::new();
        let generator = fixture.generator();

        let mut events = vec![
            Event::comment("Setup"),
            Event::standard(vec![], vec![pause()]).disabled(),
            Event::standard(vec![], vec![]).with_sub_events(vec![
                Event::comment("nested"),
                Event::standard(vec![], vec![pause()]),
            ]),
            Event::group("Empty", vec![Event::standard(vec![], vec![]).disabled()]),
        ];
        generator.delete_useless_events(&mut events);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sub_events, vec![Event::standard(vec![], vec![pause()])]);
        assert!(matches!(events[1].kind, EventKind::Group { .. }));
        assert!(events[1].sub_events.is_empty());
    }

    #[test]
    fn test_disabled_and_comment_events_produce_no_block() {
        let fixture = Fixture::new();
        let mut events = vec![
            Event::comment("Nothing to see"),
            Event::standard(vec![], vec![pause()]).disabled(),
            Event::standard(vec![], vec![Instruction::new("Shake", &["1"])]),
        ];

        let output = fixture.generate(&mut events);

        assert_eq!(output.events.len(), 1);
        assert!(!output.code.contains("PauseScene"));
    }

    #[test]
    fn test_unique_ids() {
        let fixture = Fixture::new();
        let mut generator = fixture.generator();

        assert_eq!(generator.generate_single_usage_unique_id_for_events_list(), 0);
        assert_eq!(generator.generate_single_usage_unique_id_for_events_list(), 1);

        let path = InstructionPath::new(vec![PathSegment::Event(0), PathSegment::Condition(1)]);
        let first = generator.generate_single_usage_unique_id_for(&path);
        let second = generator.generate_single_usage_unique_id_for(&path);
        assert_ne!(first, second);

        // Same path in another pass gives the same id
        let mut other = fixture.generator();
        assert_eq!(other.generate_single_usage_unique_id_for(&path), first);
    }

    #[test]
    fn test_diagnostics_carry_instruction_path() {
        let fixture = Fixture::new();
        let mut events = vec![
            Event::standard(vec![], vec![]),
            Event::standard(vec![], vec![]).with_sub_events(vec![Event::standard(
                vec![],
                vec![pause(), Instruction::new("SetX", &["Player", "%", "1"])],
            )]),
        ];

        let output = fixture.generate(&mut events);

        assert_eq!(output.diagnostics.len(), 1);
        let location = output.diagnostics[0].location.as_ref().unwrap();
        assert_eq!(location.to_string(), "event[1]/event[0]/action[1]");
    }
}
