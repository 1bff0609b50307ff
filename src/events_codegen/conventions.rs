//! Target-language conventions.
//!
//! The generator decides *what* to emit; this trait decides how it is
//! spelled in the target language. `CppConventions` produces the C++-like
//! code the runtime expects: object lists are `std::vector<RuntimeObject*>`
//! and picking conditions filter the lists in place.

use crate::events_codegen::codegen_parameters::convert_to_string;

pub trait TargetConventions {
    fn scope_begin(&self) -> String {
        "{".to_string()
    }

    fn scope_end(&self) -> String {
        "}".to_string()
    }

    fn true_literal(&self) -> String {
        "true".to_string()
    }

    fn false_literal(&self) -> String {
        "false".to_string()
    }

    fn bad_object(&self) -> String;

    fn boolean_initialization_to_false(&self, name: &str) -> String;

    /// Local alias of a boolean declared by an enclosing scope
    fn reference_to_upper_scope_boolean(&self, reference_name: &str, referenced: &str) -> String;

    fn negated_predicate(&self, predicate: &str) -> String {
        format!("!({})", predicate)
    }

    fn assign_boolean(&self, name: &str, value: bool) -> String {
        let value = if value {
            self.true_literal()
        } else {
            self.false_literal()
        };
        format!("{} = {};\n", name, value)
    }

    fn disjunction(&self, operands: &[String]) -> String {
        operands.join(" || ")
    }

    /// `body` runs only when every guard holds. Without guards the body is
    /// still put in its own block.
    fn guarded_block(&self, guards: &[String], body: &str) -> String {
        if guards.is_empty() {
            format!("{{\n{}}}", body)
        } else {
            format!("if ( {}) {{\n{}}}", guards.join(" && "), body)
        }
    }

    /// Predicate true only the first time the code at `unique_id` runs
    /// after having been false
    fn trigger_once(&self, unique_id: u64) -> String;

    /// Fresh list populated with every instance of the object
    fn object_list_declaration(&self, list_name: &str, object_name: &str) -> String;

    fn empty_object_list_declaration(&self, list_name: &str) -> String;

    /// Copy of the list declared by the parent scope under the same name
    fn object_list_copy(&self, list_name: &str, parent_list_name: &str) -> String;

    fn object_list_reuse(&self, list_name: &str) -> String {
        format!("/* Reuse {} */", list_name)
    }

    /// The instance currently iterated in `list_name`
    fn current_object_pointer(&self, list_name: &str) -> String;

    /// First instance of the first non-empty list, or the bad object
    fn first_object_pointer(&self, list_names: &[String]) -> String;

    /// Map literal from object name to (a reference to) its list
    fn objects_map(&self, lists: &[(String, String)]) -> String;

    fn object_call_prefix(&self, list_name: &str, class_name: Option<&str>, function: &str) -> String;

    fn behavior_call_prefix(
        &self,
        list_name: &str,
        behavior_name: &str,
        class_name: Option<&str>,
        function: &str,
    ) -> String;

    fn free_condition(&self, return_boolean: &str, predicate: &str) -> String {
        format!("{} = {};\n", return_boolean, predicate)
    }

    /// Keep only the instances of `list_name` satisfying `predicate`
    fn object_condition(&self, list_name: &str, predicate: &str, return_boolean: &str) -> String;

    fn free_action(&self, call: &str) -> String {
        format!("{};\n", call)
    }

    fn object_action(&self, list_name: &str, call: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CppConventions;

const OBJECT_LIST_TYPE: &str = "std::vector<RuntimeObject*>";

impl TargetConventions for CppConventions {
    fn bad_object(&self) -> String {
        "NULL".to_string()
    }

    fn boolean_initialization_to_false(&self, name: &str) -> String {
        format!("bool {} = false;\n", name)
    }

    fn reference_to_upper_scope_boolean(&self, reference_name: &str, referenced: &str) -> String {
        format!("bool & {} = {};\n", reference_name, referenced)
    }

    fn trigger_once(&self, unique_id: u64) -> String {
        format!("runtimeContext->TriggerOnce({}u)", unique_id)
    }

    fn object_list_declaration(&self, list_name: &str, object_name: &str) -> String {
        format!(
            "{} {} = runtimeContext->GetObjectsRawPointers(\"{}\");\n",
            OBJECT_LIST_TYPE,
            list_name,
            convert_to_string(object_name)
        )
    }

    fn empty_object_list_declaration(&self, list_name: &str) -> String {
        format!("{} {};\n", OBJECT_LIST_TYPE, list_name)
    }

    fn object_list_copy(&self, list_name: &str, parent_list_name: &str) -> String {
        // Both lists share a name, so go through a temporary reference
        format!(
            "{ty} & {name}T = {parent};\n{ty} {name} = {name}T;\n",
            ty = OBJECT_LIST_TYPE,
            name = list_name,
            parent = parent_list_name
        )
    }

    fn current_object_pointer(&self, list_name: &str) -> String {
        format!("{}[i]", list_name)
    }

    fn first_object_pointer(&self, list_names: &[String]) -> String {
        let mut output = String::new();
        for list_name in list_names {
            output += &format!("(!{0}.empty() ? {0}[0] : ", list_name);
        }
        output += &self.bad_object();
        output += &")".repeat(list_names.len());
        output
    }

    fn objects_map(&self, lists: &[(String, String)]) -> String {
        let entries: Vec<String> = lists
            .iter()
            .map(|(object_name, list_name)| {
                format!("{{\"{}\", &{}}}", convert_to_string(object_name), list_name)
            })
            .collect();
        format!(
            "std::map<gd::String, {}*>{{{}}}",
            OBJECT_LIST_TYPE,
            entries.join(", ")
        )
    }

    fn object_call_prefix(&self, list_name: &str, class_name: Option<&str>, function: &str) -> String {
        match class_name {
            Some(class_name) if !class_name.is_empty() => {
                format!("static_cast<{}*>({}[i])->{}", class_name, list_name, function)
            }
            _ => format!("{}[i]->{}", list_name, function),
        }
    }

    fn behavior_call_prefix(
        &self,
        list_name: &str,
        behavior_name: &str,
        class_name: Option<&str>,
        function: &str,
    ) -> String {
        let behavior = format!("{}[i]->GetBehaviorRawPointer({})", list_name, behavior_name);
        match class_name {
            Some(class_name) if !class_name.is_empty() => {
                format!("static_cast<{}*>({})->{}", class_name, behavior, function)
            }
            _ => format!("{}->{}", behavior, function),
        }
    }

    fn object_condition(&self, list_name: &str, predicate: &str, return_boolean: &str) -> String {
        format!(
            "for (std::size_t i = 0;i < {list}.size();) {{\n    if ( {predicate} ) {{\n        {ret} = true;\n        ++i;\n    }}\n    else {{\n        {list}.erase({list}.begin()+i);\n    }}\n}}\n",
            list = list_name,
            predicate = predicate,
            ret = return_boolean
        )
    }

    fn object_action(&self, list_name: &str, call: &str) -> String {
        format!(
            "for (std::size_t i = 0;i < {list}.size();++i) {{\n    {call};\n}}\n",
            list = list_name,
            call = call
        )
    }
}
