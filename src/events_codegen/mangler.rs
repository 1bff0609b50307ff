// Name mangling for generated identifiers
//
// Only ASCII letters and digits survive as-is; every other character
// (underscore included) becomes `_<codepoint>_`. The closing underscore ends
// the codepoint, so two different names can never produce the same
// identifier.

use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct NameMangler {
    mangled_names: IndexMap<String, String>,
}

impl NameMangler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mangled_name(&mut self, name: &str) -> String {
        if let Some(mangled) = self.mangled_names.get(name) {
            return mangled.clone();
        }

        let mut mangled = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                mangled.push(c);
            } else {
                mangled.push('_');
                mangled.push_str(&(c as u32).to_string());
                mangled.push('_');
            }
        }

        self.mangled_names.insert(name.to_string(), mangled.clone());
        mangled
    }

    /// Identifier of the list holding the picked instances of an object
    pub fn object_list_name(&mut self, object_name: &str) -> String {
        format!("GD{}Objects", self.mangled_name(object_name))
    }
}
