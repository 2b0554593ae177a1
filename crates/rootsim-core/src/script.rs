use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named custom install procedure from the script registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Name of the executable the procedure leaves behind.
    pub binary: String,
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub post_install: Vec<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl ScriptInfo {
    /// Replaces every `${KEY}` occurrence with the matching variable value.
    pub fn substitute(&self, command: &str) -> String {
        let mut rendered = command.to_string();
        for (key, value) in &self.variables {
            rendered = rendered.replace(&format!("${{{key}}}"), value);
        }
        rendered
    }
}
