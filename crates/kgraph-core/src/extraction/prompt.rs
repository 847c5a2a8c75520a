//! Prompt construction for the extraction model

/// Built-in system prompt describing the record format the parser expects
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are building a knowledge graph from the text below.

Extract the key concepts and how they relate. Respond with one record per
relationship, each on its own lines, in exactly this shape:

{
    "node_1": "<concept>",
    "importance_1": <0-3>,
    "node_2": "<related concept>",
    "importance_2": <0-3>,
    "edge": "<how node_1 relates to node_2>"
},

Rules:
- Importance is an integer from 0 (minor) to 3 (central).
- Use the same label every time a concept reappears.
- Put each key on its own line and close every record with "},".
- Do not add commentary outside the records."#;

/// System prompt plus the fenced context block sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    system_prompt: String,
}

impl PromptTemplate {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Append the context in a fenced block after the system prompt
    pub fn construct_final_prompt(&self, context: &str) -> String {
        format!("{}\n```\n{}\n```\n", self.system_prompt, context)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_prompt_layout() {
        let template = PromptTemplate::new("Extract.");
        assert_eq!(
            template.construct_final_prompt("Plants make sugar."),
            "Extract.\n```\nPlants make sugar.\n```\n"
        );
    }

    #[test]
    fn test_empty_context() {
        let template = PromptTemplate::new("S");
        assert_eq!(template.construct_final_prompt(""), "S\n```\n\n```\n");
    }

    #[test]
    fn test_default_prompt_names_every_field() {
        let template = PromptTemplate::default();
        for key in ["node_1", "importance_1", "node_2", "importance_2", "edge"] {
            assert!(template.system_prompt().contains(key), "missing {}", key);
        }
    }
}
