//! Prompt templates for plotrag.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub answer: AnswerPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt used to synthesize a grounded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    pub user: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            user: r#"You are a movie plot reasoning assistant.

Use ONLY the following context:

{{context}}

Question: {{question}}

Respond STRICTLY in JSON only:
{
  "answer": "...",
  "reasoning": "..."
}"#
            .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts with an optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let answer_path = custom_path.join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// The template is scanned once, left to right. Substituted values are
    /// never rescanned, and unknown placeholders are kept as written.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => match vars.get(&after[..end]) {
                    Some(value) => {
                        result.push_str(value);
                        rest = &after[end + 2..];
                    }
                    None => {
                        result.push('{');
                        rest = &rest[start + 1..];
                    }
                },
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_answer_prompt_has_placeholders() {
        let prompts = Prompts::default();
        assert!(prompts.answer.user.contains("{{context}}"));
        assert!(prompts.answer.user.contains("{{question}}"));
        assert!(prompts.answer.user.contains("Use ONLY the following context"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let template = "Context: {{context}}\nQuestion: {{question}}";
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), "Title: Heat".to_string());
        vars.insert("question".to_string(), "what does {{context}} mean?".to_string());

        for _ in 0..50 {
            assert_eq!(
                Prompts::render(template, &vars),
                "Context: Title: Heat\nQuestion: what does {{context}} mean?"
            );
        }
    }

    #[test]
    fn test_render_keeps_unknown_and_unclosed_placeholders() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Rick".to_string());

        assert_eq!(Prompts::render("{{who}} is {{name}}", &vars), "{{who}} is Rick");
        assert_eq!(Prompts::render("{{{name}}}", &vars), "{Rick}");
        assert_eq!(Prompts::render("{{name}} and {{name", &vars), "Rick and {{name");
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut custom = HashMap::new();
        custom.insert("question".to_string(), "from config".to_string());
        custom.insert("persona".to_string(), "a film critic".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "from caller".to_string());

        let rendered = prompts.render_with_custom("{{persona}}: {{question}}", &vars);
        assert_eq!(rendered, "a film critic: from caller");
    }

    #[test]
    fn test_load_custom_answer_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("answer.toml"),
            "user = \"Context: {{context}} Q: {{question}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.answer.user, "Context: {{context}} Q: {{question}}");
    }
}
