use serde::{Deserialize, Serialize};

/// Model selected when neither the config nor the user picks one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// A selectable backend model variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOption {
    /// Short handle, e.g. `"flash"`.
    pub key: String,
    /// Model identifier sent to the service, e.g. `"gemini-1.5-flash"`.
    pub model: String,
    /// Display label.
    pub label: String,
    /// Whether replies may carry a separate reasoning segment.
    #[serde(default)]
    pub reasoning: bool,
}

impl ModelOption {
    fn builtin(key: &str, model: &str, label: &str, reasoning: bool) -> Self {
        Self {
            key: key.into(),
            model: model.into(),
            label: label.into(),
            reasoning,
        }
    }
}

/// The set of models a session can target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    options: Vec<ModelOption>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelCatalog {
    pub fn builtin() -> Self {
        Self {
            options: vec![
                ModelOption::builtin("pro", "gemini-1.5-pro", "Gemini 1.5 Pro", false),
                ModelOption::builtin("flash", "gemini-1.5-flash", "Gemini 1.5 Flash", false),
                ModelOption::builtin(
                    "flash-2.0-exp",
                    "gemini-2.0-flash-exp",
                    "Gemini 2.0 Flash Experimental",
                    false,
                ),
                ModelOption::builtin(
                    "flash-thinking-exp",
                    "gemini-2.0-flash-thinking-exp",
                    "Gemini 2.0 Flash Thinking Experimental",
                    true,
                ),
            ],
        }
    }

    /// Build a catalog from configured options; an empty list yields the
    /// built-in catalog.
    pub fn from_options(options: Vec<ModelOption>) -> Self {
        if options.is_empty() {
            Self::builtin()
        } else {
            Self { options }
        }
    }

    pub fn options(&self) -> &[ModelOption] {
        &self.options
    }

    /// Find an option by key, model id, or label (case-insensitive).
    pub fn resolve(&self, name: &str) -> Option<&ModelOption> {
        let name = name.trim();
        self.options.iter().find(|o| {
            o.key.eq_ignore_ascii_case(name)
                || o.model.eq_ignore_ascii_case(name)
                || o.label.eq_ignore_ascii_case(name)
        })
    }

    /// Whether `model` denotes a reasoning variant.
    ///
    /// Catalog entries are authoritative. Ids outside the catalog count as
    /// reasoning variants when they contain `thinking`.
    pub fn is_reasoning(&self, model: &str) -> bool {
        match self.options.iter().find(|o| o.model == model) {
            Some(option) => option.reasoning,
            None => model.to_ascii_lowercase().contains("thinking"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_one_reasoning_variant() {
        let catalog = ModelCatalog::builtin();
        let reasoning: Vec<_> = catalog.options().iter().filter(|o| o.reasoning).collect();
        assert_eq!(reasoning.len(), 1);
        assert_eq!(reasoning[0].model, "gemini-2.0-flash-thinking-exp");
    }

    #[test]
    fn default_model_is_in_catalog() {
        assert!(ModelCatalog::builtin().resolve(DEFAULT_MODEL).is_some());
    }

    #[test]
    fn resolve_by_key_model_or_label() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.resolve("flash").unwrap().model, "gemini-1.5-flash");
        assert_eq!(catalog.resolve("gemini-1.5-pro").unwrap().key, "pro");
        assert_eq!(
            catalog.resolve("gemini 2.0 flash experimental").unwrap().key,
            "flash-2.0-exp"
        );
        assert!(catalog.resolve("gpt-4o").is_none());
    }

    #[test]
    fn unknown_thinking_ids_count_as_reasoning() {
        let catalog = ModelCatalog::builtin();
        assert!(catalog.is_reasoning("gemini-2.0-flash-thinking-exp"));
        assert!(catalog.is_reasoning("gemini-2.5-thinking-preview"));
        assert!(!catalog.is_reasoning("gemini-1.5-pro"));
        assert!(!catalog.is_reasoning("gemini-9-ultra"));
    }

    #[test]
    fn catalog_flag_wins_over_name() {
        let catalog = ModelCatalog::from_options(vec![ModelOption {
            key: "t".into(),
            model: "thinking-but-plain".into(),
            label: "T".into(),
            reasoning: false,
        }]);
        assert!(!catalog.is_reasoning("thinking-but-plain"));
    }

    #[test]
    fn empty_options_fall_back_to_builtin() {
        assert_eq!(ModelCatalog::from_options(Vec::new()), ModelCatalog::builtin());
    }
}
