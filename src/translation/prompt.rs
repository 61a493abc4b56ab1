use serde::{Deserialize, Serialize};

use super::language::language_name;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a professional translation assistant. Provide accurate, natural translations.";

pub const DEFAULT_USER_TEMPLATE: &str = "Translate the following {sourceLang} text into {targetLang}:\n\n\
     Source: {text}\n\n\
     Requirements:\n\
     1. Preserve the original meaning accurately\n\
     2. Use natural, fluent phrasing\n\
     3. Leave already-substituted proper nouns and terms unchanged\n\
     4. Return only the translation, without any explanation";

/// A caller-supplied prompt pair.
///
/// The user template may contain `{sourceLang}`, `{targetLang}` and `{text}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            user: DEFAULT_USER_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_prompt(
    text: &str,
    source_lang: &str,
    target_lang: &str,
    template: Option<&PromptTemplate>,
) -> Prompt {
    let default_template;
    let template = if let Some(t) = template {
        t
    } else {
        default_template = PromptTemplate::default();
        &default_template
    };

    // Placeholders, not format arguments. `{text}` goes last so the text
    // itself is never scanned for placeholders.
    let user = template
        .user
        .replacen("{sourceLang}", language_name(source_lang), 1)
        .replacen("{targetLang}", language_name(target_lang), 1)
        .replacen("{text}", text, 1);

    Prompt {
        system: template.system.clone(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt() {
        let prompt = build_prompt("こんにちは", "ja", "zh", None);
        assert_eq!(prompt.system, DEFAULT_SYSTEM_PROMPT);
        assert!(prompt.user.contains("Japanese text into Chinese (Simplified)"));
        assert!(prompt.user.contains("Source: こんにちは"));
        assert!(prompt.user.contains("4. Return only the translation"));
        assert!(!prompt.user.contains('{'));
    }

    #[test]
    fn test_custom_template() {
        let template = PromptTemplate {
            system: "You translate business mail.".to_string(),
            user: "{sourceLang} -> {targetLang}: {text}".to_string(),
        };
        let prompt = build_prompt("hello", "en", "ja", Some(&template));
        assert_eq!(prompt.system, "You translate business mail.");
        assert_eq!(prompt.user, "English -> Japanese: hello");
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        let template = PromptTemplate {
            system: String::new(),
            user: "{sourceLang}|{targetLang}".to_string(),
        };
        let prompt = build_prompt("x", "tlh", "en", Some(&template));
        assert_eq!(prompt.user, "tlh|English");
    }

    #[test]
    fn test_text_is_not_scanned_for_placeholders() {
        let template = PromptTemplate {
            system: String::new(),
            user: "{text} ({targetLang})".to_string(),
        };
        let prompt = build_prompt("literal {sourceLang}", "en", "ja", Some(&template));
        assert_eq!(prompt.user, "literal {sourceLang} (Japanese)");
    }

    #[test]
    fn test_only_first_placeholder_occurrence_replaced() {
        let template = PromptTemplate {
            system: String::new(),
            user: "{targetLang} {targetLang}".to_string(),
        };
        let prompt = build_prompt("x", "en", "ja", Some(&template));
        assert_eq!(prompt.user, "Japanese {targetLang}");
    }
}
