//! Language codes, display names, and script-based language detection.

use anyhow::Result;

use crate::ui::Style;

/// Tag meaning "detect the source language from the text".
pub const AUTO: &str = "auto";

/// Tag returned by [`detect_language`] when no known script is present.
pub const UNKNOWN: &str = "unknown";

/// Language assumed when detection yields [`UNKNOWN`].
pub const FALLBACK_LANGUAGE: &str = "en";

/// Supported language codes (ISO 639-1) and their names.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("de", "German"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("hi", "Hindi"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
];

/// Returns the human-readable name for a language tag.
///
/// `auto` maps to "Auto-detect"; tags outside the table pass through unchanged.
pub fn language_name(tag: &str) -> &str {
    if tag == AUTO {
        return "Auto-detect";
    }
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(code, _)| *code == tag)
        .map_or(tag, |(_, name)| name)
}

/// Classifies text by the scripts it contains.
///
/// First match wins: kana → `ja`, Hangul → `ko`, CJK ideographs → `zh`,
/// ASCII Latin letters → `en`, otherwise [`UNKNOWN`].
pub fn detect_language(text: &str) -> &'static str {
    let mut has_hangul = false;
    let mut has_han = false;
    let mut has_latin = false;

    for c in text.chars() {
        match c {
            // Kana outranks everything else, no need to scan further.
            '\u{3040}'..='\u{30FF}' => return "ja",
            '\u{AC00}'..='\u{D7AF}' => has_hangul = true,
            '\u{4E00}'..='\u{9FAF}' => has_han = true,
            'a'..='z' | 'A'..='Z' => has_latin = true,
            _ => {}
        }
    }

    if has_hangul {
        "ko"
    } else if has_han {
        "zh"
    } else if has_latin {
        "en"
    } else {
        UNKNOWN
    }
}

/// Prints all supported language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported language codes (ISO 639-1)"));
    println!(
        "  {:5} {}",
        Style::code(AUTO),
        Style::secondary("Auto-detect (source only)")
    );
    for (code, name) in SUPPORTED_LANGUAGES {
        println!("  {:5} {}", Style::code(code), Style::secondary(name));
    }
}

/// Validates that the given language code is supported.
///
/// # Errors
///
/// Returns an error if the language code is not in the supported list.
pub fn validate_language(lang: &str) -> Result<()> {
    if SUPPORTED_LANGUAGES.iter().any(|(code, _)| *code == lang) {
        Ok(())
    } else {
        anyhow::bail!(
            "Invalid language code: '{lang}'\n\n\
             Valid language codes (ISO 639-1): ja, en, zh, ko, fr, de, es, ...\n\
             Run 'clip-tl languages' to see all supported codes."
        )
    }
}

/// Validates a source language code, which may also be `auto`.
pub fn validate_source_language(lang: &str) -> Result<()> {
    if lang == AUTO {
        Ok(())
    } else {
        validate_language(lang)
    }
}
