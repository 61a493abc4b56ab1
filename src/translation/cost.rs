//! Token usage and cost accounting.

use serde::{Deserialize, Serialize};

use super::models::ModelRegistry;

/// Token counts reported by the provider for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Rough token count for text that has not been sent yet.
///
/// ASCII letters and whitespace count a quarter token each, CJK ideographs
/// half a token, anything else a third.
pub fn estimate_tokens(text: &str) -> u64 {
    let mut latin = 0usize;
    let mut han = 0usize;
    let mut other = 0usize;

    for c in text.chars() {
        if c.is_ascii_alphabetic() || c.is_whitespace() {
            latin += 1;
        } else if ('\u{4E00}'..='\u{9FAF}').contains(&c) {
            han += 1;
        } else {
            other += 1;
        }
    }

    (latin as f64 / 4.0 + han as f64 / 2.0 + other as f64 / 3.0).ceil() as u64
}

/// Estimated prompt-side cost of sending `text` to `model_id`.
///
/// Prices the token estimate as input tokens only; the prompt template and
/// the completion are not included. Returns 0 for unknown models.
pub fn estimate_cost(registry: &ModelRegistry, text: &str, model_id: &str) -> f64 {
    let usage = Usage {
        prompt_tokens: estimate_tokens(text),
        ..Usage::default()
    };
    registry.calculate_cost(Some(&usage), model_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_of_one_million_each_is_price_sum() {
        let registry = ModelRegistry::builtin();
        let usage = Usage {
            prompt_tokens: 1_000_000,
            completion_tokens: 1_000_000,
            total_tokens: 2_000_000,
        };

        for (id, model) in registry.iter() {
            assert_eq!(
                registry.calculate_cost(Some(&usage), id),
                model.input_price + model.output_price,
                "cost mismatch for {id}"
            );
        }
    }

    #[test]
    fn test_cost_formula() {
        let registry = ModelRegistry::builtin();
        let usage = Usage {
            prompt_tokens: 500_000,
            completion_tokens: 250_000,
            total_tokens: 750_000,
        };
        // 0.5 * 5.00 + 0.25 * 15.00
        assert!((registry.calculate_cost(Some(&usage), "gpt-4o") - 6.25).abs() < 1e-12);
    }

    #[test]
    fn test_cost_zero_without_usage_or_model() {
        let registry = ModelRegistry::builtin();
        let usage = Usage {
            prompt_tokens: 10,
            completion_tokens: 10,
            total_tokens: 20,
        };
        assert_eq!(registry.calculate_cost(None, "gpt-4o"), 0.0);
        assert_eq!(registry.calculate_cost(Some(&usage), "no-such-model"), 0.0);
    }

    #[test]
    fn test_usage_deserializes_provider_shape() {
        let usage: Usage = serde_json::from_str(
            r#"{"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19, "prompt_cache_hit_tokens": 0}"#,
        )
        .unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 7);
        assert_eq!(usage.total_tokens, 19);
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        // 4 letters -> 1 token
        assert_eq!(estimate_tokens("abcd"), 1);
        // 5 letters + 1 space -> 1.5 -> 2
        assert_eq!(estimate_tokens("hello "), 2);
        // 4 ideographs -> 2 tokens
        assert_eq!(estimate_tokens("你好世界"), 2);
        // 3 kana -> 1 token
        assert_eq!(estimate_tokens("ひらが"), 1);
    }

    #[test]
    fn test_estimate_cost_unknown_model() {
        let registry = ModelRegistry::builtin();
        assert_eq!(estimate_cost(&registry, "hello world", "missing"), 0.0);
        assert!(estimate_cost(&registry, "hello world", "gpt-4") > 0.0);
    }
}
