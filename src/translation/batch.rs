//! Windowed batch translation.

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use std::time::Duration;
use tracing::debug;

use super::client::{TranslateOptions, TranslationResult, Translator};
use super::error::{TranslateError, TranslateResult};
use super::transport::Transport;

/// Pause between windows, to stay under provider rate limits.
pub const WINDOW_PACING: Duration = Duration::from_millis(500);

/// Reported after each item finishes, in completion order.
#[derive(Debug)]
pub struct BatchProgress<'a> {
    /// 1-based input position of the finished item.
    pub current: usize,
    /// Items finished so far, this one included.
    pub completed: usize,
    pub total: usize,
    pub outcome: &'a TranslateResult<TranslationResult>,
}

/// Per-item outcomes, in input order.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub items: Vec<TranslateResult<TranslationResult>>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Successful items with their input index.
    pub fn results(&self) -> impl Iterator<Item = (usize, &TranslationResult)> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| item.as_ref().ok().map(|r| (i, r)))
    }

    /// Failed items with their input index.
    pub fn errors(&self) -> impl Iterator<Item = (usize, &TranslateError)> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| item.as_ref().err().map(|e| (i, e)))
    }

    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.items.len() - self.success_count()
    }
}

impl<T: Transport> Translator<T> {
    pub async fn batch_translate(
        &self,
        texts: &[String],
        options: &TranslateOptions,
        concurrency: usize,
    ) -> TranslateResult<BatchOutcome> {
        self.batch_translate_with_progress(texts, options, concurrency, |_| {})
            .await
    }

    /// Translates `texts` in windows of `concurrency` items.
    ///
    /// Items in a window run concurrently and the whole window is awaited
    /// before the next one starts. One item failing does not stop the batch.
    pub async fn batch_translate_with_progress<F>(
        &self,
        texts: &[String],
        options: &TranslateOptions,
        concurrency: usize,
        mut on_progress: F,
    ) -> TranslateResult<BatchOutcome>
    where
        F: FnMut(BatchProgress<'_>),
    {
        if texts.is_empty() {
            return Err(TranslateError::Validation(
                "batch contains no texts".to_string(),
            ));
        }

        let window_size = concurrency.max(1);
        let total = texts.len();
        let mut slots: Vec<Option<TranslateResult<TranslationResult>>> = vec![None; total];
        let mut completed = 0;

        for (window_index, window) in texts.chunks(window_size).enumerate() {
            let offset = window_index * window_size;
            debug!(offset, size = window.len(), total, "starting batch window");

            let mut in_flight: FuturesUnordered<_> = window
                .iter()
                .enumerate()
                .map(|(i, text)| async move { (offset + i, self.translate(text, options).await) })
                .collect();

            while let Some((index, outcome)) = in_flight.next().await {
                completed += 1;
                on_progress(BatchProgress {
                    current: index + 1,
                    completed,
                    total,
                    outcome: &outcome,
                });
                slots[index] = Some(outcome);
            }

            if offset + window.len() < total {
                tokio::time::sleep(WINDOW_PACING).await;
            }
        }

        let items = slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(TranslateError::Failed("batch item was never processed".to_string()))
                })
            })
            .collect();

        Ok(BatchOutcome { items })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::client::Credentials;
    use crate::translation::mock::MockTransport;
    use crate::translation::models::ModelRegistry;
    use crate::translation::transport::TransportResponse;

    fn options() -> TranslateOptions {
        TranslateOptions {
            source_lang: "en".to_string(),
            target_lang: "ja".to_string(),
            model: "gpt-4o-mini".to_string(),
            credentials: Credentials {
                deepseek: None,
                openai: Some("key".to_string()),
            },
            ..TranslateOptions::default()
        }
    }

    /// Echoes the source line in upper case; lines containing "fail" get a 401.
    fn echo_transport() -> MockTransport {
        MockTransport::from_fn(|call| {
            let prompt = call.user_prompt();
            let text = prompt
                .split("Source: ")
                .nth(1)
                .and_then(|rest| rest.split("\n\n").next())
                .unwrap_or_default();
            if text.contains("fail") {
                Ok(TransportResponse {
                    status: 401,
                    body: String::new(),
                })
            } else {
                Ok(MockTransport::completion(&text.to_uppercase(), 10, 5))
            }
        })
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_keep_input_order_with_a_failure() {
        let translator = Translator::with_transport(ModelRegistry::builtin(), echo_transport());
        let input = texts(&["one", "two", "please fail", "four", "five"]);

        let outcome = translator
            .batch_translate(&input, &options(), 2)
            .await
            .unwrap();

        assert_eq!(outcome.len(), 5);
        let translated: Vec<_> = outcome
            .items
            .iter()
            .map(|item| item.as_ref().map(|r| r.translated_text.clone()))
            .collect();
        assert_eq!(translated[0], Ok("ONE".to_string()));
        assert_eq!(translated[1], Ok("TWO".to_string()));
        assert_eq!(translated[2], Err(&TranslateError::Auth));
        assert_eq!(translated[3], Ok("FOUR".to_string()));
        assert_eq!(translated[4], Ok("FIVE".to_string()));

        assert_eq!(outcome.success_count(), 4);
        assert_eq!(outcome.failure_count(), 1);
        assert_eq!(outcome.errors().map(|(i, _)| i).collect::<Vec<_>>(), vec![2]);
        assert_eq!(translator.transport().call_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_reported_for_every_item() {
        let translator = Translator::with_transport(ModelRegistry::builtin(), echo_transport());
        let input = texts(&["a", "b", "fail", "d", "e"]);

        let mut seen = Vec::new();
        translator
            .batch_translate_with_progress(&input, &options(), 2, |progress| {
                seen.push((
                    progress.current,
                    progress.completed,
                    progress.total,
                    progress.outcome.is_ok(),
                ));
            })
            .await
            .unwrap();

        assert_eq!(seen.len(), 5);
        assert!(seen.iter().all(|(_, _, total, _)| *total == 5));
        let completed: Vec<_> = seen.iter().map(|(_, c, _, _)| *c).collect();
        assert_eq!(completed, vec![1, 2, 3, 4, 5]);

        let mut current: Vec<_> = seen.iter().map(|(c, _, _, _)| *c).collect();
        current.sort_unstable();
        assert_eq!(current, vec![1, 2, 3, 4, 5]);
        assert!(seen.iter().any(|(c, _, _, ok)| *c == 3 && !ok));
    }

    #[tokio::test(start_paused = true)]
    async fn test_windows_are_paced() {
        let translator = Translator::with_transport(ModelRegistry::builtin(), echo_transport());
        let input = texts(&["a", "b", "c", "d", "e"]);

        let started = tokio::time::Instant::now();
        translator
            .batch_translate(&input, &options(), 2)
            .await
            .unwrap();

        // Three windows, two pauses.
        let elapsed = started.elapsed();
        assert!(elapsed >= WINDOW_PACING * 2);
        assert!(elapsed < WINDOW_PACING * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_concurrency_runs_one_at_a_time() {
        let translator = Translator::with_transport(ModelRegistry::builtin(), echo_transport());
        let input = texts(&["a", "b"]);

        let started = tokio::time::Instant::now();
        let outcome = translator
            .batch_translate(&input, &options(), 0)
            .await
            .unwrap();

        assert_eq!(outcome.success_count(), 2);
        let elapsed = started.elapsed();
        assert!(elapsed >= WINDOW_PACING);
        assert!(elapsed < WINDOW_PACING * 2);
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let translator = Translator::with_transport(ModelRegistry::builtin(), echo_transport());
        let err = translator
            .batch_translate(&[], &options(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Validation(_)));
    }

    #[tokio::test]
    async fn test_invalid_items_fail_individually() {
        let translator = Translator::with_transport(ModelRegistry::builtin(), echo_transport());
        let input = texts(&["ok", "   "]);

        let outcome = translator
            .batch_translate(&input, &options(), 4)
            .await
            .unwrap();

        assert!(outcome.items[0].is_ok());
        assert!(matches!(outcome.items[1], Err(TranslateError::Validation(_))));
        assert_eq!(translator.transport().call_count(), 1);
    }
}
