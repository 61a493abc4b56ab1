use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// A terminal spinner shown while a request is in flight.
///
/// Clears itself when dropped. Hidden in quiet mode.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    #[allow(clippy::unwrap_used)]
    pub fn new(message: &str) -> Self {
        let progress_bar = if crate::output::is_quiet() {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new_spinner()
        };
        // template is a constant
        progress_bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner} {msg}")
                .unwrap(),
        );
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));

        Self { progress_bar }
    }

    pub fn stop(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}

/// Progress bar for batch runs, counting finished items.
pub struct BatchBar {
    progress_bar: ProgressBar,
}

impl BatchBar {
    #[allow(clippy::unwrap_used)]
    pub fn new(total: usize) -> Self {
        let progress_bar = if crate::output::is_quiet() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        // template is a constant
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        Self { progress_bar }
    }

    pub fn advance(&self, message: String) {
        self.progress_bar.set_message(message);
        self.progress_bar.inc(1);
    }

    /// Prints a line above the bar without breaking it.
    pub fn println(&self, line: String) {
        self.progress_bar.println(line);
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}
