use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod style;

pub use spinner::{BatchBar, Spinner};
pub use style::Style;

/// Check if the inquire error is a user cancellation/interruption.
const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Wraps a function that uses interactive prompts and handles user cancellation gracefully.
///
/// Ctrl+C or Escape inside a prompt leaves the config untouched and exits
/// cleanly instead of reporting an error.
pub fn handle_prompt_cancellation<F>(f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match f() {
        Ok(()) => Ok(()),
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            println!();
            crate::status!("Cancelled, configuration unchanged.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
