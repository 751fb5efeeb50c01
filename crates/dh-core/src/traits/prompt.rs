//! Interactive chooser traits

use crate::error::ChooserError;

/// Presents a list of choices and returns the one the user picked
pub trait Chooser: Send + Sync {
    /// Must return a member of `choices`, `Aborted` on user cancellation or
    /// `Failed` otherwise. `choices` is never empty when called by the
    /// resolver.
    fn select_one(&self, prompt: &str, help: &str, choices: &[String])
        -> Result<String, ChooserError>;
}

/// Receives the notice emitted when a single candidate is picked without
/// asking
pub trait Notifier: Send + Sync {
    /// `what` names the kind of candidate ("deployed service"), `choice` is
    /// the display key that was picked.
    fn auto_selected(&self, what: &str, choice: &str);
}
