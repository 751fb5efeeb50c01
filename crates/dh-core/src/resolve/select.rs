//! Picking one candidate out of an ordered list

use crate::error::{ChooserError, ResolveError};
use crate::traits::{Chooser, Notifier};

/// Whether a lone candidate is taken without asking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSelect {
    /// Pick the only candidate and emit a notice
    WhenSingle,
    /// Always ask, even for a single candidate
    Never,
}

/// Everything needed to ask the user to choose
#[derive(Debug, Clone)]
pub struct SelectionPrompt<'a> {
    pub prompt: &'a str,
    pub help: &'a str,
    /// Noun used in the auto-selection notice, e.g. "deployed service"
    pub noun: &'a str,
    /// Stage named in selection errors, e.g. "project"
    pub target: String,
    pub auto: AutoSelect,
}

/// Choose one of `candidates`, in the order given
///
/// The chooser is never called with an empty list.
pub fn select_candidate(
    chooser: &dyn Chooser,
    notifier: &dyn Notifier,
    prompt: &SelectionPrompt<'_>,
    candidates: &[String],
) -> Result<String, ResolveError> {
    match candidates {
        [] => Err(ResolveError::from_chooser(
            prompt.target.clone(),
            ChooserError::NoChoices,
        )),
        [only] if prompt.auto == AutoSelect::WhenSingle => {
            tracing::debug!(choice = %only, "only one {} found, selecting it", prompt.noun);
            notifier.auto_selected(prompt.noun, only);
            Ok(only.clone())
        }
        _ => {
            let choice = chooser
                .select_one(prompt.prompt, prompt.help, candidates)
                .map_err(|e| ResolveError::from_chooser(prompt.target.clone(), e))?;
            if !candidates.contains(&choice) {
                return Err(ResolveError::from_chooser(
                    prompt.target.clone(),
                    ChooserError::Failed(format!("{} is not one of the offered choices", choice)),
                ));
            }
            tracing::debug!(choice = %choice, "user selected {}", prompt.noun);
            Ok(choice)
        }
    }
}
