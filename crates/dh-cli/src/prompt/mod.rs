//! Terminal implementations of the chooser and notifier traits

use crossterm::tty::IsTty;
use dialoguer::console::Term;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::Select;

use dh_core::traits::{Chooser, Notifier};
use dh_core::ChooserError;

use crate::output::Output;

/// Arrow-key selection list on the terminal
///
/// `Esc` or `q` cancels. Fails immediately when stdin is not a terminal so
/// scripted runs never hang waiting for input.
pub struct TerminalChooser {
    output: Output,
}

impl TerminalChooser {
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

impl Chooser for TerminalChooser {
    fn select_one(
        &self,
        prompt: &str,
        help: &str,
        choices: &[String],
    ) -> Result<String, ChooserError> {
        if choices.is_empty() {
            return Err(ChooserError::NoChoices);
        }
        if !std::io::stdin().is_tty() {
            return Err(ChooserError::Failed("input is not a terminal".to_string()));
        }

        let colorful = ColorfulTheme::default();
        let theme: &dyn Theme = if self.output.color_enabled() {
            &colorful
        } else {
            &SimpleTheme
        };

        let term = Term::stderr();
        term.write_line(&format!("  {}", help))
            .map_err(|e| ChooserError::Failed(e.to_string()))?;

        let selection = Select::with_theme(theme)
            .with_prompt(prompt)
            .items(choices)
            .default(0)
            .interact_on_opt(&term)
            .map_err(|e| ChooserError::Failed(e.to_string()))?;

        match selection {
            Some(index) => choices
                .get(index)
                .cloned()
                .ok_or_else(|| ChooserError::Failed(format!("selection {} out of range", index))),
            None => Err(ChooserError::Aborted),
        }
    }
}

/// Prints auto-selection notices as info lines
pub struct TerminalNotifier {
    output: Output,
}

impl TerminalNotifier {
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

impl Notifier for TerminalNotifier {
    fn auto_selected(&self, what: &str, choice: &str) {
        self.output.info(&format!(
            "Only found one {}, defaulting to: {}",
            what,
            self.output.highlight_user_input(choice)
        ));
    }
}
