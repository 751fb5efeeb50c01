//! Output formatting utilities for the CLI
//!
//! Colored status messages and highlight helpers live here, together with
//! the human-readable rendering of a service status. Whether color is used
//! is decided once at startup and carried in an [`Output`] value; nothing
//! below the CLI ever looks at it.

mod status;

pub use status::format_status;

use std::io::Write;

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor, Stylize};
use crossterm::tty::IsTty;

use dh_core::config::ColorMode;

/// Name of the environment variable that forces color on or off
pub const COLOR_ENV_VAR: &str = "COLOR";

/// Terminal output settings for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    color: bool,
}

impl Output {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Decide on color from the `COLOR` variable, then the configured mode
    ///
    /// `COLOR=true` or `COLOR=false` wins over the config file; otherwise the
    /// configured mode applies, where `auto` means "only on a terminal".
    pub fn detect(configured: ColorMode) -> Self {
        let env_value = std::env::var(COLOR_ENV_VAR).ok();
        let mode = ColorMode::from_env_value(env_value.as_deref()).unwrap_or(configured);
        Self::new(mode.enabled(std::io::stdout().is_tty()))
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Emphasize a value the user typed or picked
    pub fn highlight_user_input(&self, s: &str) -> String {
        if self.color {
            s.cyan().bold().to_string()
        } else {
            s.to_string()
        }
    }

    /// Emphasize a command the user could run
    pub fn highlight_code(&self, s: &str) -> String {
        if self.color {
            s.magenta().bold().to_string()
        } else {
            format!("`{}`", s)
        }
    }

    /// Print a success message in green with a checkmark prefix
    ///
    /// Outputs to stdout.
    pub fn success(&self, msg: &str) {
        self.print_prefixed(&mut std::io::stdout(), Color::Green, "✓ ", msg);
    }

    /// Print an error message in red with an X prefix
    ///
    /// Outputs to stderr.
    pub fn error(&self, msg: &str) {
        self.print_prefixed(&mut std::io::stderr(), Color::Red, "✗ ", msg);
    }

    /// Print a warning message in yellow with a warning symbol prefix
    ///
    /// Outputs to stderr.
    pub fn warning(&self, msg: &str) {
        self.print_prefixed(&mut std::io::stderr(), Color::Yellow, "⚠ ", msg);
    }

    /// Print an informational message in cyan with an info symbol prefix
    ///
    /// Outputs to stderr so that stdout stays machine-readable with `--json`.
    pub fn info(&self, msg: &str) {
        self.print_prefixed(&mut std::io::stderr(), Color::Cyan, "ℹ ", msg);
    }

    fn print_prefixed<W: Write>(&self, w: &mut W, color: Color, prefix: &str, msg: &str) {
        if self.color {
            let _ = crossterm::execute!(
                w,
                SetForegroundColor(color),
                Print(prefix),
                ResetColor,
                Print(msg),
                Print("\n")
            );
        } else {
            let _ = writeln!(w, "{}{}", prefix, msg);
        }
    }
}

/// Truncate a string with ellipsis if too long
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
