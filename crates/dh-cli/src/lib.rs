//! deckhand: Command-line interface for deployment status
//!
//! Provides the `deckhand` CLI, which resolves a project, service and
//! environment (prompting when ambiguous) and reports the service's status.

pub mod commands;
pub mod output;
pub mod prompt;
