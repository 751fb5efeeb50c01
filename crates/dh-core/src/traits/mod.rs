//! Collaborator trait definitions
//!
//! The resolution engine only talks to the outside world through these
//! traits, so every backend (and every test fake) plugs in here.

mod catalog;
mod prompt;

pub use catalog::{CatalogClient, DeploymentProber, StatusDescriber};
pub use prompt::{Chooser, Notifier};
