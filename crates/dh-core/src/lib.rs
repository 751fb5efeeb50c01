//! dh-core: Core abstractions and resolution engine for deckhand
//!
//! This crate provides the shared types, collaborator traits, configuration
//! structures and the engine that narrows partially-specified identifiers
//! down to a single deployed (service, environment) pair.

pub mod config;
pub mod error;
pub mod resolve;
pub mod status;
pub mod traits;
pub mod types;

pub use error::{CatalogError, ChooserError, DhError, ResolveError};
pub use resolve::{Resolver, StatusTarget};
pub use types::{CandidatePair, IdentifierKind, ProbeOutcome};
