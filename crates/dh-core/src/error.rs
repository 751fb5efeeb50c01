//! Core error types for deckhand

use std::path::PathBuf;
use thiserror::Error;

use crate::types::IdentifierKind;

/// Top-level error type for the deckhand ecosystem
#[derive(Error, Debug)]
pub enum DhError {
    /// Resolution error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Catalog error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Describing a resolved deployment failed
    #[error("describe status of service {service} in environment {environment}: {source}")]
    Describe {
        service: String,
        environment: String,
        #[source]
        source: CatalogError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by a catalog, prober or status backend
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The backend could not be reached
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with an unexpected status
    #[error("unexpected response {code}: {message}")]
    Status { code: u16, message: String },

    /// The backend answered with a payload we could not decode
    #[error("malformed response: {0}")]
    Decode(String),

    /// A manifest document is invalid
    #[error("invalid manifest: {0}")]
    Manifest(String),

    /// No deployment exists for the pair being described
    #[error("service {service} is not deployed in environment {environment}")]
    MissingDeployment {
        service: String,
        environment: String,
    },

    /// The named project is not part of the catalog
    #[error("project {0} does not exist")]
    UnknownProject(String),

    /// The configured backend is missing a required setting
    #[error("catalog not configured: {0}")]
    NotConfigured(String),

    /// A catalog file could not be read
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures reported by an interactive chooser
#[derive(Error, Debug)]
pub enum ChooserError {
    /// The user cancelled the prompt
    #[error("selection cancelled")]
    Aborted,

    /// The chooser was handed nothing to choose from
    #[error("no choices to select from")]
    NoChoices,

    /// Any other prompt failure
    #[error("{0}")]
    Failed(String),
}

/// Errors surfaced by validation and resolution
///
/// Every variant names the stage or scope that produced it so the caller can
/// print it as-is.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// An explicitly supplied identifier does not exist
    #[error("{kind} {name} not found")]
    NotFound { kind: IdentifierKind, name: String },

    /// Looking up an explicitly supplied identifier failed
    #[error("get {kind} {name}: {source}")]
    Lookup {
        kind: IdentifierKind,
        name: String,
        #[source]
        source: CatalogError,
    },

    #[error("list projects: {0}")]
    ListProjects(#[source] CatalogError),

    #[error("list services for project {project}: {source}")]
    ListServices {
        project: String,
        #[source]
        source: CatalogError,
    },

    #[error("list environments for project {project}: {source}")]
    ListEnvironments {
        project: String,
        #[source]
        source: CatalogError,
    },

    /// No projects exist for the caller's scope
    #[error("no project found: create a project in the catalog first")]
    NoProjectsFound,

    #[error("no services found in project {project}")]
    NoServicesFound { project: String },

    #[error("no environments found in project {project}")]
    NoEnvironmentsFound { project: String },

    #[error("no deployed services found in project {project}")]
    NoDeployedPairsFound { project: String },

    /// A deployment probe failed for a reason other than non-deployment
    #[error("check if service {service} is deployed in environment {environment} of project {project}: {source}")]
    ProbeFailed {
        project: String,
        environment: String,
        service: String,
        #[source]
        source: CatalogError,
    },

    /// The user cancelled an interactive selection
    #[error("select {target}: selection cancelled")]
    SelectionAborted { target: String },

    /// The chooser failed for a reason other than cancellation
    #[error("select {target}: {source}")]
    SelectionFailed {
        target: String,
        #[source]
        source: ChooserError,
    },
}

impl ResolveError {
    /// Wrap a chooser failure with the selection it interrupted
    pub fn from_chooser(target: impl Into<String>, err: ChooserError) -> Self {
        let target = target.into();
        match err {
            ChooserError::Aborted => Self::SelectionAborted { target },
            other => Self::SelectionFailed {
                target,
                source: other,
            },
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}
