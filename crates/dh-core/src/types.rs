//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of thing an identifier names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Project,
    Service,
    Environment,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Project => write!(f, "project"),
            IdentifierKind::Service => write!(f, "service"),
            IdentifierKind::Environment => write!(f, "environment"),
        }
    }
}

/// A top-level grouping of services and environments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account_id: None,
            domain: None,
        }
    }
}

/// A deployable unit within a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub project: String,
    pub name: String,
    /// Service flavour, e.g. "Load Balanced Web Service"
    #[serde(default)]
    pub kind: Option<String>,
}

impl Service {
    pub fn new(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
            kind: None,
        }
    }
}

/// A named deployment target within a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub project: String,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub production: bool,
}

impl Environment {
    pub fn new(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
            region: None,
            production: false,
        }
    }
}

/// A (service, environment) combination within a fixed project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidatePair {
    pub service: String,
    pub environment: String,
}

impl CandidatePair {
    pub fn new(service: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            environment: environment.into(),
        }
    }

    /// Key shown to the user when choosing between pairs
    pub fn display_key(&self) -> String {
        format!("{}/{}", self.service, self.environment)
    }
}

impl fmt::Display for CandidatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.environment)
    }
}

/// Result of asking whether a pair is deployed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The pair is live; carries the identifier of the running service
    Deployed { service_arn: String },
    /// No stack exists for the pair
    NotDeployed,
}

impl ProbeOutcome {
    pub fn is_deployed(&self) -> bool {
        matches!(self, ProbeOutcome::Deployed { .. })
    }
}
