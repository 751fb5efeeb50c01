//! Catalog, prober and status traits

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::status::ServiceStatus;
use crate::types::{Environment, ProbeOutcome, Project, Service};

/// Read-only view of the projects, services and environments known to the
/// caller's account
///
/// Listings are returned in catalog order. Implementations must not cache:
/// every call is a fresh round trip.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// List every project visible to the caller
    async fn list_projects(&self) -> Result<Vec<Project>, CatalogError>;

    /// Look up a single project, `None` if it does not exist
    async fn get_project(&self, name: &str) -> Result<Option<Project>, CatalogError>;

    /// List the services of a project
    async fn list_services(&self, project: &str) -> Result<Vec<Service>, CatalogError>;

    /// Look up a single service, `None` if it does not exist
    async fn get_service(&self, project: &str, name: &str)
        -> Result<Option<Service>, CatalogError>;

    /// List the environments of a project
    async fn list_environments(&self, project: &str) -> Result<Vec<Environment>, CatalogError>;

    /// Look up a single environment, `None` if it does not exist
    async fn get_environment(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Option<Environment>, CatalogError>;
}

/// Determines whether a service is actually deployed in an environment
#[async_trait]
pub trait DeploymentProber: Send + Sync {
    /// `Ok(NotDeployed)` when no stack exists for the pair; `Err` for
    /// anything else that went wrong.
    async fn probe(
        &self,
        project: &str,
        environment: &str,
        service: &str,
    ) -> Result<ProbeOutcome, CatalogError>;
}

/// Produces the status payload for a resolved deployment
#[async_trait]
pub trait StatusDescriber: Send + Sync {
    async fn describe(
        &self,
        project: &str,
        environment: &str,
        service: &str,
    ) -> Result<ServiceStatus, CatalogError>;
}
