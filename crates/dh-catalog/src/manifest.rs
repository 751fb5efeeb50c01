//! Manifest-file catalog
//!
//! The manifest is a TOML document listing projects with their services,
//! environments and live deployments:
//!
//! ```toml
//! [[projects]]
//! name = "coffee"
//!
//! [[projects.services]]
//! name = "api"
//!
//! [[projects.environments]]
//! name = "test"
//!
//! [[projects.deployments]]
//! service = "api"
//! environment = "test"
//! service_arn = "arn:aws:ecs:us-west-2:123456789012:service/coffee-test/api"
//!
//! [projects.deployments.summary]
//! desired_count = 1
//! running_count = 1
//! status = "ACTIVE"
//! ```
//!
//! The file is read again on every call so edits show up immediately.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use dh_core::status::{AlarmStatus, ServiceStatus, ServiceSummary, TaskStatus};
use dh_core::traits::{CatalogClient, DeploymentProber, StatusDescriber};
use dh_core::types::{Environment, ProbeOutcome, Project, Service};
use dh_core::CatalogError;

/// Parsed manifest document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
    #[serde(default)]
    pub environments: Vec<EnvironmentEntry>,
    #[serde(default)]
    pub deployments: Vec<DeploymentEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntry {
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentEntry {
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub production: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentEntry {
    pub service: String,
    pub environment: String,
    pub service_arn: String,
    #[serde(default)]
    pub summary: ServiceSummary,
    #[serde(default)]
    pub tasks: Vec<TaskStatus>,
    #[serde(default)]
    pub alarms: Vec<AlarmStatus>,
}

impl Manifest {
    /// Parse and check a manifest document
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest =
            toml::from_str(content).map_err(|e| CatalogError::Manifest(e.to_string()))?;
        manifest.check()?;
        Ok(manifest)
    }

    fn check(&self) -> Result<(), CatalogError> {
        for (i, project) in self.projects.iter().enumerate() {
            if self.projects[..i].iter().any(|p| p.name == project.name) {
                return Err(CatalogError::Manifest(format!(
                    "project {} is listed twice",
                    project.name
                )));
            }
            for deployment in &project.deployments {
                if project.service(&deployment.service).is_none() {
                    return Err(CatalogError::Manifest(format!(
                        "deployment references unknown service {} in project {}",
                        deployment.service, project.name
                    )));
                }
                if project.environment(&deployment.environment).is_none() {
                    return Err(CatalogError::Manifest(format!(
                        "deployment references unknown environment {} in project {}",
                        deployment.environment, project.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn project(&self, name: &str) -> Result<&ProjectEntry, CatalogError> {
        self.projects
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| CatalogError::UnknownProject(name.to_string()))
    }
}

impl ProjectEntry {
    fn service(&self, name: &str) -> Option<&ServiceEntry> {
        self.services.iter().find(|s| s.name == name)
    }

    fn environment(&self, name: &str) -> Option<&EnvironmentEntry> {
        self.environments.iter().find(|e| e.name == name)
    }

    fn deployment(&self, service: &str, environment: &str) -> Option<&DeploymentEntry> {
        self.deployments
            .iter()
            .find(|d| d.service == service && d.environment == environment)
    }

    fn to_project(&self) -> Project {
        Project {
            name: self.name.clone(),
            account_id: self.account_id.clone(),
            domain: self.domain.clone(),
        }
    }

    fn to_service(&self, entry: &ServiceEntry) -> Service {
        Service {
            project: self.name.clone(),
            name: entry.name.clone(),
            kind: entry.kind.clone(),
        }
    }

    fn to_environment(&self, entry: &EnvironmentEntry) -> Environment {
        Environment {
            project: self.name.clone(),
            name: entry.name.clone(),
            region: entry.region.clone(),
            production: entry.production,
        }
    }
}

/// Catalog backed by a manifest file on disk
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    path: PathBuf,
}

impl ManifestCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the manifest
    pub async fn load(&self) -> Result<Manifest, CatalogError> {
        tracing::debug!("Loading manifest from {:?}", self.path);
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Read {
                path: self.path.clone(),
                source,
            })?;
        Manifest::parse(&content)
    }
}

#[async_trait]
impl CatalogClient for ManifestCatalog {
    async fn list_projects(&self) -> Result<Vec<Project>, CatalogError> {
        let manifest = self.load().await?;
        Ok(manifest.projects.iter().map(ProjectEntry::to_project).collect())
    }

    async fn get_project(&self, name: &str) -> Result<Option<Project>, CatalogError> {
        let manifest = self.load().await?;
        Ok(manifest
            .projects
            .iter()
            .find(|p| p.name == name)
            .map(ProjectEntry::to_project))
    }

    async fn list_services(&self, project: &str) -> Result<Vec<Service>, CatalogError> {
        let manifest = self.load().await?;
        let entry = manifest.project(project)?;
        Ok(entry.services.iter().map(|s| entry.to_service(s)).collect())
    }

    async fn get_service(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Option<Service>, CatalogError> {
        let manifest = self.load().await?;
        let entry = manifest.project(project)?;
        Ok(entry.service(name).map(|s| entry.to_service(s)))
    }

    async fn list_environments(&self, project: &str) -> Result<Vec<Environment>, CatalogError> {
        let manifest = self.load().await?;
        let entry = manifest.project(project)?;
        Ok(entry
            .environments
            .iter()
            .map(|e| entry.to_environment(e))
            .collect())
    }

    async fn get_environment(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Option<Environment>, CatalogError> {
        let manifest = self.load().await?;
        let entry = manifest.project(project)?;
        Ok(entry.environment(name).map(|e| entry.to_environment(e)))
    }
}

#[async_trait]
impl DeploymentProber for ManifestCatalog {
    async fn probe(
        &self,
        project: &str,
        environment: &str,
        service: &str,
    ) -> Result<ProbeOutcome, CatalogError> {
        let manifest = self.load().await?;
        let entry = manifest.project(project)?;
        Ok(match entry.deployment(service, environment) {
            Some(d) => ProbeOutcome::Deployed {
                service_arn: d.service_arn.clone(),
            },
            None => ProbeOutcome::NotDeployed,
        })
    }
}

#[async_trait]
impl StatusDescriber for ManifestCatalog {
    async fn describe(
        &self,
        project: &str,
        environment: &str,
        service: &str,
    ) -> Result<ServiceStatus, CatalogError> {
        let manifest = self.load().await?;
        let entry = manifest.project(project)?;
        let deployment =
            entry
                .deployment(service, environment)
                .ok_or_else(|| CatalogError::MissingDeployment {
                    service: service.to_string(),
                    environment: environment.to_string(),
                })?;
        Ok(ServiceStatus {
            project: project.to_string(),
            environment: environment.to_string(),
            service: service.to_string(),
            summary: deployment.summary.clone(),
            tasks: deployment.tasks.clone(),
            alarms: deployment.alarms.clone(),
        })
    }
}
