//! Resolution engine
//!
//! Narrows a partially-specified (project, service, environment) request to a
//! single deployed pair, using the catalog as ground truth:
//!
//! 1. A missing project is chosen from every project in the catalog.
//! 2. A missing service or environment expands to every one the project has.
//! 3. The service-major cross product is probed sequentially; pairs that are
//!    not deployed are dropped, any other probe failure aborts.
//! 4. One survivor is taken without asking; several are offered to the
//!    chooser in discovery order.

mod candidates;
mod select;
mod validate;

#[cfg(test)]
mod tests;

pub use candidates::CandidateSet;
pub use select::{select_candidate, AutoSelect, SelectionPrompt};
pub use validate::{validate, validate_members, validate_project};

use serde::{Deserialize, Serialize};

use crate::error::{ChooserError, ResolveError};
use crate::traits::{CatalogClient, Chooser, DeploymentProber, Notifier};
use crate::types::{CandidatePair, ProbeOutcome};

pub const PROJECT_PROMPT: &str = "Which project's services would you like to show the status of?";
pub const PROJECT_HELP: &str = "A project groups all of your services together.";
pub const DEPLOYMENT_PROMPT: &str = "Which deployed service would you like to show the status of?";
pub const DEPLOYMENT_HELP: &str = "Displays the service's status, its tasks and its alarms.";

/// Identifiers as supplied by the caller; empty strings count as absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRequest {
    project: Option<String>,
    service: Option<String>,
    environment: Option<String>,
}

impl StatusRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: Option<&str>) -> Self {
        self.project = non_empty(project);
        self
    }

    pub fn with_service(mut self, service: Option<&str>) -> Self {
        self.service = non_empty(service);
        self
    }

    pub fn with_environment(mut self, environment: Option<&str>) -> Self {
        self.environment = non_empty(environment);
        self
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// A fully resolved deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTarget {
    pub project: String,
    pub service: String,
    pub environment: String,
}

/// Resolves status requests against a set of collaborators
///
/// Holds no state between calls; every resolution starts from a fresh
/// candidate set.
pub struct Resolver<'a> {
    catalog: &'a dyn CatalogClient,
    prober: &'a dyn DeploymentProber,
    chooser: &'a dyn Chooser,
    notifier: &'a dyn Notifier,
}

impl<'a> Resolver<'a> {
    pub fn new(
        catalog: &'a dyn CatalogClient,
        prober: &'a dyn DeploymentProber,
        chooser: &'a dyn Chooser,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            catalog,
            prober,
            chooser,
            notifier,
        }
    }

    /// Validate, then resolve project and deployment
    pub async fn resolve(&self, request: &StatusRequest) -> Result<StatusTarget, ResolveError> {
        validate(self.catalog, request).await?;

        let project = self.resolve_project(request.project()).await?;
        if request.project().is_none() {
            validate_members(self.catalog, &project, request).await?;
        }

        let pair = self
            .resolve_deployment(&project, request.service(), request.environment())
            .await?;

        Ok(StatusTarget {
            project,
            service: pair.service,
            environment: pair.environment,
        })
    }

    /// Return `project` as-is, or ask the user to pick one from the catalog
    pub async fn resolve_project(&self, project: Option<&str>) -> Result<String, ResolveError> {
        if let Some(name) = project.filter(|p| !p.is_empty()) {
            return Ok(name.to_string());
        }

        let names: Vec<String> = self
            .catalog
            .list_projects()
            .await
            .map_err(ResolveError::ListProjects)?
            .into_iter()
            .map(|p| p.name)
            .collect();
        if names.is_empty() {
            return Err(ResolveError::NoProjectsFound);
        }

        let prompt = SelectionPrompt {
            prompt: PROJECT_PROMPT,
            help: PROJECT_HELP,
            noun: "project",
            target: "project".to_string(),
            auto: AutoSelect::Never,
        };
        select_candidate(self.chooser, self.notifier, &prompt, &names)
    }

    /// Find the single deployed (service, environment) pair in `project`
    ///
    /// `project` must already exist in the catalog.
    pub async fn resolve_deployment(
        &self,
        project: &str,
        service: Option<&str>,
        environment: Option<&str>,
    ) -> Result<CandidatePair, ResolveError> {
        let services = self.service_candidates(project, service).await?;
        let environments = self.environment_candidates(project, environment).await?;

        let candidates = CandidateSet::cross_product(services.as_slice(), environments.as_slice());
        let deployed = self.probe_candidates(project, &candidates).await?;
        if deployed.is_empty() {
            return Err(ResolveError::NoDeployedPairsFound {
                project: project.to_string(),
            });
        }

        let prompt = SelectionPrompt {
            prompt: DEPLOYMENT_PROMPT,
            help: DEPLOYMENT_HELP,
            noun: "deployed service",
            target: format!("deployed service for project {}", project),
            auto: AutoSelect::WhenSingle,
        };
        let key = select_candidate(self.chooser, self.notifier, &prompt, deployed.keys())?;
        deployed.get(&key).cloned().ok_or_else(|| {
            ResolveError::from_chooser(
                prompt.target.clone(),
                ChooserError::Failed(format!("unknown choice {}", key)),
            )
        })
    }

    async fn service_candidates(
        &self,
        project: &str,
        service: Option<&str>,
    ) -> Result<Vec<String>, ResolveError> {
        if let Some(name) = service.filter(|s| !s.is_empty()) {
            return Ok(vec![name.to_string()]);
        }
        let names: Vec<String> = self
            .catalog
            .list_services(project)
            .await
            .map_err(|source| ResolveError::ListServices {
                project: project.to_string(),
                source,
            })?
            .into_iter()
            .map(|s| s.name)
            .collect();
        if names.is_empty() {
            return Err(ResolveError::NoServicesFound {
                project: project.to_string(),
            });
        }
        Ok(names)
    }

    async fn environment_candidates(
        &self,
        project: &str,
        environment: Option<&str>,
    ) -> Result<Vec<String>, ResolveError> {
        if let Some(name) = environment.filter(|e| !e.is_empty()) {
            return Ok(vec![name.to_string()]);
        }
        let names: Vec<String> = self
            .catalog
            .list_environments(project)
            .await
            .map_err(|source| ResolveError::ListEnvironments {
                project: project.to_string(),
                source,
            })?
            .into_iter()
            .map(|e| e.name)
            .collect();
        if names.is_empty() {
            return Err(ResolveError::NoEnvironmentsFound {
                project: project.to_string(),
            });
        }
        Ok(names)
    }

    /// Probe every candidate in order and keep the deployed ones
    ///
    /// Stops at the first probe error; nothing after it is probed.
    async fn probe_candidates(
        &self,
        project: &str,
        candidates: &CandidateSet,
    ) -> Result<CandidateSet, ResolveError> {
        let mut deployed = CandidateSet::new();
        for pair in candidates.iter() {
            tracing::debug!(
                project = %project,
                service = %pair.service,
                environment = %pair.environment,
                "probing deployment"
            );
            match self
                .prober
                .probe(project, &pair.environment, &pair.service)
                .await
            {
                Ok(ProbeOutcome::Deployed { service_arn }) => {
                    tracing::debug!(pair = %pair, service_arn = %service_arn, "deployed");
                    deployed.insert(pair.clone());
                }
                Ok(ProbeOutcome::NotDeployed) => {
                    tracing::debug!(pair = %pair, "not deployed, skipping");
                }
                Err(source) => {
                    return Err(ResolveError::ProbeFailed {
                        project: project.to_string(),
                        environment: pair.environment.clone(),
                        service: pair.service.clone(),
                        source,
                    });
                }
            }
        }
        Ok(deployed)
    }
}
