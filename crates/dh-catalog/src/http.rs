//! HTTP catalog client
//!
//! Talks JSON to a remote catalog service. Routes, relative to the configured
//! endpoint:
//!
//! | Route                                                       | Body                 |
//! |-------------------------------------------------------------|----------------------|
//! | `GET /projects`                                             | `{"projects": [..]}` |
//! | `GET /projects/{p}`                                         | project              |
//! | `GET /projects/{p}/services[/{s}]`                          | `{"services": [..]}` / service |
//! | `GET /projects/{p}/environments[/{e}]`                      | `{"environments": [..]}` / environment |
//! | `GET /projects/{p}/environments/{e}/services/{s}/deployment`| `{"service_arn": ..}`|
//! | `GET /projects/{p}/environments/{e}/services/{s}/status`    | status payload       |
//!
//! A 404 on a single-item route means the item does not exist; on the
//! deployment route it means the service is not deployed there.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use dh_core::status::ServiceStatus;
use dh_core::traits::{CatalogClient, DeploymentProber, StatusDescriber};
use dh_core::types::{Environment, ProbeOutcome, Project, Service};
use dh_core::CatalogError;

#[derive(Debug, Deserialize)]
struct ProjectList {
    projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct ServiceList {
    services: Vec<Service>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentList {
    environments: Vec<Environment>,
}

#[derive(Debug, Deserialize)]
struct Deployment {
    service_arn: String,
}

/// Client for a remote catalog service
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpCatalog {
    /// Create a client for `endpoint` with a per-request `timeout`
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        token: Option<String>,
    ) -> Result<Self, CatalogError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| CatalogError::Transport(format!("invalid endpoint {}: {}", endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(CatalogError::Transport(format!(
                "invalid endpoint {}: not a base URL",
                endpoint
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("deckhand/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Build a URL from path segments, each percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Transport("endpoint cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document; `Ok(None)` on 404
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, CatalogError> {
        let url = self.url(segments)?;
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Transport(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                code: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| CatalogError::Decode(format!("GET {}: {}", url, e)))
    }

    /// GET a JSON document that must exist
    async fn require_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, CatalogError> {
        self.get_json(segments).await?.ok_or_else(|| CatalogError::Status {
            code: StatusCode::NOT_FOUND.as_u16(),
            message: format!("/{} not found", segments.join("/")),
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalog {
    async fn list_projects(&self) -> Result<Vec<Project>, CatalogError> {
        let list: ProjectList = self.require_json(&["projects"]).await?;
        Ok(list.projects)
    }

    async fn get_project(&self, name: &str) -> Result<Option<Project>, CatalogError> {
        self.get_json(&["projects", name]).await
    }

    async fn list_services(&self, project: &str) -> Result<Vec<Service>, CatalogError> {
        let list: ServiceList = self.require_json(&["projects", project, "services"]).await?;
        Ok(list
            .services
            .into_iter()
            .map(|mut s| {
                s.project = project.to_string();
                s
            })
            .collect())
    }

    async fn get_service(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Option<Service>, CatalogError> {
        let service: Option<Service> = self
            .get_json(&["projects", project, "services", name])
            .await?;
        Ok(service.map(|mut s| {
            s.project = project.to_string();
            s
        }))
    }

    async fn list_environments(&self, project: &str) -> Result<Vec<Environment>, CatalogError> {
        let list: EnvironmentList = self
            .require_json(&["projects", project, "environments"])
            .await?;
        Ok(list
            .environments
            .into_iter()
            .map(|mut e| {
                e.project = project.to_string();
                e
            })
            .collect())
    }

    async fn get_environment(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Option<Environment>, CatalogError> {
        let environment: Option<Environment> = self
            .get_json(&["projects", project, "environments", name])
            .await?;
        Ok(environment.map(|mut e| {
            e.project = project.to_string();
            e
        }))
    }
}

#[async_trait]
impl DeploymentProber for HttpCatalog {
    async fn probe(
        &self,
        project: &str,
        environment: &str,
        service: &str,
    ) -> Result<ProbeOutcome, CatalogError> {
        let deployment: Option<Deployment> = self
            .get_json(&[
                "projects",
                project,
                "environments",
                environment,
                "services",
                service,
                "deployment",
            ])
            .await?;
        Ok(match deployment {
            Some(d) => ProbeOutcome::Deployed {
                service_arn: d.service_arn,
            },
            None => ProbeOutcome::NotDeployed,
        })
    }
}

#[async_trait]
impl StatusDescriber for HttpCatalog {
    async fn describe(
        &self,
        project: &str,
        environment: &str,
        service: &str,
    ) -> Result<ServiceStatus, CatalogError> {
        let status: Option<ServiceStatus> = self
            .get_json(&[
                "projects",
                project,
                "environments",
                environment,
                "services",
                service,
                "status",
            ])
            .await?;
        status.ok_or_else(|| CatalogError::MissingDeployment {
            service: service.to_string(),
            environment: environment.to_string(),
        })
    }
}
