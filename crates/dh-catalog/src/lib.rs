//! dh-catalog: Backends for the deckhand collaborator traits
//!
//! Two backends are provided:
//! - [`ManifestCatalog`] reads a local TOML manifest on every call
//! - [`HttpCatalog`] talks to a remote catalog service over JSON/HTTP
//!
//! Each implements [`CatalogClient`], [`DeploymentProber`] and
//! [`StatusDescriber`]. [`Backend::from_config`] picks one from the user's
//! configuration.

pub mod http;
pub mod manifest;

pub use http::HttpCatalog;
pub use manifest::ManifestCatalog;

use dh_core::config::{CatalogBackend, CatalogConfig};
use dh_core::traits::{CatalogClient, DeploymentProber, StatusDescriber};
use dh_core::CatalogError;

/// The configured catalog backend
pub enum Backend {
    Manifest(ManifestCatalog),
    Http(HttpCatalog),
}

impl Backend {
    /// Build the backend described by `config`
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        match config.backend {
            CatalogBackend::Manifest => {
                let path = config.manifest_path.clone().ok_or_else(|| {
                    CatalogError::NotConfigured("catalog.manifest_path is not set".to_string())
                })?;
                tracing::debug!("Using manifest catalog at {:?}", path);
                Ok(Backend::Manifest(ManifestCatalog::new(path)))
            }
            CatalogBackend::Http => {
                let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                    CatalogError::NotConfigured("catalog.endpoint is not set".to_string())
                })?;
                tracing::debug!("Using HTTP catalog at {}", endpoint);
                Ok(Backend::Http(HttpCatalog::new(
                    endpoint,
                    config.timeout,
                    config.token(),
                )?))
            }
        }
    }

    pub fn catalog(&self) -> &dyn CatalogClient {
        match self {
            Backend::Manifest(m) => m,
            Backend::Http(h) => h,
        }
    }

    pub fn prober(&self) -> &dyn DeploymentProber {
        match self {
            Backend::Manifest(m) => m,
            Backend::Http(h) => h,
        }
    }

    pub fn describer(&self) -> &dyn StatusDescriber {
        match self {
            Backend::Manifest(m) => m,
            Backend::Http(h) => h,
        }
    }
}
