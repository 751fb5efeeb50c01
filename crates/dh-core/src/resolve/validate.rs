//! Existence checks for explicitly supplied identifiers

use crate::error::{CatalogError, ResolveError};
use crate::traits::CatalogClient;
use crate::types::IdentifierKind;

use super::StatusRequest;

/// Check every identifier the caller supplied against the catalog
///
/// Runs before resolution; a missing identifier fails fast with
/// [`ResolveError::NotFound`]. Service and environment are scoped to the
/// project, so when no project was supplied only [`validate_members`] can
/// check them, once the project has been chosen.
pub async fn validate(
    catalog: &dyn CatalogClient,
    request: &StatusRequest,
) -> Result<(), ResolveError> {
    let Some(project) = request.project() else {
        return Ok(());
    };
    validate_project(catalog, project).await?;
    validate_members(catalog, project, request).await
}

/// Check that `project` exists
pub async fn validate_project(
    catalog: &dyn CatalogClient,
    project: &str,
) -> Result<(), ResolveError> {
    let found = catalog
        .get_project(project)
        .await
        .map_err(|source| lookup_failed(IdentifierKind::Project, project, source))?;
    match found {
        Some(_) => Ok(()),
        None => Err(not_found(IdentifierKind::Project, project)),
    }
}

/// Check the supplied service and environment within `project`
pub async fn validate_members(
    catalog: &dyn CatalogClient,
    project: &str,
    request: &StatusRequest,
) -> Result<(), ResolveError> {
    if let Some(service) = request.service() {
        let found = catalog
            .get_service(project, service)
            .await
            .map_err(|source| lookup_failed(IdentifierKind::Service, service, source))?;
        if found.is_none() {
            return Err(not_found(IdentifierKind::Service, service));
        }
    }

    if let Some(environment) = request.environment() {
        let found = catalog
            .get_environment(project, environment)
            .await
            .map_err(|source| lookup_failed(IdentifierKind::Environment, environment, source))?;
        if found.is_none() {
            return Err(not_found(IdentifierKind::Environment, environment));
        }
    }

    Ok(())
}

fn not_found(kind: IdentifierKind, name: &str) -> ResolveError {
    ResolveError::NotFound {
        kind,
        name: name.to_string(),
    }
}

fn lookup_failed(kind: IdentifierKind, name: &str, source: CatalogError) -> ResolveError {
    ResolveError::Lookup {
        kind,
        name: name.to_string(),
        source,
    }
}
