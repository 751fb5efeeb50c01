//! Status command implementation

use anyhow::{Context, Result};

use dh_catalog::Backend;
use dh_core::config::DeckhandConfig;
use dh_core::resolve::{Resolver, StatusRequest};
use dh_core::status::ServiceStatus;
use dh_core::traits::{CatalogClient, Chooser, DeploymentProber, Notifier, StatusDescriber};
use dh_core::{DhError, ResolveError};

use crate::output::{format_status, Output};
use crate::prompt::{TerminalChooser, TerminalNotifier};

/// Identifiers and flags given to `deckhand status`
#[derive(Debug, Clone, Default)]
pub struct StatusArgs {
    pub project: Option<String>,
    pub service: Option<String>,
    pub environment: Option<String>,
    pub json: bool,
}

/// Resolve the deployment `request` points at and describe it
///
/// The describer is called exactly once, after resolution succeeds.
pub async fn describe_status(
    catalog: &dyn CatalogClient,
    prober: &dyn DeploymentProber,
    describer: &dyn StatusDescriber,
    chooser: &dyn Chooser,
    notifier: &dyn Notifier,
    request: &StatusRequest,
) -> Result<ServiceStatus, DhError> {
    let resolver = Resolver::new(catalog, prober, chooser, notifier);
    let target = resolver.resolve(request).await?;
    tracing::info!(
        project = %target.project,
        service = %target.service,
        environment = %target.environment,
        "describing service status"
    );
    describer
        .describe(&target.project, &target.environment, &target.service)
        .await
        .map_err(|source| DhError::Describe {
            service: target.service.clone(),
            environment: target.environment.clone(),
            source,
        })
}

/// Project named on the command line, else the configured default
///
/// An empty `--project` counts as absent.
fn requested_project<'a>(args: &'a StatusArgs, config: &'a DeckhandConfig) -> Option<&'a str> {
    args.project
        .as_deref()
        .filter(|p| !p.is_empty())
        .or_else(|| config.default_project.as_deref().filter(|p| !p.is_empty()))
}

/// Execute the status command
pub async fn status_command(config: &DeckhandConfig, output: Output, args: StatusArgs) -> Result<()> {
    let backend = Backend::from_config(&config.catalog).context("connect to catalog")?;
    let chooser = TerminalChooser::new(output);
    let notifier = TerminalNotifier::new(output);

    let project = requested_project(&args, config);
    let request = StatusRequest::new()
        .with_project(project)
        .with_service(args.service.as_deref())
        .with_environment(args.environment.as_deref());

    let status = match describe_status(
        backend.catalog(),
        backend.prober(),
        backend.describer(),
        &chooser,
        &notifier,
        &request,
    )
    .await
    {
        Ok(s) => s,
        Err(DhError::Resolve(ResolveError::NoProjectsFound)) => {
            output.info(&format!(
                "Add a project to your catalog, or check the catalog settings with {}",
                output.highlight_code("deckhand config show")
            ));
            return Err(DhError::Resolve(ResolveError::NoProjectsFound).into());
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        let data = status
            .to_json_string()
            .context("serialize status as JSON")?;
        println!("{}", data);
    } else {
        print!("{}", format_status(&status, &output));
    }

    Ok(())
}
