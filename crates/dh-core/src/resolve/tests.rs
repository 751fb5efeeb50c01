use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::*;
use crate::error::{CatalogError, ChooserError};
use crate::types::{Environment, IdentifierKind, Project, Service};

/// Catalog fake that records every call
#[derive(Default)]
struct MockCatalog {
    projects: Vec<String>,
    services: Vec<String>,
    environments: Vec<String>,
    fail_services: bool,
    calls: Mutex<Vec<String>>,
}

impl MockCatalog {
    fn new(projects: &[&str], services: &[&str], environments: &[&str]) -> Self {
        Self {
            projects: projects.iter().map(|s| s.to_string()).collect(),
            services: services.iter().map(|s| s.to_string()).collect(),
            environments: environments.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn listing_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("list_")).count()
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    async fn list_projects(&self) -> Result<Vec<Project>, CatalogError> {
        self.record("list_projects".into());
        Ok(self.projects.iter().map(Project::new).collect())
    }

    async fn get_project(&self, name: &str) -> Result<Option<Project>, CatalogError> {
        self.record(format!("get_project {}", name));
        Ok(self
            .projects
            .iter()
            .find(|p| p.as_str() == name)
            .map(Project::new))
    }

    async fn list_services(&self, project: &str) -> Result<Vec<Service>, CatalogError> {
        self.record(format!("list_services {}", project));
        if self.fail_services {
            return Err(CatalogError::Transport("connection reset".into()));
        }
        Ok(self
            .services
            .iter()
            .map(|s| Service::new(project, s))
            .collect())
    }

    async fn get_service(&self, project: &str, name: &str) -> Result<Option<Service>, CatalogError> {
        self.record(format!("get_service {} {}", project, name));
        Ok(self
            .services
            .iter()
            .find(|s| s.as_str() == name)
            .map(|s| Service::new(project, s)))
    }

    async fn list_environments(&self, project: &str) -> Result<Vec<Environment>, CatalogError> {
        self.record(format!("list_environments {}", project));
        Ok(self
            .environments
            .iter()
            .map(|e| Environment::new(project, e))
            .collect())
    }

    async fn get_environment(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Option<Environment>, CatalogError> {
        self.record(format!("get_environment {} {}", project, name));
        Ok(self
            .environments
            .iter()
            .find(|e| e.as_str() == name)
            .map(|e| Environment::new(project, e)))
    }
}

#[derive(Clone, Copy)]
enum Probe {
    Deployed,
    Fail,
}

/// Prober fake; pairs not listed are not deployed
#[derive(Default)]
struct MockProber {
    outcomes: HashMap<(String, String), Probe>,
    probes: Mutex<Vec<String>>,
}

impl MockProber {
    fn with(mut self, service: &str, environment: &str, probe: Probe) -> Self {
        self.outcomes
            .insert((service.to_string(), environment.to_string()), probe);
        self
    }

    fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeploymentProber for MockProber {
    async fn probe(
        &self,
        project: &str,
        environment: &str,
        service: &str,
    ) -> Result<ProbeOutcome, CatalogError> {
        self.probes
            .lock()
            .unwrap()
            .push(format!("{}/{}/{}", project, service, environment));
        match self
            .outcomes
            .get(&(service.to_string(), environment.to_string()))
        {
            Some(Probe::Deployed) => Ok(ProbeOutcome::Deployed {
                service_arn: format!("arn:{}:{}", service, environment),
            }),
            Some(Probe::Fail) => Err(CatalogError::Status {
                code: 403,
                message: "access denied".into(),
            }),
            None => Ok(ProbeOutcome::NotDeployed),
        }
    }
}

enum Answer {
    Pick(usize),
    Abort,
    Fail,
    Bogus,
}

/// Chooser fake that answers with a scripted response
struct MockChooser {
    answer: Answer,
    asked: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockChooser {
    fn new(answer: Answer) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    fn asked(&self) -> Vec<(String, Vec<String>)> {
        self.asked.lock().unwrap().clone()
    }
}

impl Chooser for MockChooser {
    fn select_one(
        &self,
        prompt: &str,
        _help: &str,
        choices: &[String],
    ) -> Result<String, ChooserError> {
        self.asked
            .lock()
            .unwrap()
            .push((prompt.to_string(), choices.to_vec()));
        match self.answer {
            Answer::Pick(i) => Ok(choices[i].clone()),
            Answer::Abort => Err(ChooserError::Aborted),
            Answer::Fail => Err(ChooserError::Failed("terminal closed".into())),
            Answer::Bogus => Ok("nope/never".into()),
        }
    }
}

#[derive(Default)]
struct MockNotifier {
    notices: Mutex<Vec<String>>,
}

impl MockNotifier {
    fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn auto_selected(&self, what: &str, choice: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(format!("{}: {}", what, choice));
    }
}

fn coffee() -> MockCatalog {
    MockCatalog::new(&["coffee", "tea"], &["api", "web"], &["test", "prod"])
}

#[tokio::test]
async fn test_fully_specified_request_probes_once_without_listing() {
    let catalog = coffee();
    let prober = MockProber::default().with("api", "test", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let request = StatusRequest::new()
        .with_project(Some("coffee"))
        .with_service(Some("api"))
        .with_environment(Some("test"));
    let target = resolver.resolve(&request).await.unwrap();

    assert_eq!(
        target,
        StatusTarget {
            project: "coffee".into(),
            service: "api".into(),
            environment: "test".into(),
        }
    );
    assert_eq!(catalog.listing_calls(), 0);
    assert_eq!(prober.probes(), ["coffee/api/test"]);
    assert!(chooser.asked().is_empty());
    assert_eq!(notifier.notices(), ["deployed service: api/test"]);
}

#[tokio::test]
async fn test_multiple_deployed_pairs_prompt_in_service_major_order() {
    let catalog = coffee();
    let prober = MockProber::default()
        .with("api", "test", Probe::Deployed)
        .with("web", "prod", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Pick(1));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let pair = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap();

    assert_eq!(pair, CandidatePair::new("web", "prod"));
    let asked = chooser.asked();
    assert_eq!(asked.len(), 1);
    assert_eq!(asked[0].0, DEPLOYMENT_PROMPT);
    assert_eq!(asked[0].1, ["api/test", "web/prod"]);
    assert!(notifier.notices().is_empty());
    assert_eq!(
        prober.probes(),
        [
            "coffee/api/test",
            "coffee/api/prod",
            "coffee/web/test",
            "coffee/web/prod"
        ]
    );
}

#[tokio::test]
async fn test_every_deployed_pair_is_offered() {
    let catalog = coffee();
    let prober = MockProber::default()
        .with("api", "test", Probe::Deployed)
        .with("api", "prod", Probe::Deployed)
        .with("web", "test", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap();

    assert_eq!(chooser.asked()[0].1, ["api/test", "api/prod", "web/test"]);
}

#[tokio::test]
async fn test_single_deployed_pair_is_auto_selected() {
    let catalog = MockCatalog::new(&["coffee"], &["api"], &["test"]);
    let prober = MockProber::default().with("api", "test", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Abort);
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let pair = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap();

    assert_eq!(pair, CandidatePair::new("api", "test"));
    assert!(chooser.asked().is_empty());
    assert_eq!(notifier.notices(), ["deployed service: api/test"]);
}

#[tokio::test]
async fn test_single_survivor_of_larger_product_is_auto_selected() {
    let catalog = coffee();
    let prober = MockProber::default().with("web", "test", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let pair = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap();

    assert_eq!(pair, CandidatePair::new("web", "test"));
    assert!(chooser.asked().is_empty());
    assert_eq!(prober.probes().len(), 4);
}

#[tokio::test]
async fn test_nothing_deployed_fails_without_prompting() {
    let catalog = coffee();
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let err = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::NoDeployedPairsFound { ref project } if project == "coffee"));
    assert!(chooser.asked().is_empty());
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_probe_error_aborts_and_stops_probing() {
    let catalog = coffee();
    let prober = MockProber::default()
        .with("api", "test", Probe::Deployed)
        .with("api", "prod", Probe::Fail)
        .with("web", "prod", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let err = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap_err();

    match err {
        ResolveError::ProbeFailed {
            project,
            environment,
            service,
            source,
        } => {
            assert_eq!(project, "coffee");
            assert_eq!(service, "api");
            assert_eq!(environment, "prod");
            assert!(matches!(source, CatalogError::Status { code: 403, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(prober.probes(), ["coffee/api/test", "coffee/api/prod"]);
    assert!(chooser.asked().is_empty());
}

#[tokio::test]
async fn test_empty_service_listing_fails_before_probing() {
    let catalog = MockCatalog::new(&["coffee"], &[], &["test"]);
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let err = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::NoServicesFound { ref project } if project == "coffee"));
    assert!(prober.probes().is_empty());
}

#[tokio::test]
async fn test_empty_environment_listing_fails_before_probing() {
    let catalog = MockCatalog::new(&["coffee"], &["api"], &[]);
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let err = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::NoEnvironmentsFound { .. }));
    assert!(prober.probes().is_empty());
}

#[tokio::test]
async fn test_service_listing_failure_is_wrapped_with_project() {
    let mut catalog = coffee();
    catalog.fail_services = true;
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let err = resolver
        .resolve_deployment("coffee", None, Some("test"))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::ListServices { ref project, .. } if project == "coffee"));
    assert_eq!(
        err.to_string(),
        "list services for project coffee: transport failure: connection reset"
    );
}

#[tokio::test]
async fn test_fixed_service_only_lists_environments() {
    let catalog = coffee();
    let prober = MockProber::default().with("api", "prod", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let pair = resolver
        .resolve_deployment("coffee", Some("api"), None)
        .await
        .unwrap();

    assert_eq!(pair, CandidatePair::new("api", "prod"));
    assert_eq!(catalog.calls(), ["list_environments coffee"]);
    assert_eq!(prober.probes(), ["coffee/api/test", "coffee/api/prod"]);
}

#[tokio::test]
async fn test_deployment_abort_is_propagated() {
    let catalog = coffee();
    let prober = MockProber::default()
        .with("api", "test", Probe::Deployed)
        .with("web", "test", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Abort);
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let err = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::SelectionAborted { .. }));
}

#[tokio::test]
async fn test_chooser_answer_outside_choices_fails() {
    let catalog = coffee();
    let prober = MockProber::default()
        .with("api", "test", Probe::Deployed)
        .with("web", "test", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Bogus);
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let err = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::SelectionFailed { .. }));
}

#[tokio::test]
async fn test_supplied_project_is_trusted() {
    let catalog = coffee();
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let project = resolver.resolve_project(Some("latte")).await.unwrap();

    assert_eq!(project, "latte");
    assert!(catalog.calls().is_empty());
}

#[tokio::test]
async fn test_missing_project_is_always_prompted() {
    let catalog = MockCatalog::new(&["coffee"], &["api"], &["test"]);
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let project = resolver.resolve_project(Some("")).await.unwrap();

    assert_eq!(project, "coffee");
    let asked = chooser.asked();
    assert_eq!(asked, [(PROJECT_PROMPT.to_string(), vec!["coffee".to_string()])]);
}

#[tokio::test]
async fn test_no_projects_fails() {
    let catalog = MockCatalog::new(&[], &[], &[]);
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let err = resolver.resolve_project(None).await.unwrap_err();

    assert!(matches!(err, ResolveError::NoProjectsFound));
    assert!(chooser.asked().is_empty());
}

#[tokio::test]
async fn test_project_abort_and_failure_are_distinguished() {
    let catalog = coffee();
    let prober = MockProber::default();
    let notifier = MockNotifier::default();

    let aborting = MockChooser::new(Answer::Abort);
    let err = Resolver::new(&catalog, &prober, &aborting, &notifier)
        .resolve_project(None)
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::SelectionAborted { ref target } if target == "project"));

    let failing = MockChooser::new(Answer::Fail);
    let err = Resolver::new(&catalog, &prober, &failing, &notifier)
        .resolve_project(None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::SelectionFailed {
            source: ChooserError::Failed(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_validation_rejects_unknown_environment_before_listing() {
    let catalog = coffee();
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let request = StatusRequest::new()
        .with_project(Some("coffee"))
        .with_environment(Some("staging"));
    let err = resolver.resolve(&request).await.unwrap_err();

    match err {
        ResolveError::NotFound { kind, name } => {
            assert_eq!(kind, IdentifierKind::Environment);
            assert_eq!(name, "staging");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(catalog.listing_calls(), 0);
    assert!(prober.probes().is_empty());
}

#[tokio::test]
async fn test_validation_rejects_unknown_project() {
    let catalog = coffee();
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let request = StatusRequest::new()
        .with_project(Some("latte"))
        .with_service(Some("api"));
    let err = resolver.resolve(&request).await.unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NotFound {
            kind: IdentifierKind::Project,
            ..
        }
    ));
    assert_eq!(catalog.calls(), ["get_project latte"]);
}

#[tokio::test]
async fn test_service_is_validated_after_project_is_chosen() {
    let catalog = coffee();
    let prober = MockProber::default();
    let chooser = MockChooser::new(Answer::Pick(1));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let request = StatusRequest::new().with_service(Some("worker"));
    let err = resolver.resolve(&request).await.unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NotFound {
            kind: IdentifierKind::Service,
            ref name,
        } if name == "worker"
    ));
    assert_eq!(
        catalog.calls(),
        ["list_projects", "get_service tea worker"]
    );
}

#[tokio::test]
async fn test_full_resolution_from_nothing() {
    let catalog = coffee();
    let prober = MockProber::default()
        .with("api", "test", Probe::Deployed)
        .with("web", "prod", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let target = resolver.resolve(&StatusRequest::new()).await.unwrap();

    assert_eq!(target.project, "coffee");
    assert_eq!(target.service, "api");
    assert_eq!(target.environment, "test");
    let asked = chooser.asked();
    assert_eq!(asked.len(), 2);
    assert_eq!(asked[0].1, ["coffee", "tea"]);
    assert_eq!(asked[1].1, ["api/test", "web/prod"]);
}

#[test]
fn test_select_candidate_never_calls_chooser_with_empty_list() {
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let prompt = SelectionPrompt {
        prompt: "pick",
        help: "",
        noun: "thing",
        target: "thing".into(),
        auto: AutoSelect::WhenSingle,
    };

    let err = select_candidate(&chooser, &notifier, &prompt, &[]).unwrap_err();

    assert!(matches!(
        err,
        ResolveError::SelectionFailed {
            source: ChooserError::NoChoices,
            ..
        }
    ));
    assert!(chooser.asked().is_empty());
}

#[tokio::test]
async fn test_pairs_with_colliding_display_keys_are_all_probed() {
    let catalog = MockCatalog::new(&["coffee"], &["a", "a/b"], &["b/c", "c"]);
    let prober = MockProber::default().with("a/b", "c", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Pick(0));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let pair = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap();

    assert_eq!(pair, CandidatePair::new("a/b", "c"));
    assert_eq!(prober.probes().len(), 4);
    assert!(chooser.asked().is_empty());
}

#[tokio::test]
async fn test_colliding_deployed_pairs_are_told_apart_in_the_prompt() {
    let catalog = MockCatalog::new(&["coffee"], &["a", "a/b"], &["b/c", "c"]);
    let prober = MockProber::default()
        .with("a", "b/c", Probe::Deployed)
        .with("a/b", "c", Probe::Deployed);
    let chooser = MockChooser::new(Answer::Pick(1));
    let notifier = MockNotifier::default();
    let resolver = Resolver::new(&catalog, &prober, &chooser, &notifier);

    let pair = resolver
        .resolve_deployment("coffee", None, None)
        .await
        .unwrap();

    assert_eq!(chooser.asked()[0].1, ["a/b/c", "a/b/c (2)"]);
    assert_eq!(pair, CandidatePair::new("a/b", "c"));
}
