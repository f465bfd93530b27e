//! End-to-end lifecycle scenarios for the container.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use servisor::{
    Container, ContainerConfig, ContainerError, ContainerState, Event, EventKind, Init, Service,
    ServiceBuilder, ServiceError, ServiceSpec, ServiceState, Subscribe, WaitOutcome,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Counts init/run invocations and terminal exits for one service.
#[derive(Default)]
struct Counters {
    inits: AtomicUsize,
    runs: AtomicUsize,
    exits: AtomicUsize,
}

/// Service that runs until cancelled, with configurable init/run failures.
struct Scripted {
    name: &'static str,
    counters: Arc<Counters>,
    init_error: Option<&'static str>,
    run_error: Option<&'static str>,
}

impl Scripted {
    fn new(name: &'static str) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        (
            Self {
                name,
                counters: counters.clone(),
                init_error: None,
                run_error: None,
            },
            counters,
        )
    }

    fn failing_init(mut self, error: &'static str) -> Self {
        self.init_error = Some(error);
        self
    }

    fn failing_run(mut self, error: &'static str) -> Self {
        self.run_error = Some(error);
        self
    }
}

#[async_trait]
impl Service for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
        self.counters.runs.fetch_add(1, Ordering::SeqCst);
        let res = match self.run_error {
            Some(error) => {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Err(ServiceError::fail(error))
            }
            None => {
                ctx.cancelled().await;
                Ok(())
            }
        };
        self.counters.exits.fetch_add(1, Ordering::SeqCst);
        res
    }
}

#[async_trait]
impl Init for Scripted {
    async fn init(&self, _ctx: CancellationToken) -> Result<(), ServiceError> {
        self.counters.inits.fetch_add(1, Ordering::SeqCst);
        match self.init_error {
            Some(error) => Err(ServiceError::fail(error)),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn services_with(&self, kind: EventKind) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| e.service.as_deref().map(str::to_string))
            .collect()
    }
}

impl Subscribe for Recorder {
    fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

fn register(container: &Container, service: Scripted) {
    container
        .register(ServiceSpec::initializing(Arc::new(service)))
        .unwrap();
}

#[test]
fn duplicate_registration_keeps_single_entry() {
    let container = Container::new();
    let (a1, _) = Scripted::new("A");
    let (a2, _) = Scripted::new("A");

    register(&container, a1);
    let err = container
        .register(ServiceSpec::initializing(Arc::new(a2)))
        .unwrap_err();

    assert!(matches!(err, ContainerError::DuplicateService { ref name } if name == "A"));
    assert!(err.is_misuse());
    assert_eq!(container.registered_names(), vec!["A".to_string()]);
}

#[tokio::test]
async fn init_failure_aborts_startup() {
    let rec = Arc::new(Recorder::default());
    let container = Container::builder(ContainerConfig::default())
        .with_subscribers(vec![rec.clone()])
        .build();

    let (s1, p1) = Scripted::new("s1");
    let (s2, p2) = Scripted::new("s2");
    let (s3, p3) = Scripted::new("s3");
    register(&container, s1);
    register(&container, s2.failing_init("x"));
    register(&container, s3);

    let err = container
        .start_all(&CancellationToken::new())
        .await
        .unwrap_err();

    match &err {
        ContainerError::InitFailed { service, source } => {
            assert_eq!(service, "s2");
            assert_eq!(source, &ServiceError::fail("x"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("s2"));
    assert!(err.to_string().contains('x'));

    assert_eq!(p1.inits.load(Ordering::SeqCst), 1);
    assert_eq!(p2.inits.load(Ordering::SeqCst), 1);
    assert_eq!(p3.inits.load(Ordering::SeqCst), 0);
    for p in [&p1, &p2, &p3] {
        assert_eq!(p.runs.load(Ordering::SeqCst), 0);
    }

    assert!(container.is_stop_requested());
    assert_eq!(container.service_state("s1"), Some(ServiceState::Stopped));
    assert_eq!(container.service_state("s2"), Some(ServiceState::InitFailed));
    assert_eq!(container.service_state("s3"), Some(ServiceState::Registered));
    assert_eq!(container.service_names(), vec!["s1", "s2"]);
    assert_eq!(container.state(), ContainerState::Stopped);

    // Nothing waits on a run that never happens.
    let outcome = container
        .wait_all_stopped(Some(Duration::from_secs(1)))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::AllStopped);
    assert!(container.service_errors().is_empty());

    assert_eq!(rec.services_with(EventKind::ServiceInitFailed), vec!["s2"]);
    assert!(rec.services_with(EventKind::ServiceStarting).is_empty());
}

#[tokio::test]
async fn stop_then_wait_reaches_terminal_state_once() {
    let container = Container::new();
    let mut all_counters = Vec::new();
    for name in ["s1", "s2", "s3"] {
        let (svc, counters) = Scripted::new(name);
        register(&container, svc);
        all_counters.push(counters);
    }

    container.start_all(&CancellationToken::new()).await.unwrap();
    assert_eq!(container.running_count(), 3);
    assert_eq!(container.state(), ContainerState::Running);

    container.stop_all().unwrap();
    let outcome = container.wait_all_stopped(None).await.unwrap();

    assert_eq!(outcome, WaitOutcome::AllStopped);
    for p in &all_counters {
        assert_eq!(p.inits.load(Ordering::SeqCst), 1);
        assert_eq!(p.runs.load(Ordering::SeqCst), 1);
        assert_eq!(p.exits.load(Ordering::SeqCst), 1);
    }
    assert_eq!(container.running_count(), 0);
    assert!(container.service_errors().is_empty());
    assert_eq!(container.state(), ContainerState::Stopped);
}

#[tokio::test]
async fn run_failure_cascades_without_explicit_stop() {
    let rec = Arc::new(Recorder::default());
    let container = Container::builder(ContainerConfig::default())
        .with_subscribers(vec![rec.clone()])
        .build();

    let (s1, p1) = Scripted::new("s1");
    let (s2, _) = Scripted::new("s2");
    let (s3, p3) = Scripted::new("s3");
    register(&container, s1);
    register(&container, s2.failing_run("boom"));
    register(&container, s3);

    container.start_all(&CancellationToken::new()).await.unwrap();

    let outcome = container
        .wait_all_stopped(Some(Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::AllStopped);

    assert_eq!(p1.exits.load(Ordering::SeqCst), 1);
    assert_eq!(p3.exits.load(Ordering::SeqCst), 1);

    let errors = container.service_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("s2"), Some(&ServiceError::fail("boom")));

    assert_eq!(container.service_state("s1"), Some(ServiceState::Stopped));
    assert_eq!(container.service_state("s2"), Some(ServiceState::Failed));
    assert_eq!(rec.services_with(EventKind::ServiceFailed), vec!["s2"]);
}

#[tokio::test]
async fn second_start_fails_and_leaves_services_running() {
    let container = Container::new();
    let (s1, p1) = Scripted::new("s1");
    register(&container, s1);

    let parent = CancellationToken::new();
    container.start_all(&parent).await.unwrap();

    let err = container.start_all(&parent).await.unwrap_err();
    assert!(matches!(err, ContainerError::AlreadyStarted));

    assert_eq!(container.running_count(), 1);
    assert!(!container.is_stop_requested());
    assert_eq!(p1.inits.load(Ordering::SeqCst), 1);

    let outcome = container.stop_and_wait(None).await.unwrap();
    assert!(outcome.is_all_stopped());
}

struct Stubborn;

#[async_trait]
impl Service for Stubborn {
    fn name(&self) -> &str {
        "stubborn"
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<(), ServiceError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn wait_timeout_returns_and_leaves_service_running() {
    let rec = Arc::new(Recorder::default());
    let container = Container::builder(ContainerConfig::default())
        .with_subscribers(vec![rec.clone()])
        .build();
    container
        .register(ServiceSpec::new(Arc::new(Stubborn)))
        .unwrap();
    let (polite, _) = Scripted::new("polite");
    register(&container, polite);

    container.start_all(&CancellationToken::new()).await.unwrap();
    container.stop_all().unwrap();

    let deadline = Duration::from_millis(200);
    let started = Instant::now();
    let outcome = container.wait_all_stopped(Some(deadline)).await.unwrap();

    assert!(started.elapsed() <= deadline + Duration::from_millis(5));
    assert_eq!(
        outcome,
        WaitOutcome::TimedOut {
            stuck: vec!["stubborn".to_string()]
        }
    );
    assert!(container.running_count() > 0);
    assert_eq!(container.service_state("polite"), Some(ServiceState::Stopped));
    assert_eq!(container.service_state("stubborn"), Some(ServiceState::Running));
    assert_eq!(
        rec.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == EventKind::WaitTimedOut)
            .count(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn wait_without_stop_never_cancels() {
    let container = Container::new();
    let (svc, counters) = Scripted::new("idle");
    register(&container, svc);
    container.start_all(&CancellationToken::new()).await.unwrap();

    let outcome = container
        .wait_all_stopped(Some(Duration::from_millis(50)))
        .await
        .unwrap();

    assert!(!outcome.is_all_stopped());
    assert!(!container.is_stop_requested());
    assert_eq!(counters.exits.load(Ordering::SeqCst), 0);

    container.stop_all().unwrap();
    assert!(container.wait_all_stopped(None).await.unwrap().is_all_stopped());
}

#[tokio::test(start_paused = true)]
async fn default_wait_timeout_comes_from_config() {
    let cfg = ContainerConfig {
        wait_timeout: Duration::from_millis(100),
        ..ContainerConfig::default()
    };
    let container = Container::builder(cfg).build();
    container
        .register(ServiceSpec::new(Arc::new(Stubborn)))
        .unwrap();
    container.start_all(&CancellationToken::new()).await.unwrap();

    let outcome = container.stop_and_wait_default().await.unwrap();
    assert!(matches!(outcome, WaitOutcome::TimedOut { ref stuck } if stuck == &["stubborn"]));
}

#[tokio::test]
async fn run_panic_is_reported_as_failure() {
    let container = Container::new();
    ServiceBuilder::new("panicky")
        .run(|_ctx: CancellationToken| async {
            if true {
                panic!("exploded");
            }
            Ok::<(), ServiceError>(())
        })
        .register(&container)
        .unwrap();
    let (steady, counters) = Scripted::new("steady");
    register(&container, steady);

    container.start_all(&CancellationToken::new()).await.unwrap();
    let outcome = container
        .wait_all_stopped(Some(Duration::from_secs(5)))
        .await
        .unwrap();

    assert!(outcome.is_all_stopped());
    assert_eq!(counters.exits.load(Ordering::SeqCst), 1);
    assert_eq!(
        container.service_errors().get("panicky"),
        Some(&ServiceError::Panicked {
            info: "exploded".to_string()
        })
    );
}

#[tokio::test]
async fn canceled_before_stop_cascades_and_is_reported() {
    let container = Container::new();
    ServiceBuilder::new("quitter")
        .run(|_ctx: CancellationToken| async { Err::<(), _>(ServiceError::Canceled) })
        .register(&container)
        .unwrap();
    let (other, counters) = Scripted::new("other");
    register(&container, other);

    container.start_all(&CancellationToken::new()).await.unwrap();
    let outcome = container
        .wait_all_stopped(Some(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(outcome, WaitOutcome::AllStopped);
    assert!(container.is_stop_requested());
    assert_eq!(counters.exits.load(Ordering::SeqCst), 1);
    assert_eq!(container.service_state("quitter"), Some(ServiceState::Failed));
    assert_eq!(container.service_state("other"), Some(ServiceState::Stopped));
    assert_eq!(
        container.service_errors().get("quitter"),
        Some(&ServiceError::Canceled)
    );
    assert_eq!(container.service_errors().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropped_start_all_leaves_nothing_pending() {
    let container = Container::new();
    let (fast, fast_counters) = Scripted::new("fast");
    register(&container, fast);
    ServiceBuilder::new("slow")
        .init(|_ctx: CancellationToken| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<(), ServiceError>(())
        })
        .register(&container)
        .unwrap();

    let token = CancellationToken::new();
    let start = container.start_all(&token);
    let res = tokio::time::timeout(Duration::from_millis(10), start).await;
    assert!(res.is_err());

    assert_eq!(container.state(), ContainerState::Stopped);
    assert!(container.is_stop_requested());
    assert_eq!(container.service_state("fast"), Some(ServiceState::Stopped));
    assert_eq!(container.service_state("slow"), Some(ServiceState::InitFailed));
    assert_eq!(fast_counters.runs.load(Ordering::SeqCst), 0);

    let outcome = container
        .wait_all_stopped(Some(Duration::from_secs(1)))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::AllStopped);
    assert!(container.service_errors().is_empty());
    assert!(matches!(
        container.start_all(&CancellationToken::new()).await,
        Err(ContainerError::AlreadyStarted)
    ));
}

#[tokio::test]
async fn maximal_wait_timeout_is_accepted() {
    let cfg = ContainerConfig {
        wait_timeout: Duration::MAX,
        progress_interval: Duration::MAX,
    };
    let container = Container::builder(cfg).build();
    let (svc, _) = Scripted::new("svc");
    register(&container, svc);
    container.start_all(&CancellationToken::new()).await.unwrap();

    container.stop_all().unwrap();
    let outcome = container
        .wait_all_stopped(Some(Duration::MAX))
        .await
        .unwrap();
    assert_eq!(outcome, WaitOutcome::AllStopped);
    assert!(container.stop_and_wait_default().await.unwrap().is_all_stopped());
}

#[tokio::test]
async fn global_container_is_shared() {
    ServiceBuilder::new("global-worker")
        .register_global()
        .unwrap();
    let again = ServiceBuilder::new("global-worker").register_global();

    assert!(matches!(again, Err(ContainerError::DuplicateService { .. })));
    assert!(std::ptr::eq(Container::global(), Container::global()));
    assert!(
        Container::global()
            .registered_names()
            .contains(&"global-worker".to_string())
    );
}
