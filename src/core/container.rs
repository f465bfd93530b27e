//! # Container: registers services, drives startup, cascades shutdown.
//!
//! The [`Container`] owns the service registry, the shared cancellation token
//! and one run record per service. It initializes services one by one, launches
//! them concurrently, and lets callers stop, wait, and inspect failures.
//!
//! ## Key responsibilities
//! - keep registered services unique by name, in registration order
//! - run every init hook **sequentially**, then launch every run unit
//! - turn any failure (init or run) into a stop of the whole set
//! - bound the caller's wait with an optional deadline
//! - report which services failed
//!
//! ## High-level architecture
//! ```text
//! register(spec) ×N  ──►  Registry (append-only until start)
//!
//! start_all(parent):
//!   token = parent.child_token()
//!   Registry.seal() ─► for spec in order:
//!                        ├─ RunRecord::new(name)
//!                        ├─ init(token)  ── Err ─► abort: records complete,
//!                        │                          token.cancel(), Err(InitFailed)
//!                        └─ record Initialized
//!   for initialized spec: runner::launch() ─► tokio::spawn(run(token))
//!                                                 ├─ Ok, Canceled after stop ─► ServiceStopped
//!                                                 └─ other Err/panic          ─► ServiceFailed
//!                                                                  token.cancel()
//!
//! stop_all()            ─► token.cancel()                 (idempotent, non-blocking)
//! wait_all_stopped(d)   ─► join_all(record.stopped()) vs sleep(d)
//!                              ├─ all done  ─► AllStopped
//!                              └─ deadline  ─► TimedOut { stuck }
//! service_errors()      ─► { name → error } for records with a run failure
//! ```
//!
//! - Init failures are returned by `start_all` and never appear in `service_errors`.
//! - Run failures are never returned by `start_all`.
//! - Cancellation is advisory: a service that ignores the token keeps running.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use servisor::{Container, ServiceBuilder, ServiceError, WaitOutcome};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = Container::new();
//!
//!     ServiceBuilder::new("ticker")
//!         .run(|ctx: CancellationToken| async move {
//!             while !ctx.is_cancelled() {
//!                 tokio::time::sleep(Duration::from_millis(10)).await;
//!             }
//!             Ok::<(), ServiceError>(())
//!         })
//!         .register(&container)?;
//!
//!     container.start_all(&CancellationToken::new()).await?;
//!     container.stop_all()?;
//!     let outcome = container.wait_all_stopped(Some(Duration::from_secs(1))).await?;
//!
//!     assert_eq!(outcome, WaitOutcome::AllStopped);
//!     assert!(container.service_errors().is_empty());
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::future;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use futures::future::join_all;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::core::builder::ContainerBuilder;
use crate::core::config::{ContainerConfig, non_zero};
use crate::core::record::{RunRecord, ServiceState};
use crate::core::registry::Registry;
use crate::core::runner;
use crate::error::{ContainerError, ServiceError};
use crate::events::{Event, EventKind};
use crate::services::ServiceSpec;
use crate::subscribers::SubscriberSet;

const UNSTARTED: u8 = 0;
const STARTING: u8 = 1;
const STARTED: u8 = 2;

static GLOBAL: OnceLock<Container> = OnceLock::new();

/// Lifecycle state of a [`Container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerState {
    /// `start_all` not called yet; services may still be registered.
    Unstarted,
    /// `start_all` is running init hooks.
    Starting,
    /// At least one service is running.
    Running,
    /// Startup finished (or was aborted) and no service is running.
    Stopped,
}

/// Result of waiting for services to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Every launched service reached a terminal state.
    AllStopped,
    /// The deadline expired first; these services were still running.
    TimedOut {
        /// Names of the services still running (sorted).
        stuck: Vec<String>,
    },
}

impl WaitOutcome {
    /// True if every service stopped before the deadline.
    pub fn is_all_stopped(&self) -> bool {
        matches!(self, WaitOutcome::AllStopped)
    }
}

/// Lifecycle controller for a fixed set of background services.
pub struct Container {
    cfg: ContainerConfig,
    subs: Arc<SubscriberSet>,
    registry: RwLock<Registry>,
    phase: AtomicU8,
    token: OnceLock<CancellationToken>,
    stop_requested: AtomicBool,
    records: RwLock<HashMap<Arc<str>, Arc<RunRecord>>>,
}

impl Container {
    /// Creates a container with default config and no subscribers.
    pub fn new() -> Self {
        Self::with_parts(ContainerConfig::default(), SubscriberSet::empty())
    }

    /// Returns a builder for a container with custom config and subscribers.
    pub fn builder(cfg: ContainerConfig) -> ContainerBuilder {
        ContainerBuilder::new(cfg)
    }

    /// Process-wide container, created on first use.
    ///
    /// Prefer passing an explicit container around; this exists for
    /// applications that register services from scattered init code.
    pub fn global() -> &'static Container {
        GLOBAL.get_or_init(Container::new)
    }

    pub(crate) fn with_parts(cfg: ContainerConfig, subs: SubscriberSet) -> Self {
        Self {
            cfg,
            subs: Arc::new(subs),
            registry: RwLock::new(Registry::new()),
            phase: AtomicU8::new(UNSTARTED),
            token: OnceLock::new(),
            stop_requested: AtomicBool::new(false),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the container's configuration.
    pub fn config(&self) -> &ContainerConfig {
        &self.cfg
    }

    /// Adds a service to the set started by [`start_all`](Self::start_all).
    ///
    /// Fails with `DuplicateService` if the name is taken (the registry is left
    /// unchanged) and with `AlreadyStarted` once `start_all` has begun.
    pub fn register(&self, spec: impl Into<ServiceSpec>) -> Result<(), ContainerError> {
        let spec = spec.into();
        let name = spec.name_arc().clone();
        let index = write(&self.registry).insert(spec)?;
        self.subs.emit(
            &Event::new(EventKind::ServiceRegistered)
                .with_service(name)
                .with_progress(index, index),
        );
        Ok(())
    }

    /// Initializes every service in registration order, then launches all of them.
    ///
    /// The shared token is a child of `parent`: cancelling `parent` stops every service.
    ///
    /// Returns once every run unit is launched. If an init hook fails, no service
    /// is launched, the token is cancelled, and `InitFailed` names the service.
    /// Run failures are never returned here; see [`service_errors`](Self::service_errors).
    ///
    /// Can only be called once; a second call fails with `AlreadyStarted` and
    /// leaves running services alone.
    ///
    /// Dropping the returned future before it completes aborts startup like an
    /// init failure: no service is launched and the token is cancelled.
    pub async fn start_all(&self, parent: &CancellationToken) -> Result<(), ContainerError> {
        if self
            .phase
            .compare_exchange(UNSTARTED, STARTING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ContainerError::AlreadyStarted);
        }

        let token = self.token.get_or_init(|| parent.child_token()).clone();
        let specs = write(&self.registry).seal();
        let total = specs.len();

        let guard = StartGuard {
            container: self,
            token: token.clone(),
            armed: true,
        };
        let mut initialized: Vec<(ServiceSpec, Arc<RunRecord>)> = Vec::with_capacity(total);
        for (i, spec) in specs.into_iter().enumerate() {
            let record = self.insert_record(&spec)?;

            if let Some(init) = spec.init() {
                self.subs.emit(
                    &Event::new(EventKind::ServiceInitializing)
                        .with_service(spec.name())
                        .with_progress(i + 1, total),
                );
                if let Err(source) = runner::run_init(init.as_ref(), &token).await {
                    record.fail_init();
                    self.subs.emit(
                        &Event::new(EventKind::ServiceInitFailed)
                            .with_service(spec.name())
                            .with_reason(source.to_string())
                            .with_progress(i + 1, total),
                    );
                    return Err(ContainerError::InitFailed {
                        service: spec.name().to_string(),
                        source,
                    });
                }
            }

            record.mark_initialized();
            self.subs.emit(
                &Event::new(EventKind::ServiceInitialized)
                    .with_service(spec.name())
                    .with_progress(i + 1, total),
            );
            initialized.push((spec, record));
        }
        guard.disarm();

        let launched = initialized.len();
        for (spec, record) in initialized {
            record.mark_running();
            self.subs
                .emit(&Event::new(EventKind::ServiceStarting).with_service(spec.name()));
            runner::launch(spec, record, token.clone(), Arc::clone(&self.subs));
        }

        self.phase.store(STARTED, Ordering::Release);
        self.subs
            .emit(&Event::new(EventKind::AllStarted).with_count(launched));
        Ok(())
    }

    /// Requests every service to stop by cancelling the shared token.
    ///
    /// Idempotent and non-blocking; pair it with [`wait_all_stopped`](Self::wait_all_stopped).
    pub fn stop_all(&self) -> Result<(), ContainerError> {
        let token = self.token.get().ok_or(ContainerError::NotStarted)?;
        if !self.stop_requested.swap(true, Ordering::AcqRel) && !token.is_cancelled() {
            self.subs
                .emit(&Event::new(EventKind::StopRequested).with_count(self.running_count()));
        }
        token.cancel();
        Ok(())
    }

    /// Waits until every service has stopped, or until `timeout` elapses.
    ///
    /// `None`, a zero duration, or one too large to represent waits without
    /// deadline. On timeout the remaining services keep running: waiting never
    /// requests a stop.
    pub async fn wait_all_stopped(
        &self,
        timeout: Option<Duration>,
    ) -> Result<WaitOutcome, ContainerError> {
        if self.token.get().is_none() {
            return Err(ContainerError::NotStarted);
        }

        let records: Vec<Arc<RunRecord>> = read(&self.records).values().cloned().collect();
        let all_stopped = join_all(records.iter().map(|r| r.stopped()));
        tokio::pin!(all_stopped);

        let deadline = timeout.and_then(non_zero).and_then(after);
        let expired = async move {
            match deadline {
                Some(at) => time::sleep_until(at).await,
                None => future::pending::<()>().await,
            }
        };
        tokio::pin!(expired);

        let mut progress = self.cfg.progress_interval().and_then(|period| {
            let mut ticker = time::interval_at(after(period)?, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(ticker)
        });

        loop {
            tokio::select! {
                biased;
                _ = &mut all_stopped => {
                    self.subs.emit(&Event::new(EventKind::AllStopped));
                    return Ok(WaitOutcome::AllStopped);
                }
                _ = &mut expired => {
                    let stuck = self.running_names();
                    self.subs
                        .emit(&Event::new(EventKind::WaitTimedOut).with_services(stuck.clone()));
                    return Ok(WaitOutcome::TimedOut { stuck });
                }
                _ = next_tick(&mut progress) => {
                    self.subs.emit(
                        &Event::new(EventKind::WaitingForServices)
                            .with_services(self.running_names()),
                    );
                }
            }
        }
    }

    /// [`wait_all_stopped`](Self::wait_all_stopped) with the configured `wait_timeout`.
    pub async fn wait_all_stopped_default(&self) -> Result<WaitOutcome, ContainerError> {
        self.wait_all_stopped(self.cfg.default_wait_timeout()).await
    }

    /// [`stop_all`](Self::stop_all) followed by [`wait_all_stopped`](Self::wait_all_stopped).
    pub async fn stop_and_wait(
        &self,
        timeout: Option<Duration>,
    ) -> Result<WaitOutcome, ContainerError> {
        self.stop_all()?;
        self.wait_all_stopped(timeout).await
    }

    /// [`stop_and_wait`](Self::stop_and_wait) with the configured `wait_timeout`.
    pub async fn stop_and_wait_default(&self) -> Result<WaitOutcome, ContainerError> {
        self.stop_and_wait(self.cfg.default_wait_timeout()).await
    }

    /// Snapshot of services whose run terminated with a failure.
    ///
    /// Init failures never appear here; they are returned by `start_all`.
    pub fn service_errors(&self) -> HashMap<String, ServiceError> {
        read(&self.records)
            .values()
            .filter_map(|r| r.error().map(|e| (r.name().to_string(), e.clone())))
            .collect()
    }

    /// Number of services currently running.
    pub fn running_count(&self) -> usize {
        read(&self.records).values().filter(|r| r.is_running()).count()
    }

    /// Sorted names of services that have a run record (i.e. `start_all` reached them).
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.records)
            .keys()
            .map(|k| k.to_string())
            .collect();
        names.sort_unstable();
        names
    }

    /// Names of registered services, in registration order.
    pub fn registered_names(&self) -> Vec<String> {
        read(&self.registry).names()
    }

    /// State of one service, or `None` if no service has this name.
    pub fn service_state(&self, name: &str) -> Option<ServiceState> {
        if let Some(record) = read(&self.records).get(name) {
            return Some(record.state());
        }
        read(&self.registry)
            .contains(name)
            .then_some(ServiceState::Registered)
    }

    /// Current lifecycle state of the container.
    pub fn state(&self) -> ContainerState {
        match self.phase.load(Ordering::Acquire) {
            UNSTARTED => ContainerState::Unstarted,
            STARTING => ContainerState::Starting,
            _ if self.running_count() > 0 => ContainerState::Running,
            _ => ContainerState::Stopped,
        }
    }

    /// True once the shared token was cancelled (explicitly or by a failure).
    pub fn is_stop_requested(&self) -> bool {
        self.token.get().is_some_and(CancellationToken::is_cancelled)
    }

    fn insert_record(&self, spec: &ServiceSpec) -> Result<Arc<RunRecord>, ContainerError> {
        let mut records = write(&self.records);
        if records.contains_key(spec.name()) {
            return Err(ContainerError::DuplicateRecord {
                name: spec.name().to_string(),
            });
        }
        let record = RunRecord::new(spec.name_arc().clone());
        records.insert(spec.name_arc().clone(), Arc::clone(&record));
        Ok(record)
    }

    fn running_names(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.records)
            .values()
            .filter(|r| !r.is_done())
            .map(|r| r.name().to_string())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Aborts startup unless disarmed: completes every pending record without a
/// run, cancels the token and leaves the container started.
///
/// Covers init failure, duplicate records and a dropped `start_all` future.
struct StartGuard<'a> {
    container: &'a Container,
    token: CancellationToken,
    armed: bool,
}

impl StartGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for StartGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        for record in read(&self.container.records).values() {
            if record.state() == ServiceState::Initializing {
                record.fail_init();
            } else {
                record.abandon();
            }
        }
        self.token.cancel();
        self.container.phase.store(STARTED, Ordering::Release);
    }
}

/// `now + d`, or `None` when the instant is not representable.
fn after(d: Duration) -> Option<Instant> {
    Instant::now().checked_add(d)
}

async fn next_tick(progress: &mut Option<Interval>) {
    match progress {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending::<()>().await,
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
