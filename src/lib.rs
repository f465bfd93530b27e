//! # servisor
//!
//! **Servisor** coordinates the lifecycle of a fixed set of background services
//! inside one process.
//!
//! Each service is registered once, optionally initialized (strictly one at a
//! time, in registration order), then run concurrently on its own tokio task.
//! Any failure cascades into a best-effort shutdown of the whole set; callers
//! wait for termination with an optional deadline and inspect which services failed.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ ServiceSpec  │   │ ServiceSpec  │   │ ServiceSpec  │
//!     │ (init?, run) │   │ (init?, run) │   │ (init?, run) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Container (lifecycle controller)                                 │
//! │  - Registry (ordered, unique names, closed at start)              │
//! │  - CancellationToken (child of the caller's token)                │
//! │  - RunRecords (name → state, terminal error, completion latch)    │
//! │  - SubscriberSet (lifecycle events, no-op when empty)             │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        │ init, in order   │                  │
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  run unit    │   │  run unit    │   │  run unit    │
//!     │ tokio::spawn │   │ tokio::spawn │   │ tokio::spawn │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            └───── Err ────────┴──► token.cancel() ──► every run unit
//! ```
//!
//! ### Lifecycle
//! ```text
//! Container:  Unstarted ──start_all──► Starting ──► Running ──► Stopped
//! Service:    Registered ─► Initializing ─► Initialized ─► Running ─► Stopped | Failed
//!                                └─► InitFailed
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                         |
//! |-------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Services**      | Define services as types or closures.                          | [`Service`], [`Init`], [`ServiceFn`], [`ServiceBuilder`] |
//! | **Lifecycle**     | Sequential init, concurrent run, cascading stop, bounded wait. | [`Container`], [`WaitOutcome`]             |
//! | **Subscriber API**| Observe lifecycle events (logging, metrics, custom).           | [`Subscribe`], [`LogWriter`]               |
//! | **Errors**        | Typed errors for the container and for services.               | [`ContainerError`], [`ServiceError`]       |
//! | **Configuration** | Default wait deadline and progress reporting.                  | [`ContainerConfig`]                        |
//! | **Signals**       | Turn SIGINT/SIGTERM into a cancelled parent token.             | [`shutdown`]                               |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use servisor::{Container, ContainerConfig, LogWriter, ServiceBuilder, ServiceError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let container = Container::builder(ContainerConfig::default())
//!         .with_subscriber(Arc::new(LogWriter::new()))
//!         .build();
//!
//!     ServiceBuilder::new("worker")
//!         .init(|_ctx: CancellationToken| async { Ok::<(), ServiceError>(()) })
//!         .run(|ctx: CancellationToken| async move {
//!             ctx.cancelled().await;
//!             Ok::<(), ServiceError>(())
//!         })
//!         .register(&container)?;
//!
//!     container.start_all(&CancellationToken::new()).await?;
//!     let outcome = container.stop_and_wait(Some(Duration::from_secs(5))).await?;
//!     assert!(outcome.is_all_stopped());
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod services;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::shutdown;
pub use crate::core::{
    Container, ContainerBuilder, ContainerConfig, ContainerState, ServiceState, WaitOutcome,
};
pub use error::{ContainerError, ServiceError};
pub use events::{Event, EventKind};
pub use services::{Init, InitFn, InitRef, Service, ServiceBuilder, ServiceFn, ServiceRef, ServiceSpec};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
