//! Error types used by the servisor container and services.
//!
//! This module defines two main error enums:
//!
//! - [`ContainerError`] — errors raised by the lifecycle container itself
//!   (misuse of the API and init-phase failures).
//! - [`ServiceError`] — errors returned by individual `Init`/`Run` executions.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::fmt::Display;
use thiserror::Error;

/// # Errors produced by the container.
///
/// Two categories live here:
/// - **configuration faults** (`DuplicateService`, `AlreadyStarted`, `NotStarted`,
///   `DuplicateRecord`): the caller used the API in the wrong order;
/// - **init failure** (`InitFailed`): a service's `Init` failed and startup was aborted.
///
/// Run-phase failures never show up here; they are read through
/// [`Container::service_errors`](crate::Container::service_errors).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ContainerError {
    /// A service with this name is already registered.
    #[error("service '{name}' already registered")]
    DuplicateService {
        /// The conflicting name.
        name: String,
    },

    /// `start_all` was already called on this container (or `register` came too late).
    #[error("container already started; start_all can only be called once")]
    AlreadyStarted,

    /// `stop_all`/`wait_all_stopped` called before `start_all`.
    #[error("container not started; call start_all first")]
    NotStarted,

    /// A run record already exists under this name.
    #[error("service '{name}' already started")]
    DuplicateRecord {
        /// The conflicting name.
        name: String,
    },

    /// A service's `Init` failed; no service was run.
    #[error("failed to init service {service}: {source}")]
    InitFailed {
        /// Name of the failing service.
        service: String,
        /// The underlying init error.
        #[source]
        source: ServiceError,
    },
}

impl ContainerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use servisor::ContainerError;
    ///
    /// let err = ContainerError::NotStarted;
    /// assert_eq!(err.as_label(), "container_not_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ContainerError::DuplicateService { .. } => "container_duplicate_service",
            ContainerError::AlreadyStarted => "container_already_started",
            ContainerError::NotStarted => "container_not_started",
            ContainerError::DuplicateRecord { .. } => "container_duplicate_record",
            ContainerError::InitFailed { .. } => "container_init_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ContainerError::DuplicateService { name } => format!("duplicate service: {name}"),
            ContainerError::AlreadyStarted => "already started".to_string(),
            ContainerError::NotStarted => "not started".to_string(),
            ContainerError::DuplicateRecord { name } => format!("duplicate run record: {name}"),
            ContainerError::InitFailed { service, source } => {
                format!("init failed: service={service} cause={}", source.as_message())
            }
        }
    }

    /// Indicates a programmer-misuse condition rather than a runtime outcome.
    ///
    /// Returns `true` for every variant except [`ContainerError::InitFailed`].
    pub fn is_misuse(&self) -> bool {
        !matches!(self, ContainerError::InitFailed { .. })
    }

    /// Name of the service involved, if any.
    pub fn service(&self) -> Option<&str> {
        match self {
            ContainerError::DuplicateService { name } | ContainerError::DuplicateRecord { name } => {
                Some(name)
            }
            ContainerError::InitFailed { service, .. } => Some(service),
            ContainerError::AlreadyStarted | ContainerError::NotStarted => None,
        }
    }
}

/// # Errors produced by service execution.
///
/// Returned from [`Service::run`](crate::Service::run) and
/// [`Init::init`](crate::Init::init). Every error counts as a failure and cascades
/// a stop to every other service, except [`ServiceError::Canceled`] returned
/// after the shared token was cancelled.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Execution failed.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The service panicked; the panic was caught by the container.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload, when it was a string.
        info: String,
    },

    /// Service observed cancellation and returned early.
    ///
    /// Graceful only once a stop was requested; otherwise recorded as a failure.
    #[error("context cancelled")]
    Canceled,
}

impl ServiceError {
    /// Builds a [`ServiceError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use servisor::ServiceError;
    ///
    /// let err = ServiceError::fail("boom");
    /// assert_eq!(err.to_string(), "boom");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        ServiceError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::Fail { .. } => "service_failed",
            ServiceError::Panicked { .. } => "service_panicked",
            ServiceError::Canceled => "service_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ServiceError::Fail { error } => format!("error: {error}"),
            ServiceError::Panicked { info } => format!("panic: {info}"),
            ServiceError::Canceled => "context cancelled".to_string(),
        }
    }

    /// True for [`ServiceError::Canceled`].
    pub fn is_canceled(&self) -> bool {
        matches!(self, ServiceError::Canceled)
    }
}
