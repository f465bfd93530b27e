//! # Service registry - ordered, name-unique, append-only until start.
//!
//! ## Rules
//! - Insertion order is the init order and the run-launch order
//! - Names are unique; a duplicate insert leaves the registry unchanged
//! - [`Registry::seal`] closes the registry; later inserts fail with `AlreadyStarted`

use crate::error::ContainerError;
use crate::services::ServiceSpec;

/// Ordered list of service specs.
#[derive(Default)]
pub(crate) struct Registry {
    specs: Vec<ServiceSpec>,
    sealed: bool,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `spec`; returns its 1-based position.
    pub(crate) fn insert(&mut self, spec: ServiceSpec) -> Result<usize, ContainerError> {
        if self.sealed {
            return Err(ContainerError::AlreadyStarted);
        }
        if self.contains(spec.name()) {
            return Err(ContainerError::DuplicateService {
                name: spec.name().to_string(),
            });
        }
        self.specs.push(spec);
        Ok(self.specs.len())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.specs.iter().any(|s| s.name() == name)
    }

    /// Names in registration order.
    pub(crate) fn names(&self) -> Vec<String> {
        self.specs.iter().map(|s| s.name().to_string()).collect()
    }

    /// Closes the registry and returns its specs in registration order.
    pub(crate) fn seal(&mut self) -> Vec<ServiceSpec> {
        self.sealed = true;
        self.specs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &'static str) -> ServiceSpec {
        ServiceSpec::builder(name).build()
    }

    #[test]
    fn duplicate_name_is_rejected_and_registry_unchanged() {
        let mut reg = Registry::new();
        assert_eq!(reg.insert(spec("A")).unwrap(), 1);

        let err = reg.insert(spec("A")).unwrap_err();
        assert!(matches!(err, ContainerError::DuplicateService { ref name } if name == "A"));
        assert_eq!(reg.names().len(), 1);
        assert_eq!(reg.names(), vec!["A".to_string()]);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut reg = Registry::new();
        for name in ["s3", "s1", "s2"] {
            reg.insert(spec(name)).unwrap();
        }
        assert_eq!(reg.names(), vec!["s3", "s1", "s2"]);
    }

    #[test]
    fn sealed_registry_rejects_inserts() {
        let mut reg = Registry::new();
        reg.insert(spec("a")).unwrap();
        let specs = reg.seal();
        assert_eq!(specs.len(), 1);

        let err = reg.insert(spec("b")).unwrap_err();
        assert!(matches!(err, ContainerError::AlreadyStarted));
        assert!(!reg.contains("b"));
    }
}
