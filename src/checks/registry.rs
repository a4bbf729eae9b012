// src/checks/registry.rs
use super::{Check, HttpCheck};
use std::collections::HashMap;
use tracing::debug;

/// Builds a fresh, uninitialized check instance.
pub type CheckFactory = fn() -> Box<dyn Check>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown check type: {0}")]
    UnknownCheckType(String),

    #[error("check type already registered: {0}")]
    DuplicateCheckType(String),
}

/// Collects check factories during startup.
#[derive(Default)]
pub struct CheckRegistryBuilder {
    factories: HashMap<String, CheckFactory>,
}

impl CheckRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_type(
        &mut self,
        name: &str,
        factory: CheckFactory,
    ) -> Result<&mut Self, RegistryError> {
        if self.factories.contains_key(name) {
            return Err(RegistryError::DuplicateCheckType(name.to_string()));
        }

        debug!("Registered check type {}", name);
        self.factories.insert(name.to_string(), factory);
        Ok(self)
    }

    /// Register every check type shipped with this crate.
    pub fn with_builtin_checks(mut self) -> Result<Self, RegistryError> {
        HttpCheck::register(&mut self)?;
        Ok(self)
    }

    /// Freeze the registry. No types can be added afterwards.
    pub fn build(self) -> CheckRegistry {
        CheckRegistry {
            factories: self.factories,
        }
    }
}

/// Read-only mapping from check type name to factory.
pub struct CheckRegistry {
    factories: HashMap<String, CheckFactory>,
}

impl CheckRegistry {
    pub fn builder() -> CheckRegistryBuilder {
        CheckRegistryBuilder::new()
    }

    pub fn with_builtin_checks() -> Result<Self, RegistryError> {
        Ok(Self::builder().with_builtin_checks()?.build())
    }

    /// Create a new instance of the check registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Check>, RegistryError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| RegistryError::UnknownCheckType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
