//! Manager registry: name to runtime.
//!
//! Built-in descriptors are merged with user definitions field by field, then
//! validated once. Resolution is by exact name only.

mod builtin;

use crate::backends::descriptor::{DescriptorSpec, ManagerDescriptor};
use crate::backends::executor::CommandExecutor;
use crate::backends::generic::{GenericManager, Timeouts};
use crate::backends::user_parser;
use crate::error::{HomedeclError, Result};
use crate::packages::traits::PackageManager;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Parse the built-in definitions.
pub fn builtin_specs() -> Result<Vec<DescriptorSpec>> {
    user_parser::parse_managers(builtin::BUILTIN_MANAGERS, "<builtin managers>")
}

pub struct ManagerRegistry {
    descriptors: BTreeMap<String, Arc<ManagerDescriptor>>,
    executor: Arc<dyn CommandExecutor>,
    timeouts: Timeouts,
}

impl ManagerRegistry {
    /// Built-ins overlaid with `user_specs`, applied in order.
    ///
    /// A user spec for an unknown name defines a new manager and must be
    /// complete on its own.
    pub fn new(
        user_specs: Vec<DescriptorSpec>,
        executor: Arc<dyn CommandExecutor>,
        timeouts: Timeouts,
    ) -> Result<Self> {
        let mut specs: BTreeMap<String, DescriptorSpec> = BTreeMap::new();
        for spec in builtin_specs()?.into_iter().chain(user_specs) {
            match specs.get_mut(&spec.name) {
                Some(existing) => existing.merge(spec),
                None => {
                    specs.insert(spec.name.clone(), spec);
                }
            }
        }

        let mut descriptors = BTreeMap::new();
        for (name, spec) in specs {
            let descriptor = ManagerDescriptor::try_from(spec)?;
            descriptors.insert(name, Arc::new(descriptor));
        }

        Ok(Self {
            descriptors,
            executor,
            timeouts,
        })
    }

    pub fn builtin(executor: Arc<dyn CommandExecutor>, timeouts: Timeouts) -> Result<Self> {
        Self::new(Vec::new(), executor, timeouts)
    }

    /// Runtime for `name`, or `UnsupportedManager`.
    pub fn resolve(&self, name: &str) -> Result<Box<dyn PackageManager>> {
        let descriptor = self
            .descriptors
            .get(name)
            .ok_or_else(|| HomedeclError::UnsupportedManager(self.unsupported_message(name)))?;

        Ok(Box::new(GenericManager::new(
            Arc::clone(descriptor),
            Arc::clone(&self.executor),
            self.timeouts,
        )))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Registered manager names, sorted.
    pub fn list_managers(&self) -> Vec<&str> {
        self.descriptors.keys().map(String::as_str).collect()
    }

    pub fn supports_search(&self, name: &str) -> bool {
        self.descriptors
            .get(name)
            .is_some_and(|d| d.supports_search())
    }

    pub fn descriptor(&self, name: &str) -> Option<&ManagerDescriptor> {
        self.descriptors.get(name).map(Arc::as_ref)
    }

    fn unsupported_message(&self, name: &str) -> String {
        format!(
            "'{}' (available: {})",
            name,
            self.list_managers().join(", ")
        )
    }
}
