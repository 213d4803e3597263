//! Service registry for descriptor storage and lookup.
//!
//! The [`ServiceRegistry`] is built once at start-up and then only read.
//! Registration order is preserved; duplicate names are rejected.

use crate::diagnostics;
use crate::error::ConfigError;
use crate::service::{self, ProtocolModule};

use std::collections::BTreeSet;

/// Registry of available services.
#[derive(Default)]
pub struct ServiceRegistry {
    services: Vec<Box<dyn ProtocolModule>>,
}

impl ServiceRegistry {
    /// Creates a registry holding every built-in service, registered one by
    /// one so a name clash in the catalog is caught.
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut registry = Self::default();
        for svc in service::builtin() {
            registry.register(svc)?;
        }
        Ok(registry)
    }

    /// Registers a service.
    ///
    /// Returns [`ConfigError::DuplicateService`] if a service with the same
    /// name is already registered.
    pub fn register(&mut self, svc: Box<dyn ProtocolModule>) -> Result<(), ConfigError> {
        if self.get(svc.name()).is_some() {
            return Err(ConfigError::DuplicateService {
                name: svc.name().to_string(),
            });
        }
        tracing::debug!(service = svc.name(), "registered service");
        self.services.push(svc);
        Ok(())
    }

    /// Looks up a service by name.
    pub fn get(&self, name: &str) -> Option<&dyn ProtocolModule> {
        self.services
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ProtocolModule> {
        self.services.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Resolve a selection of service names into the active set, keeping the
    /// caller's order. Repeated names are enabled once.
    pub fn select<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<&dyn ProtocolModule>, ConfigError> {
        let mut seen = BTreeSet::new();
        let mut active = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            let svc = self.get(name).ok_or_else(|| ConfigError::UnknownService {
                name: name.to_string(),
            })?;
            if !seen.insert(svc.name()) {
                diagnostics::warn(format!("service '{}' selected more than once", name));
                continue;
            }
            active.push(svc);
        }
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{QUAGGA_DAEMON, ServiceDescriptor};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Custom;

    const CUSTOM: ServiceDescriptor = ServiceDescriptor {
        name: "Custom",
        ..QUAGGA_DAEMON
    };

    impl ProtocolModule for Custom {
        fn descriptor(&self) -> &ServiceDescriptor {
            &CUSTOM
        }
    }

    #[fixture]
    fn registry() -> ServiceRegistry {
        ServiceRegistry::builtin().expect("builtin registry")
    }

    fn names(registry: &ServiceRegistry) -> Vec<&'static str> {
        registry.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn default_registry_is_empty() {
        let r = ServiceRegistry::default();
        assert_eq!(r.len(), 0);
        assert!(r.get("zebra").is_none());
    }

    #[rstest]
    fn builtin_names_are_unique(registry: ServiceRegistry) {
        let names = names(&registry);
        let unique: BTreeSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.first(), Some(&"zebra"));
        assert_eq!(names.last(), Some(&"vtysh"));
        assert_eq!(registry.len(), service::builtin().len());
    }

    #[rstest]
    fn register_and_get(mut registry: ServiceRegistry) {
        let before = registry.len();
        registry.register(Box::new(Custom)).expect("register");
        assert_eq!(registry.len(), before + 1);
        assert_eq!(registry.get("Custom").expect("get").name(), "Custom");
        assert_eq!(names(&registry).last(), Some(&"Custom"));
    }

    #[rstest]
    fn register_rejects_duplicate(mut registry: ServiceRegistry) {
        registry.register(Box::new(Custom)).expect("first register");
        let err = registry
            .register(Box::new(Custom))
            .expect_err("duplicate should fail");
        assert!(matches!(err, ConfigError::DuplicateService { .. }));
        assert!(err.to_string().contains("already registered"));
    }

    #[rstest]
    fn select_keeps_caller_order(registry: ServiceRegistry) {
        let active = registry
            .select(&["vtysh", "OSPFv3", "zebra", "RIP"])
            .expect("select");
        let names: Vec<&str> = active.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["vtysh", "OSPFv3", "zebra", "RIP"]);
    }

    #[rstest]
    fn select_enables_repeated_names_once(registry: ServiceRegistry) {
        let active = registry.select(&["zebra", "RIP", "RIP"]).expect("select");
        assert_eq!(active.len(), 2);
    }

    #[rstest]
    fn select_rejects_unknown_service(registry: ServiceRegistry) {
        let err = registry
            .select(&["zebra", "EIGRP"])
            .err()
            .expect("unknown service should fail");
        assert!(matches!(err, ConfigError::UnknownService { ref name } if name == "EIGRP"));
    }
}
