//! Identifier -> constructor table, built once at startup.

use std::collections::HashMap;

use adminrun_db::Connector;

use crate::error::{RegistryError, RunError};
use crate::script::ScriptFactory;

/// Read-only mapping from script identifier to constructor.
///
/// Lookup is an exact, case-sensitive match; there is no prefix or fuzzy
/// matching.
#[derive(Debug)]
pub struct ScriptRegistry<K: Connector> {
    factories: HashMap<&'static str, ScriptFactory<K>>,
}

impl<K: Connector> ScriptRegistry<K> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Build a registry from `(identifier, constructor)` pairs.
    pub fn from_entries<I>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (&'static str, ScriptFactory<K>)>,
    {
        let mut registry = Self::new();
        for (identifier, factory) in entries {
            registry.register(identifier, factory)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, identifier: &'static str, factory: ScriptFactory<K>) -> Result<(), RegistryError> {
        if self.factories.insert(identifier, factory).is_some() {
            return Err(RegistryError(identifier.to_string()));
        }
        Ok(())
    }

    pub fn resolve(&self, identifier: &str) -> Result<ScriptFactory<K>, RunError> {
        self.factories
            .get(identifier)
            .copied()
            .ok_or_else(|| RunError::ScriptNotFound {
                identifier: identifier.to_string(),
            })
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// All registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.factories.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<K: Connector> Default for ScriptRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use adminrun_db::memory::MemoryConnector;
    use adminrun_db::ConnectionManager;
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::script::Script;

    struct Noop;

    #[async_trait]
    impl Script<MemoryConnector> for Noop {
        async fn execute(&mut self, _db: &ConnectionManager<MemoryConnector>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn noop() -> Box<dyn Script<MemoryConnector>> {
        Box::new(Noop)
    }

    fn registry() -> ScriptRegistry<MemoryConnector> {
        ScriptRegistry::from_entries([
            ("noop", noop as ScriptFactory<MemoryConnector>),
            ("cleanup-sessions", noop as ScriptFactory<MemoryConnector>),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_registered_identifiers() {
        let registry = registry();
        for id in registry.identifiers() {
            let factory = registry.resolve(id).unwrap();
            let script = factory();
            assert!(script.input_schema().is_none());
        }
    }

    #[test]
    fn unknown_identifier_is_script_not_found() {
        assert_matches!(
            registry().resolve("nope"),
            Err(RunError::ScriptNotFound { identifier }) if identifier == "nope"
        );
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let registry = registry();
        assert!(registry.resolve("NOOP").is_err());
        assert!(registry.resolve("noo").is_err());
        assert!(registry.resolve("noop ").is_err());
    }

    #[test]
    fn identifiers_are_sorted() {
        assert_eq!(registry().identifiers(), vec!["cleanup-sessions", "noop"]);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let result = ScriptRegistry::from_entries([
            ("noop", noop as ScriptFactory<MemoryConnector>),
            ("noop", noop as ScriptFactory<MemoryConnector>),
        ]);
        assert_matches!(result, Err(RegistryError(id)) if id == "noop");
    }
}
