//! Capability registry: identifier-keyed service discovery.
//!
//! Hosts and handler contexts expose services by well-known identifier.
//! Lookups return an optional typed handle: the handle enum replaces
//! runtime type interrogation, and optional capabilities are an explicit
//! `Option`, not a conditional downcast.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::association::AssociationStore;
use crate::mediator::ActivationMediator;

/// Identifier of the activation trust mediator exposed by a host.
pub const ACTIVATION_TRUST_MEDIATOR_ID: &str = "launchguard.activation-trust-mediator";
/// Identifier of the association-query capability a handler context may
/// expose.
pub const ASSOCIATION_QUERY_ID: &str = "launchguard.association-query";

/// Well-known capability identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CapabilityId(String);

impl CapabilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn activation_trust_mediator() -> Self {
        Self::new(ACTIVATION_TRUST_MEDIATOR_ID)
    }

    pub fn association_query() -> Self {
        Self::new(ASSOCIATION_QUERY_ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed capability provider handle.
#[derive(Clone)]
pub enum CapabilityHandle {
    /// The host's activation trust mediator service.
    ActivationHost(Arc<ActivationMediator>),
    /// An association-query surface tied to a handler's own context.
    AssociationQuery(Arc<dyn AssociationStore>),
}

impl CapabilityHandle {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ActivationHost(_) => "activation_host",
            Self::AssociationQuery(_) => "association_query",
        }
    }

    pub fn as_activation_host(&self) -> Option<&Arc<ActivationMediator>> {
        match self {
            Self::ActivationHost(mediator) => Some(mediator),
            _ => None,
        }
    }

    pub fn as_association_query(&self) -> Option<&Arc<dyn AssociationStore>> {
        match self {
            Self::AssociationQuery(store) => Some(store),
            _ => None,
        }
    }
}

impl fmt::Debug for CapabilityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityHandle::{}", self.kind())
    }
}

/// Identifier → provider registry.
///
/// Registering a second provider under an identifier replaces the first;
/// the replaced handle is returned so the caller can observe the
/// displacement.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    providers: BTreeMap<CapabilityId, CapabilityHandle>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: CapabilityId,
        handle: CapabilityHandle,
    ) -> Option<CapabilityHandle> {
        self.providers.insert(id, handle)
    }

    pub fn get(&self, id: &CapabilityId) -> Option<&CapabilityHandle> {
        self.providers.get(id)
    }

    /// Typed lookup of the host's mediator service.
    pub fn activation_host(&self) -> Option<Arc<ActivationMediator>> {
        self.get(&CapabilityId::activation_trust_mediator())?
            .as_activation_host()
            .cloned()
    }

    /// Typed lookup of a context's association-query capability.
    pub fn association_query(&self) -> Option<Arc<dyn AssociationStore>> {
        self.get(&CapabilityId::association_query())?
            .as_association_query()
            .cloned()
    }

    pub fn contains(&self, id: &CapabilityId) -> bool {
        self.providers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered identifiers, in deterministic order.
    pub fn ids(&self) -> impl Iterator<Item = &CapabilityId> {
        self.providers.keys()
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (id, handle) in &self.providers {
            map.entry(&id.as_str(), &handle.kind());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::association::MemoryAssociationStore;

    #[test]
    fn empty_registry_answers_none() {
        let registry = CapabilityRegistry::new();
        assert!(registry.association_query().is_none());
        assert!(registry.activation_host().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn typed_lookup_returns_registered_store() {
        let mut registry = CapabilityRegistry::new();
        let store: Arc<dyn AssociationStore> = Arc::new(MemoryAssociationStore::new());
        let replaced = registry.register(
            CapabilityId::association_query(),
            CapabilityHandle::AssociationQuery(store),
        );
        assert!(replaced.is_none());
        assert!(registry.association_query().is_some());
        assert!(registry.contains(&CapabilityId::association_query()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reregistration_replaces_and_reports() {
        let mut registry = CapabilityRegistry::new();
        let first: Arc<dyn AssociationStore> = Arc::new(MemoryAssociationStore::new());
        let second: Arc<dyn AssociationStore> = Arc::new(MemoryAssociationStore::new());
        registry.register(
            CapabilityId::association_query(),
            CapabilityHandle::AssociationQuery(first),
        );
        let replaced = registry.register(
            CapabilityId::association_query(),
            CapabilityHandle::AssociationQuery(second),
        );
        assert!(matches!(
            replaced,
            Some(CapabilityHandle::AssociationQuery(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn mismatched_handle_kind_yields_none_not_a_cast() {
        let mut registry = CapabilityRegistry::new();
        let store: Arc<dyn AssociationStore> = Arc::new(MemoryAssociationStore::new());
        // Registered under the mediator id, but it is a store handle.
        registry.register(
            CapabilityId::activation_trust_mediator(),
            CapabilityHandle::AssociationQuery(store),
        );
        assert!(registry.activation_host().is_none());
    }

    #[test]
    fn ids_iterate_deterministically() {
        let mut registry = CapabilityRegistry::new();
        let store: Arc<dyn AssociationStore> = Arc::new(MemoryAssociationStore::new());
        registry.register(
            CapabilityId::new("zeta.capability"),
            CapabilityHandle::AssociationQuery(store.clone()),
        );
        registry.register(
            CapabilityId::new("alpha.capability"),
            CapabilityHandle::AssociationQuery(store),
        );
        let ids: Vec<&str> = registry.ids().map(CapabilityId::as_str).collect();
        assert_eq!(ids, vec!["alpha.capability", "zeta.capability"]);
    }
}
