//! Local-only scheme classification.
//!
//! A local-only scheme must never be reachable from a non-local launch
//! context.  Two rules make a scheme local-only: the `local+` name prefix
//! (decided without touching the store, and not overridable by store
//! data) and the presence-only `LocalOnly` marker in the scheme's
//! registration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::association::{AssociationError, AssociationInspector, AssociationStore};

/// Schemes with this prefix are local-only unconditionally.  The match is
/// case-sensitive and byte-exact; a scheme equal to the bare prefix still
/// matches.
pub const LOCAL_ONLY_SCHEME_PREFIX: &str = "local+";

/// Why (or that) a scheme is not restricted to local launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalOnlyClassification {
    /// Matched the `local+` prefix; no store query was made.
    PrefixRule,
    /// The scheme's registration carries the `LocalOnly` marker.
    StoreMarker,
    /// No rule applied (including: no registration at all).
    Unrestricted,
}

impl LocalOnlyClassification {
    pub fn is_local_only(self) -> bool {
        !matches!(self, Self::Unrestricted)
    }
}

impl fmt::Display for LocalOnlyClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PrefixRule => "prefix_rule",
            Self::StoreMarker => "store_marker",
            Self::Unrestricted => "unrestricted",
        };
        f.write_str(name)
    }
}

/// Classifies schemes against the prefix rule and the association store.
///
/// Holds no state of its own; every probe is a live store read.
pub struct SchemeClassifier<'a> {
    store: &'a dyn AssociationStore,
}

impl<'a> SchemeClassifier<'a> {
    pub fn new(store: &'a dyn AssociationStore) -> Self {
        Self { store }
    }

    /// Classify `scheme`, reporting which rule fired.
    ///
    /// Store failures other than `NotFound` propagate: this component
    /// never guesses `Unrestricted` when the store cannot answer.
    pub fn probe(&self, scheme: &str) -> Result<LocalOnlyClassification, AssociationError> {
        if scheme.starts_with(LOCAL_ONLY_SCHEME_PREFIX) {
            return Ok(LocalOnlyClassification::PrefixRule);
        }
        match AssociationInspector::new(self.store).lookup(scheme) {
            Ok(record) if record.local_only => Ok(LocalOnlyClassification::StoreMarker),
            Ok(_) => Ok(LocalOnlyClassification::Unrestricted),
            Err(AssociationError::NotFound { .. }) => Ok(LocalOnlyClassification::Unrestricted),
            Err(err) => Err(err),
        }
    }

    /// `true` when `scheme` must only be launched from a local context.
    pub fn is_local_only(&self, scheme: &str) -> Result<bool, AssociationError> {
        Ok(self.probe(scheme)?.is_local_only())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::association::{AssociationQuery, MemoryAssociationStore};

    /// Delegating store that counts `init_for_scheme` calls.
    struct CountingStore<'a> {
        inner: &'a MemoryAssociationStore,
        calls: Cell<u32>,
    }

    impl<'a> CountingStore<'a> {
        fn new(inner: &'a MemoryAssociationStore) -> Self {
            Self {
                inner,
                calls: Cell::new(0),
            }
        }
    }

    impl AssociationStore for CountingStore<'_> {
        fn init_for_scheme(
            &self,
            scheme: &str,
        ) -> Result<Box<dyn AssociationQuery + '_>, AssociationError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.init_for_scheme(scheme)
        }
    }

    // -- prefix rule --------------------------------------------------------

    #[test]
    fn prefixed_scheme_is_local_only_without_store_access() {
        let inner = MemoryAssociationStore::new();
        let store = CountingStore::new(&inner);
        let classifier = SchemeClassifier::new(&store);

        for scheme in ["local+files", "local+settings", "local+x"] {
            assert_eq!(
                classifier.probe(scheme).unwrap(),
                LocalOnlyClassification::PrefixRule
            );
        }
        assert_eq!(store.calls.get(), 0, "prefix rule must never query the store");
    }

    #[test]
    fn bare_prefix_scheme_matches() {
        let inner = MemoryAssociationStore::new();
        let store = CountingStore::new(&inner);
        let classifier = SchemeClassifier::new(&store);
        assert!(classifier.is_local_only("local+").unwrap());
        assert_eq!(store.calls.get(), 0);
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        let store = MemoryAssociationStore::new();
        let classifier = SchemeClassifier::new(&store);
        assert!(!classifier.is_local_only("Local+files").unwrap());
        assert!(!classifier.is_local_only("LOCAL+files").unwrap());
    }

    #[test]
    fn prefix_rule_wins_even_when_registered() {
        // Store data cannot override the prefix rule, and is not consulted.
        let mut inner = MemoryAssociationStore::new();
        inner.register_scheme("local+uri-scheme");
        inner.mark_local_only("local+uri-scheme");
        let store = CountingStore::new(&inner);
        let classifier = SchemeClassifier::new(&store);

        assert_eq!(
            classifier.probe("local+uri-scheme").unwrap(),
            LocalOnlyClassification::PrefixRule
        );
        assert_eq!(store.calls.get(), 0);
    }

    // -- store marker -------------------------------------------------------

    #[test]
    fn unregistered_schemes_are_unrestricted() {
        let store = MemoryAssociationStore::new();
        let classifier = SchemeClassifier::new(&store);
        assert!(!classifier.is_local_only("http").unwrap());
        assert!(!classifier.is_local_only("ms-settings").unwrap());
    }

    #[test]
    fn registered_scheme_without_marker_is_unrestricted() {
        let mut store = MemoryAssociationStore::new();
        store.register_scheme("uri-scheme");
        let classifier = SchemeClassifier::new(&store);
        assert_eq!(
            classifier.probe("uri-scheme").unwrap(),
            LocalOnlyClassification::Unrestricted
        );
    }

    #[test]
    fn marker_without_prefix_is_local_only() {
        let mut store = MemoryAssociationStore::new();
        store.register_scheme("uri-scheme-local-only");
        store.mark_local_only("uri-scheme-local-only");
        let classifier = SchemeClassifier::new(&store);
        assert_eq!(
            classifier.probe("uri-scheme-local-only").unwrap(),
            LocalOnlyClassification::StoreMarker
        );
        assert!(classifier.is_local_only("uri-scheme-local-only").unwrap());
    }

    // -- failure propagation ------------------------------------------------

    #[test]
    fn store_failure_propagates_rather_than_guessing_false() {
        use crate::association::FailingAssociationStore;
        let classifier = SchemeClassifier::new(&FailingAssociationStore);
        let err = classifier.is_local_only("uri-scheme").unwrap_err();
        assert!(matches!(err, AssociationError::StoreUnavailable { .. }));
    }

    #[test]
    fn prefix_rule_still_answers_when_store_is_down() {
        use crate::association::FailingAssociationStore;
        let classifier = SchemeClassifier::new(&FailingAssociationStore);
        assert!(classifier.is_local_only("local+files").unwrap());
    }

    // -- idempotence --------------------------------------------------------

    #[test]
    fn classification_is_stable_against_unchanged_store() {
        let mut store = MemoryAssociationStore::new();
        store.register_scheme("uri-scheme-local-only");
        store.mark_local_only("uri-scheme-local-only");
        let classifier = SchemeClassifier::new(&store);

        let first = classifier.probe("uri-scheme-local-only").unwrap();
        let second = classifier.probe("uri-scheme-local-only").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn classification_sees_runtime_registration_changes() {
        // No caching: a registration added between probes is observed.
        let mut store = MemoryAssociationStore::new();
        {
            let classifier = SchemeClassifier::new(&store);
            assert!(!classifier.is_local_only("late-scheme").unwrap());
        }
        store.register_scheme("late-scheme");
        store.mark_local_only("late-scheme");
        let classifier = SchemeClassifier::new(&store);
        assert!(classifier.is_local_only("late-scheme").unwrap());
    }
}
