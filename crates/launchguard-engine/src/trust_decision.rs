//! Zone-based trust decisions.
//!
//! [`decide`] compares a handler's declared minimum allowed zone against
//! the launch context's zone.  Zone ordinals increase as trust decreases,
//! so "required minimum is numerically smaller than the context zone"
//! literally means "the handler requires more trust than this launch can
//! provide".  That comparison direction is the entire policy.
//!
//! `decide` is pure and only ever yields `Allow` or `Block`; escalation
//! to `TaintUntrusted` and the local-only override belong to the
//! mediator, which combines this result with scheme classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::association::AssociationRecord;
use crate::url_zone::UrlZone;

/// Outcome of trust mediation for one launch request.  Final once
/// rendered; nothing revisits it after activation hooks have fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustDecision {
    /// Activation continues unmodified.
    Allow,
    /// Activation continues, but the spawned process is stamped as
    /// originating from an untrusted source.
    TaintUntrusted,
    /// Activation must not happen; no handler object or process is
    /// created.
    Block,
}

impl TrustDecision {
    /// `true` for the outcomes that permit handler/process creation.
    pub fn permits_creation(self) -> bool {
        !matches!(self, Self::Block)
    }
}

impl fmt::Display for TrustDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Allow => "allow",
            Self::TaintUntrusted => "taint_untrusted",
            Self::Block => "block",
        };
        f.write_str(name)
    }
}

/// The zone a launch input is considered to originate from.  Immutable
/// for the lifetime of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchContext {
    pub zone: UrlZone,
    /// Free-form origin tag for diagnostics ("browser", "shell", ...).
    pub origin: String,
}

impl LaunchContext {
    pub fn from_zone(zone: UrlZone) -> Self {
        Self {
            zone,
            origin: zone.as_str().to_string(),
        }
    }

    /// A browser-initiated link: classified as `Internet`.
    pub fn browser() -> Self {
        Self {
            zone: UrlZone::Internet,
            origin: "browser".to_string(),
        }
    }

    /// A launch initiated on the local machine.
    pub fn local() -> Self {
        Self {
            zone: UrlZone::LocalMachine,
            origin: "local".to_string(),
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn is_local(&self) -> bool {
        self.zone == UrlZone::LocalMachine
    }
}

/// The compared ordinals behind a decision, for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDetail {
    pub required_minimum: Option<UrlZone>,
    pub context_zone: UrlZone,
    pub decision: TrustDecision,
}

/// Compare the record's declared minimum allowed zone against the launch
/// context.
///
/// No declared minimum means no constraint: `Allow`.  A declared minimum
/// strictly more trusted than the context zone means the handler demands
/// a trust level this launch does not meet: `Block`.
pub fn decide(record: &AssociationRecord, context: &LaunchContext) -> TrustDecision {
    match record.minimum_allowed_url_zone {
        None => TrustDecision::Allow,
        Some(required) => {
            if required.is_more_trusted_than(context.zone) {
                TrustDecision::Block
            } else {
                TrustDecision::Allow
            }
        }
    }
}

/// [`decide`], keeping the compared ordinals for event reporting.
pub fn decide_with_detail(record: &AssociationRecord, context: &LaunchContext) -> DecisionDetail {
    DecisionDetail {
        required_minimum: record.minimum_allowed_url_zone,
        context_zone: context.zone,
        decision: decide(record, context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_minimum(zone: Option<UrlZone>) -> AssociationRecord {
        AssociationRecord {
            minimum_allowed_url_zone: zone,
            ..AssociationRecord::unconstrained()
        }
    }

    #[test]
    fn absent_minimum_allows_any_context() {
        let record = record_with_minimum(None);
        for zone in UrlZone::ORDERED {
            assert_eq!(
                decide(&record, &LaunchContext::from_zone(zone)),
                TrustDecision::Allow
            );
        }
    }

    #[test]
    fn local_minimum_blocks_internet_context() {
        let record = record_with_minimum(Some(UrlZone::LocalMachine));
        assert_eq!(
            decide(&record, &LaunchContext::browser()),
            TrustDecision::Block
        );
    }

    #[test]
    fn minimum_equal_to_context_allows() {
        let record = record_with_minimum(Some(UrlZone::Internet));
        assert_eq!(
            decide(&record, &LaunchContext::browser()),
            TrustDecision::Allow
        );
    }

    #[test]
    fn minimum_less_trusted_than_context_allows() {
        // Handler accepts even untrusted launches; internet is fine.
        let record = record_with_minimum(Some(UrlZone::Untrusted));
        assert_eq!(
            decide(&record, &LaunchContext::browser()),
            TrustDecision::Allow
        );
    }

    #[test]
    fn comparison_direction_over_all_zone_pairs() {
        for required in UrlZone::ORDERED {
            for context_zone in UrlZone::ORDERED {
                let record = record_with_minimum(Some(required));
                let context = LaunchContext::from_zone(context_zone);
                let expected = if required.ordinal() < context_zone.ordinal() {
                    TrustDecision::Block
                } else {
                    TrustDecision::Allow
                };
                assert_eq!(decide(&record, &context), expected);
            }
        }
    }

    #[test]
    fn decision_detail_captures_compared_ordinals() {
        let record = record_with_minimum(Some(UrlZone::Intranet));
        let detail = decide_with_detail(&record, &LaunchContext::browser());
        assert_eq!(detail.required_minimum, Some(UrlZone::Intranet));
        assert_eq!(detail.context_zone, UrlZone::Internet);
        assert_eq!(detail.decision, TrustDecision::Block);
    }

    #[test]
    fn block_never_permits_creation() {
        assert!(TrustDecision::Allow.permits_creation());
        assert!(TrustDecision::TaintUntrusted.permits_creation());
        assert!(!TrustDecision::Block.permits_creation());
    }

    #[test]
    fn local_context_is_local() {
        assert!(LaunchContext::local().is_local());
        assert!(!LaunchContext::browser().is_local());
        assert!(!LaunchContext::from_zone(UrlZone::Intranet).is_local());
    }
}
