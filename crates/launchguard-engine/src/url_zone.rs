//! Ordinal URL-zone taxonomy.
//!
//! A `UrlZone` classifies where a launch input originated.  Zones are a
//! total order: the ordinal rank grows as trust shrinks, so
//! `LocalMachine` (most trusted) compares less than `Untrusted` (least
//! trusted).  All comparisons are purely numeric; validation of
//! store-supplied ordinals happens at the association boundary, not here.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Trust classification of a launch origin.  Smaller ordinal = more trusted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UrlZone {
    /// Content originating on the local machine.
    LocalMachine,
    /// Content from the local intranet.
    Intranet,
    /// Content from explicitly trusted origins.
    Trusted,
    /// Content from the open internet (browser-initiated links land here).
    Internet,
    /// Content from origins explicitly marked untrusted.
    Untrusted,
}

impl UrlZone {
    /// All zones, most trusted first.
    pub const ORDERED: [Self; 5] = [
        Self::LocalMachine,
        Self::Intranet,
        Self::Trusted,
        Self::Internet,
        Self::Untrusted,
    ];

    /// Numeric rank of this zone.
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    /// Reverse of [`UrlZone::ordinal`].  Returns `None` for out-of-range
    /// values; callers at the store boundary must treat that as a
    /// malformed registration, not as "no constraint".
    pub fn from_ordinal(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::LocalMachine),
            1 => Some(Self::Intranet),
            2 => Some(Self::Trusted),
            3 => Some(Self::Internet),
            4 => Some(Self::Untrusted),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalMachine => "local_machine",
            Self::Intranet => "intranet",
            Self::Trusted => "trusted",
            Self::Internet => "internet",
            Self::Untrusted => "untrusted",
        }
    }

    /// Compare two zones by ordinal rank.
    pub fn compare(a: Self, b: Self) -> Ordering {
        a.ordinal().cmp(&b.ordinal())
    }

    /// `true` when `self` carries strictly more trust than `other`.
    pub fn is_more_trusted_than(self, other: Self) -> bool {
        self.ordinal() < other.ordinal()
    }
}

impl fmt::Display for UrlZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
