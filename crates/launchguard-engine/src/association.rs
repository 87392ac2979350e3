//! Association store contract and inspector.
//!
//! The association store is an external, read-only source of per-scheme
//! trust attributes.  [`AssociationInspector`] reduces a scheme's
//! registration to an [`AssociationRecord`] whose optional fields reflect
//! exactly what the store holds; no defaulting happens here.  "No entry
//! at all" (`NotFound`) is distinct from "the store query failed"
//! (`StoreUnavailable`); only the former may be treated as "no
//! constraints" by callers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::url_zone::UrlZone;

/// Marker value whose presence indicates a registered scheme.
pub const URL_PROTOCOL_MARKER: &str = "URL Protocol";
/// Presence-only named value marking a scheme as local-only.
pub const LOCAL_ONLY_VALUE: &str = "LocalOnly";
/// Named value holding the least-trusted zone a launch may come from.
pub const MINIMUM_ALLOWED_URL_ZONE_VALUE: &str = "MinimumAllowedUrlZone";

const LG_ASSOC_NOT_FOUND: &str = "LG-1001";
const LG_ASSOC_STORE_UNAVAILABLE: &str = "LG-1002";
const LG_ASSOC_MALFORMED_VALUE: &str = "LG-1003";

// ---------------------------------------------------------------------------
// Keys and values
// ---------------------------------------------------------------------------

/// Well-known attribute keys understood by the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKey {
    /// The registered handler's prog-id (string value).
    ProgId,
    /// The association edit-flags bitset (data value).
    EditFlags,
    /// An arbitrary named value under the scheme's registration.
    Named(String),
}

impl AssociationKey {
    pub fn local_only() -> Self {
        Self::Named(LOCAL_ONLY_VALUE.to_string())
    }

    pub fn minimum_allowed_url_zone() -> Self {
        Self::Named(MINIMUM_ALLOWED_URL_ZONE_VALUE.to_string())
    }

    /// The attribute name used in the persisted layout.
    pub fn name(&self) -> &str {
        match self {
            Self::ProgId => "ProgId",
            Self::EditFlags => "EditFlags",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for AssociationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque association edit-flags bitset.
///
/// Policy in this crate does not interpret individual bits; the value is
/// carried for decision logging and for callers that do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EditFlags(pub u32);

impl EditFlags {
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// Decode from the store's 4-byte little-endian representation.
    pub fn from_store_bytes(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 4] = bytes.try_into().ok()?;
        Some(Self(u32::from_le_bytes(raw)))
    }

    pub fn to_store_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for EditFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AssociationRecord
// ---------------------------------------------------------------------------

/// A scheme's declared trust attributes, exactly as registered.
///
/// Every field may be independently absent.  Absence means "no constraint
/// declared", never `false`, except `local_only`, which is presence-only
/// in the store and therefore a plain flag here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRecord {
    pub prog_id: Option<String>,
    pub edit_flags: Option<EditFlags>,
    /// `true` when the `LocalOnly` value is present, regardless of content.
    pub local_only: bool,
    pub minimum_allowed_url_zone: Option<UrlZone>,
}

impl AssociationRecord {
    /// A record with nothing declared.  What `lookup` on an unregistered
    /// scheme reduces to at the policy layer.
    pub fn unconstrained() -> Self {
        Self {
            prog_id: None,
            edit_flags: None,
            local_only: false,
            minimum_allowed_url_zone: None,
        }
    }

    pub fn has_declared_constraints(&self) -> bool {
        self.local_only || self.minimum_allowed_url_zone.is_some()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from association-store queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssociationError {
    /// The scheme has no registration at all.  Not fatal for policy:
    /// callers treat it as "no constraints declared", but it stays
    /// distinct from an explicit absent-marker result so they can log it.
    NotFound { scheme: String },
    /// The store query itself failed.  Must propagate; never coerce into
    /// "no constraints".
    StoreUnavailable { detail: String },
    /// The store returned a value this crate cannot interpret (wrong
    /// width, out-of-range zone ordinal).  Treated like an unavailable
    /// store by policy: fail closed.
    MalformedValue {
        scheme: String,
        key: String,
        detail: String,
    },
}

impl AssociationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => LG_ASSOC_NOT_FOUND,
            Self::StoreUnavailable { .. } => LG_ASSOC_STORE_UNAVAILABLE,
            Self::MalformedValue { .. } => LG_ASSOC_MALFORMED_VALUE,
        }
    }

    /// `true` for failures that must prevent an `Allow` outcome.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for AssociationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { scheme } => {
                write!(f, "no association registered for scheme '{scheme}'")
            }
            Self::StoreUnavailable { detail } => {
                write!(f, "association store unavailable: {detail}")
            }
            Self::MalformedValue {
                scheme,
                key,
                detail,
            } => write!(
                f,
                "malformed association value '{key}' for scheme '{scheme}': {detail}"
            ),
        }
    }
}

impl std::error::Error for AssociationError {}

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// Read-only query handle bound to one scheme's registration.
pub trait AssociationQuery {
    /// Fetch a string value.  `Ok(None)` when the value is not present.
    fn get_string(&self, key: &AssociationKey) -> Result<Option<String>, AssociationError>;

    /// Fetch a binary value.  `Ok(None)` when the value is not present.
    fn get_data(&self, key: &AssociationKey) -> Result<Option<Vec<u8>>, AssociationError>;
}

/// The external association store.  Implementations serialize their own
/// reads and writes; this crate performs a live query per lookup and
/// caches nothing.
pub trait AssociationStore {
    /// Bind a query to `scheme`'s registration.  `NotFound` when the
    /// scheme has no registration (no `URL Protocol` marker).
    fn init_for_scheme(
        &self,
        scheme: &str,
    ) -> Result<Box<dyn AssociationQuery + '_>, AssociationError>;
}

// ---------------------------------------------------------------------------
// Inspector
// ---------------------------------------------------------------------------

/// Reduces a scheme's registration to an [`AssociationRecord`].
pub struct AssociationInspector<'a> {
    store: &'a dyn AssociationStore,
}

impl<'a> AssociationInspector<'a> {
    pub fn new(store: &'a dyn AssociationStore) -> Self {
        Self { store }
    }

    /// Read the scheme's declared trust attributes.
    ///
    /// Returns exactly what is present; optional fields stay `None` when
    /// the store holds no value for them.
    pub fn lookup(&self, scheme: &str) -> Result<AssociationRecord, AssociationError> {
        let query = self.store.init_for_scheme(scheme)?;

        let prog_id = query.get_string(&AssociationKey::ProgId)?;

        let edit_flags = match query.get_data(&AssociationKey::EditFlags)? {
            Some(bytes) => Some(EditFlags::from_store_bytes(&bytes).ok_or_else(|| {
                AssociationError::MalformedValue {
                    scheme: scheme.to_string(),
                    key: AssociationKey::EditFlags.name().to_string(),
                    detail: format!("expected 4 bytes, got {}", bytes.len()),
                }
            })?),
            None => None,
        };

        // Presence-only: any registered value, including empty, counts.
        let local_only = query.get_data(&AssociationKey::local_only())?.is_some();

        let minimum_allowed_url_zone =
            match query.get_data(&AssociationKey::minimum_allowed_url_zone())? {
                Some(bytes) => Some(decode_zone(scheme, &bytes)?),
                None => None,
            };

        Ok(AssociationRecord {
            prog_id,
            edit_flags,
            local_only,
            minimum_allowed_url_zone,
        })
    }
}

fn decode_zone(scheme: &str, bytes: &[u8]) -> Result<UrlZone, AssociationError> {
    let malformed = |detail: String| AssociationError::MalformedValue {
        scheme: scheme.to_string(),
        key: MINIMUM_ALLOWED_URL_ZONE_VALUE.to_string(),
        detail,
    };
    let raw: [u8; 4] = bytes
        .try_into()
        .map_err(|_| malformed(format!("expected 4 bytes, got {}", bytes.len())))?;
    let ordinal = u32::from_le_bytes(raw);
    UrlZone::from_ordinal(ordinal)
        .ok_or_else(|| malformed(format!("zone ordinal {ordinal} out of range")))
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory association store following the persisted registration
/// layout: a scheme counts as registered only when it carries the
/// `URL Protocol` marker value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryAssociationStore {
    registrations: BTreeMap<String, SchemeRegistration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SchemeRegistration {
    strings: BTreeMap<String, String>,
    data: BTreeMap<String, Vec<u8>>,
}

impl MemoryAssociationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `scheme` by writing its `URL Protocol` marker.
    pub fn register_scheme(&mut self, scheme: &str) -> &mut Self {
        self.entry(scheme)
            .strings
            .insert(URL_PROTOCOL_MARKER.to_string(), String::new());
        self
    }

    /// Write a string value.  Creates the registration path without
    /// marking the scheme as registered.
    pub fn set_string(&mut self, scheme: &str, key: &AssociationKey, value: &str) -> &mut Self {
        self.entry(scheme)
            .strings
            .insert(key.name().to_string(), value.to_string());
        self
    }

    /// Write a binary value.  Creates the registration path without
    /// marking the scheme as registered.
    pub fn set_data(&mut self, scheme: &str, key: &AssociationKey, bytes: Vec<u8>) -> &mut Self {
        self.entry(scheme).data.insert(key.name().to_string(), bytes);
        self
    }

    pub fn set_prog_id(&mut self, scheme: &str, prog_id: &str) -> &mut Self {
        self.set_string(scheme, &AssociationKey::ProgId, prog_id)
    }

    pub fn set_edit_flags(&mut self, scheme: &str, flags: EditFlags) -> &mut Self {
        self.set_data(
            scheme,
            &AssociationKey::EditFlags,
            flags.to_store_bytes().to_vec(),
        )
    }

    /// Write the presence-only `LocalOnly` marker (empty value).
    pub fn mark_local_only(&mut self, scheme: &str) -> &mut Self {
        self.set_data(scheme, &AssociationKey::local_only(), Vec::new())
    }

    pub fn set_minimum_allowed_url_zone(&mut self, scheme: &str, zone: UrlZone) -> &mut Self {
        self.set_data(
            scheme,
            &AssociationKey::minimum_allowed_url_zone(),
            zone.ordinal().to_le_bytes().to_vec(),
        )
    }

    fn entry(&mut self, scheme: &str) -> &mut SchemeRegistration {
        self.registrations.entry(scheme.to_string()).or_default()
    }
}

impl AssociationStore for MemoryAssociationStore {
    fn init_for_scheme(
        &self,
        scheme: &str,
    ) -> Result<Box<dyn AssociationQuery + '_>, AssociationError> {
        let registration = self
            .registrations
            .get(scheme)
            .filter(|reg| reg.strings.contains_key(URL_PROTOCOL_MARKER))
            .ok_or_else(|| AssociationError::NotFound {
                scheme: scheme.to_string(),
            })?;
        Ok(Box::new(MemoryAssociationQuery { registration }))
    }
}

struct MemoryAssociationQuery<'a> {
    registration: &'a SchemeRegistration,
}

impl AssociationQuery for MemoryAssociationQuery<'_> {
    fn get_string(&self, key: &AssociationKey) -> Result<Option<String>, AssociationError> {
        Ok(self.registration.strings.get(key.name()).cloned())
    }

    fn get_data(&self, key: &AssociationKey) -> Result<Option<Vec<u8>>, AssociationError> {
        Ok(self.registration.data.get(key.name()).cloned())
    }
}

/// Store double whose backing store is unreachable.  Every query reports
/// `StoreUnavailable`, never `NotFound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingAssociationStore;

impl AssociationStore for FailingAssociationStore {
    fn init_for_scheme(
        &self,
        _scheme: &str,
    ) -> Result<Box<dyn AssociationQuery + '_>, AssociationError> {
        Err(AssociationError::StoreUnavailable {
            detail: "backing store unreachable".to_string(),
        })
    }
}
