//! Deterministic trace-id derivation for launch requests.
//!
//! Mediation events thread a trace id.  When the caller supplies none,
//! the id is derived from the request's identifying fields so equal
//! requests produce byte-identical event streams.

use sha2::{Digest, Sha256};

const TRACE_ID_PREFIX: &str = "lg-";
/// Bytes of the digest carried into the hex id.
const TRACE_ID_DIGEST_BYTES: usize = 8;

/// Derive a trace id from the launch target, verb, and class override.
///
/// Fields are length-prefixed before hashing so `("ab", "c")` and
/// `("a", "bc")` cannot collide; an absent field hashes differently from
/// an empty one.
pub fn derive_trace_id(target: &str, verb: Option<&str>, class_override: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    for field in [Some(target), verb, class_override] {
        match field {
            Some(value) => {
                hasher.update((value.len() as u64).to_be_bytes());
                hasher.update(value.as_bytes());
            }
            None => hasher.update(u64::MAX.to_be_bytes()),
        }
    }
    let digest = hasher.finalize();
    let mut id = String::with_capacity(TRACE_ID_PREFIX.len() + TRACE_ID_DIGEST_BYTES * 2);
    id.push_str(TRACE_ID_PREFIX);
    for byte in digest.iter().take(TRACE_ID_DIGEST_BYTES) {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}
