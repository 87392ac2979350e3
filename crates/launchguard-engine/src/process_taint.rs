//! Untrusted-source stamping of process-creation inputs.
//!
//! When mediation decides `TaintUntrusted`, the inputs that will create
//! the handler process get a discrete marker attribute so the spawned
//! process can self-report that it was launched from a less-trusted
//! context.  Stamping is pure data manipulation: idempotent, no other
//! side effects, no error conditions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Attributes attachable to process-creation inputs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProcessAttribute {
    /// The process was launched on behalf of a less-trusted origin.
    UntrustedSource,
}

/// The inputs a host assembles before spawning a handler process.
/// Spawning itself is outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCreationInputs {
    pub application_path: String,
    pub command_line: String,
    pub attributes: BTreeSet<ProcessAttribute>,
}

impl ProcessCreationInputs {
    pub fn new(application_path: impl Into<String>, command_line: impl Into<String>) -> Self {
        Self {
            application_path: application_path.into(),
            command_line: command_line.into(),
            attributes: BTreeSet::new(),
        }
    }
}

/// Stamp the untrusted-source marker.  Calling this twice leaves the same
/// marker state as calling it once.
pub fn mark_untrusted(inputs: &mut ProcessCreationInputs) {
    inputs.attributes.insert(ProcessAttribute::UntrustedSource);
}

pub fn is_marked_untrusted(inputs: &ProcessCreationInputs) -> bool {
    inputs.attributes.contains(&ProcessAttribute::UntrustedSource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_inputs_carry_no_marker() {
        let inputs = ProcessCreationInputs::new("C:/app/handler.exe", "handler.exe --open");
        assert!(!is_marked_untrusted(&inputs));
        assert!(inputs.attributes.is_empty());
    }

    #[test]
    fn marking_sets_the_untrusted_source_attribute() {
        let mut inputs = ProcessCreationInputs::new("C:/app/handler.exe", "handler.exe");
        mark_untrusted(&mut inputs);
        assert!(is_marked_untrusted(&inputs));
    }

    #[test]
    fn marking_twice_equals_marking_once() {
        let mut once = ProcessCreationInputs::new("C:/app/handler.exe", "handler.exe");
        let mut twice = once.clone();
        mark_untrusted(&mut once);
        mark_untrusted(&mut twice);
        mark_untrusted(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn marking_touches_nothing_else() {
        let mut inputs = ProcessCreationInputs::new("C:/app/handler.exe", "handler.exe --x");
        let path = inputs.application_path.clone();
        let cmdline = inputs.command_line.clone();
        mark_untrusted(&mut inputs);
        assert_eq!(inputs.application_path, path);
        assert_eq!(inputs.command_line, cmdline);
    }
}
