#![forbid(unsafe_code)]

//! Fail-closed trust mediation for URI handler and child-process
//! activation.
//!
//! Before a host creates a handler object or spawns a handler process,
//! the [`mediator::ActivationMediator`] inspects the target scheme's
//! declared trust attributes (minimum allowed URL zone, local-only
//! marker, edit flags) against the launch context's zone and renders one
//! of three outcomes: continue, continue with the process stamped as
//! untrusted-sourced, or abort the activation.
//!
//! The association store and handler resolution are external
//! collaborators, reached through the traits in [`association`] and
//! [`mediator`]; [`capability`] carries the identifier-keyed service
//! discovery hosts and handler contexts use to find each other.

pub mod association;
pub mod capability;
pub mod launch_trace;
pub mod mediator;
pub mod process_taint;
pub mod scheme_classifier;
pub mod trust_decision;
pub mod url_zone;
