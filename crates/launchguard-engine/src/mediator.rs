//! Activation trust mediation.
//!
//! The mediator sits between a launch request and handler/process
//! creation.  `evaluate` runs the request through
//! `Resolving → Inspecting → Deciding` and renders one final
//! [`TrustDecision`]; the host then drives the three pre-activation hooks
//! (handler creation, process creation, input customization) through the
//! resulting [`LaunchMediation`], which enforces ordering and makes
//! creation after a block structurally impossible: a blocked mediation
//! refuses every hook.
//!
//! Fail-closed: an inspection the store cannot answer is a hard failure,
//! never an `Allow`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::association::{
    AssociationError, AssociationInspector, AssociationRecord, AssociationStore,
};
use crate::capability::CapabilityRegistry;
use crate::launch_trace::derive_trace_id;
use crate::process_taint::{ProcessCreationInputs, mark_untrusted};
use crate::scheme_classifier::{LocalOnlyClassification, SchemeClassifier};
use crate::trust_decision::{DecisionDetail, LaunchContext, TrustDecision, decide_with_detail};
use crate::url_zone::UrlZone;

const COMPONENT: &str = "activation_mediator";

const LG_MEDIATION_RESOLUTION_FAILED: &str = "LG-4001";
const LG_MEDIATION_INSPECTION_UNAVAILABLE: &str = "LG-4002";
const LG_MEDIATION_LAUNCH_BLOCKED: &str = "LG-4003";
const LG_MEDIATION_INVALID_TRANSITION: &str = "LG-4004";
const LG_MEDIATION_HOOK_OUT_OF_ORDER: &str = "LG-4005";

// ---------------------------------------------------------------------------
// Launch request
// ---------------------------------------------------------------------------

/// A single launch of a target item/URI.  Created at the start of a
/// launch, consumed end-to-end, discarded after the decision applies.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub target: String,
    pub verb: Option<String>,
    pub class_override: Option<String>,
    /// Host-side capability registry, used by platform code to discover
    /// the mediator service.
    pub site: Option<Arc<CapabilityRegistry>>,
    /// Caller-supplied trace id; derived from the request fields when
    /// absent.
    pub trace_id: Option<String>,
}

impl LaunchRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            verb: None,
            class_override: None,
            site: None,
            trace_id: None,
        }
    }

    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = Some(verb.into());
        self
    }

    pub fn with_class_override(mut self, class_override: impl Into<String>) -> Self {
        self.class_override = Some(class_override.into());
        self
    }

    pub fn with_site(mut self, site: Arc<CapabilityRegistry>) -> Self {
        self.site = Some(site);
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Discover the activation mediator through the request's site.
    pub fn discover_mediator(&self) -> Option<Arc<ActivationMediator>> {
        self.site.as_ref()?.activation_host()
    }

    pub fn effective_trace_id(&self) -> String {
        self.trace_id.clone().unwrap_or_else(|| {
            derive_trace_id(
                &self.target,
                self.verb.as_deref(),
                self.class_override.as_deref(),
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Handler metadata and resolution
// ---------------------------------------------------------------------------

/// Read-only metadata describing the handler a launch would activate.
///
/// Nested activations can resolve with no application metadata at all;
/// such an info is "empty" and observers skip it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerInfo {
    pub display_name: Option<String>,
    pub publisher: Option<String>,
    pub icon_reference: Option<String>,
    pub prog_id: Option<String>,
    /// Present only for capability-extended handlers.
    pub extended: Option<ExtendedHandlerInfo>,
}

/// Extra metadata only capability-extended handlers expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedHandlerInfo {
    pub application_id: String,
}

impl HandlerInfo {
    pub fn named(display_name: impl Into<String>, prog_id: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            prog_id: Some(prog_id.into()),
            ..Self::default()
        }
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_icon_reference(mut self, icon_reference: impl Into<String>) -> Self {
        self.icon_reference = Some(icon_reference.into());
        self
    }

    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.extended = Some(ExtendedHandlerInfo {
            application_id: application_id.into(),
        });
        self
    }

    pub fn application_id(&self) -> Option<&str> {
        self.extended.as_ref().map(|e| e.application_id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
    }
}

/// The handler identity a resolution collaborator produced for a request.
#[derive(Debug, Clone)]
pub struct ResolvedHandler {
    pub scheme: String,
    pub info: HandlerInfo,
    /// The handler's own capability context.  When it exposes an
    /// association-query capability, inspection uses that store instead
    /// of the mediator's default.
    pub context: Option<Arc<CapabilityRegistry>>,
}

impl ResolvedHandler {
    pub fn new(scheme: impl Into<String>, info: HandlerInfo) -> Self {
        Self {
            scheme: scheme.into(),
            info,
            context: None,
        }
    }

    pub fn with_context(mut self, context: Arc<CapabilityRegistry>) -> Self {
        self.context = Some(context);
        self
    }
}

/// External collaborator: determines which handler a request activates.
pub trait HandlerResolver {
    fn resolve(&self, request: &LaunchRequest) -> Result<ResolvedHandler, ResolutionError>;
}

/// Failure of the resolution collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("no handler registered for target '{target}'")]
    NoHandler { target: String },
    #[error("handler resolution failed for target '{target}': {detail}")]
    Failed { target: String, detail: String },
}

/// Diagnostics sink for resolved handler metadata.
pub trait HandlerInfoObserver {
    fn report_handler_info(&self, info: &HandlerInfo);
}

// ---------------------------------------------------------------------------
// States, hooks, events, errors
// ---------------------------------------------------------------------------

/// Per-request mediation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediationState {
    Idle,
    Resolving,
    Inspecting,
    Deciding,
    /// Decision `Allow`: activation continues unmodified.
    Proceeding,
    /// Decision `TaintUntrusted`: inputs get stamped before creation.
    Tainting,
    /// Decision `Block`: creation must not happen.
    Blocked,
    Completed,
}

impl fmt::Display for MediationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Inspecting => "inspecting",
            Self::Deciding => "deciding",
            Self::Proceeding => "proceeding",
            Self::Tainting => "tainting",
            Self::Blocked => "blocked",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// The three pre-activation hook points, in the order the host fires
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    HandlerCreation,
    ProcessCreation,
    CustomizeInputs,
}

impl HookPoint {
    /// The hook the host must fire after this one.  `CustomizeInputs` is
    /// last.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::HandlerCreation => Some(Self::ProcessCreation),
            Self::ProcessCreation => Some(Self::CustomizeInputs),
            Self::CustomizeInputs => None,
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HandlerCreation => "handler_creation",
            Self::ProcessCreation => "process_creation",
            Self::CustomizeInputs => "customize_inputs",
        };
        f.write_str(name)
    }
}

/// Structured mediation audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediationEvent {
    pub trace_id: String,
    pub component: String,
    pub event: String,
    pub outcome: String,
    pub scheme: Option<String>,
    pub error_code: Option<String>,
    pub detail: Option<String>,
}

/// Errors from activation mediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediationError {
    /// The resolution collaborator could not determine a target; the
    /// request aborts before inspection.
    ResolutionFailed { target: String, detail: String },
    /// The association store could not answer.  Non-`Allow` by
    /// construction: the launch does not proceed.
    InspectionUnavailable { scheme: String, detail: String },
    /// The rendered decision forbids creation.
    LaunchBlocked {
        scheme: String,
        context_zone: UrlZone,
        required_minimum: Option<UrlZone>,
        local_only: bool,
    },
    /// A hook arrived in a state that has no hooks to offer.
    InvalidTransition {
        from: MediationState,
        to: MediationState,
    },
    /// A hook arrived out of sequence.
    HookOutOfOrder { expected: HookPoint, got: HookPoint },
}

impl MediationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ResolutionFailed { .. } => LG_MEDIATION_RESOLUTION_FAILED,
            Self::InspectionUnavailable { .. } => LG_MEDIATION_INSPECTION_UNAVAILABLE,
            Self::LaunchBlocked { .. } => LG_MEDIATION_LAUNCH_BLOCKED,
            Self::InvalidTransition { .. } => LG_MEDIATION_INVALID_TRANSITION,
            Self::HookOutOfOrder { .. } => LG_MEDIATION_HOOK_OUT_OF_ORDER,
        }
    }
}

impl fmt::Display for MediationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResolutionFailed { target, detail } => {
                write!(f, "handler resolution failed for '{target}': {detail}")
            }
            Self::InspectionUnavailable { scheme, detail } => {
                write!(f, "association inspection unavailable for '{scheme}': {detail}")
            }
            Self::LaunchBlocked {
                scheme,
                context_zone,
                required_minimum,
                local_only,
            } => {
                write!(f, "launch of '{scheme}' blocked from zone '{context_zone}'")?;
                if let Some(required) = required_minimum {
                    write!(f, " (requires zone '{required}' or more trusted)")?;
                }
                if *local_only {
                    write!(f, " (scheme is local-only)")?;
                }
                Ok(())
            }
            Self::InvalidTransition { from, to } => {
                write!(f, "invalid mediation transition: {from} -> {to}")
            }
            Self::HookOutOfOrder { expected, got } => {
                write!(f, "hook out of order: expected {expected}, got {got}")
            }
        }
    }
}

impl std::error::Error for MediationError {}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Mediation policy knobs.
///
/// The local-only rule is not configurable: a local-only scheme launched
/// from a non-local context always blocks.  A future policy extension may
/// additionally require the handler's hosting module to be verified
/// before honoring a local-only launch; no such field exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediatorPolicy {
    /// An allowed launch whose context zone is at or beyond this
    /// threshold proceeds tainted, so the spawned process can self-report
    /// an untrusted origin.  `None` disables tainting.
    pub taint_threshold: Option<UrlZone>,
}

impl Default for MediatorPolicy {
    fn default() -> Self {
        Self {
            taint_threshold: Some(UrlZone::Internet),
        }
    }
}

// ---------------------------------------------------------------------------
// Mediator
// ---------------------------------------------------------------------------

/// Renders trust decisions for launch requests.
///
/// Holds no per-request state; concurrent requests are independent.  The
/// per-request state machine lives in the [`LaunchMediation`] that
/// `evaluate` returns.
pub struct ActivationMediator {
    resolver: Box<dyn HandlerResolver>,
    store: Arc<dyn AssociationStore>,
    policy: MediatorPolicy,
    observer: Option<Arc<dyn HandlerInfoObserver>>,
}

impl ActivationMediator {
    pub fn new(resolver: Box<dyn HandlerResolver>, store: Arc<dyn AssociationStore>) -> Self {
        Self {
            resolver,
            store,
            policy: MediatorPolicy::default(),
            observer: None,
        }
    }

    pub fn with_policy(mut self, policy: MediatorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn HandlerInfoObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn policy(&self) -> &MediatorPolicy {
        &self.policy
    }

    /// Run `Resolving → Inspecting → Deciding` for one request.
    ///
    /// Returns the mediation carrying the final decision, including a
    /// `Block`, so the caller keeps the event trail.  Resolution and
    /// store failures return errors; neither permits creation.
    pub fn evaluate(
        &self,
        request: &LaunchRequest,
        context: &LaunchContext,
    ) -> Result<LaunchMediation, MediationError> {
        let trace_id = request.effective_trace_id();
        let mut events = Vec::new();

        // Resolving
        let resolved = self.resolver.resolve(request).map_err(|err| {
            MediationError::ResolutionFailed {
                target: request.target.clone(),
                detail: err.to_string(),
            }
        })?;
        push_event(
            &mut events,
            &trace_id,
            "handler_resolved",
            "ok",
            Some(&resolved.scheme),
            None,
            resolved.info.display_name.clone(),
        );

        // Inspecting: a handler context exposing an association-query
        // capability overrides the mediator's default store.
        let store: Arc<dyn AssociationStore> = resolved
            .context
            .as_ref()
            .and_then(|ctx| ctx.association_query())
            .unwrap_or_else(|| Arc::clone(&self.store));

        let record = match AssociationInspector::new(store.as_ref()).lookup(&resolved.scheme) {
            Ok(record) => {
                push_event(
                    &mut events,
                    &trace_id,
                    "association_inspected",
                    "declared",
                    Some(&resolved.scheme),
                    None,
                    record.prog_id.clone(),
                );
                record
            }
            Err(err @ AssociationError::NotFound { .. }) => {
                push_event(
                    &mut events,
                    &trace_id,
                    "association_inspected",
                    "not_registered",
                    Some(&resolved.scheme),
                    Some(err.error_code()),
                    None,
                );
                AssociationRecord::unconstrained()
            }
            Err(err) => {
                return Err(MediationError::InspectionUnavailable {
                    scheme: resolved.scheme.clone(),
                    detail: err.to_string(),
                });
            }
        };

        let local_only = SchemeClassifier::new(store.as_ref())
            .probe(&resolved.scheme)
            .map_err(|err| MediationError::InspectionUnavailable {
                scheme: resolved.scheme.clone(),
                detail: err.to_string(),
            })?;
        push_event(
            &mut events,
            &trace_id,
            "scheme_classified",
            &local_only.to_string(),
            Some(&resolved.scheme),
            None,
            None,
        );

        // Deciding: zone comparison, then local-only escalation, then
        // taint escalation.
        let detail = decide_with_detail(&record, context);
        let mut decision = detail.decision;
        if local_only.is_local_only() && !context.is_local() {
            decision = TrustDecision::Block;
            push_event(
                &mut events,
                &trace_id,
                "local_only_escalation",
                "block",
                Some(&resolved.scheme),
                Some(LG_MEDIATION_LAUNCH_BLOCKED),
                Some(format!("context zone '{}' is not local", context.zone)),
            );
        } else if decision == TrustDecision::Allow
            && self
                .policy
                .taint_threshold
                .is_some_and(|threshold| context.zone >= threshold)
        {
            decision = TrustDecision::TaintUntrusted;
            push_event(
                &mut events,
                &trace_id,
                "taint_escalation",
                "taint_untrusted",
                Some(&resolved.scheme),
                None,
                None,
            );
        }

        let state = match decision {
            TrustDecision::Allow => MediationState::Proceeding,
            TrustDecision::TaintUntrusted => MediationState::Tainting,
            TrustDecision::Block => MediationState::Blocked,
        };
        push_event(
            &mut events,
            &trace_id,
            "decision_rendered",
            &decision.to_string(),
            Some(&resolved.scheme),
            matches!(decision, TrustDecision::Block).then_some(LG_MEDIATION_LAUNCH_BLOCKED),
            None,
        );

        Ok(LaunchMediation {
            trace_id,
            scheme: resolved.scheme,
            handler: resolved.info,
            record,
            local_only,
            detail,
            decision,
            state,
            next_hook: Some(HookPoint::HandlerCreation),
            application_path: None,
            command_line: None,
            events,
            observer: self.observer.clone(),
        })
    }
}

impl fmt::Debug for ActivationMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationMediator")
            .field("policy", &self.policy)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Per-request mediation
// ---------------------------------------------------------------------------

/// One launch request's mediation: the final decision plus the hook
/// state machine the host drives to completion.
pub struct LaunchMediation {
    trace_id: String,
    scheme: String,
    handler: HandlerInfo,
    record: AssociationRecord,
    local_only: LocalOnlyClassification,
    detail: DecisionDetail,
    decision: TrustDecision,
    state: MediationState,
    next_hook: Option<HookPoint>,
    application_path: Option<String>,
    command_line: Option<String>,
    events: Vec<MediationEvent>,
    observer: Option<Arc<dyn HandlerInfoObserver>>,
}

impl LaunchMediation {
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn handler_info(&self) -> &HandlerInfo {
        &self.handler
    }

    pub fn association_record(&self) -> &AssociationRecord {
        &self.record
    }

    pub fn local_only(&self) -> LocalOnlyClassification {
        self.local_only
    }

    /// The final decision.  Immutable once rendered.
    pub fn decision(&self) -> TrustDecision {
        self.decision
    }

    pub fn decision_detail(&self) -> DecisionDetail {
        self.detail
    }

    pub fn state(&self) -> MediationState {
        self.state
    }

    pub fn permits_creation(&self) -> bool {
        self.decision.permits_creation()
    }

    /// The executable recorded at the process-creation hook.
    pub fn application_path(&self) -> Option<&str> {
        self.application_path.as_deref()
    }

    pub fn command_line(&self) -> Option<&str> {
        self.command_line.as_deref()
    }

    pub fn events(&self) -> &[MediationEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<MediationEvent> {
        std::mem::take(&mut self.events)
    }

    /// First hook: the host is about to create the handler object.
    pub fn before_handler_creation(&mut self) -> Result<(), MediationError> {
        self.enter_hook(HookPoint::HandlerCreation)?;
        self.report_handler_info();
        self.push_hook_event(HookPoint::HandlerCreation, None);
        Ok(())
    }

    /// Second hook: the host resolved the executable and command line it
    /// is about to spawn.
    pub fn before_process_creation(
        &mut self,
        application_path: &str,
        command_line: &str,
    ) -> Result<(), MediationError> {
        self.enter_hook(HookPoint::ProcessCreation)?;
        self.application_path = Some(application_path.to_string());
        self.command_line = Some(command_line.to_string());
        self.report_handler_info();
        self.push_hook_event(
            HookPoint::ProcessCreation,
            Some(application_path.to_string()),
        );
        Ok(())
    }

    /// Third hook: the host is assembling process-creation inputs.  A
    /// tainting mediation stamps the untrusted-source marker here; this
    /// completes the mediation.
    pub fn customize_process_inputs(
        &mut self,
        inputs: &mut ProcessCreationInputs,
    ) -> Result<(), MediationError> {
        self.enter_hook(HookPoint::CustomizeInputs)?;
        if self.state == MediationState::Tainting {
            mark_untrusted(inputs);
            self.push_simple_event("taint_applied", "taint_untrusted", None);
        }
        self.push_hook_event(HookPoint::CustomizeInputs, None);
        self.state = MediationState::Completed;
        self.push_simple_event("mediation_completed", &self.decision.to_string(), None);
        Ok(())
    }

    /// Acknowledge a blocked mediation.  Moves the request to
    /// `Completed` and returns the block outcome the host propagates.
    /// Errors when the mediation is not blocked.
    pub fn signal_block(&mut self) -> Result<MediationError, MediationError> {
        if self.state != MediationState::Blocked {
            return Err(MediationError::InvalidTransition {
                from: self.state,
                to: MediationState::Completed,
            });
        }
        let block = self.block_error();
        self.state = MediationState::Completed;
        self.next_hook = None;
        self.push_simple_event(
            "block_signaled",
            "block",
            Some(LG_MEDIATION_LAUNCH_BLOCKED),
        );
        Ok(block)
    }

    fn block_error(&self) -> MediationError {
        MediationError::LaunchBlocked {
            scheme: self.scheme.clone(),
            context_zone: self.detail.context_zone,
            required_minimum: self.detail.required_minimum,
            local_only: self.local_only.is_local_only(),
        }
    }

    fn enter_hook(&mut self, hook: HookPoint) -> Result<(), MediationError> {
        if self.state == MediationState::Blocked {
            self.push_simple_event(
                "hook_refused",
                "blocked",
                Some(LG_MEDIATION_LAUNCH_BLOCKED),
            );
            return Err(self.block_error());
        }
        if !matches!(
            self.state,
            MediationState::Proceeding | MediationState::Tainting
        ) {
            return Err(MediationError::InvalidTransition {
                from: self.state,
                to: MediationState::Completed,
            });
        }
        match self.next_hook {
            Some(expected) if expected == hook => {
                self.next_hook = hook.next();
                Ok(())
            }
            Some(expected) => {
                self.push_simple_event(
                    "hook_refused",
                    "out_of_order",
                    Some(LG_MEDIATION_HOOK_OUT_OF_ORDER),
                );
                Err(MediationError::HookOutOfOrder {
                    expected,
                    got: hook,
                })
            }
            None => Err(MediationError::InvalidTransition {
                from: self.state,
                to: MediationState::Completed,
            }),
        }
    }

    fn report_handler_info(&mut self) {
        // Nested activations resolve with no application metadata; skip.
        if self.handler.is_empty() {
            return;
        }
        if let Some(observer) = &self.observer {
            observer.report_handler_info(&self.handler);
        }
        let name = self.handler.display_name.clone();
        self.push_simple_event_detail("handler_info_reported", "ok", None, name);
    }

    fn push_hook_event(&mut self, hook: HookPoint, detail: Option<String>) {
        self.push_simple_event_detail(&format!("hook_{hook}"), "ok", None, detail);
    }

    fn push_simple_event(&mut self, event: &str, outcome: &str, error_code: Option<&str>) {
        self.push_simple_event_detail(event, outcome, error_code, None);
    }

    fn push_simple_event_detail(
        &mut self,
        event: &str,
        outcome: &str,
        error_code: Option<&str>,
        detail: Option<String>,
    ) {
        let trace_id = self.trace_id.clone();
        let scheme = self.scheme.clone();
        push_event(
            &mut self.events,
            &trace_id,
            event,
            outcome,
            Some(&scheme),
            error_code,
            detail,
        );
    }
}

impl fmt::Debug for LaunchMediation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchMediation")
            .field("trace_id", &self.trace_id)
            .field("scheme", &self.scheme)
            .field("decision", &self.decision)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::too_many_arguments)]
fn push_event(
    events: &mut Vec<MediationEvent>,
    trace_id: &str,
    event: &str,
    outcome: &str,
    scheme: Option<&str>,
    error_code: Option<&str>,
    detail: Option<String>,
) {
    events.push(MediationEvent {
        trace_id: trace_id.to_string(),
        component: COMPONENT.to_string(),
        event: event.to_string(),
        outcome: outcome.to_string(),
        scheme: scheme.map(str::to_string),
        error_code: error_code.map(str::to_string),
        detail,
    });
}
