// capability.rs — Capability descriptors and the registry.
//
// A capability is one independently consentable feature (functional,
// analytics, marketing, …). Each descriptor carries an explicit optional
// hook per event kind — absence is a first-class "no handler" state, so
// dispatch never probes for callables at runtime.
//
// Descriptors are supplied once at engine construction and never mutated;
// changing the capability set means reconstructing the engine.

use std::fmt;
use std::sync::Arc;

use crate::choice::ChoiceVector;
use crate::engine::EngineCtx;
use crate::error::ConsentError;
use crate::queue::EventKind;

/// A capability callback. Receives the engine context (store operations
/// plus form reads) and the event parameters.
pub type Hook = Arc<dyn Fn(&mut EngineCtx<'_>, &HookParams) + Send + Sync>;

/// Parameters passed to a capability hook.
///
/// `choice` is `Some(value)` for the value-related events (Update,
/// ValueChange) and `None` for Accept/Reject and startup replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookParams {
    pub choice: Option<bool>,
}

impl HookParams {
    /// Parameters for an Update/ValueChange event.
    pub fn value(choice: bool) -> Self {
        Self {
            choice: Some(choice),
        }
    }

    /// Parameters carrying no choice value.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One consentable capability: a name, its default checked state, an
/// always-on flag, and up to four event hooks.
#[derive(Clone)]
pub struct Capability {
    /// Unique, non-empty capability name.
    pub name: String,
    /// Checked state the form is initialized to on first visit.
    pub default_checked: bool,
    /// Always-on capabilities are initialized checked and should never be
    /// presented as togglable. The engine does not enforce the latter —
    /// that is a presentation contract.
    pub no_opt_out: bool,
    on_update: Option<Hook>,
    on_value_change: Option<Hook>,
    on_accept: Option<Hook>,
    on_reject: Option<Hook>,
}

impl Capability {
    /// Start a descriptor with no hooks, unchecked, opt-out allowed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_checked: false,
            no_opt_out: false,
            on_update: None,
            on_value_change: None,
            on_accept: None,
            on_reject: None,
        }
    }

    pub fn default_checked(mut self, checked: bool) -> Self {
        self.default_checked = checked;
        self
    }

    pub fn no_opt_out(mut self, no_opt_out: bool) -> Self {
        self.no_opt_out = no_opt_out;
        self
    }

    /// Hook fired on every accept/reject pass, with the capability's
    /// current choice value.
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut EngineCtx<'_>, &HookParams) + Send + Sync + 'static,
    {
        self.on_update = Some(Arc::new(hook));
        self
    }

    /// Hook fired when the choice value differs from the last saved one.
    pub fn on_value_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut EngineCtx<'_>, &HookParams) + Send + Sync + 'static,
    {
        self.on_value_change = Some(Arc::new(hook));
        self
    }

    /// Hook fired when the capability ends a pass accepted.
    pub fn on_accept<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut EngineCtx<'_>, &HookParams) + Send + Sync + 'static,
    {
        self.on_accept = Some(Arc::new(hook));
        self
    }

    /// Hook fired when the capability ends a pass rejected.
    pub fn on_reject<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut EngineCtx<'_>, &HookParams) + Send + Sync + 'static,
    {
        self.on_reject = Some(Arc::new(hook));
        self
    }

    /// The hook slot for one event kind, if registered.
    pub fn hook(&self, kind: EventKind) -> Option<&Hook> {
        match kind {
            EventKind::Update => self.on_update.as_ref(),
            EventKind::ValueChange => self.on_value_change.as_ref(),
            EventKind::Accept => self.on_accept.as_ref(),
            EventKind::Reject => self.on_reject.as_ref(),
        }
    }

    /// The checked state this capability is initialized to: always-on
    /// capabilities are forced checked regardless of their default.
    pub fn initial_value(&self) -> bool {
        self.no_opt_out || self.default_checked
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("default_checked", &self.default_checked)
            .field("no_opt_out", &self.no_opt_out)
            .field("on_update", &self.on_update.is_some())
            .field("on_value_change", &self.on_value_change.is_some())
            .field("on_accept", &self.on_accept.is_some())
            .field("on_reject", &self.on_reject.is_some())
            .finish()
    }
}

/// The ordered, immutable capability list supplied at engine construction.
///
/// Lookup is a linear scan returning the first match — the list is expected
/// to stay small (well under 20 entries).
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    capabilities: Vec<Capability>,
}

impl CapabilityRegistry {
    /// Validate and adopt the descriptor list. Empty or duplicate names
    /// are a configuration fault.
    pub fn new(capabilities: Vec<Capability>) -> Result<Self, ConsentError> {
        for (index, capability) in capabilities.iter().enumerate() {
            if capability.name.is_empty() {
                return Err(ConsentError::EmptyCapabilityName(index));
            }
            if capabilities[..index].iter().any(|c| c.name == capability.name) {
                return Err(ConsentError::DuplicateCapability(capability.name.clone()));
            }
        }
        Ok(Self { capabilities })
    }

    /// A registry with no capabilities (used by degraded engines).
    pub fn empty() -> Self {
        Self {
            capabilities: Vec::new(),
        }
    }

    /// Look up a capability by name (first match).
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.capabilities.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// The descriptor-defaults choice vector, in registry order. This is
    /// what the form is initialized to on first visit and what a reject
    /// pass resets to.
    pub fn defaults(&self) -> ChoiceVector {
        self.capabilities
            .iter()
            .map(|c| (c.name.clone(), c.initial_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_hook_slots() {
        let capability = Capability::new("analytics")
            .default_checked(true)
            .on_accept(|_ctx: &mut EngineCtx<'_>, _params| {})
            .on_update(|_ctx: &mut EngineCtx<'_>, _params| {});

        assert!(capability.hook(EventKind::Accept).is_some());
        assert!(capability.hook(EventKind::Update).is_some());
        assert!(capability.hook(EventKind::Reject).is_none());
        assert!(capability.hook(EventKind::ValueChange).is_none());
    }

    #[test]
    fn no_opt_out_forces_initial_value() {
        let capability = Capability::new("functional").no_opt_out(true);
        assert!(!capability.default_checked);
        assert!(capability.initial_value());
    }

    #[test]
    fn registry_lookup_returns_first_match() {
        let registry = CapabilityRegistry::new(vec![
            Capability::new("functional"),
            Capability::new("ads"),
        ])
        .unwrap();

        assert_eq!(registry.get("ads").unwrap().name, "ads");
        assert!(registry.get("marketing").is_none());
    }

    #[test]
    fn registry_rejects_duplicate_names() {
        let result =
            CapabilityRegistry::new(vec![Capability::new("ads"), Capability::new("ads")]);
        assert!(matches!(
            result,
            Err(ConsentError::DuplicateCapability(name)) if name == "ads"
        ));
    }

    #[test]
    fn registry_rejects_empty_names() {
        let result = CapabilityRegistry::new(vec![Capability::new("")]);
        assert!(matches!(result, Err(ConsentError::EmptyCapabilityName(0))));
    }

    #[test]
    fn defaults_follow_registry_order() {
        let registry = CapabilityRegistry::new(vec![
            Capability::new("functional").no_opt_out(true),
            Capability::new("ads").default_checked(false),
        ])
        .unwrap();

        let defaults = registry.defaults();
        let names: Vec<&str> = defaults.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["functional", "ads"]);
        assert_eq!(defaults.get("functional"), Some(true));
        assert_eq!(defaults.get("ads"), Some(false));
    }
}
