// engine.rs — ConsentEngine: the orchestrator.
//
// Wires the registry, store, form and surface together. On construction it
// either replays startup events from the persisted record or initializes
// the form to descriptor defaults; on accept/reject it computes the choice
// vector, detects per-capability value changes against the last saved
// snapshot, queues the hooks, drains the queue once, persists the result
// and drives the banner/notice transitions.
//
// Construction is infallible: configuration faults leave the engine
// Degraded (logged, every action a no-op) rather than erroring out.

use std::sync::Arc;
use std::time::Instant;

use crate::capability::{Capability, CapabilityRegistry, HookParams};
use crate::choice::{Choice, ChoiceVector};
use crate::config::{EngineConfig, LifecycleHook};
use crate::error::ConsentError;
use crate::form::FormBinding;
use crate::kv::{KvStore, Scope};
use crate::queue::{EventKind, EventQueue};
use crate::store::{ChoiceStore, PersistedRecord};
use crate::surface::Surface;

/// The engine's construction outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// Fully initialized; actions dispatch.
    Ready,
    /// A configuration fault at construction. The engine value exists but
    /// every action is a logged no-op.
    Degraded { reason: String },
}

impl EngineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, EngineState::Ready)
    }
}

/// The narrowed engine view passed to capability and lifecycle hooks:
/// consent record operations, form reads, and raw kv access for hooks that
/// manage their own third-party entries.
pub struct EngineCtx<'a> {
    store: &'a ChoiceStore,
    kv: &'a mut dyn KvStore,
    form: &'a dyn FormBinding,
}

impl<'a> EngineCtx<'a> {
    pub(crate) fn new(
        store: &'a ChoiceStore,
        kv: &'a mut dyn KvStore,
        form: &'a dyn FormBinding,
    ) -> Self {
        Self { store, kv, form }
    }

    /// The stored consent record as of now.
    pub fn record(&self) -> Option<PersistedRecord> {
        self.store.load(&*self.kv)
    }

    /// Merge a patch over the stored consent record.
    pub fn save(&mut self, patch: PersistedRecord) -> Result<(), ConsentError> {
        self.store.save(self.kv, patch)
    }

    /// Delete the stored consent record.
    pub fn clear(&mut self) -> Result<(), ConsentError> {
        self.store.clear(self.kv)
    }

    /// The live form choice vector.
    pub fn choices(&self) -> ChoiceVector {
        self.form.get_choices()
    }

    /// A single live form choice.
    pub fn choice(&self, name: &str) -> Option<bool> {
        self.form.get_choice(name)
    }

    /// Raw access to the key-value collaborator, for hooks cleaning up
    /// entries of their own (e.g. an analytics reject hook removing its
    /// tracker state). The consent record itself should go through
    /// [`save`](Self::save)/[`clear`](Self::clear).
    pub fn kv(&mut self) -> &mut dyn KvStore {
        self.kv
    }

    /// The scope the consent record is stored under.
    pub fn scope(&self) -> &Scope {
        self.store.scope()
    }
}

/// The consent engine.
pub struct ConsentEngine {
    debug: bool,
    link_only: bool,
    registry: CapabilityRegistry,
    store: ChoiceStore,
    on_reject_end: LifecycleHook,
    on_accept_end: LifecycleHook,
    kv: Box<dyn KvStore>,
    form: Box<dyn FormBinding>,
    surface: Box<dyn Surface>,
    state: EngineState,
}

impl ConsentEngine {
    /// Construct the engine and run the startup pass.
    ///
    /// Validates the capability list, mounts the surface, loads the
    /// persisted record, then either replays startup events (persisted
    /// choices exist) or initializes the form to descriptor defaults, and
    /// finally shows the notice or the banner depending on the stored
    /// consented flag.
    pub fn new(
        config: EngineConfig,
        kv: Box<dyn KvStore>,
        form: Box<dyn FormBinding>,
        mut surface: Box<dyn Surface>,
    ) -> Self {
        let EngineConfig {
            debug,
            name,
            scope,
            link_only,
            on_reject_end,
            on_accept_end,
            capabilities,
        } = config;

        let mut fault = None;
        let registry = match CapabilityRegistry::new(capabilities) {
            Ok(registry) => registry,
            Err(error) => {
                fault = Some(error.to_string());
                CapabilityRegistry::empty()
            }
        };
        if fault.is_none() {
            if let Err(error) = surface.mount() {
                fault = Some(error.to_string());
            }
        }

        let state = match fault {
            Some(reason) => {
                tracing::error!(%reason, "consent engine degraded");
                EngineState::Degraded { reason }
            }
            None => EngineState::Ready,
        };

        let mut engine = Self {
            debug,
            link_only,
            registry,
            store: ChoiceStore::new(name, scope),
            on_reject_end,
            on_accept_end,
            kv,
            form,
            surface,
            state,
        };
        if engine.state.is_ready() {
            engine.startup();
        }
        engine
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// The stored consent record as of now.
    pub fn record(&self) -> Option<PersistedRecord> {
        self.store.load(self.kv.as_ref())
    }

    /// The live form choice vector.
    pub fn choices(&self) -> ChoiceVector {
        self.form.get_choices()
    }

    /// A single live form choice.
    pub fn choice(&self, name: &str) -> Option<bool> {
        self.form.get_choice(name)
    }

    /// The accept action: dispatch per the live form state, then persist.
    ///
    /// Per choice this queues Update, ValueChange when the value differs
    /// from the last saved one, and Accept or Reject by checked state.
    pub fn accept(&mut self) {
        if !self.ready("accept") {
            return;
        }
        let started = Instant::now();

        let choices = self.form.get_choices();
        let snapshot = self.store.load(self.kv.as_ref());

        let mut queue = EventQueue::new();
        for choice in &choices {
            let Some(capability) = self.registry.get(&choice.name) else {
                self.log_unknown(&choice.name);
                continue;
            };
            self.enqueue_value_events(&mut queue, capability, choice, snapshot.as_ref());
            let kind = if choice.value {
                EventKind::Accept
            } else {
                EventKind::Reject
            };
            self.enqueue_hook(&mut queue, capability, kind, HookParams::empty());
        }

        let mut ctx = EngineCtx::new(&self.store, self.kv.as_mut(), self.form.as_ref());
        queue.run(&mut ctx);
        (self.on_accept_end)(&mut ctx);
        drop(ctx);

        self.surface.hide_banner();
        self.show_notice();

        if self.debug {
            tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "accept pass finished"
            );
        }
    }

    /// The reject action: reset to descriptor defaults and force reject
    /// semantics on every capability.
    ///
    /// The queue runs before the vector is persisted, so the default
    /// functional reject hook clears the old record first and the final
    /// stored record is exactly `{choices}`.
    pub fn reject(&mut self) {
        if !self.ready("reject") {
            return;
        }
        let started = Instant::now();

        let snapshot = self.store.load(self.kv.as_ref());
        let choices = self.init_fields();

        let mut queue = EventQueue::new();
        for choice in &choices {
            let Some(capability) = self.registry.get(&choice.name) else {
                self.log_unknown(&choice.name);
                continue;
            };
            self.enqueue_value_events(&mut queue, capability, choice, snapshot.as_ref());
            // Global reject: Reject fires even for choices whose default
            // value is true (always-on capabilities included).
            self.enqueue_hook(&mut queue, capability, EventKind::Reject, HookParams::empty());
        }

        let mut ctx = EngineCtx::new(&self.store, self.kv.as_mut(), self.form.as_ref());
        queue.run(&mut ctx);
        if let Err(error) = ctx.save(PersistedRecord::with_choices(choices)) {
            tracing::warn!(%error, "failed to persist rejected choices");
        }
        (self.on_reject_end)(&mut ctx);
        drop(ctx);

        self.surface.hide_banner();
        self.show_notice();

        if self.debug {
            tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "reject pass finished"
            );
        }
    }

    /// Reopen the banner from the notice.
    pub fn reopen(&mut self) {
        if !self.ready("reopen") {
            return;
        }
        self.hide_notice();
        self.surface.show_banner();
    }

    fn startup(&mut self) {
        let record = self.store.load(self.kv.as_ref());
        match record.as_ref().and_then(|r| r.choices.clone()) {
            Some(choices) => {
                self.form.set_choices(&choices);
                // Startup replay: Accept or Reject per persisted value.
                // No Update, no ValueChange — there is nothing to compare
                // against on this pass.
                let mut queue = EventQueue::new();
                for choice in &choices {
                    let Some(capability) = self.registry.get(&choice.name) else {
                        self.log_unknown(&choice.name);
                        continue;
                    };
                    let kind = if choice.value {
                        EventKind::Accept
                    } else {
                        EventKind::Reject
                    };
                    self.enqueue_hook(&mut queue, capability, kind, HookParams::empty());
                }
                let mut ctx = EngineCtx::new(&self.store, self.kv.as_mut(), self.form.as_ref());
                queue.run(&mut ctx);
            }
            None => {
                self.init_fields();
            }
        }

        if record.and_then(|r| r.consented).unwrap_or(false) {
            self.show_notice();
        } else {
            self.surface.show_banner();
        }
    }

    /// Reset the form to the descriptor-defaults vector and return it.
    fn init_fields(&mut self) -> ChoiceVector {
        let defaults = self.registry.defaults();
        self.form.set_choices(&defaults);
        defaults
    }

    /// Queue the value events for one choice: Update always, ValueChange
    /// when the pre-action snapshot holds a different value for this name.
    fn enqueue_value_events(
        &self,
        queue: &mut EventQueue,
        capability: &Capability,
        choice: &Choice,
        snapshot: Option<&PersistedRecord>,
    ) {
        let params = HookParams::value(choice.value);
        self.enqueue_hook(queue, capability, EventKind::Update, params.clone());

        let prior = snapshot
            .and_then(|r| r.choices.as_ref())
            .and_then(|c| c.get(&choice.name));
        if let Some(prior) = prior {
            if prior != choice.value {
                self.enqueue_hook(queue, capability, EventKind::ValueChange, params);
            }
        }
    }

    fn enqueue_hook(
        &self,
        queue: &mut EventQueue,
        capability: &Capability,
        kind: EventKind,
        params: HookParams,
    ) {
        match capability.hook(kind) {
            Some(hook) => {
                queue.enqueue(kind, capability.name.as_str(), Arc::clone(hook), params);
                if self.debug {
                    tracing::debug!(capability = %capability.name, %kind, "hook queued");
                }
            }
            None => {
                if self.debug {
                    tracing::debug!(capability = %capability.name, %kind, "no hook registered");
                }
            }
        }
    }

    fn show_notice(&mut self) {
        if !self.link_only {
            self.surface.show_notice();
        }
    }

    fn hide_notice(&mut self) {
        if !self.link_only {
            self.surface.hide_notice();
        }
    }

    fn log_unknown(&self, name: &str) {
        if self.debug {
            tracing::debug!(capability = name, "choice references unknown capability; skipping");
        }
    }

    fn ready(&self, action: &str) -> bool {
        match &self.state {
            EngineState::Ready => true,
            EngineState::Degraded { reason } => {
                tracing::warn!(action, %reason, "engine degraded; ignoring action");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::form::MemoryForm;
    use crate::kv::MemoryKv;
    use crate::surface::LogSurface;

    struct UnmountableSurface;

    impl Surface for UnmountableSurface {
        fn mount(&mut self) -> Result<(), ConsentError> {
            Err(ConsentError::MissingControl("accept button".to_string()))
        }
        fn show_banner(&mut self) {}
        fn hide_banner(&mut self) {}
        fn show_notice(&mut self) {}
        fn hide_notice(&mut self) {}
    }

    fn engine_with(config: EngineConfig, form: MemoryForm) -> ConsentEngine {
        ConsentEngine::new(
            config,
            Box::new(MemoryKv::new()),
            Box::new(form),
            Box::new(LogSurface::new()),
        )
    }

    #[test]
    fn first_load_initializes_form_to_defaults() {
        let config = EngineConfig {
            capabilities: vec![
                Capability::new("functional").no_opt_out(true),
                Capability::new("ads"),
            ],
            ..EngineConfig::default()
        };
        let engine = engine_with(config, MemoryForm::new(["functional", "ads"]));

        assert!(engine.state().is_ready());
        let choices = engine.choices();
        assert_eq!(choices.get("functional"), Some(true));
        assert_eq!(choices.get("ads"), Some(false));
        // First visit persists nothing.
        assert_eq!(engine.record(), None);
    }

    #[test]
    fn duplicate_capabilities_degrade_the_engine() {
        let config = EngineConfig {
            capabilities: vec![Capability::new("ads"), Capability::new("ads")],
            ..EngineConfig::default()
        };
        let engine = engine_with(config, MemoryForm::new(["ads"]));

        assert!(matches!(engine.state(), EngineState::Degraded { .. }));
    }

    #[test]
    fn failed_mount_degrades_and_actions_are_noops() {
        let form = MemoryForm::new(["functional"]);
        let mut engine = ConsentEngine::new(
            EngineConfig::default(),
            Box::new(MemoryKv::new()),
            Box::new(form.clone()),
            Box::new(UnmountableSurface),
        );

        assert!(matches!(engine.state(), EngineState::Degraded { .. }));
        // The functional default is never written into the form.
        assert_eq!(form.get_choice("functional"), Some(false));

        engine.accept();
        engine.reject();
        engine.reopen();
        assert_eq!(engine.record(), None);
    }

    #[test]
    fn consented_record_shows_notice_instead_of_banner() {
        let mut kv = MemoryKv::new();
        let store = ChoiceStore::new("consent", Scope::default());
        let choices: ChoiceVector = [("functional".to_string(), true)].into_iter().collect();
        store
            .save(
                &mut kv,
                PersistedRecord {
                    choices: Some(choices),
                    consented: Some(true),
                },
            )
            .unwrap();

        let surface = LogSurface::new();
        ConsentEngine::new(
            EngineConfig::default(),
            Box::new(kv),
            Box::new(MemoryForm::new(["functional"])),
            Box::new(surface.clone()),
        );

        assert!(surface.visibility().notice);
        assert!(!surface.visibility().banner);
    }
}
