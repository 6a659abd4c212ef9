// queue.rs — EventKind and the per-pass event queue/runner.
//
// Hooks are never called at the point a choice is examined. They are
// queued during the pass and drained once, grouped by event kind in a
// fixed priority order. For a single user action this guarantees that ALL
// capabilities' update hooks run before ANY value-change hook, and all
// value-change hooks before any accept/reject hook — a capability reacting
// to "X accepted" can assume every update/change hook already ran,
// independent of list position.
//
// The queue is a pass-local value: each action constructs a fresh one and
// `run` consumes it, so entries cannot leak between passes.

use std::fmt;

use crate::capability::{Hook, HookParams};
use crate::engine::EngineCtx;

/// The dispatch categories, in execution order. The relative order
/// `Update < ValueChange < Accept < Reject` is a hard contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Update,
    ValueChange,
    Accept,
    Reject,
}

impl EventKind {
    /// Execution order the runner drains kinds in.
    pub const ORDER: [EventKind; 4] = [
        EventKind::Update,
        EventKind::ValueChange,
        EventKind::Accept,
        EventKind::Reject,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Update => write!(f, "update"),
            EventKind::ValueChange => write!(f, "value_change"),
            EventKind::Accept => write!(f, "accept"),
            EventKind::Reject => write!(f, "reject"),
        }
    }
}

struct QueueEntry {
    kind: EventKind,
    capability: String,
    hook: Hook,
    params: HookParams,
}

/// The ordered, deferred hook dispatcher for one pass.
#[derive(Default)]
pub struct EventQueue {
    entries: Vec<QueueEntry>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook invocation. Entries accumulate in insertion order;
    /// nothing executes until [`run`](Self::run).
    pub fn enqueue(
        &mut self,
        kind: EventKind,
        capability: impl Into<String>,
        hook: Hook,
        params: HookParams,
    ) {
        self.entries.push(QueueEntry {
            kind,
            capability: capability.into(),
            hook,
            params,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain the queue: for each kind in [`EventKind::ORDER`], execute
    /// every entry of that kind in the order it was enqueued. Consumes the
    /// queue — entries never survive a pass.
    pub fn run(self, ctx: &mut EngineCtx<'_>) {
        for kind in EventKind::ORDER {
            for entry in self.entries.iter().filter(|e| e.kind == kind) {
                tracing::debug!(capability = %entry.capability, kind = %kind, "running hook");
                (entry.hook)(ctx, &entry.params);
            }
        }
    }
}
