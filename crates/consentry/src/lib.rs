//! # consentry
//!
//! A headless consent engine: declare named capabilities (functional,
//! analytics, marketing, …) a visitor can individually accept or reject,
//! persist the decision, and notify each capability's hooks when its state
//! becomes accepted, rejected, or changed across visits.
//!
//! The engine is presentation-agnostic: the banner/notice surface, the
//! choice form, and the key-value storage are all trait collaborators, so
//! the core ordering and change-detection logic is testable without any
//! UI. Reference implementations ([`MemoryForm`], [`LogSurface`],
//! [`MemoryKv`], [`JsonFileKv`]) ship with the crate.
//!
//! ## Key components
//!
//! - [`Capability`] / [`CapabilityRegistry`] — the descriptor list with
//!   per-event-kind hook slots
//! - [`ChoiceStore`] / [`PersistedRecord`] — the single stored consent
//!   record, merged field-wise on save
//! - [`FormBinding`] — the live choice inputs
//! - [`EventQueue`] / [`EventKind`] — the per-pass runner draining hooks
//!   in fixed kind order (Update, ValueChange, Accept, Reject)
//! - [`ConsentEngine`] — the orchestrator tying it all together

pub mod capability;
pub mod choice;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod kv;
pub mod queue;
pub mod store;
pub mod surface;

pub use capability::{Capability, CapabilityRegistry, Hook, HookParams};
pub use choice::{Choice, ChoiceVector};
pub use config::{default_functional_capability, EngineConfig, LifecycleHook};
pub use engine::{ConsentEngine, EngineCtx, EngineState};
pub use error::ConsentError;
pub use form::{FormBinding, MemoryForm};
pub use kv::{JsonFileKv, KvStore, MemoryKv, Scope};
pub use queue::{EventKind, EventQueue};
pub use store::{ChoiceStore, PersistedRecord};
pub use surface::{LogSurface, Surface, Visibility};
