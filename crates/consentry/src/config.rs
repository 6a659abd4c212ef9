// config.rs — EngineConfig: the engine's construction-time options.
//
// An explicit struct with named per-field defaults; callers override
// fields with struct-update syntax over `EngineConfig::default()`. Merge
// semantics are exactly "field replaces default" — nothing deeper.

use std::fmt;
use std::sync::Arc;

use crate::capability::Capability;
use crate::engine::EngineCtx;
use crate::kv::Scope;
use crate::store::PersistedRecord;

/// An end-of-pass lifecycle hook (`on_accept_end` / `on_reject_end`).
pub type LifecycleHook = Arc<dyn Fn(&mut EngineCtx<'_>) + Send + Sync>;

/// Construction-time configuration for [`ConsentEngine`](crate::ConsentEngine).
///
/// ```
/// use consentry::{Capability, EngineConfig};
///
/// let config = EngineConfig {
///     name: "consent".to_string(),
///     capabilities: vec![Capability::new("functional").no_opt_out(true)],
///     ..EngineConfig::default()
/// };
/// ```
#[derive(Clone)]
pub struct EngineConfig {
    /// Gate the per-capability dispatch diagnostics and pass timing logs.
    pub debug: bool,
    /// Name of the stored consent entry.
    pub name: String,
    /// Scope the consent entry is stored under.
    pub scope: Scope,
    /// Treat the notice as a permanently visible link: the engine skips
    /// notice show/hide transitions entirely.
    pub link_only: bool,
    /// Runs after the reject pass, before the visibility transition.
    /// Default: a debug-level log. Hosts needing teardown (the browser
    /// original reloaded the page) override this.
    pub on_reject_end: LifecycleHook,
    /// Runs after the accept pass. Default: persist the live form choices.
    pub on_accept_end: LifecycleHook,
    /// The capability descriptors. Default: a single always-on
    /// `functional` capability whose accept hook persists
    /// `{consented: true}` and whose reject hook clears the record.
    pub capabilities: Vec<Capability>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debug: false,
            name: "consent".to_string(),
            scope: Scope::default(),
            link_only: false,
            on_reject_end: Arc::new(|_ctx: &mut EngineCtx<'_>| {
                tracing::debug!("reject pass complete");
            }),
            on_accept_end: Arc::new(|ctx: &mut EngineCtx<'_>| {
                let choices = ctx.choices();
                if let Err(error) = ctx.save(PersistedRecord::with_choices(choices)) {
                    tracing::warn!(%error, "failed to persist accepted choices");
                }
            }),
            capabilities: vec![default_functional_capability()],
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("debug", &self.debug)
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("link_only", &self.link_only)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// The default always-on capability: accepting marks the record consented,
/// rejecting deletes it.
pub fn default_functional_capability() -> Capability {
    Capability::new("functional")
        .default_checked(true)
        .no_opt_out(true)
        .on_accept(|ctx: &mut EngineCtx<'_>, _params| {
            if let Err(error) = ctx.save(PersistedRecord::with_consented(true)) {
                tracing::warn!(%error, "failed to persist consented flag");
            }
        })
        .on_reject(|ctx: &mut EngineCtx<'_>, _params| {
            if let Err(error) = ctx.clear() {
                tracing::warn!(%error, "failed to clear consent record");
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::EventKind;

    #[test]
    fn default_config_supplies_functional_capability() {
        let config = EngineConfig::default();

        assert_eq!(config.name, "consent");
        assert!(!config.debug);
        assert!(!config.link_only);
        assert_eq!(config.capabilities.len(), 1);

        let functional = &config.capabilities[0];
        assert_eq!(functional.name, "functional");
        assert!(functional.no_opt_out);
        assert!(functional.hook(EventKind::Accept).is_some());
        assert!(functional.hook(EventKind::Reject).is_some());
    }

    #[test]
    fn struct_update_overrides_field_by_field() {
        let config = EngineConfig {
            debug: true,
            name: "site-consent".to_string(),
            ..EngineConfig::default()
        };

        assert!(config.debug);
        assert_eq!(config.name, "site-consent");
        // Untouched fields keep their defaults.
        assert_eq!(config.capabilities.len(), 1);
        assert_eq!(config.scope, Scope::default());
    }
}
