// demo.rs — The demo capability set and engine wiring.
//
// Three capabilities, mirroring a typical site integration:
//   functional — the default always-on capability (accept persists the
//                consented flag, reject clears the record)
//   analytics  — simulates a tracker: maintains a `_visits` entry in the
//                kv store through the EngineCtx escape hatch
//   marketing  — print-only hooks

use std::path::Path;

use chrono::Utc;

use consentry::{
    default_functional_capability, Capability, ConsentEngine, EngineConfig, EngineCtx, HookParams,
    JsonFileKv, MemoryForm,
};

use crate::surface::TerminalSurface;

/// Name of the stored consent entry.
pub const CONSENT_NAME: &str = "consent";
/// The simulated third-party tracker entry the analytics hooks manage.
pub const VISITS_NAME: &str = "_visits";

fn analytics() -> Capability {
    Capability::new("analytics")
        .on_accept(|ctx: &mut EngineCtx<'_>, _params: &HookParams| {
            println!("[analytics] tracker enabled");
            let scope = ctx.scope().clone();
            let stamp = serde_json::json!({ "last_visit": Utc::now().to_rfc3339() });
            if let Err(error) = ctx.kv().set(VISITS_NAME, stamp, &scope) {
                tracing::warn!(%error, "failed to record visit entry");
            }
        })
        .on_reject(|ctx: &mut EngineCtx<'_>, _params: &HookParams| {
            println!("[analytics] tracker disabled");
            let scope = ctx.scope().clone();
            if let Err(error) = ctx.kv().remove(VISITS_NAME, &scope) {
                tracing::warn!(%error, "failed to remove visit entry");
            }
        })
        .on_value_change(|_ctx: &mut EngineCtx<'_>, params: &HookParams| {
            println!(
                "[analytics] consent changed to {}",
                if params.choice.unwrap_or(false) {
                    "granted"
                } else {
                    "withdrawn"
                }
            );
        })
}

fn marketing() -> Capability {
    Capability::new("marketing")
        .on_accept(|_ctx: &mut EngineCtx<'_>, _params: &HookParams| {
            println!("[marketing] personalization enabled");
        })
        .on_reject(|_ctx: &mut EngineCtx<'_>, _params: &HookParams| {
            println!("[marketing] personalization disabled");
        })
}

/// Build the demo engine for one visit. Returns the shared form handle so
/// commands can toggle inputs the way a visitor would.
pub fn build(state: &Path, debug: bool) -> (ConsentEngine, MemoryForm) {
    let form = MemoryForm::new(["functional", "analytics", "marketing"]);
    let config = EngineConfig {
        debug,
        name: CONSENT_NAME.to_string(),
        capabilities: vec![default_functional_capability(), analytics(), marketing()],
        ..EngineConfig::default()
    };
    let engine = ConsentEngine::new(
        config,
        Box::new(JsonFileKv::new(state)),
        Box::new(form.clone()),
        Box::new(TerminalSurface::new()),
    );
    (engine, form)
}
