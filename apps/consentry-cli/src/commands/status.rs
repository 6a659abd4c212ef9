// status.rs — Show the persisted record, engine state, and live choices.

use std::path::Path;

use consentry::EngineState;

use crate::demo;

pub fn execute(state: &Path, debug: bool) -> anyhow::Result<()> {
    let (engine, _form) = demo::build(state, debug);

    println!();
    match engine.state() {
        EngineState::Ready => println!("engine: ready"),
        EngineState::Degraded { reason } => println!("engine: degraded ({reason})"),
    }

    match engine.record() {
        Some(record) => println!("record: {}", serde_json::to_string_pretty(&record)?),
        None => println!("record: none (first visit)"),
    }

    println!("live choices:");
    for choice in &engine.choices() {
        println!(
            "  {:<12} {}",
            choice.name,
            if choice.value { "accepted" } else { "rejected" }
        );
    }
    Ok(())
}
