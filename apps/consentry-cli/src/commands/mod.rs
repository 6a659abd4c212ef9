// mod.rs — One module per subcommand.

pub mod accept;
pub mod clear;
pub mod reject;
pub mod reopen;
pub mod status;

use consentry::ConsentEngine;

/// Print the persisted record after an action.
pub fn print_record(engine: &ConsentEngine) -> anyhow::Result<()> {
    match engine.record() {
        Some(record) => println!("stored record: {}", serde_json::to_string(&record)?),
        None => println!("stored record: none"),
    }
    Ok(())
}
