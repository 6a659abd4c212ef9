// clear.rs — Delete the stored consent record outright.
//
// Maintenance escape hatch: talks to the store directly, no engine (and
// therefore no startup replay).

use std::path::Path;

use consentry::{ChoiceStore, JsonFileKv, Scope};

use crate::demo;

pub fn execute(state: &Path) -> anyhow::Result<()> {
    let mut kv = JsonFileKv::new(state);
    let store = ChoiceStore::new(demo::CONSENT_NAME, Scope::default());
    store.clear(&mut kv)?;
    println!("Stored consent record cleared.");
    Ok(())
}
