// reopen.rs — Reopen the banner from the notice.

use std::path::Path;

use crate::demo;

pub fn execute(state: &Path, debug: bool) -> anyhow::Result<()> {
    let (mut engine, _form) = demo::build(state, debug);
    engine.reopen();
    Ok(())
}
