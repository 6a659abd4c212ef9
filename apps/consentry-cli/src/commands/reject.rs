// reject.rs — Run the reject pass.

use std::path::Path;

use crate::commands::print_record;
use crate::demo;

pub fn execute(state: &Path, debug: bool) -> anyhow::Result<()> {
    let (mut engine, _form) = demo::build(state, debug);
    engine.reject();
    print_record(&engine)
}
