// accept.rs — Toggle inputs, then run the accept pass.

use std::path::Path;

use consentry::FormBinding;

use crate::commands::print_record;
use crate::demo;

pub fn execute(state: &Path, debug: bool, grant: &[String], deny: &[String]) -> anyhow::Result<()> {
    let (mut engine, form) = demo::build(state, debug);

    // Simulate the visitor toggling checkboxes before hitting accept.
    for name in grant {
        if form.get_choice(name).is_none() {
            println!("no such capability input: {name}");
            continue;
        }
        form.set(name, true);
    }
    for name in deny {
        if form.get_choice(name).is_none() {
            println!("no such capability input: {name}");
            continue;
        }
        form.set(name, false);
    }

    engine.accept();
    print_record(&engine)
}
