// surface.rs — TerminalSurface: prints banner/notice transitions.
//
// The terminal counterpart of the original's DOM containers. Nothing to
// verify at mount time — stdout is always there.

use consentry::{ConsentError, Surface};

pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

impl Surface for TerminalSurface {
    fn mount(&mut self) -> Result<(), ConsentError> {
        Ok(())
    }

    fn show_banner(&mut self) {
        println!("┌─ consent banner ─────────────────────────────────────┐");
        println!("│ Choose which capabilities this site may use:         │");
        println!("│   accept [--grant NAME] [--deny NAME]  |  reject     │");
        println!("└──────────────────────────────────────────────────────┘");
    }

    fn hide_banner(&mut self) {
        println!("(banner closed)");
    }

    fn show_notice(&mut self) {
        println!("[notice] consent recorded — run `consentry reopen` to change it");
    }

    fn hide_notice(&mut self) {
        println!("(notice closed)");
    }
}
