// surface.rs — Surface: the banner/notice presentation collaborator.
//
// The engine only needs two containers it can toggle visibility on, and a
// mount check that the host's required controls exist. Markup, animation
// and reduced-motion handling all live behind this trait.

use std::sync::{Arc, Mutex};

use crate::error::ConsentError;

/// Trait over the consent presentation layer.
pub trait Surface {
    /// Verify the required containers and controls are present. An `Err`
    /// degrades the engine at construction.
    fn mount(&mut self) -> Result<(), ConsentError>;

    fn show_banner(&mut self);
    fn hide_banner(&mut self);
    fn show_notice(&mut self);
    fn hide_notice(&mut self);
}

/// Visibility snapshot of a [`LogSurface`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
    pub banner: bool,
    pub notice: bool,
}

/// Reference surface: tracks visibility and logs transitions.
///
/// Clones share state, so tests and hosts can keep a handle and observe
/// transitions after handing the engine its copy.
#[derive(Debug, Clone, Default)]
pub struct LogSurface {
    state: Arc<Mutex<Visibility>>,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> Visibility {
        *self.state.lock().unwrap()
    }
}

impl Surface for LogSurface {
    fn mount(&mut self) -> Result<(), ConsentError> {
        Ok(())
    }

    fn show_banner(&mut self) {
        self.state.lock().unwrap().banner = true;
        tracing::debug!("banner shown");
    }

    fn hide_banner(&mut self) {
        self.state.lock().unwrap().banner = false;
        tracing::debug!("banner hidden");
    }

    fn show_notice(&mut self) {
        self.state.lock().unwrap().notice = true;
        tracing::debug!("notice shown");
    }

    fn hide_notice(&mut self) {
        self.state.lock().unwrap().notice = false;
        tracing::debug!("notice hidden");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_visible_through_shared_handle() {
        let surface = LogSurface::new();
        let mut engine_copy = surface.clone();

        engine_copy.show_banner();
        assert_eq!(
            surface.visibility(),
            Visibility {
                banner: true,
                notice: false
            }
        );

        engine_copy.hide_banner();
        engine_copy.show_notice();
        assert_eq!(
            surface.visibility(),
            Visibility {
                banner: false,
                notice: true
            }
        );
    }
}
