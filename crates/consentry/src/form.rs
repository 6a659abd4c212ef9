// form.rs — FormBinding: the presentation-layer choice inputs.
//
// The engine treats the form as the sole source of "current user intent"
// and the sole sink for replaying persisted intent. On a web page this is
// a set of checkboxes; the reference implementation is an in-memory field
// list shared between the engine and the host.

use std::sync::{Arc, Mutex};

use crate::choice::ChoiceVector;

/// Trait over the boolean inputs of the consent form.
pub trait FormBinding {
    /// Read every bound input's checked state, in the binding's document
    /// order (not registry order).
    fn get_choices(&self) -> ChoiceVector;

    /// Write choices into matching inputs. Inputs with no matching entry
    /// are left untouched; entries with no bound input are ignored.
    fn set_choices(&mut self, choices: &ChoiceVector);

    /// Single-input read. `None` for names with no bound input.
    fn get_choice(&self, name: &str) -> Option<bool>;
}

/// In-memory form: an ordered list of named boolean fields.
///
/// Clones share state, the way the engine and the host script share one
/// DOM — hand the engine a clone and keep one to toggle fields with
/// [`MemoryForm::set`] between actions.
#[derive(Debug, Clone)]
pub struct MemoryForm {
    fields: Arc<Mutex<Vec<(String, bool)>>>,
}

impl MemoryForm {
    /// Create a form with the given fields, all initially unchecked.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: Arc::new(Mutex::new(
                names.into_iter().map(|n| (n.into(), false)).collect(),
            )),
        }
    }

    /// Toggle one field, as a user clicking a checkbox would. A no-op for
    /// unbound names.
    pub fn set(&self, name: &str, checked: bool) {
        let mut fields = self.fields.lock().unwrap();
        if let Some(field) = fields.iter_mut().find(|(n, _)| n == name) {
            field.1 = checked;
        }
    }
}

impl FormBinding for MemoryForm {
    fn get_choices(&self) -> ChoiceVector {
        self.fields
            .lock()
            .unwrap()
            .iter()
            .map(|(name, checked)| (name.clone(), *checked))
            .collect()
    }

    fn set_choices(&mut self, choices: &ChoiceVector) {
        let mut fields = self.fields.lock().unwrap();
        for (name, checked) in fields.iter_mut() {
            if let Some(value) = choices.get(name) {
                *checked = value;
            }
        }
    }

    fn get_choice(&self, name: &str) -> Option<bool> {
        self.fields
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, checked)| *checked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_restricted_to_bound_names() {
        let mut form = MemoryForm::new(["functional", "ads"]);

        let incoming: ChoiceVector = [
            ("functional".to_string(), true),
            ("ads".to_string(), true),
            ("unknown".to_string(), true),
        ]
        .into_iter()
        .collect();

        form.set_choices(&incoming);
        let read_back = form.get_choices();

        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back.get("functional"), Some(true));
        assert_eq!(read_back.get("ads"), Some(true));
        assert_eq!(read_back.get("unknown"), None);
    }

    #[test]
    fn unmatched_inputs_left_untouched() {
        let mut form = MemoryForm::new(["functional", "ads"]);
        form.set("ads", true);

        let partial: ChoiceVector = [("functional".to_string(), true)].into_iter().collect();
        form.set_choices(&partial);

        assert_eq!(form.get_choice("ads"), Some(true));
        assert_eq!(form.get_choice("functional"), Some(true));
    }

    #[test]
    fn get_choice_unbound_is_none() {
        let form = MemoryForm::new(["functional"]);
        assert_eq!(form.get_choice("marketing"), None);
    }

    #[test]
    fn clones_share_state() {
        let form = MemoryForm::new(["ads"]);
        let handle = form.clone();
        handle.set("ads", true);
        assert_eq!(form.get_choice("ads"), Some(true));
    }
}
