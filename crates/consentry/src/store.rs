// store.rs — PersistedRecord and the ChoiceStore over the kv collaborator.
//
// The whole consent decision lives in one named entry. The record is
// partial: either field may be absent, and saves merge field-wise over
// whatever is already stored — a `Some` field replaces wholesale, a `None`
// field leaves the stored value untouched. The record is never wholesale
// overwritten.

use serde::{Deserialize, Serialize};

use crate::choice::ChoiceVector;
use crate::error::ConsentError;
use crate::kv::{KvStore, Scope};

/// The stored consent record.
///
/// `choices`, once present, is authoritative on the next load; its absence
/// means "first visit" and the engine falls back to descriptor defaults.
/// `consented` drives initial banner-vs-notice visibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<ChoiceVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consented: Option<bool>,
}

impl PersistedRecord {
    /// A patch that replaces the stored choice vector.
    pub fn with_choices(choices: ChoiceVector) -> Self {
        Self {
            choices: Some(choices),
            consented: None,
        }
    }

    /// A patch that sets the consented flag.
    pub fn with_consented(consented: bool) -> Self {
        Self {
            choices: None,
            consented: Some(consented),
        }
    }

    /// Merge a patch over this record, field-wise.
    fn merge(&mut self, patch: PersistedRecord) {
        if patch.choices.is_some() {
            self.choices = patch.choices;
        }
        if patch.consented.is_some() {
            self.consented = patch.consented;
        }
    }
}

/// Reads and writes the single consent record through a [`KvStore`].
///
/// Holds the entry name and scope; the backend is passed per call so the
/// engine can hand hooks mutable kv access without aliasing the store.
#[derive(Debug, Clone)]
pub struct ChoiceStore {
    name: String,
    scope: Scope,
}

impl ChoiceStore {
    pub fn new(name: impl Into<String>, scope: Scope) -> Self {
        Self {
            name: name.into(),
            scope,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Load the stored record. Fails soft: an absent or malformed entry,
    /// or a failing backend read, all yield `None`.
    pub fn load(&self, kv: &dyn KvStore) -> Option<PersistedRecord> {
        let value = match kv.get(&self.name) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(error) => {
                tracing::debug!(name = %self.name, %error, "consent record unreadable; treating as absent");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::debug!(name = %self.name, %error, "consent record malformed; treating as absent");
                None
            }
        }
    }

    /// Merge a patch over the stored record and persist the result.
    pub fn save(&self, kv: &mut dyn KvStore, patch: PersistedRecord) -> Result<(), ConsentError> {
        let mut record = self.load(kv).unwrap_or_default();
        record.merge(patch);
        let value = serde_json::to_value(&record)?;
        kv.set(&self.name, value, &self.scope)
    }

    /// Delete the stored record. A no-op if already absent.
    pub fn clear(&self, kv: &mut dyn KvStore) -> Result<(), ConsentError> {
        kv.remove(&self.name, &self.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;
    use serde_json::json;

    fn store() -> ChoiceStore {
        ChoiceStore::new("consent", Scope::default())
    }

    #[test]
    fn load_absent_is_none() {
        let kv = MemoryKv::new();
        assert_eq!(store().load(&kv), None);
    }

    #[test]
    fn load_malformed_is_none() {
        let mut kv = MemoryKv::new();
        kv.set("consent", json!("not a record"), &Scope::default())
            .unwrap();
        assert_eq!(store().load(&kv), None);
    }

    #[test]
    fn save_merges_field_wise() {
        let mut kv = MemoryKv::new();
        let store = store();

        store
            .save(&mut kv, PersistedRecord::with_consented(true))
            .unwrap();
        let choices: ChoiceVector = [("ads".to_string(), true)].into_iter().collect();
        store
            .save(&mut kv, PersistedRecord::with_choices(choices.clone()))
            .unwrap();

        let record = store.load(&kv).unwrap();
        assert_eq!(record.consented, Some(true));
        assert_eq!(record.choices, Some(choices));
    }

    #[test]
    fn save_replaces_choices_wholesale() {
        let mut kv = MemoryKv::new();
        let store = store();

        let first: ChoiceVector = [("a".to_string(), true), ("b".to_string(), true)]
            .into_iter()
            .collect();
        let second: ChoiceVector = [("a".to_string(), false)].into_iter().collect();

        store
            .save(&mut kv, PersistedRecord::with_choices(first))
            .unwrap();
        store
            .save(&mut kv, PersistedRecord::with_choices(second.clone()))
            .unwrap();

        assert_eq!(store.load(&kv).unwrap().choices, Some(second));
    }

    #[test]
    fn clear_then_load_is_none() {
        let mut kv = MemoryKv::new();
        let store = store();

        store
            .save(&mut kv, PersistedRecord::with_consented(true))
            .unwrap();
        store.clear(&mut kv).unwrap();
        assert_eq!(store.load(&kv), None);
        // Clearing again is a no-op.
        store.clear(&mut kv).unwrap();
    }

    #[test]
    fn absent_fields_stay_off_the_wire() {
        let record = PersistedRecord::with_consented(true);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"consented":true}"#);
    }
}
