// choice.rs — Choice and ChoiceVector: the per-capability checked state.

use serde::{Deserialize, Serialize};

/// The accept/reject state of one capability at a point in time, either
/// read live from the form or loaded from the persisted record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    /// Capability name this choice belongs to.
    pub name: String,
    /// Checked state: `true` is accepted.
    pub value: bool,
}

impl Choice {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// An ordered collection of choices, one per capability name.
///
/// Names are unique within a vector: `set` replaces an existing entry in
/// place rather than appending a duplicate. Serializes as a plain JSON
/// array of `{"name": …, "value": …}` objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ChoiceVector(Vec<Choice>);

impl ChoiceVector {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set a choice, preserving the position of an existing entry with the
    /// same name.
    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        let name = name.into();
        match self.0.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.value = value,
            None => self.0.push(Choice { name, value }),
        }
    }

    /// Look up a choice value by capability name.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.iter().find(|c| c.name == name).map(|c| c.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, bool)> for ChoiceVector {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        let mut vector = ChoiceVector::new();
        for (name, value) in iter {
            vector.set(name, value);
        }
        vector
    }
}

impl<'a> IntoIterator for &'a ChoiceVector {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut vector = ChoiceVector::new();
        vector.set("functional", true);
        vector.set("ads", false);
        vector.set("functional", false);

        assert_eq!(vector.len(), 2);
        assert_eq!(vector.get("functional"), Some(false));
        // The replaced entry kept its position.
        assert_eq!(vector.iter().next().unwrap().name, "functional");
    }

    #[test]
    fn get_unknown_name_is_none() {
        let vector: ChoiceVector = [("a".to_string(), true)].into_iter().collect();
        assert_eq!(vector.get("b"), None);
    }

    #[test]
    fn serializes_as_name_value_array() {
        let vector: ChoiceVector = [("functional".to_string(), true), ("ads".to_string(), false)]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"functional","value":true},{"name":"ads","value":false}]"#
        );

        let restored: ChoiceVector = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, vector);
    }
}
