use crate::objects::Object;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Dictionary with deterministic key order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: BTreeMap<String, Object>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter()
    }

    /// Copy every entry of `other` into this dictionary, overwriting clashes
    pub fn merge(&mut self, other: &Dictionary) {
        for (key, value) in other.entries() {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(|obj| obj.as_dict())
    }

    /// Nested dictionary under `key`, created empty when missing or of another type
    pub fn dict_entry(&mut self, key: &str) -> &mut Dictionary {
        let slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Object::Dictionary(Dictionary::new()));
        if !matches!(slot, Object::Dictionary(_)) {
            *slot = Object::Dictionary(Dictionary::new());
        }
        match slot {
            Object::Dictionary(dict) => dict,
            _ => unreachable!("slot was just replaced with a dictionary"),
        }
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

impl Serialize for Dictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dictionary() {
        let dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut dict = Dictionary::new();
        dict.set("T", "first_name");
        dict.set("Ff", 2);
        dict.set("NeedAppearances", true);

        assert_eq!(dict.get("T"), Some(&Object::String("first_name".to_string())));
        assert_eq!(dict.get("Ff"), Some(&Object::Integer(2)));
        assert_eq!(dict.get("NeedAppearances"), Some(&Object::Boolean(true)));
        assert_eq!(dict.get("Missing"), None);
    }

    #[test]
    fn test_remove() {
        let mut dict = Dictionary::new();
        dict.set("V", "x");

        assert!(dict.contains_key("V"));
        assert_eq!(dict.remove("V"), Some(Object::String("x".to_string())));
        assert!(!dict.contains_key("V"));
        assert_eq!(dict.remove("V"), None);
    }

    #[test]
    fn test_keys_are_ordered() {
        let mut dict = Dictionary::new();
        dict.set("Subtype", "Widget");
        dict.set("FT", "Tx");
        dict.set("Rect", 0);

        let keys: Vec<_> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["FT", "Rect", "Subtype"]);
    }

    #[test]
    fn test_merge_overwrites() {
        let mut base = Dictionary::new();
        base.set("F", 4);
        base.set("T", "a");
        let mut extra = Dictionary::new();
        extra.set("F", 2);
        base.merge(&extra);
        assert_eq!(base.get("F"), Some(&Object::Integer(2)));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_dict_entry_creates_nested() {
        let mut dict = Dictionary::new();
        dict.dict_entry("AA").set("K", "keystroke");
        dict.dict_entry("AA").set("F", "format");
        let aa = dict.get_dict("AA").unwrap();
        assert_eq!(aa.len(), 2);
    }

    #[test]
    fn test_dict_entry_replaces_non_dictionary() {
        let mut dict = Dictionary::new();
        dict.set("MK", 1);
        dict.dict_entry("MK").set("BC", 0);
        assert!(dict.get_dict("MK").is_some());
    }
}
