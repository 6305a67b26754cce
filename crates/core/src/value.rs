use serde::ser::{Serialize, SerializeMap, Serializer};

/// Result of an accessor for one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Text(String),
    Entries(Entries),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_entries(&self) -> Option<&Entries> {
        match self {
            Value::Entries(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<Entries> for Value {
    fn from(value: Entries) -> Self {
        Value::Entries(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Entries(entries) => entries.serialize(serializer),
        }
    }
}

/// Ordered key/value pairs. Keys keep the order the document reported them in
/// and are not deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entries(Vec<(String, String)>);

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, String)> {
        self.0
    }
}

impl From<Vec<(String, String)>> for Entries {
    fn from(value: Vec<(String, String)>) -> Self {
        Self(value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Entries {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl Serialize for Entries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn entries_keep_declaration_order() {
        let entries: Entries = [("id", "id-1"), ("class", "a"), ("data-id", "x")].into_iter().collect();
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["id", "class", "data-id"]);
        assert_eq!(entries.get("class"), Some("a"));
        assert_eq!(entries.get("missing"), None);
    }

    #[rstest]
    fn entries_serialize_as_ordered_object() {
        let entries: Entries = [("z", "1"), ("a", "2")].into_iter().collect();
        let json = serde_json::to_string(&Value::from(entries)).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }

    #[rstest]
    #[case(Value::Bool(true), "true")]
    #[case(Value::from("text-A"), "\"text-A\"")]
    fn scalar_values_serialize_plainly(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&value).unwrap(), expected);
    }
}
