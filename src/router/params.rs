use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// Position of a raw regex capture among all the tokens of its pattern.
    Index(usize),
    Name(String),
}

impl Display for ParamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "{}", idx),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Captured route parameters in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet(Vec<(ParamKey, String)>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the value of an existing key in place.
    pub fn insert(&mut self, key: ParamKey, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.0.iter_mut().find(|entry| entry.0 == key) {
            entry.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    pub fn remove(&mut self, key: &ParamKey) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    pub fn get(&self, key: &ParamKey) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_name(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| matches!(k, ParamKey::Name(n) if n == name))
            .map(|(_, v)| v.as_str())
    }

    pub fn get_index(&self, idx: usize) -> Option<&str> {
        self.get(&ParamKey::Index(idx))
    }

    pub(crate) fn take_name(&mut self, name: &str) -> Option<String> {
        let pos = self
            .0
            .iter()
            .position(|(k, _)| matches!(k, ParamKey::Name(n) if n == name))?;
        Some(self.0.remove(pos).1)
    }

    pub(crate) fn take_next(&mut self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.remove(0).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(ParamKey::Name(k.into()), v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::{ParamKey, ParameterSet};

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = ParameterSet::new();
        params.insert(ParamKey::Index(0), "a");
        params.insert(ParamKey::Name("id".to_owned()), "b");
        params.insert(ParamKey::Index(0), "c");

        let got: Vec<_> = params.iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(got, vec![("0".to_owned(), "c"), ("id".to_owned(), "b")]);
    }

    #[test]
    fn test_take() {
        let mut params: ParameterSet = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();

        assert_eq!(params.take_name("b").as_deref(), Some("2"));
        assert_eq!(params.take_name("b"), None);
        assert_eq!(params.take_next().as_deref(), Some("1"));
        assert_eq!(params.take_next().as_deref(), Some("3"));
        assert_eq!(params.take_next(), None);
        assert!(params.is_empty());
    }

    #[test]
    fn test_get() {
        let mut params = ParameterSet::new();
        params.insert(ParamKey::Index(2), "x");
        params.insert(ParamKey::Name("id".to_owned()), "7");

        assert_eq!(params.get_index(2), Some("x"));
        assert_eq!(params.get_index(0), None);
        assert_eq!(params.get_name("id"), Some("7"));
        assert_eq!(params.remove(&ParamKey::Index(2)).as_deref(), Some("x"));
        assert_eq!(params.len(), 1);
    }
}
