/// Attribute keys already asked in a session, in the order they were asked.
///
/// Keys can be added but never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AskedSet {
    keys: Vec<String>,
}

impl AskedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the key was already present.
    pub fn insert(&mut self, attribute_key: &str) -> bool {
        if self.contains(attribute_key) {
            return false;
        }
        self.keys.push(attribute_key.to_string());
        true
    }

    pub fn contains(&self, attribute_key: &str) -> bool {
        self.keys.iter().any(|key| key == attribute_key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for AskedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut asked = AskedSet::new();
        for key in iter {
            asked.insert(key.as_ref());
        }
        asked
    }
}
