use std::collections::HashMap;

/// Label used when the detector reports a class id with no entry in the label table.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Resolves detector class ids to class names.
///
/// The class names come from the label table shipped alongside the model, index-aligned with
/// the class ids the detector emits.
pub trait LabelLookup {
    fn label(&self, class_id: usize) -> Option<&str>;
}

impl LabelLookup for [String] {
    fn label(&self, class_id: usize) -> Option<&str> {
        self.get(class_id).map(String::as_str)
    }
}

impl LabelLookup for Vec<String> {
    fn label(&self, class_id: usize) -> Option<&str> {
        self.as_slice().label(class_id)
    }
}

impl LabelLookup for [&str] {
    fn label(&self, class_id: usize) -> Option<&str> {
        self.get(class_id).copied()
    }
}

/// Maps detector labels onto the names used by the pest store.
///
/// Detector class names are matched after lowercasing and trimming. Labels with no alias
/// resolve to themselves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelAliases {
    aliases: HashMap<String, String>,
}

impl LabelAliases {
    pub fn new<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        LabelAliases {
            aliases: aliases
                .into_iter()
                .map(|(label, name)| (normalize_label(label.as_ref()), name.into()))
                .collect(),
        }
    }

    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        self.aliases
            .get(&normalize_label(label))
            .map(String::as_str)
            .unwrap_or(label)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
