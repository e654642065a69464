//! Parameter keys, values, and the settings map
//!
//! A sysctl parameter is a dotted key (e.g. `vm.swappiness`) paired with a
//! value that is either a single integer, a bare word (symbolic values such
//! as huge-page modes or qdisc names), or a whitespace-separated tuple of
//! integers (multi-field tunables like `tcp_rmem` or `kernel.sem`). The
//! value type is fixed per key and must round-trip to text losslessly.
//!
//! [`SettingsMap`] holds entries ordered by key in lexicographic byte order,
//! with each key present at most once. Rule sets produce partial maps
//! (override layers) that the resolution engine merges into the baseline.

use std::collections::BTreeMap;
use std::fmt;

/// A single sysctl parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Single integer value
    Int(i64),

    /// Symbolic value rendered as a bare word (e.g. `fq`, `madvise`)
    Word(String),

    /// Multi-field value rendered as space-separated integers
    Tuple(Vec<i64>),
}

impl ParamValue {
    /// Create a word value
    pub fn word(s: impl Into<String>) -> Self {
        Self::Word(s.into())
    }

    /// Create a tuple value
    pub fn tuple(values: impl Into<Vec<i64>>) -> Self {
        Self::Tuple(values.into())
    }

    /// Get as integer, if applicable
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as word, if applicable
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(s) => Some(s),
            _ => None,
        }
    }

    /// Get as tuple, if applicable
    pub fn as_tuple(&self) -> Option<&[i64]> {
        match self {
            Self::Tuple(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Word(s) => write!(f, "{}", s),
            Self::Tuple(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", rendered.join(" "))
            }
        }
    }
}

/// Ordered mapping from parameter key to value
///
/// Keys iterate in lexicographic byte order and are unique by construction,
/// which gives the final artifact its sorted, duplicate-free shape for free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsMap {
    entries: BTreeMap<String, ParamValue>,
}

/// A partial settings map produced by a rule set and layered onto a baseline
///
/// An override fully replaces the prior value for its key; there is no
/// field-level merge within a value.
pub type OverrideMap = SettingsMap;

impl SettingsMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value, replacing any existing entry for the key
    pub fn set(&mut self, key: &str, value: ParamValue) {
        self.entries.insert(key.to_string(), value);
    }

    /// Set an integer parameter
    pub fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, ParamValue::Int(value));
    }

    /// Set a word parameter
    pub fn set_word(&mut self, key: &str, value: &str) {
        self.set(key, ParamValue::word(value));
    }

    /// Set a tuple parameter
    pub fn set_tuple(&mut self, key: &str, values: &[i64]) {
        self.set(key, ParamValue::tuple(values));
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Whether the map contains a key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Apply an override layer: replace existing entries, insert new ones
    pub fn apply(&mut self, overrides: OverrideMap) {
        for (key, value) in overrides.entries {
            self.entries.insert(key, value);
        }
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for SettingsMap {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
