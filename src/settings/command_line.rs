//! Command-line switch overrides applied when the engine process is launched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Switch name to value mapping.
///
/// A switch with an empty value is a plain flag (`--disable-gpu`). Keys are
/// stored sorted so the assembled command line is deterministic.
///
/// ```rust
/// use ki_cef_settings::settings::CommandLineArgs;
///
/// let mut args = CommandLineArgs::new();
/// args.add_flag("disable-gpu");
/// args.insert("lang", "de");
/// assert_eq!(args.get("lang"), Some("de"));
/// assert_eq!(args.get("disable-gpu"), Some(""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandLineArgs {
    args: BTreeMap<String, String>,
}

impl CommandLineArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value-less switch, replacing any value it had.
    pub fn add_flag(&mut self, name: impl Into<String>) -> Option<String> {
        self.insert(name, String::new())
    }

    /// Sets a switch value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.args.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.args.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CommandLineArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            args: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for CommandLineArgs {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
