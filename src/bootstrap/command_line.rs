//! Launch command line assembled for the engine's browser process.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::settings::CommandLineArgs;

/// Switches whose override values are appended to the existing value with a
/// comma rather than replacing it.
pub const MERGED_SWITCHES: [&str; 2] = ["enable-features", "disable-features"];

/// One `--name[=value]` switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl Switch {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Formats as `--name` or `--name=value`.
    pub fn to_arg(&self) -> String {
        if self.value.is_empty() {
            format!("--{}", self.name)
        } else {
            format!("--{}={}", self.name, self.value)
        }
    }
}

/// Ordered list of switches and positional arguments.
///
/// ```rust
/// use ki_cef_settings::bootstrap::LaunchCommandLine;
///
/// let mut cl = LaunchCommandLine::from_args(["app", "--lang=en", "index.html"]);
/// cl.append_switch("lang", "de");
/// cl.append_switch("disable-gpu", "");
/// assert_eq!(cl.to_args(), vec!["app", "--lang=de", "--disable-gpu", "index.html"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchCommandLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    program: Option<String>,
    #[serde(default)]
    switches: Vec<Switch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    positional: Vec<String>,
}

impl LaunchCommandLine {
    /// Empty command line with no program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `argv`. The first element is the program; `--` ends switch parsing.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let mut cl = Self {
            program: args.next(),
            ..Default::default()
        };

        let mut switches_done = false;
        for arg in args {
            if switches_done {
                cl.positional.push(arg);
                continue;
            }
            if arg == "--" {
                switches_done = true;
                continue;
            }
            match arg.strip_prefix("--") {
                Some(body) => {
                    let (name, value) = body.split_once('=').unwrap_or((body, ""));
                    cl.append_switch(name, value);
                }
                None => cl.positional.push(arg),
            }
        }

        cl
    }

    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    pub fn has_switch(&self, name: &str) -> bool {
        self.switches.iter().any(|s| s.name == name)
    }

    pub fn switch_value(&self, name: &str) -> Option<&str> {
        self.switches
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value.as_str())
    }

    /// Sets a switch, keeping its position if it already exists.
    ///
    /// An empty name would render as a bare `--` and end switch parsing, so
    /// it is dropped.
    pub fn append_switch(&mut self, name: &str, value: &str) {
        if name.is_empty() {
            warn!(value, "Ignoring switch with an empty name");
            return;
        }
        match self.switches.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.switches.push(Switch::new(name, value)),
        }
    }

    pub fn remove_switch(&mut self, name: &str) -> Option<String> {
        let index = self.switches.iter().position(|s| s.name == name)?;
        Some(self.switches.remove(index).value)
    }

    /// Applies one override. Feature lists are merged, everything else replaced.
    pub fn apply_override(&mut self, name: &str, value: &str) {
        if MERGED_SWITCHES.contains(&name) && !value.is_empty() {
            if let Some(existing) = self.switch_value(name).filter(|v| !v.is_empty()) {
                let merged = format!("{},{}", existing, value);
                self.append_switch(name, &merged);
                return;
            }
        }
        self.append_switch(name, value);
    }

    /// Applies every override in `args`.
    pub fn apply_overrides(&mut self, args: &CommandLineArgs) {
        for (name, value) in args.iter() {
            self.apply_override(name, value);
        }
    }

    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Program, then switches, then positional arguments.
    pub fn to_args(&self) -> Vec<String> {
        self.program
            .iter()
            .cloned()
            .chain(self.switches.iter().map(Switch::to_arg))
            .chain(self.positional.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switches_and_positional() {
        let cl = LaunchCommandLine::from_args([
            "browser",
            "--lang=en",
            "--disable-gpu",
            "page.html",
            "--",
            "--not-a-switch",
        ]);

        assert_eq!(cl.program(), Some("browser"));
        assert_eq!(cl.switch_value("lang"), Some("en"));
        assert_eq!(cl.switch_value("disable-gpu"), Some(""));
        assert_eq!(cl.positional(), ["page.html", "--not-a-switch"]);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let cl = LaunchCommandLine::from_args(["b", "--js-flags=--expose-gc=1"]);
        assert_eq!(cl.switch_value("js-flags"), Some("--expose-gc=1"));
    }

    #[test]
    fn test_override_replaces_value() {
        let mut cl = LaunchCommandLine::from_args(["b", "--lang=en"]);
        cl.apply_override("lang", "fr");
        assert_eq!(cl.switch_value("lang"), Some("fr"));
        assert_eq!(cl.switches().len(), 1);
    }

    #[test]
    fn test_feature_switches_are_merged() {
        let mut cl = LaunchCommandLine::from_args(["b", "--disable-features=A"]);
        cl.apply_override("disable-features", "B");
        cl.apply_override("enable-features", "C");
        assert_eq!(cl.switch_value("disable-features"), Some("A,B"));
        assert_eq!(cl.switch_value("enable-features"), Some("C"));
    }

    #[test]
    fn test_remove_switch() {
        let mut cl = LaunchCommandLine::from_args(["b", "--mute-audio"]);
        assert_eq!(cl.remove_switch("mute-audio"), Some(String::new()));
        assert_eq!(cl.remove_switch("mute-audio"), None);
        assert_eq!(cl.to_args(), vec!["b"]);
    }

    #[test]
    fn test_empty_switch_name_dropped() {
        let cl = LaunchCommandLine::from_args(["b", "--=x", "--a"]);
        assert_eq!(cl.switches().len(), 1);
        assert_eq!(cl.switches()[0].name, "a");
        assert!(cl.positional().is_empty());
        assert_eq!(cl.to_args(), vec!["b", "--a"]);
    }

    #[test]
    fn test_empty_override_ignored() {
        let mut cl = LaunchCommandLine::from_args(["b", "page.html"]);
        cl.apply_override("", "");
        cl.apply_override("", "x");
        assert!(cl.switches().is_empty());
        assert_eq!(cl.to_args(), vec!["b", "page.html"]);
    }
}
