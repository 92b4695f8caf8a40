//! Custom URL scheme descriptors and the ordered registration list.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Registration flags for a custom scheme.
///
/// Each flag maps onto one bit of `cef_scheme_options_t`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeOptions {
    /// Treat the scheme like `http`: `scheme://host[:port]/path` with origin semantics.
    #[serde(default)]
    pub standard: bool,
    /// Same security rules as `file` URLs.
    #[serde(default)]
    pub local: bool,
    /// Only pages from the same scheme may display or link to it.
    #[serde(default)]
    pub display_isolated: bool,
    /// Same security rules as `https` URLs.
    #[serde(default)]
    pub secure: bool,
    /// Allow CORS requests.
    #[serde(default)]
    pub cors_enabled: bool,
    /// Bypass Content-Security-Policy checks.
    #[serde(default)]
    pub csp_bypassing: bool,
    /// Allow Fetch API requests.
    #[serde(default)]
    pub fetch_enabled: bool,
}

impl SchemeOptions {
    pub const STANDARD: i32 = 1 << 0;
    pub const LOCAL: i32 = 1 << 1;
    pub const DISPLAY_ISOLATED: i32 = 1 << 2;
    pub const SECURE: i32 = 1 << 3;
    pub const CORS_ENABLED: i32 = 1 << 4;
    pub const CSP_BYPASSING: i32 = 1 << 5;
    pub const FETCH_ENABLED: i32 = 1 << 6;

    /// Options with every flag cleared.
    pub fn none() -> Self {
        Self::default()
    }

    /// Packs the flags into a `cef_scheme_options_t` bitmask.
    pub fn bits(&self) -> i32 {
        [
            (self.standard, Self::STANDARD),
            (self.local, Self::LOCAL),
            (self.display_isolated, Self::DISPLAY_ISOLATED),
            (self.secure, Self::SECURE),
            (self.cors_enabled, Self::CORS_ENABLED),
            (self.csp_bypassing, Self::CSP_BYPASSING),
            (self.fetch_enabled, Self::FETCH_ENABLED),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(0, |acc, (_, bit)| acc | bit)
    }

    /// Unpacks a `cef_scheme_options_t` bitmask. Unknown bits are ignored.
    pub fn from_bits(bits: i32) -> Self {
        Self {
            standard: bits & Self::STANDARD != 0,
            local: bits & Self::LOCAL != 0,
            display_isolated: bits & Self::DISPLAY_ISOLATED != 0,
            secure: bits & Self::SECURE != 0,
            cors_enabled: bits & Self::CORS_ENABLED != 0,
            csp_bypassing: bits & Self::CSP_BYPASSING != 0,
            fetch_enabled: bits & Self::FETCH_ENABLED != 0,
        }
    }
}

/// A custom scheme to register with the engine at startup.
///
/// # Example
///
/// ```rust
/// use ki_cef_settings::settings::{CustomScheme, SchemeOptions};
///
/// let scheme = CustomScheme::new("app")
///     .with_domain("localhost")
///     .with_options(SchemeOptions { standard: true, secure: true, ..Default::default() });
/// assert_eq!(scheme.scheme_name, "app");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomScheme {
    /// Scheme name without the `://` suffix.
    pub scheme_name: String,

    /// Optional domain the scheme handler is restricted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    /// Registration flags.
    #[serde(default)]
    pub options: SchemeOptions,
}

impl CustomScheme {
    pub fn new(scheme_name: impl Into<String>) -> Self {
        Self {
            scheme_name: scheme_name.into(),
            domain_name: None,
            options: SchemeOptions::none(),
        }
    }

    pub fn with_domain(mut self, domain_name: impl Into<String>) -> Self {
        self.domain_name = Some(domain_name.into());
        self
    }

    pub fn with_options(mut self, options: SchemeOptions) -> Self {
        self.options = options;
        self
    }
}

/// Append-only, insertion-ordered list of scheme registrations.
///
/// Entries can only be added through [`SchemeRegistry::register`], which
/// lower-cases the scheme name. Readers get a slice.
#[derive(Debug, Clone, Default)]
pub struct SchemeRegistry {
    schemes: Vec<CustomScheme>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes the scheme name to lower case and appends the scheme.
    ///
    /// Duplicates are kept; the engine resolves conflicts when it consumes the list.
    pub fn register(&mut self, mut scheme: CustomScheme) -> &CustomScheme {
        scheme.scheme_name = scheme.scheme_name.to_lowercase();
        debug!(
            scheme = %scheme.scheme_name,
            options = scheme.options.bits(),
            "custom scheme registered"
        );
        self.schemes.push(scheme);
        &self.schemes[self.schemes.len() - 1]
    }

    pub fn as_slice(&self) -> &[CustomScheme] {
        &self.schemes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CustomScheme> {
        self.schemes.iter()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl<'a> IntoIterator for &'a SchemeRegistry {
    type Item = &'a CustomScheme;
    type IntoIter = std::slice::Iter<'a, CustomScheme>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_lowercases_name() {
        let mut registry = SchemeRegistry::new();
        let stored = registry.register(CustomScheme::new("MyScheme").with_domain("Example.COM"));

        assert_eq!(stored.scheme_name, "myscheme");
        // Only the scheme name is normalized.
        assert_eq!(stored.domain_name.as_deref(), Some("Example.COM"));
    }

    #[test]
    fn test_register_keeps_order_and_duplicates() {
        let mut registry = SchemeRegistry::new();
        for name in ["A", "b", "C", "a"] {
            registry.register(CustomScheme::new(name));
        }

        let names: Vec<&str> = registry.iter().map(|s| s.scheme_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_scheme_option_bits() {
        assert_eq!(SchemeOptions::none().bits(), 0);

        let options = SchemeOptions {
            standard: true,
            secure: true,
            fetch_enabled: true,
            ..Default::default()
        };
        assert_eq!(options.bits(), 0b100_1001);
        assert_eq!(SchemeOptions::from_bits(options.bits()), options);
    }
}
