//! Schema reader configuration.

/// App-name prefix of framework-provided apps.
pub const FRAMEWORK_APP_PREFIX: &str = "contrib.";

/// App-name prefix of third-party packages.
pub const VENDOR_APP_PREFIX: &str = "third_party_package.";

/// Models whose lowercase name contains this marker are never excluded.
pub const ALWAYS_VISIBLE_MARKER: &str = "user";

/// Configuration for app and model filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Apps to include, matched against full name, short name or label.
    /// Empty means include every app.
    pub included_apps: Vec<String>,

    /// Models of apps whose full name starts with one of these prefixes are
    /// hidden unless their name contains [`ALWAYS_VISIBLE_MARKER`].
    pub excluded_prefixes: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            included_apps: Vec::new(),
            excluded_prefixes: vec![
                FRAMEWORK_APP_PREFIX.to_string(),
                VENDOR_APP_PREFIX.to_string(),
            ],
        }
    }
}

impl ReaderConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict reflection to the given apps.
    pub fn with_included_apps<I, S>(mut self, apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.included_apps = apps.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the excluded app-name prefixes.
    pub fn with_excluded_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Check if an app name matches the allow-list (or the list is empty).
    pub fn includes_any(&self, names: &[&str]) -> bool {
        self.included_apps.is_empty()
            || names
                .iter()
                .any(|name| self.included_apps.iter().any(|included| included == name))
    }

    /// Check if an app full name starts with an excluded prefix.
    pub fn is_excluded_app(&self, app_full_name: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| app_full_name.starts_with(prefix.as_str()))
    }
}
