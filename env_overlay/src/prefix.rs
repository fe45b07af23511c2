//! Environment prefix and key derivation.

use std::fmt;

/// Prefix used when the program identifier is empty.
///
/// A bare underscore keeps derived keys out of the unprefixed namespace, so
/// an option called `path` maps to `_PATH` rather than clobbering `PATH`.
const EMPTY_PREFIX: &str = "_";

/// Uppercase, underscore-normalised namespace prepended to every derived
/// environment key.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Prefix(String);

impl Prefix {
    /// Derive a prefix from a program identifier.
    ///
    /// The identifier is uppercased, dashes become underscores, and a
    /// trailing `_` separator is appended. An empty identifier yields the
    /// sentinel prefix `_`.
    ///
    /// # Examples
    ///
    /// ```
    /// use env_overlay::Prefix;
    ///
    /// assert_eq!(Prefix::derive("my-app").as_str(), "MY_APP_");
    /// assert_eq!(Prefix::derive("").as_str(), "_");
    /// ```
    #[must_use]
    pub fn derive(identifier: &str) -> Self {
        if identifier.is_empty() {
            return Self(EMPTY_PREFIX.to_owned());
        }
        let mut prefix = to_env_name(identifier);
        prefix.push('_');
        Self(prefix)
    }

    /// Use `prefix` exactly as given.
    ///
    /// Callers that need a namespace unrelated to the program name (or one
    /// with a different separator) supply it here. No normalisation occurs.
    #[must_use]
    pub fn verbatim(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Environment key for the option called `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use env_overlay::Prefix;
    ///
    /// let prefix = Prefix::derive("svc");
    /// assert_eq!(prefix.env_key("log-level"), "SVC_LOG_LEVEL");
    /// ```
    #[must_use]
    pub fn env_key(&self, name: &str) -> String {
        let mut key = String::with_capacity(self.0.len() + name.len());
        key.push_str(&self.0);
        key.push_str(&to_env_name(name));
        key
    }

    /// Borrow the prefix text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn to_env_name(name: &str) -> String {
    name.replace('-', "_").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::Prefix;
    use rstest::rstest;

    #[rstest]
    #[case("myapp", "MYAPP_")]
    #[case("my-app", "MY_APP_")]
    #[case("Mixed-Case-Tool", "MIXED_CASE_TOOL_")]
    #[case("", "_")]
    fn derives_prefix(#[case] identifier: &str, #[case] expected: &str) {
        assert_eq!(Prefix::derive(identifier).as_str(), expected);
    }

    #[rstest]
    #[case("max-retries", "MYAPP_MAX_RETRIES")]
    #[case("timeout", "MYAPP_TIMEOUT")]
    #[case("a-b-c", "MYAPP_A_B_C")]
    fn derives_env_key(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(Prefix::derive("myapp").env_key(name), expected);
    }

    #[test]
    fn empty_identifier_keeps_keys_namespaced() {
        assert_eq!(Prefix::derive("").env_key("path"), "_PATH");
    }

    #[test]
    fn keys_are_prefix_sensitive() {
        let first = Prefix::derive("alpha").env_key("port");
        let second = Prefix::derive("beta").env_key("port");
        assert_ne!(first, second);
        assert_eq!(first, Prefix::derive("alpha").env_key("port"));
    }

    #[test]
    fn verbatim_prefix_is_not_normalised() {
        let prefix = Prefix::verbatim("app__");
        assert_eq!(prefix.env_key("log-level"), "app__LOG_LEVEL");
    }
}
