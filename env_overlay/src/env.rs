//! Sources of environment values.
//!
//! The overlay reads variables through [`EnvSource`] so tests and embedders
//! can supply values without mutating the process environment.

use std::collections::HashMap;
use std::ffi::OsString;

/// Lookup of environment variables by exact key.
pub trait EnvSource {
    /// Return the raw value of `key`, or `None` when it is not set.
    fn get(&self, key: &str) -> Option<OsString>;
}

/// Reads from the current process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

/// In-memory environment.
///
/// # Examples
///
/// ```
/// use env_overlay::{EnvSource, MapEnv};
///
/// let env = MapEnv::from_iter([("APP_PORT", "8080")]);
/// assert_eq!(env.get("APP_PORT"), Some("8080".into()));
/// assert_eq!(env.get("APP_HOST"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: HashMap<String, OsString>,
}

impl MapEnv {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the updated environment.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<OsString>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn get(&self, key: &str) -> Option<OsString> {
        (**self).get(key)
    }
}
