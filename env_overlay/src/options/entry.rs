//! Read-only option metadata.

use std::collections::BTreeSet;

/// Snapshot of a single registered option.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptionEntry {
    name: String,
    default: String,
    explicitly_set: bool,
    dump_excluded: bool,
    env_disabled: bool,
}

impl OptionEntry {
    /// Describe an option called `name` whose registered default renders as
    /// `default`.
    ///
    /// # Examples
    ///
    /// ```
    /// use env_overlay::OptionEntry;
    ///
    /// let entry = OptionEntry::new("timeout", "30s").with_explicitly_set(true);
    /// assert_eq!(entry.name(), "timeout");
    /// assert!(entry.explicitly_set());
    /// assert!(!entry.dump_excluded());
    /// assert!(entry.accepts_env());
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            explicitly_set: false,
            dump_excluded: false,
            env_disabled: false,
        }
    }

    /// Mark whether the option was supplied on the command line.
    #[must_use]
    pub const fn with_explicitly_set(mut self, explicitly_set: bool) -> Self {
        self.explicitly_set = explicitly_set;
        self
    }

    /// Mark whether the option is left out of the defaults dump.
    #[must_use]
    pub const fn with_dump_excluded(mut self, dump_excluded: bool) -> Self {
        self.dump_excluded = dump_excluded;
        self
    }

    /// Mark whether environment values must be ignored for the option.
    ///
    /// Used for meta flags and for options whose presence would clash with
    /// what the command line already holds.
    #[must_use]
    pub const fn with_env_disabled(mut self, env_disabled: bool) -> Self {
        self.env_disabled = env_disabled;
        self
    }

    /// Option name as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered default, serialised.
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Whether the value came from the command line.
    #[must_use]
    pub const fn explicitly_set(&self) -> bool {
        self.explicitly_set
    }

    /// Whether the defaults dump skips this option.
    #[must_use]
    pub const fn dump_excluded(&self) -> bool {
        self.dump_excluded
    }

    /// Whether an environment value may be written into the option.
    #[must_use]
    pub const fn accepts_env(&self) -> bool {
        !self.env_disabled
    }
}

/// Option names left out of the defaults dump.
///
/// Exclusions are recorded when options are registered, so the dump never
/// has to guess from option names.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DumpExclusions(BTreeSet<String>);

impl DumpExclusions {
    /// Create an empty exclusion set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Exclude the option called `name`.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    /// Whether `name` is excluded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Iterate over excluded names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for DumpExclusions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
