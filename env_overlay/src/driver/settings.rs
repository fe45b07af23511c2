//! Settings shared by every operation of an [`EnvOverlay`](super::EnvOverlay).

use crate::options::DumpExclusions;
use crate::prefix::Prefix;

/// Default long name of the version flag.
pub(super) const DEFAULT_VERSION_FLAG: &str = "version";
/// Default long name of the dump flag.
pub(super) const DEFAULT_DUMP_FLAG: &str = "dump-env";

/// Program identity, environment prefix and meta flag names.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OverlaySettings {
    pub(super) name: String,
    pub(super) version: String,
    pub(super) prefix: Prefix,
    pub(super) version_flag: String,
    pub(super) dump_flag: String,
    pub(super) exclusions: DumpExclusions,
}

impl OverlaySettings {
    pub(super) fn new(name: String, version: String) -> Self {
        let prefix = Prefix::derive(&name);
        Self {
            name,
            version,
            prefix,
            version_flag: DEFAULT_VERSION_FLAG.to_owned(),
            dump_flag: DEFAULT_DUMP_FLAG.to_owned(),
            exclusions: DumpExclusions::new(),
        }
    }

    /// Program name shown by the version shortcut.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program version shown by the version shortcut.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Prefix applied to every environment key.
    #[must_use]
    pub const fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Long name of the version flag.
    #[must_use]
    pub fn version_flag(&self) -> &str {
        &self.version_flag
    }

    /// Long name of the dump flag, which doubles as the dump trigger token.
    #[must_use]
    pub fn dump_flag(&self) -> &str {
        &self.dump_flag
    }

    /// Names of the version and dump flags, which never read the
    /// environment.
    #[must_use]
    pub fn meta_flags(&self) -> [&str; 2] {
        [self.version_flag.as_str(), self.dump_flag.as_str()]
    }

    /// Every option left out of the dump: caller exclusions plus both meta
    /// flags.
    #[must_use]
    pub fn dump_exclusions(&self) -> DumpExclusions {
        let mut exclusions = self.exclusions.clone();
        for flag in self.meta_flags() {
            exclusions.insert(flag);
        }
        exclusions
    }
}
