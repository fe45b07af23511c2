//! Helpers for safely mutating environment variables in tests.
//!
//! Every mutation takes a global re-entrant mutex and returns an RAII guard
//! that restores the previous state on drop, removing the variable when it
//! was previously absent. Guards for the same key stack and restore in LIFO
//! order.
//!
//! Mutations of different keys may interleave between guard creation and
//! drop. Hold [`lock`] (or an [`EnvScope`]) when a test needs exclusive
//! access across several operations.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _g = env::set_var("APP_PORT", "8080");
//! // `APP_PORT` is `8080` until `_g` drops.
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Wrapper around `std::env::set_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_set_var(key: &str, value: &OsStr) {
    unsafe { env::set_var(key, value) };
}

/// Wrapper around `std::env::remove_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_remove_var(key: &str) {
    unsafe { env::remove_var(key) };
}

fn mutate_locked<F>(key: String, mutator: F, _guard: &ReentrantMutexGuard<'static, ()>) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvVarGuard {
    /// Key this guard restores.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held for the restoration.
            Some(value) => unsafe { env_set_var(&self.key, &value) },
            // SAFETY: `ENV_MUTEX` is held for the restoration.
            None => unsafe { env_remove_var(&self.key) },
        }
    }
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

/// RAII guard that serialises environment access for its lifetime.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Sets an environment variable while holding the lock.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        // SAFETY: `self.guard` holds `ENV_MUTEX`.
        mutate_locked(key.into(), |k| unsafe { env_set_var(k, value.as_ref()) }, &self.guard)
    }

    /// Removes an environment variable while holding the lock.
    pub fn remove_var<K>(&self, key: K) -> EnvVarGuard
    where
        K: Into<String>,
    {
        // SAFETY: `self.guard` holds `ENV_MUTEX`.
        mutate_locked(key.into(), |k| unsafe { env_remove_var(k) }, &self.guard)
    }
}

/// Holds the environment lock while retaining a set of guards.
///
/// # Examples
/// ```
/// use test_helpers::env;
///
/// let _scope = env::EnvScope::new_with(|lock| {
///     vec![lock.set_var("APP_HOST", "localhost"), lock.remove_var("APP_PORT")]
/// });
/// ```
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    _lock: EnvVarLock,
    guards: Vec<EnvVarGuard>,
}

impl EnvScope {
    /// Run `builder` under the lock and keep its guards for the scope.
    pub fn new_with<F>(builder: F) -> Self
    where
        F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
    {
        let lock = lock();
        let guards = builder(&lock);
        Self {
            _lock: lock,
            guards,
        }
    }

    /// Keys restored when the scope drops.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.guards.iter().map(EnvVarGuard::key)
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        // Restore while the lock is still held.
        drop(std::mem::take(&mut self.guards));
    }
}

/// Sets an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use test_helpers::env;
/// let _g = env::set_var("APP_NAME", "demo");
/// assert!(matches!(std::env::var("APP_NAME"), Ok(ref value) if value == "demo"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    lock().set_var(key, value)
}

/// Removes an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use test_helpers::env;
/// let _g = env::remove_var("APP_NAME");
/// assert!(std::env::var("APP_NAME").is_err());
/// ```
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    lock().remove_var(key)
}

/// Remove every variable whose name starts with `prefix` for the lifetime of
/// the returned scope.
///
/// Overlay tests use this to start from a namespace no stray variable from
/// the developer's shell can reach.
///
/// # Examples
/// ```
/// use test_helpers::env;
///
/// let _outer = env::set_var("SCRUBBED_TIMEOUT", "5s");
/// {
///     let _scope = env::scrub_prefix("SCRUBBED_");
///     assert!(std::env::var("SCRUBBED_TIMEOUT").is_err());
/// }
/// assert!(std::env::var("SCRUBBED_TIMEOUT").is_ok());
/// ```
pub fn scrub_prefix(prefix: &str) -> EnvScope {
    EnvScope::new_with(|lock| {
        env::vars_os()
            .filter_map(|(key, _)| key.into_string().ok())
            .filter(|key| key.starts_with(prefix))
            .map(|key| lock.remove_var(key))
            .collect()
    })
}

/// Acquire the global environment lock for the lifetime of the guard.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        guard: ENV_MUTEX.lock(),
    }
}
