//! Failures gathered across one overlay pass.

use std::fmt;

use super::OverlayError;

/// Every value rejected during one overlay pass, in enumeration order.
///
/// Only built when at least two values were rejected; a single failure is
/// reported on its own.
#[derive(Debug)]
pub struct OverrideFailures(Vec<OverlayError>);

impl OverrideFailures {
    /// Fold `failures` into one error.
    ///
    /// Returns `None` when nothing failed and the failure itself when only
    /// one did.
    pub(crate) fn collapse(mut failures: Vec<OverlayError>) -> Option<OverlayError> {
        if failures.len() > 1 {
            return Some(OverlayError::Aggregate(Self(failures)));
        }
        failures.pop()
    }

    /// The rejected values' errors.
    #[must_use]
    pub fn as_slice(&self) -> &[OverlayError] {
        &self.0
    }
}

impl fmt::Display for OverrideFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut numbered = self.0.iter().zip(1..);
        if let Some((first, n)) = numbered.next() {
            write!(f, "{n}: {first}")?;
        }
        numbered.try_for_each(|(err, n)| write!(f, "\n{n}: {err}"))
    }
}
