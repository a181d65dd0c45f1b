use crate::error::Degradation;

/// Result of a fail-soft operation
///
/// Always holds a usable value. When the operation could not do its real
/// work, the value is a degraded default and `degradation` says why.
#[derive(Debug)]
#[must_use]
pub struct Outcome<T> {
    value: T,
    degradation: Option<Degradation>,
}

impl<T> Outcome<T> {
    /// The operation succeeded
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            degradation: None,
        }
    }

    /// The operation fell back to `value`
    pub const fn degraded(value: T, degradation: Degradation) -> Self {
        Self {
            value,
            degradation: Some(degradation),
        }
    }

    pub const fn value(&self) -> &T {
        &self.value
    }

    pub const fn degradation(&self) -> Option<&Degradation> {
        self.degradation.as_ref()
    }

    pub const fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Option<Degradation>) {
        (self.value, self.degradation)
    }
}
