//! Proof wrapper for values that passed the validation pipeline.

/// Proof wrapper indicating a value has been validated.
///
/// Only code that ran a complete validation pass hands these out, so a
/// handler taking `Validated<T>` cannot be reached with unchecked input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validated<T>(T);

impl<T> Validated<T> {
    /// Wrap a validated value.
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the inner value.
    pub const fn as_ref(&self) -> &T {
        &self.0
    }

    /// Consume and return the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Transform the validated value, keeping the proof.
    pub fn map<U, F>(self, op: F) -> Validated<U>
    where
        F: FnOnce(T) -> U,
    {
        Validated(op(self.0))
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_derefs_and_maps() {
        let value = Validated::new(vec![1, 2, 3]);
        assert_eq!(value.len(), 3);

        let summed = value.map(|items| items.iter().sum::<i32>());
        assert_eq!(summed.into_inner(), 6);
    }
}
