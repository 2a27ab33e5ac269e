#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

/// A global, replace-only slot guarded by `std::sync::RwLock`, or by a spin
/// lock without `std`.
pub(crate) struct HookSlot<T: 'static + Send + Sync>(impl_::RwLock<Option<T>>);

impl<T: 'static + Send + Sync> HookSlot<T> {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self(impl_::RwLock::new(None))
    }

    /// Runs `f` with the current value while holding the read lock.
    #[inline]
    pub(crate) fn with<R>(&'static self, f: impl FnOnce(Option<&T>) -> R) -> R {
        #[cfg(not(feature = "std"))]
        let guard = self.0.read();

        // The slot is only ever replaced as a whole, so a poisoned lock still
        // holds a consistent value.
        #[cfg(feature = "std")]
        let guard = self.0.read().unwrap_or_else(std::sync::PoisonError::into_inner);

        f(guard.as_ref())
    }

    /// Stores `value` only if the slot is empty. Hands it back otherwise.
    pub(crate) fn set_if_empty(&'static self, value: T) -> Result<(), T> {
        let mut guard = self.write();
        if guard.is_some() {
            return Err(value);
        }
        *guard = Some(value);
        Ok(())
    }

    /// Stores `value` and returns whatever was there before.
    pub(crate) fn swap(&'static self, value: T) -> Option<T> {
        self.write().replace(value)
    }

    #[inline]
    fn write(&'static self) -> impl_::RwLockWriteGuard<'static, Option<T>> {
        #[cfg(not(feature = "std"))]
        return self.0.write();

        #[cfg(feature = "std")]
        return self.0.write().unwrap_or_else(std::sync::PoisonError::into_inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_if_empty_then_swap() {
        static SLOT: HookSlot<u32> = HookSlot::new();

        assert_eq!(SLOT.with(|value| value.copied()), None);
        assert_eq!(SLOT.set_if_empty(1), Ok(()));
        assert_eq!(SLOT.set_if_empty(2), Err(2));
        assert_eq!(SLOT.swap(3), Some(1));
        assert_eq!(SLOT.with(|value| value.copied()), Some(3));
    }
}
