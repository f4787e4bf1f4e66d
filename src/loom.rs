#[cfg(not(loom))]
pub(crate) mod export {
  pub(crate) mod sync {
    pub(crate) use parking_lot::Mutex;
    pub(crate) use parking_lot::MutexGuard;

    pub(crate) mod atomic {
      pub(crate) use std::sync::atomic::AtomicU32;
      pub(crate) use std::sync::atomic::Ordering;
    }
  }
}

#[cfg(loom)]
pub(crate) mod export {
  pub(crate) mod sync {
    use std::fmt::Debug;
    use std::fmt::Formatter;
    use std::fmt::Result;

    pub(crate) use loom::sync::MutexGuard;

    /// Poison-free adapter giving loom's mutex the `parking_lot` surface.
    #[repr(transparent)]
    pub(crate) struct Mutex<T> {
      inner: loom::sync::Mutex<T>,
    }

    impl<T> Mutex<T> {
      #[inline]
      pub(crate) fn new(data: T) -> Self {
        Self {
          inner: loom::sync::Mutex::new(data),
        }
      }

      #[inline]
      pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        match self.inner.lock() {
          Ok(guard) => guard,
          Err(poison) => poison.into_inner(),
        }
      }
    }

    impl<T> Debug for Mutex<T> {
      fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str("Mutex(..)")
      }
    }

    pub(crate) mod atomic {
      pub(crate) use loom::sync::atomic::AtomicU32;
      pub(crate) use loom::sync::atomic::Ordering;
    }
  }
}

#[doc(inline)]
pub(crate) use self::export::*;
