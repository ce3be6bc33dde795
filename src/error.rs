//! Error types for the slot-lru library.
//!
//! The cache itself never fails: slots are reserved up front and every
//! structural update is total. The only failures surfaced to callers are the
//! ones reported by a caller-supplied eviction callback.
//!
//! ## Key Components
//!
//! - [`BoxError`]: The default error type for eviction callbacks.
//! - [`EvictionErrors`]: Every callback failure collected while clearing a
//!   cache, in the order the entries were visited.
//!
//! ## Example Usage
//!
//! ```
//! use slot_lru::error::BoxError;
//! use slot_lru::LruCache;
//!
//! let cache = LruCache::new(
//!     4,
//!     Some(Box::new(|key: u32, _value: u32| -> Result<(), BoxError> {
//!         Err(format!("cannot flush {}", key).into())
//!     })),
//! );
//! cache.put(1, 10).unwrap();
//! cache.put(2, 20).unwrap();
//!
//! let errors = cache.clear().unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert!(cache.is_empty());
//! ```

use std::fmt;

/// Boxed error returned by eviction callbacks of a default-typed cache.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by the eviction callback during a single `clear`.
///
/// Each failure is kept as its own value rather than being folded into a
/// message, so callers can inspect or downcast them individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionErrors<E> {
    errors: Vec<E>,
}

impl<E> EvictionErrors<E> {
    pub(crate) fn new() -> Self {
        EvictionErrors { errors: Vec::new() }
    }

    pub(crate) fn push(&mut self, error: E) {
        self.errors.push(error);
    }

    /// `Ok(())` when nothing failed, otherwise `Err(self)`.
    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Number of failed callback invocations.
    #[inline]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if no callback invocation failed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over the individual errors in visiting order.
    pub fn iter(&self) -> core::slice::Iter<'_, E> {
        self.errors.iter()
    }

    /// Returns the individual errors in visiting order.
    pub fn into_inner(self) -> Vec<E> {
        self.errors
    }
}

impl<E: fmt::Display> fmt::Display for EvictionErrors<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            fmt::Display::fmt(error, f)?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for EvictionErrors<E> {}

impl<E> IntoIterator for EvictionErrors<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a EvictionErrors<E> {
    type Item = &'a E;
    type IntoIter = core::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
