//! safe-seq - An ordered container that can be mutated while it is being traversed
//!
//! # Overview
//!
//! Mutating a collection while iterating it is a classic source of
//! invalidation bugs. [`SafeSeq`] avoids them without copying on every
//! mutation: [`SafeSeq::view`] hands out a [`View`], a fixed-length read-only
//! snapshot, and the container guarantees that nothing it does afterwards is
//! ever visible through that view.
//!
//! ```
//! use safe_seq::SafeSeq;
//!
//! let mut seq = SafeSeq::new();
//! seq.push(1);
//! seq.push(2);
//! seq.push(3);
//!
//! // Appending while traversing visits only the original elements.
//! for x in seq.view() {
//!     seq.push(x * 10);
//! }
//! assert_eq!(seq.view(), [1, 2, 3, 10, 20, 30]);
//! ```
//!
//! # Copy Rule
//!
//! The container tracks one bit of state, its [`Sharing`]:
//!
//! | Operation            | `Exclusive`        | `Shared`                          |
//! |----------------------|--------------------|-----------------------------------|
//! | `view()`             | becomes `Shared`   | stays `Shared`                    |
//! | `push(x)`            | in place           | in place, stays `Shared`          |
//! | `remove(i)`          | shift in place     | copy without `i`, now `Exclusive` |
//! | `swap(i, j)`, `i≠j`  | in place           | full copy, now `Exclusive`        |
//! | `swap(i, i)`         | no-op              | no-op, stays `Shared`             |
//!
//! Pushing never rewrites an index an earlier view can see, so it never pays
//! for a copy. Only the first destructive operation after a view does.
//!
//! # Gotchas
//!
//! - **Take the view once.** `for x in seq.view()` evaluates `view()` once.
//!   A loop like `while !seq.view().is_empty() { seq.remove(0) }` is correct
//!   but copies the whole storage on every iteration.
//! - **Single-threaded.** [`SafeSeq`] and [`View`] are neither `Send` nor
//!   `Sync`.
//! - **`T: Clone` for mutation.** Copies duplicate elements that the old
//!   storage, and its views, still own. Cheap handles like `Rc<T>` or `&T`
//!   work best.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod error;
mod raw;
mod seq;
mod view;

pub use error::{Error, Result};
pub use seq::{SafeSeq, Sharing};
pub use view::{IntoIter, View};

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
static_assertions::assert_eq_size!(View<u64>, [usize; 2]);
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
static_assertions::assert_eq_size!(SafeSeq<u64>, [usize; 2]);

static_assertions::assert_not_impl_any!(SafeSeq<u64>: Send, Sync);
static_assertions::assert_not_impl_any!(View<u64>: Send, Sync);

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with TRACE level
    /// Call this at the start of tests where you want to see copy events
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
            )
            .with_test_writer()
            .try_init();
    }
}
