//! SafeSeq: an ordered container that can be mutated while views of it are
//! being traversed.

use alloc::rc::Rc;
use core::fmt;

use crate::{
    error::{Error, Result},
    raw::RawBuf,
    view::View,
};

/// Smallest capacity allocated once the sequence holds anything.
const MIN_NON_ZERO_CAP: usize = 4;

/// Whether the current storage may be aliased by a previously returned
/// [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sharing {
    /// No view can observe the current storage. Every operation mutates it
    /// in place.
    Exclusive,
    /// A view may alias the current storage. The next remove or swap of two
    /// distinct indices copies it first.
    Shared,
}

/// An ordered sequence that stays safe to mutate while a [`View`] of it is
/// being traversed.
///
/// [`SafeSeq::view`] hands out a snapshot backed by the current storage and
/// marks that storage as [`Sharing::Shared`]. Afterwards:
///
/// - [`push`](Self::push) keeps writing in place. It only fills slots past the
///   end of every outstanding view.
/// - [`remove`](Self::remove) and [`swap`](Self::swap) rewrite existing
///   indices, so the first of them after a view copies the storage and
///   returns to [`Sharing::Exclusive`]. Later ones mutate the private copy.
///
/// ```
/// use safe_seq::SafeSeq;
///
/// let mut seq = SafeSeq::new();
/// seq.push("a");
/// seq.push("b");
///
/// // Take the view once, up front. Removing from the front on every step
/// // empties the sequence and visits each original element exactly once.
/// let mut seen = Vec::new();
/// for item in seq.view() {
///     seen.push(item);
///     seq.remove(0).unwrap();
/// }
/// assert_eq!(seen, ["a", "b"]);
/// assert!(seq.is_empty());
/// ```
///
/// Calling `view()` again inside the loop defeats the purpose: each call
/// starts a new snapshot, and the destructive operation that follows it pays
/// for another copy.
///
/// `SafeSeq` is neither `Send` nor `Sync`. All calls, including iteration of
/// its views, must come from one thread.
pub struct SafeSeq<T> {
    buf: Rc<RawBuf<T>>,
    may_be_aliased: bool,
}

impl<T> SafeSeq<T> {
    pub fn new() -> Self {
        Self {
            buf: Rc::new(RawBuf::new()),
            may_be_aliased: false,
        }
    }

    /// Creates an empty sequence with room for `cap` elements before the
    /// first reallocation.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Rc::new(RawBuf::with_capacity(cap)),
            may_be_aliased: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.cap()
    }

    pub fn sharing(&self) -> Sharing {
        if self.may_be_aliased {
            Sharing::Shared
        } else {
            Sharing::Exclusive
        }
    }

    /// Borrows the current contents without starting a snapshot.
    ///
    /// The borrow checker keeps the sequence from being mutated while the
    /// slice is alive, so this never forces a later copy.
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// Pointer to the current backing allocation.
    ///
    /// Changes exactly when the storage is copied or reallocated.
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Returns a snapshot of the current contents.
    ///
    /// The snapshot's length and elements are fixed from here on. Views taken
    /// without mutation in between share the same allocation.
    pub fn view(&mut self) -> View<T> {
        self.may_be_aliased = true;
        View::new(Rc::clone(&self.buf))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index < len {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange { index, len })
        }
    }

    /// The storage for in-place mutation. Only valid while `Exclusive`.
    fn exclusive_buf(&mut self) -> &mut RawBuf<T> {
        debug_assert!(!self.may_be_aliased);
        // Views are only created by `view`, which marks the storage shared.
        match Rc::get_mut(&mut self.buf) {
            Some(buf) => buf,
            None => unreachable!("exclusive storage is aliased"),
        }
    }
}

impl<T: Clone> SafeSeq<T> {
    /// Appends `value` at the end.
    ///
    /// Never disturbs an outstanding view, whose length excludes the new
    /// element, and never changes the [`Sharing`] state.
    pub fn push(&mut self, value: T) {
        if let Err(value) = self.buf.push_within_capacity(value) {
            self.grow();
            if self.buf.push_within_capacity(value).is_err() {
                unreachable!("grown storage has no spare capacity");
            }
        }
    }

    #[cold]
    fn grow(&mut self) {
        let len = self.len();
        let cap = len
            .checked_add(1)
            .expect("capacity overflow")
            .next_power_of_two()
            .max(MIN_NON_ZERO_CAP);
        let next = if self.may_be_aliased {
            // Old storage stays alive for its views, so it keeps its elements.
            tracing::trace!(len, cap, "cloning shared storage to grow");
            self.buf.clone_with_capacity(cap)
        } else {
            self.exclusive_buf().move_into(cap)
        };
        self.buf = Rc::new(next);
    }

    /// Removes and returns the element at `index`, shifting the rest left.
    ///
    /// The first remove after [`view`](Self::view) builds a new storage
    /// without the element and leaves the old one to its views. The element
    /// returned on that path is a clone, since the old storage still owns it.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        if self.may_be_aliased {
            tracing::trace!(index, len = self.len(), "copying shared storage to remove");
            let removed = self.buf.as_slice()[index].clone();
            self.buf = Rc::new(self.buf.clone_without(index));
            self.may_be_aliased = false;
            return Ok(removed);
        }
        Ok(self.exclusive_buf().remove(index))
    }

    /// Exchanges the elements at `i` and `j`.
    ///
    /// Swapping an index with itself is a no-op: it never copies, even while
    /// the storage is shared.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        if i == j {
            return Ok(());
        }
        if self.may_be_aliased {
            let len = self.len();
            tracing::trace!(i, j, len, "copying shared storage to swap");
            self.buf = Rc::new(self.buf.clone_with_capacity(len));
            self.may_be_aliased = false;
        }
        self.exclusive_buf().as_mut_slice().swap(i, j);
        Ok(())
    }
}

impl<T> Default for SafeSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SafeSeq<T> {
    /// The clone owns fresh storage and starts out [`Sharing::Exclusive`].
    fn clone(&self) -> Self {
        Self {
            buf: Rc::new(self.buf.clone_with_capacity(self.len())),
            may_be_aliased: false,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SafeSeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Clone> Extend<T> for SafeSeq<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: Clone> FromIterator<T> for SafeSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut seq = Self::with_capacity(iter.size_hint().0);
        seq.extend(iter);
        seq
    }
}
