//! Read-only snapshots handed out by [`SafeSeq::view`](crate::SafeSeq::view).

use alloc::{rc::Rc, vec::Vec};
use core::{fmt, iter::FusedIterator, ops::Deref, slice};

use crate::raw::RawBuf;

/// A fixed-length, read-only handle over a [`SafeSeq`](crate::SafeSeq)'s
/// storage as it was when the view was obtained.
///
/// The handle keeps its allocation alive. Its length and elements never
/// change, whatever the container does afterwards, and it stays valid after
/// the container itself is dropped.
///
/// ```
/// use safe_seq::SafeSeq;
///
/// let mut seq: SafeSeq<i32> = [1, 2, 3].into_iter().collect();
/// let before = seq.view();
/// seq.remove(0).unwrap();
/// seq.push(4);
/// assert_eq!(before, [1, 2, 3]);
/// assert_eq!(seq.view(), [2, 3, 4]);
/// ```
pub struct View<T> {
    buf: Rc<RawBuf<T>>,
    len: usize,
}

impl<T> View<T> {
    pub(crate) fn new(buf: Rc<RawBuf<T>>) -> Self {
        let len = buf.len();
        Self { buf, len }
    }

    pub fn as_slice(&self) -> &[T] {
        self.buf.prefix(self.len)
    }

    /// Pointer to the allocation backing this view.
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Returns `true` if both views are backed by the same allocation.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.buf, &other.buf)
    }
}

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        Self {
            buf: Rc::clone(&self.buf),
            len: self.len,
        }
    }
}

impl<T> Deref for View<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsRef<[T]> for View<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<View<U>> for View<T> {
    fn eq(&self, other: &View<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for View<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for View<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for View<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for View<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vec<U>> for View<T> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<'a, T> IntoIterator for &'a View<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T: Clone> IntoIterator for View<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            end: self.len,
            view: self,
            start: 0,
        }
    }
}

/// An iterator that yields clones of a view's elements.
///
/// Owns its view, so the container can be mutated freely during the loop:
///
/// ```
/// use safe_seq::SafeSeq;
///
/// let mut seq: SafeSeq<u8> = [1, 2].into_iter().collect();
/// for x in seq.view() {
///     seq.push(x * 10);
/// }
/// assert_eq!(seq.as_slice(), &[1, 2, 10, 20]);
/// ```
pub struct IntoIter<T> {
    view: View<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        &self.view.as_slice()[self.start..self.end]
    }
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let item = self.view.as_slice()[self.start].clone();
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        Some(self.view.as_slice()[self.end].clone())
    }
}

impl<T: Clone> ExactSizeIterator for IntoIter<T> {}

impl<T: Clone> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_of<T>(items: impl IntoIterator<Item = T>) -> View<T> {
        let items: Vec<T> = items.into_iter().collect();
        let buf = RawBuf::with_capacity(items.len());
        for item in items {
            assert!(buf.push_within_capacity(item).is_ok());
        }
        View::new(Rc::new(buf))
    }

    #[test]
    fn test_len_is_captured() {
        let buf = Rc::new(RawBuf::with_capacity(4));
        buf.push_within_capacity(1).unwrap();
        let view = View::new(Rc::clone(&buf));
        buf.push_within_capacity(2).unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view, [1]);
        assert_eq!(View::new(buf), [1, 2]);
    }

    #[test]
    fn test_clone_aliases() {
        let view = view_of([1, 2, 3]);
        let copy = view.clone();
        assert!(View::ptr_eq(&view, &copy));
        assert_eq!(view.as_ptr(), copy.as_ptr());
        assert!(!View::ptr_eq(&view, &view_of([1, 2, 3])));
    }

    #[test]
    fn test_comparisons() {
        let view = view_of(["a", "b"]);
        assert_eq!(view, ["a", "b"]);
        assert_eq!(view, vec!["a", "b"]);
        assert_eq!(view, &["a", "b"][..]);
        assert_eq!(view, view_of(["a", "b"]));
        assert_ne!(view, ["a"]);
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", view_of([1, 2])), "[1, 2]");
        let mut iter = view_of([1, 2, 3]).into_iter();
        iter.next();
        assert_eq!(format!("{:?}", iter), "IntoIter([2, 3])");
    }

    #[test]
    fn test_owned_iteration() {
        let mut iter = view_of([1, 2, 3, 4]).into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_borrowed_iteration() {
        let view = view_of([3, 1, 2]);
        let total: i32 = (&view).into_iter().sum();
        assert_eq!(total, 6);
        assert_eq!(view.iter().max(), Some(&3));
    }

    #[test]
    fn test_outlives_other_handles() {
        let view = view_of([String::from("kept")]);
        let copy = view.clone();
        drop(view);
        assert_eq!(copy[0], "kept");
    }
}
