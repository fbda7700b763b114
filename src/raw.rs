//! RawBuf: a fixed-capacity allocation whose initialized prefix can grow
//! through a shared reference.
//!
//! Elements `[0, len)` are initialized. Slots `[len, cap)` are not, and no
//! reference into them ever exists, so [`RawBuf::push_within_capacity`] may
//! write there while other handles read the initialized prefix.

use alloc::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use core::{
    cell::Cell,
    marker::PhantomData,
    mem,
    ptr::{self, NonNull},
    slice,
};

pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: Cell<usize>,
    _owns: PhantomData<T>,
}

impl<T> RawBuf<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(cap: usize) -> Self {
        if Self::IS_ZST {
            return Self::dangling(usize::MAX);
        }
        if cap == 0 {
            return Self::dangling(0);
        }
        let layout = Layout::array::<T>(cap).expect("capacity overflow");
        // SAFETY: layout has a non-zero size (non-ZST element, cap > 0).
        let ptr = unsafe { alloc(layout) }.cast::<T>();
        let Some(ptr) = NonNull::new(ptr) else {
            handle_alloc_error(layout)
        };
        Self {
            ptr,
            cap,
            len: Cell::new(0),
            _owns: PhantomData,
        }
    }

    fn dangling(cap: usize) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap,
            len: Cell::new(0),
            _owns: PhantomData,
        }
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len.get()
    }

    #[inline(always)]
    pub(crate) fn cap(&self) -> usize {
        self.cap
    }

    #[inline(always)]
    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Writes `value` into the first uninitialized slot.
    ///
    /// Hands the value back when the buffer is full.
    pub(crate) fn push_within_capacity(&self, value: T) -> Result<(), T> {
        let len = self.len();
        if len == self.cap {
            return Err(value);
        }
        // SAFETY: len < cap, so the slot is inside the allocation. It is past
        // the initialized prefix, so nothing holds a reference to it.
        unsafe { ptr::write(self.ptr.as_ptr().add(len), value) };
        self.len.set(len + 1);
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn as_slice(&self) -> &[T] {
        self.prefix(self.len())
    }

    /// The first `len` elements. `len` must not exceed the initialized length.
    #[inline(always)]
    pub(crate) fn prefix(&self, len: usize) -> &[T] {
        assert!(len <= self.len(), "prefix past initialized length");
        // SAFETY: [0, len) is initialized and lives as long as `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: [0, len) is initialized and `&mut self` is unique.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len()) }
    }

    /// Removes the element at `index`, shifting the tail left by one.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        let len = self.len();
        assert!(index < len, "remove index out of bounds");
        // SAFETY: index < len, so `hole` is initialized. The tail
        // (index, len) is shifted over it and the length shrinks, leaving
        // every slot in [0, len - 1) initialized exactly once.
        unsafe {
            let hole = self.ptr.as_ptr().add(index);
            let removed = ptr::read(hole);
            ptr::copy(hole.add(1), hole, len - index - 1);
            self.len.set(len - 1);
            removed
        }
    }

    /// Moves every element into a fresh buffer of capacity `cap`, leaving
    /// `self` empty.
    pub(crate) fn move_into(&mut self, cap: usize) -> Self {
        let len = self.len();
        assert!(cap >= len);
        let next = Self::with_capacity(cap);
        // SAFETY: both allocations hold at least `len` slots and are distinct.
        // Ownership of the elements transfers, so `self` must forget them.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), next.ptr.as_ptr(), len);
        }
        self.len.set(0);
        next.len.set(len);
        next
    }
}

impl<T: Clone> RawBuf<T> {
    /// A fresh buffer of capacity `cap` holding clones of every element.
    pub(crate) fn clone_with_capacity(&self, cap: usize) -> Self {
        assert!(cap >= self.len());
        Self::collect_into(Self::with_capacity(cap), self.as_slice().iter())
    }

    /// A fresh, exactly-sized buffer holding clones of every element except
    /// the one at `index`.
    pub(crate) fn clone_without(&self, index: usize) -> Self {
        let src = self.as_slice();
        assert!(index < src.len(), "remove index out of bounds");
        let next = Self::with_capacity(src.len() - 1);
        Self::collect_into(next, src[..index].iter().chain(&src[index + 1..]))
    }

    fn collect_into<'a>(next: Self, items: impl Iterator<Item = &'a T>) -> Self
    where
        T: 'a,
    {
        for item in items {
            // Capacity was sized by the caller. If a clone panics, `next`
            // drops the elements written so far.
            if next.push_within_capacity(item.clone()).is_err() {
                unreachable!("destination buffer sized too small");
            }
        }
        next
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        // SAFETY: [0, len) is initialized and owned by this buffer.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
        if !Self::IS_ZST && self.cap > 0 {
            // SAFETY: allocated in `with_capacity` with this exact layout.
            unsafe {
                dealloc(
                    self.ptr.as_ptr().cast(),
                    Layout::array::<T>(self.cap).expect("capacity overflow"),
                )
            };
        }
    }
}
