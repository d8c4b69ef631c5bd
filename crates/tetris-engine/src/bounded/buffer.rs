use core::ops::{Index, IndexMut};

/// Append-only sequence over caller-owned storage.
///
/// Invariants:
/// - `count <= capacity`
/// - `storage.len() >= capacity`
///
/// Every precondition failure is a programming error and panics at the call site.
/// There is no silent drop and no growth: a full buffer means the storage was
/// sized wrong.
#[derive(Debug)]
pub struct BoundedBuffer<'a, T> {
    capacity: usize,
    count: usize,
    storage: &'a mut [T],
}

impl<'a, T> BoundedBuffer<'a, T> {
    /// Creates an empty view over the first `capacity` slots of `storage`.
    ///
    /// # Panics
    /// Panics if `capacity == 0` or `storage` is shorter than `capacity`.
    #[track_caller]
    pub fn new(capacity: usize, storage: &'a mut [T]) -> Self {
        assert!(capacity > 0, "BoundedBuffer::new: capacity must be > 0");
        assert!(
            storage.len() >= capacity,
            "BoundedBuffer::new: storage length {} < capacity {}",
            storage.len(),
            capacity
        );
        Self { capacity, count: 0, storage }
    }

    /// Creates a view spanning the whole of `storage`.
    #[track_caller]
    pub fn over(storage: &'a mut [T]) -> Self {
        let capacity = storage.len();
        Self::new(capacity, storage)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    /// Writes `value` into the next free slot.
    ///
    /// # Panics
    /// Panics if the buffer is full.
    #[track_caller]
    pub fn append(&mut self, value: T) {
        assert!(
            self.count < self.capacity,
            "BoundedBuffer::append: buffer full (capacity {})",
            self.capacity
        );
        self.storage[self.count] = value;
        self.count += 1;
    }

    /// Empties the view. Storage contents are left as they are.
    #[inline]
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Returns the live prefix `[0, len)`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage[..self.count]
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T> Index<usize> for BoundedBuffer<'_, T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        assert!(
            index < self.count,
            "BoundedBuffer: index {} out of range (len {})",
            index,
            self.count
        );
        &self.storage[index]
    }
}

impl<T> IndexMut<usize> for BoundedBuffer<'_, T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        assert!(
            index < self.count,
            "BoundedBuffer: index {} out of range (len {})",
            index,
            self.count
        );
        &mut self.storage[index]
    }
}

impl<'b, T> IntoIterator for &'b BoundedBuffer<'_, T> {
    type Item = &'b T;
    type IntoIter = core::slice::Iter<'b, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_buffer_is_empty_with_requested_capacity() {
        let mut data = [0i32; 5];
        let buf = BoundedBuffer::new(5, &mut data);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn capacity_may_be_smaller_than_storage() {
        let mut data = [0u8; 8];
        let buf = BoundedBuffer::new(3, &mut data);
        assert_eq!(buf.capacity(), 3);
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn zero_capacity_panics() {
        let mut data = [0i32; 2];
        let _ = BoundedBuffer::new(0, &mut data);
    }

    #[test]
    #[should_panic(expected = "storage length")]
    fn short_storage_panics() {
        let mut data = [0i32; 2];
        let _ = BoundedBuffer::new(3, &mut data);
    }

    // ── append / index ────────────────────────────────────────────────────

    #[test]
    fn append_keeps_insertion_order() {
        let mut data = [0i32; 5];
        let mut buf = BoundedBuffer::new(5, &mut data);

        buf.append(2);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf[0], 2);

        buf.append(9);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf[0], 2);
        assert_eq!(buf[1], 9);

        buf.append(7);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_slice(), &[2, 9, 7]);
    }

    #[test]
    fn fill_to_capacity() {
        let mut data = [0usize; 4];
        let mut buf = BoundedBuffer::over(&mut data);
        for i in 0..4 {
            buf.append(i * 10);
        }
        assert!(buf.is_full());
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![0, 10, 20, 30]);
    }

    #[test]
    #[should_panic(expected = "buffer full")]
    fn append_past_capacity_panics() {
        let mut data = [0i32; 2];
        let mut buf = BoundedBuffer::new(2, &mut data);
        buf.append(1);
        buf.append(2);
        buf.append(3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_past_len_panics() {
        let mut data = [0i32; 4];
        let mut buf = BoundedBuffer::new(4, &mut data);
        buf.append(1);
        let _v = buf[1];
    }

    #[test]
    fn index_mut_writes_through() {
        let mut data = [0i32; 2];
        let mut buf = BoundedBuffer::new(2, &mut data);
        buf.append(1);
        buf[0] = 42;
        assert_eq!(buf[0], 42);
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_then_reappend_reuses_storage() {
        let mut data = [0i32; 5];
        {
            let mut buf = BoundedBuffer::new(5, &mut data);
            buf.append(2);
            buf.append(9);
            buf.append(7);
            assert_eq!(buf.len(), 3);

            buf.reset();
            assert_eq!(buf.len(), 0);

            buf.append(5);
            assert_eq!(buf.len(), 1);
            assert_eq!(buf[0], 5);
        }
        // Slots past the new length keep their old contents.
        assert_eq!(data[..3], [5, 9, 7]);
    }
}
