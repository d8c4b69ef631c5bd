use ouroboros::self_referencing;

use crate::bounded::BoundedBuffer;

use super::quad::Quad;

/// Owned quad storage plus the bounded view filled each frame.
///
/// Storage is allocated once with the maximum batch size and released exactly
/// once, when the batch is dropped.
#[self_referencing]
pub(crate) struct QuadBatch {
    storage: Box<[Quad]>,

    #[borrows(mut storage)]
    #[covariant]
    quads: BoundedBuffer<'this, Quad>,
}

impl QuadBatch {
    /// # Panics
    /// Panics if `capacity == 0`.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        QuadBatchBuilder {
            storage: vec![Quad::default(); capacity].into_boxed_slice(),
            quads_builder: |storage| BoundedBuffer::new(capacity, storage),
        }
        .build()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.borrow_quads().capacity()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.borrow_quads().len()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.borrow_quads().is_full()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[Quad] {
        self.borrow_quads().as_slice()
    }

    pub(crate) fn push(&mut self, quad: Quad) {
        self.with_quads_mut(|quads| quads.append(quad));
    }

    pub(crate) fn reset(&mut self) {
        self.with_quads_mut(|quads| quads.reset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Color;

    #[test]
    fn push_and_reset_reuse_storage() {
        let mut batch = QuadBatch::with_capacity(2);
        assert_eq!(batch.capacity(), 2);

        let red = Quad::new(0.0, 0.0, 1.0, 1.0, Color::new(1.0, 0.0, 0.0));
        let blue = Quad::new(5.0, 5.0, 2.0, 2.0, Color::new(0.0, 0.0, 1.0));

        batch.push(red);
        batch.push(blue);
        assert!(batch.is_full());
        assert_eq!(batch.as_slice(), &[red, blue]);

        batch.reset();
        assert_eq!(batch.len(), 0);

        batch.push(blue);
        assert_eq!(batch.as_slice(), &[blue]);
    }

    #[test]
    #[should_panic(expected = "buffer full")]
    fn overflow_panics() {
        let mut batch = QuadBatch::with_capacity(1);
        let q = Quad::new(0.0, 0.0, 1.0, 1.0, Color::white());
        batch.push(q);
        batch.push(q);
    }
}
