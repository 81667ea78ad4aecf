use std::ops::Deref;

/// A vector whose capacity is fixed at construction. Pushing past capacity
/// panics instead of growing, so hot loops never allocate.
#[derive(Debug, PartialEq, Eq)]
pub struct FixedVec<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> FixedVec<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn push(&mut self, item: T) {
        assert!(
            !self.is_full(),
            "FixedVec full: capacity is {}",
            self.capacity
        );
        self.items.push(item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Ord> FixedVec<T> {
    pub fn sort_dedup(&mut self) {
        self.items.sort_unstable();
        self.items.dedup();
    }
}

impl<T: Clone> FixedVec<T> {
    /// Replaces the contents with `other`'s. Both must have the same capacity.
    pub fn copy_from(&mut self, other: &FixedVec<T>) {
        assert_eq!(
            self.capacity, other.capacity,
            "FixedVec capacity mismatch"
        );
        self.items.clear();
        self.items.extend_from_slice(&other.items);
    }
}

// Derived Clone would shrink the backing allocation to `len`.
impl<T: Clone> Clone for FixedVec<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::new(self.capacity);
        copy.items.extend_from_slice(&self.items);
        copy
    }
}

impl<T> Deref for FixedVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> Extend<T> for FixedVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_until_full() {
        let mut values = FixedVec::new(3);
        values.push(3u16);
        values.push(1);
        assert!(!values.is_full());
        values.push(2);
        assert!(values.is_full());
        assert_eq!(values.as_slice(), &[3, 1, 2]);
    }

    #[test]
    #[should_panic(expected = "FixedVec full")]
    fn push_past_capacity_panics() {
        let mut values = FixedVec::new(1);
        values.push(0u16);
        values.push(1);
    }

    #[test]
    fn sort_dedup_keeps_capacity() {
        let mut values = FixedVec::new(6);
        values.extend([5u16, 1, 5, 3, 1, 0]);
        values.sort_dedup();
        assert_eq!(&*values, &[0, 1, 3, 5]);
        assert_eq!(values.capacity(), 6);
    }

    #[test]
    fn clone_and_copy_keep_capacity() {
        let mut a = FixedVec::new(8);
        a.push(1u16);
        let b = a.clone();
        assert_eq!(b.capacity(), 8);
        assert_eq!(b.as_slice(), &[1]);

        let mut c = FixedVec::new(8);
        c.extend([4u16, 5, 6]);
        c.copy_from(&a);
        assert_eq!(c.as_slice(), &[1]);
    }

    #[test]
    #[should_panic(expected = "capacity mismatch")]
    fn copy_from_other_capacity_panics() {
        let a = FixedVec::<u16>::new(2);
        let mut b = FixedVec::<u16>::new(3);
        b.copy_from(&a);
    }
}
