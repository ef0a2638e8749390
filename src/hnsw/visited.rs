//! Epoch-based visited set for HNSW graph traversal.
//!
//! Replaces `HashSet<u32>` with O(1) array indexing. Each `clear()` bumps an
//! epoch counter instead of zeroing the array, so repeated searches pay a
//! full memset only once every `u16::MAX - 1` clears.

/// Per-node visit marks keyed by an epoch counter.
#[derive(Debug)]
pub struct VisitedSet {
    marks: Vec<u16>,
    epoch: u16,
}

impl VisitedSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            marks: vec![0u16; capacity],
            epoch: 1,
        }
    }

    /// Resets the set. O(1) amortized.
    pub fn clear(&mut self) {
        if self.epoch == u16::MAX {
            self.marks.fill(0);
            self.epoch = 1;
        } else {
            self.epoch += 1;
        }
    }

    /// Grows the backing array to cover at least `cap` node IDs.
    pub fn ensure_capacity(&mut self, cap: usize) {
        if cap > self.marks.len() {
            self.marks.resize(cap, 0);
        }
    }

    /// Marks `id` as visited. Returns `true` on the first visit in this epoch.
    #[inline]
    pub fn insert(&mut self, id: u32) -> bool {
        let slot = &mut self.marks[id as usize];
        if *slot == self.epoch {
            false
        } else {
            *slot = self.epoch;
            true
        }
    }
}

impl Default for VisitedSet {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_clear() {
        let mut vs = VisitedSet::new(64);
        assert!(vs.insert(3));
        assert!(!vs.insert(3));
        assert!(vs.insert(63));

        vs.clear();
        assert!(vs.insert(3));
    }

    #[test]
    fn test_epoch_wraparound_memsets() {
        let mut vs = VisitedSet::new(8);
        for _ in 0..65534 {
            vs.clear();
        }
        assert_eq!(vs.epoch, u16::MAX);
        vs.insert(5);

        // The wrapping clear must not leave stale marks behind.
        vs.clear();
        assert_eq!(vs.epoch, 1);
        assert!(vs.insert(5));
    }

    #[test]
    fn test_ensure_capacity_preserves_marks() {
        let mut vs = VisitedSet::new(4);
        vs.insert(2);
        vs.ensure_capacity(16);
        assert!(!vs.insert(2));
        assert!(vs.insert(15));
    }
}
