//! Packed visited-state bit array for flood fills and BFS traversals

/// One bit per pixel, indexed by flat pixel index
#[derive(Debug, Clone)]
pub struct VisitedSet {
    words: Vec<u32>,
    len: usize,
}

impl VisitedSet {
    /// Create a cleared set able to hold `len` indices
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(32)],
            len,
        }
    }

    /// Capacity in bits
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the set has zero capacity
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check membership
    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.words[i >> 5] & (1 << (i & 31)) != 0
    }

    /// Mark `i`; returns `true` if it was not marked before
    #[inline]
    pub fn insert(&mut self, i: usize) -> bool {
        let word = &mut self.words[i >> 5];
        let bit = 1 << (i & 31);
        let fresh = *word & bit == 0;
        *word |= bit;
        fresh
    }

    /// Number of marked indices
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = VisitedSet::new(70);
        assert_eq!(set.len(), 70);
        assert!(!set.contains(33));
        assert!(set.insert(33));
        assert!(!set.insert(33));
        assert!(set.contains(33));
        assert!(set.insert(69));
        assert!(set.insert(0));
        assert_eq!(set.count(), 3);
        assert!(!set.contains(32));
    }
}
