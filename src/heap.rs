//! Array-backed binary min-heap used as the solver's ranking device.
//!
//! The candidate list builder and construction phase 2 both rank large
//! batches of integer costs and need to recover which candidate each ranked
//! cost came from, so every heap entry carries an opaque tag alongside its
//! value.

/// One ranked record: an integer cost plus the caller's tag for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapEntry {
    pub value: i64,
    pub tag: usize,
}

/// Binary min-heap over (value, tag) records.
///
/// The backing storage is reused across ranking rounds: `clear` resets the
/// live size without releasing capacity, which matters in construction
/// phase 2 where a fresh ranking is built at every step.
#[derive(Debug, Clone, Default)]
pub struct RankingHeap {
    entries: Vec<HeapEntry>,
}

impl RankingHeap {
    pub fn new() -> Self {
        RankingHeap {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RankingHeap {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert a (value, tag) record in O(log len).
    pub fn insert(&mut self, value: i64, tag: usize) {
        self.entries.push(HeapEntry { value, tag });
        self.sift_up(self.entries.len() - 1);
    }

    /// Remove and return the smallest record in O(log len).
    ///
    /// Panics when the heap is empty; callers track the live size.
    pub fn extract_min(&mut self) -> HeapEntry {
        assert!(!self.entries.is_empty(), "extract_min on empty heap");
        let min = self.entries[0];
        let last = self.entries.pop().unwrap();
        if !self.entries.is_empty() {
            self.entries[0] = last;
            self.sift_down(0);
        }
        min
    }

    fn sift_up(&mut self, mut child: usize) {
        while child > 0 {
            let parent = (child - 1) / 2;
            if self.entries[parent].value <= self.entries[child].value {
                break;
            }
            self.entries.swap(parent, child);
            child = parent;
        }
    }

    fn sift_down(&mut self, mut parent: usize) {
        loop {
            let left = 2 * parent + 1;
            if left >= self.entries.len() {
                break;
            }
            let right = left + 1;
            let mut smallest = left;
            if right < self.entries.len() && self.entries[right].value < self.entries[left].value {
                smallest = right;
            }
            if self.entries[parent].value <= self.entries[smallest].value {
                break;
            }
            self.entries.swap(parent, smallest);
            parent = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_ascending_order() {
        let mut heap = RankingHeap::new();
        for (i, value) in [5i64, 3, 8, 1, 9, 2, 7].into_iter().enumerate() {
            heap.insert(value, i);
        }

        let mut extracted = Vec::new();
        while !heap.is_empty() {
            extracted.push(heap.extract_min().value);
        }
        assert_eq!(extracted, vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn test_tags_follow_their_values() {
        let mut heap = RankingHeap::new();
        heap.insert(30, 300);
        heap.insert(10, 100);
        heap.insert(20, 200);

        assert_eq!(heap.extract_min(), HeapEntry { value: 10, tag: 100 });
        assert_eq!(heap.extract_min(), HeapEntry { value: 20, tag: 200 });
        assert_eq!(heap.extract_min(), HeapEntry { value: 30, tag: 300 });
    }

    #[test]
    fn test_handles_duplicates_and_negatives() {
        let mut heap = RankingHeap::new();
        for (i, value) in [0i64, -4, 2, -4, 0].into_iter().enumerate() {
            heap.insert(value, i);
        }

        let mut extracted = Vec::new();
        while !heap.is_empty() {
            extracted.push(heap.extract_min().value);
        }
        assert_eq!(extracted, vec![-4, -4, 0, 0, 2]);
    }

    #[test]
    fn test_clear_allows_reuse() {
        let mut heap = RankingHeap::with_capacity(4);
        heap.insert(1, 0);
        heap.insert(2, 1);
        heap.clear();
        assert!(heap.is_empty());

        heap.insert(9, 2);
        heap.insert(4, 3);
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.extract_min().value, 4);
    }

    #[test]
    fn test_large_random_batch_sorts() {
        use rand::prelude::*;
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let values: Vec<i64> = (0..500).map(|_| rng.gen_range(-1000..1000)).collect();

        let mut heap = RankingHeap::with_capacity(values.len());
        for (i, &value) in values.iter().enumerate() {
            heap.insert(value, i);
        }

        let mut sorted = values.clone();
        sorted.sort_unstable();

        for expected in sorted {
            let entry = heap.extract_min();
            assert_eq!(entry.value, expected);
            assert_eq!(values[entry.tag], entry.value);
        }
    }

    #[test]
    #[should_panic(expected = "extract_min on empty heap")]
    fn test_extract_on_empty_panics() {
        let mut heap = RankingHeap::new();
        heap.extract_min();
    }
}
