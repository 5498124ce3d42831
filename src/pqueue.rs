//! A min-heap priority queue with deterministic tie-breaking.
//!
//! Entries are ordered by `(priority, insertion sequence)`, so two entries
//! of equal priority always pop in the order they were pushed. Huffman
//! construction relies on this for reproducible trees.

/// An entry in the priority queue.
#[derive(Debug, Clone)]
struct HeapEntry<T> {
    priority: u64,
    seq: u64,
    data: T,
}

impl<T> HeapEntry<T> {
    #[inline]
    fn key(&self) -> (u64, u64) {
        (self.priority, self.seq)
    }
}

/// A min-heap priority queue that pops the lowest-priority element first.
///
/// Uses 0-indexed storage with parent = (i-1)/2, children = 2i+1, 2i+2.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    nodes: Vec<HeapEntry<T>>,
    next_seq: u64,
}

impl<T> MinHeap<T> {
    /// Create a new, empty min-heap.
    pub fn new() -> Self {
        MinHeap {
            nodes: Vec::new(),
            next_seq: 0,
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Push an element onto the heap with the given priority.
    pub fn push(&mut self, priority: u64, data: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.nodes.push(HeapEntry {
            priority,
            seq,
            data,
        });
        self.sift_up(self.nodes.len() - 1);
    }

    /// Pop the minimum-priority element, earliest pushed among equals.
    ///
    /// Returns `None` if the heap is empty.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.nodes.len().checked_sub(1)?;
        self.nodes.swap(0, last);
        let result = self.nodes.pop()?;
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some(result.data)
    }

    /// Priority of the element `pop` would return next.
    pub fn peek_priority(&self) -> Option<u64> {
        self.nodes.first().map(|e| e.priority)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.nodes[index].key() < self.nodes[parent].key() {
                self.nodes.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.nodes[left].key() < self.nodes[smallest].key() {
                smallest = left;
            }
            if right < len && self.nodes[right].key() < self.nodes[smallest].key() {
                smallest = right;
            }

            if smallest == index {
                break;
            }

            self.nodes.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
