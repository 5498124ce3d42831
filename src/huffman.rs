//! Huffman tree construction over an index-addressed node arena.
//!
//! Leaves carry a byte value (0-255) or the pseudo-EOF symbol (256).
//! Internal nodes always have exactly two children. Nodes refer to their
//! children by index into the tree's `nodes` vector, so every walk over
//! the tree is an explicit loop with its own stack rather than recursion.
//!
//! Construction order is deterministic: leaves enter the heap in ascending
//! byte order followed by pseudo-EOF, merged nodes enter in creation
//! order, and equal weights pop in insertion order (see [`MinHeap`]). The
//! first node popped in each merge becomes the left child.
use crate::frequency::FrequencyTable;
use crate::pqueue::MinHeap;
use crate::{ALPH_SIZE, PSEUDO_EOF};

/// Value stored in internal nodes.
pub const INTERNAL: u16 = u16::MAX;
/// Most leaves a tree can have: every byte plus pseudo-EOF.
pub const MAX_LEAVES: usize = ALPH_SIZE + 1;
/// Most nodes a tree can have.
pub const MAX_NODES: usize = 2 * MAX_LEAVES - 1;

/// A node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanNode {
    /// Symbol for leaves, [`INTERNAL`] otherwise.
    pub value: u16,
    /// Occurrence count of the leaf or subtree. Zero for trees read back
    /// from a header.
    pub weight: u64,
    /// Left child index (None for leaves).
    pub left: Option<usize>,
    /// Right child index (None for leaves).
    pub right: Option<usize>,
}

impl HuffmanNode {
    pub fn leaf(value: u16, weight: u64) -> Self {
        HuffmanNode {
            value,
            weight,
            left: None,
            right: None,
        }
    }

    pub fn internal(weight: u64, left: usize, right: usize) -> Self {
        HuffmanNode {
            value: INTERNAL,
            weight,
            left: Some(left),
            right: Some(right),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Both child indices, if this is an internal node.
    #[inline]
    pub fn children(&self) -> Option<(usize, usize)> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some((l, r)),
            _ => None,
        }
    }

    /// The leaf's symbol, or `None` for internal nodes.
    #[inline]
    pub fn symbol(&self) -> Option<u16> {
        self.is_leaf().then_some(self.value)
    }
}

/// A Huffman tree stored as a flat node arena.
///
/// Equality is structural: two trees are equal when they have the same
/// shape and the same leaf values in the same positions. Weights are
/// ignored, since a tree read back from a header has none.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: usize,
}

impl HuffmanTree {
    /// Build a Huffman tree from input data.
    pub fn from_data(input: &[u8]) -> Self {
        let mut freq = FrequencyTable::new();
        freq.count(input);
        Self::from_frequency_table(&freq)
    }

    /// Build a Huffman tree from a frequency table.
    ///
    /// The pseudo-EOF leaf (weight 1) is always present. If no byte was
    /// observed, a zero-weight leaf for byte 0 is added so the tree still
    /// has two leaves and every code is at least one bit.
    pub fn from_frequency_table(freq: &FrequencyTable) -> Self {
        let mut nodes: Vec<HuffmanNode> = Vec::with_capacity(MAX_NODES);
        let mut heap: MinHeap<usize> = MinHeap::new();

        for (byte, count) in freq.iter_used() {
            heap.push(count, nodes.len());
            nodes.push(HuffmanNode::leaf(byte as u16, count));
        }
        if nodes.is_empty() {
            heap.push(0, nodes.len());
            nodes.push(HuffmanNode::leaf(0, 0));
        }
        heap.push(1, nodes.len());
        nodes.push(HuffmanNode::leaf(PSEUDO_EOF, 1));

        // Merge the two lightest nodes until one remains
        let root = loop {
            match (heap.pop(), heap.pop()) {
                (Some(left), Some(right)) => {
                    let weight = nodes[left].weight + nodes[right].weight;
                    heap.push(weight, nodes.len());
                    nodes.push(HuffmanNode::internal(weight, left, right));
                }
                (Some(last), None) => break last,
                (None, _) => unreachable!("heap always holds the pseudo-EOF leaf"),
            }
        };

        let tree = HuffmanTree { nodes, root };
        log::debug!(
            "built huffman tree: {} leaves, {} nodes, depth {}",
            tree.leaf_count(),
            tree.len(),
            tree.depth()
        );
        tree
    }

    /// Assemble a tree from an arena. Callers guarantee that `root` is in
    /// bounds and every internal node has two in-bounds children.
    pub(crate) fn from_parts(nodes: Vec<HuffmanNode>, root: usize) -> Self {
        debug_assert!(root < nodes.len());
        HuffmanTree { nodes, root }
    }

    /// Index of the root node.
    pub fn root(&self) -> usize {
        self.root
    }

    /// Node at `idx`.
    pub fn node(&self, idx: usize) -> &HuffmanNode {
        &self.nodes[idx]
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[HuffmanNode] {
        &self.nodes
    }

    /// Total number of nodes (always `2 * leaf_count - 1`).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaves, pseudo-EOF included.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Leaves in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = &HuffmanNode> + '_ {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Child of `idx` reached by `bit` (0 = left, 1 = right).
    #[inline]
    pub fn child(&self, idx: usize, bit: u32) -> Option<usize> {
        let node = &self.nodes[idx];
        if bit == 0 {
            node.left
        } else {
            node.right
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            match self.nodes[idx].children() {
                Some((l, r)) => {
                    stack.push((l, depth + 1));
                    stack.push((r, depth + 1));
                }
                None => max = max.max(depth),
            }
        }
        max
    }
}

impl PartialEq for HuffmanTree {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root, other.root)];
        while let Some((a, b)) = stack.pop() {
            let (na, nb) = (&self.nodes[a], &other.nodes[b]);
            match (na.children(), nb.children()) {
                (None, None) => {
                    if na.value != nb.value {
                        return false;
                    }
                }
                (Some((al, ar)), Some((bl, br))) => {
                    stack.push((al, bl));
                    stack.push((ar, br));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for HuffmanTree {}
