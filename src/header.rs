//! Tree header: format magic followed by the Huffman tree in preorder.
//!
//! **Wire layout:**
//! - Magic: 32 bits, `0xFACE8201` for the tree header
//! - Internal node: bit `0`, then the left subtree, then the right subtree
//! - Leaf: bit `1`, then the symbol in 9 bits (0-255, or 256 for pseudo-EOF)
//!
//! Weights are not stored; the decoder only needs shape and leaf values.
use crate::bitio::{BitInput, BitOutput};
use crate::huffman::{HuffmanNode, HuffmanTree, INTERNAL, MAX_NODES};
use crate::{HzError, HzResult, Section, BITS_PER_INT, BITS_PER_WORD, PSEUDO_EOF};

/// Common prefix of every hz magic number.
pub const MAGIC_BASE: u32 = 0xFACE_8200;
/// Magic for the tree header.
pub const MAGIC_TREE: u32 = MAGIC_BASE | 1;
/// Magic reserved for a count-based header.
pub const MAGIC_COUNTS: u32 = MAGIC_BASE | 2;

/// Width of a leaf value: one bit wider than a byte so pseudo-EOF fits.
const LEAF_BITS: u32 = BITS_PER_WORD + 1;

/// Header formats named by the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Preorder tree encoding. The only format written or read.
    #[default]
    Tree,
    /// Per-symbol counts. Reserved; never produced.
    Counts,
}

impl HeaderMode {
    pub fn magic(self) -> u32 {
        match self {
            HeaderMode::Tree => MAGIC_TREE,
            HeaderMode::Counts => MAGIC_COUNTS,
        }
    }

    pub fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            MAGIC_TREE => Some(HeaderMode::Tree),
            MAGIC_COUNTS => Some(HeaderMode::Counts),
            _ => None,
        }
    }
}

/// Number of bits [`write_header`] emits for `tree`.
pub fn header_bits(tree: &HuffmanTree) -> u64 {
    let leaves = tree.leaf_count() as u64;
    BITS_PER_INT as u64 + tree.len() as u64 + leaves * LEAF_BITS as u64
}

/// Write the tree-header magic and the preorder tree.
pub fn write_header<O: BitOutput>(tree: &HuffmanTree, out: &mut O) -> HzResult<()> {
    out.write_bits(BITS_PER_INT, MAGIC_TREE)?;
    write_tree(tree, out)
}

/// Write the preorder tree encoding without the magic.
pub fn write_tree<O: BitOutput>(tree: &HuffmanTree, out: &mut O) -> HzResult<()> {
    let mut stack = vec![tree.root()];
    while let Some(idx) = stack.pop() {
        let node = tree.node(idx);
        match node.children() {
            Some((left, right)) => {
                out.write_bits(1, 0)?;
                stack.push(right);
                stack.push(left);
            }
            None => {
                out.write_bits(1, 1)?;
                out.write_bits(LEAF_BITS, node.value as u32)?;
            }
        }
    }
    Ok(())
}

/// Check the magic and rebuild the tree that follows it.
///
/// A wrong magic fails before any tree bits are read.
pub fn read_header<I: BitInput>(input: &mut I) -> HzResult<HuffmanTree> {
    let magic = input
        .read_bits(BITS_PER_INT)?
        .ok_or(HzError::Truncated(Section::Magic))?;
    if magic != MAGIC_TREE {
        if HeaderMode::from_magic(magic) == Some(HeaderMode::Counts) {
            log::debug!("input uses the count header, which hz does not read");
        }
        return Err(HzError::FormatMismatch {
            found: magic,
            expected: MAGIC_TREE,
        });
    }
    read_tree(input)
}

/// Rebuild a tree from its preorder encoding, consuming exactly the bits
/// [`write_tree`] produced.
///
/// Rejects trees no encoder emits: out-of-range or repeated leaf values,
/// a lone leaf, or a missing pseudo-EOF leaf.
pub fn read_tree<I: BitInput>(input: &mut I) -> HzResult<HuffmanTree> {
    let mut nodes: Vec<HuffmanNode> = Vec::new();
    // Internal nodes still waiting for a right child
    let mut pending: Vec<usize> = Vec::new();
    let mut seen = [false; PSEUDO_EOF as usize + 1];

    loop {
        if nodes.len() >= MAX_NODES {
            return Err(HzError::MalformedHeader("tree has too many nodes"));
        }
        let bit = input
            .read_bits(1)?
            .ok_or(HzError::Truncated(Section::Header))?;

        let mut done = nodes.len();
        if bit == 0 {
            nodes.push(HuffmanNode {
                value: INTERNAL,
                weight: 0,
                left: None,
                right: None,
            });
            pending.push(done);
            continue;
        }

        let value = input
            .read_bits(LEAF_BITS)?
            .ok_or(HzError::Truncated(Section::Header))?;
        if value > PSEUDO_EOF as u32 {
            return Err(HzError::MalformedHeader("leaf value out of range"));
        }
        if std::mem::replace(&mut seen[value as usize], true) {
            return Err(HzError::MalformedHeader("duplicate leaf value"));
        }
        nodes.push(HuffmanNode::leaf(value as u16, 0));

        // Hang the finished subtree on the nearest open parent; a parent
        // that just got its right child is itself finished.
        loop {
            let Some(&parent) = pending.last() else {
                return finish_tree(nodes, done, &seen);
            };
            if nodes[parent].left.is_none() {
                nodes[parent].left = Some(done);
                break;
            }
            nodes[parent].right = Some(done);
            pending.pop();
            done = parent;
        }
    }
}

fn finish_tree(nodes: Vec<HuffmanNode>, root: usize, seen: &[bool]) -> HzResult<HuffmanTree> {
    if nodes[root].is_leaf() {
        return Err(HzError::MalformedHeader("tree has a single leaf"));
    }
    if !seen[PSEUDO_EOF as usize] {
        return Err(HzError::MalformedHeader("tree has no pseudo-EOF leaf"));
    }
    log::trace!("read tree header: {} nodes", nodes.len());
    Ok(HuffmanTree::from_parts(nodes, root))
}
