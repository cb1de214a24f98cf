//! The persistent chunk tree backing a [`Strand`](crate::Strand)
//!
//! Nothing here is public: the tree is a storage detail. Nodes are immutable once built
//! and shared between strands via `Arc`, which is what makes cloning a strand O(1) and
//! lets slices keep referencing their parent's allocations.

use crate::chunk::Chunk;
use std::sync::Arc;

/// An individual node in the chunk tree
///
/// The empty strand is represented as a single empty leaf; everywhere else, leaves are
/// non-empty. `Branch` caches the total byte length of its subtree so that descending by
/// byte offset is O(depth).
pub(crate) enum Node {
    Leaf(Chunk),
    Branch {
        len: usize,
        left: Arc<Node>,
        right: Arc<Node>,
    },
}

impl Node {
    /// Returns the total byte length of the subtree
    pub(crate) fn len(&self) -> usize {
        match self {
            Node::Leaf(chunk) => chunk.len(),
            Node::Branch { len, .. } => *len,
        }
    }

    /// Builds a balanced tree over the given chunks
    ///
    /// An empty list produces the empty leaf.
    pub(crate) fn build(chunks: &[Chunk]) -> Arc<Node> {
        match chunks {
            [] => Arc::new(Node::Leaf(Chunk::new(""))),
            [chunk] => Arc::new(Node::Leaf(chunk.clone())),
            _ => {
                let mid = chunks.len() / 2;
                let left = Node::build(&chunks[..mid]);
                let right = Node::build(&chunks[mid..]);

                Arc::new(Node::Branch {
                    len: left.len() + right.len(),
                    left,
                    right,
                })
            }
        }
    }

    /// Returns the chunk containing byte `offset`, along with the chunk's starting offset
    ///
    /// For `offset` equal to the total length, this returns the last chunk. The offset
    /// must not exceed the total length.
    pub(crate) fn chunk_at_byte(&self, offset: usize) -> (&str, usize) {
        debug_assert!(offset <= self.len());

        let mut node = self;
        let mut start = 0;

        loop {
            match node {
                Node::Leaf(chunk) => return (chunk.as_str(), start),
                Node::Branch { left, right, .. } => {
                    if offset < start + left.len() {
                        node = &**left;
                    } else {
                        start += left.len();
                        node = &**right;
                    }
                }
            }
        }
    }

    /// Collects the sub-chunks covering `range`, narrowing the first and last as needed
    ///
    /// The range must lie on scalar-value boundaries (enforced by [`Chunk::narrow`]).
    pub(crate) fn chunks_in_range(&self, start: usize, end: usize) -> Vec<Chunk> {
        debug_assert!(start <= end && end <= self.len());

        let mut out = Vec::new();
        self.collect_range(start, end, &mut out);
        out
    }

    fn collect_range(&self, start: usize, end: usize, out: &mut Vec<Chunk>) {
        if start >= end {
            return;
        }

        match self {
            Node::Leaf(chunk) => {
                if start == 0 && end == chunk.len() {
                    out.push(chunk.clone());
                } else {
                    out.push(chunk.narrow(start..end));
                }
            }
            Node::Branch { left, right, .. } => {
                let split = left.len();
                if start < split {
                    left.collect_range(start, end.min(split), out);
                }
                if end > split {
                    right.collect_range(start.max(split) - split, end - split, out);
                }
            }
        }
    }
}
