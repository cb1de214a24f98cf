//! Forward cursors over a [`Strand`]: [`Chunks`] and [`Graphemes`]
//!
//! Both cursors stream: they hold a borrow of the strand plus O(1) state, and never
//! collect intermediate results. [`Chunks`] walks the tree's leaves in order. [`Graphemes`]
//! layers unicode segmentation on top of that walk, servicing the segmenter's requests for
//! more text (`NextChunk`) or for look-behind context (`PreContext`) by going back to the
//! tree.

use crate::chunk::INLINE_SIZE;
use crate::index::Index;
use crate::strand::Strand;
use crate::tree::Node;
use smallstr::SmallString;
use unicode_segmentation::{GraphemeCursor, GraphemeIncomplete};

/// A single grapheme cluster yielded by [`Graphemes`]
///
/// Nearly all clusters fit the inline capacity, so pulling one usually allocates nothing
/// even when the cluster spans a chunk boundary.
pub type Cluster = SmallString<[u8; INLINE_SIZE]>;

/// A forward cursor over a strand's chunks
///
/// Yields each maximal contiguous text buffer in order: no gaps, no overlaps, and no
/// empty buffers (the empty strand yields nothing at all).
pub struct Chunks<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Chunks<'a> {
    pub(crate) fn new(root: &'a Node) -> Self {
        Chunks { stack: vec![root] }
    }

    /// Starts the walk at the chunk containing byte `offset`
    ///
    /// Returns the cursor positioned *after* that chunk, along with the chunk itself and
    /// its starting offset. For `offset` equal to the strand's length, the final chunk is
    /// returned.
    fn from_byte(root: &'a Node, offset: usize) -> (Self, &'a str, usize) {
        let mut stack = Vec::new();
        let mut node = root;
        let mut start = 0;

        loop {
            match node {
                Node::Leaf(chunk) => return (Chunks { stack }, chunk.as_str(), start),
                Node::Branch { left, right, .. } => {
                    if offset < start + left.len() {
                        stack.push(&**right);
                        node = &**left;
                    } else {
                        start += left.len();
                        node = &**right;
                    }
                }
            }
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Leaf(chunk) if chunk.is_empty() => continue,
                Node::Leaf(chunk) => return Some(chunk.as_str()),
                Node::Branch { left, right, .. } => {
                    self.stack.push(&**right);
                    self.stack.push(&**left);
                }
            }
        }
        None
    }
}

/// A forward cursor over a strand's grapheme clusters
///
/// Produced by [`Strand::graphemes`] (from the start) or [`Strand::graphemes_from`] (from
/// an arbitrary [`Index`]). Starting mid-strand still segments with the preceding text as
/// context, so a cursor opened at a cluster boundary sees exactly the clusters a
/// whole-strand cursor would from that point on.
pub struct Graphemes<'a> {
    strand: &'a Strand,
    chunks: Chunks<'a>,
    chunk: &'a str,
    chunk_start: usize,
    cursor: GraphemeCursor,
}

impl<'a> Graphemes<'a> {
    pub(crate) fn new(strand: &'a Strand) -> Self {
        Graphemes::from_index(strand, Index::at(0))
    }

    pub(crate) fn from_index(strand: &'a Strand, index: Index) -> Self {
        let offset = index.byte();
        debug_assert!(offset <= strand.len());

        let (chunks, chunk, chunk_start) = Chunks::from_byte(strand.root(), offset);

        Graphemes {
            strand,
            chunks,
            chunk,
            chunk_start,
            cursor: GraphemeCursor::new(offset, strand.len(), true),
        }
    }

    /// Returns whether the cursor's current position is strictly before `target`
    ///
    /// The current position is the start of the next cluster [`next`] would yield (equal
    /// to the strand's length once the cursor is exhausted).
    ///
    /// [`next`]: Iterator::next
    pub fn is_before(&self, target: Index) -> bool {
        self.cursor.cur_cursor() < target.byte()
    }
}

impl<'a> Iterator for Graphemes<'a> {
    type Item = Cluster;

    fn next(&mut self) -> Option<Cluster> {
        let start = self.cursor.cur_cursor();
        if start >= self.strand.len() {
            return None;
        }

        // Accumulates the cluster's text. Only clusters that straddle a chunk boundary
        // touch it before the final push.
        let mut cluster = Cluster::new();

        loop {
            match self.cursor.next_boundary(self.chunk, self.chunk_start) {
                Ok(Some(end)) => {
                    let from = start.max(self.chunk_start) - self.chunk_start;
                    cluster.push_str(&self.chunk[from..end - self.chunk_start]);
                    return Some(cluster);
                }
                Ok(None) => return None,
                Err(GraphemeIncomplete::NextChunk) => {
                    // The cluster continues past this chunk; bank what it covered so far.
                    let from = start.max(self.chunk_start) - self.chunk_start;
                    cluster.push_str(&self.chunk[from..]);

                    self.chunk_start += self.chunk.len();
                    self.chunk = self.chunks.next().unwrap_or("");
                }
                Err(GraphemeIncomplete::PreContext(pos)) => {
                    let (context, context_start) = self.strand.chunk_at_byte(pos - 1);
                    self.cursor.provide_context(context, context_start);
                }
                Err(_) => unreachable!("grapheme cursor requested an impossible state"),
            }
        }
    }
}
