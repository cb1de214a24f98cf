//! Wrapper module for the [`Index`] type

use crate::strand::Strand;
use unicode_segmentation::{GraphemeCursor, GraphemeIncomplete};

/// An opaque logical position within a [`Strand`]
///
/// Indices are produced by [`Strand::resolve_index`] and consumed by
/// [`Strand::graphemes_from`] and as the endpoints of range comparisons. They support
/// equality and ordering, nothing else -- in particular, no arithmetic. An `Index` is only
/// meaningful for the strand that produced it; comparing indices from different strands
/// compares unrelated positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index {
    byte: usize,
}

impl Index {
    pub(crate) fn at(byte: usize) -> Self {
        Index { byte }
    }

    pub(crate) fn byte(self) -> usize {
        self.byte
    }
}

impl Strand {
    /// Maps a byte offset to an [`Index`] on a grapheme-cluster boundary
    ///
    /// Offsets past the end clamp to the end. An offset that falls strictly inside a
    /// cluster snaps to the cluster's start, or to its end when `prefer_cluster_end` is
    /// set; an offset already on a boundary resolves to itself either way.
    pub fn resolve_index(&self, offset: usize, prefer_cluster_end: bool) -> Index {
        let len = self.len();
        let mut offset = offset.min(len);
        if offset == 0 || offset == len {
            return Index::at(offset);
        }

        // Scalar boundary first: a grapheme boundary is always a scalar boundary, and the
        // segmenter expects to be positioned on one. Scalars never span chunks, so the
        // walk stays within the one chunk.
        let (mut chunk, mut chunk_start) = self.chunk_at_byte(offset);
        if prefer_cluster_end {
            while !chunk.is_char_boundary(offset - chunk_start) {
                offset += 1;
            }
        } else {
            while !chunk.is_char_boundary(offset - chunk_start) {
                offset -= 1;
            }
        }
        if offset == len {
            return Index::at(offset);
        }

        // Re-fetch so the segmenter is handed the chunk that contains the snapped
        // position (the ceil above may have landed on the next chunk's first byte).
        let (refetched, refetched_start) = self.chunk_at_byte(offset);
        chunk = refetched;
        chunk_start = refetched_start;

        let mut cursor = GraphemeCursor::new(offset, len, true);

        loop {
            match cursor.is_boundary(chunk, chunk_start) {
                Ok(true) => return Index::at(offset),
                Ok(false) => break,
                Err(GraphemeIncomplete::PreContext(pos)) => {
                    let (context, context_start) = self.chunk_at_byte(pos - 1);
                    cursor.provide_context(context, context_start);
                }
                Err(_) => unreachable!("grapheme cursor requested an impossible state"),
            }
        }

        // Strictly inside a cluster: move to one of its edges.
        if prefer_cluster_end {
            loop {
                match cursor.next_boundary(chunk, chunk_start) {
                    Ok(Some(boundary)) => return Index::at(boundary),
                    Ok(None) => return Index::at(len),
                    Err(GraphemeIncomplete::NextChunk) => {
                        let at = chunk_start + chunk.len();
                        let (next, next_start) = self.chunk_at_byte(at);
                        chunk = next;
                        chunk_start = next_start;
                        debug_assert_eq!(chunk_start, at);
                    }
                    Err(GraphemeIncomplete::PreContext(pos)) => {
                        let (context, context_start) = self.chunk_at_byte(pos - 1);
                        cursor.provide_context(context, context_start);
                    }
                    Err(_) => unreachable!("grapheme cursor requested an impossible state"),
                }
            }
        } else {
            loop {
                match cursor.prev_boundary(chunk, chunk_start) {
                    Ok(Some(boundary)) => return Index::at(boundary),
                    Ok(None) => return Index::at(0),
                    Err(GraphemeIncomplete::PrevChunk) => {
                        let (prev, prev_start) = self.chunk_at_byte(chunk_start - 1);
                        chunk = prev;
                        chunk_start = prev_start;
                    }
                    Err(GraphemeIncomplete::PreContext(pos)) => {
                        let (context, context_start) = self.chunk_at_byte(pos - 1);
                        cursor.provide_context(context, context_start);
                    }
                    Err(_) => unreachable!("grapheme cursor requested an impossible state"),
                }
            }
        }
    }
}
