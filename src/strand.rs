//! Wrapper module for [`Strand`] and its [`Summary`]

use crate::chunk::Chunk;
use crate::index::Index;
use crate::iter::{Chunks, Graphemes};
use crate::tree::Node;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// The default maximum chunk size, in bytes
///
/// Text built with [`Strand::from_str`] is cut into pieces of at most this many bytes.
/// There's nothing magic about the value; it just keeps individual allocations at a size
/// where copies during construction stay cheap and tree depth stays small.
const CHUNK_SIZE: usize = 1024;

/// An immutable, persistent string stored as a tree of chunks
///
/// A `Strand` never changes after construction. Cloning one is O(1) and shares the
/// underlying tree -- two clones are *structurally identical*, which every comparison
/// routine uses as a fast accept (see [`is_identical_to`]). Slicing shares the backing
/// allocations of the chunks it covers, so a strand and a slice of it cost far less than
/// two independent strings.
///
/// Aggregate statistics -- total byte length and total grapheme-cluster count -- are
/// computed when the strand is built and stored in its [`Summary`], so both are O(1) to
/// read thereafter.
///
/// [`is_identical_to`]: Self::is_identical_to
#[derive(Clone)]
pub struct Strand {
    root: Arc<Node>,
    summary: Summary,
}

/// Precomputed aggregate statistics for a [`Strand`]
///
/// The values are exact: `bytes` is the length of the strand's UTF-8 encoding and
/// `graphemes` is the number of extended grapheme clusters in it. Comparisons use these
/// for early rejection -- two strands with different summaries cannot have equal content.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Total length of the UTF-8 encoding, in bytes
    pub bytes: usize,
    /// Total number of extended grapheme clusters
    pub graphemes: usize,
}

impl Strand {
    /// Creates an empty `Strand`
    pub fn new() -> Self {
        Strand {
            root: Node::build(&[]),
            summary: Summary {
                bytes: 0,
                graphemes: 0,
            },
        }
    }

    /// Creates a `Strand` from a string, chunked at the default granularity
    pub fn from_str(text: &str) -> Self {
        Strand::from_str_chunked(text, CHUNK_SIZE)
    }

    /// Creates a `Strand` from a string with an explicit maximum chunk size
    ///
    /// Chunks are cut at scalar-value boundaries, so an individual chunk may fall short
    /// of `chunk_size` (or exceed it, when a single scalar is wider than the requested
    /// size). All chunks reference a single shared allocation of `text`.
    ///
    /// Content and comparison results never depend on the chunking; this method exists so
    /// that callers (and tests) can control storage granularity directly.
    pub fn from_str_chunked(text: &str, chunk_size: usize) -> Self {
        if text.is_empty() {
            return Strand::new();
        }

        let backing: Arc<str> = Arc::from(text);
        let mut chunks = Vec::with_capacity(text.len() / chunk_size.max(1) + 1);

        let mut pos = 0;
        while pos < text.len() {
            let mut end = (pos + chunk_size.max(1)).min(text.len());
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            if end <= pos {
                // A single scalar wider than `chunk_size`; take it whole.
                end = pos + 1;
                while !text.is_char_boundary(end) {
                    end += 1;
                }
            }

            chunks.push(Chunk::of_backing(&backing, pos..end));
            pos = end;
        }

        Strand {
            root: Node::build(&chunks),
            summary: Summary {
                bytes: text.len(),
                graphemes: text.graphemes(true).count(),
            },
        }
    }

    /// Produces the sub-strand covering the given byte range
    ///
    /// The new strand shares the backing allocations of every chunk it covers, but gets a
    /// tree of its own: a slice is never structurally identical to its parent, even when
    /// the range covers the whole strand.
    ///
    /// Grapheme segmentation restarts at the start of the slice, so the slice's grapheme
    /// count (and grapheme-wise comparisons against it) may disagree with the clusters the
    /// parent had over the same bytes -- cluster boundaries are not stable under slicing.
    ///
    /// ## Panics
    ///
    /// Panics if the range is out of bounds, inverted, or does not lie on scalar-value
    /// boundaries.
    pub fn slice(&self, range: Range<usize>) -> Self {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "byte range {}..{} out of bounds of strand of length {}",
            range.start,
            range.end,
            self.len(),
        );
        assert!(
            self.is_scalar_boundary(range.start) && self.is_scalar_boundary(range.end),
            "byte range {}..{} does not lie on scalar-value boundaries",
            range.start,
            range.end,
        );

        let chunks = self.root.chunks_in_range(range.start, range.end);
        let mut strand = Strand {
            root: Node::build(&chunks),
            summary: Summary {
                bytes: range.end - range.start,
                graphemes: 0,
            },
        };

        // Re-segment the new extent. Counting streams over the shared chunks; nothing is
        // copied.
        strand.summary.graphemes = strand.graphemes().count();
        strand
    }

    /// Returns whether `self` and `other` are backed by the identical tree
    ///
    /// This is *structural identity*, not content equality: it holds between clones (and
    /// a value and itself), never between independently built strands -- even ones with
    /// equal content. O(1); every comparison uses it as a fast accept, never as the sole
    /// equality test.
    pub fn is_identical_to(&self, other: &Strand) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Returns the strand's precomputed [`Summary`]
    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Returns the total length of the strand, in bytes
    pub fn len(&self) -> usize {
        self.summary.bytes
    }

    /// Returns true iff the strand contains no text
    pub fn is_empty(&self) -> bool {
        self.summary.bytes == 0
    }

    /// Returns the total number of extended grapheme clusters in the strand
    pub fn grapheme_count(&self) -> usize {
        self.summary.graphemes
    }

    /// Returns a cursor over the strand's chunks
    ///
    /// The cursor yields each maximal contiguous buffer of the strand's UTF-8 encoding in
    /// order, with no gaps or overlaps. Every yielded buffer is non-empty; an exhausted
    /// cursor yields nothing further. Chunk boundaries are a storage detail -- two equal
    /// strands may be chunked completely differently.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(&self.root)
    }

    /// Returns a cursor over the strand's grapheme clusters
    pub fn graphemes(&self) -> Graphemes<'_> {
        Graphemes::new(self)
    }

    /// Returns a cursor over the strand's grapheme clusters, starting at `index`
    pub fn graphemes_from(&self, index: Index) -> Graphemes<'_> {
        Graphemes::from_index(self, index)
    }

    /// (*Internal*) Returns the chunk containing byte `offset` and its starting offset
    pub(crate) fn chunk_at_byte(&self, offset: usize) -> (&str, usize) {
        self.root.chunk_at_byte(offset)
    }

    /// (*Internal*) Whether `offset` lies on a scalar-value boundary
    fn is_scalar_boundary(&self, offset: usize) -> bool {
        if offset == 0 || offset == self.len() {
            return true;
        }
        let (chunk, start) = self.chunk_at_byte(offset);
        chunk.is_char_boundary(offset - start)
    }

    /// (*Internal*) The tree root, for cursors that walk it directly
    pub(crate) fn root(&self) -> &Node {
        &self.root
    }
}

impl Default for Strand {
    fn default() -> Self {
        Strand::new()
    }
}

impl From<&str> for Strand {
    fn from(text: &str) -> Self {
        Strand::from_str(text)
    }
}

impl From<String> for Strand {
    fn from(text: String) -> Self {
        Strand::from_str(&text)
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text: String = self.chunks().collect();
        write!(f, "Strand({:?})", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_round_trips() {
        let text = "Hello there!  How're you doing?  It's a fine day, isn't it?";

        for &size in &[1, 2, 3, 7, 1024] {
            let strand = Strand::from_str_chunked(text, size);
            assert_eq!(strand.to_string(), text);
            assert_eq!(strand.len(), text.len());
        }
    }

    #[test]
    fn summary_is_exact() {
        let strand = Strand::from_str_chunked("né🇫🇷e\u{301}!", 2);
        // 'n', 'é', the French flag (two regional indicators), 'e' + combining acute, '!'
        assert_eq!(
            strand.summary(),
            Summary {
                bytes: 15,
                graphemes: 5,
            }
        );

        assert_eq!(Strand::new().summary(), Summary { bytes: 0, graphemes: 0 });
    }

    #[test]
    fn clones_are_identical_but_rebuilds_are_not() {
        let strand = Strand::from_str("some shared text");
        let copy = strand.clone();
        let rebuilt = Strand::from_str("some shared text");

        assert!(strand.is_identical_to(&copy));
        assert!(strand.is_identical_to(&strand));
        assert!(!strand.is_identical_to(&rebuilt));
    }

    #[test]
    fn slices_share_but_are_not_identical() {
        let strand = Strand::from_str_chunked("say hello to the world", 4);

        let hello = strand.slice(4..9);
        assert_eq!(hello.to_string(), "hello");
        assert_eq!(hello.summary().bytes, 5);
        assert_eq!(hello.summary().graphemes, 5);
        assert!(!hello.is_identical_to(&strand));

        let whole = strand.slice(0..strand.len());
        assert_eq!(whole.to_string(), strand.to_string());
        assert!(!whole.is_identical_to(&strand));
    }

    #[test]
    fn slice_summary_matches_fresh_build() {
        let strand = Strand::from_str_chunked("a🇬🇧b🇯🇵c combining: e\u{301}e\u{301}", 3);

        for &(lo, hi) in &[(0, 5), (1, 9), (5, strand.len()), (0, strand.len())] {
            let sliced = strand.slice(lo..hi);
            let fresh = Strand::from_str(&sliced.to_string());
            assert_eq!(sliced.summary(), fresh.summary());
        }
    }

    #[test]
    #[should_panic]
    fn slice_rejects_out_of_bounds() {
        let _ = Strand::from_str("short").slice(2..9);
    }
}
