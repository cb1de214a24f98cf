//! Wrapper module for [`Chunk`]

use smallstr::SmallString;
use std::ops::{Deref, Range};
use std::sync::Arc;

/// The maximum allowed size of an inlined [`Chunk`], in bytes
pub(crate) const INLINE_SIZE: usize = 16;

/// An immutable piece of text, inlined or reference-counted
///
/// Large `Chunk`s are represented by a range of an `Arc<str>`, so that many chunks -- and
/// many strands -- can reference pieces of the same allocation. Smaller pieces of text
/// (with length at most [`INLINE_SIZE`]) are stored locally, so that we don't "waste" heap
/// allocations on very small chunks.
///
/// A `Chunk` always covers whole unicode scalar values; it derefs to `str`. Chunks are
/// never mutated after construction -- narrowing one with [`narrow`] produces a new chunk
/// that references the same backing allocation.
///
/// [`narrow`]: Self::narrow
#[derive(Clone)]
pub struct Chunk(Repr);

/// The internal representation of a `Chunk`
#[derive(Clone)]
enum Repr {
    Shared {
        backing: Arc<str>,
        // Storing the range (instead of a second `Arc<str>` narrowed up front) lets every
        // chunk cut from the same text keep a single backing allocation alive.
        range: Range<usize>,
    },
    Inline(SmallString<[u8; INLINE_SIZE]>),
}

impl Chunk {
    /// Constructs a new `Chunk`, storing the text locally if it's small enough
    pub fn new(text: &str) -> Self {
        if text.len() <= INLINE_SIZE {
            Chunk(Repr::Inline(SmallString::from_str(text)))
        } else {
            Chunk(Repr::Shared {
                backing: Arc::from(text),
                range: 0..text.len(),
            })
        }
    }

    /// (*Internal*) Constructs a `Chunk` referencing a range of an existing allocation
    ///
    /// The range must lie on scalar-value boundaries of the backing text.
    pub(crate) fn of_backing(backing: &Arc<str>, range: Range<usize>) -> Self {
        debug_assert!(backing.is_char_boundary(range.start));
        debug_assert!(backing.is_char_boundary(range.end));

        Chunk(Repr::Shared {
            backing: backing.clone(),
            range,
        })
    }

    /// Returns the length of the chunk, in bytes
    pub fn len(&self) -> usize {
        match &self.0 {
            Repr::Shared { range, .. } => range.len(),
            Repr::Inline(text) => text.len(),
        }
    }

    /// Returns true iff the chunk contains no text
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the chunk's text
    pub fn as_str(&self) -> &str {
        match &self.0 {
            Repr::Shared { backing, range } => &backing[range.clone()],
            Repr::Inline(text) => text.as_str(),
        }
    }

    /// Produces a sub-chunk covering `range` (relative to this chunk)
    ///
    /// Shared chunks stay shared -- the new chunk references the same backing allocation.
    /// The range must lie on scalar-value boundaries.
    pub(crate) fn narrow(&self, range: Range<usize>) -> Self {
        match &self.0 {
            Repr::Shared {
                backing,
                range: own,
            } => {
                debug_assert!(range.end <= own.len());
                Chunk::of_backing(backing, own.start + range.start..own.start + range.end)
            }
            Repr::Inline(text) => Chunk::new(&text.as_str()[range]),
        }
    }
}

impl Deref for Chunk {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}
