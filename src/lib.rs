//! A persistent, chunked Unicode string with streaming comparison
//!
//! The central type here is [`Strand`]: an immutable string value stored as a tree of text
//! chunks. Cloning a `Strand` is O(1) and shares the underlying tree; slicing shares the
//! backing allocations of the chunks it covers. Because large strands routinely share
//! storage with one another, the comparison routines never materialize either operand --
//! they stream, and they stop at the first point of difference.
//!
//! Two comparison semantics are provided, side by side:
//!
//! * *Grapheme-wise* ("character") comparison, matching human-perceived text units:
//!   [`Strand::eq_characters`], [`Strand::lt_characters`], and the range-restricted
//!   [`Strand::eq_characters_in`].
//! * *Byte-wise* UTF-8 comparison, matching binary semantics: [`Strand::eq_utf8`] and
//!   [`Strand::lt_utf8`]. These also back the `PartialEq`/`Ord` impls, so `a == b` and
//!   `a < b` compare byte content the way `str` does.
//!
//! Neither semantics is normalization-aware: two strands that are canonically equivalent
//! under Unicode normalization but differ byte-for-byte compare unequal. See the note on
//! [`Strand::eq_characters`].

#![warn(clippy::style, clippy::perf)]
#![deny(unused_must_use)]

mod chunk;
mod compare;
mod index;
mod iter;
mod strand;
mod tree;

pub use crate::chunk::Chunk;
pub use crate::index::Index;
pub use crate::iter::{Chunks, Cluster, Graphemes};
pub use crate::strand::{Strand, Summary};
