//! Comparison routines for [`Strand`]s
//!
//! Two strands can be compared under two independent semantics:
//!
//! * **grapheme-wise** -- element-for-element over extended grapheme clusters, the way a
//!   person counts characters ([`eq_characters`], [`lt_characters`],
//!   [`eq_characters_in`]);
//! * **byte-wise** -- over the raw UTF-8 encoding ([`eq_utf8`], [`lt_utf8`]), which also
//!   backs the `PartialEq`/`Ord` conformances.
//!
//! All of these stream. Strands are routinely enormous and routinely share storage (a
//! strand and a slice of it, or two clones), so every entry point starts with an O(1)
//! structural-identity test, equality adds an O(1) summary rejection, and only then do the
//! walks run -- in time proportional to the first point of difference. Nothing is ever
//! materialized, and chunk boundaries are never assumed to line up between the two sides.
//!
//! [`eq_characters`]: Strand::eq_characters
//! [`eq_characters_in`]: Strand::eq_characters_in
//! [`lt_characters`]: Strand::lt_characters
//! [`eq_utf8`]: Strand::eq_utf8
//! [`lt_utf8`]: Strand::lt_utf8

use crate::index::Index;
use crate::strand::Strand;
use std::cmp::Ordering;
use std::ops::Range;

////////////////////////////
// Grapheme-wise walks    //
////////////////////////////

impl Strand {
    /// Returns whether the two strands' grapheme-cluster sequences are identical
    ///
    /// Comparison is cluster-for-cluster, not normalization-aware: two strands that are
    /// canonically equivalent under unicode normalization but differ byte-for-byte (say,
    /// precomposed `"é"` against `"e\u{301}"`) compare *unequal*. Callers relying on
    /// normalized comparison must normalize before building the strands.
    pub fn eq_characters(&self, other: &Strand) -> bool {
        if self.is_identical_to(other) {
            return true;
        }
        if self.summary().graphemes != other.summary().graphemes {
            return false;
        }

        let mut lhs = self.graphemes();
        let mut rhs = other.graphemes();

        loop {
            match (lhs.next(), rhs.next()) {
                (Some(a), Some(b)) => {
                    if a.as_str() != b.as_str() {
                        return false;
                    }
                }
                (None, None) => return true,
                // The cluster counts matched above, so the cursors must exhaust together;
                // anything else means the storage under us is broken.
                (a, b) => {
                    log::error!(
                        "Strand::eq_characters: invalid state: cursors exhausted unevenly \
                         ({} vs {}) after cluster counts matched",
                        a.is_some(),
                        b.is_some(),
                    );
                    panic!("grapheme cursors fell out of step despite equal cluster counts");
                }
            }
        }
    }

    /// Returns whether the grapheme-cluster sequence of `range` within `self` equals that
    /// of `other_range` within `other`
    ///
    /// This is substring equality without the substrings: both sides stream from their
    /// range's lower bound and stop at its upper bound, so nothing is copied. The ranges
    /// may sit at completely different positions (and in strands of different lengths);
    /// only their cluster content matters.
    ///
    /// Bounds are expected to lie on cluster boundaries, as produced by
    /// [`resolve_index`]. If an interior cluster runs past a bound, that whole cluster
    /// still participates in the comparison.
    ///
    /// [`resolve_index`]: Strand::resolve_index
    pub fn eq_characters_in(
        &self,
        range: Range<Index>,
        other: &Strand,
        other_range: Range<Index>,
    ) -> bool {
        if self.is_identical_to(other) && range == other_range {
            return true;
        }
        if range.start >= range.end {
            return other_range.start >= other_range.end;
        }

        let mut lhs = self.graphemes_from(range.start);
        let mut rhs = other.graphemes_from(other_range.start);

        while lhs.is_before(range.end) && rhs.is_before(other_range.end) {
            match (lhs.next(), rhs.next()) {
                (Some(a), Some(b)) => {
                    if a.as_str() != b.as_str() {
                        return false;
                    }
                }
                // A cursor that is before its bound has a cluster left to yield.
                (a, b) => {
                    log::error!(
                        "Strand::eq_characters_in: invalid state: cursor inside its range \
                         yielded nothing ({} vs {})",
                        a.is_some(),
                        b.is_some(),
                    );
                    panic!("grapheme cursor exhausted before reaching its range bound");
                }
            }
        }

        // Equal only if both cursors reached their bound on the same step; one side
        // stopping early means the ranges hold different cluster counts.
        !lhs.is_before(range.end) && !rhs.is_before(other_range.end)
    }

    /// Returns whether `self` orders strictly before `other`, cluster-wise
    ///
    /// Clusters are compared pairwise by scalar-value order, and a strand that is a
    /// proper prefix of another orders first. Unlike equality, ordering gets no
    /// count-based short-circuit: differing cluster counts say nothing about direction
    /// (one sequence may simply be a prefix of the other), so ordering always streams.
    pub fn lt_characters(&self, other: &Strand) -> bool {
        self.cmp_characters(other) == Ordering::Less
    }

    /// The cluster-wise analogue of [`Ord::cmp`]
    pub fn cmp_characters(&self, other: &Strand) -> Ordering {
        if self.is_identical_to(other) {
            return Ordering::Equal;
        }

        let mut lhs = self.graphemes();
        let mut rhs = other.graphemes();

        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => match a.as_str().cmp(b.as_str()) {
                    Ordering::Equal => continue,
                    decided => return decided,
                },
            }
        }
    }
}

////////////////////////////
// Byte-wise walks        //
////////////////////////////

impl Strand {
    /// Returns whether the two strands' UTF-8 encodings are byte-for-byte identical
    pub fn eq_utf8(&self, other: &Strand) -> bool {
        // Unequal summaries can't hold equal bytes; equal bytes force equal summaries.
        if self.summary() != other.summary() {
            return false;
        }
        if self.is_identical_to(other) {
            return true;
        }

        let mut lhs = self.chunks();
        let mut rhs = other.chunks();
        let mut a: &[u8] = &[];
        let mut b: &[u8] = &[];

        loop {
            if a.is_empty() {
                a = lhs.next().map_or(&[], str::as_bytes);
            }
            if b.is_empty() {
                b = rhs.next().map_or(&[], str::as_bytes);
            }

            if a.is_empty() != b.is_empty() {
                // The length check above makes this unreachable; if storage disagrees
                // with its own summary, unequal is the safe answer.
                log::error!(
                    "Strand::eq_utf8: invalid state: chunk walks exhausted unevenly on \
                     strands with equal summaries",
                );
                return false;
            }
            if a.is_empty() {
                return true;
            }

            let common = a.len().min(b.len());
            debug_assert!(common > 0);
            if a[..common] != b[..common] {
                return false;
            }
            a = &a[common..];
            b = &b[common..];
        }
    }

    /// Returns whether `self` orders strictly before `other` in UTF-8 byte order
    ///
    /// The first differing byte pair decides; a strand whose encoding is a proper prefix
    /// of the other's orders first.
    pub fn lt_utf8(&self, other: &Strand) -> bool {
        self.cmp_utf8(other) == Ordering::Less
    }

    /// The byte-wise analogue of [`Ord::cmp`]; backs the `Ord` impl
    pub fn cmp_utf8(&self, other: &Strand) -> Ordering {
        if self.is_identical_to(other) {
            return Ordering::Equal;
        }

        let mut lhs = self.chunks();
        let mut rhs = other.chunks();
        let mut a: &[u8] = &[];
        let mut b: &[u8] = &[];

        loop {
            if a.is_empty() {
                a = lhs.next().map_or(&[], str::as_bytes);
            }
            if b.is_empty() {
                b = rhs.next().map_or(&[], str::as_bytes);
            }

            match (a.is_empty(), b.is_empty()) {
                (true, true) => return Ordering::Equal,
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                (false, false) => {}
            }

            let common = a.len().min(b.len());
            debug_assert!(common > 0);
            match a[..common].cmp(&b[..common]) {
                Ordering::Equal => {
                    a = &a[common..];
                    b = &b[common..];
                }
                decided => return decided,
            }
        }
    }
}

////////////////////////////
// Trait conformances     //
////////////////////////////

// Equality and ordering follow `str` semantics -- byte-wise over the UTF-8 encoding.
// Grapheme-wise comparison stays available through the named methods above.

impl PartialEq for Strand {
    fn eq(&self, other: &Strand) -> bool {
        self.eq_utf8(other)
    }
}

impl Eq for Strand {}

impl PartialOrd for Strand {
    fn partial_cmp(&self, other: &Strand) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Strand {
    fn cmp(&self, other: &Strand) -> Ordering {
        self.cmp_utf8(other)
    }
}

impl PartialEq<str> for Strand {
    fn eq(&self, other: &str) -> bool {
        if self.len() != other.len() {
            return false;
        }

        let mut rest = other.as_bytes();
        for chunk in self.chunks() {
            let (head, tail) = rest.split_at(chunk.len());
            if chunk.as_bytes() != head {
                return false;
            }
            rest = tail;
        }
        rest.is_empty()
    }
}

impl PartialEq<&str> for Strand {
    fn eq(&self, other: &&str) -> bool {
        <Strand as PartialEq<str>>::eq(self, *other)
    }
}

impl PartialEq<Strand> for str {
    fn eq(&self, other: &Strand) -> bool {
        <Strand as PartialEq<str>>::eq(other, self)
    }
}

impl PartialEq<Strand> for &str {
    fn eq(&self, other: &Strand) -> bool {
        <Strand as PartialEq<str>>::eq(other, *self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn strand(text: &str) -> Strand {
        Strand::from_str(text)
    }

    fn chunked(text: &str, size: usize) -> Strand {
        Strand::from_str_chunked(text, size)
    }

    /// A spread of contents that exercise prefixes, multi-scalar clusters, and strings
    /// whose cluster counts and byte lengths disagree about which is "longer".
    const SAMPLES: &[&str] = &[
        "",
        "a",
        "ab",
        "abc",
        "abd",
        "é",
        "e\u{301}",
        "e\u{301}e\u{301}",
        "naïve",
        "🇬🇧",
        "🇬🇧🇯🇵",
        "👨\u{200d}👩\u{200d}👧",
        "hello world",
    ];

    #[test]
    fn reflexive_on_every_sample() {
        for text in SAMPLES {
            let s = strand(text);
            let same = s.clone();

            assert!(s.eq_characters(&same), "{:?}", text);
            assert!(s.eq_utf8(&same), "{:?}", text);
            assert!(!s.lt_characters(&same), "{:?}", text);
            assert!(!s.lt_utf8(&same), "{:?}", text);
        }
    }

    #[test]
    fn identity_short_circuits_regardless_of_content() {
        let s = strand("shared");
        let same = s.clone();

        assert!(s.is_identical_to(&same));
        assert!(s.eq_characters(&same) && s.eq_utf8(&same));
        assert!(!s.lt_characters(&same) && !s.lt_utf8(&same));
    }

    #[test]
    fn equal_content_built_differently() {
        // Same text, two unrelated trees with unrelated chunk boundaries.
        let a = chunked("abc", 1);
        let b = chunked("abc", 1024);

        assert!(!a.is_identical_to(&b));
        assert!(a.eq_characters(&b));
        assert!(a.eq_utf8(&b));
        assert!(!a.lt_characters(&b) && !b.lt_characters(&a));
        assert!(!a.lt_utf8(&b) && !b.lt_utf8(&a));
    }

    #[test]
    fn first_difference_decides_order() {
        let a = strand("abc");
        let b = strand("abd");

        assert!(a.lt_characters(&b));
        assert!(a.lt_utf8(&b));
        assert!(!b.lt_characters(&a));
        assert!(!b.lt_utf8(&a));
    }

    #[test]
    fn proper_prefix_orders_first() {
        let a = strand("ab");
        let b = strand("abc");

        assert!(a.lt_characters(&b));
        assert!(a.lt_utf8(&b));
        assert!(!a.eq_characters(&b));
        assert!(!a.eq_utf8(&b));

        // The empty strand is a proper prefix of everything non-empty.
        let empty = Strand::new();
        assert!(empty.lt_utf8(&b) && empty.lt_characters(&b));
        assert!(!b.lt_utf8(&empty) && !b.lt_characters(&empty));
    }

    #[test]
    fn slices_compare_equal_to_fresh_strands() {
        // Five clusters, some multi-scalar, cut out of a larger strand: different tree,
        // different chunking, equal content.
        let big = chunked("--né🇫🇷e\u{301}x--", 3);
        let sliced = big.slice(2..big.len() - 2);
        let fresh = strand("né🇫🇷e\u{301}x");

        assert_eq!(sliced.grapheme_count(), 5);
        assert!(sliced.eq_characters(&fresh));
        assert!(sliced.eq_utf8(&fresh));
    }

    #[test]
    fn summary_mismatches_reject_immediately() {
        // Same cluster count, different bytes:
        let a = strand("éé");
        let b = strand("ee");
        assert_eq!(a.grapheme_count(), b.grapheme_count());
        assert!(!a.eq_utf8(&b));

        // Different cluster count:
        let c = strand("e\u{301}");
        let d = strand("ee");
        assert_ne!(c.grapheme_count(), d.grapheme_count());
        assert!(!c.eq_characters(&d));

        // Byte length differs while cluster counts match:
        assert_eq!(strand("é").grapheme_count(), strand("e").grapheme_count());
        assert!(!strand("é").eq_utf8(&strand("e")));
    }

    #[test]
    fn trichotomy_both_semantics() {
        for (a_text, b_text) in SAMPLES.iter().cartesian_product(SAMPLES.iter()) {
            let a = strand(a_text);
            let b = strand(b_text);

            let outcomes = [
                (a.lt_characters(&b), b.lt_characters(&a), a.eq_characters(&b)),
                (a.lt_utf8(&b), b.lt_utf8(&a), a.eq_utf8(&b)),
            ];
            for &(less, greater, equal) in &outcomes {
                assert_eq!(
                    [less, greater, equal].iter().filter(|&&x| x).count(),
                    1,
                    "trichotomy violated for {:?} vs {:?}",
                    a_text,
                    b_text,
                );
            }
        }
    }

    #[test]
    fn ordering_is_transitive() {
        for ((a_text, b_text), c_text) in SAMPLES
            .iter()
            .cartesian_product(SAMPLES.iter())
            .cartesian_product(SAMPLES.iter())
        {
            let (a, b, c) = (strand(a_text), strand(b_text), strand(c_text));

            if a.lt_utf8(&b) && b.lt_utf8(&c) {
                assert!(a.lt_utf8(&c), "{:?} {:?} {:?}", a_text, b_text, c_text);
            }
            if a.lt_characters(&b) && b.lt_characters(&c) {
                assert!(a.lt_characters(&c), "{:?} {:?} {:?}", a_text, b_text, c_text);
            }
        }
    }

    #[test]
    fn results_are_chunking_independent() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);

        let pairs = SAMPLES.iter().cartesian_product(SAMPLES.iter());
        for (a_text, b_text) in pairs {
            let expect_eq = strand(a_text).eq_utf8(&strand(b_text));
            let expect_lt = strand(a_text).lt_utf8(&strand(b_text));
            let expect_eq_ch = strand(a_text).eq_characters(&strand(b_text));
            let expect_lt_ch = strand(a_text).lt_characters(&strand(b_text));

            for _ in 0..8 {
                let a = chunked(a_text, rng.gen_range(1..6));
                let b = chunked(b_text, rng.gen_range(1..6));

                assert_eq!(a.eq_utf8(&b), expect_eq, "{:?} vs {:?}", a_text, b_text);
                assert_eq!(a.lt_utf8(&b), expect_lt, "{:?} vs {:?}", a_text, b_text);
                assert_eq!(a.eq_characters(&b), expect_eq_ch, "{:?} vs {:?}", a_text, b_text);
                assert_eq!(a.lt_characters(&b), expect_lt_ch, "{:?} vs {:?}", a_text, b_text);
            }
        }
    }

    ////////////////////////////
    // Range comparison       //
    ////////////////////////////

    /// Byte range -> index range, with cluster-start snapping
    fn range_in(s: &Strand, lo: usize, hi: usize) -> Range<Index> {
        s.resolve_index(lo, false)..s.resolve_index(hi, false)
    }

    #[test]
    fn equal_substrings_at_different_positions() {
        let a = chunked("hello world", 3);
        let b = chunked("say hello", 2);

        // "hello" in both, at offsets 0 and 4.
        assert!(a.eq_characters_in(range_in(&a, 0, 5), &b, range_in(&b, 4, 9)));
        // Shifting either range off by one breaks it.
        assert!(!a.eq_characters_in(range_in(&a, 0, 5), &b, range_in(&b, 4, 8)));
        assert!(!a.eq_characters_in(range_in(&a, 1, 5), &b, range_in(&b, 4, 9)));
    }

    #[test]
    fn identical_strands_with_equal_ranges_short_circuit() {
        let a = chunked("some strand", 4);
        let same = a.clone();

        let r = range_in(&a, 2, 7);
        assert!(a.eq_characters_in(r.clone(), &same, r.clone()));

        // Identity of the strands says nothing about distinct ranges.
        assert!(!a.eq_characters_in(range_in(&a, 0, 4), &same, range_in(&same, 5, 9)));
    }

    #[test]
    fn empty_ranges_equal_only_each_other() {
        let a = strand("abc");
        let b = strand("totally different");

        assert!(a.eq_characters_in(range_in(&a, 1, 1), &b, range_in(&b, 5, 5)));
        assert!(!a.eq_characters_in(range_in(&a, 1, 1), &b, range_in(&b, 0, 3)));
        assert!(!a.eq_characters_in(range_in(&a, 0, 3), &b, range_in(&b, 5, 5)));

        // Empty vs non-empty under byte ordering: non-empty is greater.
        let empty = Strand::new();
        assert!(empty.lt_utf8(&a));
        assert!(!a.lt_utf8(&empty));
    }

    #[test]
    fn range_equality_agrees_with_materialized_comparison() {
        let texts = ["ae\u{301}o🇬🇧🇯🇵 stray e\u{301}nd", "hello e\u{301}o🇬🇧 world"];
        let mut rng = SmallRng::seed_from_u64(0xc0ffee);

        for _ in 0..64 {
            let a_text = texts[rng.gen_range(0..texts.len())];
            let b_text = texts[rng.gen_range(0..texts.len())];
            let a = chunked(a_text, rng.gen_range(1..5));
            let b = chunked(b_text, rng.gen_range(1..5));

            // Random bounds, snapped to cluster starts like any caller would.
            let (a_lo, a_hi) = sorted_pair(&mut rng, a.len());
            let (b_lo, b_hi) = sorted_pair(&mut rng, b.len());
            let ra = range_in(&a, a_lo, a_hi);
            let rb = range_in(&b, b_lo, b_hi);

            let expected = materialize(&a, ra.clone()) == materialize(&b, rb.clone());
            assert_eq!(
                a.eq_characters_in(ra, &b, rb),
                expected,
                "{:?}[{}..{}] vs {:?}[{}..{}]",
                a_text,
                a_lo,
                a_hi,
                b_text,
                b_lo,
                b_hi,
            );
        }
    }

    fn sorted_pair(rng: &mut SmallRng, max: usize) -> (usize, usize) {
        let x = rng.gen_range(0..=max);
        let y = rng.gen_range(0..=max);
        (x.min(y), x.max(y))
    }

    /// The clusters of a range, by full iteration -- the slow path the streaming
    /// comparator must agree with.
    fn materialize(s: &Strand, range: Range<Index>) -> Vec<String> {
        let mut out = Vec::new();
        if range.start >= range.end {
            return out;
        }
        let mut graphemes = s.graphemes_from(range.start);
        while graphemes.is_before(range.end) {
            out.push(graphemes.next().unwrap().as_str().to_owned());
        }
        out
    }

    ////////////////////////////
    // Conformances           //
    ////////////////////////////

    #[test]
    fn std_traits_follow_byte_semantics() {
        let a = chunked("alpha", 2);
        let b = chunked("alpha", 3);
        let c = chunked("beta", 1);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
        assert_eq!(a.cmp(&b), Ordering::Equal);

        let mut sorted = vec![strand("b"), strand("a"), strand("ab"), Strand::new()];
        sorted.sort();
        let sorted: Vec<_> = sorted.iter().map(|s| s.to_string()).collect();
        assert_eq!(sorted, vec!["", "a", "ab", "b"]);
    }

    #[test]
    fn comparing_against_plain_strings() {
        let s = chunked("chunked content", 4);

        assert_eq!(s, "chunked content");
        assert_eq!("chunked content", s);
        assert_ne!(s, "chunked c0ntent");
        assert_ne!(s, "chunked");
    }
}
