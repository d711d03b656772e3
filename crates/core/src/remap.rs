//! Mapping offsets in rewritten text back to the original text.
//!
//! The engine reports matches against the expanded text. Outside of rewritten
//! tokens the two texts differ only by the accumulated length delta of the
//! rewrites seen so far. Inside a rewritten token there is no meaningful
//! original offset, so a boundary that lands there snaps to the edge of the
//! whole original token: a start snaps to the token's start, an end to its end.

use crate::types::{RewriteRecord, Span};

/// Which end of a range a position is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Inclusive start; a record owns the positions `[start, end)`.
    Start,
    /// Exclusive end; a record owns the positions `(start, end]`.
    End,
}

/// Map a single rewritten-text position to the original text.
///
/// `records` must be in left-to-right order, as produced by
/// [`ShorthandTable::expand`](crate::ShorthandTable::expand).
#[must_use]
pub fn remap_position(position: usize, edge: Edge, records: &[RewriteRecord]) -> usize {
    // Last point known to coincide in both texts.
    let mut anchor_rewritten = 0;
    let mut anchor_original = 0;

    for r in records {
        let inside = match edge {
            Edge::Start => position >= r.rewritten_start && position < r.rewritten_end,
            Edge::End => position > r.rewritten_start && position <= r.rewritten_end,
        };
        if inside {
            return match edge {
                Edge::Start => r.original_start,
                Edge::End => r.original_end,
            };
        }
        if position < r.rewritten_end {
            // At or before this record's start; later records start later still.
            break;
        }
        anchor_rewritten = r.rewritten_end;
        anchor_original = r.original_end;
    }

    anchor_original + (position - anchor_rewritten)
}

/// Map a rewritten-text range to the original text.
///
/// Both ends are mapped independently with the same records.
///
/// ```
/// use datemark_core::{expand, remap};
///
/// let expansion = expand("call mom tom");
/// // "tomorrow" sits at 9..17 in "call mom tomorrow".
/// let span = remap(9, 17, &expansion.records);
/// assert_eq!((span.start, span.end), (9, 12));
/// ```
#[must_use]
pub fn remap(rewritten_start: usize, rewritten_end: usize, records: &[RewriteRecord]) -> Span {
    Span::new(
        remap_position(rewritten_start, Edge::Start, records),
        remap_position(rewritten_end, Edge::End, records),
    )
}
