//! The half-open range primitive every layer is built on.
//!
//! Offsets are byte positions in one shared text coordinate space. Tokens,
//! sentences, documents and annotations all expose their range through the
//! [`Spanned`] trait so range queries can be written once.

use serde::{Deserialize, Serialize};

use crate::RangeError;

/// A half-open `[begin, end)` range.
///
/// `end >= begin` always holds for a `Span` built through [`Span::new`] or
/// one of the setters; setters that would invert the range return
/// [`RangeError::Inverted`] and leave the span untouched.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "SpanRecord")]
pub struct Span {
    begin: usize,
    end: usize,
}

#[derive(Deserialize)]
struct SpanRecord {
    begin: usize,
    end: usize,
}

impl TryFrom<SpanRecord> for Span {
    type Error = RangeError;

    fn try_from(record: SpanRecord) -> Result<Self, Self::Error> {
        Span::new(record.begin, record.end)
    }
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Result<Self, RangeError> {
        if end < begin {
            return Err(RangeError::Inverted { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// A span of `length` starting at `begin`. Cannot be inverted; `end`
    /// saturates at `usize::MAX`.
    pub fn with_length(begin: usize, length: usize) -> Self {
        Self {
            begin,
            end: begin.saturating_add(length),
        }
    }

    /// Like [`Span::with_length`], failing instead of saturating.
    pub fn checked_with_length(begin: usize, length: usize) -> Result<Self, RangeError> {
        let end = begin
            .checked_add(length)
            .ok_or(RangeError::Overflow { begin, length })?;
        Ok(Self { begin, end })
    }

    /// A zero-length span at `pos`.
    pub fn empty_at(pos: usize) -> Self {
        Self {
            begin: pos,
            end: pos,
        }
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn length(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Move `begin`, keeping `end`.
    pub fn set_begin(&mut self, begin: usize) -> Result<(), RangeError> {
        if begin > self.end {
            return Err(RangeError::Inverted {
                begin,
                end: self.end,
            });
        }
        self.begin = begin;
        Ok(())
    }

    /// Move `end`, keeping `begin`.
    pub fn set_end(&mut self, end: usize) -> Result<(), RangeError> {
        if end < self.begin {
            return Err(RangeError::Inverted {
                begin: self.begin,
                end,
            });
        }
        self.end = end;
        Ok(())
    }

    /// Derive `end` from `begin + length`, saturating.
    pub fn set_length(&mut self, length: usize) {
        self.end = self.begin.saturating_add(length);
    }

    /// The same length, starting at `begin`.
    pub fn moved_to(&self, begin: usize) -> Self {
        Self::with_length(begin, self.length())
    }

    /// `delta` bytes further right. Both ends saturate at `usize::MAX`.
    pub fn shifted(&self, delta: usize) -> Self {
        Self {
            begin: self.begin.saturating_add(delta),
            end: self.end.saturating_add(delta),
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &Span) -> Self {
        Self {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// `begin <= pos < end`
    pub fn contains(&self, pos: usize) -> bool {
        self.begin <= pos && pos < self.end
    }

    /// True if `other` lies fully inside this span.
    pub fn encloses(&self, other: &Span) -> bool {
        other.begin >= self.begin && other.end <= self.end
    }

    /// True if the two spans share at least one position.
    pub fn overlaps(&self, other: &Span) -> bool {
        overlap_length(self, other) > 0
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

/// Number of positions shared by `a` and `b`, zero when they are disjoint.
pub fn overlap_length(a: &Span, b: &Span) -> usize {
    let begin = a.begin.max(b.begin);
    let end = a.end.min(b.end);
    end.saturating_sub(begin)
}

/// Anything that occupies a range of the shared text coordinate space.
pub trait Spanned {
    fn span(&self) -> Span;

    fn begin(&self) -> usize {
        self.span().begin()
    }

    fn end(&self) -> usize {
        self.span().end()
    }

    fn length(&self) -> usize {
        self.span().length()
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

/// Selection policy for range queries over sentences and tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangePolicy {
    /// Only items fully inside `[begin, end]`.
    Enclosed,
    /// Any item intersecting the window, including ones straddling either boundary.
    Overlapping,
}

impl RangePolicy {
    /// `true` selects [`RangePolicy::Enclosed`].
    pub fn from_enclosed(enclosed: bool) -> Self {
        if enclosed {
            RangePolicy::Enclosed
        } else {
            RangePolicy::Overlapping
        }
    }

    /// Whether `item` is selected by a query over `[begin, end]`.
    ///
    /// The overlapping policy is the union of three clauses: the item starts
    /// at or before `begin` and ends after it; the item lies inside a
    /// non-degenerate window; the item starts before `end` and ends at or
    /// after it. A degenerate window (`begin == end`) never matches the
    /// middle clause.
    pub fn selects(self, item: &Span, begin: usize, end: usize) -> bool {
        match self {
            RangePolicy::Enclosed => item.begin >= begin && item.end <= end,
            RangePolicy::Overlapping => {
                (item.begin <= begin && item.end > begin)
                    || (item.begin >= begin && item.end <= end && begin != end)
                    || (item.begin < end && item.end >= end)
            }
        }
    }

    /// Filter any spanned sequence by this policy.
    pub fn select<'a, S, I>(self, items: I, begin: usize, end: usize) -> impl Iterator<Item = &'a S>
    where
        S: Spanned + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        items
            .into_iter()
            .filter(move |item| self.selects(&item.span(), begin, end))
    }
}
