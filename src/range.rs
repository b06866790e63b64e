use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::error::ViewError;

///
/// A range given in "slice notation", i.e. by an optional start, an optional stop
/// and an optional step. Negative endpoints count from the end of the sequence.
///
/// Usually, there is no need to construct this directly, since all standard ranges
/// over `isize` convert into it via [`IntoSliceRange`]. It is only required to express
/// a step, which is then rejected by every view operation, as views are contiguous.
///
/// # Example
/// ```rust
/// # use seqview::*;
/// # use seqview::range::*;
/// let mut data = vec![0, 1, 2, 3, 4, 5];
/// assert_eq!(SliceRange::new(Some(1), Some(-1)), IntoSliceRange::into_slice_range(1..-1));
/// assert_eq!(
///     Err(ViewError::InvalidRange { step: 2 }),
///     make_view(&mut data).range(SliceRange::full().step_by(2)).map(|view| view.len())
/// );
/// ```
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SliceRange {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>
}

impl SliceRange {

    pub const fn new(start: Option<isize>, stop: Option<isize>) -> Self {
        SliceRange { start: start, stop: stop, step: None }
    }

    pub const fn full() -> Self {
        Self::new(None, None)
    }

    pub const fn step_by(self, step: isize) -> Self {
        SliceRange { start: self.start, stop: self.stop, step: Some(step) }
    }

    fn check_contiguous(&self) -> Result<(), ViewError> {
        match self.step {
            None | Some(1) => Ok(()),
            Some(step) => Err(ViewError::InvalidRange { step: step })
        }
    }

    ///
    /// Resolves the range against a sequence of length `len`, as done when creating a
    /// view. Omitted endpoints are replaced by `0` resp. `len`, and `len` is added to
    /// negative endpoints until they are nonnegative.
    ///
    /// Returns `(start, length)`, which is not yet checked against the bounds. In particular,
    /// the length may be zero or negative.
    ///
    pub(crate) fn resolve_wrapping(&self, len: usize) -> Result<(isize, isize), ViewError> {
        self.check_contiguous()?;
        let wrap = |i: isize| if i >= 0 {
            Ok(i)
        } else if len == 0 {
            Err(ViewError::StartOutOfBounds { start: i, len: len })
        } else {
            Ok(i.rem_euclid(len as isize))
        };
        let start = wrap(self.start.unwrap_or(0))?;
        let stop = wrap(self.stop.unwrap_or(len as isize))?;
        return Ok((start, stop - start));
    }

    ///
    /// Resolves the range relative to a view of length `len`, as done when reading or
    /// assigning a range of a view. Omitted endpoints are replaced by `0` resp. `len`,
    /// negative endpoints are reduced modulo `len`, and nonnegative endpoints must not
    /// exceed `len`. If the stop comes before the start, the range is empty.
    ///
    pub(crate) fn resolve_within(&self, len: usize) -> Result<Range<usize>, ViewError> {
        debug_assert!(len > 0);
        self.check_contiguous()?;
        let normalize = |i: isize| if i < 0 {
            Ok(i.rem_euclid(len as isize) as usize)
        } else if i as usize <= len {
            Ok(i as usize)
        } else {
            Err(ViewError::IndexOutOfRange { index: i, length: len })
        };
        let start = normalize(self.start.unwrap_or(0))?;
        let stop = normalize(self.stop.unwrap_or(len as isize))?;
        return Ok(start..stop.max(start));
    }
}

///
/// Trait for all types that describe a contiguous range in slice notation, see [`SliceRange`].
///
pub trait IntoSliceRange {

    fn into_slice_range(self) -> SliceRange;
}

impl IntoSliceRange for SliceRange {

    fn into_slice_range(self) -> SliceRange {
        self
    }
}

impl IntoSliceRange for Range<isize> {

    fn into_slice_range(self) -> SliceRange {
        SliceRange::new(Some(self.start), Some(self.end))
    }
}

impl IntoSliceRange for RangeFrom<isize> {

    fn into_slice_range(self) -> SliceRange {
        SliceRange::new(Some(self.start), None)
    }
}

impl IntoSliceRange for RangeTo<isize> {

    fn into_slice_range(self) -> SliceRange {
        SliceRange::new(None, Some(self.end))
    }
}

impl IntoSliceRange for RangeFull {

    fn into_slice_range(self) -> SliceRange {
        SliceRange::full()
    }
}

///
/// An inclusive end of `-1` refers to the last element, so the range extends to the
/// end of the sequence. An inclusive end of `isize::MAX` saturates, which is behind the
/// end of every sequence anyway.
///
fn inclusive_stop(end: isize) -> Option<isize> {
    if end == -1 {
        None
    } else {
        Some(end.checked_add(1).unwrap_or(isize::MAX))
    }
}

impl IntoSliceRange for RangeInclusive<isize> {

    fn into_slice_range(self) -> SliceRange {
        SliceRange::new(Some(*self.start()), inclusive_stop(*self.end()))
    }
}

impl IntoSliceRange for RangeToInclusive<isize> {

    fn into_slice_range(self) -> SliceRange {
        SliceRange::new(None, inclusive_stop(self.end))
    }
}

#[cfg(test)]
fn slice<R: IntoSliceRange>(range: R) -> SliceRange {
    range.into_slice_range()
}

#[test]
fn test_resolve_wrapping() {
    assert_eq!(Ok((0, 8)), slice(..).resolve_wrapping(8));
    assert_eq!(Ok((0, 7)), slice(0..-1).resolve_wrapping(8));
    assert_eq!(Ok((0, 8)), slice(-8..).resolve_wrapping(8));
    assert_eq!(Ok((1, 3)), slice(1..4).resolve_wrapping(5));
    assert_eq!(Ok((3, -2)), slice(3..1).resolve_wrapping(5));
    assert_eq!(Ok((2, 1)), slice(-13..-12).resolve_wrapping(5));
    assert_eq!(Ok((1, 4)), slice(1..=-1).resolve_wrapping(5));
    assert_eq!(Ok((0, 3)), slice(..=2).resolve_wrapping(5));
}

#[test]
fn test_resolve_wrapping_empty_sequence() {
    assert_eq!(Ok((0, 0)), slice(..).resolve_wrapping(0));
    assert_eq!(Err(ViewError::StartOutOfBounds { start: -1, len: 0 }), slice(-1..).resolve_wrapping(0));
}

#[test]
fn test_resolve_rejects_step() {
    assert_eq!(Err(ViewError::InvalidRange { step: 2 }), SliceRange::full().step_by(2).resolve_wrapping(5));
    assert_eq!(Err(ViewError::InvalidRange { step: -1 }), SliceRange::full().step_by(-1).resolve_within(5));
    assert_eq!(Ok((0, 5)), SliceRange::full().step_by(1).resolve_wrapping(5));
}

#[test]
fn test_resolve_within() {
    assert_eq!(Ok(0..9), slice(..).resolve_within(9));
    assert_eq!(Ok(1..8), slice(1..-1).resolve_within(9));
    assert_eq!(Ok(7..9), slice(-2..).resolve_within(9));
    assert_eq!(Ok(2..2), slice(2..1).resolve_within(9));
    assert_eq!(Ok(7..7), slice(-11..3).resolve_within(9));
    assert_eq!(Ok(9..9), slice(9..).resolve_within(9));
    assert_eq!(Err(ViewError::IndexOutOfRange { index: 10, length: 9 }), slice(0..10).resolve_within(9));
}

#[test]
fn test_inclusive_end_saturates() {
    assert_eq!(SliceRange::new(Some(0), Some(isize::MAX)), slice(0..=isize::MAX));
    assert_eq!(SliceRange::new(None, Some(isize::MAX)), slice(..=isize::MAX));
    assert_eq!(Ok((2, isize::MAX - 2)), slice(2..=isize::MAX).resolve_wrapping(5));
    assert_eq!(Err(ViewError::IndexOutOfRange { index: isize::MAX, length: 9 }), slice(..=isize::MAX).resolve_within(9));
    assert_eq!(Err(ViewError::IndexOutOfRange { index: isize::MAX, length: 9 }), slice(3..=isize::MAX).resolve_within(9));
}
