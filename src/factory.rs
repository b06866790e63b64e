use std::fmt::Debug;
use std::marker::PhantomData;

use tracing::debug;

use crate::error::ViewError;
use crate::range::{IntoSliceRange, SliceRange};
use crate::seq::Backing;
use crate::view::{check_bounds, View};

///
/// Creates [`View`]s on a collection, or on the range of a collection covered by
/// another view. Obtained from [`crate::make_view()`] or [`View::subview()`], and
/// consumed when creating a view.
///
/// Ranges are given relative to the target: for a factory created by [`View::subview()`],
/// index `0` refers to the first element of the view. The created views however always
/// refer directly to the underlying collection.
///
/// # Example
/// ```rust
/// # use seqview::*;
/// let mut data = [0, 1, 2, 3, 4, 5, 6, 7];
/// assert_eq!(vec![0, 1, 2, 3, 4, 5, 6], make_view(&mut data).range(0..-1).unwrap().iter().collect::<Vec<_>>());
/// assert_eq!(vec![6, 7], make_view(&mut data).range(-2..).unwrap().iter().collect::<Vec<_>>());
/// assert_eq!(vec![3], make_view(&mut data).index(3).unwrap().iter().collect::<Vec<_>>());
/// assert_eq!(vec![2, 3, 4], make_view(&mut data).at(2, 3).unwrap().iter().collect::<Vec<_>>());
/// ```
///
pub struct ViewFactory<B: Backing<T>, T> {
    target: B,
    offset: usize,
    len: usize,
    element: PhantomData<T>
}

impl<B: Backing<T>, T> ViewFactory<B, T> {

    ///
    /// Creates a factory for views on the whole collection behind `target`.
    ///
    pub fn new(target: B) -> Self {
        let len = target.len();
        Self::within(target, 0, len)
    }

    pub(crate) fn within(target: B, offset: usize, len: usize) -> Self {
        ViewFactory {
            target: target,
            offset: offset,
            len: len,
            element: PhantomData
        }
    }

    ///
    /// The length of the target, against which ranges are resolved.
    ///
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    ///
    /// Creates a view on the `length` elements starting at index `start` of the target.
    ///
    /// The range must lie within the target, and then also within the underlying
    /// collection. The latter is only relevant if the collection has shrunk since
    /// the view this factory was created from was created.
    ///
    pub fn at(self, start: isize, length: isize) -> Result<View<B, T>, ViewError> {
        let (start, _) = check_bounds(start, length, self.len)
            .inspect_err(|e| debug!(start, length, len = self.len, "rejected subrange: {}", e))?;
        View::new(self.target, (self.offset + start) as isize, length)
    }

    ///
    /// Creates a view on the given range of the target.
    ///
    /// Omitted endpoints refer to the start resp. end of the target, and the length of
    /// the target is added to negative endpoints until they are nonnegative. Ranges with
    /// a step other than `1` are rejected.
    ///
    pub fn range<R: IntoSliceRange>(self, range: R) -> Result<View<B, T>, ViewError> {
        let (start, length) = range.into_slice_range().resolve_wrapping(self.len)?;
        self.at(start, length)
    }

    ///
    /// Creates a view on the whole target.
    ///
    pub fn full(self) -> Result<View<B, T>, ViewError> {
        self.range(SliceRange::full())
    }

    ///
    /// Creates a view containing only the element at the given index. A negative index
    /// is resolved as a range endpoint would be.
    ///
    pub fn index(self, index: isize) -> Result<View<B, T>, ViewError> {
        let (start, _) = SliceRange::new(Some(index), None).resolve_wrapping(self.len)?;
        self.at(start, 1)
    }
}

impl<B: Backing<T> + Debug, T> Debug for ViewFactory<B, T> {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewFactory")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("target", &self.target)
            .finish()
    }
}

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use crate::tracing::LogViewSubscriber;

#[test]
fn test_range_notation() {
    LogViewSubscriber::init_test();
    let data = RefCell::new((0..8).collect::<Vec<i32>>());
    let all = |view: View<&RefCell<Vec<i32>>, i32>| view.iter().collect::<Vec<_>>();
    assert_eq!(*data.borrow(), all(ViewFactory::new(&data).range(..).unwrap()));
    assert_eq!(data.borrow()[0..7], all(ViewFactory::new(&data).range(0..-1).unwrap())[..]);
    assert_eq!(*data.borrow(), all(ViewFactory::new(&data).range(-8..).unwrap()));
    assert_eq!(vec![2, 3], all(ViewFactory::new(&data).range(2..=3).unwrap()));
    assert_eq!(vec![5, 6], all(ViewFactory::new(&data).range(-3..-1).unwrap()));
    assert_eq!(*data.borrow(), all(ViewFactory::new(&data).full().unwrap()));
}

#[test]
fn test_range_errors() {
    LogViewSubscriber::init_test();
    let data = RefCell::new((0..8).collect::<Vec<i32>>());
    let len = |result: Result<View<&RefCell<Vec<i32>>, i32>, ViewError>| result.map(|view| view.len());
    assert_eq!(Err(ViewError::InvalidLength { length: 0 }), len(ViewFactory::new(&data).range(3..3)));
    assert_eq!(Err(ViewError::InvalidLength { length: -2 }), len(ViewFactory::new(&data).range(5..3)));
    assert_eq!(Err(ViewError::InvalidLength { length: 0 }), len(ViewFactory::new(&data).range(..-8)));
    assert_eq!(Err(ViewError::StartOutOfBounds { start: 8, len: 8 }), len(ViewFactory::new(&data).range(8..9)));
    assert_eq!(Err(ViewError::RangeExceedsBounds { start: 6, length: 4, len: 8 }), len(ViewFactory::new(&data).range(6..10)));
    assert_eq!(Err(ViewError::InvalidRange { step: 3 }), len(ViewFactory::new(&data).range(SliceRange::full().step_by(3))));
}

#[test]
fn test_empty_target() {
    LogViewSubscriber::init_test();
    let mut data: Vec<i32> = Vec::new();
    assert!(ViewFactory::new(&mut data).is_empty());
    assert_eq!(Err(ViewError::InvalidLength { length: 0 }), ViewFactory::new(&mut data).full().map(|v| v.len()));
    assert_eq!(Err(ViewError::StartOutOfBounds { start: -1, len: 0 }), ViewFactory::new(&mut data).index(-1).map(|v| v.len()));
}

#[test]
fn test_index() {
    LogViewSubscriber::init_test();
    let mut data = [4, 5, 6];
    let view = ViewFactory::new(&mut data).index(-1).unwrap();
    assert_eq!(1, view.len());
    assert_eq!(2, view.start());
    assert_eq!(Ok(6), view.get(0));
    assert_eq!(Err(ViewError::StartOutOfBounds { start: 3, len: 3 }), ViewFactory::new(&mut data).index(3).map(|v| v.len()));
}

#[test]
fn test_at() {
    LogViewSubscriber::init_test();
    let mut data = vec![1, 2, 3, 4, 5];
    let mut view = ViewFactory::new(&mut data).at(1, 3).unwrap();
    let mut subview = view.subview().at(1, 2).unwrap();
    subview.set(1, 0).unwrap();
    assert_eq!(Err(ViewError::StartOutOfBounds { start: -1, len: 3 }), view.subview().at(-1, 1).map(|v| v.len()));
    assert_eq!(vec![1, 2, 3, 0, 5], data);
}

#[test]
fn test_inclusive_range_to_isize_max() {
    LogViewSubscriber::init_test();
    let mut data = vec![1, 2, 3];
    assert_eq!(Err(ViewError::RangeExceedsBounds { start: 0, length: isize::MAX as usize, len: 3 }), ViewFactory::new(&mut data).range(0..=isize::MAX).map(|v| v.len()));
    assert_eq!(Err(ViewError::RangeExceedsBounds { start: 0, length: isize::MAX as usize, len: 3 }), ViewFactory::new(&mut data).range(..=isize::MAX).map(|v| v.len()));
    assert_eq!(Err(ViewError::RangeExceedsBounds { start: 2, length: isize::MAX as usize - 2, len: 3 }), ViewFactory::new(&mut data).range(-1..=isize::MAX).map(|v| v.len()));
    assert_eq!(vec![1, 2, 3], data);
}
