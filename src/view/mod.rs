use std::fmt::{Debug, Display, Formatter};
use std::marker::PhantomData;

use tracing::{debug, instrument};

use crate::error::ViewError;
use crate::factory::ViewFactory;
use crate::range::IntoSliceRange;
use crate::seq::{Backing, MutableSequence};

pub use iter::ViewIter;

mod iter;
mod sort;

///
/// The collection type returned when copying a range out of a view with backing `B`.
///
pub type Owned<B, T> = <<B as Backing<T>>::Collection as MutableSequence<T>>::Owned;

///
/// A mutable view on a contiguous, nonempty range of a collection. In contrast to
/// a slice `&mut [T]`, writing to the view is supported for every collection that
/// implements [`MutableSequence`], and the same collection may be viewed by multiple
/// views at once (if it is accessed through a `&RefCell<_>`, see [`Backing`]).
///
/// All operations translate indices into absolute indices of the underlying collection,
/// and read resp. write the collection directly. A view never wraps another view: creating
/// a view on a view (via [`View::subview()`] or [`View::view_at()`]) yields a view on the
/// original collection, with combined offset.
///
/// The bounds are checked when the view is created. If the underlying collection shrinks
/// afterwards, accesses behind its new end fail as accesses to the collection would.
///
/// # Example
/// ```rust
/// # use seqview::*;
/// let mut data = vec![0, 3, -1, 1, 4];
/// let mut view = make_view(&mut data).range(1..4).unwrap();
/// view.set(0, 1).unwrap();
/// view.set(2, 3).unwrap();
/// let mut subview = view.subview().range(1..2).unwrap();
/// subview.set(0, 2).unwrap();
/// assert_eq!(vec![0, 1, 2, 3, 4], data);
/// ```
///
pub struct View<B: Backing<T>, T> {
    backing: B,
    start: usize,
    length: usize,
    element: PhantomData<T>
}

impl<B: Clone + Backing<T>, T> Clone for View<B, T> {

    fn clone(&self) -> Self {
        Self {
            backing: self.backing.clone(),
            start: self.start,
            length: self.length,
            element: PhantomData
        }
    }
}

impl<B: Copy + Backing<T>, T> Copy for View<B, T> {}

///
/// Checks that a view of length `length` starting at `start` fits into a sequence
/// of length `len`, and returns start and length as `usize`s.
///
pub(crate) fn check_bounds(start: isize, length: isize, len: usize) -> Result<(usize, usize), ViewError> {
    if length < 1 {
        return Err(ViewError::InvalidLength { length: length });
    }
    if start < 0 || start as usize >= len {
        return Err(ViewError::StartOutOfBounds { start: start, len: len });
    }
    let (start, length) = (start as usize, length as usize);
    match start.checked_add(length) {
        Some(end) if end <= len => Ok((start, length)),
        _ => Err(ViewError::RangeExceedsBounds { start: start, length: length, len: len })
    }
}

impl<B: Backing<T>, T> View<B, T> {

    ///
    /// Creates a view on the `length` elements of the collection behind `backing`,
    /// starting with the element at index `start`.
    ///
    /// This fails if `length < 1`, if `start` is not an index of the collection, or if the
    /// view would extend past the end of the collection.
    ///
    pub fn new(backing: B, start: isize, length: isize) -> Result<Self, ViewError> {
        let (start, length) = check_bounds(start, length, backing.len())
            .inspect_err(|e| debug!(start, length, len = backing.len(), "rejected view: {}", e))?;
        return Ok(View {
            backing: backing,
            start: start,
            length: length,
            element: PhantomData
        });
    }

    ///
    /// Returns the number of elements in this view. This is the number of elements
    /// at the time of creation; the view does not change its size.
    ///
    pub fn len(&self) -> usize {
        self.length
    }

    ///
    /// Views always contain at least one element, so this always returns `false`.
    ///
    pub fn is_empty(&self) -> bool {
        false
    }

    ///
    /// Returns the index in the underlying collection of the first element of this view.
    ///
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn backing(&self) -> &B {
        &self.backing
    }

    pub fn into_backing(self) -> B {
        self.backing
    }

    ///
    /// Translates an index of this view into an index of the view, taking care of
    /// negative indices.
    ///
    /// Negative indices are reduced modulo the length of the view, thus they never fail.
    /// In particular, `-1` refers to the last element. Nonnegative indices that are not
    /// smaller than the length of the view are rejected.
    ///
    fn normalize_index<I: TryInto<isize>>(&self, index: I) -> Result<usize, ViewError> {
        let index: isize = index.try_into().map_err(|_| ViewError::InvalidIndex)?;
        if index < 0 {
            Ok(index.rem_euclid(self.length as isize) as usize)
        } else if (index as usize) < self.length {
            Ok(index as usize)
        } else {
            Err(ViewError::IndexOutOfRange { index: index, length: self.length })
        }
    }

    ///
    /// Returns (a clone of) the element at the given index of this view.
    ///
    /// # Example
    /// ```rust
    /// # use seqview::*;
    /// let mut data = [0, 1, 2, 3, 4];
    /// let view = make_view(&mut data).range(1..4).unwrap();
    /// assert_eq!(Ok(1), view.get(0));
    /// assert_eq!(Ok(3), view.get(-1));
    /// assert_eq!(Ok(3), view.get(-4));
    /// assert_eq!(Err(ViewError::IndexOutOfRange { index: 3, length: 3 }), view.get(3));
    /// ```
    ///
    pub fn get<I: TryInto<isize>>(&self, index: I) -> Result<T, ViewError>
        where T: Clone
    {
        let index = self.normalize_index(index)?;
        Ok(self.backing.get(self.start + index))
    }

    ///
    /// Writes the given value to the given index of this view, i.e. to the corresponding
    /// position of the underlying collection. Indices are interpreted as for [`View::get()`].
    ///
    pub fn set<I: TryInto<isize>>(&mut self, index: I, value: T) -> Result<(), ViewError> {
        let index = self.normalize_index(index)?;
        self.backing.set(self.start + index, value);
        Ok(())
    }

    ///
    /// Exchanges the elements at the given indices.
    ///
    pub fn swap<I: TryInto<isize>, J: TryInto<isize>>(&mut self, i: I, j: J) -> Result<(), ViewError>
        where T: Clone
    {
        let i = self.normalize_index(i)?;
        let j = self.normalize_index(j)?;
        if i != j {
            let first = self.backing.get(self.start + i);
            let second = self.backing.get(self.start + j);
            self.backing.set(self.start + i, second);
            self.backing.set(self.start + j, first);
        }
        Ok(())
    }

    ///
    /// Returns a copy of the given range of this view, as the kind of collection that
    /// the underlying collection produces when copying a range. In particular, this is
    /// not a view, and changes to it do not affect the view.
    ///
    /// Negative endpoints are reduced modulo the length of the view, omitted endpoints
    /// refer to the start resp. the end of the view. If you need a view on the range
    /// instead, use [`View::subview()`].
    ///
    /// # Example
    /// ```rust
    /// # use seqview::*;
    /// let mut data = (0..10).collect::<Vec<_>>();
    /// let view = make_view(&mut data).range(1..10).unwrap();
    /// let copy: Vec<_> = view.get_range(1..-1).unwrap();
    /// assert_eq!(vec![2, 3, 4, 5, 6, 7, 8], copy);
    /// ```
    ///
    pub fn get_range<R: IntoSliceRange>(&self, range: R) -> Result<Owned<B, T>, ViewError>
        where T: Clone
    {
        let range = range.into_slice_range().resolve_within(self.length)?;
        Ok(self.backing.copy_range((self.start + range.start)..(self.start + range.end)))
    }

    ///
    /// Returns a copy of all the elements of this view, see [`View::get_range()`].
    ///
    pub fn to_owned_collection(&self) -> Owned<B, T>
        where T: Clone
    {
        self.backing.copy_range(self.start..(self.start + self.length))
    }

    ///
    /// Replaces the elements in the given range of this view by the given values, by
    /// assigning them to the corresponding range of the underlying collection. The range
    /// is interpreted as for [`View::get_range()`].
    ///
    /// If the underlying collection is resizable, the number of values may differ from the
    /// length of the range, in which case the size of the collection changes. The view will
    /// however keep its start and length.
    ///
    #[stability::unstable(feature = "enable")]
    #[instrument(skip_all, level = "trace")]
    pub fn set_range<R: IntoSliceRange, I: IntoIterator<Item = T>>(&mut self, range: R, values: I) -> Result<(), ViewError> {
        let range = range.into_slice_range().resolve_within(self.length)?;
        self.backing.assign_range((self.start + range.start)..(self.start + range.end), values);
        Ok(())
    }

    ///
    /// Returns a [`ViewFactory`] that creates views on ranges of this view. The created
    /// views refer directly to the underlying collection of this view.
    ///
    /// # Example
    /// ```rust
    /// # use seqview::*;
    /// let mut data = (0..10).collect::<Vec<_>>();
    /// let mut view = make_view(&mut data).range(1..10).unwrap();
    /// let subview = view.subview().range(1..-1).unwrap();
    /// assert_eq!(2, subview.start());
    /// assert_eq!((2..9).collect::<Vec<_>>(), subview.iter().collect::<Vec<_>>());
    /// ```
    ///
    pub fn subview<'b>(&'b mut self) -> ViewFactory<B::Reborrow<'b>, T> {
        ViewFactory::within(self.backing.reborrow(), self.start, self.length)
    }

    ///
    /// Same as [`View::subview()`], but consumes this view, so the created views use the
    /// same backing as this view. For views on `&RefCell<_>`, which are [`Copy`], this is
    /// often more convenient.
    ///
    pub fn into_subview(self) -> ViewFactory<B, T> {
        ViewFactory::within(self.backing, self.start, self.length)
    }

    ///
    /// Creates a view on `length` elements of this view, starting at the given index of
    /// this view. The requested range must lie within this view.
    ///
    pub fn view_at<'b>(&'b mut self, start: isize, length: isize) -> Result<View<B::Reborrow<'b>, T>, ViewError> {
        self.subview().at(start, length)
    }
}

impl<B: Backing<T> + Debug, T> Debug for View<B, T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("start", &self.start)
            .field("length", &self.length)
            .field("backing", &self.backing)
            .finish()
    }
}

impl<B: Backing<T>, T: Clone> Display for View<B, T>
    where Owned<B, T>: Debug
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:?}", self.to_owned_collection())
    }
}

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use crate::make_view;
#[cfg(test)]
use crate::tracing::LogViewSubscriber;

#[test]
fn test_new_checks_bounds() {
    LogViewSubscriber::init_test();
    let mut data = vec![0, 1, 2, 3, 4];
    assert_eq!(Err(ViewError::InvalidLength { length: 0 }), View::new(&mut data, 0, 0).map(|v| v.len()));
    assert_eq!(Err(ViewError::InvalidLength { length: -2 }), View::new(&mut data, 0, -2).map(|v| v.len()));
    assert_eq!(Err(ViewError::StartOutOfBounds { start: 5, len: 5 }), View::new(&mut data, 5, 1).map(|v| v.len()));
    assert_eq!(Err(ViewError::StartOutOfBounds { start: -1, len: 5 }), View::new(&mut data, -1, 1).map(|v| v.len()));
    assert_eq!(Err(ViewError::RangeExceedsBounds { start: 2, length: 4, len: 5 }), View::new(&mut data, 2, 4).map(|v| v.len()));
    assert_eq!(Err(ViewError::RangeExceedsBounds { start: 2, length: usize::MAX >> 1, len: 5 }), View::new(&mut data, 2, isize::MAX).map(|v| v.len()));
    assert_eq!(Ok(3), View::new(&mut data, 2, 3).map(|v| v.len()));
}

#[test]
fn test_set_writes_through() {
    LogViewSubscriber::init_test();
    let mut data = vec![0, 3, -1, 1, 4];
    let mut view = View::new(&mut data, 1, 3).unwrap();
    view.set(0, 1).unwrap();
    view.set(2, 3).unwrap();
    assert_eq!(Ok(1), view.get(0));
    assert_eq!(vec![0, 1, -1, 3, 4], data);
}

#[test]
fn test_negative_index_wraps() {
    LogViewSubscriber::init_test();
    let mut data = [10, 11, 12, 13, 14, 15];
    let mut view = View::new(&mut data, 1, 4).unwrap();
    assert_eq!(Ok(14), view.get(-1));
    assert_eq!(Ok(11), view.get(-4));
    assert_eq!(Ok(14), view.get(-5));
    assert_eq!(Ok(13), view.get(-10));
    view.set(-1, 0).unwrap();
    assert_eq!([10, 11, 12, 13, 0, 15], data);
}

#[test]
fn test_positive_overflow_fails() {
    LogViewSubscriber::init_test();
    let mut data = [10, 11, 12, 13, 14, 15];
    let mut view = View::new(&mut data, 1, 4).unwrap();
    assert_eq!(Err(ViewError::IndexOutOfRange { index: 4, length: 4 }), view.get(4));
    assert_eq!(Err(ViewError::IndexOutOfRange { index: 4, length: 4 }), view.set(4, 0));
    assert_eq!(Err(ViewError::IndexOutOfRange { index: 100, length: 4 }), view.set(100usize, 0));
    assert_eq!([10, 11, 12, 13, 14, 15], data);
}

#[test]
fn test_index_conversion() {
    LogViewSubscriber::init_test();
    let mut data = vec![1, 2, 3];
    let view = View::new(&mut data, 0, 3).unwrap();
    assert_eq!(Ok(2), view.get(1u8));
    assert_eq!(Ok(3), view.get(-1i64));
    assert_eq!(Err(ViewError::InvalidIndex), view.get(u64::MAX));
    assert_eq!(Err(ViewError::InvalidIndex), view.get(i128::MIN));
}

#[test]
fn test_swap() {
    LogViewSubscriber::init_test();
    let mut data = vec![1, 2, 3, 4];
    let mut view = View::new(&mut data, 1, 3).unwrap();
    view.swap(0, -1).unwrap();
    view.swap(1, 1).unwrap();
    assert_eq!(Err(ViewError::IndexOutOfRange { index: 3, length: 3 }), view.swap(0, 3));
    assert_eq!(vec![1, 4, 3, 2], data);
}

#[test]
fn test_get_range_copies() {
    LogViewSubscriber::init_test();
    let mut data = (0..10).collect::<Vec<i32>>();
    let view = View::new(&mut data, 1, 9).unwrap();
    let mut copy = view.get_range(1..-1).unwrap();
    assert_eq!((2..9).collect::<Vec<_>>(), copy);
    copy[0] = 100;
    assert_eq!(Ok(2), view.get(1));
    assert_eq!(vec![1, 2], view.get_range(..2).unwrap());
    assert_eq!(vec![8, 9], view.get_range(-2..).unwrap());
    assert_eq!(Vec::<i32>::new(), view.get_range(5..3).unwrap());
    assert_eq!(Err(ViewError::IndexOutOfRange { index: 10, length: 9 }), view.get_range(0..10));
    assert_eq!((1..10).collect::<Vec<_>>(), view.to_owned_collection());
    assert_eq!((2..10).collect::<Vec<_>>(), data[2..]);
}

#[test]
fn test_range_to_isize_max_is_rejected() {
    LogViewSubscriber::init_test();
    let mut data = [0, 1, 2, 3, 4];
    let mut view = View::new(&mut data, 1, 3).unwrap();
    assert_eq!(Err(ViewError::IndexOutOfRange { index: isize::MAX, length: 3 }), view.get_range(..=isize::MAX));
    assert_eq!(Err(ViewError::IndexOutOfRange { index: isize::MAX, length: 3 }), view.set_range(1..=isize::MAX, [7, 7]));
    assert_eq!([0, 1, 2, 3, 4], data);
}

#[test]
fn test_get_range_same_kind() {
    LogViewSubscriber::init_test();
    let mut data = VecDeque::from(vec![5, 6, 7, 8]);
    let view = View::new(&mut data, 1, 2).unwrap();
    let copy: VecDeque<i32> = view.get_range(..).unwrap();
    assert_eq!(VecDeque::from(vec![6, 7]), copy);
}

#[test]
fn test_set_range() {
    LogViewSubscriber::init_test();
    let mut data = [0, 1, 2, 3, 4, 5];
    let mut view = View::new(&mut data, 1, 4).unwrap();
    view.set_range(1..-1, [20, 30]).unwrap();
    assert_eq!(Err(ViewError::InvalidRange { step: 2 }), view.set_range(crate::range::SliceRange::full().step_by(2), [0, 0]));
    assert_eq!([0, 1, 20, 30, 4, 5], data);
}

#[test]
fn test_set_range_resizes_vec() {
    LogViewSubscriber::init_test();
    let mut data = vec![0, 1, 2, 3, 4, 5];
    let mut view = View::new(&mut data, 1, 4).unwrap();
    view.set_range(1..2, [7, 7, 7]).unwrap();
    assert_eq!(4, view.len());
    assert_eq!(Ok(7), view.get(3));
    assert_eq!(vec![0, 1, 7, 7, 7, 3, 4, 5], data);
}

#[test]
fn test_subview_flattens() {
    LogViewSubscriber::init_test();
    let data = RefCell::new((0..20).collect::<Vec<i32>>());
    let outer = make_view(&data).range(2..18).unwrap();
    let middle = outer.into_subview().range(3..-3).unwrap();
    let inner = middle.into_subview().at(1, 4).unwrap();
    assert!(std::ptr::eq(*inner.backing(), &data));
    assert_eq!(6, inner.start());
    let direct = View::new(&data, 6, 4).unwrap();
    for i in 0..4 {
        assert_eq!(direct.get(i), inner.get(i));
    }
    let mut inner = inner;
    inner.set(2, -1).unwrap();
    assert_eq!(Ok(-1), direct.get(2));
    assert_eq!(Ok(-1), outer.get(6));
    assert_eq!(-1, data.borrow()[8]);
}

#[test]
fn test_subview_checks_parent_bounds() {
    LogViewSubscriber::init_test();
    let mut data = (0..10).collect::<Vec<i32>>();
    let mut view = View::new(&mut data, 2, 4).unwrap();
    assert_eq!(Err(ViewError::RangeExceedsBounds { start: 2, length: 3, len: 4 }), view.view_at(2, 3).map(|v| v.len()));
    assert_eq!(Err(ViewError::StartOutOfBounds { start: 4, len: 4 }), view.view_at(4, 1).map(|v| v.len()));
    assert_eq!(Err(ViewError::InvalidLength { length: 0 }), view.view_at(1, 0).map(|v| v.len()));
    let mut sub = view.view_at(1, 3).unwrap();
    sub.set(0, 100).unwrap();
    assert_eq!(Ok(100), view.get(1));
}

#[test]
fn test_subview_after_backing_shrunk() {
    LogViewSubscriber::init_test();
    let data = RefCell::new((0..10).collect::<Vec<i32>>());
    let view = make_view(&data).range(4..).unwrap();
    data.borrow_mut().truncate(6);
    assert_eq!(Err(ViewError::RangeExceedsBounds { start: 5, length: 2, len: 6 }), view.into_subview().at(1, 2).map(|v| v.len()));
}

#[test]
#[should_panic]
fn test_access_after_backing_shrunk() {
    let data = RefCell::new((0..10).collect::<Vec<i32>>());
    let view = make_view(&data).range(4..).unwrap();
    data.borrow_mut().truncate(6);
    _ = view.get(5);
}

#[test]
fn test_shared_views_alias() {
    LogViewSubscriber::init_test();
    let data = RefCell::new(vec![0; 6]);
    let mut left = make_view(&data).range(..4).unwrap();
    let mut right = make_view(&data).range(2..).unwrap();
    left.set(3, 1).unwrap();
    assert_eq!(Ok(1), right.get(1));
    right.set(0, 2).unwrap();
    assert_eq!(Ok(2), left.get(2));
    assert_eq!(vec![0, 0, 2, 1, 0, 0], *data.borrow());
}

#[test]
fn test_display_and_debug() {
    LogViewSubscriber::init_test();
    let mut data = (0..10).collect::<Vec<i32>>();
    let view = View::new(&mut data, 1, 3).unwrap();
    assert_eq!("$[1, 2, 3]", format!("{}", view));
    assert_eq!("View { start: 1, length: 3, backing: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9] }", format!("{:?}", view));
}
