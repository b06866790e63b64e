//!
//! Mutable views on contiguous ranges of sequences.
//!
//! A [`View`] exposes a nonempty range of a collection as if it were a collection
//! of its own, while all reads and writes act directly on the underlying collection.
//! This allows passing a window of a larger collection to code that mutates or sorts
//! it, without copying and without keeping track of offsets manually.
//!
//! Views are created either directly by [`make_view_at()`], or via range notation
//! through the [`ViewFactory`] returned by [`make_view()`]. A view never wraps another
//! view; views on views (created by [`View::subview()`]) refer directly to the
//! underlying collection.
//!
//! # Example
//! ```rust
//! # use seqview::*;
//! let mut data = vec![7, 3, 2, 5, 4];
//! let mut view = make_view(&mut data).range(1..-1).unwrap();
//! view.set(2, 1).unwrap();
//! view.sort();
//! assert_eq!(vec![7, 1, 2, 3, 4], data);
//! ```
//! Multiple views on the same collection can be used at the same time if the
//! collection is accessed through a [`std::cell::RefCell`].
//! ```rust
//! # use seqview::*;
//! # use std::cell::RefCell;
//! let data = RefCell::new(vec![0, 0, 0, 0]);
//! let mut left = make_view(&data).range(..3).unwrap();
//! let right = make_view(&data).range(1..).unwrap();
//! left.set(-1, 5).unwrap();
//! assert_eq!(Ok(5), right.get(1));
//! ```
//!

///
/// The error type of all fallible operations on views.
///
pub mod error;
///
/// Range notation, as used by [`ViewFactory::range()`] and [`View::get_range()`].
///
pub mod range;
///
/// The requirements on collections that can be viewed, and handles to them.
///
pub mod seq;
pub mod view;
pub mod factory;
///
/// Serialization of views, and deserialization into views.
///
pub mod serialization;
///
/// A simple subscriber for the trace output of view operations.
///
pub mod tracing;

pub use error::ViewError;
pub use factory::ViewFactory;
pub use range::{IntoSliceRange, SliceRange};
pub use seq::{Backing, MutableSequence};
pub use view::View;

///
/// Returns a [`ViewFactory`] for the collection behind `backing`, which creates a view
/// from range notation.
///
/// # Example
/// ```rust
/// # use seqview::*;
/// let mut data = (0..10).collect::<Vec<_>>();
/// let view = make_view(&mut data).range(-3..).unwrap();
/// assert_eq!(7, view.start());
/// assert_eq!(vec![7, 8, 9], view.to_owned_collection());
/// ```
///
pub fn make_view<B: Backing<T>, T>(backing: B) -> ViewFactory<B, T> {
    ViewFactory::new(backing)
}

///
/// Creates a view on the `length` elements of the collection behind `backing`,
/// starting at index `start`. Negative values are not resolved, so this fails
/// unless `0 <= start` and `1 <= length` and `start + length <= backing.len()`.
///
/// # Example
/// ```rust
/// # use seqview::*;
/// let mut data = [0, 3, -1, 1, 4];
/// let mut view = make_view_at(&mut data, 1, 3).unwrap();
/// view.set(0, 1).unwrap();
/// view.set(2, 3).unwrap();
/// assert_eq!([0, 1, -1, 3, 4], data);
/// assert_eq!(Err(ViewError::RangeExceedsBounds { start: 3, length: 3, len: 5 }), make_view_at(&mut data, 3, 3).map(|v| v.len()));
/// ```
///
pub fn make_view_at<B: Backing<T>, T>(backing: B, start: isize, length: isize) -> Result<View<B, T>, ViewError> {
    View::new(backing, start, length)
}

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;
#[cfg(test)]
use crate::tracing::LogViewSubscriber;

#[test]
fn test_scenario_write_through() {
    LogViewSubscriber::init_test();
    let mut data = vec![0, 3, -1, 1, 4];
    let mut view = make_view(&mut data).range(1..4).unwrap();
    view.set(0, 1).unwrap();
    view.set(2, 3).unwrap();
    {
        let mut sub = view.subview().range(1..2).unwrap();
        sub.set(0, 2).unwrap();
    }
    assert_eq!(Ok(2), view.get(1));
    assert_eq!(vec![0, 1, 2, 3, 4], data);
}

#[test]
fn test_scenario_sort() {
    LogViewSubscriber::init_test();
    let mut data = vec![0, 4, 3, 2, 1, 5];
    let mut view = make_view(&mut data).range(1..-1).unwrap();
    assert_eq!(vec![4, 3, 2, 1], view.iter().collect::<Vec<_>>());
    view.sort();
    assert_eq!(vec![0, 1, 2, 3, 4, 5], data);
}

#[test]
fn test_scenario_copy_or_subview() {
    LogViewSubscriber::init_test();
    let mut data = (0..10).collect::<Vec<i64>>();
    let mut view = make_view(&mut data).range(1..10).unwrap();
    let copy: Vec<i64> = view.get_range(1..-1).unwrap();
    let subview = view.subview().range(1..-1).unwrap();
    assert_eq!(copy, subview.iter().collect::<Vec<_>>());
    assert_eq!(data[2..9], copy[..]);
}

#[test]
fn test_scenario_whole_range() {
    LogViewSubscriber::init_test();
    let data = Rc::new(RefCell::new(vec![7, 3, 2, 5, 4]));
    let mut view = make_view(data.clone()).range(0..).unwrap();
    for i in 0..5 {
        view.set(i, i as i32).unwrap();
    }
    assert_eq!(vec![0, 1, 2, 3, 4], *data.borrow());
    assert_eq!("$[0, 1, 2, 3, 4]", format!("{}", view));
}

#[test]
fn test_make_view_at_matches_range() {
    LogViewSubscriber::init_test();
    let mut rng = oorandom::Rand64::new(0);
    for _ in 0..50 {
        let len = rng.rand_range(1..20) as isize;
        let data = RefCell::new((0..len).collect::<Vec<_>>());
        let start = rng.rand_range(0..(len as u64)) as isize;
        let length = rng.rand_range(1..((len - start) as u64 + 1)) as isize;
        let direct = make_view_at(&data, start, length).unwrap();
        let ranged = make_view(&data).range(start..(start + length)).unwrap();
        let wrapped = make_view(&data).range((start - len)..(start + length)).unwrap();
        assert_eq!(direct.to_owned_collection(), ranged.to_owned_collection());
        assert_eq!(direct.start(), wrapped.start());
        assert_eq!(direct.len(), wrapped.len());
        for i in -length..length {
            assert_eq!(direct.get(i), ranged.get(i));
        }
    }
}
