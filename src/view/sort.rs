use std::cmp::Ordering;

use super::*;

impl<B: Backing<T>, T: Clone> View<B, T> {

    ///
    /// Writes the given values to the positions of this view, in order.
    ///
    fn write_back(&mut self, values: Vec<T>) {
        debug_assert_eq!(self.length, values.len());
        for (i, value) in values.into_iter().enumerate() {
            self.backing.set(self.start + i, value);
        }
    }

    ///
    /// Sorts the elements of this view, i.e. the corresponding range of the underlying
    /// collection.
    ///
    /// This first computes the sorted sequence of elements, and then writes it back. In
    /// particular, every position is written exactly once, and `O(len)` additional memory
    /// is required. The sort is stable.
    ///
    /// # Example
    /// ```rust
    /// # use seqview::*;
    /// let mut data = vec![7, 3, 2, 5, 4];
    /// let mut view = make_view(&mut data).range(1..-1).unwrap();
    /// view.set(2, 1).unwrap();
    /// view.sort();
    /// assert_eq!(vec![7, 1, 2, 3, 4], data);
    /// ```
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn sort(&mut self)
        where T: Ord
    {
        self.sort_by(T::cmp)
    }

    ///
    /// Sorts the elements of this view w.r.t. the given comparison function, see
    /// [`View::sort()`]. The sort is stable, so to sort in descending order while
    /// keeping equal elements in their order, use `view.sort_by(|a, b| b.cmp(a))`.
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn sort_by<F>(&mut self, compare: F)
        where F: FnMut(&T, &T) -> Ordering
    {
        let mut values = self.iter().collect::<Vec<_>>();
        values.sort_by(compare);
        self.write_back(values);
    }

    ///
    /// Sorts the elements of this view w.r.t. the given key function, see [`View::sort()`].
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn sort_by_key<K, F>(&mut self, key: F)
        where F: FnMut(&T) -> K,
            K: Ord
    {
        let mut values = self.iter().collect::<Vec<_>>();
        values.sort_by_key(key);
        self.write_back(values);
    }

    ///
    /// Sorts the elements of this view w.r.t. the given key function, calling the key
    /// function only once per element. See also [`slice::sort_by_cached_key()`].
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn sort_by_cached_key<K, F>(&mut self, key: F)
        where F: FnMut(&T) -> K,
            K: Ord
    {
        let mut values = self.iter().collect::<Vec<_>>();
        values.sort_by_cached_key(key);
        self.write_back(values);
    }
}

#[cfg(test)]
use std::cell::{Cell, RefCell};
#[cfg(test)]
use std::ops::Range;
#[cfg(test)]
use crate::make_view;
#[cfg(test)]
use crate::tracing::LogViewSubscriber;

#[test]
fn test_sort() {
    LogViewSubscriber::init_test();
    let mut data = vec![0, 4, 3, 2, 1, 5];
    let mut view = make_view(&mut data).range(1..-1).unwrap();
    assert_eq!(vec![4, 3, 2, 1], view.iter().collect::<Vec<_>>());
    view.sort();
    assert_eq!(vec![0, 1, 2, 3, 4, 5], data);
}

#[test]
fn test_sort_descending() {
    LogViewSubscriber::init_test();
    let mut data = [9, 1, 3, 2, 0];
    let mut view = make_view(&mut data).range(1..4).unwrap();
    view.sort_by(|a, b| b.cmp(a));
    assert_eq!([9, 3, 2, 1, 0], data);
}

#[test]
fn test_sort_stable() {
    LogViewSubscriber::init_test();
    let data = RefCell::new(vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e'), (2, 'f')]);
    let mut view = make_view(&data).range(1..).unwrap();
    view.sort_by_key(|(key, _)| *key);
    assert_eq!(vec![(2, 'a'), (0, 'e'), (1, 'b'), (1, 'd'), (2, 'c'), (2, 'f')], *data.borrow());
    view.sort_by(|(lhs, _), (rhs, _)| rhs.cmp(lhs));
    assert_eq!(vec![(2, 'a'), (2, 'c'), (2, 'f'), (1, 'b'), (1, 'd'), (0, 'e')], *data.borrow());
}

#[test]
fn test_sort_idempotent() {
    LogViewSubscriber::init_test();
    let mut rng = oorandom::Rand64::new(1);
    for _ in 0..20 {
        let len = rng.rand_range(2..30) as usize;
        let mut data = (0..len).map(|_| rng.rand_range(0..10) as i64).collect::<Vec<_>>();
        let start = rng.rand_range(0..(len as u64 - 1)) as isize;
        let mut view = make_view(&mut data).range(start..).unwrap();
        view.sort_by_cached_key(|x| -x);
        let once = view.to_owned_collection();
        view.sort_by_cached_key(|x| -x);
        assert_eq!(once, view.to_owned_collection());
        assert!(once.windows(2).all(|w| w[0] >= w[1]));
    }
}

///
/// A vector that counts the writes it receives.
///
#[cfg(test)]
struct CountingVec {
    data: Vec<i32>,
    writes: Cell<usize>
}

#[cfg(test)]
impl crate::seq::MutableSequence<i32> for CountingVec {

    type Owned = Vec<i32>;

    fn len(&self) -> usize {
        self.data.len()
    }

    fn at(&self, i: usize) -> &i32 {
        &self.data[i]
    }

    fn at_mut(&mut self, i: usize) -> &mut i32 {
        self.writes.set(self.writes.get() + 1);
        &mut self.data[i]
    }

    fn copy_range(&self, range: Range<usize>) -> Vec<i32> {
        self.data[range].to_vec()
    }

    fn assign_range<I: IntoIterator<Item = i32>>(&mut self, range: Range<usize>, values: I) {
        _ = self.data.splice(range, values);
    }
}

#[test]
fn test_sort_writes_every_position_once() {
    LogViewSubscriber::init_test();
    let mut data = CountingVec { data: vec![5, 1, 1, 4, 3, 0], writes: Cell::new(0) };
    let mut view = make_view(&mut data).range(1..5).unwrap();
    view.sort();
    assert_eq!(4, data.writes.get());
    assert_eq!(vec![5, 1, 1, 3, 4, 0], data.data);
}
