use std::iter::FusedIterator;

use super::*;

///
/// Iterator over the elements of a [`View`], produced by [`View::iter()`].
///
/// Every call to `next()` reads the underlying collection again, so changes made to
/// the collection (e.g. through another view) while iterating are visible to the
/// iterator.
///
pub struct ViewIter<'a, B: Backing<T>, T> {
    view: &'a View<B, T>,
    begin: usize,
    end: usize
}

impl<'a, B: Backing<T>, T> Clone for ViewIter<'a, B, T> {

    fn clone(&self) -> Self {
        Self {
            view: self.view,
            begin: self.begin,
            end: self.end
        }
    }
}

impl<'a, B: Backing<T>, T: Clone> Iterator for ViewIter<'a, B, T> {

    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.begin < self.end {
            self.begin += 1;
            return Some(self.view.backing.get(self.view.start + self.begin - 1));
        } else {
            return None;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.end - self.begin, Some(self.end - self.begin))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.begin = self.begin.saturating_add(n).min(self.end);
        self.next()
    }
}

impl<'a, B: Backing<T>, T: Clone> DoubleEndedIterator for ViewIter<'a, B, T> {

    fn next_back(&mut self) -> Option<Self::Item> {
        if self.begin < self.end {
            self.end -= 1;
            return Some(self.view.backing.get(self.view.start + self.end));
        } else {
            return None;
        }
    }
}

impl<'a, B: Backing<T>, T: Clone> ExactSizeIterator for ViewIter<'a, B, T> {}

impl<'a, B: Backing<T>, T: Clone> FusedIterator for ViewIter<'a, B, T> {}

impl<B: Backing<T>, T> View<B, T> {

    ///
    /// Returns an iterator over (clones of) the elements of this view.
    ///
    pub fn iter<'a>(&'a self) -> ViewIter<'a, B, T> {
        ViewIter {
            view: self,
            begin: 0,
            end: self.length
        }
    }
}

impl<'a, B: Backing<T>, T: Clone> IntoIterator for &'a View<B, T> {

    type Item = T;
    type IntoIter = ViewIter<'a, B, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use crate::make_view;
#[cfg(test)]
use crate::tracing::LogViewSubscriber;

#[test]
fn test_iter() {
    LogViewSubscriber::init_test();
    let mut data = vec![0, 4, 3, 2, 1, 5];
    let view = make_view(&mut data).range(1..-1).unwrap();
    assert_eq!(vec![4, 3, 2, 1], view.iter().collect::<Vec<_>>());
    assert_eq!(vec![1, 2, 3, 4], view.iter().rev().collect::<Vec<_>>());
    assert_eq!(4, view.iter().len());
    assert_eq!(Some(2), view.iter().nth(2));
    assert_eq!(None, view.iter().nth(4));
    let mut sum = 0;
    for x in &view {
        sum += x;
    }
    assert_eq!(10, sum);
}

#[test]
fn test_iter_restartable() {
    LogViewSubscriber::init_test();
    let mut data = [1, 2, 3];
    let view = make_view(&mut data).full().unwrap();
    let mut it = view.iter();
    assert_eq!(Some(1), it.next());
    let copy = it.clone();
    assert_eq!(vec![2, 3], it.collect::<Vec<_>>());
    assert_eq!(vec![2, 3], copy.collect::<Vec<_>>());
    assert_eq!(vec![1, 2, 3], view.iter().collect::<Vec<_>>());
}

#[test]
fn test_iter_sees_concurrent_writes() {
    LogViewSubscriber::init_test();
    let data = RefCell::new(vec![1, 2, 3, 4]);
    let view = make_view(&data).range(1..).unwrap();
    let mut writer = make_view(&data).full().unwrap();
    let mut it = view.iter();
    assert_eq!(Some(2), it.next());
    writer.set(2, 30).unwrap();
    assert_eq!(Some(30), it.next());
    data.borrow_mut()[3] = 40;
    assert_eq!(Some(40), it.next());
    assert_eq!(None, it.next());
}
