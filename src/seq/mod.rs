use std::collections::VecDeque;
use std::ops::Range;

pub use backing::Backing;

///
/// Contains [`backing::Backing`], the trait for handles through which a
/// [`crate::view::View`] reaches its underlying collection, together with
/// its implementations for `&mut C`, `&RefCell<C>` and `Rc<RefCell<C>>`.
///
pub mod backing;

#[cfg(feature = "ndarray")]
mod array1;

///
/// The set of capabilities a collection must provide to be viewed through a
/// [`crate::view::View`]: a length, read and write access to single positions,
/// extraction of a range into a new, independent collection and assignment
/// to a range.
///
/// This is implemented for the standard containers `Vec<T>`, `VecDeque<T>`,
/// `[T; N]` and `[T]`.
///
/// # Example
/// ```rust
/// # use seqview::seq::*;
/// fn sum_range<C: ?Sized + MutableSequence<i32>>(data: &C, from: usize, to: usize) -> i32 {
///     (from..to).map(|i| *data.at(i)).sum()
/// }
/// assert_eq!(5, sum_range(&vec![1, 2, 3, 4], 1, 3));
/// assert_eq!(5, sum_range(&[1, 2, 3, 4], 1, 3));
/// assert_eq!(5, sum_range(&[1, 2, 3, 4][..], 1, 3));
/// ```
///
pub trait MutableSequence<T> {

    ///
    /// The collection produced by [`MutableSequence::copy_range()`]. Whenever the
    /// container can be resized, this is the container type itself.
    ///
    type Owned: MutableSequence<T>;

    fn len(&self) -> usize;
    fn at(&self, i: usize) -> &T;
    fn at_mut(&mut self, i: usize) -> &mut T;

    ///
    /// Returns a new collection containing clones of the elements in the given
    /// range. Later changes to the result are not reflected in `self`.
    ///
    fn copy_range(&self, range: Range<usize>) -> Self::Owned
        where T: Clone;

    ///
    /// Replaces the elements in the given range by the given values.
    ///
    /// Resizable containers splice the values in, so the number of values may
    /// differ from the length of the range, which changes the length of the container.
    /// Containers of fixed size panic if the numbers do not match.
    ///
    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I);
}

fn assign_range_fixed_size<T, I: IntoIterator<Item = T>>(data: &mut [T], range: Range<usize>, values: I) {
    let values = values.into_iter().collect::<Vec<_>>();
    assert!(values.len() == range.len(), "cannot assign {} values to a range of length {} in a container of fixed size", values.len(), range.len());
    for (dst, value) in data[range].iter_mut().zip(values) {
        *dst = value;
    }
}

impl<T> MutableSequence<T> for [T] {

    type Owned = Vec<T>;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn at(&self, i: usize) -> &T {
        &self[i]
    }

    fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self[i]
    }

    fn copy_range(&self, range: Range<usize>) -> Vec<T>
        where T: Clone
    {
        self[range].to_vec()
    }

    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I) {
        assign_range_fixed_size(self, range, values)
    }
}

impl<T, const N: usize> MutableSequence<T> for [T; N] {

    type Owned = Vec<T>;

    fn len(&self) -> usize {
        N
    }

    fn at(&self, i: usize) -> &T {
        &self[i]
    }

    fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self[i]
    }

    fn copy_range(&self, range: Range<usize>) -> Vec<T>
        where T: Clone
    {
        self[range].to_vec()
    }

    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I) {
        assign_range_fixed_size(&mut self[..], range, values)
    }
}

impl<T> MutableSequence<T> for Vec<T> {

    type Owned = Vec<T>;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn at(&self, i: usize) -> &T {
        &self[i]
    }

    fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self[i]
    }

    fn copy_range(&self, range: Range<usize>) -> Vec<T>
        where T: Clone
    {
        self[range].to_vec()
    }

    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I) {
        _ = self.splice(range, values);
    }
}

impl<T> MutableSequence<T> for VecDeque<T> {

    type Owned = VecDeque<T>;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn at(&self, i: usize) -> &T {
        &self[i]
    }

    fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self[i]
    }

    fn copy_range(&self, range: Range<usize>) -> VecDeque<T>
        where T: Clone
    {
        self.range(range).cloned().collect()
    }

    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I) {
        assert!(range.start <= range.end && range.end <= self.len());
        let mut tail = self.split_off(range.end);
        self.truncate(range.start);
        self.extend(values);
        self.append(&mut tail);
    }
}

#[stability::unstable(feature = "enable")]
#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use std::fmt::Debug;

    use super::*;

    ///
    /// Checks that the given collection behaves as required by [`MutableSequence`].
    /// The collection must contain at least two elements, and is left in a permuted
    /// state afterwards.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn test_mutable_sequence_axioms<C, T>(collection: &mut C)
        where C: ?Sized + MutableSequence<T>,
            T: Clone + PartialEq + Debug
    {
        let len = collection.len();
        assert!(len >= 2);
        let original = (0..len).map(|i| collection.at(i).clone()).collect::<Vec<_>>();

        let copy = collection.copy_range(0..len);
        assert_eq!(len, copy.len());
        for i in 0..len {
            assert_eq!(&original[i], copy.at(i));
        }

        let mut partial = collection.copy_range(1..len);
        assert_eq!(len - 1, partial.len());
        *partial.at_mut(0) = original[0].clone();
        assert_eq!(&original[1], collection.at(1));

        let empty = collection.copy_range(1..1);
        assert_eq!(0, empty.len());

        *collection.at_mut(0) = original[1].clone();
        *collection.at_mut(1) = original[0].clone();
        assert_eq!(&original[1], collection.at(0));
        assert_eq!(&original[0], collection.at(1));

        collection.assign_range(0..len, original.iter().rev().cloned());
        assert_eq!(len, collection.len());
        for i in 0..len {
            assert_eq!(&original[len - 1 - i], collection.at(i));
        }
    }
}

#[test]
fn test_vec_axioms() {
    generic_tests::test_mutable_sequence_axioms(&mut vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_array_axioms() {
    generic_tests::test_mutable_sequence_axioms(&mut ["a", "b", "c"]);
}

#[test]
fn test_slice_axioms() {
    let mut data = [0, 1, 2, 3, 4, 5];
    generic_tests::test_mutable_sequence_axioms::<[i32], _>(&mut data[1..4]);
    assert_eq!(0, data[0]);
    assert_eq!(5, data[5]);
}

#[test]
fn test_vec_deque_axioms() {
    let mut data = VecDeque::from(vec![1, 2, 3]);
    data.push_front(0);
    generic_tests::test_mutable_sequence_axioms(&mut data);
}

#[test]
fn test_vec_assign_range_resizes() {
    let mut data = vec![0, 1, 2, 3];
    data.assign_range(1..3, [7, 8, 9]);
    assert_eq!(vec![0, 7, 8, 9, 3], data);
    data.assign_range(0..4, []);
    assert_eq!(vec![3], data);
}

#[test]
fn test_vec_deque_assign_range_resizes() {
    let mut data = VecDeque::from(vec![0, 1, 2, 3]);
    data.assign_range(1..3, [7]);
    assert_eq!(VecDeque::from(vec![0, 7, 3]), data);
}

#[test]
#[should_panic]
fn test_array_assign_range_length_mismatch() {
    let mut data = [0, 1, 2, 3];
    data.assign_range(1..3, [7, 8, 9]);
}
