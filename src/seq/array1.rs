use std::ops::Range;

use ndarray::{s, Array1};

use super::MutableSequence;

impl<T> MutableSequence<T> for Array1<T> {

    type Owned = Array1<T>;

    fn len(&self) -> usize {
        self.len_of(ndarray::Axis(0))
    }

    fn at(&self, i: usize) -> &T {
        &self[i]
    }

    fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self[i]
    }

    fn copy_range(&self, range: Range<usize>) -> Array1<T>
        where T: Clone
    {
        self.slice(s![range.start..range.end]).to_owned()
    }

    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I) {
        let values = values.into_iter().collect::<Vec<_>>();
        assert!(values.len() == range.len(), "cannot assign {} values to a range of length {} in an ndarray", values.len(), range.len());
        for (dst, value) in self.slice_mut(s![range.start..range.end]).iter_mut().zip(values) {
            *dst = value;
        }
    }
}

#[test]
fn test_array1_axioms() {
    let mut data = ndarray::arr1(&[3, 1, 4, 1, 5]);
    super::generic_tests::test_mutable_sequence_axioms(&mut data);
}

#[test]
fn test_array1_view() {
    let mut data = ndarray::arr1(&[0, 4, 3, 2, 1, 5]);
    let mut view = crate::make_view(&mut data).range(1..-1).unwrap();
    view.sort();
    assert_eq!(ndarray::arr1(&[2, 3]), view.get_range(1..3).unwrap());
    assert_eq!(ndarray::arr1(&[0, 1, 2, 3, 4, 5]), data);
}
