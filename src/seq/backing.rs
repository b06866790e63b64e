use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use super::MutableSequence;

///
/// A handle through which a [`crate::view::View`] reads and writes its underlying
/// collection. The handle never owns the collection in the sense of deciding over its
/// lifetime; it is either a borrow or a shared pointer.
///
/// The three implementations differ in how the collection can be shared:
///  - `&mut C` gives the view exclusive access for its lifetime. Subviews reborrow
///    the handle, so a subview can be used while its parent view is kept around.
///  - `&RefCell<C>` allows arbitrarily many views on the same collection at the same
///    time, and the collection itself can still be accessed through the cell. Views
///    with this handle are [`Copy`]. The cell is only borrowed for the duration of
///    a single operation.
///  - `Rc<RefCell<C>>` behaves like `&RefCell<C>`, but keeps the collection alive.
///
/// Since a view never wraps another view, all accesses through a handle use
/// absolute indices into the collection.
///
pub trait Backing<T> {

    type Collection: ?Sized + MutableSequence<T>;

    ///
    /// The type of handle used by subviews. For shared handles, this is just
    /// the handle type itself.
    ///
    type Reborrow<'b>: Backing<T, Collection = Self::Collection>
        where Self: 'b;

    fn len(&self) -> usize;
    fn get(&self, i: usize) -> T
        where T: Clone;
    fn set(&mut self, i: usize, value: T);

    fn copy_range(&self, range: Range<usize>) -> <Self::Collection as MutableSequence<T>>::Owned
        where T: Clone;

    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I);

    fn reborrow<'b>(&'b mut self) -> Self::Reborrow<'b>;
}

impl<'a, T, C: ?Sized + MutableSequence<T>> Backing<T> for &'a mut C {

    type Collection = C;
    type Reborrow<'b> = &'b mut C
        where Self: 'b;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, i: usize) -> T
        where T: Clone
    {
        (**self).at(i).clone()
    }

    fn set(&mut self, i: usize, value: T) {
        *(**self).at_mut(i) = value;
    }

    fn copy_range(&self, range: Range<usize>) -> C::Owned
        where T: Clone
    {
        (**self).copy_range(range)
    }

    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I) {
        (**self).assign_range(range, values)
    }

    fn reborrow<'b>(&'b mut self) -> &'b mut C {
        &mut **self
    }
}

impl<'a, T, C: ?Sized + MutableSequence<T>> Backing<T> for &'a RefCell<C> {

    type Collection = C;
    type Reborrow<'b> = &'a RefCell<C>
        where Self: 'b;

    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn get(&self, i: usize) -> T
        where T: Clone
    {
        self.borrow().at(i).clone()
    }

    fn set(&mut self, i: usize, value: T) {
        *self.borrow_mut().at_mut(i) = value;
    }

    fn copy_range(&self, range: Range<usize>) -> C::Owned
        where T: Clone
    {
        self.borrow().copy_range(range)
    }

    ///
    /// The values are collected before the cell is borrowed mutably, so they
    /// may be produced by reading the same collection.
    ///
    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I) {
        let values = values.into_iter().collect::<Vec<_>>();
        self.borrow_mut().assign_range(range, values)
    }

    fn reborrow<'b>(&'b mut self) -> &'a RefCell<C> {
        *self
    }
}

impl<T, C: ?Sized + MutableSequence<T>> Backing<T> for Rc<RefCell<C>> {

    type Collection = C;
    type Reborrow<'b> = Rc<RefCell<C>>
        where Self: 'b;

    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn get(&self, i: usize) -> T
        where T: Clone
    {
        self.borrow().at(i).clone()
    }

    fn set(&mut self, i: usize, value: T) {
        *self.borrow_mut().at_mut(i) = value;
    }

    fn copy_range(&self, range: Range<usize>) -> C::Owned
        where T: Clone
    {
        self.borrow().copy_range(range)
    }

    fn assign_range<I: IntoIterator<Item = T>>(&mut self, range: Range<usize>, values: I) {
        let values = values.into_iter().collect::<Vec<_>>();
        self.borrow_mut().assign_range(range, values)
    }

    fn reborrow<'b>(&'b mut self) -> Rc<RefCell<C>> {
        self.clone()
    }
}

#[test]
fn test_mut_ref_backing() {
    let mut data = vec![1, 2, 3];
    let mut handle = &mut data;
    handle.set(1, 5);
    assert_eq!(5, handle.get(1));
    assert_eq!(3, Backing::<i32>::len(&handle));
    let mut reborrowed = handle.reborrow();
    reborrowed.set(0, 7);
    assert_eq!(vec![7, 5, 3], data);
}

#[test]
fn test_ref_cell_backing() {
    let data = RefCell::new(vec![1, 2, 3]);
    let mut handle = &data;
    let mut other = handle;
    handle.set(0, 4);
    other.set(2, 6);
    assert_eq!(vec![4, 2, 6], *data.borrow());
    assert_eq!(vec![2, 6], handle.copy_range(1..3));
}

#[test]
fn test_ref_cell_assign_from_same_collection() {
    let data = RefCell::new(vec![1, 2, 3, 4]);
    let mut handle = &data;
    let reader = &data;
    handle.assign_range(0..2, (2..4).map(|i| reader.get(i)));
    assert_eq!(vec![3, 4, 3, 4], *data.borrow());
}

#[test]
fn test_rc_backing() {
    let data = Rc::new(RefCell::new(vec![1, 2, 3]));
    let mut handle = data.clone();
    handle.reborrow().set(1, 0);
    assert_eq!(vec![1, 0, 3], *data.borrow());
    assert_eq!(3, Backing::<i32>::len(&handle));
}
