use std::fmt::Formatter;
use std::marker::PhantomData;

use serde::de::{DeserializeSeed, Error, IgnoredAny, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::seq::Backing;
use crate::view::View;

#[stability::unstable(feature = "enable")]
pub fn serialize_seq_helper<S, I>(serializer: S, sequence: I) -> Result<S::Ok, S::Error>
    where S: Serializer,
        I: Iterator,
        I::Item: Serialize
{
    let size_hint = sequence.size_hint();
    let mut seq = serializer.serialize_seq(if size_hint.1 == Some(size_hint.0) { Some(size_hint.0) } else { None })?;
    for x in sequence {
        seq.serialize_element(&x)?;
    }
    return seq.end();
}

///
/// A view is serialized as the sequence of its elements, exactly as the
/// collection returned by [`View::to_owned_collection()`] would usually be.
///
impl<B: Backing<T>, T: Clone + Serialize> Serialize for View<B, T> {

    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serialize_seq_helper(serializer, self.iter())
    }
}

///
/// A [`DeserializeSeed`] that reads a sequence and writes its elements into an
/// existing view, i.e. into the corresponding range of the underlying collection.
///
/// The sequence must have exactly as many elements as the view. All elements are read
/// before the first one is written, so if the sequence is too short or too long, the
/// underlying collection is left unchanged.
///
#[stability::unstable(feature = "enable")]
pub struct DeserializeIntoView<'a, B: Backing<T>, T> {
    view: &'a mut View<B, T>
}

impl<'a, B: Backing<T>, T> DeserializeIntoView<'a, B, T> {

    #[stability::unstable(feature = "enable")]
    pub fn new(view: &'a mut View<B, T>) -> Self {
        Self { view }
    }
}

impl<'a, 'de, B: Backing<T>, T: Deserialize<'de>> DeserializeSeed<'de> for DeserializeIntoView<'a, B, T> {

    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where D: Deserializer<'de>
    {
        struct IntoViewVisitor<'a, 'de, B: Backing<T>, T: Deserialize<'de>> {
            view: &'a mut View<B, T>,
            deserializer: PhantomData<&'de ()>
        }

        impl<'a, 'de, B: Backing<T>, T: Deserialize<'de>> Visitor<'de> for IntoViewVisitor<'a, 'de, B, T> {
            type Value = ();

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                write!(formatter, "a sequence of {} elements", self.view.len())
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
                where A: SeqAccess<'de>
            {
                let len = self.view.len();
                let mut values = Vec::with_capacity(len);
                while values.len() < len {
                    match seq.next_element::<T>()? {
                        Some(el) => values.push(el),
                        None => return Err(A::Error::invalid_length(values.len(), &self))
                    }
                }
                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(A::Error::invalid_length(len + 1, &self));
                }
                for (i, el) in values.into_iter().enumerate() {
                    self.view.set(i, el).map_err(A::Error::custom)?;
                }
                return Ok(());
            }
        }

        deserializer.deserialize_seq(IntoViewVisitor {
            view: self.view,
            deserializer: PhantomData
        })
    }
}

#[stability::unstable(feature = "enable")]
#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use std::fmt::Debug;

    use super::*;

    ///
    /// Checks that the serialized elements of `view` can be deserialized into `target`,
    /// which must have the same length, and that `target` then contains the elements
    /// of `view`.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn test_view_serialization<B1, B2, T>(view: &View<B1, T>, target: &mut View<B2, T>)
        where B1: Backing<T>,
            B2: Backing<T>,
            T: Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de>
    {
        assert_eq!(view.len(), target.len());
        let elements = view.iter().collect::<Vec<_>>();
        for human_readable in [true, false] {
            let serializer = serde_assert::Serializer::builder().is_human_readable(human_readable).build();
            let tokens = view.serialize(&serializer).unwrap();
            let mut deserializer = serde_assert::Deserializer::builder(tokens).is_human_readable(human_readable).build();
            DeserializeIntoView::new(target).deserialize(&mut deserializer).unwrap();
            assert_eq!(elements, target.iter().collect::<Vec<_>>());
        }
    }
}

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use crate::make_view;
#[cfg(test)]
use crate::tracing::LogViewSubscriber;

#[test]
fn test_serialize() {
    LogViewSubscriber::init_test();
    let mut data = vec![0, 1, 2, 3, 4];
    let view = make_view(&mut data).range(1..-1).unwrap();
    assert_eq!("[1,2,3]", serde_json::to_string(&view).unwrap());
}

#[test]
fn test_serialization_generic() {
    LogViewSubscriber::init_test();
    let data = RefCell::new(vec!["a".to_owned(), "b".to_owned(), "c".to_owned(), String::new(), String::new(), String::new()]);
    let view = make_view(&data).range(..3).unwrap();
    let mut target = make_view(&data).range(3..).unwrap();
    generic_tests::test_view_serialization(&view, &mut target);
    assert_eq!(vec!["a", "b", "c", "a", "b", "c"], *data.borrow());
}

#[test]
fn test_deserialize_into_view() {
    LogViewSubscriber::init_test();
    let mut data = [0; 5];
    let mut view = make_view(&mut data).range(1..4).unwrap();
    let mut deserializer = serde_json::Deserializer::from_str("[7, 8, 9]");
    DeserializeIntoView::new(&mut view).deserialize(&mut deserializer).unwrap();
    assert_eq!([0, 7, 8, 9, 0], data);
}

#[test]
fn test_deserialize_into_view_wrong_length() {
    LogViewSubscriber::init_test();
    let mut data = [0; 5];
    let mut view = make_view(&mut data).range(1..4).unwrap();
    let mut deserializer = serde_json::Deserializer::from_str("[7, 8, 9]");
    DeserializeIntoView::new(&mut view).deserialize(&mut deserializer).unwrap();
    let mut deserializer = serde_json::Deserializer::from_str("[1, 2, 3, 4]");
    assert!(DeserializeIntoView::new(&mut view).deserialize(&mut deserializer).is_err());
    assert_eq!(vec![7, 8, 9], view.iter().collect::<Vec<_>>());
    let mut deserializer = serde_json::Deserializer::from_str("[1, 2]");
    assert!(DeserializeIntoView::new(&mut view).deserialize(&mut deserializer).is_err());
    assert_eq!([0, 7, 8, 9, 0], data);
}
