use std::fmt::{Display, Formatter};

///
/// The reasons why creating or accessing a [`crate::view::View`] can fail.
///
/// All checks are performed before anything is written, so an operation that
/// returns an error has not modified the underlying collection.
///
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum ViewError {
    /// A range with a step other than `1` was given; views are always contiguous.
    InvalidRange {
        step: isize
    },
    /// A view must contain at least one element.
    InvalidLength {
        length: isize
    },
    /// The first element of the requested view is not an element of the sequence.
    StartOutOfBounds {
        start: isize,
        len: usize
    },
    /// The requested view starts within the sequence, but extends past its end.
    RangeExceedsBounds {
        start: usize,
        length: usize,
        len: usize
    },
    /// A nonnegative index or range endpoint that lies behind the end of the view.
    IndexOutOfRange {
        index: isize,
        length: usize
    },
    /// The given index cannot be represented as an `isize`.
    InvalidIndex
}

impl Display for ViewError {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewError::InvalidRange { step } => write!(f, "non-contiguous ranges unsupported, got step {}", step),
            ViewError::InvalidLength { length } => write!(f, "views cannot be created with lengths less than 1, got {}", length),
            ViewError::StartOutOfBounds { start, len } => write!(f, "start index {} out of bounds for sequence of length {}", start, len),
            ViewError::RangeExceedsBounds { start, length, len } => write!(f, "view of length {} starting at {} extends past the end of the sequence of length {}", length, start, len),
            ViewError::IndexOutOfRange { index, length } => write!(f, "index {} out of range for view of length {}", index, length),
            ViewError::InvalidIndex => write!(f, "view indices must be integers representable as isize")
        }
    }
}

impl std::error::Error for ViewError {}

#[test]
fn test_display_mentions_values() {
    assert_eq!("index 5 out of range for view of length 3", format!("{}", ViewError::IndexOutOfRange { index: 5, length: 3 }));
    assert_eq!("non-contiguous ranges unsupported, got step 2", format!("{}", ViewError::InvalidRange { step: 2 }));
    assert!(format!("{}", ViewError::RangeExceedsBounds { start: 3, length: 4, len: 5 }).contains("length 5"));
}

#[test]
fn test_is_std_error() {
    fn as_dyn_error(e: ViewError) -> Box<dyn std::error::Error> {
        Box::new(e)
    }
    assert_eq!(format!("{}", ViewError::InvalidIndex), as_dyn_error(ViewError::InvalidIndex).to_string());
}
