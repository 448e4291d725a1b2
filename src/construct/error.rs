use thiserror::Error;

use crate::dtype::DataType;

/// Errors returned by the `try_*` constructors.
///
/// The non-`try` constructors panic with the same message, for call sites
/// where any of these is a programming error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayConstructionError {
    /// `product(shape)` does not equal the number of supplied elements.
    #[error("shape {shape:?} holds {expected} elements, got {actual}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    /// `product(shape)` overflowed `usize`.
    #[error("shape element count overflow")]
    ShapeOverflow,
    /// A dimension does not fit the engine's `i32` shape representation.
    #[error("dimension {dim} exceeds the engine shape range")]
    DimensionTooLarge { dim: usize },
    /// No conversion is defined from the source dtype to the target dtype.
    #[error("cannot coerce {from} to {to}")]
    UnsupportedCoercion { from: DataType, to: DataType },
    /// The value is not representable in the target dtype under `CastPolicy::Checked`.
    #[error("value of {from} is out of range for {to}")]
    OutOfRange { from: DataType, to: DataType },
    /// The byte buffer length is not a whole number of elements.
    #[error("byte length {len} is not a multiple of the {dtype} width {width}")]
    WrongByteLen {
        len: usize,
        dtype: DataType,
        width: usize,
    },
    /// `bool` buffers must be encoded as 0/1 bytes.
    #[error("invalid bool byte (expected 0 or 1)")]
    InvalidBoolByte,
    /// An array was read back as an element type other than its dtype.
    #[error("array has dtype {actual}, requested {requested}")]
    DTypeMismatch {
        actual: DataType,
        requested: DataType,
    },
    /// A scalar read was requested on an array that is not rank 0.
    #[error("expected a rank-0 array, got shape {shape:?}")]
    NotAScalar { shape: Vec<usize> },
}
