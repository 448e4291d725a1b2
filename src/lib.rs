//! Typed array constructors.
//!
//! Builds arrays of a given element type (dtype) and shape from Rust scalars,
//! slices, iterators and raw byte buffers. Storage is delegated to an
//! [`ArrayEngine`]; this crate validates shapes, converts scalar values
//! between dtypes and hands the engine contiguous native-endian bytes.
//!
//! ```
//! use dtype_array::{array, Array, DataType};
//!
//! let a = Array::from_slice(&[0u8, 1, 2, 3], [2, 2]);
//! assert_eq!(a.shape(), &[2, 2]);
//!
//! let b = Array::scalar_as(300i32, DataType::U8);
//! assert_eq!(b.try_item::<u8>().unwrap(), 44);
//!
//! let c = array![1, 2, 3];
//! assert_eq!(c.dtype(), DataType::I32);
//! ```

pub mod array;
pub mod config;
pub mod consts;
pub mod construct;
pub mod dtype;
pub mod engine;
mod macros;

pub use array::Array;
pub use config::{CastPolicy, ConstructorConfig};
pub use construct::{
    coerce::Scalar,
    element::{FloatingPointLike, HasDType, IntegerLike},
    error::ArrayConstructionError,
    util::{IntoShape, Shape},
    Constructor,
};
pub use dtype::DataType;
pub use engine::{ArrayEngine, HostEngine};
