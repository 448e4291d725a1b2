//! The construction primitives an array engine exposes.
//!
//! Constructors in this crate never allocate array storage themselves. They
//! validate and convert caller data, then make exactly one call into an
//! [`ArrayEngine`] per constructed array. The engine copies the bytes it is
//! given, so no caller buffer is aliased after the call returns.
//!
//! [`HostEngine`] is the bundled in-memory engine; it produces [`Array`].

use bytes::Bytes;

use crate::{array::Array, dtype::DataType};

pub trait ArrayEngine {
    /// Opaque array value owned by the engine.
    type Handle;

    /// Build an array from `product(shape) * dtype.byte_width()` contiguous
    /// native-endian bytes. An empty `shape` is a rank-0 array.
    fn from_bytes(&self, bytes: &[u8], shape: &[i32], dtype: DataType) -> Self::Handle;

    fn from_i32(&self, value: i32) -> Self::Handle;

    fn from_bool(&self, value: bool) -> Self::Handle;

    fn from_f32(&self, value: f32) -> Self::Handle;
}

impl<E: ArrayEngine + ?Sized> ArrayEngine for &E {
    type Handle = E::Handle;

    fn from_bytes(&self, bytes: &[u8], shape: &[i32], dtype: DataType) -> Self::Handle {
        (**self).from_bytes(bytes, shape, dtype)
    }

    fn from_i32(&self, value: i32) -> Self::Handle {
        (**self).from_i32(value)
    }

    fn from_bool(&self, value: bool) -> Self::Handle {
        (**self).from_bool(value)
    }

    fn from_f32(&self, value: f32) -> Self::Handle {
        (**self).from_f32(value)
    }
}

/// In-memory engine backed by `bytes::Bytes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostEngine;

impl ArrayEngine for HostEngine {
    type Handle = Array;

    /// # Panics
    /// Panics if a dimension is negative or `bytes` does not hold exactly
    /// `product(shape)` elements of `dtype`.
    fn from_bytes(&self, bytes: &[u8], shape: &[i32], dtype: DataType) -> Array {
        let shape = shape
            .iter()
            .map(|&d| match usize::try_from(d) {
                Ok(d) => d,
                Err(_) => panic!("negative dimension {d} in engine shape"),
            })
            .collect::<crate::Shape>();
        let expected = match crate::construct::util::num_elements(&shape) {
            Ok(count) => count * dtype.byte_width(),
            Err(e) => panic!("engine shape {:?}: {e}", shape.as_slice()),
        };
        assert_eq!(
            bytes.len(),
            expected,
            "engine buffer of {} bytes does not match shape {:?} of {dtype}",
            bytes.len(),
            shape.as_slice(),
        );

        let data = if dtype == DataType::Bool {
            // Keep stored bools canonical so typed views never see other bytes.
            Bytes::from(bytes.iter().map(|&b| u8::from(b != 0)).collect::<Vec<u8>>())
        } else {
            Bytes::copy_from_slice(bytes)
        };
        log::trace!("host engine: {dtype} array of shape {:?}", shape.as_slice());
        // Safety: length and bool encoding checked above.
        unsafe { Array::from_parts_unchecked(data, shape, dtype) }
    }

    fn from_i32(&self, value: i32) -> Array {
        let data = Bytes::copy_from_slice(&value.to_ne_bytes());
        unsafe { Array::from_parts_unchecked(data, smallvec::smallvec![], DataType::I32) }
    }

    fn from_bool(&self, value: bool) -> Array {
        let data = Bytes::copy_from_slice(&[u8::from(value)]);
        unsafe { Array::from_parts_unchecked(data, smallvec::smallvec![], DataType::Bool) }
    }

    fn from_f32(&self, value: f32) -> Array {
        let data = Bytes::copy_from_slice(&value.to_ne_bytes());
        unsafe { Array::from_parts_unchecked(data, smallvec::smallvec![], DataType::F32) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_copies_and_keeps_shape() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let arr = HostEngine.from_bytes(&src, &[2, 3], DataType::U8);
        assert_eq!(arr.shape(), &[2, 3]);
        assert_eq!(arr.dtype(), DataType::U8);
        assert_eq!(arr.as_bytes(), &src);
    }

    #[test]
    fn from_bytes_normalizes_bools() {
        let arr = HostEngine.from_bytes(&[0, 7, 1], &[3], DataType::Bool);
        assert_eq!(arr.as_bytes(), &[0, 1, 1]);
    }

    #[test]
    #[should_panic(expected = "does not match shape")]
    fn from_bytes_rejects_short_buffer() {
        let _ = HostEngine.from_bytes(&[0u8; 3], &[1], DataType::I32);
    }

    #[test]
    #[should_panic(expected = "negative dimension")]
    fn from_bytes_rejects_negative_dimension() {
        let _ = HostEngine.from_bytes(&[], &[-1], DataType::I32);
    }

    #[test]
    fn scalar_primitives_are_rank_zero() {
        let a = HostEngine.from_i32(-7);
        assert_eq!(a.shape(), &[] as &[usize]);
        assert_eq!(a.try_item::<i32>().unwrap(), -7);

        let b = HostEngine.from_bool(true);
        assert!(b.try_item::<bool>().unwrap());

        let f = HostEngine.from_f32(1.5);
        assert_eq!(f.try_item::<f32>().unwrap(), 1.5);
    }
}
