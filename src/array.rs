use ndarray::{CowArray, IxDyn};

use crate::{
    construct::{element::HasDType, error::ArrayConstructionError, util::Shape},
    dtype::DataType,
};

/// An array produced by [`crate::HostEngine`].
///
/// The backing bytes are native-endian, row-major and immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    data: bytes::Bytes,
    shape: Shape,
    dtype: DataType,
}

impl Array {
    /// Assemble an array from already validated parts.
    ///
    /// # Safety
    /// `data` must hold exactly `product(shape)` elements of `dtype`, and a
    /// `Bool` array must contain only 0/1 bytes.
    pub(crate) unsafe fn from_parts_unchecked(
        data: bytes::Bytes,
        shape: Shape,
        dtype: DataType,
    ) -> Self {
        Self { data, shape, dtype }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements. A rank-0 array holds one.
    pub fn len(&self) -> usize {
        self.data.len() / self.dtype.byte_width()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// View the elements as an `ndarray` of `T`.
    ///
    /// Zero-copy when the backing buffer is aligned for `T`; otherwise the
    /// elements are copied out.
    ///
    /// # Errors
    /// [`ArrayConstructionError::DTypeMismatch`] if `T` is not this array's dtype.
    pub fn try_as_ndarray<T: HasDType>(
        &self,
    ) -> Result<CowArray<'_, T, IxDyn>, ArrayConstructionError> {
        if T::TYPE != self.dtype {
            return Err(ArrayConstructionError::DTypeMismatch {
                actual: self.dtype,
                requested: T::TYPE,
            });
        }

        let width = std::mem::size_of::<T>();
        assert_eq!(
            width,
            self.dtype.byte_width(),
            "element type does not match the width of {}",
            self.dtype
        );
        let len = self.data.len() / width;
        let shape = IxDyn(&self.shape);
        let ptr = self.data.as_ptr();
        if (ptr as usize) % std::mem::align_of::<T>() == 0 {
            // Safety: `T` is exactly `width` bytes and aligned here, the buffer
            // holds `len` of them and bool buffers are canonical 0/1 bytes.
            let elems: &[T] = unsafe { std::slice::from_raw_parts(ptr as *const T, len) };
            match ndarray::ArrayView::from_shape(shape, elems) {
                Ok(view) => Ok(view.into()),
                Err(e) => panic!("invalid ndarray shape for constructed array: {e}"),
            }
        } else {
            let elems: Vec<T> = (0..len)
                .map(|i| unsafe { std::ptr::read_unaligned(ptr.add(i * width) as *const T) })
                .collect();
            match ndarray::Array::from_shape_vec(shape, elems) {
                Ok(owned) => Ok(owned.into()),
                Err(e) => panic!("invalid ndarray shape for constructed array: {e}"),
            }
        }
    }

    /// Read the value of a rank-0 array.
    pub fn try_item<T: HasDType>(&self) -> Result<T, ArrayConstructionError> {
        if !self.shape.is_empty() {
            return Err(ArrayConstructionError::NotAScalar {
                shape: self.shape.to_vec(),
            });
        }
        let view = self.try_as_ndarray::<T>()?;
        Ok(view[IxDyn(&[])])
    }
}
