//! Array constructors.
//!
//! [`Constructor`] turns Rust scalars, slices, iterators and raw byte buffers
//! into arrays of a given dtype and shape. Each call validates the shape
//! against the element count, converts values when a target dtype differs
//! from the source, and makes exactly one call into its [`ArrayEngine`].
//!
//! ## Shapes
//! An explicit shape must hold exactly as many elements as were supplied,
//! otherwise the call fails with [`ArrayConstructionError::ShapeMismatch`]
//! before any data is read. Without a shape, collections become
//! one-dimensional and scalars rank 0.
//!
//! ## Coercion
//! Only scalars are converted (see [`coerce`]). Collection constructors keep
//! the natural dtype of their element type. `f64` input has its own narrowing
//! constructor and is rejected by the generic ones at compile time:
//!
//! ```compile_fail
//! let arr = dtype_array::Array::from_slice(&[0.5f64, 0.9], None);
//! ```
//!
//! ```
//! use dtype_array::{Array, DataType};
//!
//! let arr = Array::from_f64_narrowing(&[0.5, 0.9], None);
//! assert_eq!(arr.dtype(), DataType::F32);
//! ```
//!
//! ## Errors and panics
//! Every constructor that can fail comes as a `try_*` method returning
//! [`ArrayConstructionError`] and a plain method that panics on the same
//! condition, for call sites where a failure is a programming error.

use ndarray::{ArrayBase, Data, Dimension};

use crate::{
    array::Array,
    config::ConstructorConfig,
    construct::{
        element::HasDType,
        error::ArrayConstructionError,
        util::{engine_shape, resolve_shape, IntoShape},
    },
    dtype::DataType,
    engine::{ArrayEngine, HostEngine},
};

pub mod coerce;
pub mod element;
pub mod error;
pub mod util;

fn expect_valid<H>(result: Result<H, ArrayConstructionError>) -> H {
    match result {
        Ok(handle) => handle,
        Err(e) => panic!("invalid array construction: {e}"),
    }
}

/// Builds arrays through an [`ArrayEngine`].
#[derive(Debug, Clone, Default)]
pub struct Constructor<E = HostEngine> {
    engine: E,
    config: ConstructorConfig,
}

impl Constructor<HostEngine> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: ArrayEngine> Constructor<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            config: ConstructorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ConstructorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &ConstructorConfig {
        &self.config
    }

    /// Build a rank-0 array of `T`'s own dtype.
    pub fn scalar<T: HasDType>(&self, value: T) -> E::Handle {
        value.scalar_array(&self.engine)
    }

    /// Build a rank-0 array of `dtype`, converting `value` if its dtype differs.
    ///
    /// # Errors
    /// - [`ArrayConstructionError::UnsupportedCoercion`] for `BF16` and
    ///   `Complex64` targets, and for `F16` when float16 is disabled.
    /// - [`ArrayConstructionError::OutOfRange`] under
    ///   [`crate::CastPolicy::Checked`] when the value does not fit.
    pub fn try_scalar_as<T: HasDType>(
        &self,
        value: T,
        dtype: DataType,
    ) -> Result<E::Handle, ArrayConstructionError> {
        if T::TYPE == dtype {
            return Ok(self.scalar(value));
        }
        let scalar = value.coerce(dtype, &self.config)?;
        Ok(scalar.into_array(&self.engine))
    }

    /// Panicking form of [`Self::try_scalar_as`].
    pub fn scalar_as<T: HasDType>(&self, value: T, dtype: DataType) -> E::Handle {
        expect_valid(self.try_scalar_as(value, dtype))
    }

    /// Build an array from a contiguous slice.
    ///
    /// # Arguments
    /// - `data`: Elements in row-major order.
    /// - `shape`: Logical dimensions; `None` means `[data.len()]`. See [`IntoShape`].
    ///
    /// # Errors
    /// Returns [`ArrayConstructionError`] if `shape` does not hold
    /// `data.len()` elements or a dimension exceeds the engine's range.
    pub fn try_from_slice<T: HasDType>(
        &self,
        data: &[T],
        shape: impl IntoShape,
    ) -> Result<E::Handle, ArrayConstructionError> {
        let shape = resolve_shape(shape.into_shape(), data.len())?;
        self.build(data, &shape)
    }

    fn build<T: HasDType>(
        &self,
        data: &[T],
        shape: &[usize],
    ) -> Result<E::Handle, ArrayConstructionError> {
        let dims = engine_shape(shape)?;
        log::trace!("building {} array of shape {:?}", T::TYPE, shape);
        Ok(self
            .engine
            .from_bytes(bytemuck::cast_slice(data), &dims, T::TYPE))
    }

    /// Panicking form of [`Self::try_from_slice`].
    pub fn from_slice<T: HasDType>(&self, data: &[T], shape: impl IntoShape) -> E::Handle {
        expect_valid(self.try_from_slice(data, shape))
    }

    /// Build an array from any finite sequence.
    ///
    /// The sequence is drained into a contiguous buffer first, since the
    /// engine reads from a single base address.
    pub fn try_from_sequence<T, I>(
        &self,
        elements: I,
        shape: impl IntoShape,
    ) -> Result<E::Handle, ArrayConstructionError>
    where
        T: HasDType,
        I: IntoIterator<Item = T>,
    {
        let buffer: Vec<T> = elements.into_iter().collect();
        self.try_from_slice(&buffer, shape)
    }

    /// Panicking form of [`Self::try_from_sequence`].
    pub fn from_sequence<T, I>(&self, elements: I, shape: impl IntoShape) -> E::Handle
    where
        T: HasDType,
        I: IntoIterator<Item = T>,
    {
        expect_valid(self.try_from_sequence(elements, shape))
    }

    /// Build an `F32` array from double-precision values, narrowing each one.
    ///
    /// This is the only constructor that accepts `f64`.
    pub fn try_from_f64_narrowing(
        &self,
        data: &[f64],
        shape: impl IntoShape,
    ) -> Result<E::Handle, ArrayConstructionError> {
        let shape = resolve_shape(shape.into_shape(), data.len())?;
        log::debug!("narrowing {} f64 values to float32", data.len());
        let narrowed: Vec<f32> = data.iter().map(|&v| v as f32).collect();
        self.build(&narrowed, &shape)
    }

    /// Panicking form of [`Self::try_from_f64_narrowing`].
    pub fn from_f64_narrowing(&self, data: &[f64], shape: impl IntoShape) -> E::Handle {
        expect_valid(self.try_from_f64_narrowing(data, shape))
    }

    /// Reinterpret native-endian bytes as elements of `T` without conversion.
    ///
    /// The element count is `bytes.len() / size_of::<T>()`. No alignment is
    /// required; the engine copies the bytes.
    ///
    /// # Errors
    /// - [`ArrayConstructionError::WrongByteLen`] if the length is not a whole
    ///   number of elements.
    /// - [`ArrayConstructionError::ShapeMismatch`] as for [`Self::try_from_slice`].
    /// - [`ArrayConstructionError::InvalidBoolByte`] for `bool` buffers holding
    ///   anything but 0 and 1.
    pub fn try_from_raw_bytes<T: HasDType>(
        &self,
        bytes: &[u8],
        shape: impl IntoShape,
    ) -> Result<E::Handle, ArrayConstructionError> {
        let count = element_count(bytes.len(), T::TYPE)?;
        let shape = resolve_shape(shape.into_shape(), count)?;
        T::validate_bytes(bytes)?;
        let dims = engine_shape(&shape)?;
        log::trace!("reinterpreting {} bytes as {}", bytes.len(), T::TYPE);
        Ok(self.engine.from_bytes(bytes, &dims, T::TYPE))
    }

    /// Panicking form of [`Self::try_from_raw_bytes`].
    pub fn from_raw_bytes<T: HasDType>(&self, bytes: &[u8], shape: impl IntoShape) -> E::Handle {
        expect_valid(self.try_from_raw_bytes::<T>(bytes, shape))
    }

    /// [`Self::try_from_raw_bytes`] over an owned, length-carrying byte container.
    pub fn try_from_bytes<T: HasDType>(
        &self,
        bytes: &bytes::Bytes,
        shape: impl IntoShape,
    ) -> Result<E::Handle, ArrayConstructionError> {
        self.try_from_raw_bytes::<T>(bytes.as_ref(), shape)
    }

    /// Panicking form of [`Self::try_from_bytes`].
    pub fn from_bytes<T: HasDType>(
        &self,
        bytes: &bytes::Bytes,
        shape: impl IntoShape,
    ) -> E::Handle {
        expect_valid(self.try_from_bytes::<T>(bytes, shape))
    }

    /// Build an array of any dtype from its raw native-endian bytes.
    ///
    /// This is the passthrough for representations without a Rust element
    /// type here, such as `Complex64`.
    pub fn try_from_bytes_as_dtype(
        &self,
        bytes: &[u8],
        shape: impl IntoShape,
        dtype: DataType,
    ) -> Result<E::Handle, ArrayConstructionError> {
        let count = element_count(bytes.len(), dtype)?;
        let shape = resolve_shape(shape.into_shape(), count)?;
        if dtype == DataType::Bool {
            bool::validate_bytes(bytes)?;
        }
        let dims = engine_shape(&shape)?;
        Ok(self.engine.from_bytes(bytes, &dims, dtype))
    }

    /// Build an array with the shape and elements of an `ndarray`.
    ///
    /// Standard-layout arrays are passed through directly; any other layout
    /// is gathered in logical order first.
    pub fn try_from_ndarray<T, S, D>(
        &self,
        array: &ArrayBase<S, D>,
    ) -> Result<E::Handle, ArrayConstructionError>
    where
        T: HasDType,
        S: Data<Elem = T>,
        D: Dimension,
    {
        let shape = array.shape();
        match array.as_slice() {
            Some(elems) => self.try_from_slice(elems, shape),
            None => {
                let gathered: Vec<T> = array.iter().copied().collect();
                self.try_from_slice(&gathered, shape)
            }
        }
    }
}

fn element_count(byte_len: usize, dtype: DataType) -> Result<usize, ArrayConstructionError> {
    let width = dtype.byte_width();
    if byte_len % width != 0 {
        return Err(ArrayConstructionError::WrongByteLen {
            len: byte_len,
            dtype,
            width,
        });
    }
    Ok(byte_len / width)
}

/// Host-engine shorthands.
impl Array {
    /// Rank-0 array of `value`'s own dtype.
    pub fn scalar<T: HasDType>(value: T) -> Self {
        Constructor::new().scalar(value)
    }

    pub fn try_scalar_as<T: HasDType>(
        value: T,
        dtype: DataType,
    ) -> Result<Self, ArrayConstructionError> {
        Constructor::new().try_scalar_as(value, dtype)
    }

    pub fn scalar_as<T: HasDType>(value: T, dtype: DataType) -> Self {
        Constructor::new().scalar_as(value, dtype)
    }

    pub fn try_from_slice<T: HasDType>(
        data: &[T],
        shape: impl IntoShape,
    ) -> Result<Self, ArrayConstructionError> {
        Constructor::new().try_from_slice(data, shape)
    }

    pub fn from_slice<T: HasDType>(data: &[T], shape: impl IntoShape) -> Self {
        Constructor::new().from_slice(data, shape)
    }

    pub fn try_from_sequence<T, I>(
        elements: I,
        shape: impl IntoShape,
    ) -> Result<Self, ArrayConstructionError>
    where
        T: HasDType,
        I: IntoIterator<Item = T>,
    {
        Constructor::new().try_from_sequence(elements, shape)
    }

    pub fn from_sequence<T, I>(elements: I, shape: impl IntoShape) -> Self
    where
        T: HasDType,
        I: IntoIterator<Item = T>,
    {
        Constructor::new().from_sequence(elements, shape)
    }

    pub fn try_from_f64_narrowing(
        data: &[f64],
        shape: impl IntoShape,
    ) -> Result<Self, ArrayConstructionError> {
        Constructor::new().try_from_f64_narrowing(data, shape)
    }

    pub fn from_f64_narrowing(data: &[f64], shape: impl IntoShape) -> Self {
        Constructor::new().from_f64_narrowing(data, shape)
    }

    pub fn try_from_raw_bytes<T: HasDType>(
        bytes: &[u8],
        shape: impl IntoShape,
    ) -> Result<Self, ArrayConstructionError> {
        Constructor::new().try_from_raw_bytes::<T>(bytes, shape)
    }

    pub fn from_raw_bytes<T: HasDType>(bytes: &[u8], shape: impl IntoShape) -> Self {
        Constructor::new().from_raw_bytes::<T>(bytes, shape)
    }

    pub fn try_from_bytes<T: HasDType>(
        bytes: &bytes::Bytes,
        shape: impl IntoShape,
    ) -> Result<Self, ArrayConstructionError> {
        Constructor::new().try_from_bytes::<T>(bytes, shape)
    }

    pub fn from_bytes<T: HasDType>(bytes: &bytes::Bytes, shape: impl IntoShape) -> Self {
        Constructor::new().from_bytes::<T>(bytes, shape)
    }

    pub fn try_from_ndarray<T, S, D>(
        array: &ArrayBase<S, D>,
    ) -> Result<Self, ArrayConstructionError>
    where
        T: HasDType,
        S: Data<Elem = T>,
        D: Dimension,
    {
        Constructor::new().try_from_ndarray(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CastPolicy;

    #[test]
    fn slice_with_matching_shape() {
        let arr = Array::try_from_slice(&[1i32, 2, 3, 4], [2, 2]).unwrap();
        assert_eq!(arr.shape(), &[2, 2]);
        assert_eq!(arr.ndim(), 2);
        assert_eq!(arr.len(), 4);
    }

    #[test]
    fn slice_with_mismatched_shape() {
        let err = Array::try_from_slice(&[1i32, 2, 3, 4], [2, 3]).unwrap_err();
        match err {
            ArrayConstructionError::ShapeMismatch {
                shape,
                expected,
                actual,
            } => {
                assert_eq!(shape, vec![2, 3]);
                assert_eq!(expected, 6);
                assert_eq!(actual, 4);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    #[should_panic(expected = "invalid array construction")]
    fn from_slice_panics_on_mismatch() {
        let _ = Array::from_slice(&[1u8, 2, 3], [2, 2]);
    }

    #[test]
    fn sequence_is_drained_in_order() {
        let arr = Array::from_sequence((0u16..6).map(|v| v * 2), [3, 2]);
        let a = arr.try_as_ndarray::<u16>().unwrap();
        assert_eq!(a[[0, 0]], 0);
        assert_eq!(a[[1, 1]], 6);
        assert_eq!(a[[2, 1]], 10);
    }

    #[test]
    fn narrowing_checks_shape_first() {
        let err = Array::try_from_f64_narrowing(&[1.0, 2.0, 3.0], [2]).unwrap_err();
        assert!(matches!(err, ArrayConstructionError::ShapeMismatch { .. }));
    }

    #[test]
    fn raw_bytes_must_be_whole_elements() {
        let err = Array::try_from_raw_bytes::<i32>(&[0u8; 6], None).unwrap_err();
        assert_eq!(
            err,
            ArrayConstructionError::WrongByteLen {
                len: 6,
                dtype: DataType::I32,
                width: 4,
            }
        );
    }

    #[test]
    fn raw_bool_bytes_are_validated() {
        let err = Array::try_from_raw_bytes::<bool>(&[0, 1, 2], None).unwrap_err();
        assert_eq!(err, ArrayConstructionError::InvalidBoolByte);
        let ok = Array::from_raw_bytes::<bool>(&[0, 1, 1], None);
        let got: Vec<bool> = ok.try_as_ndarray::<bool>().unwrap().iter().copied().collect();
        assert_eq!(got, vec![false, true, true]);
    }

    #[test]
    fn bytes_container_passes_through() {
        let payload: Vec<u8> = [1.5f32, -2.0].iter().flat_map(|v| v.to_ne_bytes()).collect();
        let arr = Constructor::new()
            .try_from_bytes::<f32>(&bytes::Bytes::from(payload), None)
            .unwrap();
        let got: Vec<f32> = arr.try_as_ndarray::<f32>().unwrap().iter().copied().collect();
        assert_eq!(got, vec![1.5, -2.0]);
    }

    #[test]
    fn bytes_container_shorthand() {
        let payload = bytes::Bytes::from_static(&[1, 0, 2, 0, 3, 0, 4, 0]);
        let arr = Array::from_bytes::<u16>(&payload, [2, 2]);
        assert_eq!(arr.shape(), &[2, 2]);
        assert_eq!(arr.as_bytes(), payload.as_ref());

        let err = Array::try_from_bytes::<u16>(&payload, [3]).unwrap_err();
        assert!(matches!(
            err,
            ArrayConstructionError::ShapeMismatch { expected: 3, actual: 4, .. }
        ));
    }

    #[test]
    #[should_panic(expected = "invalid array construction")]
    fn from_bytes_panics_on_partial_element() {
        let _ = Array::from_bytes::<u32>(&bytes::Bytes::from_static(&[0, 0, 0]), None);
    }

    #[test]
    fn complex_passthrough_by_tag() {
        let pair: Vec<u8> = [1.0f32, -1.0].iter().flat_map(|v| v.to_ne_bytes()).collect();
        let rank0: &[usize] = &[];
        let arr = Constructor::new()
            .try_from_bytes_as_dtype(&pair, rank0, DataType::Complex64)
            .unwrap();
        assert_eq!(arr.dtype(), DataType::Complex64);
        assert_eq!(arr.shape(), &[] as &[usize]);
        assert_eq!(arr.as_bytes(), pair.as_slice());

        let err = Constructor::new()
            .try_from_bytes_as_dtype(&pair[..4], None, DataType::Complex64)
            .unwrap_err();
        assert!(matches!(err, ArrayConstructionError::WrongByteLen { .. }));
    }

    #[test]
    fn ndarray_standard_layout() {
        let nd = ndarray::Array::from_shape_vec((2, 3), vec![1i64, 2, 3, 4, 5, 6]).unwrap();
        let arr = Array::try_from_ndarray(&nd).unwrap();
        assert_eq!(arr.shape(), &[2, 3]);
        assert_eq!(arr.dtype(), DataType::I64);
    }

    #[test]
    fn ndarray_transposed_view_is_gathered() {
        let nd = ndarray::Array::from_shape_vec((2, 3), vec![1i32, 2, 3, 4, 5, 6]).unwrap();
        let t = nd.view().reversed_axes();
        let arr = Array::try_from_ndarray(&t).unwrap();
        assert_eq!(arr.shape(), &[3, 2]);
        let got: Vec<i32> = arr.try_as_ndarray::<i32>().unwrap().iter().copied().collect();
        assert_eq!(got, vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn checked_config_flows_into_scalar_coercion() {
        let ctor = Constructor::new()
            .with_config(ConstructorConfig::default().with_cast_policy(CastPolicy::Checked));
        assert!(matches!(
            ctor.try_scalar_as(300i32, DataType::U8),
            Err(ArrayConstructionError::OutOfRange { .. })
        ));
        let ok = ctor.try_scalar_as(200i32, DataType::U8).unwrap();
        assert_eq!(ok.try_item::<u8>().unwrap(), 200);
    }
}
