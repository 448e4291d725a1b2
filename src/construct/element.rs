//! Element types an array can be built from.
//!
//! [`HasDType`] ties a Rust type to the [`DataType`] it is stored as, picks
//! the engine primitive a single value is built with, and converts a value to
//! another dtype. Every implementation is either [`IntegerLike`] or
//! [`FloatingPointLike`] and forwards its conversion to the matching
//! function in [`crate::construct::coerce`].
//!
//! The trait is sealed. Typed views of stored bytes rely on `size_of::<T>()`
//! being the byte width of `T::TYPE`, so only the types below implement it:
//!
//! ```compile_fail
//! use dtype_array::{ArrayConstructionError, ConstructorConfig, DataType, HasDType, Scalar};
//!
//! #[derive(Clone, Copy)]
//! #[repr(transparent)]
//! struct Wide(u64);
//! unsafe impl bytemuck::NoUninit for Wide {}
//!
//! impl HasDType for Wide {
//!     const TYPE: DataType = DataType::U8;
//!
//!     fn coerce(
//!         self,
//!         _: DataType,
//!         _: &ConstructorConfig,
//!     ) -> Result<Scalar, ArrayConstructionError> {
//!         unimplemented!()
//!     }
//! }
//! ```
//!
//! `f64` is intentionally not an element type. Double-precision input goes
//! through [`crate::Constructor::try_from_f64_narrowing`], which makes the
//! precision loss visible at the call site.

use crate::{
    config::ConstructorConfig,
    construct::{
        coerce::{coerce_float, coerce_integer, Scalar},
        error::ArrayConstructionError,
    },
    dtype::DataType,
    engine::ArrayEngine,
};

mod sealed {
    pub trait Sealed {}

    macro_rules! seal {
        ($($ty:ty),*) => {
            $(impl Sealed for $ty {})*
        };
    }

    seal!(bool, u8, u16, u32, u64, i8, i16, i32, i64, f32, half::bf16);

    #[cfg(feature = "f16")]
    impl Sealed for half::f16 {}
}

/// A Rust type that stores as one [`DataType`].
///
/// `size_of::<Self>()` always equals `Self::TYPE.byte_width()`.
pub trait HasDType: sealed::Sealed + Copy + bytemuck::NoUninit {
    /// The dtype values of this type are stored as.
    const TYPE: DataType;

    /// Build a rank-0 array holding `self`.
    ///
    /// The default passes the value's bytes to the engine's byte primitive
    /// with an empty shape. Types with a dedicated engine primitive override it.
    fn scalar_array<E: ArrayEngine>(self, engine: &E) -> E::Handle {
        engine.from_bytes(bytemuck::bytes_of(&self), &[], Self::TYPE)
    }

    /// Convert `self` to a value of `target`.
    fn coerce(
        self,
        target: DataType,
        config: &ConstructorConfig,
    ) -> Result<Scalar, ArrayConstructionError>;

    /// Check that `bytes` is a valid encoding of a run of `Self` values.
    fn validate_bytes(_bytes: &[u8]) -> Result<(), ArrayConstructionError> {
        Ok(())
    }
}

/// Element types interpreted as binary integers when coerced.
pub trait IntegerLike: HasDType {
    fn to_i128(self) -> i128;
}

/// Element types interpreted as binary floating point when coerced.
pub trait FloatingPointLike: HasDType {
    /// Lossless widening.
    fn to_f64(self) -> f64;
}

macro_rules! impl_integer_like {
    ($ty:ty, $dtype:ident) => {
        impl HasDType for $ty {
            const TYPE: DataType = DataType::$dtype;

            fn coerce(
                self,
                target: DataType,
                config: &ConstructorConfig,
            ) -> Result<Scalar, ArrayConstructionError> {
                coerce_integer(self, target, config)
            }
        }

        impl IntegerLike for $ty {
            fn to_i128(self) -> i128 {
                self as i128
            }
        }
    };
}

impl_integer_like!(u8, U8);
impl_integer_like!(u16, U16);
impl_integer_like!(u32, U32);
impl_integer_like!(u64, U64);
impl_integer_like!(i8, I8);
impl_integer_like!(i16, I16);
impl_integer_like!(i64, I64);

impl HasDType for i32 {
    const TYPE: DataType = DataType::I32;

    fn scalar_array<E: ArrayEngine>(self, engine: &E) -> E::Handle {
        engine.from_i32(self)
    }

    fn coerce(
        self,
        target: DataType,
        config: &ConstructorConfig,
    ) -> Result<Scalar, ArrayConstructionError> {
        coerce_integer(self, target, config)
    }
}

impl IntegerLike for i32 {
    fn to_i128(self) -> i128 {
        self as i128
    }
}

impl HasDType for bool {
    const TYPE: DataType = DataType::Bool;

    fn scalar_array<E: ArrayEngine>(self, engine: &E) -> E::Handle {
        engine.from_bool(self)
    }

    fn coerce(
        self,
        target: DataType,
        config: &ConstructorConfig,
    ) -> Result<Scalar, ArrayConstructionError> {
        coerce_integer(self, target, config)
    }

    fn validate_bytes(bytes: &[u8]) -> Result<(), ArrayConstructionError> {
        if bytes.iter().any(|&b| b != 0 && b != 1) {
            return Err(ArrayConstructionError::InvalidBoolByte);
        }
        Ok(())
    }
}

/// `false` is 0 and `true` is 1.
impl IntegerLike for bool {
    fn to_i128(self) -> i128 {
        i128::from(self)
    }
}

impl HasDType for f32 {
    const TYPE: DataType = DataType::F32;

    fn scalar_array<E: ArrayEngine>(self, engine: &E) -> E::Handle {
        engine.from_f32(self)
    }

    fn coerce(
        self,
        target: DataType,
        config: &ConstructorConfig,
    ) -> Result<Scalar, ArrayConstructionError> {
        coerce_float(self, target, config)
    }
}

impl FloatingPointLike for f32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

#[cfg(feature = "f16")]
impl HasDType for half::f16 {
    const TYPE: DataType = DataType::F16;

    fn coerce(
        self,
        target: DataType,
        config: &ConstructorConfig,
    ) -> Result<Scalar, ArrayConstructionError> {
        coerce_float(self, target, config)
    }
}

#[cfg(feature = "f16")]
impl FloatingPointLike for half::f16 {
    fn to_f64(self) -> f64 {
        half::f16::to_f64(self)
    }
}

/// bfloat16 data passes through unchanged; it can be coerced *from* but is
/// never produced by coercion.
impl HasDType for half::bf16 {
    const TYPE: DataType = DataType::BF16;

    fn coerce(
        self,
        target: DataType,
        config: &ConstructorConfig,
    ) -> Result<Scalar, ArrayConstructionError> {
        coerce_float(self, target, config)
    }
}

impl FloatingPointLike for half::bf16 {
    fn to_f64(self) -> f64 {
        half::bf16::to_f64(self)
    }
}
