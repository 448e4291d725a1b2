//! Scalar dtype coercion.
//!
//! A source value is classified at compile time as integer-like or
//! floating-point-like (see [`crate::construct::element`]) and widened to a
//! carrier that holds every value of its class exactly: `i128` for integers
//! and `f64` for floats. The carrier is then cast to the target dtype under
//! the configured [`CastPolicy`].
//!
//! | target            | integer source        | float source                  |
//! |-------------------|-----------------------|-------------------------------|
//! | `Bool`            | `v != 0`              | `v != 0.0`                    |
//! | integer           | wrapping cast         | truncate toward zero, saturate|
//! | `F16` / `F32`     | round to nearest      | round to nearest              |
//! | `BF16`/`Complex64`| unsupported           | unsupported                   |
//!
//! `F16` is unsupported when float16 is disabled for the build or config.

use half::f16;
use num_traits::ToPrimitive;

use crate::{
    config::{CastPolicy, ConstructorConfig},
    construct::{
        element::{FloatingPointLike, HasDType, IntegerLike},
        error::ArrayConstructionError,
    },
    dtype::DataType,
    engine::ArrayEngine,
};

/// A single value in one of the dtypes coercion can produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F16(f16),
    F32(f32),
}

impl Scalar {
    pub fn dtype(&self) -> DataType {
        match self {
            Scalar::Bool(_) => DataType::Bool,
            Scalar::U8(_) => DataType::U8,
            Scalar::U16(_) => DataType::U16,
            Scalar::U32(_) => DataType::U32,
            Scalar::U64(_) => DataType::U64,
            Scalar::I8(_) => DataType::I8,
            Scalar::I16(_) => DataType::I16,
            Scalar::I32(_) => DataType::I32,
            Scalar::I64(_) => DataType::I64,
            Scalar::F16(_) => DataType::F16,
            Scalar::F32(_) => DataType::F32,
        }
    }

    /// Build a rank-0 array, using the engine's dedicated primitive where the
    /// variant has one.
    pub fn into_array<E: ArrayEngine>(self, engine: &E) -> E::Handle {
        match self {
            Scalar::Bool(v) => v.scalar_array(engine),
            Scalar::U8(v) => v.scalar_array(engine),
            Scalar::U16(v) => v.scalar_array(engine),
            Scalar::U32(v) => v.scalar_array(engine),
            Scalar::U64(v) => v.scalar_array(engine),
            Scalar::I8(v) => v.scalar_array(engine),
            Scalar::I16(v) => v.scalar_array(engine),
            Scalar::I32(v) => v.scalar_array(engine),
            Scalar::I64(v) => v.scalar_array(engine),
            Scalar::F16(v) => engine.from_bytes(bytemuck::bytes_of(&v), &[], DataType::F16),
            Scalar::F32(v) => v.scalar_array(engine),
        }
    }
}

fn narrow<V: Copy, O>(
    value: V,
    policy: CastPolicy,
    truncate: impl FnOnce(V) -> O,
    checked: impl FnOnce(V) -> Option<O>,
    from: DataType,
    to: DataType,
) -> Result<O, ArrayConstructionError> {
    match policy {
        CastPolicy::Truncate => Ok(truncate(value)),
        CastPolicy::Checked => {
            checked(value).ok_or(ArrayConstructionError::OutOfRange { from, to })
        }
    }
}

fn unsupported(from: DataType, to: DataType) -> ArrayConstructionError {
    log::debug!("no coercion from {from} to {to}");
    ArrayConstructionError::UnsupportedCoercion { from, to }
}

/// Coerce an integer-like value. `bool` sources count as 0 or 1.
pub fn coerce_integer<T: IntegerLike>(
    value: T,
    target: DataType,
    config: &ConstructorConfig,
) -> Result<Scalar, ArrayConstructionError> {
    let from = T::TYPE;
    let v = value.to_i128();
    let policy = config.cast_policy;

    macro_rules! integer {
        ($variant:ident, $ty:ty, $to:ident) => {
            Scalar::$variant(narrow(v, policy, |v| v as $ty, |v| v.$to(), from, target)?)
        };
    }

    let scalar = match target {
        DataType::Bool => Scalar::Bool(v != 0),
        DataType::U8 => integer!(U8, u8, to_u8),
        DataType::U16 => integer!(U16, u16, to_u16),
        DataType::U32 => integer!(U32, u32, to_u32),
        DataType::U64 => integer!(U64, u64, to_u64),
        DataType::I8 => integer!(I8, i8, to_i8),
        DataType::I16 => integer!(I16, i16, to_i16),
        DataType::I32 => integer!(I32, i32, to_i32),
        DataType::I64 => integer!(I64, i64, to_i64),
        DataType::F16 if config.float16_enabled() => Scalar::F16(narrow(
            v,
            policy,
            |v| f16::from_f64(v as f64),
            |v| Some(f16::from_f64(v as f64)).filter(|h| h.is_finite()),
            from,
            target,
        )?),
        // Every integer carrier fits f32's range.
        DataType::F32 => Scalar::F32(v as f32),
        DataType::F16 | DataType::BF16 | DataType::Complex64 => {
            return Err(unsupported(from, target))
        }
    };
    log::debug!("coerced {from} value to {target}");
    Ok(scalar)
}

/// Coerce a floating-point-like value.
pub fn coerce_float<T: FloatingPointLike>(
    value: T,
    target: DataType,
    config: &ConstructorConfig,
) -> Result<Scalar, ArrayConstructionError> {
    let from = T::TYPE;
    let v = value.to_f64();
    let policy = config.cast_policy;

    // `ToPrimitive` truncates toward zero and returns `None` for NaN and out
    // of range values; `as` saturates and maps NaN to zero.
    macro_rules! integer {
        ($variant:ident, $ty:ty, $to:ident) => {
            Scalar::$variant(narrow(v, policy, |v| v as $ty, |v| v.$to(), from, target)?)
        };
    }

    let scalar = match target {
        DataType::Bool => Scalar::Bool(v != 0.0),
        DataType::U8 => integer!(U8, u8, to_u8),
        DataType::U16 => integer!(U16, u16, to_u16),
        DataType::U32 => integer!(U32, u32, to_u32),
        DataType::U64 => integer!(U64, u64, to_u64),
        DataType::I8 => integer!(I8, i8, to_i8),
        DataType::I16 => integer!(I16, i16, to_i16),
        DataType::I32 => integer!(I32, i32, to_i32),
        DataType::I64 => integer!(I64, i64, to_i64),
        DataType::F16 if config.float16_enabled() => Scalar::F16(narrow(
            v,
            policy,
            f16::from_f64,
            |v| Some(f16::from_f64(v)).filter(|h| v.is_finite() && h.is_finite()),
            from,
            target,
        )?),
        DataType::F32 => Scalar::F32(narrow(
            v,
            policy,
            |v| v as f32,
            |v| Some(v as f32).filter(|f| v.is_finite() && f.is_finite()),
            from,
            target,
        )?),
        DataType::F16 | DataType::BF16 | DataType::Complex64 => {
            return Err(unsupported(from, target))
        }
    };
    log::debug!("coerced {from} value to {target}");
    Ok(scalar)
}
