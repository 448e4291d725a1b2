use smallvec::SmallVec;

use crate::{consts::INLINE_RANK, construct::error::ArrayConstructionError};

pub type Shape = SmallVec<[usize; INLINE_RANK]>;

pub fn num_elements(shape: &[usize]) -> Result<usize, ArrayConstructionError> {
    if shape.contains(&0) {
        return Ok(0);
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or(ArrayConstructionError::ShapeOverflow)
}

/// An optional shape argument.
///
/// `None` leaves the shape to the constructor; arrays, slices and vectors of
/// dimensions are explicit shapes.
pub trait IntoShape {
    fn into_shape(self) -> Option<Shape>;
}

impl IntoShape for Option<&[usize]> {
    fn into_shape(self) -> Option<Shape> {
        self.map(Shape::from_slice)
    }
}

impl IntoShape for &[usize] {
    fn into_shape(self) -> Option<Shape> {
        Some(Shape::from_slice(self))
    }
}

impl<const N: usize> IntoShape for [usize; N] {
    fn into_shape(self) -> Option<Shape> {
        Some(Shape::from_slice(&self))
    }
}

impl<const N: usize> IntoShape for &[usize; N] {
    fn into_shape(self) -> Option<Shape> {
        Some(Shape::from_slice(self))
    }
}

impl IntoShape for Vec<usize> {
    fn into_shape(self) -> Option<Shape> {
        Some(Shape::from_vec(self))
    }
}

/// Bind an optional caller shape to `count` elements.
///
/// With no shape the result is one-dimensional `[count]`.
pub fn resolve_shape(shape: Option<Shape>, count: usize) -> Result<Shape, ArrayConstructionError> {
    let Some(shape) = shape else {
        return Ok(smallvec::smallvec![count]);
    };
    let expected = num_elements(&shape)?;
    if expected != count {
        return Err(ArrayConstructionError::ShapeMismatch {
            shape: shape.to_vec(),
            expected,
            actual: count,
        });
    }
    Ok(shape)
}

/// Convert a shape to the engine's `i32` dimension width.
pub fn engine_shape(
    shape: &[usize],
) -> Result<SmallVec<[i32; INLINE_RANK]>, ArrayConstructionError> {
    shape
        .iter()
        .map(|&dim| {
            i32::try_from(dim).map_err(|_| ArrayConstructionError::DimensionTooLarge { dim })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_shape_defaults_to_one_dimension() {
        assert_eq!(resolve_shape(None, 4).unwrap().as_slice(), &[4]);
        assert_eq!(resolve_shape(None, 0).unwrap().as_slice(), &[0]);
    }

    #[test]
    fn explicit_shape_must_match_count() {
        assert_eq!(resolve_shape([2usize, 2].into_shape(), 4).unwrap().as_slice(), &[2, 2]);
        let err = resolve_shape([2usize, 3].into_shape(), 4).unwrap_err();
        assert_eq!(
            err,
            ArrayConstructionError::ShapeMismatch {
                shape: vec![2, 3],
                expected: 6,
                actual: 4,
            }
        );
    }

    #[test]
    fn zero_sized_dimensions() {
        assert_eq!(resolve_shape([3usize, 0].into_shape(), 0).unwrap().as_slice(), &[3, 0]);
        // The empty shape is a scalar and holds one element.
        assert!(resolve_shape([0usize; 0].into_shape(), 1).is_ok());
        assert!(resolve_shape([0usize; 0].into_shape(), 0).is_err());
    }

    #[test]
    fn zero_dimension_after_large_prefix() {
        let big = i32::MAX as usize;
        let shape = vec![big, big, big, 0];
        assert_eq!(num_elements(&shape), Ok(0));
        assert!(resolve_shape(shape.into_shape(), 0).is_ok());
        assert_eq!(num_elements(&[usize::MAX, 0, usize::MAX]), Ok(0));
    }

    #[test]
    fn overflowing_shape_is_rejected() {
        let err = resolve_shape(vec![usize::MAX, 2].into_shape(), 0).unwrap_err();
        assert_eq!(err, ArrayConstructionError::ShapeOverflow);
    }

    #[test]
    fn shape_argument_forms() {
        let dims: &[usize] = &[2, 3];
        assert_eq!(dims.into_shape().unwrap().as_slice(), &[2, 3]);
        assert_eq!((&[4usize, 1]).into_shape().unwrap().as_slice(), &[4, 1]);
        assert_eq!(Some(dims).into_shape().unwrap().as_slice(), &[2, 3]);
        assert!(None::<&[usize]>.into_shape().is_none());
    }

    #[test]
    fn engine_shape_checks_i32_range() {
        assert_eq!(engine_shape(&[2, 3]).unwrap().as_slice(), &[2, 3]);
        let too_big = i32::MAX as usize + 1;
        assert_eq!(
            engine_shape(&[too_big]).unwrap_err(),
            ArrayConstructionError::DimensionTooLarge { dim: too_big }
        );
    }
}
