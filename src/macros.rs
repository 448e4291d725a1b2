/// One-dimensional `int32` array from a list of integer literals.
///
/// ```
/// use dtype_array::{array, DataType};
///
/// let a = array![4, 5, 6];
/// assert_eq!(a.shape(), &[3]);
/// assert_eq!(a.dtype(), DataType::I32);
/// ```
#[macro_export]
macro_rules! array {
    ($($element:expr),* $(,)?) => {{
        let elements: &[i32] = &[$($element),*];
        $crate::Array::from_slice(elements, ::core::option::Option::None::<&[usize]>)
    }};
}
