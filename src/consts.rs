/// Whether this build carries a half-precision float representation.
///
/// Resolved at build time from the `f16` feature. The coercion matrix still
/// consults it at run time because the target dtype is a run-time value.
pub const FLOAT16_AVAILABLE: bool = cfg!(feature = "f16");

/// Inline capacity of a stored shape before it spills to the heap.
pub const INLINE_RANK: usize = 4;
