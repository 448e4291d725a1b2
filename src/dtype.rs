use std::fmt;

/// Element representation of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DataType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F16,
    F32,
    BF16,
    Complex64,
}

impl DataType {
    /// Width of a single element in bytes.
    pub const fn byte_width(&self) -> usize {
        match self {
            DataType::Bool | DataType::U8 | DataType::I8 => 1,
            DataType::U16 | DataType::I16 | DataType::F16 | DataType::BF16 => 2,
            DataType::U32 | DataType::I32 | DataType::F32 => 4,
            DataType::U64 | DataType::I64 | DataType::Complex64 => 8,
        }
    }

    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::U8
                | DataType::U16
                | DataType::U32
                | DataType::U64
                | DataType::I8
                | DataType::I16
                | DataType::I32
                | DataType::I64
        )
    }

    pub const fn is_floating_point(&self) -> bool {
        matches!(self, DataType::F16 | DataType::F32 | DataType::BF16)
    }

    /// Whether scalar coercion can ever produce this dtype.
    ///
    /// `BF16` and `Complex64` arrays can only be built from native data of that
    /// representation, never by converting a value of another dtype.
    pub const fn is_coercion_target(&self) -> bool {
        !matches!(self, DataType::BF16 | DataType::Complex64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Bool => "bool",
            DataType::U8 => "uint8",
            DataType::U16 => "uint16",
            DataType::U32 => "uint32",
            DataType::U64 => "uint64",
            DataType::I8 => "int8",
            DataType::I16 => "int16",
            DataType::I32 => "int32",
            DataType::I64 => "int64",
            DataType::F16 => "float16",
            DataType::F32 => "float32",
            DataType::BF16 => "bfloat16",
            DataType::Complex64 => "complex64",
        };
        f.write_str(name)
    }
}
