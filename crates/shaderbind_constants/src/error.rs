use shaderbind_hal::uniforms::UniformKind;
use thiserror::Error;

/// Errors reported by the checked uniform accessors.
///
/// The unchecked setters swallow these and leave the cell untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UniformError {
    #[error("uniform `{name}` holds {expected:?} values, but {actual:?} was given")]
    TypeMismatch {
        name: String,
        expected: UniformKind,
        actual: UniformKind,
    },
    #[error("index {index} is out of range for uniform `{name}` with {count} elements")]
    IndexOutOfRange {
        name: String,
        index: usize,
        count: usize,
    },
    #[error("uniform `{0}` is not defined by the program")]
    UnknownUniform(String),
}

/// Errors found while building a constant table from a link-time layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("uniform `{0}` has zero elements")]
    ZeroCount(String),
    #[error("uniform `{0}` is declared more than once")]
    DuplicateName(String),
    #[error("texture uniform `{0}` cannot be placed in the constant buffer")]
    TextureInConstantSlot(String),
    #[error("uniform `{0}` is not a texture but is bound to a texture unit")]
    ConstantInTextureSlot(String),
    #[error("texture uniform `{name}` has {count} elements, texture arrays are not supported")]
    TextureArray { name: String, count: usize },
    #[error("uniform `{0}` does not fit in the address space")]
    OutOfRange(String),
    #[error("uniforms `{first}` and `{second}` overlap in the constant buffer")]
    Overlap { first: String, second: String },
}
