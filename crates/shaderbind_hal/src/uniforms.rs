use nalgebra::{Matrix4, Vector3, Vector4};

use crate::sampler::TextureUnit;

pub use shaderbind_hal_macro::Uniforms;

/// UniformKind is the type tag of a shader constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Float,
    Float3,
    Float4,
    Matrix44,
    Texture,
}

impl UniformKind {
    pub const ALL: [UniformKind; 5] = [
        UniformKind::Float,
        UniformKind::Float3,
        UniformKind::Float4,
        UniformKind::Matrix44,
        UniformKind::Texture,
    ];

    /// Size of a single element in the constant buffer.
    /// Textures are bound through units and take no buffer space.
    pub const fn size(self) -> usize {
        match self {
            UniformKind::Float => 4,
            UniformKind::Float3 => 4 * 3,
            UniformKind::Float4 => 4 * 4,
            UniformKind::Matrix44 => 4 * 16,
            UniformKind::Texture => 0,
        }
    }
}

/// Where the data of a uniform goes on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformBinding {
    /// Byte offset into the constant buffer of the owning stage.
    Constant { offset: usize },
    /// Texture and sampler units the texture is bound to.
    Texture(TextureUnit),
}

/// A single entry of a constant layout, as supplied once at program link time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot<'a> {
    pub name: &'a str,
    pub kind: UniformKind,
    pub count: usize,
    pub binding: UniformBinding,
}

impl<'a> UniformSlot<'a> {
    pub const fn constant(name: &'a str, kind: UniformKind, count: usize, offset: usize) -> Self {
        Self {
            name,
            kind,
            count,
            binding: UniformBinding::Constant { offset },
        }
    }

    pub const fn texture(name: &'a str, unit: TextureUnit) -> Self {
        Self {
            name,
            kind: UniformKind::Texture,
            count: 1,
            binding: UniformBinding::Texture(unit),
        }
    }

    /// Number of bytes this slot occupies in the constant buffer,
    /// `None` if it doesn't fit in `usize`.
    pub const fn size(&self) -> Option<usize> {
        self.kind.size().checked_mul(self.count)
    }
}

/// Uniforms is implemented by `#[repr(C)]` structs mirroring a constant block,
/// usually through `#[derive(Uniforms)]`.
pub trait Uniforms {
    const LAYOUT: &'static [UniformSlot<'static>];
}

impl Uniforms for () {
    const LAYOUT: &'static [UniformSlot<'static>] = &[];
}

/// Maps a struct field type to the uniform kind and array length it represents.
pub trait UniformField {
    const KIND: UniformKind;
    const COUNT: usize;
}

macro_rules! uniform_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl UniformField for $ty {
                const KIND: UniformKind = UniformKind::$kind;
                const COUNT: usize = 1;
            }

            impl<const N: usize> UniformField for [$ty; N] {
                const KIND: UniformKind = UniformKind::$kind;
                const COUNT: usize = N;
            }
        )*
    };
}

uniform_field! {
    f32 => Float,
    Vector3<f32> => Float3,
    Vector4<f32> => Float4,
    Matrix4<f32> => Matrix44,
}
