use bytemuck::Pod;
use shaderbind_hal::{uniforms::UniformKind, Matrix4, Vector3, Vector4};

/// Cached payload of a uniform.
///
/// Exactly one variant is live for the lifetime of a uniform, selected by its kind
/// at construction. Array storage is boxed since its length never changes.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformData<T> {
    Float(Box<[f32]>),
    Float3(Box<[Vector3<f32>]>),
    Float4(Box<[Vector4<f32>]>),
    Matrix44(Box<[Matrix4<f32>]>),
    Texture(Option<T>),
}

impl<T> UniformData<T> {
    /// Allocates `count` zeroed elements for numeric kinds, or an unset texture.
    pub fn zeroed(kind: UniformKind, count: usize) -> Self {
        match kind {
            UniformKind::Float => UniformData::Float(vec![0.0; count].into_boxed_slice()),
            UniformKind::Float3 => {
                UniformData::Float3(vec![Vector3::zeros(); count].into_boxed_slice())
            }
            UniformKind::Float4 => {
                UniformData::Float4(vec![Vector4::zeros(); count].into_boxed_slice())
            }
            UniformKind::Matrix44 => {
                UniformData::Matrix44(vec![Matrix4::zeros(); count].into_boxed_slice())
            }
            UniformKind::Texture => UniformData::Texture(None),
        }
    }

    pub fn kind(&self) -> UniformKind {
        match self {
            UniformData::Float(_) => UniformKind::Float,
            UniformData::Float3(_) => UniformKind::Float3,
            UniformData::Float4(_) => UniformKind::Float4,
            UniformData::Matrix44(_) => UniformKind::Matrix44,
            UniformData::Texture(_) => UniformKind::Texture,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            UniformData::Float(v) => v.len(),
            UniformData::Float3(v) => v.len(),
            UniformData::Float4(v) => v.len(),
            UniformData::Matrix44(v) => v.len(),
            UniformData::Texture(_) => 1,
        }
    }

    /// The whole cached array as it is laid out in the constant buffer.
    pub fn bytes(&self) -> &[u8] {
        match self {
            UniformData::Float(v) => bytemuck::cast_slice(v),
            UniformData::Float3(v) => bytemuck::cast_slice(v),
            UniformData::Float4(v) => bytemuck::cast_slice(v),
            UniformData::Matrix44(v) => bytemuck::cast_slice(v),
            UniformData::Texture(_) => &[],
        }
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        match self {
            UniformData::Float(v) => bytemuck::cast_slice_mut(v),
            UniformData::Float3(v) => bytemuck::cast_slice_mut(v),
            UniformData::Float4(v) => bytemuck::cast_slice_mut(v),
            UniformData::Matrix44(v) => bytemuck::cast_slice_mut(v),
            UniformData::Texture(_) => &mut [],
        }
    }
}

mod private {
    pub trait Sealed {}
}

/// A numeric value type a uniform can hold.
pub trait UniformValue: Pod + private::Sealed {
    const KIND: UniformKind;

    fn cached<T>(data: &UniformData<T>) -> Option<&[Self]>;

    fn cached_mut<T>(data: &mut UniformData<T>) -> Option<&mut [Self]>;
}

macro_rules! uniform_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl UniformValue for $ty {
                const KIND: UniformKind = UniformKind::$kind;

                fn cached<T>(data: &UniformData<T>) -> Option<&[Self]> {
                    match data {
                        UniformData::$kind(values) => Some(&values[..]),
                        _ => None,
                    }
                }

                fn cached_mut<T>(data: &mut UniformData<T>) -> Option<&mut [Self]> {
                    match data {
                        UniformData::$kind(values) => Some(&mut values[..]),
                        _ => None,
                    }
                }
            }
        )*
    };
}

uniform_value! {
    f32 => Float,
    Vector3<f32> => Float3,
    Vector4<f32> => Float4,
    Matrix4<f32> => Matrix44,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_sizes() {
        for kind in UniformKind::ALL {
            let data = UniformData::<u32>::zeroed(kind, 3);
            assert_eq!(data.kind(), kind);

            if kind == UniformKind::Texture {
                assert_eq!(data.len(), 1);
                assert!(data.bytes().is_empty());
            } else {
                assert_eq!(data.len(), 3);
                assert_eq!(data.bytes().len(), kind.size() * 3);
                assert!(data.bytes().iter().all(|&b| b == 0));
            }
        }
    }

    #[test]
    fn test_only_matching_variant_is_accessible() {
        let mut data = UniformData::<u32>::zeroed(UniformKind::Float4, 2);
        assert!(Vector4::<f32>::cached(&data).is_some());
        assert!(f32::cached(&data).is_none());
        assert!(Vector3::<f32>::cached_mut(&mut data).is_none());
        assert!(Matrix4::<f32>::cached_mut(&mut data).is_none());
    }

    #[test]
    fn test_matrix_bytes_are_column_major() {
        let mut data = UniformData::<u32>::zeroed(UniformKind::Matrix44, 1);
        let translation = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        Matrix4::<f32>::cached_mut(&mut data).unwrap()[0] = translation;

        let floats: &[f32] = bytemuck::cast_slice(data.bytes());
        assert_eq!(&floats[12..15], &[1.0, 2.0, 3.0]);
    }
}
