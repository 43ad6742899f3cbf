use derive_more::Constructor;

/// A device binding slot pair: the texture unit a shader reads the texture through,
/// and the sampler unit holding the sampling parameters used for it.
#[derive(Constructor, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureUnit {
    pub texture: u32,
    pub sampler: u32,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    Linear,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinFilter {
    Origin(Filter),
    Mipmap { mipmap: Filter, texel: Filter },
}

impl Default for MinFilter {
    fn default() -> Self {
        Self::Mipmap {
            mipmap: Filter::Linear,
            texel: Filter::Nearest,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapFunction {
    Clamp,
    #[default]
    Repeat,
    MirrorClamp,
    MirrorRepeat,
}

/// Sampling parameters assigned to a sampler unit.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerState {
    pub wrap: WrapFunction,
    pub min_filter: MinFilter,
    pub mag_filter: Filter,
}
