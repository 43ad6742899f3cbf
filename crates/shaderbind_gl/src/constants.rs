use shaderbind_hal::sampler::{Filter, MinFilter, WrapFunction};

pub trait GlConstant {
    fn gl_const(self) -> u32;
}

impl GlConstant for WrapFunction {
    fn gl_const(self) -> u32 {
        match self {
            WrapFunction::Clamp => glow::CLAMP_TO_EDGE,
            WrapFunction::Repeat => glow::REPEAT,
            WrapFunction::MirrorClamp => glow::MIRROR_CLAMP_TO_EDGE,
            WrapFunction::MirrorRepeat => glow::MIRRORED_REPEAT,
        }
    }
}

impl GlConstant for Filter {
    fn gl_const(self) -> u32 {
        match self {
            Filter::Linear => glow::LINEAR,
            Filter::Nearest => glow::NEAREST,
        }
    }
}

// GL names these {texel}_MIPMAP_{mipmap}
impl GlConstant for MinFilter {
    fn gl_const(self) -> u32 {
        match self {
            MinFilter::Origin(filter) => filter.gl_const(),
            MinFilter::Mipmap {
                mipmap: Filter::Nearest,
                texel: Filter::Nearest,
            } => glow::NEAREST_MIPMAP_NEAREST,
            MinFilter::Mipmap {
                mipmap: Filter::Nearest,
                texel: Filter::Linear,
            } => glow::LINEAR_MIPMAP_NEAREST,
            MinFilter::Mipmap {
                mipmap: Filter::Linear,
                texel: Filter::Nearest,
            } => glow::NEAREST_MIPMAP_LINEAR,
            MinFilter::Mipmap {
                mipmap: Filter::Linear,
                texel: Filter::Linear,
            } => glow::LINEAR_MIPMAP_LINEAR,
        }
    }
}
