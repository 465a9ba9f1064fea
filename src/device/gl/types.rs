use gl::types::*;

use crate::device::{BlendFactor, BufferTarget, CullFace, Feature, FrontFace, Hint, PixelStore};
use crate::texture::{TextureFilter, TextureFormat, TextureWrap};

// Enums of OpenGL ES 2 which are not part of the core profile bindings.
pub const GENERATE_MIPMAP_HINT: GLenum = 0x8192;
pub const LUMINANCE: GLenum = 0x1909;
pub const LUMINANCE_ALPHA: GLenum = 0x190A;

impl From<Feature> for GLenum {
    fn from(feature: Feature) -> Self {
        match feature {
            Feature::Blend => gl::BLEND,
            Feature::CullFace => gl::CULL_FACE,
            Feature::DepthTest => gl::DEPTH_TEST,
            Feature::Dither => gl::DITHER,
            Feature::PolygonOffsetFill => gl::POLYGON_OFFSET_FILL,
            Feature::SampleAlphaToCoverage => gl::SAMPLE_ALPHA_TO_COVERAGE,
            Feature::SampleCoverage => gl::SAMPLE_COVERAGE,
            Feature::ScissorTest => gl::SCISSOR_TEST,
            Feature::StencilTest => gl::STENCIL_TEST,
        }
    }
}

impl From<BufferTarget> for GLenum {
    fn from(target: BufferTarget) -> Self {
        match target {
            BufferTarget::Framebuffer => gl::FRAMEBUFFER,
            BufferTarget::DrawFramebuffer => gl::DRAW_FRAMEBUFFER,
            BufferTarget::ReadFramebuffer => gl::READ_FRAMEBUFFER,
            BufferTarget::Renderbuffer => gl::RENDERBUFFER,
        }
    }
}

/// Returns the enum to query the binding of `target` with.
pub fn buffer_binding(target: BufferTarget) -> GLenum {
    match target {
        BufferTarget::Framebuffer | BufferTarget::DrawFramebuffer => gl::DRAW_FRAMEBUFFER_BINDING,
        BufferTarget::ReadFramebuffer => gl::READ_FRAMEBUFFER_BINDING,
        BufferTarget::Renderbuffer => gl::RENDERBUFFER_BINDING,
    }
}

impl From<FrontFace> for GLenum {
    fn from(front: FrontFace) -> Self {
        match front {
            FrontFace::Clockwise => gl::CW,
            FrontFace::CounterClockwise => gl::CCW,
        }
    }
}

impl From<CullFace> for GLenum {
    fn from(cull: CullFace) -> Self {
        match cull {
            CullFace::Front => gl::FRONT,
            CullFace::Back => gl::BACK,
            CullFace::FrontAndBack => gl::FRONT_AND_BACK,
        }
    }
}

impl From<BlendFactor> for GLenum {
    fn from(factor: BlendFactor) -> Self {
        match factor {
            BlendFactor::Zero => gl::ZERO,
            BlendFactor::One => gl::ONE,
            BlendFactor::SourceAlpha => gl::SRC_ALPHA,
            BlendFactor::OneMinusSourceAlpha => gl::ONE_MINUS_SRC_ALPHA,
        }
    }
}

impl From<Hint> for GLenum {
    fn from(hint: Hint) -> Self {
        match hint {
            Hint::Fastest => gl::FASTEST,
            Hint::Nicest => gl::NICEST,
            Hint::DontCare => gl::DONT_CARE,
        }
    }
}

impl From<PixelStore> for GLenum {
    fn from(store: PixelStore) -> Self {
        match store {
            PixelStore::UnpackAlignment => gl::UNPACK_ALIGNMENT,
            PixelStore::PackAlignment => gl::PACK_ALIGNMENT,
        }
    }
}

impl From<TextureWrap> for GLenum {
    fn from(wrap: TextureWrap) -> Self {
        match wrap {
            TextureWrap::Repeat => gl::REPEAT,
            TextureWrap::Mirror => gl::MIRRORED_REPEAT,
            TextureWrap::Clamp => gl::CLAMP_TO_EDGE,
        }
    }
}

/// Returns the (min, mag) filters of a texture.
pub fn texture_filter(filter: TextureFilter, mipmap: bool) -> (GLenum, GLenum) {
    match filter {
        TextureFilter::Nearest => {
            let min = if mipmap {
                gl::NEAREST_MIPMAP_NEAREST
            } else {
                gl::NEAREST
            };

            (min, gl::NEAREST)
        }
        TextureFilter::Linear => {
            let min = if mipmap {
                gl::LINEAR_MIPMAP_LINEAR
            } else {
                gl::LINEAR
            };

            (min, gl::LINEAR)
        }
    }
}

/// Returns the (internal format, format, pixel type) of unsized OpenGL ES 2 textures.
pub fn texture_format(format: TextureFormat) -> (GLenum, GLenum, GLenum) {
    match format {
        TextureFormat::U8 => (LUMINANCE, LUMINANCE, gl::UNSIGNED_BYTE),
        TextureFormat::U8U8 => (LUMINANCE_ALPHA, LUMINANCE_ALPHA, gl::UNSIGNED_BYTE),
        TextureFormat::U8U8U8 => (gl::RGB, gl::RGB, gl::UNSIGNED_BYTE),
        TextureFormat::U8U8U8U8 => (gl::RGBA, gl::RGBA, gl::UNSIGNED_BYTE),
        TextureFormat::U5U6U5 => (gl::RGB, gl::RGB, gl::UNSIGNED_SHORT_5_6_5),
        TextureFormat::U4U4U4U4 => (gl::RGBA, gl::RGBA, gl::UNSIGNED_SHORT_4_4_4_4),
        TextureFormat::U5U5U5U1 => (gl::RGBA, gl::RGBA, gl::UNSIGNED_SHORT_5_5_5_1),
    }
}
