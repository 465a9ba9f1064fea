//! The device layer, which should be responsible for only one thing: issuing primitive
//! state-setting and query calls against the graphics device of one context.
//!
//! Implementations do not deduplicate anything, every method call maps to exactly one
//! device call. Redundancy elimination is the job of `StateCache`.

pub mod headless;

#[cfg(not(target_arch = "wasm32"))]
pub mod gl;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};
use crate::texture::{TextureFilter, TextureParams, TextureWrap};

/// The boolean features of device which could be toggled with enable/disable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Blend,
    CullFace,
    DepthTest,
    Dither,
    PolygonOffsetFill,
    SampleAlphaToCoverage,
    SampleCoverage,
    ScissorTest,
    StencilTest,
}

/// The binding points of frame and render buffers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Binds both the draw and the read framebuffer.
    Framebuffer,
    DrawFramebuffer,
    ReadFramebuffer,
    Renderbuffer,
}

/// Defines which winding order of polygons is front-facing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FrontFace {
    Clockwise,
    CounterClockwise,
}

/// Specifies whether front- or back-facing polygons are culled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CullFace {
    Front,
    Back,
    FrontAndBack,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SourceAlpha,
    OneMinusSourceAlpha,
}

/// The implementation-specific quality hints.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hint {
    Fastest,
    Nicest,
    DontCare,
}

/// The pixel storage modes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelStore {
    UnpackAlignment,
    PackAlignment,
}

/// The viewport rectangle, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub position: Vector2<i32>,
    pub size: Vector2<u32>,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Viewport {
            position: Vector2::new(x, y),
            size: Vector2::new(width, height),
        }
    }
}

/// The name of a device texture object. `0` is the reserved "no texture" object.
pub type TextureId = u32;

/// The name of a frame or render buffer object.
pub type BufferId = u32;

/// The initial row alignment of pixel data read from client memory.
pub const DEFAULT_UNPACK_ALIGNMENT: i32 = 4;

/// The primitive calls of a graphics device context.
pub trait Device {
    /// Returns true if the context of this device is current on the calling thread.
    fn is_current(&self) -> bool;

    fn hint_mipmap(&mut self, hint: Hint) -> Result<()>;

    fn pixel_store(&mut self, store: PixelStore, alignment: i32) -> Result<()>;

    fn clear_color(&mut self, color: Color) -> Result<()>;

    fn viewport(&mut self, vp: Viewport) -> Result<()>;

    fn bind_buffer(&mut self, target: BufferTarget, id: BufferId) -> Result<()>;

    /// Queries the buffer currently bound to `target`.
    fn buffer_binding(&mut self, target: BufferTarget) -> Result<BufferId>;

    fn enable(&mut self, feature: Feature) -> Result<()>;

    fn disable(&mut self, feature: Feature) -> Result<()>;

    fn front_face(&mut self, front: FrontFace) -> Result<()>;

    fn cull_face(&mut self, cull: CullFace) -> Result<()>;

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) -> Result<()>;

    /// Returns the number of texture units which could be accessed by shaders.
    fn max_texture_units(&mut self) -> Result<u32>;

    fn create_texture(&mut self) -> Result<TextureId>;

    fn delete_texture(&mut self, id: TextureId) -> Result<()>;

    /// Selects the active texture unit.
    fn active_texture(&mut self, unit: u32) -> Result<()>;

    /// Binds texture object `id` to the active texture unit.
    fn bind_texture(&mut self, id: TextureId) -> Result<()>;

    /// Uploads the base level image of the texture bound to the active texture unit.
    fn upload_texture(&mut self, params: &TextureParams, bytes: &[u8]) -> Result<()>;

    fn generate_mipmap(&mut self) -> Result<()>;

    /// Applies the sampling parameters of the texture bound to the active texture unit.
    fn texture_params(
        &mut self,
        wrap: TextureWrap,
        filter: TextureFilter,
        mipmap: bool,
    ) -> Result<()>;

    /// Sets the integer uniform at `location` of the current program.
    fn uniform_1i(&mut self, location: i32, value: i32) -> Result<()>;
}
