use smallvec::SmallVec;

use crate::device::*;
use crate::math::prelude::Color;
use crate::utils::hash::FastHashMap;

/// The assumed current state of a device context. `None` stands for a field whose device
/// value is unknown, the next request for it always reaches the device.
///
/// The mirror is only correct as long as every transition of these fields goes through
/// the `StateCache` owning it, out-of-band device calls silently invalidate it.
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    pub mipmap_hint: Option<Hint>,
    pub unpack_alignment: Option<i32>,
    pub pack_alignment: Option<i32>,

    pub draw_framebuffer: Option<BufferId>,
    pub read_framebuffer: Option<BufferId>,
    pub renderbuffer: Option<BufferId>,

    pub features: FastHashMap<Feature, bool>,
    pub front_face: Option<FrontFace>,
    pub cull_face: Option<CullFace>,
    pub blend_alpha: Option<bool>,

    pub clear_color: Option<Color>,
    pub viewport: Option<Viewport>,

    pub active_unit: Option<u32>,
    /// The texture object bound to each unit, indexed by unit.
    pub textures: SmallVec<[Option<TextureId>; 16]>,

    pub max_texture_units: Option<u32>,
}

impl DeviceState {
    pub fn feature(&self, feature: Feature) -> Option<bool> {
        self.features.get(&feature).cloned()
    }

    pub fn texture(&self, unit: u32) -> Option<TextureId> {
        self.textures.get(unit as usize).cloned().unwrap_or(None)
    }

    /// Returns the buffer mirrored for `target`. A `Framebuffer` is only known if the draw
    /// and the read slots agree.
    pub fn buffer(&self, target: BufferTarget) -> Option<BufferId> {
        match target {
            BufferTarget::Framebuffer => {
                if self.draw_framebuffer == self.read_framebuffer {
                    self.draw_framebuffer
                } else {
                    None
                }
            }
            BufferTarget::DrawFramebuffer => self.draw_framebuffer,
            BufferTarget::ReadFramebuffer => self.read_framebuffer,
            BufferTarget::Renderbuffer => self.renderbuffer,
        }
    }

    pub(crate) fn set_buffer(&mut self, target: BufferTarget, id: BufferId) {
        match target {
            BufferTarget::Framebuffer => {
                self.draw_framebuffer = Some(id);
                self.read_framebuffer = Some(id);
            }
            BufferTarget::DrawFramebuffer => self.draw_framebuffer = Some(id),
            BufferTarget::ReadFramebuffer => self.read_framebuffer = Some(id),
            BufferTarget::Renderbuffer => self.renderbuffer = Some(id),
        }
    }

    pub(crate) fn set_texture(&mut self, unit: u32, id: Option<TextureId>) {
        let index = unit as usize;
        if self.textures.len() <= index {
            self.textures.resize(index + 1, None);
        }

        self.textures[index] = id;
    }
}
