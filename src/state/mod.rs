//! A redundancy-free front of the graphics device.
//!
//! `StateCache` mirrors a fixed set of device state fields of one context. Every mutating
//! entry point compares the requested value against the mirror first, and issues the
//! underlying device call only if it would change something.
//!
//! ```
//! use crayon_gles::prelude::*;
//!
//! let device = HeadlessDevice::new(8);
//! let probe = device.probe();
//!
//! let mut state = StateCache::new(Box::new(device), Settings::default()).unwrap();
//! state.set_viewport(Viewport::new(0, 0, 100, 100)).unwrap();
//! state.set_viewport(Viewport::new(0, 0, 100, 100)).unwrap();
//!
//! assert_eq!(probe.count(|v| matches!(v, Call::Viewport(_))), 1);
//! ```

mod mirror;

pub use self::mirror::DeviceState;

use crate::device::*;
use crate::errors::*;
use crate::math::prelude::Color;
use crate::settings::Settings;

/// Whether `StateCache::bind_buffer` records the binding in the mirror.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Caching {
    /// Skips the call if the buffer is already bound, and records it otherwise.
    Cached,
    /// Always binds, without consulting nor updating the mirror. Used for transient
    /// bindings which should not affect later deduplication.
    Uncached,
}

pub struct StateCache {
    device: Box<dyn Device>,
    settings: Settings,
    mirror: DeviceState,
}

impl StateCache {
    /// Creates a state cache in front of `device`. Nothing is known about the device state
    /// yet, so the first request of every field reaches the device.
    pub fn new(device: Box<dyn Device>, settings: Settings) -> Result<Self> {
        settings.validate()?;
        info!("[StateCache] creates with {:?}.", settings);

        Ok(StateCache {
            device,
            settings,
            mirror: DeviceState::default(),
        })
    }

    #[inline]
    pub fn mirror(&self) -> &DeviceState {
        &self.mirror
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn device(&self) -> &dyn Device {
        self.device.as_ref()
    }

    /// Gets the raw device. Calls issued through it bypass the mirror.
    #[inline]
    pub fn device_mut(&mut self) -> &mut dyn Device {
        self.device.as_mut()
    }

    /// Fails with `Error::ContextNotCurrent` if the context is not current.
    pub fn ensure_current(&self) -> Result<()> {
        if self.device.is_current() {
            Ok(())
        } else {
            error!("[StateCache] {}", Error::ContextNotCurrent);
            Err(Error::ContextNotCurrent)
        }
    }

    /// Forgets everything known about the device state, except its capabilities. Use this
    /// after device calls that bypassed the cache.
    pub fn invalidate(&mut self) {
        let max_texture_units = self.mirror.max_texture_units;
        self.mirror = DeviceState::default();
        self.mirror.max_texture_units = max_texture_units;
    }

    /// Defines the initial state of the context: the mipmap generation hint and the pixel
    /// storage alignments. The calls are always issued.
    pub fn set_defaults(&mut self) -> Result<()> {
        self.ensure_current()?;

        let hint = self.settings.mipmap_hint;
        let unpack = self.settings.unpack_alignment;
        let pack = self.settings.pack_alignment;

        self.device.hint_mipmap(hint)?;
        self.mirror.mipmap_hint = Some(hint);

        self.device.pixel_store(PixelStore::UnpackAlignment, unpack)?;
        self.mirror.unpack_alignment = Some(unpack);

        self.device.pixel_store(PixelStore::PackAlignment, pack)?;
        self.mirror.pack_alignment = Some(pack);

        info!(
            "[StateCache] sets defaults, mipmap hint {:?}, unpack alignment {}, pack alignment {}.",
            hint, unpack, pack
        );

        Ok(())
    }

    /// Defines the clear color. Channels are clipped into [0.0, 1.0].
    pub fn set_clear_color<T: Into<Color>>(&mut self, color: T) -> Result<()> {
        self.ensure_current()?;

        let color = color.into().clip();
        if self.mirror.clear_color != Some(color) {
            self.device.clear_color(color)?;
            self.mirror.clear_color = Some(color);
        }

        Ok(())
    }

    /// Set the viewport relative to the bottom-left corner of the surface, in pixels.
    pub fn set_viewport(&mut self, vp: Viewport) -> Result<()> {
        self.ensure_current()?;

        if self.mirror.viewport != Some(vp) {
            self.device.viewport(vp)?;
            self.mirror.viewport = Some(vp);
        }

        Ok(())
    }

    /// Binds a frame or render buffer.
    pub fn bind_buffer(
        &mut self,
        target: BufferTarget,
        id: BufferId,
        caching: Caching,
    ) -> Result<()> {
        self.ensure_current()?;

        match caching {
            Caching::Cached => {
                if self.mirror.buffer(target) != Some(id) {
                    self.device.bind_buffer(target, id)?;
                    self.mirror.set_buffer(target, id);
                }
            }
            Caching::Uncached => {
                self.device.bind_buffer(target, id)?;
            }
        }

        Ok(())
    }

    /// Returns the current draw framebuffer, querying the device if it is not known yet.
    pub fn current_framebuffer(&mut self) -> Result<BufferId> {
        self.ensure_current()?;

        if let Some(id) = self.mirror.draw_framebuffer {
            return Ok(id);
        }

        let id = self.device.buffer_binding(BufferTarget::DrawFramebuffer)?;
        self.mirror.draw_framebuffer = Some(id);
        Ok(id)
    }

    /// Returns the current renderbuffer, querying the device if it is not known yet.
    pub fn current_renderbuffer(&mut self) -> Result<BufferId> {
        self.ensure_current()?;

        if let Some(id) = self.mirror.renderbuffer {
            return Ok(id);
        }

        let id = self.device.buffer_binding(BufferTarget::Renderbuffer)?;
        self.mirror.renderbuffer = Some(id);
        Ok(id)
    }

    /// Enables or disables a device feature.
    pub fn set_feature(&mut self, feature: Feature, enabled: bool) -> Result<()> {
        self.ensure_current()?;

        if self.mirror.feature(feature) != Some(enabled) {
            if enabled {
                self.device.enable(feature)?;
            } else {
                self.device.disable(feature)?;
            }

            self.mirror.features.insert(feature, enabled);
        }

        Ok(())
    }

    /// Sets the front face winding and the culled faces, and turns face culling on. If
    /// either of them is `None`, face culling is turned off instead.
    pub fn set_front_cull_face(
        &mut self,
        front: Option<FrontFace>,
        cull: Option<CullFace>,
    ) -> Result<()> {
        self.ensure_current()?;

        match (front, cull) {
            (Some(front), Some(cull)) => {
                if self.mirror.front_face != Some(front) {
                    self.device.front_face(front)?;
                    self.mirror.front_face = Some(front);
                }

                if self.mirror.cull_face != Some(cull) {
                    self.device.cull_face(cull)?;
                    self.mirror.cull_face = Some(cull);
                }

                self.set_feature(Feature::CullFace, true)
            }
            _ => {
                self.set_feature(Feature::CullFace, false)?;
                self.mirror.front_face = None;
                self.mirror.cull_face = None;
                Ok(())
            }
        }
    }

    /// Turns alpha blending on or off. The blend function is set to
    /// `(SourceAlpha, OneMinusSourceAlpha)` each time blending is turned on.
    pub fn set_blend_alpha(&mut self, enabled: bool) -> Result<()> {
        self.ensure_current()?;

        if self.mirror.blend_alpha != Some(enabled) {
            self.set_feature(Feature::Blend, enabled)?;
            if enabled {
                self.device
                    .blend_func(BlendFactor::SourceAlpha, BlendFactor::OneMinusSourceAlpha)?;
            }

            self.mirror.blend_alpha = Some(enabled);
        }

        Ok(())
    }

    /// Returns the number of texture units shaders could access. The device is queried only
    /// once, the value is clamped by `Settings::max_texture_units`.
    pub fn max_texture_units(&mut self) -> Result<u32> {
        self.ensure_current()?;

        if let Some(v) = self.mirror.max_texture_units {
            return Ok(v);
        }

        let reported = self.device.max_texture_units()?;
        let v = match self.settings.max_texture_units {
            Some(limit) => reported.min(limit),
            None => reported,
        };

        info!(
            "[StateCache] {} texture units available ({} reported by device).",
            v, reported
        );

        self.mirror.max_texture_units = Some(v);
        Ok(v)
    }

    /// Selects the active texture unit.
    pub fn active_texture(&mut self, unit: u32) -> Result<()> {
        self.ensure_current()?;

        if self.mirror.active_unit != Some(unit) {
            self.device.active_texture(unit)?;
            self.mirror.active_unit = Some(unit);
        }

        Ok(())
    }

    /// Binds texture object `id` to `unit`, which becomes the active unit.
    pub fn bind_texture(&mut self, unit: u32, id: TextureId) -> Result<()> {
        self.active_texture(unit)?;

        if self.mirror.texture(unit) != Some(id) {
            self.device.bind_texture(id)?;
            self.mirror.set_texture(unit, Some(id));
        }

        Ok(())
    }

    /// Returns the units which are known to have a texture object bound.
    pub fn bound_units(&self) -> Vec<u32> {
        self.mirror
            .textures
            .iter()
            .enumerate()
            .filter_map(|(i, v)| match *v {
                Some(id) if id != 0 => Some(i as u32),
                _ => None,
            })
            .collect()
    }

    /// Records that texture object `id` has been deleted, which reverts the units it was
    /// bound to to the "no texture" object.
    pub(crate) fn forget_texture(&mut self, id: TextureId) {
        for v in self.mirror.textures.iter_mut() {
            if *v == Some(id) {
                *v = Some(0);
            }
        }
    }
}
