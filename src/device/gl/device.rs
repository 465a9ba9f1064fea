use std::cell::Cell;
use std::os::raw::c_void;
use std::rc::Rc;

use gl::types::*;

use super::capabilities::Capabilities;
use super::types;
use crate::device::{
    BlendFactor, BufferId, BufferTarget, CullFace, Device, Feature, FrontFace, Hint, PixelStore,
    TextureId, Viewport, DEFAULT_UNPACK_ALIGNMENT,
};
use crate::errors::*;
use crate::math::prelude::Color;
use crate::texture::{TextureFilter, TextureParams, TextureWrap};

/// Tracks whether the OpenGL context of a `GLDevice` is current on this thread. The
/// windowing layer, which owns the context, flips it when it makes the context current
/// or releases it.
#[derive(Debug, Clone, Default)]
pub struct Currency(Rc<Cell<bool>>);

impl Currency {
    #[inline]
    pub fn make_current(&self) {
        self.0.set(true);
    }

    #[inline]
    pub fn release(&self) {
        self.0.set(false);
    }

    #[inline]
    pub fn is_current(&self) -> bool {
        self.0.get()
    }
}

pub struct GLDevice {
    capabilities: Capabilities,
    currency: Currency,
}

impl GLDevice {
    /// Loads the OpenGL functions with `loader`, and creates a device of the context which
    /// is current on this thread.
    ///
    /// # Unsafe
    ///
    /// The context the functions belong to must be current on this thread.
    pub unsafe fn load_with<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self::new()
    }

    /// Creates a device of the context which is current on this thread, with functions
    /// loaded already.
    pub unsafe fn new() -> Result<Self> {
        if !gl::GetString::is_loaded() || !gl::GetError::is_loaded() {
            return Err(Error::ContextNotCurrent);
        }

        let capabilities = Capabilities::parse()?;
        info!("GLDevice {:#?}", capabilities);

        // Extension queries are not allowed in core profiles, drains the errors raised.
        while gl::GetError() != gl::NO_ERROR {}

        let currency = Currency::default();
        currency.make_current();

        Ok(GLDevice {
            capabilities,
            currency,
        })
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Gets the shared currency flag of the context.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency.clone()
    }

    #[inline]
    fn toggle(feature: Feature, enabled: bool) -> Result<()> {
        unsafe {
            if enabled {
                gl::Enable(feature.into());
            } else {
                gl::Disable(feature.into());
            }

            check()
        }
    }
}

impl Device for GLDevice {
    fn is_current(&self) -> bool {
        self.currency.is_current()
    }

    fn hint_mipmap(&mut self, hint: Hint) -> Result<()> {
        unsafe {
            gl::Hint(types::GENERATE_MIPMAP_HINT, hint.into());
            check()
        }
    }

    fn pixel_store(&mut self, store: PixelStore, alignment: i32) -> Result<()> {
        unsafe {
            gl::PixelStorei(store.into(), alignment);
            check()
        }
    }

    fn clear_color(&mut self, color: Color) -> Result<()> {
        unsafe {
            gl::ClearColor(color.r, color.g, color.b, color.a);
            check()
        }
    }

    fn viewport(&mut self, vp: Viewport) -> Result<()> {
        unsafe {
            gl::Viewport(
                vp.position.x,
                vp.position.y,
                vp.size.x as GLsizei,
                vp.size.y as GLsizei,
            );

            check()
        }
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: BufferId) -> Result<()> {
        unsafe {
            match target {
                BufferTarget::Renderbuffer => gl::BindRenderbuffer(target.into(), id),
                _ => gl::BindFramebuffer(target.into(), id),
            }

            check()
        }
    }

    fn buffer_binding(&mut self, target: BufferTarget) -> Result<BufferId> {
        unsafe {
            let mut id = 0;
            gl::GetIntegerv(types::buffer_binding(target), &mut id);
            check()?;
            Ok(id as BufferId)
        }
    }

    fn enable(&mut self, feature: Feature) -> Result<()> {
        Self::toggle(feature, true)
    }

    fn disable(&mut self, feature: Feature) -> Result<()> {
        Self::toggle(feature, false)
    }

    fn front_face(&mut self, front: FrontFace) -> Result<()> {
        unsafe {
            gl::FrontFace(front.into());
            check()
        }
    }

    fn cull_face(&mut self, cull: CullFace) -> Result<()> {
        unsafe {
            gl::CullFace(cull.into());
            check()
        }
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) -> Result<()> {
        unsafe {
            gl::BlendFunc(src.into(), dst.into());
            check()
        }
    }

    fn max_texture_units(&mut self) -> Result<u32> {
        Ok(self.capabilities.max_combined_texture_image_units)
    }

    fn create_texture(&mut self) -> Result<TextureId> {
        unsafe {
            let mut id = 0;
            gl::GenTextures(1, &mut id);
            check()?;

            if id == 0 {
                return Err(Error::Device("[GL] Failed to generate texture.".into()));
            }

            Ok(id)
        }
    }

    fn delete_texture(&mut self, id: TextureId) -> Result<()> {
        unsafe {
            gl::DeleteTextures(1, &id);
            check()
        }
    }

    fn active_texture(&mut self, unit: u32) -> Result<()> {
        if unit >= self.capabilities.max_combined_texture_image_units {
            return Err(Error::Device(format!(
                "[GL] Texture unit {} is out of range.",
                unit
            )));
        }

        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            check()
        }
    }

    fn bind_texture(&mut self, id: TextureId) -> Result<()> {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, id);
            check()
        }
    }

    fn upload_texture(&mut self, params: &TextureParams, bytes: &[u8]) -> Result<()> {
        if params.mipmap && !self.capabilities.supports_mipmap(params.dimensions) {
            return Err(Error::Device(format!(
                "[GL] Mipmaps of non-power-of-two texture {}x{} are not supported.",
                params.dimensions.x, params.dimensions.y
            )));
        }

        let mut alignment = DEFAULT_UNPACK_ALIGNMENT;
        unsafe {
            gl::GetIntegerv(gl::UNPACK_ALIGNMENT, &mut alignment);
            check()?;
        }

        let (_, len) = params.image_len(alignment.max(1) as usize)?;
        if bytes.len() < len || bytes.is_empty() {
            return Err(Error::Device("[GL] Not enough pixel data.".into()));
        }

        let (internal_format, format, pixel_type) = types::texture_format(params.format);
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                internal_format as GLint,
                params.dimensions.x as GLsizei,
                params.dimensions.y as GLsizei,
                0,
                format,
                pixel_type,
                bytes.as_ptr() as *const c_void,
            );

            check()
        }
    }

    fn generate_mipmap(&mut self) -> Result<()> {
        unsafe {
            gl::GenerateMipmap(gl::TEXTURE_2D);
            check()
        }
    }

    fn texture_params(
        &mut self,
        wrap: TextureWrap,
        filter: TextureFilter,
        mipmap: bool,
    ) -> Result<()> {
        let wrap: GLenum = wrap.into();
        let (min, mag) = types::texture_filter(filter, mipmap);

        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mag as GLint);
            check()
        }
    }

    fn uniform_1i(&mut self, location: i32, value: i32) -> Result<()> {
        unsafe {
            gl::Uniform1i(location, value);
            check()
        }
    }
}

unsafe fn check() -> Result<()> {
    let msg = match gl::GetError() {
        gl::NO_ERROR => return Ok(()),
        gl::INVALID_ENUM => "[GL] An unacceptable value is specified for an enumerated argument.",
        gl::INVALID_VALUE => "[GL] A numeric argument is out of range.",
        gl::INVALID_OPERATION => "[GL] The specified operation is not allowed in the current state.",
        gl::INVALID_FRAMEBUFFER_OPERATION => {
            "[GL] The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        }
        gl::OUT_OF_MEMORY => "[GL] There is not enough memory left to execute the command.",
        _ => "[GL] Oops, Unknown OpenGL error.",
    };

    Err(Error::Device(msg.into()))
}
