//! A context-free device which keeps a software model of the device state and records
//! every call issued through it.

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use smallvec::SmallVec;

use super::*;
use crate::utils::hash::{FastHashMap, FastHashSet};

/// One issued device call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    HintMipmap(Hint),
    PixelStore(PixelStore, i32),
    ClearColor(Color),
    Viewport(Viewport),
    BindBuffer(BufferTarget, BufferId),
    BufferBinding(BufferTarget),
    Enable(Feature),
    Disable(Feature),
    FrontFace(FrontFace),
    CullFace(CullFace),
    BlendFunc(BlendFactor, BlendFactor),
    MaxTextureUnits,
    CreateTexture(TextureId),
    DeleteTexture(TextureId),
    ActiveTexture(u32),
    BindTexture(TextureId),
    UploadTexture(Vector2<u32>),
    GenerateMipmap,
    TextureParams(TextureWrap, TextureFilter, bool),
    Uniform1i(i32, i32),
}

#[derive(Debug)]
struct HeadlessState {
    calls: Vec<Call>,
    current: bool,
    reject_uploads: bool,
    max_texture_units: u32,
    unpack_alignment: i32,

    next_texture: TextureId,
    textures: FastHashSet<TextureId>,
    active_unit: u32,
    units: SmallVec<[TextureId; 16]>,
    draw_framebuffer: BufferId,
    read_framebuffer: BufferId,
    renderbuffer: BufferId,
    uniforms: FastHashMap<i32, i32>,
}

/// A shared view into the state of a `HeadlessDevice`, which stays usable after the
/// device itself has been handed over to a `StateCache`.
#[derive(Debug, Clone)]
pub struct Probe {
    state: Rc<RefCell<HeadlessState>>,
}

impl Probe {
    /// Returns a snapshot of all the calls issued so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Counts the issued calls matching `predicate`.
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Call) -> bool,
    {
        self.state.borrow().calls.iter().filter(|&v| predicate(v)).count()
    }

    /// Forgets the calls issued so far. The modeled device state is kept.
    pub fn clear(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn set_current(&self, current: bool) {
        self.state.borrow_mut().current = current;
    }

    /// Makes every following texture upload fail.
    pub fn reject_uploads(&self, reject: bool) {
        self.state.borrow_mut().reject_uploads = reject;
    }

    /// Binds a buffer behind the back of any cache.
    pub fn bind_buffer_out_of_band(&self, target: BufferTarget, id: BufferId) {
        self.state.borrow_mut().bind_buffer(target, id);
    }

    /// Returns the texture object bound to `unit`.
    pub fn bound_texture(&self, unit: u32) -> TextureId {
        let state = self.state.borrow();
        state.units.get(unit as usize).cloned().unwrap_or(0)
    }

    /// Returns the row alignment of pixel data read by uploads.
    pub fn unpack_alignment(&self) -> i32 {
        self.state.borrow().unpack_alignment
    }

    pub fn active_unit(&self) -> u32 {
        self.state.borrow().active_unit
    }

    /// Returns the value of the integer uniform at `location`.
    pub fn uniform(&self, location: i32) -> Option<i32> {
        self.state.borrow().uniforms.get(&location).cloned()
    }

    /// Returns the number of texture objects alive.
    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn is_texture(&self, id: TextureId) -> bool {
        self.state.borrow().textures.contains(&id)
    }
}

impl HeadlessState {
    fn bind_buffer(&mut self, target: BufferTarget, id: BufferId) {
        match target {
            BufferTarget::Framebuffer => {
                self.draw_framebuffer = id;
                self.read_framebuffer = id;
            }
            BufferTarget::DrawFramebuffer => self.draw_framebuffer = id,
            BufferTarget::ReadFramebuffer => self.read_framebuffer = id,
            BufferTarget::Renderbuffer => self.renderbuffer = id,
        }
    }

    fn bound_texture(&self) -> TextureId {
        self.units.get(self.active_unit as usize).cloned().unwrap_or(0)
    }
}

pub struct HeadlessDevice {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessDevice {
    /// Creates a current headless device with `max_texture_units` texture units.
    pub fn new(max_texture_units: u32) -> Self {
        let state = HeadlessState {
            calls: Vec::new(),
            current: true,
            reject_uploads: false,
            max_texture_units,
            unpack_alignment: DEFAULT_UNPACK_ALIGNMENT,
            next_texture: 1,
            textures: FastHashSet::default(),
            active_unit: 0,
            units: SmallVec::new(),
            draw_framebuffer: 0,
            read_framebuffer: 0,
            renderbuffer: 0,
            uniforms: FastHashMap::default(),
        };

        HeadlessDevice {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Creates a headless device whose default frame and render buffers are not `0`, like
    /// the ones provided by some windowing layers.
    pub fn with_default_buffers(
        max_texture_units: u32,
        framebuffer: BufferId,
        renderbuffer: BufferId,
    ) -> Self {
        let device = HeadlessDevice::new(max_texture_units);
        {
            let mut state = device.state.borrow_mut();
            state.bind_buffer(BufferTarget::Framebuffer, framebuffer);
            state.bind_buffer(BufferTarget::Renderbuffer, renderbuffer);
        }

        device
    }

    pub fn probe(&self) -> Probe {
        Probe {
            state: self.state.clone(),
        }
    }

    fn issue(&mut self, call: Call) -> Result<RefMut<'_, HeadlessState>> {
        trace!("[HeadlessDevice] {:?}", call);

        let mut state = self.state.borrow_mut();
        state.calls.push(call);

        if !state.current {
            return Err(Error::Device("The context is not current.".into()));
        }

        Ok(state)
    }
}

impl Device for HeadlessDevice {
    fn is_current(&self) -> bool {
        self.state.borrow().current
    }

    fn hint_mipmap(&mut self, hint: Hint) -> Result<()> {
        self.issue(Call::HintMipmap(hint))?;
        Ok(())
    }

    fn pixel_store(&mut self, store: PixelStore, alignment: i32) -> Result<()> {
        let mut state = self.issue(Call::PixelStore(store, alignment))?;
        match alignment {
            1 | 2 | 4 | 8 => {
                if store == PixelStore::UnpackAlignment {
                    state.unpack_alignment = alignment;
                }

                Ok(())
            }
            _ => Err(Error::Device(format!(
                "Invalid pixel store alignment {}.",
                alignment
            ))),
        }
    }

    fn clear_color(&mut self, color: Color) -> Result<()> {
        self.issue(Call::ClearColor(color))?;
        Ok(())
    }

    fn viewport(&mut self, vp: Viewport) -> Result<()> {
        self.issue(Call::Viewport(vp))?;
        Ok(())
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: BufferId) -> Result<()> {
        let mut state = self.issue(Call::BindBuffer(target, id))?;
        state.bind_buffer(target, id);
        Ok(())
    }

    fn buffer_binding(&mut self, target: BufferTarget) -> Result<BufferId> {
        let state = self.issue(Call::BufferBinding(target))?;
        Ok(match target {
            BufferTarget::Framebuffer | BufferTarget::DrawFramebuffer => state.draw_framebuffer,
            BufferTarget::ReadFramebuffer => state.read_framebuffer,
            BufferTarget::Renderbuffer => state.renderbuffer,
        })
    }

    fn enable(&mut self, feature: Feature) -> Result<()> {
        self.issue(Call::Enable(feature))?;
        Ok(())
    }

    fn disable(&mut self, feature: Feature) -> Result<()> {
        self.issue(Call::Disable(feature))?;
        Ok(())
    }

    fn front_face(&mut self, front: FrontFace) -> Result<()> {
        self.issue(Call::FrontFace(front))?;
        Ok(())
    }

    fn cull_face(&mut self, cull: CullFace) -> Result<()> {
        self.issue(Call::CullFace(cull))?;
        Ok(())
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) -> Result<()> {
        self.issue(Call::BlendFunc(src, dst))?;
        Ok(())
    }

    fn max_texture_units(&mut self) -> Result<u32> {
        let state = self.issue(Call::MaxTextureUnits)?;
        Ok(state.max_texture_units)
    }

    fn create_texture(&mut self) -> Result<TextureId> {
        let id = self.state.borrow().next_texture;
        let mut state = self.issue(Call::CreateTexture(id))?;
        state.next_texture += 1;
        state.textures.insert(id);
        Ok(id)
    }

    fn delete_texture(&mut self, id: TextureId) -> Result<()> {
        let mut state = self.issue(Call::DeleteTexture(id))?;
        if !state.textures.remove(&id) {
            return Err(Error::Device(format!("Texture {} does not exist.", id)));
        }

        // Deleting a bound texture reverts its units to the default texture.
        for v in state.units.iter_mut() {
            if *v == id {
                *v = 0;
            }
        }

        Ok(())
    }

    fn active_texture(&mut self, unit: u32) -> Result<()> {
        let mut state = self.issue(Call::ActiveTexture(unit))?;
        if unit >= state.max_texture_units {
            return Err(Error::Device(format!(
                "Texture unit {} is out of range [0, {}).",
                unit, state.max_texture_units
            )));
        }

        state.active_unit = unit;
        Ok(())
    }

    fn bind_texture(&mut self, id: TextureId) -> Result<()> {
        let mut state = self.issue(Call::BindTexture(id))?;
        if id != 0 && !state.textures.contains(&id) {
            return Err(Error::Device(format!("Texture {} does not exist.", id)));
        }

        let unit = state.active_unit as usize;
        if state.units.len() <= unit {
            state.units.resize(unit + 1, 0);
        }

        state.units[unit] = id;
        Ok(())
    }

    fn upload_texture(&mut self, params: &TextureParams, bytes: &[u8]) -> Result<()> {
        let state = self.issue(Call::UploadTexture(params.dimensions))?;
        if state.reject_uploads {
            return Err(Error::Device("Upload rejected.".into()));
        }

        if state.bound_texture() == 0 {
            return Err(Error::Device("No texture is bound to the active unit.".into()));
        }

        let (_, len) = params.image_len(state.unpack_alignment as usize)?;
        if bytes.len() < len {
            return Err(Error::Device("Not enough pixel data.".into()));
        }

        Ok(())
    }

    fn generate_mipmap(&mut self) -> Result<()> {
        self.issue(Call::GenerateMipmap)?;
        Ok(())
    }

    fn texture_params(
        &mut self,
        wrap: TextureWrap,
        filter: TextureFilter,
        mipmap: bool,
    ) -> Result<()> {
        self.issue(Call::TextureParams(wrap, filter, mipmap))?;
        Ok(())
    }

    fn uniform_1i(&mut self, location: i32, value: i32) -> Result<()> {
        let mut state = self.issue(Call::Uniform1i(location, value))?;
        state.uniforms.insert(location, value);
        Ok(())
    }
}
