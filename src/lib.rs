//! # What is This?
//!
//! The hardware-state mediation layer of the OpenGL ES renderer. It sits between the
//! scene and material logic and the stateful, call-expensive graphics device, and is
//! responsible for two things:
//!
//! 1. `StateCache` mirrors the device state of one context (clear color, viewport, frame
//! and render buffers, features, face culling and blending), and drops every state change
//! which would not change anything.
//! 2. `TextureUnitAllocator` turns decoded images into device textures, deduplicates them by
//! their source, and reserves an unique texture unit for each of them, so textures could be
//! wired to shader samplers with `bind_unit` deterministically.
//!
//! Everything here is single-threaded. The `StateCache` of a context must be used on the
//! thread which owns the context, and every state change of the fields it mirrors must go
//! through it.
//!
//! ```
//! use crayon_gles::prelude::*;
//!
//! let device = HeadlessDevice::new(8);
//! let mut state = StateCache::new(Box::new(device), Settings::default()).unwrap();
//! state.set_defaults().unwrap();
//!
//! let mut params = TextureParams::default();
//! params.dimensions = Vector2::new(1, 1);
//!
//! let mut textures = TextureUnitAllocator::new();
//! let albedo = TextureResource::new("albedo.png", params, vec![255; 4]);
//! textures.add_texture(&mut state, &albedo).unwrap();
//!
//! let unit = textures.last_unit().unwrap();
//! textures.bind_unit(&mut state, unit, 0).unwrap();
//! textures.dispose(&mut state).unwrap();
//! ```

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

pub mod device;
pub mod errors;
pub mod math;
pub mod settings;
pub mod state;
pub mod texture;
pub mod utils;

pub mod prelude {
    pub use crate::device::headless::{Call, HeadlessDevice, Probe};
    pub use crate::device::{
        BlendFactor, BufferId, BufferTarget, CullFace, Device, Feature, FrontFace, Hint,
        PixelStore, TextureId, Viewport,
    };
    pub use crate::errors::{Error, ErrorKind, ErrorSink, LogSink, Report, ReportLog};
    pub use crate::math::prelude::{Color, Vector2};
    pub use crate::settings::Settings;
    pub use crate::state::{Caching, DeviceState, StateCache};
    pub use crate::texture::{
        TableState, TextureFilter, TextureFormat, TextureParams, TextureRecord, TextureResource,
        TextureUnit, TextureUnitAllocator, TextureWrap,
    };

    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::device::gl::GLDevice;
}
