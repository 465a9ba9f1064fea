//! Texture objects and the allocation of the texture units they are bound to.
//!
//! Each `TextureUnitAllocator` reserves an unique texture unit for every texture it
//! creates, so binding a texture to a shader sampler only takes its unit and the location
//! of the sampler:
//!
//! ```text
//! Texture Objects         Texture Unit         bind_unit(unit, location)
//!        1        ------>      0       ------->      0 + location
//!        2        ------>      1
//!        5        ------>      2
//!        8        ------>      3       ------->      3 + location
//! ```
//!
//! The number of texture units is limited by the device, see `max_textures`.

mod allocator;
mod params;

pub use self::allocator::{TableState, TextureRecord, TextureUnit, TextureUnitAllocator};
pub use self::params::{TextureFilter, TextureFormat, TextureParams, TextureResource, TextureWrap};

use crate::errors::*;
use crate::state::StateCache;

/// Binds the reserved "no texture" object to every texture unit which is not known to be
/// empty already, including units whose binding has been forgotten by
/// `StateCache::invalidate`. The textures themselves are kept alive.
pub fn unbind_all(state: &mut StateCache) -> Result<()> {
    let max = state.max_texture_units()?;

    for unit in 0..max {
        if state.mirror().texture(unit) != Some(0) {
            state.bind_texture(unit, 0)?;
        }
    }

    Ok(())
}

/// Returns the maximum number of textures that shaders could sample simultaneously. The
/// device is queried once per context.
#[inline]
pub fn max_textures(state: &mut StateCache) -> Result<u32> {
    state.max_texture_units()
}
