use crate::device::{TextureId, DEFAULT_UNPACK_ALIGNMENT};
use crate::errors::*;
use crate::state::StateCache;
use crate::utils::hash::FastHashMap;

use super::params::{TextureParams, TextureResource};

/// The index of a hardware texture unit, which a shader sampler references.
pub type TextureUnit = u32;

/// A texture created by a `TextureUnitAllocator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRecord {
    pub source: String,
    pub id: TextureId,
    pub unit: TextureUnit,
    pub params: TextureParams,
}

/// The lifecycle state of a texture unit table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TableState {
    Empty,
    Populating,
    /// Every texture unit has been reserved, further additions are rejected.
    Full,
}

/// Creates device textures from decoded images and reserves an unique texture unit for
/// each of them, so a set of textures could be bound to shader samplers simultaneously.
///
/// Textures are deduplicated by the identifier of their source. Units are handed out in
/// insertion order, the texture at index `i` always owns unit `i`. The table only grows,
/// units are never reused until the allocator is disposed.
pub struct TextureUnitAllocator {
    records: Vec<TextureRecord>,
    indices: FastHashMap<String, usize>,
    sink: Box<dyn ErrorSink>,
}

impl Default for TextureUnitAllocator {
    fn default() -> Self {
        TextureUnitAllocator::new()
    }
}

impl TextureUnitAllocator {
    /// Creates an allocator which reports errors to the `log` facade.
    pub fn new() -> Self {
        TextureUnitAllocator::with_sink(LogSink)
    }

    /// Creates an allocator which reports errors to `sink`.
    pub fn with_sink<T: ErrorSink + 'static>(sink: T) -> Self {
        TextureUnitAllocator {
            records: Vec::new(),
            indices: FastHashMap::default(),
            sink: Box::new(sink),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[TextureRecord] {
        &self.records
    }

    /// Returns the unit reserved for the texture loaded from `source`.
    pub fn unit_of(&self, source: &str) -> Option<TextureUnit> {
        self.indices.get(source).map(|&v| self.records[v].unit)
    }

    /// Returns the unit reserved for the most recently created texture. Deduplicated
    /// additions do not count.
    pub fn last_unit(&self) -> Option<TextureUnit> {
        self.records.last().map(|v| v.unit)
    }

    pub fn state(&self, state: &mut StateCache) -> Result<TableState> {
        let max = state.max_texture_units()? as usize;
        Ok(if self.records.is_empty() {
            TableState::Empty
        } else if self.records.len() >= max {
            TableState::Full
        } else {
            TableState::Populating
        })
    }

    /// Creates a device texture from `resource` and reserves a texture unit for it. Returns
    /// the unit of the texture, which is the one reserved before if a texture from the same
    /// source has been added already.
    ///
    /// Failures other than `Error::ContextNotCurrent` are reported to the error sink before
    /// being returned. They leave the table untouched, so the caller could go on without
    /// the texture.
    pub fn add_texture(
        &mut self,
        state: &mut StateCache,
        resource: &TextureResource,
    ) -> Result<TextureUnit> {
        state.ensure_current()?;

        if let Some(unit) = self.unit_of(&resource.source) {
            return Ok(unit);
        }

        self.create(state, resource).map_err(|err| self.report(err))
    }

    fn create(
        &mut self,
        state: &mut StateCache,
        resource: &TextureResource,
    ) -> Result<TextureUnit> {
        let max = state.max_texture_units()?;
        if self.records.len() >= max as usize {
            return Err(Error::ResourceLimitExceeded { max });
        }

        let alignment = state
            .mirror()
            .unpack_alignment
            .unwrap_or(DEFAULT_UNPACK_ALIGNMENT);
        resource.params.validate(&resource.bytes, alignment as usize)?;

        let unit = self.records.len() as TextureUnit;
        let id = state.device_mut().create_texture()?;

        if let Err(err) = Self::upload(state, unit, id, resource) {
            state.forget_texture(id);
            if let Err(v) = state.device_mut().delete_texture(id) {
                warn!("[TextureUnitAllocator] failed to delete texture {}: {}", id, v);
            }

            return Err(match err {
                Error::Device(v) => Error::DecodeOrUploadFailure(format!(
                    "{} is rejected by device: {}",
                    resource.source, v
                )),
                v => v,
            });
        }

        info!(
            "[TextureUnitAllocator] creates texture {} from {:?} at unit {}.",
            id, resource.source, unit
        );

        self.indices.insert(resource.source.clone(), self.records.len());
        self.records.push(TextureRecord {
            source: resource.source.clone(),
            id,
            unit,
            params: resource.params,
        });

        Ok(unit)
    }

    fn upload(
        state: &mut StateCache,
        unit: TextureUnit,
        id: TextureId,
        resource: &TextureResource,
    ) -> Result<()> {
        let params = &resource.params;
        state.bind_texture(unit, id)?;

        let device = state.device_mut();
        device.upload_texture(params, &resource.bytes)?;
        if params.mipmap {
            device.generate_mipmap()?;
        }

        device.texture_params(params.wrap, params.filter, params.mipmap)
    }

    /// Binds the texture of `unit` and points the sampler uniform at `location` to it.
    /// The unit must have been reserved by this allocator, and the location must be a
    /// valid one of the current program.
    pub fn bind_unit(
        &mut self,
        state: &mut StateCache,
        unit: TextureUnit,
        location: i32,
    ) -> Result<()> {
        state.ensure_current()?;

        let id = match self.records.get(unit as usize) {
            Some(v) => v.id,
            None => {
                let err = Error::InvalidBindRequest(format!(
                    "texture unit {} is not reserved, only {} units are in use.",
                    unit,
                    self.records.len()
                ));

                return Err(self.report(err));
            }
        };

        if location < 0 {
            let err = Error::InvalidBindRequest(format!(
                "sampler location {} of texture unit {} is invalid.",
                location, unit
            ));

            return Err(self.report(err));
        }

        debug!(
            "[TextureUnitAllocator] binds texture {} at unit {} to location {}.",
            id, unit, location
        );

        state.bind_texture(unit, id)?;
        state.device_mut().uniform_1i(location, unit as i32)
    }

    /// Deletes all the device textures created by this allocator, which is left empty. If
    /// the context is not current nothing is deleted, and disposing could be retried.
    pub fn dispose(&mut self, state: &mut StateCache) -> Result<()> {
        state.ensure_current()?;

        info!("[TextureUnitAllocator] deletes {} textures.", self.records.len());

        let records = ::std::mem::replace(&mut self.records, Vec::new());
        self.indices.clear();

        let mut result = Ok(());
        for v in records {
            state.forget_texture(v.id);
            if let Err(err) = state.device_mut().delete_texture(v.id) {
                warn!("[TextureUnitAllocator] failed to delete texture {}: {}", v.id, err);
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }

        result
    }

    fn report(&mut self, err: Error) -> Error {
        if !err.is_fatal() {
            self.sink.report(Report::from(&err));
        }

        err
    }
}

impl Drop for TextureUnitAllocator {
    fn drop(&mut self) {
        if !self.records.is_empty() {
            warn!(
                "[TextureUnitAllocator] drops without disposing, {} textures leaked.",
                self.records.len()
            );
        }
    }
}
