//! Immutable 2D texture images and the parameters they are sampled with.

use crate::errors::*;
use crate::math::prelude::Vector2;

/// The parameters of a texture object.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureParams {
    /// Sets the wrap parameter for texture.
    pub wrap: TextureWrap,
    /// Specify how the texture is used whenever the pixel being sampled.
    pub filter: TextureFilter,
    /// Should we generates a complete set of mipmaps for a texture object.
    pub mipmap: bool,
    /// Sets the format of data.
    pub format: TextureFormat,
    /// Sets the dimensions of texture.
    pub dimensions: Vector2<u32>,
}

impl Default for TextureParams {
    fn default() -> Self {
        TextureParams {
            format: TextureFormat::U8U8U8U8,
            wrap: TextureWrap::Clamp,
            filter: TextureFilter::Linear,
            mipmap: false,
            dimensions: Vector2::new(0, 0),
        }
    }
}

impl TextureParams {
    /// Returns the row pitch and the least number of bytes of the base level image, when
    /// each row starts at a multiple of `alignment` bytes. The last row is not padded.
    pub fn image_len(&self, alignment: usize) -> Result<(usize, usize)> {
        let alignment = alignment.max(1);
        let overflow = || {
            Error::DecodeOrUploadFailure(format!(
                "Texture {}x{} of {:?} pixels is too large.",
                self.dimensions.x, self.dimensions.y, self.format
            ))
        };

        let row = (self.dimensions.x as usize)
            .checked_mul(self.format.size() as usize)
            .ok_or_else(overflow)?;

        let pitch = row
            .checked_add(alignment - 1)
            .map(|v| v / alignment * alignment)
            .ok_or_else(overflow)?;

        let len = match self.dimensions.y as usize {
            0 => 0,
            h => pitch
                .checked_mul(h - 1)
                .and_then(|v| v.checked_add(row))
                .ok_or_else(overflow)?,
        };

        Ok((pitch, len))
    }

    /// Checks that `bytes` is a complete base level image of these parameters, with rows
    /// aligned to `alignment` bytes. The padding of the last row is optional.
    pub fn validate(&self, bytes: &[u8], alignment: usize) -> Result<()> {
        if self.dimensions.x == 0 || self.dimensions.y == 0 {
            return Err(Error::DecodeOrUploadFailure(format!(
                "Zero sized texture {}x{}.",
                self.dimensions.x, self.dimensions.y
            )));
        }

        let (pitch, len) = self.image_len(alignment)?;
        let padded = pitch * self.dimensions.y as usize;

        if bytes.len() != len && bytes.len() != padded {
            return Err(Error::DecodeOrUploadFailure(format!(
                "Expects {} bytes of {:?} pixels with dimensions {}x{} and unpack alignment {}, \
                 but got {}.",
                len,
                self.format,
                self.dimensions.x,
                self.dimensions.y,
                alignment,
                bytes.len()
            )));
        }

        Ok(())
    }
}

/// Specify how the texture is used whenever the pixel being sampled.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TextureFilter {
    /// Returns the value of the texture element that is nearest (in Manhattan distance)
    /// to the center of the pixel being textured.
    Nearest,
    /// Returns the weighted average of the four texture elements that are closest to the
    /// center of the pixel being textured.
    Linear,
}

/// Sets the wrap parameter for texture.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TextureWrap {
    /// Samples at coord x + 1 map to coord x.
    Repeat,
    /// Samples at coord x + 1 map to coord 1 - x.
    Mirror,
    /// Samples at coord x + 1 map to coord 1.
    Clamp,
}

/// List of all the possible formats of decoded pixels when uploading to texture.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TextureFormat {
    /// Single-channel luminance.
    U8,
    /// Luminance and alpha.
    U8U8,
    U8U8U8,
    U8U8U8U8,
    U5U6U5,
    U4U4U4U4,
    U5U5U5U1,
}

impl TextureFormat {
    /// Returns the number of components of this client format.
    pub fn components(&self) -> u8 {
        match *self {
            TextureFormat::U8 => 1,
            TextureFormat::U8U8 => 2,
            TextureFormat::U5U6U5 | TextureFormat::U8U8U8 => 3,
            TextureFormat::U8U8U8U8 | TextureFormat::U4U4U4U4 | TextureFormat::U5U5U5U1 => 4,
        }
    }

    /// Returns the size in bytes of a pixel of this type.
    pub fn size(&self) -> u8 {
        match *self {
            TextureFormat::U8 => 1,
            TextureFormat::U8U8
            | TextureFormat::U5U6U5
            | TextureFormat::U4U4U4U4
            | TextureFormat::U5U5U5U1 => 2,
            TextureFormat::U8U8U8 => 3,
            TextureFormat::U8U8U8U8 => 4,
        }
    }
}

/// A decoded image, keyed by the identifier of the source it was decoded from.
#[derive(Debug, Clone)]
pub struct TextureResource {
    /// The stable identifier of the image source, usually a file path.
    pub source: String,
    pub params: TextureParams,
    pub bytes: Vec<u8>,
}

impl TextureResource {
    pub fn new<T: Into<String>>(source: T, params: TextureParams, bytes: Vec<u8>) -> Self {
        TextureResource {
            source: source.into(),
            params,
            bytes,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validate() {
        let mut params = TextureParams::default();
        params.dimensions = Vector2::new(2, 2);
        assert!(params.validate(&[0; 16], 4).is_ok());
        assert!(params.validate(&[0; 15], 4).is_err());
        assert!(params.validate(&[0; 17], 4).is_err());

        params.format = TextureFormat::U5U6U5;
        assert_eq!(params.image_len(1).unwrap(), (4, 8));
        assert!(params.validate(&[0; 8], 1).is_ok());

        params.dimensions = Vector2::new(0, 2);
        match params.validate(&[], 1) {
            Err(Error::DecodeOrUploadFailure(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn aligned_rows() {
        let mut params = TextureParams::default();
        params.format = TextureFormat::U8U8U8;
        params.dimensions = Vector2::new(3, 3);

        assert_eq!(params.image_len(1).unwrap(), (9, 27));
        assert_eq!(params.image_len(4).unwrap(), (12, 33));
        assert_eq!(params.image_len(8).unwrap(), (16, 41));

        assert!(params.validate(&[0; 27], 1).is_ok());
        assert!(params.validate(&[0; 27], 4).is_err());
        assert!(params.validate(&[0; 33], 4).is_ok());
        assert!(params.validate(&[0; 36], 4).is_ok());
        assert!(params.validate(&[0; 34], 4).is_err());
    }

    #[test]
    fn oversized() {
        let mut params = TextureParams::default();
        params.dimensions = Vector2::new(::std::u32::MAX, ::std::u32::MAX);

        match params.validate(&[], 4) {
            Err(Error::DecodeOrUploadFailure(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
