use std::cmp;
use std::ffi;

use gl::types::*;

use crate::errors::*;
use crate::math::prelude::Vector2;

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (es1, major1, minor1) = match *self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        let (es2, major2, minor2) = match *other {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        if es1 != es2 {
            None
        } else {
            match major1.cmp(&major2) {
                cmp::Ordering::Equal => Some(minor1.cmp(&minor2)),
                v => Some(v),
            }
        }
    }
}

impl Version {
    /// Parses the description returned by `glGetString(GL_VERSION)`.
    pub fn from_description(desc: &str) -> Result<Version> {
        let malformed = || Error::Device(format!("[GL] Version string {:?} is malformed.", desc));

        let (es, numbers) = if desc.starts_with("OpenGL ES-") {
            // "OpenGL ES-CM 1.1" and friends.
            (true, desc.get(13..).ok_or_else(malformed)?)
        } else if desc.starts_with("OpenGL ES ") {
            (true, &desc[10..])
        } else {
            (false, desc)
        };

        let numbers = numbers.split(' ').next().ok_or_else(malformed)?;
        let mut iter = numbers.split('.');

        let major = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;

        let minor = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;

        if es {
            Ok(Version::ES(major, minor))
        } else {
            Ok(Version::GL(major, minor))
        }
    }

    /// Obtains the OpenGL version of the current context using the loaded functions.
    ///
    /// # Unsafe
    ///
    /// You must ensure that the functions belong to the current context, otherwise you will get
    /// an undefined behavior.
    pub unsafe fn parse() -> Result<Version> {
        Version::from_description(&parse_str(gl::VERSION)?)
    }
}

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Returns a version or release number. Vendor-specific information may follow the version
    /// number.
    pub version: Version,

    /// The company responsible for this GL implementation.
    pub vendor: String,

    /// The name of the renderer. This name is typically specific to a particular
    /// configuration of a hardware platform.
    pub renderer: String,

    /// Maximum number of textures that can be bound to a program.
    ///
    /// `glActiveTexture` must be between `GL_TEXTURE0` and `GL_TEXTURE0` + this value - 1.
    pub max_combined_texture_image_units: u32,

    /// Whether `glGenerateMipmap` accepts textures whose dimensions are not power of two.
    pub npot_mipmap: bool,
}

impl Capabilities {
    pub unsafe fn parse() -> Result<Capabilities> {
        let version = Version::parse()?;
        let extensions = parse_str(gl::EXTENSIONS).unwrap_or_default();

        Ok(Capabilities {
            version,
            vendor: parse_str(gl::VENDOR)?,
            renderer: parse_str(gl::RENDERER)?,
            max_combined_texture_image_units: Capabilities::parse_texture_image_units(),
            npot_mipmap: version >= Version::GL(2, 0)
                || version >= Version::ES(3, 0)
                || extensions.split(' ').any(|v| v == "GL_OES_texture_npot"),
        })
    }

    /// Returns true if `glGenerateMipmap` accepts a texture of `dimensions`.
    pub fn supports_mipmap(&self, dimensions: Vector2<u32>) -> bool {
        self.npot_mipmap || (dimensions.x.is_power_of_two() && dimensions.y.is_power_of_two())
    }

    #[inline]
    unsafe fn parse_texture_image_units() -> u32 {
        // Every conformant implementation supports at least 8 units.
        let mut val = 8;
        gl::GetIntegerv(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, &mut val);
        val.max(0) as u32
    }
}

#[inline]
unsafe fn parse_str(id: GLenum) -> Result<String> {
    let s = gl::GetString(id);
    if s.is_null() {
        return Err(Error::Device(format!("[GL] String of {} is null.", id)));
    }

    String::from_utf8(ffi::CStr::from_ptr(s as *const _).to_bytes().to_vec())
        .map_err(|_| Error::Device(format!("[GL] String of {} is malformed.", id)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn version() {
        assert_eq!(
            Version::from_description("OpenGL ES 2.0 Apple A7 GPU").unwrap(),
            Version::ES(2, 0)
        );

        assert_eq!(
            Version::from_description("4.1 ATI-2.4.10").unwrap(),
            Version::GL(4, 1)
        );

        assert!(Version::ES(3, 0) > Version::ES(2, 0));
        assert!(!(Version::ES(3, 0) >= Version::GL(2, 0)));
        assert!(Version::from_description("OpenGL ES").is_err());
        assert_eq!(
            Version::from_description("OpenGL ES-CM 1.1").unwrap(),
            Version::ES(1, 1)
        );
        assert!(Version::from_description("OpenGL ES-CM").is_err());
        assert!(Version::from_description("OpenGL ES-").is_err());
    }

    #[test]
    fn npot_mipmaps() {
        let mut caps = Capabilities {
            version: Version::ES(2, 0),
            vendor: "Headless".into(),
            renderer: "Headless".into(),
            max_combined_texture_image_units: 8,
            npot_mipmap: false,
        };

        assert!(caps.supports_mipmap(Vector2::new(64, 32)));
        assert!(!caps.supports_mipmap(Vector2::new(3, 3)));
        assert!(!caps.supports_mipmap(Vector2::new(64, 0)));

        caps.npot_mipmap = true;
        assert!(caps.supports_mipmap(Vector2::new(3, 3)));
    }
}
