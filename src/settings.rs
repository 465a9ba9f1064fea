//! Functions for loading the context setup settings.

use crate::device::Hint;
use crate::errors::*;

/// The configuration applied when a graphics context is set up. All the fields are
/// optional in the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The quality hint of mipmap generation.
    pub mipmap_hint: Hint,
    /// The alignment requirements for the start of each pixel row read from client memory.
    pub unpack_alignment: i32,
    /// The alignment requirements for the start of each pixel row written into client memory.
    pub pack_alignment: i32,
    /// Clamps the number of texture units reported by the device.
    pub max_texture_units: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mipmap_hint: Hint::Fastest,
            unpack_alignment: 1,
            pack_alignment: 4,
            max_texture_units: None,
        }
    }
}

impl Settings {
    /// Parses and validates settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|err| Error::Settings(format!("{}", err)))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for &(name, v) in &[
            ("unpack_alignment", self.unpack_alignment),
            ("pack_alignment", self.pack_alignment),
        ] {
            if v != 1 && v != 2 && v != 4 && v != 8 {
                return Err(Error::Settings(format!(
                    "{} must be one of 1, 2, 4 or 8, but got {}.",
                    name, v
                )));
            }
        }

        if self.max_texture_units == Some(0) {
            return Err(Error::Settings("max_texture_units can not be 0.".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.mipmap_hint, Hint::Fastest);
        assert_eq!(settings.unpack_alignment, 1);
        assert_eq!(settings.pack_alignment, 4);
    }

    #[test]
    fn partial() {
        let settings =
            Settings::from_json(r#"{ "max_texture_units": 4, "mipmap_hint": "Nicest" }"#).unwrap();
        assert_eq!(settings.max_texture_units, Some(4));
        assert_eq!(settings.mipmap_hint, Hint::Nicest);
        assert_eq!(settings.pack_alignment, 4);
    }

    #[test]
    fn invalid() {
        assert!(Settings::from_json(r#"{ "unpack_alignment": 3 }"#).is_err());
        assert!(Settings::from_json(r#"{ "max_texture_units": 0 }"#).is_err());

        match Settings::from_json("[") {
            Err(Error::Settings(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
