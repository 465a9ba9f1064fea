/// A RGBA `Color`. Each color component is a floating point value
/// with a range from 0 to 1.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl From<[f32; 4]> for Color {
    fn from(v: [f32; 4]) -> Self {
        Color::new(v[0], v[1], v[2], v[3])
    }
}

impl From<[u8; 4]> for Color {
    fn from(v: [u8; 4]) -> Self {
        let max = 255.0;
        Color::new(
            f32::from(v[0]) / max,
            f32::from(v[1]) / max,
            f32::from(v[2]) / max,
            f32::from(v[3]) / max,
        )
    }
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Clip to [0.0, 1.0] range.
    pub fn clip(&self) -> Self {
        Color {
            r: self.r.max(0.0).min(1.0),
            g: self.g.max(0.0).min(1.0),
            b: self.b.max(0.0).min(1.0),
            a: self.a.max(0.0).min(1.0),
        }
    }

    pub fn rgba(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn white() -> Self {
        Color::new(1.0, 1.0, 1.0, 1.0)
    }

    pub fn black() -> Self {
        Color::new(0.0, 0.0, 0.0, 1.0)
    }

    pub fn transparent() -> Self {
        Color::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clip() {
        let color = Color::new(-0.5, 0.5, 1.5, 1.0).clip();
        assert_eq!(color, Color::new(0.0, 0.5, 1.0, 1.0));
    }

    #[test]
    fn from_bytes() {
        assert_eq!(Color::white(), Color::from([255u8, 255, 255, 255]));
        assert_eq!(Color::transparent(), Color::from([0.0f32, 0.0, 0.0, 0.0]));
        assert_eq!(Color::from([0u8, 0, 0, 255]).rgba(), [0.0, 0.0, 0.0, 1.0]);
    }
}
