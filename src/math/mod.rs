//! This module contains the math utils that mainly comes from `cgmath`.

pub use cgmath::Vector2;

pub mod color;
pub use self::color::Color;

pub mod prelude {
    pub use super::{Color, Vector2};
}
