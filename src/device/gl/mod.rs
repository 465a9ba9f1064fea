//! The OpenGL and OpenGL ES 2.0+ device.

pub mod capabilities;
pub mod types;

mod device;

pub use self::capabilities::{Capabilities, Version};
pub use self::device::{Currency, GLDevice};
