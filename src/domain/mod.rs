pub mod color;
mod color_deserializer;
mod device_target;

pub use color::{ColorValue, WHITE};
pub use device_target::DeviceTarget;
