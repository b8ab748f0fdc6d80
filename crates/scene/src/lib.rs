pub mod camera;
pub mod entity;
pub mod flight;
pub mod picking;
pub mod projection;
pub mod registry;

pub use camera::*;
pub use entity::*;
pub use flight::*;
pub use registry::*;
