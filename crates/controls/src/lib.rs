//! Globe interaction: view state, gesture handling and marker selection.

pub mod config;
pub mod controller;
pub mod gesture;
pub mod input;
pub mod tooltip;
pub mod view;

pub use config::*;
pub use controller::*;
pub use gesture::*;
pub use input::*;
pub use tooltip::*;
pub use view::*;
