pub mod frame;
pub mod scheduler;
pub mod task;

pub use frame::*;
pub use scheduler::*;
pub use task::*;
