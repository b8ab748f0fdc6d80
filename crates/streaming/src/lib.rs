pub mod cache;
pub mod config;
pub mod decode;
pub mod errors;
pub mod source;
pub mod update_loop;

pub use cache::*;
pub use config::*;
pub use decode::*;
pub use errors::*;
pub use source::*;
pub use update_loop::*;
