pub mod catalog;
pub mod predict;
pub mod system;

pub use catalog::*;
pub use predict::*;
pub use system::*;
