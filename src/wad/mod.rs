//! Map loading: WAD container → raw lumps → resolved [`crate::world::Level`].

pub mod level;
pub mod loader;
pub mod raw;

pub use level::{LevelError, RawLevel};
pub use loader::{LoadError, build_level, load_level};
pub use raw::{LumpInfo, Wad, WadError};
