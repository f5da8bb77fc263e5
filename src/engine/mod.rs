//! Visibility pipeline: BSP walk, FOV projection and column occlusion.

pub mod bsp;
pub mod engine;
pub mod occlusion;
pub mod projection;
pub mod segs;
pub mod types;

pub use engine::{Engine, FrameStats};
pub use projection::{Projection, normalize};
pub use segs::WallKind;
pub use types::View;
