use glam::DVec2;

use crate::{
    engine::{
        occlusion::{ClipHeights, ScreenRange},
        projection::Projection,
    },
    renderer::compositor::Compositor,
    world::Level,
};

/// Viewer state sampled once at the start of a frame.
#[derive(Clone, Copy, Debug)]
pub struct View {
    pub pos: DVec2,
    /// Degrees, [0, 360).
    pub angle: f64,
    /// Absolute eye height in map units.
    pub eye_z: f64,
}

/// Everything one frame's traversal reads or mutates.
///
/// Built by [`crate::engine::Engine::render_frame`] and dropped when the
/// frame ends, so no occlusion state leaks into the next frame.
pub struct Frame<'a> {
    pub level: &'a Level,
    pub proj: &'a Projection,
    pub view: View,
    pub range: &'a mut ScreenRange,
    pub clip: &'a mut ClipHeights,
    pub out: &'a mut Compositor,
}
