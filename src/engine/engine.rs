use std::ops::ControlFlow;

use log::trace;

use crate::{
    config::Settings,
    engine::{
        occlusion::{ClipHeights, ScreenRange},
        projection::Projection,
        types::{Frame, View},
    },
    renderer::Compositor,
    world::{Level, Player},
};

/// What one call to [`Engine::render_frame`] produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStats {
    pub spans: usize,
    pub open_columns: usize,
    /// Traversal stopped early because every column was claimed.
    pub halted: bool,
}

/// Owns the projection tables and the per-frame occlusion buffers.
pub struct Engine {
    proj: Projection,
    range: ScreenRange,
    clip: ClipHeights,
    eye_height: f64,
}

impl Engine {
    pub fn new(settings: &Settings) -> Self {
        let (w, h) = (settings.width(), settings.height());
        Self {
            proj: Projection::new(settings),
            range: ScreenRange::new(w),
            clip: ClipHeights::new(w, h),
            eye_height: settings.eye_height,
        }
    }

    /// Columns no solid wall claimed during the last frame.
    #[inline]
    pub fn open_columns(&self) -> usize {
        self.range.len()
    }

    /// Walk `level` from `player`'s point of view and queue the visible
    /// spans into `out`, replacing whatever the previous frame left there.
    pub fn render_frame(
        &mut self,
        level: &Level,
        player: &Player,
        out: &mut Compositor,
    ) -> FrameStats {
        self.range.reset();
        self.clip.reset();
        out.clear();

        let view = View {
            pos: player.pos,
            angle: player.angle,
            eye_z: level.floor_height_at(player.pos) + self.eye_height,
        };

        let mut frame = Frame {
            level,
            proj: &self.proj,
            view,
            range: &mut self.range,
            clip: &mut self.clip,
            out: &mut *out,
        };
        let halted = matches!(frame.traverse(level.bsp_root()), ControlFlow::Break(()));

        let stats = FrameStats {
            spans: out.spans().len(),
            open_columns: self.range.len(),
            halted,
        };
        trace!(
            "frame: {} spans, {} open columns, halted: {}",
            stats.spans, stats.open_columns, stats.halted
        );
        stats
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
