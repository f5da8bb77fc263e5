//! Column compositor.
//!
//! Spans are queued in emission order during traversal and painted in
//! **reverse** order on flush.  The portal clip-height bookkeeping is not
//! exact; painting far geometry first lets nearer spans overwrite the
//! overlap.

use std::collections::HashMap;

use log::trace;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::{
    renderer::{DrawSpan, Renderer, Rgba},
    world::TextureId,
};

/// Expected spans per screen column in a typical frame.
pub const SPANS_PER_COLUMN: usize = 8;

pub struct Compositor {
    queue: Vec<DrawSpan>,
    colours: HashMap<(TextureId, u16), Rgba>,
}

impl Compositor {
    pub fn new(width: usize) -> Self {
        Self {
            queue: Vec::with_capacity(width * SPANS_PER_COLUMN),
            colours: HashMap::new(),
        }
    }

    /// Drop the previous frame's spans; capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    #[inline]
    pub fn push(&mut self, span: DrawSpan) {
        self.queue.push(span);
    }

    /// Spans of the current frame in emission order.
    #[inline]
    pub fn spans(&self) -> &[DrawSpan] {
        &self.queue
    }

    /// Flat colour for a texture under a light level.  Stable for the
    /// lifetime of the compositor.
    pub fn colour(&mut self, texture: TextureId, light: u16) -> Rgba {
        *self
            .colours
            .entry((texture, light))
            .or_insert_with(|| derive_colour(texture, light))
    }

    /// Paint every queued span, most recent first.
    pub fn flush<R: Renderer>(&mut self, renderer: &mut R) {
        trace!(
            "compositing {} spans ({} cached colours)",
            self.queue.len(),
            self.colours.len()
        );
        for i in (0..self.queue.len()).rev() {
            let s = self.queue[i];
            let c = self.colour(s.texture, s.light);
            renderer.draw_vline(s.x, s.y_top, s.y_bottom, c);
        }
    }
}

fn derive_colour(texture: TextureId, light: u16) -> Rgba {
    let mut rng = Pcg32::seed_from_u64(texture as u64);
    let l = light.min(255) as f64 / 255.0;
    let mut channel = || (rng.gen_range(100u32..255) as f64 * l) as u32;
    let (r, g, b) = (channel(), channel(), channel());
    (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every call instead of rasterising.
    #[derive(Default)]
    struct Recorder {
        lines: Vec<(i32, i32, i32, Rgba)>,
    }

    impl Renderer for Recorder {
        fn begin_frame(&mut self, _: usize, _: usize) {
            self.lines.clear();
        }
        fn draw_vline(&mut self, x: i32, y_top: i32, y_bottom: i32, colour: Rgba) {
            self.lines.push((x, y_top, y_bottom, colour));
        }
        fn end_frame<F: FnOnce(&[Rgba], usize, usize)>(&mut self, submit: F) {
            submit(&[], 0, 0);
        }
    }

    fn span(x: i32, texture: TextureId) -> DrawSpan {
        DrawSpan {
            x,
            y_top: 10,
            y_bottom: 20,
            texture,
            light: 255,
        }
    }

    #[test]
    fn flush_paints_in_reverse_emission_order() {
        let mut c = Compositor::new(4);
        c.push(span(0, 3));
        c.push(span(1, 4));
        c.push(span(2, 5));

        let mut r = Recorder::default();
        c.flush(&mut r);
        let xs: Vec<i32> = r.lines.iter().map(|l| l.0).collect();
        assert_eq!(xs, vec![2, 1, 0]);
    }

    #[test]
    fn colour_is_deterministic_and_cached() {
        let mut a = Compositor::new(1);
        let mut b = Compositor::new(1);
        assert_eq!(a.colour(7, 200), b.colour(7, 200));
        assert_eq!(a.colour(7, 200), a.colour(7, 200));
        assert_eq!(a.colours.len(), 1);
        assert_ne!(a.colour(7, 200), a.colour(8, 200));
    }

    #[test]
    fn light_scales_every_channel() {
        let mut c = Compositor::new(1);
        assert_eq!(c.colour(9, 0), 0);

        let full = c.colour(9, 255);
        for shift in [0, 8, 16] {
            let ch = (full >> shift) & 0xFF;
            assert!((100..255).contains(&ch), "channel {ch}");
        }
        let dim = c.colour(9, 128);
        assert!(dim & 0xFF <= full & 0xFF);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut c = Compositor::new(10);
        let cap = c.queue.capacity();
        c.push(span(0, 1));
        c.clear();
        assert!(c.spans().is_empty());
        assert!(c.queue.capacity() >= cap);
        assert!(cap >= 10 * SPANS_PER_COLUMN);
    }
}
