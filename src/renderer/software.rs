//! ---------------------------------------------------------------------------
//! Software (CPU) column back-end
//!
//! * Owns a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Draws flat-coloured vertical lines; ordering and occlusion are decided
//!   upstream, so there is no Z-buffer.
//! ---------------------------------------------------------------------------

use crate::renderer::{Renderer, Rgba};

/// Background shown where nothing was drawn.
pub const CLEAR_COLOUR: Rgba = 0x00_202020;

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Software {
    /// Read access to the current frame, row-major.
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.scratch[y * self.width + x])
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(CLEAR_COLOUR);
    }

    fn draw_vline(&mut self, x: i32, y_top: i32, y_bottom: i32, colour: Rgba) {
        if x < 0 || x as usize >= self.width || self.height == 0 {
            return;
        }
        let (y0, y1) = if y_top <= y_bottom {
            (y_top, y_bottom)
        } else {
            (y_bottom, y_top)
        };
        let y0 = y0.max(0);
        let y1 = y1.min(self.height as i32 - 1);
        if y0 > y1 {
            return;
        }

        let col = x as usize;
        for y in y0 as usize..=y1 as usize {
            self.scratch[y * self.width + col] = colour;
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_clears() {
        let mut sw = Software::default();
        sw.begin_frame(4, 3);
        assert_eq!(sw.pixels().len(), 12);
        assert!(sw.pixels().iter().all(|&p| p == CLEAR_COLOUR));
    }

    #[test]
    fn vline_paints_inclusive_rows() {
        let mut sw = Software::default();
        sw.begin_frame(4, 8);
        sw.draw_vline(2, 1, 3, 0xFF);
        assert_eq!(sw.pixel(2, 0), Some(CLEAR_COLOUR));
        assert_eq!(sw.pixel(2, 1), Some(0xFF));
        assert_eq!(sw.pixel(2, 3), Some(0xFF));
        assert_eq!(sw.pixel(2, 4), Some(CLEAR_COLOUR));
        assert_eq!(sw.pixel(1, 2), Some(CLEAR_COLOUR));
    }

    #[test]
    fn vline_is_clipped_to_buffer() {
        let mut sw = Software::default();
        sw.begin_frame(4, 8);
        sw.draw_vline(0, -10, 100, 0xAB);
        sw.draw_vline(-1, 0, 7, 0xCD);
        sw.draw_vline(4, 0, 7, 0xCD);
        assert!((0..8).all(|y| sw.pixel(0, y) == Some(0xAB)));
        assert!(!sw.pixels().contains(&0xCD));
    }

    #[test]
    fn end_frame_hands_out_buffer() {
        let mut sw = Software::default();
        sw.begin_frame(5, 2);
        let mut seen = (0, 0, 0);
        sw.end_frame(|fb, w, h| seen = (fb.len(), w, h));
        assert_eq!(seen, (10, 5, 2));
    }
}
