//! Rendering abstraction layer.
//!
//! *The engine never touches a pixel buffer directly.*  It emits
//! [`DrawSpan`]s into a [`compositor::Compositor`], which later paints them
//! through a type implementing [`Renderer`].
//!
//! * Back-ends only rasterise `(x, y_top, y_bottom, colour)` and know nothing
//!   about walls or sectors.
//! * Spans carry a texture id and a light level, not texels.

use crate::world::TextureId;

pub mod compositor;
pub mod software;

pub use compositor::Compositor;
pub use software::Software;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// One vertical slice of ceiling, wall or floor in a single column.
/// `y_top ..= y_bottom` are screen rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawSpan {
    pub x: i32,
    pub y_top: i32,
    pub y_bottom: i32,
    pub texture: TextureId,
    /// 0‥255
    pub light: u16,
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Paint rows `y_top ..= y_bottom` of column `x`.  Parts outside the
    /// buffer are dropped.
    fn draw_vline(&mut self, x: i32, y_top: i32, y_bottom: i32, colour: Rgba);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}
