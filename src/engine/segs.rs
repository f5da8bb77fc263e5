//! ----------------------------------------------------------------------------
//! **Seg pipeline**
//!
//! For every seg of a visited subsector:
//! 1. project it onto screen columns (FOV clip + back-face cull),
//! 2. classify it as solid, portal or reject,
//! 3. split the projected range into runs of still-open columns,
//! 4. emit ceiling / wall / floor spans per column, tightening the clip
//!    heights for portals and closing the columns for solid walls.
//! ----------------------------------------------------------------------------

use std::ops::ControlFlow;

use glam::DVec2;

use crate::{
    engine::types::Frame,
    renderer::DrawSpan,
    world::{Level, NO_TEXTURE, SKY_TEXTURE, Sector, Seg, Sidedef, TextureId},
};

/// How a seg takes part in occlusion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallKind {
    /// One-sided: hides everything behind it.
    Solid,
    /// Two-sided with something visible on it; never closes columns.
    Portal,
    /// Two-sided and visually indistinguishable from open space.
    Reject,
}

pub fn classify(level: &Level, seg: &Seg) -> WallKind {
    let Some(back_id) = seg.back_sector else {
        return WallKind::Solid;
    };
    let front = &level.sectors[seg.front_sector as usize];
    let back = &level.sectors[back_id as usize];

    if front.ceil_h != back.ceil_h || front.floor_h != back.floor_h {
        return WallKind::Portal;
    }

    let side = &level.sidedefs[seg.front_sidedef as usize];
    if back.ceil_tex == front.ceil_tex
        && back.floor_tex == front.floor_tex
        && back.light == front.light
        && side.middle == NO_TEXTURE
    {
        return WallKind::Reject;
    }
    WallKind::Portal
}

/// Per-seg projection constants shared by all of its runs.
#[derive(Clone, Copy, Debug)]
struct WallProj {
    /// World angle of the wall's normal.
    normal: f64,
    /// Perpendicular distance from the viewer to the wall's line.
    dist: f64,
}

impl WallProj {
    fn new(seg: &Seg, rw_angle1: f64, viewer: DVec2, v1: DVec2) -> Self {
        let normal = seg.angle + 90.0;
        let offset = normal - rw_angle1;
        let hyp = viewer.distance(v1);
        Self {
            normal,
            dist: hyp * offset.to_radians().cos(),
        }
    }
}

impl<'a> Frame<'a> {
    /// Run one seg through the pipeline.  `Break` once the screen is full.
    pub fn handle_seg(&mut self, seg_id: usize) -> ControlFlow<()> {
        let level = self.level;
        let seg = &level.segs[seg_id];
        let v1 = level.vertices[seg.v1 as usize].pos;
        let v2 = level.vertices[seg.v2 as usize].pos;

        let Some(clip) = self.proj.clip_to_fov(&self.view, v1, v2) else {
            return ControlFlow::Continue(());
        };
        if clip.x1 == clip.x2 {
            return ControlFlow::Continue(());
        }

        let wall = WallProj::new(seg, clip.rw_angle1, self.view.pos, v1);
        match classify(level, seg) {
            WallKind::Solid => self.clip_solid(seg, &wall, clip.x1, clip.x2),
            WallKind::Portal => {
                self.clip_portal(seg, &wall, clip.x1, clip.x2);
                ControlFlow::Continue(())
            }
            WallKind::Reject => ControlFlow::Continue(()),
        }
    }

    /*──────────────────────── column bookkeeping ─────────────────────*/

    fn clip_solid(&mut self, seg: &Seg, wall: &WallProj, x1: i32, x2: i32) -> ControlFlow<()> {
        if self.range.is_empty() {
            return ControlFlow::Break(());
        }
        for (a, b) in self.range.runs(x1, x2) {
            self.draw_solid_range(seg, wall, a, b);
        }
        self.range.close(x1, x2);

        if self.range.is_empty() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn clip_portal(&mut self, seg: &Seg, wall: &WallProj, x1: i32, x2: i32) {
        for (a, b) in self.range.runs(x1, x2) {
            self.draw_portal_range(seg, wall, a, b);
        }
    }

    /*───────────────────────── span emission ─────────────────────────*/

    #[inline]
    fn emit(&mut self, x: i32, y_top: i32, y_bottom: i32, texture: TextureId, light: u16) {
        // strict `<` on purpose: one-row spans are never emitted
        if y_top < y_bottom {
            self.out.push(DrawSpan {
                x,
                y_top,
                y_bottom,
                texture,
                light,
            });
        }
    }

    /// Scale at `x1` and its per-column increment up to `x2` (inclusive).
    fn scales(&self, wall: &WallProj, x1: i32, x2: i32) -> (f64, f64) {
        let angle = self.view.angle;
        let s1 = self.proj.scale_at(x1 as usize, wall.normal, wall.dist, angle);
        if x2 > x1 {
            let s2 = self.proj.scale_at(x2 as usize, wall.normal, wall.dist, angle);
            (s1, (s2 - s1) / (x2 - x1) as f64)
        } else {
            (s1, 0.0)
        }
    }

    /// Front sidedef and front sector of `seg`.
    fn surfaces(&self, seg: &Seg) -> (&'a Sidedef, &'a Sector) {
        let level = self.level;
        (
            &level.sidedefs[seg.front_sidedef as usize],
            &level.sectors[seg.front_sector as usize],
        )
    }

    /// Ceiling, middle wall and floor of a one-sided seg over `x1 ..= x2`.
    fn draw_solid_range(&mut self, seg: &Seg, wall: &WallProj, x1: i32, x2: i32) {
        let (side, front) = self.surfaces(seg);
        let (wall_tex, ceil_tex, floor_tex, light) =
            (side.middle, front.ceil_tex, front.floor_tex, front.light);

        let z1 = front.ceil_h - self.view.eye_z;
        let z2 = front.floor_h - self.view.eye_z;
        let hh = self.proj.half_height();

        let (scale1, step) = self.scales(wall, x1, x2);
        let mut wall_y1 = hh - z1 * scale1;
        let step_y1 = -step * z1;
        let mut wall_y2 = hh - z2 * scale1;
        let step_y2 = -step * z2;

        for x in x1..=x2 {
            let col = x as usize;
            let upper = self.clip.upper[col];
            let lower = self.clip.lower[col];
            let draw_y1 = wall_y1 - 1.0;
            let draw_y2 = wall_y2;

            if z1 > 0.0 {
                let cy2 = (draw_y1 - 1.0).min((lower - 1) as f64) as i32;
                self.emit(x, upper + 1, cy2, ceil_tex, light);
            }
            if wall_tex != NO_TEXTURE {
                let wy1 = draw_y1.max((upper + 1) as f64) as i32;
                let wy2 = draw_y2.min((lower - 1) as f64) as i32;
                self.emit(x, wy1, wy2, wall_tex, light);
            }
            if z2 < 0.0 {
                let fy1 = (draw_y2 + 1.0).max((upper + 1) as f64) as i32;
                self.emit(x, fy1, lower - 1, floor_tex, light);
            }

            wall_y1 += step_y1;
            wall_y2 += step_y2;
        }
    }

    /// Upper / lower walls and the flats around a two-sided seg over
    /// `x1 ..= x2`, tightening the clip heights behind them.
    fn draw_portal_range(&mut self, seg: &Seg, wall: &WallProj, x1: i32, x2: i32) {
        let (side, front) = self.surfaces(seg);
        // only portals reach here, and they always have a back sector
        let Some(back_id) = seg.back_sector else {
            return;
        };
        let level = self.level;
        let back = &level.sectors[back_id as usize];

        let (upper_tex, lower_tex) = (side.upper, side.lower);
        let (ceil_tex, floor_tex, light) = (front.ceil_tex, front.floor_tex, front.light);
        let eye = self.view.eye_z;

        let mut z1 = front.ceil_h - eye;
        let z2 = front.floor_h - eye;
        let back_z1 = back.ceil_h - eye;
        let back_z2 = back.floor_h - eye;

        let sky = ceil_tex == SKY_TEXTURE;
        if sky && back.ceil_tex == SKY_TEXTURE {
            z1 = back_z1;
        }

        let (draw_upper, draw_ceil) =
            if z1 != back_z1 || front.light != back.light || ceil_tex != back.ceil_tex {
                (upper_tex != NO_TEXTURE && back_z1 < z1, z1 >= 0.0 || sky)
            } else {
                (false, false)
            };
        let (draw_lower, draw_floor) =
            if z2 != back_z2 || floor_tex != back.floor_tex || front.light != back.light {
                (lower_tex != NO_TEXTURE && back_z2 > z2, z2 <= 0.0)
            } else {
                (false, false)
            };

        if !(draw_upper || draw_ceil || draw_lower || draw_floor) {
            return;
        }

        let hh = self.proj.half_height();
        let (scale1, step) = self.scales(wall, x1, x2);

        let mut wall_y1 = hh - z1 * scale1;
        let step_y1 = -step * z1;
        let mut wall_y2 = hh - z2 * scale1;
        let step_y2 = -step * z2;

        // bottom edge of the upper wall
        let (mut portal_y1, step_py1) = if back_z1 > z2 {
            (hh - back_z1 * scale1, -step * back_z1)
        } else {
            (wall_y2, step_y2)
        };
        // top edge of the lower wall
        let (mut portal_y2, step_py2) = if back_z2 < z1 {
            (hh - back_z2 * scale1, -step * back_z2)
        } else {
            (wall_y1, step_y1)
        };

        for x in x1..=x2 {
            let col = x as usize;
            let draw_y1 = wall_y1 - 1.0;
            let draw_y2 = wall_y2;

            if draw_upper {
                let upper = self.clip.upper[col];
                let lower = self.clip.lower[col];
                if draw_ceil {
                    let cy2 = (draw_y1 - 1.0).min((lower - 1) as f64) as i32;
                    self.emit(x, upper + 1, cy2, ceil_tex, light);
                }

                let wy1 = draw_y1.max((upper + 1) as f64) as i32;
                let wy2 = portal_y1.min((lower - 1) as f64) as i32;
                self.emit(x, wy1, wy2, upper_tex, light);

                if self.clip.upper[col] < wy2 {
                    self.clip.upper[col] = wy2;
                }
                portal_y1 += step_py1;
            } else if draw_ceil {
                let upper = self.clip.upper[col];
                let lower = self.clip.lower[col];
                let cy2 = (draw_y1 - 1.0).min((lower - 1) as f64) as i32;
                self.emit(x, upper + 1, cy2, ceil_tex, light);

                if self.clip.upper[col] < cy2 {
                    self.clip.upper[col] = cy2;
                }
            }

            if draw_lower {
                let upper = self.clip.upper[col];
                let lower = self.clip.lower[col];
                if draw_floor {
                    let fy1 = (draw_y2 + 1.0).max((upper + 1) as f64) as i32;
                    self.emit(x, fy1, lower - 1, floor_tex, light);
                }

                let wy1 = (portal_y2 - 1.0).max((upper + 1) as f64) as i32;
                let wy2 = wall_y2.min((lower - 1) as f64) as i32;
                self.emit(x, wy1, wy2, lower_tex, light);

                if self.clip.lower[col] > wy1 {
                    self.clip.lower[col] = wy1;
                }
                portal_y2 += step_py2;
            } else if draw_floor {
                let upper = self.clip.upper[col];
                let lower = self.clip.lower[col];
                let fy1 = (draw_y2 + 1.0).max((upper + 1) as f64) as i32;
                self.emit(x, fy1, lower - 1, floor_tex, light);

                if lower as f64 > draw_y2 + 1.0 {
                    self.clip.lower[col] = fy1;
                }
            }

            wall_y1 += step_y1;
            wall_y2 += step_y2;
        }
    }
}
