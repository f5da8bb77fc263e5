//! Angle and screen-space maths.
//!
//! All angles are in degrees.  World angles grow counter-clockwise from east;
//! view-relative angles are positive to the left of the view direction, so
//! `+half_fov` lands on column 0 and `-half_fov` on column `width`.

use glam::DVec2;

use crate::{config::Settings, engine::types::View};

pub const MIN_SCALE: f64 = 1.0 / 256.0;
pub const MAX_SCALE: f64 = 64.0;

/// Wrap `a` into [0, 360).
#[inline]
pub fn normalize(a: f64) -> f64 {
    let a = a % 360.0;
    let a = if a < 0.0 { a + 360.0 } else { a };
    // -1e-20 + 360 rounds to 360
    if a >= 360.0 { 0.0 } else { a }
}

/// Result of clipping a seg's angular extent against the field of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FovClip {
    pub x1: i32,
    /// Exclusive end column.
    pub x2: i32,
    /// World angle of the seg's start vertex before any clamping.
    pub rw_angle1: f64,
}

/// Screen constants plus the column → view-angle table, built once.
#[derive(Clone, Debug)]
pub struct Projection {
    width: usize,
    half_width: f64,
    half_height: f64,
    fov: f64,
    half_fov: f64,
    screen_distance: f64,
    x_to_angle: Vec<f64>,
}

impl Projection {
    pub fn new(settings: &Settings) -> Self {
        let width = settings.width();
        let half_width = settings.half_width();
        let screen_distance = settings.screen_distance();

        let x_to_angle = (0..=width)
            .map(|i| ((half_width - i as f64) / screen_distance).atan().to_degrees())
            .collect();

        Self {
            width,
            half_width,
            half_height: settings.half_height(),
            fov: settings.fov,
            half_fov: settings.half_fov(),
            screen_distance,
            x_to_angle,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    #[inline]
    pub fn screen_distance(&self) -> f64 {
        self.screen_distance
    }

    /// View-relative angle of the ray through column `x` (`0..=width`).
    #[inline]
    pub fn x_angle(&self, x: usize) -> f64 {
        self.x_to_angle[x]
    }

    /// World angle of `p` seen from the viewer, in (-180, 180].
    #[inline]
    pub fn point_to_angle(&self, view: &View, p: DVec2) -> f64 {
        let d = p - view.pos;
        d.y.atan2(d.x).to_degrees()
    }

    /// Screen column of a view-relative angle, truncated toward zero.
    #[inline]
    pub fn angle_to_x(&self, angle: f64) -> i32 {
        (self.screen_distance - angle.to_radians().tan() * self.half_width) as i32
    }

    /// Project the seg `a → b` onto screen columns.
    ///
    /// `None` when the seg faces away from the viewer (span ≥ 180°) or lies
    /// entirely outside the field of view.
    pub fn clip_to_fov(&self, view: &View, a: DVec2, b: DVec2) -> Option<FovClip> {
        let mut angle1 = self.point_to_angle(view, a);
        let mut angle2 = self.point_to_angle(view, b);

        let span = normalize(angle1 - angle2);
        if span >= 180.0 {
            return None;
        }

        let rw_angle1 = angle1;
        angle1 -= view.angle;
        angle2 -= view.angle;

        let span1 = normalize(angle1 + self.half_fov);
        if span1 > self.fov {
            if span1 >= span + self.fov {
                return None;
            }
            angle1 = self.half_fov;
        }

        let span2 = normalize(self.half_fov - angle2);
        if span2 > self.fov {
            if span2 >= span + self.fov {
                return None;
            }
            angle2 = -self.half_fov;
        }

        Some(FovClip {
            x1: self.angle_to_x(angle1),
            x2: self.angle_to_x(angle2),
            rw_angle1,
        })
    }

    /// True when the edge `a → b`, as seen from the viewer, overlaps the
    /// field of view.  Same span test as [`Self::clip_to_fov`], left edge
    /// only.
    pub fn edge_in_fov(&self, view: &View, a: DVec2, b: DVec2) -> bool {
        let angle1 = self.point_to_angle(view, a);
        let angle2 = self.point_to_angle(view, b);

        let span = normalize(angle1 - angle2);
        let span1 = normalize(angle1 - view.angle + self.half_fov);
        !(span1 > self.fov && span1 >= span + self.fov)
    }

    /// Perspective scale of a wall with normal `normal` at perpendicular
    /// distance `dist`, sampled at column `x`.
    pub fn scale_at(&self, x: usize, normal: f64, dist: f64, view_angle: f64) -> f64 {
        let x_angle = self.x_angle(x);
        let num = self.screen_distance * (normal - x_angle - view_angle).to_radians().cos();
        let den = dist * x_angle.to_radians().cos();
        (num / den).max(MIN_SCALE).min(MAX_SCALE)
    }
}
