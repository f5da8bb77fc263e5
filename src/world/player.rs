use glam::{DVec2, dvec2};

use crate::{engine::projection::normalize, world::Level};

/// THINGS type of the player 1 start.
pub const PLAYER1_START: u16 = 1;

/// Viewer position and heading on the map plane.
///
/// * Only **yaw** is simulated – Doom never tilts up/down.
/// * Eye height is not stored: it is derived each frame from the floor under
///   `pos` (see [`crate::world::Level::floor_height_at`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: DVec2,
    /// Degrees, [0, 360); 0 = east, counter-clockwise.
    pub angle: f64,
}

impl Player {
    pub fn new(pos: DVec2, angle: f64) -> Self {
        Self {
            pos,
            angle: normalize(angle),
        }
    }

    /// Viewer placed on the map's first player-1 start, if it has one.
    pub fn spawn(level: &Level) -> Option<Self> {
        level
            .things
            .iter()
            .find(|t| t.type_id == PLAYER1_START)
            .map(|t| Self::new(t.pos, t.angle))
    }

    /// Unit vector pointing where the player looks.
    #[inline(always)]
    pub fn forward(&self) -> DVec2 {
        let (s, c) = self.angle.to_radians().sin_cos();
        dvec2(c, s)
    }

    /// Unit vector pointing to the player's right.
    #[inline(always)]
    pub fn right(&self) -> DVec2 {
        // Perpendicular to forward: (x, y) -> (y, -x)
        let f = self.forward();
        dvec2(f.y, -f.x)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe, + right).
    pub fn step(&mut self, forward: f64, side: f64) {
        self.pos += self.forward() * forward + self.right() * side;
    }

    /// Rotate by `delta` degrees (positive = turn left).
    pub fn turn(&mut self, delta: f64) {
        self.angle = normalize(self.angle + delta);
    }
}
