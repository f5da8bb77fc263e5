use crate::world::geometry::{Level, Node, SubsectorId};
use glam::DVec2;

pub const CHILD_MASK: u16 = 0x7FFF;

/// Child ids with this bit set are leaves: `id - SUBSECTOR_BIT` is a subsector.
pub const SUBSECTOR_BIT: u16 = 0x8000;

#[inline(always)]
pub fn is_leaf(child: u16) -> bool {
    child & SUBSECTOR_BIT != 0
}

// ──────────────────────────────────────────────────────────────────────────
//                       Level – public helpers
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// Entry point of the BSP walk: the last node, or leaf 0 for a map
    /// that consists of a single subsector.
    #[inline(always)]
    pub fn bsp_root(&self) -> u16 {
        match self.nodes.len() {
            0 => SUBSECTOR_BIT,
            n => (n - 1) as u16,
        }
    }

    /// Walk the BSP with the back-side test and return the subsector id
    /// containing `p`.
    pub fn locate_subsector(&self, p: DVec2) -> SubsectorId {
        let mut idx = self.bsp_root();
        while !is_leaf(idx) {
            let node = &self.nodes[idx as usize];
            idx = node.child[node.is_on_back_side(p) as usize];
        }
        idx & CHILD_MASK
    }

    /// Floor height under `p`: the front sector of the first seg of the
    /// containing subsector.
    pub fn floor_height_at(&self, p: DVec2) -> f64 {
        let ss = &self.subsectors[self.locate_subsector(p) as usize];
        let seg = &self.segs[ss.first_seg as usize];
        self.sectors[seg.front_sector as usize].floor_h
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Node geometry helpers
// ──────────────────────────────────────────────────────────────────────────
impl Node {
    /// Sign of `(p - origin) × delta`; zero counts as the back side.
    #[inline(always)]
    pub fn is_on_back_side(&self, p: DVec2) -> bool {
        let dx = p.x - self.x;
        let dy = p.y - self.y;
        dx * self.dy - dy * self.dx <= 0.0
    }
}

// ──────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use glam::dvec2;

    #[test]
    fn partition_sides() {
        let lvl = fixtures::split_level(10);
        let root = &lvl.nodes[lvl.bsp_root() as usize];
        // partition runs north along x = 0: east is the front
        assert!(!root.is_on_back_side(dvec2(50.0, 0.0)));
        assert!(root.is_on_back_side(dvec2(-50.0, 0.0)));
        // on the line itself counts as back
        assert!(root.is_on_back_side(dvec2(0.0, 25.0)));
    }

    #[test]
    fn locate_and_floor_height() {
        let lvl = fixtures::split_level(10);
        assert_eq!(lvl.locate_subsector(dvec2(50.0, 0.0)), 0);
        assert_eq!(lvl.locate_subsector(dvec2(-50.0, 0.0)), 1);
        assert_eq!(lvl.floor_height_at(dvec2(50.0, 0.0)), fixtures::FLOOR_H);
    }

    #[test]
    fn single_subsector_map_roots_at_leaf_zero() {
        let lvl = fixtures::square_room();
        assert!(lvl.nodes.is_empty());
        assert!(is_leaf(lvl.bsp_root()));
        assert_eq!(lvl.locate_subsector(dvec2(0.0, 0.0)), 0);
    }
}
