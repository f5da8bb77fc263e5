//! ----------------------------------------------------------------------------
//! **BSP front-to-back traversal**
//!
//! Responsible for
//! * visiting subsectors nearest-first relative to the viewer
//! * culling far subtrees whose bounding box is outside the field of view
//! * handing every seg of a reached leaf to the seg pipeline
//!
//! The walk returns [`ControlFlow::Break`] as soon as the screen has no open
//! column left; every recursive entry checks it, so a full screen stops all
//! further descent.
//! ----------------------------------------------------------------------------

use std::ops::ControlFlow;

use glam::dvec2;
use smallvec::SmallVec;

use crate::{
    engine::types::Frame,
    world::{
        Aabb,
        bsp::{CHILD_MASK, is_leaf},
    },
};

impl Frame<'_> {
    /// Recursively walk the tree rooted at `child` (node id or leaf id).
    pub fn traverse(&mut self, child: u16) -> ControlFlow<()> {
        if self.range.is_empty() {
            return ControlFlow::Break(());
        }

        // Leaf? ──────
        if is_leaf(child) {
            return self.draw_subsector(child & CHILD_MASK);
        }

        // Internal node ──────
        let level = self.level;
        let node = &level.nodes[child as usize];
        let near = node.is_on_back_side(self.view.pos) as usize; // 0: front, 1: back
        let far = near ^ 1;

        // Near side first …
        self.traverse(node.child[near])?;

        // … far side only if its bounding box might be visible.
        if self.bbox_visible(&node.bbox[far]) {
            self.traverse(node.child[far])?;
        }
        ControlFlow::Continue(())
    }

    fn draw_subsector(&mut self, ss: u16) -> ControlFlow<()> {
        let level = self.level;
        for seg_id in level.subsectors[ss as usize].segs() {
            self.handle_seg(seg_id)?;
        }
        ControlFlow::Continue(())
    }

    /// Whether any edge of `bbox` facing the viewer overlaps the field of
    /// view.  A viewer inside the box always sees it.
    pub fn bbox_visible(&self, bbox: &Aabb) -> bool {
        let p = self.view.pos;
        let a = dvec2(bbox.left(), bbox.bottom());
        let b = dvec2(bbox.left(), bbox.top());
        let c = dvec2(bbox.right(), bbox.top());
        let d = dvec2(bbox.right(), bbox.bottom());

        let mut sides: SmallVec<[_; 2]> = SmallVec::new();
        if p.x < bbox.left() {
            if p.y > bbox.top() {
                sides.extend([(b, a), (c, b)]);
            } else if p.y < bbox.bottom() {
                sides.extend([(b, a), (a, d)]);
            } else {
                sides.push((b, a));
            }
        } else if p.x > bbox.right() {
            if p.y > bbox.top() {
                sides.extend([(c, b), (d, c)]);
            } else if p.y < bbox.bottom() {
                sides.extend([(a, d), (d, c)]);
            } else {
                sides.push((d, c));
            }
        } else if p.y > bbox.top() {
            sides.push((c, b));
        } else if p.y < bbox.bottom() {
            sides.push((a, d));
        } else {
            return true;
        }

        sides
            .into_iter()
            .any(|(v1, v2)| self.proj.edge_in_fov(&self.view, v1, v2))
    }
}
