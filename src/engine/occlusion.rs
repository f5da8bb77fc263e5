//! Per-frame occlusion state: which columns are still open, and how much of
//! each open column is still free vertically.

use smallvec::SmallVec;

/// Inclusive column run `(first, last)`.
pub type Run = (i32, i32);

/// Columns not yet claimed by a solid wall this frame.
///
/// Shrinks monotonically between two [`ScreenRange::reset`] calls.
#[derive(Clone, Debug)]
pub struct ScreenRange {
    open: Vec<bool>,
    remaining: usize,
}

impl ScreenRange {
    pub fn new(width: usize) -> Self {
        Self {
            open: vec![true; width],
            remaining: width,
        }
    }

    pub fn reset(&mut self) {
        self.open.fill(true);
        self.remaining = self.open.len();
    }

    /// Number of open columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.remaining
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn is_open(&self, x: usize) -> bool {
        self.open.get(x).copied().unwrap_or(false)
    }

    /// Columns of `[x1, x2)` that fall on the screen.
    #[inline]
    fn bounds(&self, x1: i32, x2: i32) -> std::ops::Range<usize> {
        let w = self.open.len() as i32;
        x1.clamp(0, w) as usize..x2.clamp(0, w) as usize
    }

    /// Maximal runs of open columns inside `[x1, x2)`, left to right.
    pub fn runs(&self, x1: i32, x2: i32) -> SmallVec<[Run; 4]> {
        let mut out = SmallVec::new();
        let cols = self.bounds(x1, x2);
        let mut start: Option<usize> = None;

        for x in cols.clone() {
            match (self.open[x], start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    out.push((s as i32, x as i32 - 1));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            out.push((s as i32, cols.end as i32 - 1));
        }
        out
    }

    /// Claim every open column of `[x1, x2)`.
    pub fn close(&mut self, x1: i32, x2: i32) {
        for x in self.bounds(x1, x2) {
            if std::mem::replace(&mut self.open[x], false) {
                self.remaining -= 1;
            }
        }
    }
}

/// Vertical window still free in every column: rows strictly between
/// `upper[x]` and `lower[x]`.
#[derive(Clone, Debug)]
pub struct ClipHeights {
    pub upper: Vec<i32>,
    pub lower: Vec<i32>,
    height: i32,
}

impl ClipHeights {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            upper: vec![-1; width],
            lower: vec![height as i32; width],
            height: height as i32,
        }
    }

    pub fn reset(&mut self) {
        self.upper.fill(-1);
        self.lower.fill(self.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_fully_open() {
        let r = ScreenRange::new(10);
        assert_eq!(r.len(), 10);
        assert_eq!(r.runs(0, 10).as_slice(), &[(0, 9)]);
    }

    #[test]
    fn close_splits_runs() {
        let mut r = ScreenRange::new(10);
        r.close(3, 6);
        assert_eq!(r.len(), 7);
        assert_eq!(r.runs(0, 10).as_slice(), &[(0, 2), (6, 9)]);
        assert_eq!(r.runs(4, 8).as_slice(), &[(6, 7)]);
        assert!(r.runs(3, 6).is_empty());
    }

    #[test]
    fn disjoint_closes_add_up() {
        let mut r = ScreenRange::new(320);
        r.close(0, 100);
        r.close(200, 250);
        assert_eq!(r.len(), 320 - 100 - 50);
        // overlapping close only counts new columns
        r.close(90, 210);
        assert_eq!(r.len(), 320 - 250);
    }

    #[test]
    fn out_of_screen_bounds_are_clamped() {
        let mut r = ScreenRange::new(8);
        assert_eq!(r.runs(-4, 20).as_slice(), &[(0, 7)]);
        assert!(r.runs(5, 2).is_empty());
        r.close(-3, 100);
        assert!(r.is_empty());
    }

    #[test]
    fn reset_reopens_everything() {
        let mut r = ScreenRange::new(8);
        r.close(0, 8);
        r.reset();
        assert_eq!(r.len(), 8);
        assert!(r.is_open(7));
    }

    #[test]
    fn clip_heights_reset_to_sentinels() {
        let mut c = ClipHeights::new(4, 200);
        c.upper[1] = 50;
        c.lower[2] = 90;
        c.reset();
        assert!(c.upper.iter().all(|&u| u == -1));
        assert!(c.lower.iter().all(|&l| l == 200));
    }
}
