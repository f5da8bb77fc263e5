use bitflags::bitflags;
use glam::DVec2;

use crate::world::texture::TextureId;

pub type SubsectorId = u16;
pub type LinedefId = u16;
pub type SegmentId = u16;
pub type VertexId = u16;
pub type SidedefId = u16;
pub type SectorId = u16;
pub type NodeId = u16;

/// Runtime snapshot of one map (immutable after load).
///
/// Every cross reference is an index into one of the tables below and has
/// been range-checked by the loader.
#[derive(Debug)]
pub struct Level {
    pub name: String,
    pub things: Vec<Thing>,
    pub linedefs: Vec<Linedef>,
    pub sidedefs: Vec<Sidedef>,
    pub vertices: Vec<Vertex>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub sectors: Vec<Sector>,
}

/*------------------------- game objects -----------------------------*/

#[derive(Clone, Debug)]
pub struct Thing {
    pub pos: DVec2,
    pub angle: f64, // degrees
    pub type_id: u16,
    pub flags: u16,
}

/*--------------------------- linedefs -------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LinedefFlags: u16 {
        const IMPASSABLE      = 0x0001;
        const BLOCK_MONSTERS  = 0x0002;
        const TWO_SIDED       = 0x0004;
        const UPPER_UNPEGGED  = 0x0008;
        const LOWER_UNPEGGED  = 0x0010;
        const SECRET          = 0x0020;
        const BLOCK_SOUND     = 0x0040;
        const NOT_ON_MAP      = 0x0080;
        const ALREADY_ON_MAP  = 0x0100;
    }
}

#[derive(Clone, Debug)]
pub struct Linedef {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: LinedefFlags,
    pub special: u16,
    pub tag: u16,
    pub front_sidedef: SidedefId,
    pub back_sidedef: Option<SidedefId>,
}

/*--------------------------- sidedefs -------------------------------*/

#[derive(Clone, Debug)]
pub struct Sidedef {
    pub x_off: f64,
    pub y_off: f64,
    pub upper: TextureId,
    pub lower: TextureId,
    pub middle: TextureId,
    pub sector: SectorId,
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: DVec2,
}

/// Directed wall fragment.  `front_*` / `back_sector` are resolved at load
/// time from the owning linedef and the direction flag.
#[derive(Clone, Debug)]
pub struct Seg {
    pub v1: VertexId,
    pub v2: VertexId,
    /// Direction of `v1 → v2` in degrees, [0, 360).
    pub angle: f64,
    pub linedef: LinedefId,
    /// 0 = the linedef's front side is this seg's front side.
    pub dir: u16,
    pub offset: f64,
    pub front_sidedef: SidedefId,
    pub front_sector: SectorId,
    /// `Some` only when the linedef is flagged two-sided.
    pub back_sector: Option<SectorId>,
}

#[derive(Clone, Debug)]
pub struct Subsector {
    pub seg_count: u16,
    pub first_seg: SegmentId,
}

impl Subsector {
    #[inline]
    pub fn segs(&self) -> std::ops::Range<usize> {
        let first = self.first_seg as usize;
        first..first + self.seg_count as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec2, // (left, bottom)
    pub max: DVec2, // (right, top)
}

impl Aabb {
    #[inline]
    pub fn left(&self) -> f64 {
        self.min.x
    }
    #[inline]
    pub fn right(&self) -> f64 {
        self.max.x
    }
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.min.y
    }
    #[inline]
    pub fn top(&self) -> f64 {
        self.max.y
    }
}

/// BSP split.  `child[0]` / `bbox[0]` are the front side, `[1]` the back.
#[derive(Clone, Debug)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub bbox: [Aabb; 2],
    pub child: [u16; 2],
}

#[derive(Clone, Debug)]
pub struct Sector {
    pub floor_h: f64,
    pub ceil_h: f64,
    pub floor_tex: TextureId,
    pub ceil_tex: TextureId,
    /// 0‥255
    pub light: u16,
    pub special: i16,
    pub tag: i16,
}
