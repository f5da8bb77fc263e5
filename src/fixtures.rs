//! Hand-built maps for unit tests.  Everything goes through the real loader
//! so resolution and validation are exercised too.

use crate::{
    wad::{
        level::{
            RawLevel, RawLinedef, RawNode, RawSector, RawSeg, RawSidedef, RawSubsector, RawThing,
            RawVertex,
        },
        loader::{LoadError, build_level},
        raw::build_wad,
    },
    world::{Level, LinedefFlags, TextureBank},
};

pub const FLOOR_H: f64 = 8.0;
pub const CEIL_H: f64 = 136.0;

fn name8(s: &str) -> [u8; 8] {
    let mut raw = [0u8; 8];
    raw[..s.len()].copy_from_slice(s.as_bytes());
    raw
}

/// Incremental `RawLevel` builder; every method returns the new index.
#[derive(Default)]
pub struct MapBuilder {
    raw: RawLevel,
}

impl MapBuilder {
    pub fn new() -> Self {
        let mut m = Self::default();
        m.raw.name = "E1M1".into();
        m
    }

    pub fn vertex(&mut self, x: i16, y: i16) -> u16 {
        self.raw.vertices.push(RawVertex { x, y });
        (self.raw.vertices.len() - 1) as u16
    }

    pub fn sector(&mut self, floor: i16, ceil: i16, light: i16) -> u16 {
        self.sector_tex(floor, ceil, light, "FLAT", "CEIL")
    }

    pub fn sector_tex(
        &mut self,
        floor: i16,
        ceil: i16,
        light: i16,
        floor_tex: &str,
        ceil_tex: &str,
    ) -> u16 {
        self.raw.sectors.push(RawSector {
            floor_h: floor,
            ceil_h: ceil,
            floor_tex: name8(floor_tex),
            ceil_tex: name8(ceil_tex),
            light,
            special: 0,
            tag: 0,
        });
        (self.raw.sectors.len() - 1) as u16
    }

    fn sidedef(&mut self, sector: u16, mid: &str) -> u16 {
        self.raw.sidedefs.push(RawSidedef {
            x_off: 0,
            y_off: 0,
            top_tex: name8("UPPER"),
            bottom_tex: name8("LOWER"),
            mid_tex: name8(mid),
            sector,
        });
        (self.raw.sidedefs.len() - 1) as u16
    }

    /// Linedef with a front sidedef in `front` (middle texture `mid`) and,
    /// when `back` is given, a back sidedef without a middle texture.
    pub fn linedef(
        &mut self,
        v1: u16,
        v2: u16,
        front: u16,
        back: Option<u16>,
        flags: u16,
        mid: &str,
    ) -> u16 {
        let f = self.sidedef(front, mid);
        let b = back.map(|s| self.sidedef(s, "-")).unwrap_or(0xFFFF);
        self.raw.linedefs.push(RawLinedef {
            v1,
            v2,
            flags,
            special: 0,
            tag: 0,
            sidenum: [f, b],
        });
        (self.raw.linedefs.len() - 1) as u16
    }

    /// Seg `v1 → v2` with its BAM angle computed from the vertices.
    pub fn seg(&mut self, v1: u16, v2: u16, linedef: u16, side: u16) -> u16 {
        let angle = match (
            self.raw.vertices.get(v1 as usize),
            self.raw.vertices.get(v2 as usize),
        ) {
            (Some(a), Some(b)) => {
                let deg = ((b.y - a.y) as f64).atan2((b.x - a.x) as f64).to_degrees();
                (deg / 360.0 * 65536.0).round() as i64 as u16 as i16
            }
            _ => 0,
        };
        self.raw.segs.push(RawSeg {
            v1,
            v2,
            angle,
            linedef,
            side,
            offset: 0,
        });
        (self.raw.segs.len() - 1) as u16
    }

    /// One-sided solid wall `v1 → v2` facing its right-hand side.
    pub fn wall(&mut self, v1: u16, v2: u16, sector: u16, tex: &str) -> u16 {
        let ld = self.linedef(v1, v2, sector, None, LinedefFlags::IMPASSABLE.bits(), tex);
        self.seg(v1, v2, ld, 0)
    }

    /// Subsector made of the last `count` segs.
    pub fn subsector_of_last(&mut self, count: u16) -> u16 {
        let first = self.raw.segs.len() as u16 - count;
        self.raw.subsectors.push(RawSubsector {
            seg_count: count,
            first_seg: first,
        });
        (self.raw.subsectors.len() - 1) as u16
    }

    /// Node with boxes given as (top, bottom, left, right).
    pub fn node(
        &mut self,
        origin: (i16, i16),
        delta: (i16, i16),
        bbox: [[i16; 4]; 2],
        child: [u16; 2],
    ) -> u16 {
        self.raw.nodes.push(RawNode {
            x: origin.0,
            y: origin.1,
            dx: delta.0,
            dy: delta.1,
            bbox,
            child,
        });
        (self.raw.nodes.len() - 1) as u16
    }

    pub fn thing(&mut self, x: i16, y: i16, angle: i16, type_: i16) {
        self.raw.things.push(RawThing {
            x,
            y,
            angle,
            type_,
            options: 7,
        });
    }

    pub fn build(self) -> Result<Level, LoadError> {
        build_level(self.raw, &mut TextureBank::new())
    }

    pub fn build_with_bank(self) -> (Level, TextureBank) {
        let mut bank = TextureBank::new();
        let lvl = build_level(self.raw, &mut bank).expect("fixture map must load");
        (lvl, bank)
    }

    /// Serialise into a PWAD holding one `E1M1` map.
    pub fn into_wad(self) -> Vec<u8> {
        let r = self.raw;
        let words = |w: &[i16]| -> Vec<u8> { w.iter().flat_map(|v| v.to_le_bytes()).collect() };
        let mut lumps: Vec<(&str, Vec<u8>)> = vec![("E1M1", vec![])];

        lumps.push((
            "THINGS",
            r.things
                .iter()
                .flat_map(|t| words(&[t.x, t.y, t.angle, t.type_, t.options]))
                .collect(),
        ));
        lumps.push((
            "LINEDEFS",
            r.linedefs
                .iter()
                .flat_map(|l| {
                    [l.v1, l.v2, l.flags, l.special, l.tag, l.sidenum[0], l.sidenum[1]]
                        .into_iter()
                        .flat_map(u16::to_le_bytes)
                })
                .collect(),
        ));
        lumps.push((
            "SIDEDEFS",
            r.sidedefs
                .iter()
                .flat_map(|s| {
                    let mut b = words(&[s.x_off, s.y_off]);
                    b.extend_from_slice(&s.top_tex);
                    b.extend_from_slice(&s.bottom_tex);
                    b.extend_from_slice(&s.mid_tex);
                    b.extend_from_slice(&s.sector.to_le_bytes());
                    b
                })
                .collect(),
        ));
        lumps.push((
            "VERTEXES",
            r.vertices.iter().flat_map(|v| words(&[v.x, v.y])).collect(),
        ));
        lumps.push((
            "SEGS",
            r.segs
                .iter()
                .flat_map(|s| {
                    let mut b = Vec::with_capacity(12);
                    b.extend_from_slice(&s.v1.to_le_bytes());
                    b.extend_from_slice(&s.v2.to_le_bytes());
                    b.extend_from_slice(&s.angle.to_le_bytes());
                    b.extend_from_slice(&s.linedef.to_le_bytes());
                    b.extend_from_slice(&s.side.to_le_bytes());
                    b.extend_from_slice(&s.offset.to_le_bytes());
                    b
                })
                .collect(),
        ));
        lumps.push((
            "SSECTORS",
            r.subsectors
                .iter()
                .flat_map(|s| [s.seg_count, s.first_seg].into_iter().flat_map(u16::to_le_bytes))
                .collect(),
        ));
        lumps.push((
            "NODES",
            r.nodes
                .iter()
                .flat_map(|n| {
                    let mut b = words(&[n.x, n.y, n.dx, n.dy]);
                    b.extend(words(&n.bbox[0]));
                    b.extend(words(&n.bbox[1]));
                    b.extend_from_slice(&n.child[0].to_le_bytes());
                    b.extend_from_slice(&n.child[1].to_le_bytes());
                    b
                })
                .collect(),
        ));
        lumps.push((
            "SECTORS",
            r.sectors
                .iter()
                .flat_map(|s| {
                    let mut b = words(&[s.floor_h, s.ceil_h]);
                    b.extend_from_slice(&s.floor_tex);
                    b.extend_from_slice(&s.ceil_tex);
                    b.extend(words(&[s.light, s.special, s.tag]));
                    b
                })
                .collect(),
        ));
        build_wad(&lumps)
    }
}

/*──────────────────────────── Canned maps ────────────────────────────*/

fn square_room_builder() -> MapBuilder {
    let mut m = MapBuilder::new();
    let s = m.sector(0, 128, 160);
    let ne = m.vertex(100, 100);
    let se = m.vertex(100, -100);
    let sw = m.vertex(-100, -100);
    let nw = m.vertex(-100, 100);
    // clockwise around the centre so every wall faces inwards
    m.wall(ne, se, s, "EAST");
    m.wall(se, sw, s, "SOUTH");
    m.wall(sw, nw, s, "WEST");
    m.wall(nw, ne, s, "NORTH");
    m.subsector_of_last(4);
    m.thing(0, 0, 0, 1);
    m
}

/// 200×200 room centred on the origin, one subsector, no nodes.
/// Floor 0, ceiling 128, light 160; walls textured by compass direction.
pub fn square_room() -> Level {
    square_room_builder().build().expect("square room")
}

pub fn square_room_with_bank() -> (Level, TextureBank) {
    square_room_builder().build_with_bank()
}

pub fn square_room_wad() -> Vec<u8> {
    square_room_builder().into_wad()
}

pub fn split_builder(front_half: i16) -> MapBuilder {
    let mut m = MapBuilder::new();
    let s = m.sector(FLOOR_H as i16, CEIL_H as i16, 200);

    // subsector 0 (east of x = 0): wall at x = 20 facing east
    let a = m.vertex(20, -front_half);
    let b = m.vertex(20, front_half);
    m.wall(a, b, s, "FRONT");
    m.subsector_of_last(1);

    // subsector 1 (west of x = 0): wall at x = -100 facing east
    let c = m.vertex(-100, -200);
    let d = m.vertex(-100, 200);
    m.wall(c, d, s, "BACK");
    m.subsector_of_last(1);

    // partition along x = 0 pointing north: east is the front side
    m.node(
        (0, 0),
        (0, 64),
        [[400, -400, 0, 200], [400, -400, -200, 0]],
        [0x8000, 0x8001],
    );
    m
}

/// Two subsectors split by the line x = 0.  The front (east) one holds a
/// wall at x = 20 spanning y ∈ [-front_half, front_half]; the back (west)
/// one a wide wall at x = -100.  Floor `FLOOR_H`, ceiling `CEIL_H`.
pub fn split_level(front_half: i16) -> Level {
    split_builder(front_half).build().expect("split level")
}

pub fn split_level_with_bank(front_half: i16) -> (Level, TextureBank) {
    split_builder(front_half).build_with_bank()
}

fn portal_builder(back_floor: i16, back_ceil: i16, back_light: i16, far_wall: bool) -> MapBuilder {
    let mut m = MapBuilder::new();
    let near = m.sector(0, 128, 160);
    let far = m.sector(back_floor, back_ceil, back_light);

    // two-sided line at x = 128, front side facing the origin
    let a = m.vertex(128, 128);
    let b = m.vertex(128, -128);
    let ld = m.linedef(a, b, near, Some(far), LinedefFlags::TWO_SIDED.bits(), "-");
    m.seg(a, b, ld, 0);
    let near_ss = m.subsector_of_last(1);

    if far_wall {
        let c = m.vertex(256, 256);
        let d = m.vertex(256, -256);
        m.wall(c, d, far, "FAR");
        let far_ss = m.subsector_of_last(1);

        // partition along x = 128 pointing south: west is the front side
        m.node(
            (128, 0),
            (0, -64),
            [[256, -256, -256, 128], [256, -256, 128, 256]],
            [0x8000 | near_ss, 0x8000 | far_ss],
        );
    }
    m
}

/// Near sector (floor 0, ceiling 128, light 160) seen through a two-sided
/// line at x = 128; behind it a sector with the given heights and light,
/// closed by a solid wall at x = 256.  Textures are identical on both sides.
pub fn portal_level(back_floor: i16, back_ceil: i16, back_light: i16) -> Level {
    portal_builder(back_floor, back_ceil, back_light, true)
        .build()
        .expect("portal level")
}

pub fn portal_level_with_bank(
    back_floor: i16,
    back_ceil: i16,
    back_light: i16,
) -> (Level, TextureBank) {
    portal_builder(back_floor, back_ceil, back_light, true).build_with_bank()
}

/// Only the two-sided line, as a single subsector.
pub fn lone_portal(back_floor: i16, back_ceil: i16, back_light: i16) -> Level {
    portal_builder(back_floor, back_ceil, back_light, false)
        .build()
        .expect("lone portal")
}
