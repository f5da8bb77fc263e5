// ──────────────────────────────────────────────────────────────────────────
// wad/loader.rs
//
//  *   RawLevel   (wad::level)           ──╮
//  *   TextureBank (mut)                   │   --->  world::Level
//                                          ╯          (all references resolved)
// ──────────────────────────────────────────────────────────────────────────

use crate::{
    wad::level::{self as raw_level, RawLevel},
    wad::raw::{Wad, WadError},
    world::{
        Aabb, Level, Linedef, LinedefFlags, Node, Sector, Seg, Sidedef, Subsector, TextureBank,
        TextureError, Thing, Vertex, bsp,
    },
};
use glam::{DVec2, dvec2};
use log::{debug, info};
use thiserror::Error;

/// Sidedef index meaning "no sidedef on this side".
const NO_SIDEDEF: u16 = 0xFFFF;

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Wad(#[from] WadError),

    #[error(transparent)]
    Level(#[from] raw_level::LevelError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("{table} index {index} out of range (len {len})")]
    BadIndex {
        table: &'static str,
        index: usize,
        len: usize,
    },

    #[error("linedef {linedef} is two-sided but has no back sidedef")]
    MissingBackSide { linedef: usize },

    #[error("map has no {0}")]
    EmptyMap(&'static str),

    #[error("{0} nodes do not fit the 15-bit child id")]
    TooManyNodes(usize),
}

fn check(table: &'static str, index: usize, len: usize) -> Result<(), LoadError> {
    if index < len {
        Ok(())
    } else {
        Err(LoadError::BadIndex { table, index, len })
    }
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Load the map at `marker` into a `world::Level`, interning every texture
/// name it references into `bank`.
pub fn load_level(wad: &Wad, marker: usize, bank: &mut TextureBank) -> Result<Level, LoadError> {
    let raw = wad.parse_level(marker)?;
    build_level(raw, bank)
}

/// Validate raw tables and resolve every back-reference into indices.
pub fn build_level(raw: RawLevel, bank: &mut TextureBank) -> Result<Level, LoadError> {
    validate(&raw)?;

    let textures_before = bank.len();

    /*----- 1. Lists without look-ups ------------------------------------*/
    let things: Vec<Thing> = raw.things.iter().map(raw_to_geo::thing_from).collect();
    let vertices: Vec<Vertex> = raw.vertices.iter().map(raw_to_geo::vertex_from).collect();
    let linedefs: Vec<Linedef> = raw.linedefs.iter().map(raw_to_geo::linedef_from).collect();
    let subsectors: Vec<Subsector> = raw
        .subsectors
        .iter()
        .map(raw_to_geo::subsector_from)
        .collect();
    let nodes: Vec<Node> = raw.nodes.iter().map(raw_to_geo::node_from).collect();

    /*----- 2. Lists that need texture look-ups (may fail) ---------------*/
    let sidedefs: Vec<Sidedef> = raw
        .sidedefs
        .iter()
        .map(|s| {
            Ok(Sidedef {
                x_off: s.x_off as f64,
                y_off: s.y_off as f64,
                upper: bank.intern(Wad::lump_name_str(&s.top_tex))?,
                lower: bank.intern(Wad::lump_name_str(&s.bottom_tex))?,
                middle: bank.intern(Wad::lump_name_str(&s.mid_tex))?,
                sector: s.sector,
            })
        })
        .collect::<Result<_, LoadError>>()?;

    let sectors: Vec<Sector> = raw
        .sectors
        .iter()
        .map(|s| {
            Ok(Sector {
                floor_h: s.floor_h as f64,
                ceil_h: s.ceil_h as f64,
                floor_tex: bank.intern(Wad::lump_name_str(&s.floor_tex))?,
                ceil_tex: bank.intern(Wad::lump_name_str(&s.ceil_tex))?,
                light: s.light.clamp(0, 255) as u16,
                special: s.special,
                tag: s.tag,
            })
        })
        .collect::<Result<_, LoadError>>()?;

    /*----- 3. Segs: resolve front/back sides through the linedef --------*/
    let segs: Vec<Seg> = raw
        .segs
        .iter()
        .map(|r| {
            let ld = &linedefs[r.linedef as usize];
            let (front, back) = if r.side == 0 {
                (Some(ld.front_sidedef), ld.back_sidedef)
            } else {
                (ld.back_sidedef, Some(ld.front_sidedef))
            };
            // validate() guarantees a back-facing seg's linedef has a back side
            let front = front.ok_or(LoadError::MissingBackSide {
                linedef: r.linedef as usize,
            })?;
            let back_sector = if ld.flags.contains(LinedefFlags::TWO_SIDED) {
                back.map(|sd| sidedefs[sd as usize].sector)
            } else {
                None
            };
            Ok(Seg {
                v1: r.v1,
                v2: r.v2,
                angle: raw_to_geo::bam_to_degrees(r.angle),
                linedef: r.linedef,
                dir: r.side,
                offset: r.offset as f64,
                front_sidedef: front,
                front_sector: sidedefs[front as usize].sector,
                back_sector,
            })
        })
        .collect::<Result<_, LoadError>>()?;

    info!(
        "loaded {}: {} nodes, {} subsectors, {} segs, {} sectors",
        raw.name,
        nodes.len(),
        subsectors.len(),
        segs.len(),
        sectors.len()
    );
    debug!(
        "{}: {} new texture names ({} total)",
        raw.name,
        bank.len() - textures_before,
        bank.len()
    );

    Ok(Level {
        name: raw.name,
        things,
        linedefs,
        sidedefs,
        vertices,
        segs,
        subsectors,
        nodes,
        sectors,
    })
}

/// Reject corrupt cross references before anything is converted, so the
/// renderer may index tables directly.
fn validate(raw: &RawLevel) -> Result<(), LoadError> {
    if raw.segs.is_empty() {
        return Err(LoadError::EmptyMap("segs"));
    }
    if raw.subsectors.is_empty() {
        return Err(LoadError::EmptyMap("subsectors"));
    }

    let (nv, ns, nl, nseg) = (
        raw.vertices.len(),
        raw.sidedefs.len(),
        raw.linedefs.len(),
        raw.segs.len(),
    );

    for sd in &raw.sidedefs {
        check("sector", sd.sector as usize, raw.sectors.len())?;
    }

    for (i, ld) in raw.linedefs.iter().enumerate() {
        check("vertex", ld.v1 as usize, nv)?;
        check("vertex", ld.v2 as usize, nv)?;
        check("sidedef", ld.sidenum[0] as usize, ns)?;
        let two_sided = LinedefFlags::from_bits_truncate(ld.flags).contains(LinedefFlags::TWO_SIDED);
        match ld.sidenum[1] {
            NO_SIDEDEF if two_sided => return Err(LoadError::MissingBackSide { linedef: i }),
            NO_SIDEDEF => {}
            back => check("sidedef", back as usize, ns)?,
        }
    }

    for seg in &raw.segs {
        check("vertex", seg.v1 as usize, nv)?;
        check("vertex", seg.v2 as usize, nv)?;
        check("linedef", seg.linedef as usize, nl)?;
        let ld = &raw.linedefs[seg.linedef as usize];
        if seg.side != 0 && ld.sidenum[1] == NO_SIDEDEF {
            return Err(LoadError::MissingBackSide {
                linedef: seg.linedef as usize,
            });
        }
    }

    for ss in &raw.subsectors {
        if ss.seg_count == 0 {
            return Err(LoadError::EmptyMap("segs in a subsector"));
        }
        check("seg", ss.first_seg as usize + ss.seg_count as usize - 1, nseg)?;
    }

    // the root id must not collide with the leaf bit
    if raw.nodes.len() > bsp::CHILD_MASK as usize {
        return Err(LoadError::TooManyNodes(raw.nodes.len()));
    }
    // children precede their parent, which also rules out cycles
    for (i, node) in raw.nodes.iter().enumerate() {
        for &child in &node.child {
            if bsp::is_leaf(child) {
                check("subsector", (child & bsp::CHILD_MASK) as usize, raw.subsectors.len())?;
            } else {
                check("node", child as usize, i)?;
            }
        }
    }
    Ok(())
}

/*====================================================================*/
/*                  Raw → Geo helpers (local)                         */
/*====================================================================*/
mod raw_to_geo {
    use super::*;

    /// BAM (full turn = 65536) → degrees in [0, 360).
    pub fn bam_to_degrees(bam: i16) -> f64 {
        let deg = bam as f64 * 360.0 / 65536.0;
        if deg < 0.0 { deg + 360.0 } else { deg }
    }

    pub fn thing_from(r: &raw_level::RawThing) -> Thing {
        Thing {
            pos: dvec2(r.x as f64, r.y as f64),
            angle: r.angle as f64,
            type_id: r.type_ as u16,
            flags: r.options as u16,
        }
    }

    pub fn linedef_from(r: &raw_level::RawLinedef) -> Linedef {
        Linedef {
            v1: r.v1,
            v2: r.v2,
            flags: LinedefFlags::from_bits_truncate(r.flags),
            special: r.special,
            tag: r.tag,
            front_sidedef: r.sidenum[0],
            back_sidedef: (r.sidenum[1] != NO_SIDEDEF).then_some(r.sidenum[1]),
        }
    }

    pub fn vertex_from(r: &raw_level::RawVertex) -> Vertex {
        Vertex {
            pos: dvec2(r.x as f64, r.y as f64),
        }
    }

    pub fn subsector_from(r: &raw_level::RawSubsector) -> Subsector {
        Subsector {
            seg_count: r.seg_count,
            first_seg: r.first_seg,
        }
    }

    const BOXTOP: usize = 0;
    const BOXBOTTOM: usize = 1;
    const BOXLEFT: usize = 2;
    const BOXRIGHT: usize = 3;

    #[inline]
    fn raw_bbox_to_aabb(raw: &[i16; 4]) -> Aabb {
        Aabb {
            min: DVec2::new(raw[BOXLEFT] as f64, raw[BOXBOTTOM] as f64),
            max: DVec2::new(raw[BOXRIGHT] as f64, raw[BOXTOP] as f64),
        }
    }

    pub fn node_from(r: &raw_level::RawNode) -> Node {
        Node {
            x: r.x as f64,
            y: r.y as f64,
            dx: r.dx as f64,
            dy: r.dy as f64,
            bbox: [raw_bbox_to_aabb(&r.bbox[0]), raw_bbox_to_aabb(&r.bbox[1])],
            child: r.child,
        }
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
