use crate::wad::raw::{Wad, WadError};
use bincode::Decode;
use once_cell::sync::Lazy;
use regex::Regex;

/*=======================================================================*/
/*                         Raw binary structs                            */
/*=======================================================================*/

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawThing {
    pub x: i16,
    pub y: i16,
    pub angle: i16,
    pub type_: i16,
    pub options: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawLinedef {
    pub v1: u16,
    pub v2: u16,
    pub flags: u16,
    pub special: u16,
    pub tag: u16,
    /// front, back; `0xFFFF` = no sidedef
    pub sidenum: [u16; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSidedef {
    pub x_off: i16,
    pub y_off: i16,
    pub top_tex: [u8; 8],
    pub bottom_tex: [u8; 8],
    pub mid_tex: [u8; 8],
    pub sector: u16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawVertex {
    pub x: i16,
    pub y: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSeg {
    pub v1: u16,
    pub v2: u16,
    /// binary angle measure, full turn = 65536
    pub angle: i16,
    pub linedef: u16,
    pub side: u16,
    pub offset: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSubsector {
    pub seg_count: u16,
    pub first_seg: u16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawNode {
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    /// front, back; each (top, bottom, left, right)
    pub bbox: [[i16; 4]; 2],
    pub child: [u16; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSector {
    pub floor_h: i16,
    pub ceil_h: i16,
    pub floor_tex: [u8; 8],
    pub ceil_tex: [u8; 8],
    pub light: i16,
    pub special: i16,
    pub tag: i16,
}

/*=======================================================================*/
/*                     Aggregate returned by `parse_level`               */
/*=======================================================================*/
#[derive(Debug, Default)]
pub struct RawLevel {
    pub name: String,
    pub things: Vec<RawThing>,
    pub linedefs: Vec<RawLinedef>,
    pub sidedefs: Vec<RawSidedef>,
    pub vertices: Vec<RawVertex>,
    pub segs: Vec<RawSeg>,
    pub subsectors: Vec<RawSubsector>,
    pub nodes: Vec<RawNode>,
    pub sectors: Vec<RawSector>,
}

/*=======================================================================*/
/*                                Errors                                 */
/*=======================================================================*/

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("marker index {0} out of bounds")]
    MarkerOob(usize),

    #[error("expected lump `{0}` not found after level marker")]
    Missing(&'static str),

    #[error(transparent)]
    Wad(#[from] WadError),
}

/// Lumps that follow a map marker, in their fixed on-disk order.
pub const MAP_LUMPS: [&str; 8] = [
    "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SEGS", "SSECTORS", "NODES", "SECTORS",
];

/*=======================================================================*/
/*                     Convenience helpers on `Wad`                      */
/*=======================================================================*/
impl Wad {
    /// Return directory indices of every map marker (`E#M#`, `MAP##`).
    pub fn level_indices(&self) -> Vec<usize> {
        static RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(E[1-4]M[1-9]|MAP[0-3][0-9])$").expect("static map-marker regex")
        });

        self.lumps()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.size == 0 && RE.is_match(Self::lump_name_str(&l.name)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Return `idx` if the lump there is called `name`.
    fn idx_of(&self, idx: usize, name: &'static str) -> Result<usize, LevelError> {
        let l = self.lumps().get(idx).ok_or(LevelError::Missing(name))?;
        match Self::lump_name_str(&l.name) == name {
            true => Ok(idx),
            false => Err(LevelError::Missing(name)),
        }
    }

    /// Decode the eight lumps the renderer needs from a classic Doom map.
    pub fn parse_level(&self, marker_idx: usize) -> Result<RawLevel, LevelError> {
        // --- bounds check on marker index --------------------------------
        if marker_idx >= self.lumps().len() {
            return Err(LevelError::MarkerOob(marker_idx));
        }

        // --- fixed lump order after marker -------------------------------
        let mut idx = [0usize; MAP_LUMPS.len()];
        for (i, name) in MAP_LUMPS.iter().enumerate() {
            idx[i] = self.idx_of(marker_idx + 1 + i, name)?;
        }
        // REJECT / BLOCKMAP are not used by the renderer

        // --- decode each lump -------------------------------------------
        Ok(RawLevel {
            name: Self::lump_name_str(&self.lumps()[marker_idx].name).into(),
            things: self.lump_to_vec(idx[0])?,
            linedefs: self.lump_to_vec(idx[1])?,
            sidedefs: self.lump_to_vec(idx[2])?,
            vertices: self.lump_to_vec(idx[3])?,
            segs: self.lump_to_vec(idx[4])?,
            subsectors: self.lump_to_vec(idx[5])?,
            nodes: self.lump_to_vec(idx[6])?,
            sectors: self.lump_to_vec(idx[7])?,
        })
    }
}

/*=======================================================================*/
/*                                Tests                                  */
/*=======================================================================*/
