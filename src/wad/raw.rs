//! # Doom WAD container
//!
//! * Reads the entire IWAD/PWAD into RAM.
//! * Provides zero-copy access to individual lumps.
//! * Decodes binary lumps into typed vectors with **bincode 2**.

use bincode::{Decode, config, decode_from_slice};
use byteorder::{LittleEndian as LE, ReadBytesExt};
use std::{
    collections::HashMap,
    fs,
    io::{self, Read},
    mem,
    path::Path,
};
use thiserror::Error;

/// Size (in bytes) of the header and of one directory entry.
const HEADER_SIZE: usize = 12;
const DIR_ENTRY_SIZE: usize = 16;

/// One entry in the lump directory (16 bytes on disk).
#[derive(Clone, Debug)]
pub struct LumpInfo {
    pub name: [u8; 8],
    pub offset: u32,
    pub size: u32,
}

/// Entire WAD in memory (raw bytes + parsed directory).
#[derive(Debug)]
pub struct Wad {
    lumps: Vec<LumpInfo>,
    bytes: Vec<u8>,
    by_name: HashMap<String, usize>,
}

/// Loader / decoding errors.
#[derive(Error, Debug)]
pub enum WadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file is not an IWAD or PWAD")]
    BadMagic,

    #[error("directory extends beyond end of file")]
    DirectoryOutOfBounds,

    #[error("lump index {0} out of range")]
    BadIndex(usize),

    #[error("lump {name} (# {index}) slice {offset}+{size} past EOF ({file_size})")]
    BadOffset {
        index: usize,
        name: String,
        offset: u32,
        size: u32,
        file_size: usize,
    },

    #[error("lump {name} (# {index}) size {size} not multiple of element {elem_size}")]
    BadLumpSize {
        index: usize,
        name: String,
        size: usize,
        elem_size: usize,
    },

    #[error("lump {name} (# {index}) element {elem}: {source}")]
    BadElement {
        index: usize,
        name: String,
        elem: usize,
        source: bincode::error::DecodeError,
    },
}

impl Wad {
    // ------------------------------------------------------------------ //
    // Low-level helpers
    // ------------------------------------------------------------------ //

    /// Expose directory as a read-only slice
    pub fn lumps(&self) -> &[LumpInfo] {
        &self.lumps
    }

    /// Return &str view of an 8-byte lump name (trimmed at first NUL).
    pub fn lump_name_str(name: &[u8; 8]) -> &str {
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        std::str::from_utf8(&name[..end]).unwrap_or("?")
    }

    /// Raw bytes of lump `idx` (slice into `self.bytes`).
    pub fn lump_bytes(&self, idx: usize) -> Result<&[u8], WadError> {
        let l = self.lumps.get(idx).ok_or(WadError::BadIndex(idx))?;
        let start = l.offset as usize;
        let end = start + l.size as usize;
        if end > self.bytes.len() {
            return Err(WadError::BadOffset {
                index: idx,
                name: Self::lump_name_str(&l.name).into(),
                offset: l.offset,
                size: l.size,
                file_size: self.bytes.len(),
            });
        }
        Ok(&self.bytes[start..end])
    }

    /// Find the last lump with `name` (case-sensitive like vanilla Doom).
    pub fn find_lump(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    // ------------------------------------------------------------------ //
    // Generic decode helper
    // ------------------------------------------------------------------ //

    /// Decode lump `idx` as a packed array of fixed-size little-endian `T`.
    /// An empty lump yields an empty vector.
    pub fn lump_to_vec<T>(&self, idx: usize) -> Result<Vec<T>, WadError>
    where
        T: Decode<()>,
    {
        let bytes = self.lump_bytes(idx)?;
        let elem = mem::size_of::<T>();

        if bytes.len() % elem != 0 {
            return Err(WadError::BadLumpSize {
                index: idx,
                name: Self::lump_name_str(&self.lumps[idx].name).into(),
                size: bytes.len(),
                elem_size: elem,
            });
        }

        let cfg = config::standard()
            .with_fixed_int_encoding()
            .with_little_endian();
        let mut out = Vec::with_capacity(bytes.len() / elem);
        let mut slice = bytes;

        while !slice.is_empty() {
            let (val, read) =
                decode_from_slice::<T, _>(slice, cfg).map_err(|e| WadError::BadElement {
                    index: idx,
                    name: Self::lump_name_str(&self.lumps[idx].name).into(),
                    elem: out.len(),
                    source: e,
                })?;
            out.push(val);
            slice = &slice[read..];
        }
        Ok(out)
    }

    // ------------------------------------------------------------------ //
    // Loading
    // ------------------------------------------------------------------ //

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WadError> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Parse header and directory of an in-memory WAD image.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, WadError> {
        if bytes.len() < HEADER_SIZE {
            return Err(WadError::BadMagic);
        }
        let mut header = &bytes[..HEADER_SIZE];

        let mut magic = [0u8; 4];
        header.read_exact(&mut magic)?;
        if &magic != b"IWAD" && &magic != b"PWAD" {
            return Err(WadError::BadMagic);
        }

        let num_lumps = header.read_u32::<LE>()?;
        let dir_offset = header.read_u32::<LE>()?;

        // directory bounds check
        let dir_end = dir_offset as usize + num_lumps as usize * DIR_ENTRY_SIZE;
        if dir_end > bytes.len() {
            return Err(WadError::DirectoryOutOfBounds);
        }

        // parse directory
        let mut lumps = Vec::with_capacity(num_lumps as usize);
        let mut cur = &bytes[dir_offset as usize..dir_end];

        for _ in 0..num_lumps {
            let offset = cur.read_u32::<LE>()?;
            let size = cur.read_u32::<LE>()?;
            let mut name = [0u8; 8];
            cur.read_exact(&mut name)?;
            lumps.push(LumpInfo { name, offset, size });
        }

        // validate each lump slice
        for (i, l) in lumps.iter().enumerate() {
            let end = l.offset as usize + l.size as usize;
            if end > bytes.len() {
                return Err(WadError::BadOffset {
                    index: i,
                    name: Self::lump_name_str(&l.name).into(),
                    offset: l.offset,
                    size: l.size,
                    file_size: bytes.len(),
                });
            }
        }

        // build name → idx map (later lumps shadow earlier ones)
        let mut by_name = HashMap::with_capacity(lumps.len());
        for (i, l) in lumps.iter().enumerate().rev() {
            by_name
                .entry(Self::lump_name_str(&l.name).to_owned())
                .or_insert(i);
        }

        log::debug!("WAD directory: {} lumps", lumps.len());

        Ok(Self {
            lumps,
            bytes,
            by_name,
        })
    }
}

/// Assemble a PWAD image from `(name, payload)` pairs.  Test helper shared by
/// the level and loader tests.
#[cfg(test)]
pub(crate) fn build_wad(lumps: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let payload: usize = lumps.iter().map(|(_, b)| b.len()).sum();
    let dir_offset = HEADER_SIZE + payload;

    let mut out = Vec::with_capacity(dir_offset + lumps.len() * DIR_ENTRY_SIZE);
    out.extend_from_slice(b"PWAD");
    out.extend(&(lumps.len() as u32).to_le_bytes());
    out.extend(&(dir_offset as u32).to_le_bytes());
    for (_, data) in lumps {
        out.extend_from_slice(data);
    }

    let mut offset = HEADER_SIZE as u32;
    for (name, data) in lumps {
        out.extend(&offset.to_le_bytes());
        out.extend(&(data.len() as u32).to_le_bytes());
        let mut raw = [0u8; 8];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        out.extend_from_slice(&raw);
        offset += data.len() as u32;
    }
    out
}

// ==========================================================================
// Tests
// ==========================================================================
