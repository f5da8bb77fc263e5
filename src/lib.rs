//! Front-to-back BSP column renderer for Doom maps.
//!
//! * [`wad`] turns an IWAD/PWAD map into resolved [`world::Level`] tables.
//! * [`engine`] walks the BSP near → far, clips segs to the field of view and
//!   tracks per-column occlusion, emitting [`renderer::DrawSpan`]s.
//! * [`renderer`] composites the spans onto a framebuffer.

pub mod config;
pub mod engine;
pub mod renderer;
pub mod wad;
pub mod world;

#[cfg(test)]
pub(crate) mod fixtures;
