pub mod bsp;
mod geometry;
mod player;
mod texture;

pub use geometry::{
    Aabb, Level, Linedef, LinedefFlags, LinedefId, Node, NodeId, Sector, SectorId, Seg,
    SegmentId, Sidedef, SidedefId, Subsector, SubsectorId, Thing, Vertex, VertexId,
};

pub use player::{PLAYER1_START, Player};

pub use texture::{NO_TEXTURE, SKY_TEXTURE, TextureBank, TextureError, TextureId};
