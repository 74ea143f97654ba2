//! Chunked voxel storage: packed per-voxel bytes, handles, and the slice mesh cache.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod constants;
pub mod coord;
pub mod data;
pub mod designation;
pub mod handle;
pub mod manager;
pub mod tables;

pub use chunk::VoxelChunk;
pub use coord::{ChunkCoord, GlobalVoxelCoordinate, GlobalVoxelOffset, LocalVoxelCoordinate};
pub use data::{SliceCache, SliceLookup, VoxelData};
pub use designation::{DesignationSet, VoxelDesignation};
pub use handle::VoxelHandle;
pub use manager::ChunkManager;
pub use tables::{BoxFace, Cardinal, Diagonal, RampType, VoxelVertex};
