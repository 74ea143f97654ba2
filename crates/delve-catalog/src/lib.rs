//! Voxel, grass and designation type catalog.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod catalog;
pub mod config;
pub mod designation;
pub mod types;

pub use atlas::Tile;
pub use catalog::Catalog;
pub use designation::{DesignationProperties, DesignationType, DrawBoxType};
pub use types::{FaceRole, GrassType, GrassTypeId, TransitionKind, VoxelType, VoxelTypeId};
