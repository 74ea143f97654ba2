use delve_voxel::GlobalVoxelCoordinate;
use thiserror::Error;

/// Failures that abort a chunk mesh build. No geometry is produced for the
/// slice being built when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A memo entry that the build itself just filled was missing.
    #[error("mesh memo lookup failed at lattice point {key:?}")]
    CacheConsistency { key: GlobalVoxelCoordinate },

    /// Voxel data references a material the catalog does not define.
    #[error("voxel type {id} is not in the catalog")]
    UnknownVoxelType { id: u8 },
}
