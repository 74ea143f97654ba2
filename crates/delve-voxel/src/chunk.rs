use crate::coord::{ChunkCoord, GlobalVoxelCoordinate};
use crate::data::{SliceCache, VoxelData};

/// A 16x16x16 block of voxels and its slice mesh cache.
pub struct VoxelChunk {
    coord: ChunkCoord,
    data: VoxelData,
}

impl VoxelChunk {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            data: VoxelData::allocate(),
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn origin(&self) -> GlobalVoxelCoordinate {
        self.coord.origin()
    }

    #[inline]
    pub fn data(&self) -> &VoxelData {
        &self.data
    }

    #[inline]
    pub fn slice_cache(&self) -> &SliceCache {
        self.data.slice_cache()
    }

    pub fn invalidate_slice(&self, local_y: usize) {
        log::trace!("invalidate slice {:?} y={}", self.coord, local_y);
        self.data.slice_cache().invalidate(local_y);
    }
}
