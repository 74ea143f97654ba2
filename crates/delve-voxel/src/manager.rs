use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use delve_catalog::Catalog;
use hashbrown::HashMap;

use crate::chunk::VoxelChunk;
use crate::constants::CHUNK_SIZE_Y;
use crate::coord::{ChunkCoord, GlobalVoxelCoordinate, LocalVoxelCoordinate};
use crate::handle::VoxelHandle;

/// Owns the loaded chunks and answers cross-chunk voxel lookups.
///
/// Loading and unloading chunks needs `&mut self`; voxel edits only need
/// `&self`, so a shared manager can be read by mesh workers while gameplay
/// edits voxels.
pub struct ChunkManager {
    chunks: HashMap<ChunkCoord, Arc<VoxelChunk>>,
    catalog: Arc<Catalog>,
    max_viewing_level: AtomicI32,
}

impl ChunkManager {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            chunks: HashMap::new(),
            catalog,
            max_viewing_level: AtomicI32::new(i32::MAX),
        }
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Adds a chunk, replacing any chunk already at its coordinate. Faces of
    /// neighbors that bordered unloaded space are rebuilt on their next mesh.
    pub fn insert(&mut self, chunk: VoxelChunk) -> Arc<VoxelChunk> {
        let coord = chunk.coord();
        let chunk = Arc::new(chunk);
        self.chunks.insert(coord, Arc::clone(&chunk));
        self.invalidate_borders_of(coord);
        chunk
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Arc<VoxelChunk>> {
        let out = self.chunks.remove(&coord);
        if out.is_some() {
            self.invalidate_borders_of(coord);
        }
        out
    }

    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Arc<VoxelChunk>> {
        self.chunks.get(&coord)
    }

    pub fn chunk_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Arc<VoxelChunk>> + '_ {
        self.chunks.values()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Handle to the voxel at `global`, or `None` when its chunk is not loaded.
    #[inline]
    pub fn resolve(&self, global: GlobalVoxelCoordinate) -> Option<VoxelHandle<'_>> {
        let chunk = self.chunks.get(&global.chunk())?;
        Some(VoxelHandle::new(self, chunk, global.local()))
    }

    /// Handle into a chunk already held by the caller.
    #[inline]
    pub fn handle_in<'a>(
        &'a self,
        chunk: &'a VoxelChunk,
        local: LocalVoxelCoordinate,
    ) -> VoxelHandle<'a> {
        VoxelHandle::new(self, chunk, local)
    }

    /// Global Y of the cutaway plane; voxels at or above it are hidden.
    #[inline]
    pub fn max_viewing_level(&self) -> i32 {
        self.max_viewing_level.load(Ordering::Relaxed)
    }

    /// Moves the cutaway plane and invalidates every slice whose mesh depends
    /// on which side of it the plane lies.
    pub fn set_max_viewing_level(&self, level: i32) {
        let old = self.max_viewing_level.swap(level, Ordering::Relaxed);
        if old == level {
            return;
        }
        let lo = old.min(level).saturating_sub(1);
        let hi = old.max(level);
        log::debug!("max viewing level {old} -> {level}");
        for chunk in self.chunks.values() {
            let oy = chunk.origin().y;
            for y in 0..CHUNK_SIZE_Y {
                let gy = oy + y as i32;
                if gy >= lo && gy <= hi {
                    chunk.invalidate_slice(y);
                }
            }
        }
    }

    /// Invalidates every slice whose geometry can depend on the voxel at
    /// `global`: the slices holding any voxel of the 3x3x3 box around it.
    pub fn invalidate_voxel(&self, global: GlobalVoxelCoordinate) {
        let mut done: [(ChunkCoord, usize); 27] = [(ChunkCoord::default(), usize::MAX); 27];
        let mut n = 0;
        for dy in -1..=1 {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    let g = global.offset_xyz(dx, dy, dz);
                    let key = (g.chunk(), g.local().y());
                    if done[..n].contains(&key) {
                        continue;
                    }
                    done[n] = key;
                    n += 1;
                    if let Some(chunk) = self.chunks.get(&key.0) {
                        chunk.invalidate_slice(key.1);
                    }
                }
            }
        }
    }

    pub fn invalidate_slice(&self, coord: ChunkCoord, local_y: usize) {
        if let Some(chunk) = self.chunks.get(&coord) {
            chunk.invalidate_slice(local_y);
        }
    }

    fn invalidate_borders_of(&self, coord: ChunkCoord) {
        for dy in -1..=1 {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    if (dx, dy, dz) == (0, 0, 0) {
                        continue;
                    }
                    let Some(n) = self.chunks.get(&coord.offset(dx, dy, dz)) else {
                        continue;
                    };
                    match dy {
                        0 => n.slice_cache().invalidate_all(),
                        // chunk below borders us with its top slice, chunk above with its bottom
                        -1 => n.invalidate_slice(CHUNK_SIZE_Y - 1),
                        _ => n.invalidate_slice(0),
                    }
                }
            }
        }
    }
}
