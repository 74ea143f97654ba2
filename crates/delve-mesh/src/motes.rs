//! Cosmetic per-slice decoration kept next to the slice meshes.

use std::sync::Mutex;

use delve_catalog::GrassTypeId;
use delve_geom::Vec3;
use delve_voxel::{ChunkCoord, ChunkManager, GlobalVoxelOffset, LocalVoxelCoordinate, VoxelChunk};
use hashbrown::HashMap;

use crate::noise::vertex_jitter;

/// Hook the builder drives for every slice it visits.
pub trait SliceDecorator: Send + Sync {
    /// The slice's geometry is being rebuilt; recompute its decoration.
    fn rebuild(&self, manager: &ChunkManager, chunk: &VoxelChunk, local_y: usize);

    /// The slice's geometry came from the cache; build the decoration only if
    /// there is none yet.
    fn rebuild_if_missing(&self, manager: &ChunkManager, chunk: &VoxelChunk, local_y: usize);
}

/// A tuft of grass standing on a voxel top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mote {
    pub pos: Vec3,
    pub grass: GrassTypeId,
}

/// Places one mote on every explored grass top with open air above it.
#[derive(Default)]
pub struct GrassMotes {
    layers: Mutex<HashMap<(ChunkCoord, u8), Vec<Mote>>>,
}

impl GrassMotes {
    pub fn new() -> Self {
        Self::default()
    }

    fn layers(&self) -> std::sync::MutexGuard<'_, HashMap<(ChunkCoord, u8), Vec<Mote>>> {
        self.layers.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn motes(&self, chunk: ChunkCoord, local_y: usize) -> Option<Vec<Mote>> {
        self.layers().get(&(chunk, local_y as u8)).cloned()
    }

    pub fn total(&self) -> usize {
        self.layers().values().map(Vec::len).sum()
    }

    /// Drops every layer of a chunk, e.g. when it unloads.
    pub fn forget_chunk(&self, chunk: ChunkCoord) {
        self.layers().retain(|(c, _), _| *c != chunk);
    }

    fn collect(manager: &ChunkManager, chunk: &VoxelChunk, local_y: usize) -> Vec<Mote> {
        let mut out = Vec::new();
        for local in LocalVoxelCoordinate::slice(local_y) {
            let v = manager.handle_in(chunk, local);
            if v.is_empty() || v.grass_type() == 0 || !v.is_explored() || !v.is_visible() {
                continue;
            }
            let open_above = v
                .neighbor(GlobalVoxelOffset::new(0, 1, 0))
                .is_none_or(|a| a.is_empty());
            if !open_above {
                continue;
            }
            let centre = v.world_position() + Vec3::new(0.5, 1.0, 0.5);
            let mut scatter = vertex_jitter(centre, 0.35);
            scatter.y = 0.0;
            out.push(Mote {
                pos: centre + scatter,
                grass: v.grass_type(),
            });
        }
        out
    }
}

impl SliceDecorator for GrassMotes {
    fn rebuild(&self, manager: &ChunkManager, chunk: &VoxelChunk, local_y: usize) {
        let motes = Self::collect(manager, chunk, local_y);
        self.layers().insert((chunk.coord(), local_y as u8), motes);
    }

    fn rebuild_if_missing(&self, manager: &ChunkManager, chunk: &VoxelChunk, local_y: usize) {
        let key = (chunk.coord(), local_y as u8);
        if self.layers().contains_key(&key) {
            return;
        }
        let motes = Self::collect(manager, chunk, local_y);
        self.layers().insert(key, motes);
    }
}
