//! Demo world: noise-driven hills with caves, a column sunlight cast and an
//! explored shell around everything the sky reaches.

use std::error::Error;
use std::sync::Arc;

use delve_catalog::{Catalog, DesignationType, VoxelTypeId};
use delve_voxel::constants::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};
use delve_voxel::{
    ChunkCoord, ChunkManager, DesignationSet, GlobalVoxelCoordinate, VoxelChunk, VoxelDesignation,
};
use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Vertical extent of the demo world in chunks.
pub const CHUNKS_Y: i32 = 2;

const SEA_LEVEL: i32 = 11;

struct Palette {
    stone: VoxelTypeId,
    dirt: VoxelTypeId,
    sand: VoxelTypeId,
    magma: VoxelTypeId,
    grass: u8,
    snow: u8,
}

impl Palette {
    fn from_catalog(catalog: &Catalog) -> Result<Self, Box<dyn Error>> {
        let voxel = |name: &str| {
            catalog
                .voxel_type_id(name)
                .ok_or_else(|| format!("demo world needs voxel type '{name}'"))
        };
        let grass = |name: &str| {
            catalog
                .grass_type_id(name)
                .ok_or_else(|| format!("demo world needs grass type '{name}'"))
        };
        Ok(Self {
            stone: voxel("Stone")?,
            dirt: voxel("Dirt")?,
            sand: voxel("Sand")?,
            magma: voxel("Magma")?,
            grass: grass("Grass")?,
            snow: grass("Snow")?,
        })
    }
}

struct Noise {
    terrain: FastNoiseLite,
    tunnel: FastNoiseLite,
}

impl Noise {
    fn new(seed: i32) -> Self {
        let mut terrain = FastNoiseLite::with_seed(seed);
        terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
        terrain.set_frequency(Some(0.035));
        let mut tunnel = FastNoiseLite::with_seed(seed ^ 41_337);
        tunnel.set_noise_type(Some(NoiseType::OpenSimplex2));
        tunnel.set_frequency(Some(0.08));
        Self { terrain, tunnel }
    }

    fn height(&self, x: i32, z: i32) -> i32 {
        let h = self.terrain.get_noise_2d(x as f32, z as f32);
        SEA_LEVEL + (h * 7.0).round() as i32
    }

    fn cave(&self, x: i32, y: i32, z: i32) -> f32 {
        self.tunnel.get_noise_3d(x as f32, y as f32 * 1.5, z as f32)
    }
}

/// Builds a `chunks` x [`CHUNKS_Y`] x `chunks` world.
pub fn generate(
    catalog: Arc<Catalog>,
    chunks: i32,
    seed: i32,
) -> Result<ChunkManager, Box<dyn Error>> {
    let palette = Palette::from_catalog(&catalog)?;
    let noise = Noise::new(seed);
    let mut mgr = ChunkManager::new(catalog);
    for cy in 0..CHUNKS_Y {
        for cz in 0..chunks {
            for cx in 0..chunks {
                mgr.insert(VoxelChunk::new(ChunkCoord::new(cx, cy, cz)));
            }
        }
    }

    let (sx, sz) = (CHUNK_SIZE_X as i32 * chunks, CHUNK_SIZE_Z as i32 * chunks);
    let top = CHUNK_SIZE_Y as i32 * CHUNKS_Y;
    for z in 0..sz {
        for x in 0..sx {
            let h = noise.height(x, z).clamp(1, top - 1);
            for y in 0..h {
                let ty = if y < h - 3 {
                    if y < 3 && noise.cave(x, y, z) > 0.55 {
                        palette.magma
                    } else {
                        palette.stone
                    }
                } else if h <= SEA_LEVEL - 3 {
                    palette.sand
                } else {
                    palette.dirt
                };
                if y > 2 && y < h - 1 && noise.cave(x, y, z) > 0.45 {
                    continue;
                }
                set_type(&mgr, x, y, z, ty);
            }
            if let Some(v) = mgr.resolve(GlobalVoxelCoordinate::new(x, h - 1, z)) {
                if v.type_id() == palette.dirt {
                    v.set_grass_type(if h >= SEA_LEVEL + 5 { palette.snow } else { palette.grass });
                }
            }
        }
    }

    cast_sunlight(&mgr, sx, sz, top);
    explore_from_sky(&mgr, sx, sz, top);
    log::info!("demo world: {} chunks, {}x{}x{} voxels, seed {}", mgr.len(), sx, top, sz, seed);
    Ok(mgr)
}

fn set_type(mgr: &ChunkManager, x: i32, y: i32, z: i32, ty: VoxelTypeId) {
    if let Some(v) = mgr.resolve(GlobalVoxelCoordinate::new(x, y, z)) {
        v.set_type(ty);
    }
}

/// Marks open voxels sunlit from the top of each column down to the first
/// solid voxel.
fn cast_sunlight(mgr: &ChunkManager, sx: i32, sz: i32, top: i32) {
    for z in 0..sz {
        for x in 0..sx {
            for y in (0..top).rev() {
                let Some(v) = mgr.resolve(GlobalVoxelCoordinate::new(x, y, z)) else {
                    continue;
                };
                if !v.is_empty() {
                    break;
                }
                v.set_sunlight(true);
            }
        }
    }
}

/// Explores every sunlit voxel and every voxel touching one.
fn explore_from_sky(mgr: &ChunkManager, sx: i32, sz: i32, top: i32) {
    const AROUND: [(i32, i32, i32); 7] = [
        (0, 0, 0),
        (1, 0, 0),
        (-1, 0, 0),
        (0, 1, 0),
        (0, -1, 0),
        (0, 0, 1),
        (0, 0, -1),
    ];
    for z in 0..sz {
        for x in 0..sx {
            for y in 0..top {
                let g = GlobalVoxelCoordinate::new(x, y, z);
                if !mgr.resolve(g).is_some_and(|v| v.sunlight()) {
                    continue;
                }
                for (dx, dy, dz) in AROUND {
                    if let Some(n) = mgr.resolve(g.offset_xyz(dx, dy, dz)) {
                        n.set_explored(true);
                    }
                }
            }
        }
    }
}

/// The topmost solid voxel of column (x, z), if any.
pub fn surface(mgr: &ChunkManager, x: i32, z: i32) -> Option<GlobalVoxelCoordinate> {
    let top = CHUNK_SIZE_Y as i32 * CHUNKS_Y;
    (0..top)
        .rev()
        .map(|y| GlobalVoxelCoordinate::new(x, y, z))
        .find(|&g| mgr.resolve(g).is_some_and(|v| !v.is_empty()))
}

/// A small dig site and a build preview next to it, at the world's centre.
/// Returns the designations and the voxels marked for digging.
pub fn designate(mgr: &ChunkManager, chunks: i32) -> (DesignationSet, Vec<GlobalVoxelCoordinate>) {
    let mut set = DesignationSet::new();
    let mid = CHUNK_SIZE_X as i32 * chunks / 2;
    let dig: Vec<GlobalVoxelCoordinate> = [(0, 0), (1, 0), (0, 1), (1, 1)]
        .into_iter()
        .filter_map(|(dx, dz)| surface(mgr, mid + dx, mid + dz))
        .collect();
    for &g in &dig {
        set.add(g, VoxelDesignation::new(DesignationType::DIG));
    }
    if let Some(g) = surface(mgr, mid + 3, mid) {
        set.add(
            g.offset_xyz(0, 1, 0),
            VoxelDesignation::with_tag(DesignationType::PUT, "Brick"),
        );
    }
    (set, dig)
}
