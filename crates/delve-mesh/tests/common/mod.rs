#![allow(dead_code)]

use std::sync::Arc;

use delve_catalog::Catalog;
use delve_geom::{MeshBuild, MeshVertex};
use delve_voxel::{ChunkCoord, ChunkManager, GlobalVoxelCoordinate, VoxelChunk};

pub fn load_catalog() -> Catalog {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    Catalog::load_from_path(root.join("../../assets/catalog.toml")).unwrap()
}

pub fn world(coords: &[(i32, i32, i32)]) -> ChunkManager {
    let mut mgr = ChunkManager::new(Arc::new(load_catalog()));
    for &c in coords {
        mgr.insert(VoxelChunk::new(ChunkCoord::from(c)));
    }
    mgr
}

pub fn type_id(mgr: &ChunkManager, name: &str) -> u8 {
    mgr.catalog().voxel_type_id(name).unwrap()
}

/// Marks every voxel of every loaded chunk explored (and sunlit if asked).
pub fn explore_all(mgr: &ChunkManager, sunlit: bool) {
    for chunk in mgr.chunks() {
        let o = chunk.origin();
        for y in 0..16 {
            for z in 0..16 {
                for x in 0..16 {
                    let h = mgr
                        .resolve(GlobalVoxelCoordinate::new(o.x + x, o.y + y, o.z + z))
                        .unwrap();
                    h.set_explored(true);
                    h.set_sunlight(sunlit);
                }
            }
        }
    }
}

pub fn put(mgr: &ChunkManager, at: (i32, i32, i32), name: &str) {
    let id = type_id(mgr, name);
    mgr.resolve(GlobalVoxelCoordinate::new(at.0, at.1, at.2))
        .unwrap()
        .set_type(id);
}

/// Fills global layer `y` over every loaded chunk at that height.
pub fn fill_layer(mgr: &ChunkManager, y: i32, name: &str) {
    let id = type_id(mgr, name);
    for chunk in mgr.chunks() {
        let o = chunk.origin();
        if y < o.y || y >= o.y + 16 {
            continue;
        }
        for z in 0..16 {
            for x in 0..16 {
                mgr.resolve(GlobalVoxelCoordinate::new(o.x + x, y, o.z + z))
                    .unwrap()
                    .set_type(id);
            }
        }
    }
}

pub fn chunk(mgr: &ChunkManager, c: (i32, i32, i32)) -> Arc<VoxelChunk> {
    Arc::clone(mgr.get(ChunkCoord::from(c)).unwrap())
}

/// Quads in emission order; every quad owns four consecutive vertices.
pub fn quads(mesh: &MeshBuild) -> Vec<[MeshVertex; 4]> {
    (0..mesh.vertex_count() / 4)
        .map(|q| std::array::from_fn(|i| mesh.vertex(q * 4 + i).unwrap()))
        .collect()
}
