use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use delve_catalog::Catalog;
use delve_mesh::{MeshBuilder, MeshSettings, ViewSettings};
use delve_voxel::{ChunkCoord, ChunkManager, DesignationSet, GlobalVoxelCoordinate, VoxelChunk};

fn load_catalog() -> Catalog {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    Catalog::load_from_path(root.join("../../assets/catalog.toml")).unwrap()
}

/// A 3x1x3 block of chunks holding rolling dirt hills over stone, with grass
/// on the surface and everything explored.
fn hills() -> ChunkManager {
    let catalog = Arc::new(load_catalog());
    let dirt = catalog.voxel_type_id("Dirt").unwrap();
    let stone = catalog.voxel_type_id("Stone").unwrap();
    let grass = catalog.grass_type_id("Grass").unwrap();
    let mut mgr = ChunkManager::new(catalog);
    for cz in -1..=1 {
        for cx in -1..=1 {
            mgr.insert(VoxelChunk::new(ChunkCoord::new(cx, 0, cz)));
        }
    }
    for z in -16..32 {
        for x in -16..32 {
            let h = 8.0 + 3.0 * ((x as f32) * 0.3).sin() + 2.0 * ((z as f32) * 0.2).cos();
            let h = h as i32;
            for y in 0..16 {
                let v = mgr.resolve(GlobalVoxelCoordinate::new(x, y, z)).unwrap();
                v.set_explored(true);
                if y < h - 2 {
                    v.set_type(stone);
                } else if y < h {
                    v.set_type(dirt);
                } else {
                    v.set_sunlight(true);
                }
                if y == h - 1 {
                    v.set_grass_type(grass);
                }
            }
        }
    }
    mgr
}

fn bench_build_chunk_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_chunk_mesh");
    let mgr = hills();
    let chunk = Arc::clone(mgr.get(ChunkCoord::new(0, 0, 0)).unwrap());
    let builder = MeshBuilder::new(MeshSettings::default());
    let designations = DesignationSet::new();
    let view = ViewSettings::default();

    group.bench_function("hills_cold", |b| {
        b.iter(|| {
            chunk.slice_cache().invalidate_all();
            let out = builder.build_chunk_mesh(&mgr, &chunk, &designations, &view);
            black_box(out.unwrap());
        })
    });
    group.bench_function("hills_cached", |b| {
        b.iter(|| {
            let out = builder.build_chunk_mesh(&mgr, &chunk, &designations, &view);
            black_box(out.unwrap());
        })
    });
    group.bench_function("hills_one_edit", |b| {
        let at = GlobalVoxelCoordinate::new(8, 2, 8);
        b.iter(|| {
            chunk.invalidate_slice(2);
            mgr.invalidate_voxel(at);
            let out = builder.build_chunk_mesh(&mgr, &chunk, &designations, &view);
            black_box(out.unwrap());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build_chunk_mesh);
criterion_main!(benches);
