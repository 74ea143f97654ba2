mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::{chunk, explore_all, fill_layer, put, world};
use delve_mesh::{ChunkMesh, MeshBuilder, MeshSettings, SliceDecorator, ViewSettings};
use delve_voxel::{
    ChunkManager, DesignationSet, GlobalVoxelCoordinate, RampType, SliceLookup, VoxelChunk,
    VoxelHandle,
};

fn build_with(builder: &MeshBuilder, mgr: &ChunkManager) -> ChunkMesh {
    builder
        .build_chunk_mesh(mgr, &chunk(mgr, (0, 0, 0)), &DesignationSet::new(), &ViewSettings::default())
        .unwrap()
}

fn build(mgr: &ChunkManager) -> ChunkMesh {
    build_with(&MeshBuilder::new(MeshSettings::default()), mgr)
}

fn floor_world() -> ChunkManager {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, true);
    fill_layer(&mgr, 4, "Stone");
    mgr
}

#[test]
fn second_build_reuses_every_slice() {
    let mgr = floor_world();
    let first = build(&mgr);
    assert_eq!(first.stats.slices_rebuilt, 16);
    assert_eq!(first.stats.slices_reused, 0);

    let second = build(&mgr);
    assert_eq!(second.stats.slices_reused, 16);
    assert_eq!(second.stats.slices_rebuilt, 0);
    assert_eq!(first.geometry, second.geometry);
}

#[test]
fn edit_rebuilds_only_the_slices_around_it() {
    let mgr = floor_world();
    build(&mgr);
    put(&mgr, (8, 8, 8), "Stone");

    let c = chunk(&mgr, (0, 0, 0));
    let dirty: Vec<usize> = (0..16).filter(|&y| !c.slice_cache().is_cached(y)).collect();
    assert_eq!(dirty, vec![7, 8, 9]);

    let mesh = build(&mgr);
    assert_eq!(mesh.stats.slices_rebuilt, 3);
    assert_eq!(mesh.stats.slices_reused, 13);
}

#[test]
fn placing_then_removing_a_voxel_restores_the_mesh() {
    let mgr = floor_world();
    let before = build(&mgr).geometry;

    let at = GlobalVoxelCoordinate::new(8, 5, 8);
    put(&mgr, (8, 5, 8), "Dirt");
    let grass = mgr.catalog().grass_type_id("Grass").unwrap();
    mgr.resolve(at).unwrap().set_grass_type(grass);
    let with_dirt = build(&mgr).geometry;
    assert_ne!(before, with_dirt);

    mgr.resolve(at).unwrap().set_type(0);
    let after = build(&mgr).geometry;
    assert_eq!(before, after);
    let v = mgr.resolve(at).unwrap();
    assert_eq!(v.grass_type(), 0);
    assert!(v.ramp_type().is_empty());
}

#[test]
fn uncached_slice_build_matches_the_cached_slice() {
    let mgr = floor_world();
    put(&mgr, (3, 5, 3), "Dirt");
    put(&mgr, (4, 5, 3), "Glass");
    let builder = MeshBuilder::new(MeshSettings::default());
    build_with(&builder, &mgr);

    let c = chunk(&mgr, (0, 0, 0));
    for y in [3, 4, 5, 6] {
        let SliceLookup::Cached(cached) = c.slice_cache().lookup(y) else {
            panic!("slice {y} not cached");
        };
        let fresh = builder
            .build_slice(&mgr, &c, y, &DesignationSet::new(), &ViewSettings::default())
            .unwrap();
        assert_eq!(*cached, fresh, "slice {y}");
    }
}

/// Edits a voxel in the slice being rebuilt, the way a gameplay thread
/// would while a worker meshes.
struct EditDuringBuild {
    fired: AtomicBool,
}

impl SliceDecorator for EditDuringBuild {
    fn rebuild(&self, manager: &ChunkManager, chunk: &VoxelChunk, local_y: usize) {
        if local_y != 5 || self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        let o = chunk.origin();
        let stone = manager.catalog().voxel_type_id("Stone").unwrap();
        manager
            .resolve(GlobalVoxelCoordinate::new(o.x + 2, o.y + 5, o.z + 2))
            .unwrap()
            .set_type(stone);
    }

    fn rebuild_if_missing(&self, _: &ChunkManager, _: &VoxelChunk, _: usize) {}
}

#[test]
fn slice_invalidated_mid_build_is_returned_but_not_cached() {
    let mgr = floor_world();
    let settings = MeshSettings {
        grass_motes: true,
        ..MeshSettings::default()
    };
    let builder = MeshBuilder::new(settings).with_decorator(Arc::new(EditDuringBuild {
        fired: AtomicBool::new(false),
    }));

    let first = build_with(&builder, &mgr);
    // slice 4 was already stored and is dropped again, slice 6 is looked up
    // after the edit and stores normally
    assert_eq!(first.stats.slices_not_stored, 1);
    let c = chunk(&mgr, (0, 0, 0));
    assert!(!c.slice_cache().is_cached(4));
    assert!(!c.slice_cache().is_cached(5));
    assert!(c.slice_cache().is_cached(6));

    let second = build_with(&builder, &mgr);
    assert_eq!(second.stats.slices_not_stored, 0);
    assert_eq!(second.stats.slices_rebuilt, 2);
    assert!((0..16).all(|y| c.slice_cache().is_cached(y)));
    assert_eq!(second.geometry, build_with(&builder, &mgr).geometry);
}

#[test]
fn loading_a_neighbor_rebuilds_the_border_faces() {
    let mut mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, false);
    put(&mgr, (15, 8, 8), "Stone");
    assert_eq!(build(&mgr).geometry.quad_count(), 5);

    mgr.insert(VoxelChunk::new((1, 0, 0).into()));
    explore_all(&mgr, false);
    assert_eq!(build(&mgr).geometry.quad_count(), 6);

    mgr.remove((1, 0, 0).into());
    assert_eq!(build(&mgr).geometry.quad_count(), 5);
}

type Edit = Box<dyn Fn(&VoxelHandle<'_>)>;

fn edit(f: impl Fn(&VoxelHandle<'_>) + 'static) -> Edit {
    Box::new(f)
}

#[test]
fn every_rendered_mutation_invalidates_its_slice() {
    let mgr = floor_world();
    put(&mgr, (8, 5, 8), "Dirt");
    let c = chunk(&mgr, (0, 0, 0));
    let at = GlobalVoxelCoordinate::new(8, 5, 8);
    let grass = mgr.catalog().grass_type_id("Grass").unwrap();

    let edits: Vec<(&str, Edit)> = vec![
        ("grass", edit(move |v| v.set_grass_type(grass))),
        ("decay", edit(|v| v.set_grass_decay(3))),
        ("liquid", edit(|v| v.set_liquid_type(1))),
        ("level", edit(|v| v.set_liquid_level(40))),
        ("sunlight", edit(|v| v.set_sunlight(false))),
        ("explored", edit(|v| v.set_explored(false))),
        ("ramp", edit(|v| v.set_ramp_type(RampType::TOP_FRONT_LEFT))),
        ("dig", edit(|v| v.set_type(0))),
    ];
    for (name, apply) in edits {
        build(&mgr);
        assert!(c.slice_cache().is_cached(5), "{name}");
        apply(&mgr.resolve(at).unwrap());
        assert!(!c.slice_cache().is_cached(5), "{name} left slice 5 cached");
        assert!(build(&mgr).stats.slices_rebuilt >= 1, "{name}");
    }
}
