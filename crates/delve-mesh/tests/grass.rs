mod common;

use std::sync::Arc;

use common::{chunk, explore_all, fill_layer, put, quads, world};
use delve_catalog::Tile;
use delve_geom::MeshVertex;
use delve_mesh::{GrassMotes, MeshBuilder, MeshSettings, ViewSettings};
use delve_voxel::{ChunkCoord, ChunkManager, DesignationSet, GlobalVoxelCoordinate};

fn grass_on(mgr: &ChunkManager, at: (i32, i32, i32), grass: &str) {
    put(mgr, at, "Stone");
    let id = mgr.catalog().grass_type_id(grass).unwrap();
    mgr.resolve(GlobalVoxelCoordinate::new(at.0, at.1, at.2))
        .unwrap()
        .set_grass_type(id);
}

fn floor_world() -> ChunkManager {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, true);
    fill_layer(&mgr, 4, "Stone");
    mgr
}

fn mesh_quads(mgr: &ChunkManager) -> Vec<[MeshVertex; 4]> {
    let mesh = MeshBuilder::new(MeshSettings::default())
        .build_chunk_mesh(mgr, &chunk(mgr, (0, 0, 0)), &DesignationSet::new(), &ViewSettings::default())
        .unwrap();
    quads(&mesh.geometry)
}

fn with_tile(q: &[[MeshVertex; 4]], tile: Tile) -> usize {
    q.iter().filter(|q| q[0].bounds == tile.bounds()).count()
}

#[test]
fn grass_decal_and_fringes_toward_open_sides() {
    let mgr = floor_world();
    grass_on(&mgr, (8, 5, 8), "Grass");
    let q = mesh_quads(&mgr);

    assert_eq!(with_tile(&q, Tile::new(0, 2)), 1);
    for col in 1..=8 {
        assert_eq!(with_tile(&q, Tile::new(col, 2)), 1, "fringe tile {col}");
    }
}

#[test]
fn higher_precedence_neighbor_suppresses_the_fringe_toward_it() {
    let mgr = floor_world();
    grass_on(&mgr, (8, 5, 8), "Grass");
    grass_on(&mgr, (9, 5, 8), "Snow");
    let q = mesh_quads(&mgr);

    // grass yields its east edge to snow
    assert_eq!(with_tile(&q, Tile::new(2, 2)), 0);
    assert_eq!(with_tile(&q, Tile::new(1, 2)), 1);
    assert_eq!(with_tile(&q, Tile::new(3, 2)), 1);
    assert_eq!(with_tile(&q, Tile::new(4, 2)), 1);
    // snow spills west over the grass
    assert_eq!(with_tile(&q, Tile::new(4, 6)), 1);
}

#[test]
fn cardinal_fringe_hangs_off_the_edge_toward_open_air() {
    let mgr = floor_world();
    grass_on(&mgr, (8, 5, 8), "Grass");
    let q = mesh_quads(&mgr);
    let east = q.iter().find(|q| q[0].bounds == Tile::new(2, 2).bounds()).unwrap();
    let xs: Vec<f32> = east.iter().map(|v| v.pos.x).collect();
    let ys: Vec<f32> = east.iter().map(|v| v.pos.y).collect();
    assert_eq!(xs, vec![9.0, 9.5, 9.5, 9.0]);
    assert_eq!(ys, vec![6.0, 5.5, 5.5, 6.0]);
}

#[test]
fn fringe_climbs_a_raised_neighbor() {
    let mgr = floor_world();
    grass_on(&mgr, (8, 5, 8), "Grass");
    put(&mgr, (9, 5, 8), "Stone");
    put(&mgr, (9, 6, 8), "Stone");
    let q = mesh_quads(&mgr);
    let east = q.iter().find(|q| q[0].bounds == Tile::new(2, 2).bounds()).unwrap();
    for v in &east[1..3] {
        assert!((v.pos.y - 6.5).abs() < 1e-5);
        assert!((v.pos.x - 8.95).abs() < 1e-5);
    }
}

#[test]
fn grass_without_fringe_tiles_draws_only_the_decal() {
    let mgr = floor_world();
    grass_on(&mgr, (8, 5, 8), "Moss");
    let q = mesh_quads(&mgr);
    assert_eq!(with_tile(&q, Tile::new(0, 7)), 1);
    // stone faces plus one decal
    assert_eq!(q.len(), with_tile(&q, Tile::new(1, 0)) + 1);
}

#[test]
fn unknown_grass_is_skipped() {
    let mgr = floor_world();
    put(&mgr, (8, 5, 8), "Stone");
    mgr.resolve(GlobalVoxelCoordinate::new(8, 5, 8))
        .unwrap()
        .set_grass_type(9);
    let q = mesh_quads(&mgr);
    assert_eq!(q.len(), with_tile(&q, Tile::new(1, 0)));
}

#[test]
fn motes_follow_slice_rebuilds() {
    let mgr = floor_world();
    grass_on(&mgr, (8, 5, 8), "Grass");
    grass_on(&mgr, (3, 5, 3), "Snow");
    // covered grass gets no mote
    grass_on(&mgr, (5, 5, 5), "Grass");
    put(&mgr, (5, 6, 5), "Stone");

    let motes = Arc::new(GrassMotes::new());
    let settings = MeshSettings {
        grass_motes: true,
        ..MeshSettings::default()
    };
    let builder = MeshBuilder::new(settings).with_decorator(motes.clone());
    let c = chunk(&mgr, (0, 0, 0));
    let build = || {
        builder
            .build_chunk_mesh(&mgr, &c, &DesignationSet::new(), &ViewSettings::default())
            .unwrap()
    };

    build();
    let layer = motes.motes(ChunkCoord::new(0, 0, 0), 5).unwrap();
    assert_eq!(layer.len(), 2);
    for m in &layer {
        assert_eq!(m.pos.y, 6.0);
    }
    let grass = layer.iter().find(|m| m.grass == 1).unwrap();
    assert!((8.15..=8.85).contains(&grass.pos.x));
    assert!((8.15..=8.85).contains(&grass.pos.z));

    // cached slices rebuild only missing layers
    motes.forget_chunk(ChunkCoord::new(0, 0, 0));
    assert_eq!(motes.total(), 0);
    let mesh = build();
    assert_eq!(mesh.stats.slices_rebuilt, 0);
    assert_eq!(motes.total(), 2);

    mgr.resolve(GlobalVoxelCoordinate::new(3, 5, 3))
        .unwrap()
        .set_grass_type(0);
    build();
    assert_eq!(motes.total(), 1);
}

#[test]
fn motes_stay_off_unless_enabled() {
    let mgr = floor_world();
    grass_on(&mgr, (8, 5, 8), "Grass");
    let motes = Arc::new(GrassMotes::new());
    MeshBuilder::new(MeshSettings::default())
        .with_decorator(motes.clone())
        .build_chunk_mesh(&mgr, &chunk(&mgr, (0, 0, 0)), &DesignationSet::new(), &ViewSettings::default())
        .unwrap();
    assert_eq!(motes.total(), 0);
}
