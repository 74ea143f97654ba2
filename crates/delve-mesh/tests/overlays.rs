mod common;

use common::{chunk, explore_all, fill_layer, put, quads, world};
use delve_catalog::{DesignationType, Tile};
use delve_geom::MeshVertex;
use delve_mesh::{ChunkMesh, MeshBuilder, MeshError, MeshSettings, ViewSettings};
use delve_voxel::{ChunkManager, DesignationSet, GlobalVoxelCoordinate, VoxelDesignation};

fn at(x: i32, y: i32, z: i32) -> GlobalVoxelCoordinate {
    GlobalVoxelCoordinate::new(x, y, z)
}

fn build_full(
    settings: MeshSettings,
    mgr: &ChunkManager,
    designations: &DesignationSet,
    view: &ViewSettings,
) -> Result<ChunkMesh, MeshError> {
    MeshBuilder::new(settings).build_chunk_mesh(mgr, &chunk(mgr, (0, 0, 0)), designations, view)
}

fn build(mgr: &ChunkManager, designations: &DesignationSet) -> ChunkMesh {
    build_full(MeshSettings::default(), mgr, designations, &ViewSettings::default()).unwrap()
}

fn tinted(q: &[[MeshVertex; 4]], tint: [u8; 4]) -> Vec<[MeshVertex; 4]> {
    q.iter().filter(|q| q[0].tint == tint).copied().collect()
}

fn unexplore_layer(mgr: &ChunkManager, y: i32) {
    for z in 0..16 {
        for x in 0..16 {
            mgr.resolve(at(x, y, z)).unwrap().set_explored(false);
        }
    }
}

const DIG: [u8; 4] = [255, 64, 64, 120];
const PUT: [u8; 4] = [128, 200, 255, 160];
const EXPLORE: [u8; 4] = [255, 255, 0, 90];

#[test]
fn unexplored_tops_become_fog() {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, false);
    fill_layer(&mgr, 4, "Stone");
    unexplore_layer(&mgr, 4);

    let q = quads(&build(&mgr, &DesignationSet::new()).geometry);
    let tops: Vec<_> = q.iter().filter(|q| q.iter().all(|v| v.pos.y == 5.0)).collect();
    assert_eq!(tops.len(), 256);
    let fog_uv = Tile::new(12, 0).uv(delve_geom::Vec2::new(0.5, 0.5));
    for quad in tops {
        for v in quad {
            assert_eq!(v.color, [0, 0, 0, 255]);
            assert_eq!(v.tint, [0, 0, 0, 255]);
            assert_eq!(v.uv, fog_uv);
        }
    }
}

#[test]
fn fog_can_be_hidden_for_debugging() {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, false);
    fill_layer(&mgr, 4, "Stone");
    unexplore_layer(&mgr, 4);
    let settings = MeshSettings {
        debug_hide_slice_top: true,
        ..MeshSettings::default()
    };
    let mesh = build_full(settings, &mgr, &DesignationSet::new(), &ViewSettings::default()).unwrap();
    let q = quads(&mesh.geometry);
    assert!(!q.iter().any(|q| q.iter().all(|v| v.pos.y == 5.0)));
}

#[test]
fn corners_next_to_explored_voxels_are_shaded_in() {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, false);
    fill_layer(&mgr, 4, "Stone");
    unexplore_layer(&mgr, 4);
    mgr.resolve(at(8, 4, 8)).unwrap().set_explored(true);

    let q = quads(&build(&mgr, &DesignationSet::new()).geometry);
    let top_of = |x: f32| {
        q.iter()
            .find(|q| q.iter().all(|v| v.pos.y == 5.0 && (x..=x + 1.0).contains(&v.pos.x)
                && (8.0..=9.0).contains(&v.pos.z)))
            .copied()
            .unwrap()
    };
    for v in top_of(8.0) {
        assert_eq!(v.tint, [255, 255, 255, 255]);
    }
    // the east neighbor only sees the explored voxel from its west edge
    for v in top_of(9.0) {
        let expected = if v.pos.x == 9.0 { [255, 255, 255, 255] } else { [0, 0, 0, 255] };
        assert_eq!(v.tint, expected, "{:?}", v.pos);
    }
}

#[test]
fn dig_draws_an_enlarged_box_in_the_designation_color() {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, true);
    put(&mgr, (8, 8, 8), "Stone");
    build(&mgr, &DesignationSet::new());

    let mut set = DesignationSet::new();
    assert!(set.add_and_invalidate(&mgr, at(8, 8, 8), VoxelDesignation::new(DesignationType::DIG)));
    let mesh = build(&mgr, &set);
    assert_eq!(mesh.geometry.quad_count(), 12);

    let q = quads(&mesh.geometry);
    let overlay = tinted(&q, DIG);
    assert_eq!(overlay.len(), 6);
    for v in overlay.iter().flatten() {
        for c in v.pos.to_array() {
            assert!((c - 7.95).abs() < 1e-4 || (c - 9.05).abs() < 1e-4, "{c}");
        }
        assert_eq!(v.color, [255, 255, 255, 255]);
        assert_eq!(v.bounds, Tile::new(0, 1).bounds());
    }

    set.remove_and_invalidate(&mgr, at(8, 8, 8), DesignationType::DIG);
    assert_eq!(build(&mgr, &set).geometry.quad_count(), 6);
}

#[test]
fn view_mask_filters_designations() {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, true);
    put(&mgr, (8, 8, 8), "Stone");
    let mut set = DesignationSet::new();
    set.add(at(8, 8, 8), VoxelDesignation::new(DesignationType::DIG));

    let only_put = ViewSettings {
        visible_designations: DesignationType::PUT,
    };
    let mesh = build_full(MeshSettings::default(), &mgr, &set, &only_put).unwrap();
    assert_eq!(mesh.geometry.quad_count(), 6);
}

#[test]
fn build_preview_shows_the_tagged_type_in_empty_space() {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, true);
    let mut set = DesignationSet::new();
    set.add(at(8, 8, 8), VoxelDesignation::with_tag(DesignationType::PUT, "Glass"));

    let mesh = build(&mgr, &set);
    // the slice has no voxels but is still built for its overlay
    assert_eq!(mesh.stats.slices_empty, 15);
    let q = quads(&mesh.geometry);
    assert_eq!(q.len(), 6);
    for v in q.iter().flatten() {
        assert_eq!(v.tint, PUT);
        assert_eq!(v.bounds, Tile::new(1, 3).bounds());
        assert!((8.0..=9.0).contains(&v.pos.y));
    }
}

#[test]
fn build_preview_without_a_known_type() {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, true);
    put(&mgr, (8, 8, 8), "Stone");
    let mut set = DesignationSet::new();
    set.add(at(8, 8, 8), VoxelDesignation::new(DesignationType::PUT));
    set.add(at(3, 3, 3), VoxelDesignation::with_tag(DesignationType::PUT, "Unobtainium"));

    let q = quads(&build(&mgr, &set).geometry);
    let preview = tinted(&q, PUT);
    assert_eq!(preview.len(), 6);
    for v in preview.iter().flatten() {
        // falls back to the catalog's designation type, lifted off the voxel
        assert_eq!(v.bounds, Tile::new(0, 1).bounds());
        assert!(v.pos.y >= 8.1 - 1e-4 && v.pos.y <= 9.1 + 1e-4);
    }
}

#[test]
fn top_box_needs_a_visible_surface() {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, true);
    for y in 2..=4 {
        fill_layer(&mgr, y, "Stone");
    }
    let mut set = DesignationSet::new();
    set.add(at(8, 4, 8), VoxelDesignation::new(DesignationType::EXPLORE));
    set.add(at(8, 3, 8), VoxelDesignation::new(DesignationType::EXPLORE));

    let q = quads(&build(&mgr, &set).geometry);
    let overlay = tinted(&q, EXPLORE);
    assert_eq!(overlay.len(), 1);
    for v in &overlay[0] {
        assert!((v.pos.y - 5.05).abs() < 1e-4);
    }
}

#[test]
fn unknown_voxel_type_is_an_error() {
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, true);
    mgr.resolve(at(8, 8, 8)).unwrap().set_type(200);
    let err = build_full(MeshSettings::default(), &mgr, &DesignationSet::new(), &ViewSettings::default())
        .unwrap_err();
    assert_eq!(err, MeshError::UnknownVoxelType { id: 200 });
}

#[test]
fn vertex_jitter_moves_corners_off_the_grid_deterministically() {
    let settings = MeshSettings {
        vertex_noise_amplitude: 0.1,
        ..MeshSettings::default()
    };
    let make = || {
        let mgr = world(&[(0, 0, 0)]);
        explore_all(&mgr, true);
        put(&mgr, (8, 8, 8), "Stone");
        build_full(settings.clone(), &mgr, &DesignationSet::new(), &ViewSettings::default())
            .unwrap()
            .geometry
    };
    let a = make();
    assert_eq!(a, make());
    assert!(a.pos.iter().any(|c| c.fract() != 0.0));
    assert!(a.pos.iter().all(|c| (c - c.round()).abs() <= 0.1 + 1e-4));
}

#[test]
fn jittered_overlay_scales_the_jittered_voxel() {
    let settings = MeshSettings {
        vertex_noise_amplitude: 0.1,
        ..MeshSettings::default()
    };
    let mgr = world(&[(0, 0, 0)]);
    explore_all(&mgr, true);
    put(&mgr, (8, 8, 8), "Stone");
    let mut set = DesignationSet::new();
    set.add(at(8, 8, 8), VoxelDesignation::new(DesignationType::DIG));

    let mesh = build_full(settings, &mgr, &set, &ViewSettings::default()).unwrap();
    let q = quads(&mesh.geometry);
    let overlay = tinted(&q, DIG);
    let terrain: Vec<MeshVertex> = q.iter().flatten().filter(|v| v.tint != DIG).copied().collect();
    assert_eq!(overlay.len(), 6);
    assert_eq!(terrain.len(), 24);

    // every overlay corner is a terrain corner pushed 1.1x away from the centre
    let centre = delve_geom::Vec3::splat(8.5);
    for v in overlay.iter().flatten() {
        let hit = terrain.iter().any(|t| {
            let expected = centre + (t.pos - centre) * 1.1;
            (v.pos - expected).to_array().iter().all(|d| d.abs() < 1e-4)
        });
        assert!(hit, "{:?}", v.pos);
    }
}
