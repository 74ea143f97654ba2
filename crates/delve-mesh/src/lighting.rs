//! Per-corner sun, ambient occlusion and emissive light.

use delve_voxel::tables::vertex_neighbors;
use delve_voxel::{GlobalVoxelCoordinate, VoxelHandle, VoxelVertex};
use hashbrown::HashMap;

use crate::error::MeshError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLight {
    pub sun: u8,
    pub ambient: u8,
    pub dynamic: u8,
}

impl VertexLight {
    pub const FULL: VertexLight = VertexLight {
        sun: 255,
        ambient: 255,
        dynamic: 0,
    };

    /// Overlays ignore lighting entirely.
    pub const UNLIT: VertexLight = VertexLight {
        sun: 255,
        ambient: 255,
        dynamic: 255,
    };

    pub const BLACK: VertexLight = VertexLight {
        sun: 0,
        ambient: 0,
        dynamic: 0,
    };

    #[inline]
    pub fn color(self) -> [u8; 4] {
        [self.sun, self.ambient, self.dynamic, 255]
    }
}

impl Default for VertexLight {
    fn default() -> Self {
        VertexLight::FULL
    }
}

/// Extra sun on corners that tend to read too dark.
pub fn ambience_boost(v: VoxelVertex) -> f32 {
    match v {
        _ if v.is_top() => 0.25,
        VoxelVertex::BackBottomRight | VoxelVertex::FrontBottomRight => 0.15,
        _ => 0.0,
    }
}

/// Lights corner `v` of `voxel` from the voxels around it. Unloaded
/// neighbors are left out of the average; with none loaded the corner is
/// fully lit.
pub fn vertex_light(voxel: &VoxelHandle<'_>, v: VoxelVertex) -> VertexLight {
    let mut checked = 0u32;
    let mut occluded = 0u32;
    let mut sun_sum = 0u32;
    let mut dynamic = 0u8;

    for offset in vertex_neighbors(v) {
        let Some(n) = voxel.neighbor(offset) else {
            continue;
        };
        checked += 1;
        if n.sunlight() {
            sun_sum += 255;
        }
        if !n.is_empty() || !n.is_explored() {
            occluded += 1;
            if n.voxel_type().is_some_and(|t| t.emits_light) {
                dynamic = 255;
            }
        }
    }

    if checked == 0 {
        return VertexLight::FULL;
    }

    let hit = occluded as f32 / checked as f32;
    let ambient = ((1.0 - hit) * 255.0).min(255.0) as u8;
    let sun = (sun_sum as f32 / checked as f32 + ambience_boost(v) * 255.0).min(255.0) as u8;
    VertexLight {
        sun,
        ambient,
        dynamic,
    }
}

/// The world lattice point a voxel corner sits on. Corners of different
/// voxels that touch share it.
pub fn lattice_point(at: GlobalVoxelCoordinate, v: VoxelVertex) -> GlobalVoxelCoordinate {
    let (x, y, z) = v.corner();
    at.offset_xyz(x, y, z)
}

/// Corner results shared by every voxel of one build.
#[derive(Default)]
pub struct LightMemo {
    light: HashMap<(GlobalVoxelCoordinate, bool), VertexLight>,
    explored: HashMap<GlobalVoxelCoordinate, bool>,
}

impl LightMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn light(&mut self, voxel: &VoxelHandle<'_>, v: VoxelVertex) -> VertexLight {
        let key = (lattice_point(voxel.coordinate(), v), v.is_top());
        *self
            .light
            .entry(key)
            .or_insert_with(|| vertex_light(voxel, v))
    }

    /// Whether any voxel sharing the vertical edge under top corner `v` is
    /// explored, computed once per lattice point.
    pub fn fill_explored(&mut self, voxel: &VoxelHandle<'_>, v: VoxelVertex) -> bool {
        let key = lattice_point(voxel.coordinate(), v);
        *self.explored.entry(key).or_insert_with(|| {
            delve_voxel::tables::vertex_neighbors_2d(v)
                .into_iter()
                .filter_map(|o| voxel.neighbor(o))
                .any(|n| n.is_explored())
        })
    }

    /// Reads back an entry [`Self::fill_explored`] must already have written.
    pub fn explored(&self, voxel: &VoxelHandle<'_>, v: VoxelVertex) -> Result<bool, MeshError> {
        let key = lattice_point(voxel.coordinate(), v);
        self.explored
            .get(&key)
            .copied()
            .ok_or(MeshError::CacheConsistency { key })
    }
}
