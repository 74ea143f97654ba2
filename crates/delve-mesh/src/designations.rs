//! Overlays for player designations.

use delve_catalog::{DesignationType, DrawBoxType, VoxelType};
use delve_geom::{Aabb, MeshBuild, Vec3};
use delve_voxel::{BoxFace, DesignationSet, VoxelHandle};

use crate::box_tables::BoxTables;
use crate::faces::{FaceStyle, emit_box_face};
use crate::settings::ViewSettings;
use crate::transitions::FaceTileSet;

/// Overlay boxes are drawn this much larger than a voxel so they do not
/// z-fight with its faces.
const OVERLAY_SCALE: f32 = 1.1;
const PREVIEW_LIFT: f32 = 0.1;

/// A solid, visible voxel with at least one neighbor a viewer can see into.
pub fn has_visible_surface(v: &VoxelHandle<'_>) -> bool {
    if v.is_empty() || !v.is_visible() {
        return false;
    }
    BoxFace::ALL.iter().any(|f| {
        v.neighbor(f.delta())
            .is_some_and(|n| (n.is_explored() && n.is_empty()) || !n.is_visible())
    })
}

#[allow(clippy::too_many_arguments)]
fn emit_box(
    out: &mut MeshBuild,
    tables: &BoxTables,
    v: &VoxelHandle<'_>,
    ty: &VoxelType,
    faces: &[BoxFace],
    tint: [u8; 4],
    frame: Aabb,
    jitter: f32,
) {
    let tiles = FaceTileSet::plain(ty);
    for &face in faces {
        let style = FaceStyle {
            tile: tiles.get(face),
            tint,
            frame,
        };
        emit_box_face(out, tables, v, face, &style, None, jitter);
    }
}

/// Emits every designation on `v` that the view asks for.
pub fn emit_designations(
    out: &mut MeshBuild,
    tables: &BoxTables,
    v: &VoxelHandle<'_>,
    designations: &DesignationSet,
    view: &ViewSettings,
    jitter: f32,
) {
    let catalog = v.manager().catalog();
    let at = v.coordinate();
    for d in designations.enumerate(at) {
        if !view.shows(d.kind) {
            continue;
        }
        let visible = if d.kind == DesignationType::PUT {
            v.is_visible()
        } else {
            has_visible_surface(v)
        };
        if !visible {
            continue;
        }
        let props = catalog.designation_properties(d.kind);
        let scaled = Aabb::unit_at(Vec3::ZERO).scaled_about_center(OVERLAY_SCALE);
        match props.draw {
            DrawBoxType::FullBox | DrawBoxType::TopBox => {
                let Some(ty) = catalog.designation_voxel_type() else {
                    continue;
                };
                let faces: &[BoxFace] = if props.draw == DrawBoxType::FullBox {
                    &BoxFace::ALL
                } else {
                    &[BoxFace::Top]
                };
                emit_box(out, tables, v, ty, faces, props.color, scaled, jitter);
            }
            DrawBoxType::PreviewVoxel => {
                let ty = match &d.tag {
                    Some(name) => catalog.voxel_type_by_name(name),
                    None => catalog.designation_voxel_type(),
                };
                let Some(ty) = ty else {
                    log::trace!("no preview type for {:?} at {:?}", d, at);
                    continue;
                };
                let lift = if v.is_empty() { 0.0 } else { PREVIEW_LIFT };
                let frame = Aabb::unit_at(Vec3::new(0.0, lift, 0.0));
                emit_box(out, tables, v, ty, &BoxFace::ALL, props.color, frame, jitter);
            }
        }
    }
}
