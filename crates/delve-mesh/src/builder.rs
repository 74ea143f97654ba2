use std::sync::Arc;
use std::time::Instant;

use delve_catalog::{Tile, VoxelType};
use delve_geom::{MeshBuild, UvBounds, Vec2, Vec3};
use delve_voxel::constants::CHUNK_SIZE_Y;
use delve_voxel::{
    BoxFace, ChunkCoord, ChunkManager, DesignationSet, LocalVoxelCoordinate, SliceLookup,
    VoxelChunk, VoxelHandle,
};

use crate::box_tables::{BoxTables, corner_position};
use crate::designations::emit_designations;
use crate::emit::{Quad, emit_quad, flip_for, mul_tint};
use crate::error::MeshError;
use crate::faces::{FaceStyle, emit_box_face, is_face_visible, ramp_offset};
use crate::fringe::{TopSurface, emit_grass};
use crate::lighting::{LightMemo, VertexLight};
use crate::motes::SliceDecorator;
use crate::ramps::update_slice_ramps;
use crate::settings::{MeshSettings, ViewSettings};
use crate::transitions::face_tiles;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Counters for one chunk build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub slices_reused: u32,
    pub slices_rebuilt: u32,
    /// Rebuilt slices with no voxels and no designations.
    pub slices_empty: u32,
    /// Slices invalidated while they were being built; returned but not cached.
    pub slices_not_stored: u32,
    pub ramps_changed: u32,
    pub vertices: u32,
    pub indices: u32,
    pub total_ms: u32,
}

/// Geometry for every visible slice of one chunk, bottom slice first.
#[derive(Clone, Debug)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub geometry: MeshBuild,
    pub stats: MeshStats,
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Builds chunk surface meshes slice by slice, reusing cached slices.
pub struct MeshBuilder {
    settings: MeshSettings,
    tables: BoxTables,
    decorator: Option<Arc<dyn SliceDecorator>>,
}

impl MeshBuilder {
    pub fn new(settings: MeshSettings) -> Self {
        Self {
            settings,
            tables: BoxTables::new(),
            decorator: None,
        }
    }

    /// Decoration driven alongside geometry when `grass_motes` is on.
    pub fn with_decorator(mut self, decorator: Arc<dyn SliceDecorator>) -> Self {
        self.decorator = Some(decorator);
        self
    }

    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    /// Number of slices of `chunk` below the cutaway plane.
    pub fn visible_slices(manager: &ChunkManager, chunk: &VoxelChunk) -> usize {
        let limit = i64::from(manager.max_viewing_level()) - i64::from(chunk.origin().y);
        limit.clamp(0, CHUNK_SIZE_Y as i64) as usize
    }

    /// Builds (or reassembles from cache) the mesh of `chunk`.
    ///
    /// Each slice is looked up in the chunk's slice cache; a miss recomputes
    /// ramps, rebuilds the slice and stores it unless it was invalidated in
    /// the meantime. Slices at or above the cutaway plane are left out.
    ///
    /// Cached slices do not remember which `view` they were built under;
    /// callers changing it must invalidate the chunk's cache.
    pub fn build_chunk_mesh(
        &self,
        manager: &ChunkManager,
        chunk: &VoxelChunk,
        designations: &DesignationSet,
        view: &ViewSettings,
    ) -> Result<ChunkMesh, MeshError> {
        let start = Instant::now();
        let mut stats = MeshStats::default();
        let mut memo = LightMemo::new();
        let cache = chunk.slice_cache();
        let decorator = if self.settings.grass_motes {
            self.decorator.as_deref()
        } else {
            None
        };

        let mut slices: Vec<Arc<MeshBuild>> = Vec::with_capacity(CHUNK_SIZE_Y);
        for y in 0..Self::visible_slices(manager, chunk) {
            let generation = match cache.lookup(y) {
                SliceLookup::Cached(geometry) => {
                    stats.slices_reused += 1;
                    if let Some(d) = decorator {
                        d.rebuild_if_missing(manager, chunk, y);
                    }
                    slices.push(geometry);
                    continue;
                }
                SliceLookup::Missing { generation } => generation,
            };

            if self.settings.calculate_ramps {
                stats.ramps_changed += update_slice_ramps(manager, chunk, y) as u32;
            }
            if let Some(d) = decorator {
                d.rebuild(manager, chunk, y);
            }

            stats.slices_rebuilt += 1;
            let geometry = if chunk.data().voxels_present(y) == 0
                && !designations.any_in_slice(chunk.coord(), y)
            {
                stats.slices_empty += 1;
                MeshBuild::default()
            } else {
                self.slice_geometry(&mut memo, manager, chunk, y, designations, view)?
            };

            let geometry = Arc::new(geometry);
            if !cache.store(y, generation, Arc::clone(&geometry)) {
                stats.slices_not_stored += 1;
                log::debug!("slice {:?} y={} changed during build; not cached", chunk.coord(), y);
            }
            slices.push(geometry);
        }

        let geometry = MeshBuild::concat(slices.iter().map(Arc::as_ref));
        stats.vertices = geometry.vertex_count() as u32;
        stats.indices = geometry.index_count() as u32;
        stats.total_ms = elapsed_ms(start);
        log_mesh_perf(chunk.coord(), &stats);

        Ok(ChunkMesh {
            coord: chunk.coord(),
            geometry,
            stats,
        })
    }

    /// Builds one slice from scratch without touching the cache or ramps.
    pub fn build_slice(
        &self,
        manager: &ChunkManager,
        chunk: &VoxelChunk,
        local_y: usize,
        designations: &DesignationSet,
        view: &ViewSettings,
    ) -> Result<MeshBuild, MeshError> {
        let mut memo = LightMemo::new();
        self.slice_geometry(&mut memo, manager, chunk, local_y, designations, view)
    }

    fn slice_geometry(
        &self,
        memo: &mut LightMemo,
        manager: &ChunkManager,
        chunk: &VoxelChunk,
        local_y: usize,
        designations: &DesignationSet,
        view: &ViewSettings,
    ) -> Result<MeshBuild, MeshError> {
        let mut out = MeshBuild::default();
        out.reserve_quads(chunk.data().voxels_present(local_y) as usize * 2);
        for local in LocalVoxelCoordinate::slice(local_y) {
            let v = manager.handle_in(chunk, local);
            self.voxel_geometry(&mut out, memo, &v, designations, view)?;
        }
        Ok(out)
    }

    fn voxel_geometry(
        &self,
        out: &mut MeshBuild,
        memo: &mut LightMemo,
        v: &VoxelHandle<'_>,
        designations: &DesignationSet,
        view: &ViewSettings,
    ) -> Result<(), MeshError> {
        if !v.is_visible() {
            return Ok(());
        }
        let jitter = self.settings.vertex_noise_amplitude;
        emit_designations(out, &self.tables, v, designations, view, jitter);

        // unexplored sunlit voxels are open sky
        if v.is_empty() || (!v.is_explored() && v.sunlight()) {
            return Ok(());
        }
        let ty = v
            .voxel_type()
            .ok_or(MeshError::UnknownVoxelType { id: v.type_id() })?;
        let tiles = face_tiles(v, ty);

        self.top_face(out, memo, v, ty, tiles.get(BoxFace::Top))?;
        for face in [
            BoxFace::Bottom,
            BoxFace::Left,
            BoxFace::Right,
            BoxFace::Front,
            BoxFace::Back,
        ] {
            let style = FaceStyle::terrain(tiles.get(face), ty.tint);
            emit_box_face(out, &self.tables, v, face, &style, Some(&mut *memo), jitter);
        }
        Ok(())
    }

    /// The top face gets its own path: unexplored corners are shaded black,
    /// fully unexplored tops become fog, and grass draws on top of it.
    fn top_face(
        &self,
        out: &mut MeshBuild,
        memo: &mut LightMemo,
        v: &VoxelHandle<'_>,
        ty: &VoxelType,
        tile: Tile,
    ) -> Result<(), MeshError> {
        let above = v.neighbor(BoxFace::Top.delta());
        if !is_face_visible(v, above.as_ref(), BoxFace::Top) {
            return Ok(());
        }
        let ft = self.tables.top();
        let base = v.world_position();
        let mut top = TopSurface::default();
        for c in ft.corners {
            top.pos[c.index()] = base + corner_position(c) + Vec3::new(0.0, ramp_offset(v, c), 0.0);
        }

        let explored_corners = if v.is_explored() {
            4
        } else {
            ft.corners
                .iter()
                .filter(|&&c| memo.fill_explored(v, c))
                .count()
        };
        for c in ft.corners {
            top.light[c.index()] = memo.light(v, c);
            let lit = explored_corners == 4 || memo.explored(v, c)?;
            top.shade[c.index()] = if lit { WHITE } else { BLACK };
        }

        let jitter = self.settings.vertex_noise_amplitude;
        if explored_corners == 0 {
            if !self.settings.debug_hide_slice_top {
                self.fog(out, &top);
            }
            return Ok(());
        }

        let light = ft.corners.map(|c| top.light[c.index()]);
        let quad = Quad {
            pos: ft.corners.map(|c| top.pos[c.index()]),
            light,
            tint: ft.corners.map(|c| mul_tint(top.shade[c.index()], ty.tint)),
            uv: Quad::tile_uvs(tile, ft.uvs, Vec2::new(1.0, 1.0)),
            bounds: tile.bounds(),
        };
        emit_quad(out, &quad, flip_for(&light), jitter);

        if v.grass_type() != 0 {
            match v.manager().catalog().grass_type(v.grass_type()) {
                Some(grass) => emit_grass(out, &self.tables, v, grass, &top, jitter),
                None => log::trace!("unknown grass {} at {:?}", v.grass_type(), v.coordinate()),
            }
        }
        Ok(())
    }

    /// Black placeholder sampling the centre of the fog tile.
    fn fog(&self, out: &mut MeshBuild, top: &TopSurface) {
        let tile = self.settings.fog_tile;
        let min = tile.uv_origin();
        let max = tile.uv(Vec2::new(1.0, 1.0));
        let quad = Quad {
            pos: self.tables.top().corners.map(|c| top.pos[c.index()]),
            light: [VertexLight::BLACK; 4],
            tint: [BLACK; 4],
            uv: [tile.uv(Vec2::new(0.5, 0.5)); 4],
            bounds: UvBounds::new(min.x, min.y, max.x, max.y),
        };
        emit_quad(out, &quad, false, self.settings.vertex_noise_amplitude);
    }
}

fn log_mesh_perf(coord: ChunkCoord, stats: &MeshStats) {
    log::debug!(
        target: "perf",
        "ms={} chunk_mesh reused={} rebuilt={} empty={} not_stored={} ramps={} verts={} idx={} cx={} cy={} cz={}",
        stats.total_ms,
        stats.slices_reused,
        stats.slices_rebuilt,
        stats.slices_empty,
        stats.slices_not_stored,
        stats.ramps_changed,
        stats.vertices,
        stats.indices,
        coord.cx,
        coord.cy,
        coord.cz
    );
}
