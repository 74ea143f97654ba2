use crate::{UvBounds, Vec2, Vec3};

/// One vertex as the mesher produces it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub pos: Vec3,
    /// Sun, ambient occlusion, dynamic light, alpha.
    pub color: [u8; 4],
    pub tint: [u8; 4],
    pub uv: Vec2,
    pub bounds: UvBounds,
}

/// Struct-of-arrays vertex/index buffer.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub col: Vec<u8>,
    pub tint: Vec<u8>,
    pub uv: Vec<f32>,
    pub bounds: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        // 4 vertices per quad
        self.pos.reserve(n_quads * 4 * 3);
        self.col.reserve(n_quads * 4 * 4);
        self.tint.reserve(n_quads * 4 * 4);
        self.uv.reserve(n_quads * 4 * 2);
        self.bounds.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.idx.len()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    pub fn push_vertex(&mut self, v: &MeshVertex) -> u32 {
        let i = self.vertex_count() as u32;
        self.pos.extend_from_slice(&v.pos.to_array());
        self.col.extend_from_slice(&v.color);
        self.tint.extend_from_slice(&v.tint);
        self.uv.extend_from_slice(&[v.uv.x, v.uv.y]);
        self.bounds.extend_from_slice(&v.bounds.to_array());
        i
    }

    /// Appends a quad as two triangles. `flip` splits along the 1-3 diagonal
    /// instead of 0-2.
    pub fn add_quad(&mut self, verts: &[MeshVertex; 4], flip: bool) {
        let base = self.vertex_count() as u32;
        for v in verts {
            self.push_vertex(v);
        }
        let order: [u32; 6] = if flip { [1, 2, 3, 1, 3, 0] } else { [0, 1, 2, 0, 2, 3] };
        self.idx.extend(order.iter().map(|o| base + o));
    }

    /// Appends another buffer, offsetting its indices.
    pub fn append(&mut self, other: &MeshBuild) {
        let base = self.vertex_count() as u32;
        self.pos.extend_from_slice(&other.pos);
        self.col.extend_from_slice(&other.col);
        self.tint.extend_from_slice(&other.tint);
        self.uv.extend_from_slice(&other.uv);
        self.bounds.extend_from_slice(&other.bounds);
        self.idx.extend(other.idx.iter().map(|i| base + i));
    }

    pub fn concat<'a>(parts: impl IntoIterator<Item = &'a MeshBuild>) -> MeshBuild {
        let mut out = MeshBuild::default();
        for p in parts {
            out.append(p);
        }
        out
    }

    pub fn vertex(&self, i: usize) -> Option<MeshVertex> {
        if i >= self.vertex_count() {
            return None;
        }
        let p = &self.pos[i * 3..i * 3 + 3];
        let c = &self.col[i * 4..i * 4 + 4];
        let t = &self.tint[i * 4..i * 4 + 4];
        let b = &self.bounds[i * 4..i * 4 + 4];
        Some(MeshVertex {
            pos: Vec3::new(p[0], p[1], p[2]),
            color: [c[0], c[1], c[2], c[3]],
            tint: [t[0], t[1], t[2], t[3]],
            uv: Vec2::new(self.uv[i * 2], self.uv[i * 2 + 1]),
            bounds: UvBounds::new(b[0], b[1], b[2], b[3]),
        })
    }

    /// Triangles as vertex-position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.idx.chunks_exact(3).map(move |t| {
            let p = |i: u32| {
                let i = i as usize * 3;
                Vec3::new(self.pos[i], self.pos[i + 1], self.pos[i + 2])
            };
            [p(t[0]), p(t[1]), p(t[2])]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(y: f32) -> [MeshVertex; 4] {
        let v = |x: f32, z: f32| MeshVertex {
            pos: Vec3::new(x, y, z),
            color: [255; 4],
            tint: [255; 4],
            ..Default::default()
        };
        [v(0.0, 1.0), v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0)]
    }

    #[test]
    fn append_offsets_indices() {
        let mut a = MeshBuild::default();
        a.add_quad(&quad(0.0), false);
        let mut b = MeshBuild::default();
        b.add_quad(&quad(1.0), true);
        let c = MeshBuild::concat([&a, &b]);
        assert_eq!(c.vertex_count(), 8);
        assert_eq!(&c.idx[6..], &[5, 6, 7, 5, 7, 4]);
        assert_eq!(c.vertex(4).map(|v| v.pos.y), Some(1.0));
        assert_eq!(c.triangles().count(), 4);
    }
}
