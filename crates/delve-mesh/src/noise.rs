//! Deterministic per-position vertex jitter.
//!
//! The offset depends only on the (quantized) world position, so corners
//! shared by neighboring faces move together and the surface stays closed.

use delve_geom::Vec3;

// Jitter repeats every PERIOD voxels along each axis.
const PERIOD: i32 = 64;
// Positions are bucketed at this many steps per voxel before hashing.
const STEPS: f32 = 8.0;

fn hash3(ix: i32, iy: i32, iz: i32, salt: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iy as u32).wrapping_mul(0x27d4_eb2d)
        ^ (iz as u32).wrapping_mul(0xc2b2_ae35)
        ^ salt.wrapping_mul(0x1656_67b1);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

fn signed_unit(h: u32) -> f32 {
    (h as f32 / u32::MAX as f32) * 2.0 - 1.0
}

/// Offset for a vertex at `p`, each component in `[-amplitude, amplitude]`.
pub fn vertex_jitter(p: Vec3, amplitude: f32) -> Vec3 {
    if amplitude == 0.0 {
        return Vec3::ZERO;
    }
    let q = |c: f32| ((c * STEPS).round() as i32).rem_euclid(PERIOD * STEPS as i32);
    let (ix, iy, iz) = (q(p.x), q(p.y), q(p.z));
    Vec3::new(
        signed_unit(hash3(ix, iy, iz, 1)),
        signed_unit(hash3(ix, iy, iz, 2)),
        signed_unit(hash3(ix, iy, iz, 3)),
    ) * amplitude
}
