//! Indexed triangle meshes owned by the chapter simulations
//!
//! The renderer only ever reads `positions` / `normals`; the simulation
//! mutates positions in place and never changes the vertex count.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Indexed triangle mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Triangle list (three indices per face)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// UV sphere centered at the origin.
    ///
    /// Rings run from the +Y pole to the -Y pole and the seam column is
    /// duplicated, giving `(width_segments + 1) * (height_segments + 1)`
    /// vertices. Pole caps emit a single triangle per quad.
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row = width_segments + 1;

        let mut positions = Vec::with_capacity((row * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                positions.push(Vec3::new(
                    -radius * (u * TAU).cos() * (v * PI).sin(),
                    radius * (v * PI).cos(),
                    radius * (u * TAU).sin() * (v * PI).sin(),
                ));
            }
        }

        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        let mut mesh = Self {
            normals: vec![Vec3::ZERO; positions.len()],
            positions,
            indices,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    /// Flat grid in the XY plane at z = 0, rows running from +Y to -Y.
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(1);
        let height_segments = height_segments.max(1);
        let row = width_segments + 1;
        let seg_w = width / width_segments as f32;
        let seg_h = height / height_segments as f32;

        let mut positions = Vec::with_capacity((row * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let y = iy as f32 * seg_h - height / 2.0;
            for ix in 0..=width_segments {
                let x = ix as f32 * seg_w - width / 2.0;
                positions.push(Vec3::new(x, -y, 0.0));
            }
        }

        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = ix + 1 + row * (iy + 1);
                let d = ix + 1 + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let mut mesh = Self {
            normals: vec![Vec3::ZERO; positions.len()],
            positions,
            indices,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Recompute per-vertex normals from the current positions.
    ///
    /// Each face adds its unnormalized cross product (weighted by area)
    /// to its three corners; the sums are then normalized.
    pub fn compute_vertex_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for face in self.indices.chunks_exact(3) {
            let (ia, ib, ic) = (face[0] as usize, face[1] as usize, face[2] as usize);
            let (Some(&pa), Some(&pb), Some(&pc)) = (
                self.positions.get(ia),
                self.positions.get(ib),
                self.positions.get(ic),
            ) else {
                continue;
            };
            let face_normal = (pc - pb).cross(pa - pb);
            self.normals[ia] += face_normal;
            self.normals[ib] += face_normal;
            self.normals[ic] += face_normal;
        }

        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }

    /// Restore positions from a snapshot taken at creation.
    ///
    /// Returns false (and leaves the mesh untouched) if the snapshot does
    /// not match the vertex count.
    pub fn restore(&mut self, original: &[Vec3]) -> bool {
        if original.len() != self.positions.len() {
            log::warn!(
                "Mesh restore skipped: snapshot has {} vertices, mesh has {}",
                original.len(),
                self.positions.len()
            );
            return false;
        }
        self.positions.copy_from_slice(original);
        self.compute_vertex_normals();
        true
    }

    /// Positions as a flat `[x, y, z, ...]` buffer
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as a flat `[x, y, z, ...]` buffer
    pub fn normal_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_layout() {
        let mesh = Mesh::uv_sphere(2.0, 8, 4);
        assert_eq!(mesh.vertex_count(), 9 * 5);
        // Poles dropped one triangle per quad
        assert_eq!(mesh.indices.len(), (8 * 4 * 2 - 2 * 8) * 3);
        assert!(mesh.positions.iter().all(|p| (p.length() - 2.0).abs() < 1e-4));
        assert!((mesh.positions[0] - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_sphere_normals_point_outward() {
        let mesh = Mesh::uv_sphere(5.0, 16, 12);
        // Skip the pole rows where the seam makes normals approximate
        let row = 17;
        for (p, n) in mesh.positions.iter().zip(&mesh.normals).skip(row).take(row * 10) {
            assert!(n.dot(p.normalize()) > 0.9, "normal {n:?} at {p:?}");
        }
    }

    #[test]
    fn test_plane_layout_and_normals() {
        let mesh = Mesh::plane(20.0, 20.0, 4, 4);
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.indices.len(), 4 * 4 * 6);
        assert!((mesh.positions[0] - Vec3::new(-10.0, 10.0, 0.0)).length() < 1e-5);
        assert!((mesh.positions[24] - Vec3::new(10.0, -10.0, 0.0)).length() < 1e-5);
        assert!(mesh.normals.iter().all(|n| (*n - Vec3::Z).length() < 1e-5));
    }

    #[test]
    fn test_restore() {
        let mut mesh = Mesh::plane(2.0, 2.0, 2, 2);
        let original = mesh.positions.clone();
        mesh.positions[4].z = -3.0;
        assert!(mesh.restore(&original));
        assert_eq!(mesh.positions, original);

        // Mismatched snapshot is rejected without resizing
        assert!(!mesh.restore(&original[..3]));
        assert_eq!(mesh.vertex_count(), 9);
    }

    #[test]
    fn test_position_buffer_is_flat() {
        let mesh = Mesh::plane(2.0, 2.0, 1, 1);
        let buf = mesh.position_buffer();
        assert_eq!(buf.len(), 12);
        assert_eq!(&buf[0..3], &[-1.0, 1.0, 0.0]);
    }
}
