use pmath::bbox::BBox3;
use pmath::ray::Ray;
use pmath::vector::Vec3;
use simple_error::{bail, SimpleResult};

/// A triangle mesh borrowed from the caller. Occlusion never modifies the geometry,
/// it only reads it through a ray test.
#[derive(Clone, Copy, Debug)]
pub struct Mesh<'a> {
    vertices: &'a [Vec3<f64>],
    faces: &'a [[u32; 3]],
}

impl<'a> Mesh<'a> {
    /// Wraps a vertex and a face buffer, making sure every face references an existing vertex.
    pub fn new(vertices: &'a [Vec3<f64>], faces: &'a [[u32; 3]]) -> SimpleResult<Self> {
        for (i, face) in faces.iter().enumerate() {
            for &index in face.iter() {
                if (index as usize) >= vertices.len() {
                    bail!(
                        "face {} references vertex {}, but there are only {} vertices",
                        i,
                        index,
                        vertices.len()
                    );
                }
            }
        }

        Ok(Mesh { vertices, faces })
    }

    pub fn num_faces(self) -> usize {
        self.faces.len()
    }

    pub fn face_positions(self, face: usize) -> [Vec3<f64>; 3] {
        let [i0, i1, i2] = self.faces[face];
        [
            self.vertices[i0 as usize],
            self.vertices[i1 as usize],
            self.vertices[i2 as usize],
        ]
    }

    pub fn face_bound(self, face: usize) -> BBox3<f64> {
        let [p0, p1, p2] = self.face_positions(face);
        BBox3::from_pnt(p0).combine_pnt(p1).combine_pnt(p2)
    }

    pub fn face_centroid(self, face: usize) -> Vec3<f64> {
        let [p0, p1, p2] = self.face_positions(face);
        (p0 + p1 + p2).scale(1. / 3.)
    }

    /// Watertight ray-triangle test. Only hits with `0 < t < ray.t_far` count, and
    /// degenerate (zero area) triangles are never hit.
    pub fn intersect_test_face(self, face: usize, ray: Ray<f64>, int_info: &RayIntInfo) -> bool {
        let [kx, ky, kz] = int_info.perm;
        let shear = int_info.shear;

        // Move the triangle into a space where the ray starts at the origin and points down +z:
        let transform = |p: Vec3<f64>| {
            let p = (p - ray.org).permute(kx, ky, kz);
            Vec3 {
                x: shear.x * p.z + p.x,
                y: shear.y * p.z + p.y,
                z: p.z * shear.z,
            }
        };
        let [p0, p1, p2] = self.face_positions(face);
        let pt = [transform(p0), transform(p1), transform(p2)];

        // Edge functions:
        let e0 = pt[1].x * pt[2].y - pt[1].y * pt[2].x;
        let e1 = pt[2].x * pt[0].y - pt[2].y * pt[0].x;
        let e2 = pt[0].x * pt[1].y - pt[0].y * pt[1].x;

        // The ray passes outside of one of the edges:
        if (e0 < 0. || e1 < 0. || e2 < 0.) && (e0 > 0. || e1 > 0. || e2 > 0.) {
            return false;
        }

        // Catches both degenerate triangles and NaNs from a zero direction:
        let det = e0 + e1 + e2;
        if !(det > 0. || det < 0.) {
            return false;
        }

        // The hit distance, scaled by det:
        let t_scaled = e0 * pt[0].z + e1 * pt[1].z + e2 * pt[2].z;
        if det > 0. {
            t_scaled > 0. && t_scaled < ray.t_far * det
        } else {
            t_scaled < 0. && t_scaled > ray.t_far * det
        }
    }

    /// Tests the ray against every face, one after another.
    pub fn intersect_test_naive(self, ray: Ray<f64>) -> bool {
        let int_info = RayIntInfo::new(ray);
        (0..self.num_faces()).any(|face| self.intersect_test_face(face, ray, &int_info))
    }
}

/// The permutation and shear for a ray, computed once and then reused for every
/// triangle the ray is tested against.
#[derive(Clone, Copy, Debug)]
pub struct RayIntInfo {
    perm: [usize; 3],
    shear: Vec3<f64>,
}

impl RayIntInfo {
    pub fn new(ray: Ray<f64>) -> Self {
        // Make the dominant direction the z axis:
        let kz = ray.dir.abs().max_dim();
        let kx = if kz == 2 { 0 } else { kz + 1 };
        let ky = if kx == 2 { 0 } else { kx + 1 };

        let perm_dir = ray.dir.permute(kx, ky, kz);
        let inv_perm_dir_z = 1. / perm_dir.z;

        RayIntInfo {
            perm: [kx, ky, kz],
            shear: Vec3 {
                x: -perm_dir.x * inv_perm_dir_z,
                y: -perm_dir.y * inv_perm_dir_z,
                z: inv_perm_dir_z,
            },
        }
    }
}
