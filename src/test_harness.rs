// Shared geometry for the unit tests.

use pmath::vector::Vec3;
use rand::Rng;

/// A `res` x `res` grid of quads (two triangles each) over the unit square,
/// with a wavy height so rays from above and below both have something to hit.
pub fn bumpy_grid(res: u32) -> (Vec<Vec3<f64>>, Vec<[u32; 3]>) {
    let mut vertices = Vec::with_capacity(((res + 1) * (res + 1)) as usize);
    for j in 0..=res {
        for i in 0..=res {
            let x = i as f64 / res as f64;
            let y = j as f64 / res as f64;
            let z = 0.1 * (6. * x).sin() * (4. * y).cos();
            vertices.push(Vec3::new(x, y, z));
        }
    }

    let mut faces = Vec::with_capacity((2 * res * res) as usize);
    for j in 0..res {
        for i in 0..res {
            let v00 = j * (res + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + res + 1;
            let v11 = v01 + 1;
            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

/// Rejection sampled direction, independent of the samplers under test.
pub fn random_unit_dir<R: Rng>(rng: &mut R) -> Vec3<f64> {
    loop {
        let v = Vec3::new(
            rng.gen::<f64>() * 2. - 1.,
            rng.gen::<f64>() * 2. - 1.,
            rng.gen::<f64>() * 2. - 1.,
        );
        let len2 = v.length2();
        if len2 > 1e-4 && len2 <= 1. {
            return v.normalize();
        }
    }
}
