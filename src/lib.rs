//! Monte-Carlo ambient occlusion.
//!
//! For every sample point a batch of directions is flipped into the point's hemisphere
//! and a ray is cast along each of them; the occlusion of the point is the fraction of
//! those rays that hit something. The scene is anything that implements [`RayHitTest`],
//! with a naive scan and a BVH provided for triangle meshes.

pub mod bvh;
pub mod error;
pub mod mesh;
pub mod occlusion;
pub mod param;
pub mod sampler;
pub mod threading;

#[cfg(test)]
mod test_harness;

pub use bvh::MeshBVH;
pub use error::{AoError, AoResult};
pub use hit_test::{MeshHitTest, RayHitTest};
pub use mesh::Mesh;
pub use param::{AoParam, SamplerKind};
pub use pmath::vector::Vec3;
pub use sampler::{DirectionSampler, PmjSampler, StratifiedSampler};

/// Ambient occlusion against an arbitrary scene. `hit_test` must return true when a ray
/// starting at the origin going in the direction is blocked.
///
/// Returns one value in `[0, 1]` per point. Fails if `num_samples` is 0 or if there isn't
/// exactly one normal per point.
pub fn ambient_occlusion<H>(
    hit_test: &H,
    points: &[Vec3<f64>],
    normals: &[Vec3<f64>],
    num_samples: usize,
    param: &AoParam,
) -> AoResult<Vec<f64>>
where
    H: RayHitTest + ?Sized,
{
    let sampler = param.direction_sampler();
    occlusion::estimate(
        hit_test,
        sampler.as_ref(),
        points,
        normals,
        num_samples,
        param,
    )
}

/// Ambient occlusion against a mesh using a BVH the caller already built over it. This is
/// the way to go when querying the same mesh over and over.
pub fn ambient_occlusion_bvh(
    bvh: &MeshBVH,
    mesh: Mesh,
    points: &[Vec3<f64>],
    normals: &[Vec3<f64>],
    num_samples: usize,
    param: &AoParam,
) -> AoResult<Vec<f64>> {
    if bvh.num_faces() != mesh.num_faces() {
        return Err(AoError::InvalidArgument(format!(
            "BVH was built over {} faces but the mesh has {}",
            bvh.num_faces(),
            mesh.num_faces()
        )));
    }

    let hit_test = MeshHitTest::with_bvh(mesh, bvh, param.ray_offset);
    ambient_occlusion(&hit_test, points, normals, num_samples, param)
}

/// Ambient occlusion against a mesh. Meshes with fewer than `param.naive_threshold` faces
/// are scanned face by face, larger ones get a BVH built just for this call.
pub fn ambient_occlusion_mesh(
    mesh: Mesh,
    points: &[Vec3<f64>],
    normals: &[Vec3<f64>],
    num_samples: usize,
    param: &AoParam,
) -> AoResult<Vec<f64>> {
    // No point in building a BVH for a call that's going to fail:
    occlusion::check_args(points, normals, num_samples)?;

    let hit_test = MeshHitTest::dispatch(mesh, param);
    ambient_occlusion(&hit_test, points, normals, num_samples, param)
}
