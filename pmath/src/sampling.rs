use crate::numbers::Float;
use crate::vector::{Vec2, Vec3};

/// Maps a point on the unit square to a direction on the unit sphere, preserving
/// uniformity (and therefore any stratification of the input points).
pub fn uniform_sample_sphere<T: Float>(u: Vec2<T>) -> Vec3<T> {
    let z = T::one() - T::two() * u.x;
    let r = T::zero().max(T::one() - z * z).sqrt();
    let phi = T::two() * T::PI * u.y;
    Vec3 {
        x: r * phi.cos(),
        y: r * phi.sin(),
        z,
    }
}
