use crate::numbers::Float;
use crate::vector::Vec3;

/// A ray used to intersect a scene.
#[derive(Clone, Copy, Debug)]
pub struct Ray<T: Float> {
    /// The origin point of the ray.
    pub org: Vec3<T>,
    /// The direction vector of the ray.
    pub dir: Vec3<T>,
    /// The max extent of the ray to consider when tracing against geometry.
    pub t_far: T,
}

impl<T: Float> Ray<T> {
    /// Constructs a new Ray for intersecting a scene, that is, without a parametric restriction.
    pub fn new(org: Vec3<T>, dir: Vec3<T>) -> Self {
        Ray {
            org,
            dir,
            t_far: T::infinity(),
        }
    }

    pub fn to_f64(self) -> Ray<f64> {
        Ray {
            org: self.org.to_f64(),
            dir: self.dir.to_f64(),
            t_far: self.t_far.to_f64().unwrap_or(std::f64::INFINITY),
        }
    }
}
