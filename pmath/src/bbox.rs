use crate::numbers::Float;
use crate::ray::Ray;
use crate::vector::Vec3;
use std::ops::Index;

/// A 3d bounding box.
#[derive(Clone, Copy, Debug)]
pub struct BBox3<T: Float> {
    pub pmin: Vec3<T>,
    pub pmax: Vec3<T>,
}

impl<T: Float> BBox3<T> {
    /// Constructs an "inverted" `BBox3` that anything can be combined into.
    pub fn new() -> Self {
        BBox3 {
            pmin: Vec3 {
                x: T::infinity(),
                y: T::infinity(),
                z: T::infinity(),
            },
            pmax: Vec3 {
                x: T::neg_infinity(),
                y: T::neg_infinity(),
                z: T::neg_infinity(),
            },
        }
    }

    /// Creates a new `BBox3` from a single point (box has no volume).
    pub fn from_pnt(pnt: Vec3<T>) -> Self {
        BBox3 {
            pmin: pnt,
            pmax: pnt,
        }
    }

    /// Creates a new `BBox3` that encompases the box and another point.
    pub fn combine_pnt(self, pnt: Vec3<T>) -> Self {
        BBox3 {
            pmin: self.pmin.min(pnt),
            pmax: self.pmax.max(pnt),
        }
    }

    /// Creates a new `BBox3` that encompases the box and another box.
    pub fn combine_bnd(self, bnd: BBox3<T>) -> Self {
        BBox3 {
            pmin: self.pmin.min(bnd.pmin),
            pmax: self.pmax.max(bnd.pmax),
        }
    }

    /// Returns a vector spanning the diagonal of the bounding box.
    pub fn diagonal(self) -> Vec3<T> {
        self.pmax - self.pmin
    }

    /// Returns the index of the dimension with the highest extent.
    pub fn max_dim(self) -> usize {
        self.diagonal().max_dim()
    }

    pub fn surface_area(self) -> T {
        let d = self.diagonal();
        T::two() * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Continuous position of a point relative to the corners of the box.
    /// If `pnt` is at `pmin` it's (0,0,0), if it's at `pmax` it's (1,1,1).
    pub fn offset(self, pnt: Vec3<T>) -> Vec3<T> {
        let mut o = pnt - self.pmin;
        for i in 0..3 {
            if self.pmax[i] > self.pmin[i] {
                o[i] = o[i] / (self.pmax[i] - self.pmin[i]);
            }
        }
        o
    }

    /// Slab test against the ray's `[0, t_far]` extent. `inv_dir` is passed in so a
    /// traversal only has to compute it once per ray.
    ///
    /// A zero direction component with the origin on that slab's plane gives a NaN
    /// distance. NaN never wins a comparison below, so that axis then doesn't clip.
    pub fn intersect_test(self, ray: Ray<T>, inv_dir: Vec3<T>) -> bool {
        // Grow the far distances to stay conservative in the presence of rounding:
        let err = T::one() + T::two() * T::gamma(3);

        let mut t0 = T::zero();
        let mut t1 = ray.t_far;
        for i in 0..3 {
            // Picked by the sign of the inverse so that -0 directions flip too:
            let (near, far) = if inv_dir[i] < T::zero() {
                (self.pmax[i], self.pmin[i])
            } else {
                (self.pmin[i], self.pmax[i])
            };
            let t_near = (near - ray.org[i]) * inv_dir[i];
            let t_far = (far - ray.org[i]) * inv_dir[i] * err;

            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}

impl<T: Float> Index<usize> for BBox3<T> {
    type Output = Vec3<T>;

    fn index(&self, i: usize) -> &Vec3<T> {
        match i {
            0 => &self.pmin,
            1 => &self.pmax,
            _ => panic!("Index out of range for BBox3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BBox3<f64> {
        BBox3::from_pnt(Vec3::new(0., 0., 0.)).combine_pnt(Vec3::new(1., 1., 1.))
    }

    fn hits(bbox: BBox3<f64>, ray: Ray<f64>) -> bool {
        bbox.intersect_test(ray, ray.dir.inv_scale(1.))
    }

    #[test]
    fn test_surface_area() {
        let b = BBox3::from_pnt(Vec3::new(0., 0., 0.)).combine_pnt(Vec3::new(1., 2., 3.));
        assert_eq!(b.surface_area(), 2. * (2. + 3. + 6.));
    }

    #[test]
    fn test_ray_through_box() {
        let ray = Ray::new(Vec3::new(-1., 0.5, 0.5), Vec3::new(1., 0., 0.));
        assert!(hits(unit_box(), ray));
    }

    #[test]
    fn test_ray_behind_box() {
        let ray = Ray::new(Vec3::new(2., 0.5, 0.5), Vec3::new(1., 0., 0.));
        assert!(!hits(unit_box(), ray));
    }

    #[test]
    fn test_ray_missing_box() {
        let ray = Ray::new(Vec3::new(-1., 2., 0.5), Vec3::new(1., 0.1, 0.));
        assert!(!hits(unit_box(), ray));
    }

    #[test]
    fn test_ray_in_slab_plane() {
        // Zero x component with the origin on the x = 0 plane:
        let ray = Ray::new(Vec3::new(0., 0.25, 2.), Vec3::new(0., 0., -1.));
        assert!(hits(unit_box(), ray));
        let ray = Ray::new(Vec3::new(1., 1., 2.), Vec3::new(0., 0., -1.));
        assert!(hits(unit_box(), ray));
        // Same with negative zeros, as left behind by flipping a direction:
        let ray = Ray::new(Vec3::new(0., 0.25, 2.), Vec3::new(-0., -0., -1.));
        assert!(hits(unit_box(), ray));
        let ray = Ray::new(Vec3::new(1., 1., 2.), Vec3::new(-0., -0., -1.));
        assert!(hits(unit_box(), ray));

        // A flat box with the ray sliding along it:
        let flat = BBox3::from_pnt(Vec3::new(0., 0., 0.)).combine_pnt(Vec3::new(1., 1., 0.));
        let ray = Ray::new(Vec3::new(-1., 0.5, 0.), Vec3::new(1., 0., 0.));
        assert!(hits(flat, ray));
        let ray = Ray::new(Vec3::new(0., 0.25, 1.), Vec3::new(0., 0., -1.));
        assert!(hits(flat, ray));

        // Parallel to the slab but outside of it:
        let ray = Ray::new(Vec3::new(2., 0.5, 2.), Vec3::new(0., 0., -1.));
        assert!(!hits(unit_box(), ray));
    }

    #[test]
    fn test_offset() {
        let o = unit_box().offset(Vec3::new(0.25, 0.5, 1.));
        assert_eq!(o, Vec3::new(0.25, 0.5, 1.));
    }
}
