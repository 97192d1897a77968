use crate::numbers::Float;
use crate::{max, min};
use num_traits::{Signed, Zero};
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// Mostly used for points on the unit square before they get warped.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct Vec2<T: Copy> {
    pub x: T,
    pub y: T,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct Vec3<T: Copy> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Copy> Vec3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Vec3 { x, y, z }
    }

    /// Reorders the components so that the result is `(self[x], self[y], self[z])`.
    pub fn permute(self, x: usize, y: usize, z: usize) -> Self {
        Vec3 {
            x: self[x],
            y: self[y],
            z: self[z],
        }
    }
}

impl<T: PartialEq + Copy> PartialEq for Vec3<T> {
    fn eq(&self, rhs: &Self) -> bool {
        self.x == rhs.x && self.y == rhs.y && self.z == rhs.z
    }
}

impl<T: Signed + Copy> Vec3<T> {
    pub fn abs(self) -> Self {
        Vec3 {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }

    // Returns a vec of bools indicating whether or
    // not the entry is negative:
    pub fn comp_wise_is_neg(self) -> Vec3<bool> {
        Vec3 {
            x: self.x.is_negative(),
            y: self.y.is_negative(),
            z: self.z.is_negative(),
        }
    }
}

impl<T: Zero + Copy> Vec3<T> {
    pub fn zero() -> Self {
        Vec3 {
            x: T::zero(),
            y: T::zero(),
            z: T::zero(),
        }
    }
}

impl<T: Mul<Output = T> + Add<Output = T> + Copy> Vec3<T> {
    pub fn dot(self, o: Vec3<T>) -> T {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    pub fn length2(self) -> T {
        self.dot(self)
    }
}

impl<T: Mul<Output = T> + Copy> Vec3<T> {
    // Scales the components by a scalar:
    pub fn scale(self, s: T) -> Self {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl<T: Div<Output = T> + Copy> Vec3<T> {
    // The inverse of scaling (s / vec):
    pub fn inv_scale(self, s: T) -> Self {
        Vec3 {
            x: s / self.x,
            y: s / self.y,
            z: s / self.z,
        }
    }
}

impl<T: Float> Vec3<T> {
    pub fn length(self) -> T {
        self.length2().sqrt()
    }

    pub fn normalize(self) -> Self {
        let scale = T::one() / self.length();
        self.scale(scale)
    }

    /// Flips the vector, if needed, so that it lies in the same hemisphere as `n`.
    /// A vector perpendicular to `n` is left alone.
    pub fn face_forward(self, n: Vec3<T>) -> Self {
        if self.dot(n) < T::zero() {
            -self
        } else {
            self
        }
    }

    pub fn to_f64(self) -> Vec3<f64> {
        Vec3 {
            x: self.x.to_f64().unwrap_or(0.),
            y: self.y.to_f64().unwrap_or(0.),
            z: self.z.to_f64().unwrap_or(0.),
        }
    }

    pub fn to_f32(self) -> Vec3<f32> {
        Vec3 {
            x: self.x.to_f32().unwrap_or(0.),
            y: self.y.to_f32().unwrap_or(0.),
            z: self.z.to_f32().unwrap_or(0.),
        }
    }
}

impl<T: PartialOrd + Copy> Vec3<T> {
    /// Index of the largest component.
    pub fn max_dim(self) -> usize {
        if self.x > self.y && self.x > self.z {
            0
        } else if self.y > self.z {
            1
        } else {
            2
        }
    }

    pub fn min(self, o: Self) -> Self {
        Vec3 {
            x: min(self.x, o.x),
            y: min(self.y, o.y),
            z: min(self.z, o.z),
        }
    }

    pub fn max(self, o: Self) -> Self {
        Vec3 {
            x: max(self.x, o.x),
            y: max(self.y, o.y),
            z: max(self.z, o.z),
        }
    }
}

impl<T: Add<Output = T> + Copy> Add for Vec3<T> {
    type Output = Vec3<T>;

    fn add(self, o: Vec3<T>) -> Self {
        Vec3 {
            x: self.x + o.x,
            y: self.y + o.y,
            z: self.z + o.z,
        }
    }
}

impl<T: Sub<Output = T> + Copy> Sub for Vec3<T> {
    type Output = Vec3<T>;

    fn sub(self, o: Vec3<T>) -> Self {
        Vec3 {
            x: self.x - o.x,
            y: self.y - o.y,
            z: self.z - o.z,
        }
    }
}

impl<T: Copy> Index<usize> for Vec3<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Index out of range for Vec3"),
        }
    }
}

impl<T: Copy> IndexMut<usize> for Vec3<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Index out of range for Vec3"),
        }
    }
}

impl<T: Neg<Output = T> + Copy> Neg for Vec3<T> {
    type Output = Vec3<T>;

    fn neg(self) -> Self {
        Vec3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}
