// Float trait used throughout so the geometry code can run in either precision.

use num_traits;

pub trait Float: num_traits::Float + num_traits::Bounded {
    const PI: Self;
    const ONE_MINUS_EPS: Self;
    const MACHINE_EPS: Self;

    fn two() -> Self;

    /// Conservative bound on the relative error of `n` floating point operations.
    fn gamma(n: i32) -> Self {
        let n = <Self as num_traits::NumCast>::from(n).unwrap_or_else(Self::zero);
        (n * Self::MACHINE_EPS) / (Self::one() - n * Self::MACHINE_EPS)
    }
}

impl Float for f32 {
    const PI: Self = std::f32::consts::PI;
    const ONE_MINUS_EPS: Self = 0.99999994;
    const MACHINE_EPS: Self = std::f32::EPSILON * 0.5;

    fn two() -> Self {
        2f32
    }
}

impl Float for f64 {
    const PI: Self = std::f64::consts::PI;
    const ONE_MINUS_EPS: Self = 0.99999999999999989;
    const MACHINE_EPS: Self = std::f64::EPSILON * 0.5;

    fn two() -> Self {
        2.
    }
}
