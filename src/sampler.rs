use pmath::numbers::Float;
use pmath::sampling::uniform_sample_sphere;
use pmath::vector::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of the direction batch used by the occlusion estimator. A batch is drawn once
/// per estimator call and shared by every point, so a sampler should be a pure function
/// of `num_samples` and its own explicit state (like a seed).
pub trait DirectionSampler: Sync {
    /// Returns exactly `num_samples` unit length directions over the whole sphere.
    fn sample(&self, num_samples: usize) -> Vec<Vec3<f32>>;
}

/// Jittered sampling over the unit square, warped onto the sphere. The largest square
/// grid that fits in `num_samples` gets one jittered sample per cell, the rest of the
/// samples are uniformly random.
#[derive(Clone, Copy, Debug)]
pub struct StratifiedSampler {
    pub seed: u64,
}

impl StratifiedSampler {
    pub fn new(seed: u64) -> Self {
        StratifiedSampler { seed }
    }
}

impl DirectionSampler for StratifiedSampler {
    fn sample(&self, num_samples: usize) -> Vec<Vec3<f32>> {
        let mut rng = Pcg32::seed_from_u64(self.seed);

        let mut num_strata = (num_samples as f64).sqrt() as usize;
        while num_strata * num_strata > num_samples {
            num_strata -= 1;
        }
        let inv_num_strata = 1. / (num_strata as f64);

        let mut dirs = Vec::with_capacity(num_samples);
        for i in 0..num_strata {
            for j in 0..num_strata {
                let u = Vec2 {
                    x: f64::ONE_MINUS_EPS.min(inv_num_strata * (i as f64 + rng.gen::<f64>())),
                    y: f64::ONE_MINUS_EPS.min(inv_num_strata * (j as f64 + rng.gen::<f64>())),
                };
                dirs.push(warp_to_sphere(u));
            }
        }

        while dirs.len() < num_samples {
            let u = Vec2 {
                x: rng.gen::<f64>(),
                y: rng.gen::<f64>(),
            };
            dirs.push(warp_to_sphere(u));
        }

        dirs
    }
}

/// Progressive multi-jittered (0,2) points warped onto the sphere. Because the sequence
/// is progressive, any prefix of it is still well stratified.
#[derive(Clone, Copy, Debug)]
pub struct PmjSampler {
    pub seed: u64,
    /// How often to retry for blue noise when generating the points (0 to skip).
    pub blue_noise_retry_count: u32,
}

impl PmjSampler {
    pub fn new(seed: u64, blue_noise_retry_count: u32) -> Self {
        PmjSampler {
            seed,
            blue_noise_retry_count,
        }
    }
}

impl DirectionSampler for PmjSampler {
    fn sample(&self, num_samples: usize) -> Vec<Vec3<f32>> {
        if num_samples == 0 {
            return Vec::new();
        }

        let mut rng = Pcg32::seed_from_u64(self.seed);
        pmj::generate(
            num_samples.next_power_of_two(),
            self.blue_noise_retry_count,
            &mut rng,
        )
        .into_iter()
        .take(num_samples)
        .map(|sample| {
            warp_to_sphere(Vec2 {
                x: sample.x() as f64,
                y: sample.y() as f64,
            })
        })
        .collect()
    }
}

fn warp_to_sphere(u: Vec2<f64>) -> Vec3<f32> {
    uniform_sample_sphere(u).normalize().to_f32()
}
