use crate::sampler::{DirectionSampler, PmjSampler, StratifiedSampler};

/// Which sampler produces the direction batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SamplerKind {
    Stratified,
    Pmj { blue_noise_retry_count: u32 },
}

/// Everything that tunes an occlusion estimate except the sample count.
#[derive(Clone, Copy, Debug)]
pub struct AoParam {
    /// Meshes with fewer faces than this are tested with a naive scan instead of a BVH.
    pub naive_threshold: usize,
    /// How far along the direction a ray's origin is moved before testing, in the
    /// mesh's units.
    pub ray_offset: f32,
    /// The max number of faces per BVH leaf (when the BVH is built for the call).
    pub max_faces_per_leaf: usize,
    /// The number of threads the points are spread across (1 runs on the calling thread).
    pub num_threads: usize,
    /// Whether to pin worker threads to cores (only done if there are enough cores).
    pub bind_threads: bool,
    /// The seed the direction sampler is created with.
    pub seed: u64,
    pub sampler: SamplerKind,
}

impl AoParam {
    pub const DEFAULT_NAIVE_THRESHOLD: usize = 100;
    pub const DEFAULT_RAY_OFFSET: f32 = 1e-4;
    pub const DEFAULT_MAX_FACES_PER_LEAF: usize = 4;

    pub fn with_naive_threshold(mut self, naive_threshold: usize) -> Self {
        self.naive_threshold = naive_threshold;
        self
    }

    pub fn with_ray_offset(mut self, ray_offset: f32) -> Self {
        self.ray_offset = ray_offset;
        self
    }

    pub fn with_max_faces_per_leaf(mut self, max_faces_per_leaf: usize) -> Self {
        self.max_faces_per_leaf = max_faces_per_leaf;
        self
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_bind_threads(mut self, bind_threads: bool) -> Self {
        self.bind_threads = bind_threads;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerKind) -> Self {
        self.sampler = sampler;
        self
    }

    /// Creates the configured direction sampler.
    pub fn direction_sampler(&self) -> Box<dyn DirectionSampler> {
        match self.sampler {
            SamplerKind::Stratified => Box::new(StratifiedSampler::new(self.seed)),
            SamplerKind::Pmj {
                blue_noise_retry_count,
            } => Box::new(PmjSampler::new(self.seed, blue_noise_retry_count)),
        }
    }
}

impl Default for AoParam {
    fn default() -> Self {
        // Use every core we know about:
        let num_threads = core_affinity::get_core_ids()
            .map(|ids| ids.len())
            .unwrap_or(1)
            .max(1);

        AoParam {
            naive_threshold: Self::DEFAULT_NAIVE_THRESHOLD,
            ray_offset: Self::DEFAULT_RAY_OFFSET,
            max_faces_per_leaf: Self::DEFAULT_MAX_FACES_PER_LEAF,
            num_threads,
            bind_threads: false,
            seed: 0,
            sampler: SamplerKind::Stratified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let param = AoParam::default();
        assert_eq!(param.naive_threshold, 100);
        assert_eq!(param.ray_offset, 1e-4);
        assert!(param.num_threads >= 1);
        assert!(!param.bind_threads);
        assert_eq!(param.sampler, SamplerKind::Stratified);
    }

    #[test]
    fn test_sampler_follows_seed() {
        let a = AoParam::default().with_seed(3).direction_sampler().sample(20);
        let b = StratifiedSampler::new(3).sample(20);
        assert_eq!(a, b);

        let param = AoParam::default().with_sampler(SamplerKind::Pmj {
            blue_noise_retry_count: 0,
        });
        assert_eq!(param.direction_sampler().sample(20).len(), 20);
    }
}
