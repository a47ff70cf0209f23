// pbrt
use crate::core::geometry::Point2f;
use crate::core::pbrt::Float;
use crate::core::rng::Rng;
use crate::core::sampler::Sampler;

/// Independent uniform random sampling backed by the PCG32 generator.
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomSampler {
    rng: Rng,
}

impl RandomSampler {
    pub fn new(seed: u64) -> Self {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(seed);
        RandomSampler { rng }
    }
}

impl Sampler for RandomSampler {
    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }
    fn get_2d(&mut self) -> Point2f {
        Point2f {
            x: self.rng.uniform_float(),
            y: self.rng.uniform_float(),
        }
    }
}
