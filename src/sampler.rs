/// Normal-distribution sampling
/// Simulators never own a global generator: they ask a `SamplerFactory` for one
/// independent stream per trial, so tests can swap in deterministic streams.

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// One stream of normal draws
pub trait NormalSampler {
    /// Draw from N(mean, std_dev²)
    fn sample(&mut self, mean: f64, std_dev: f64) -> f64;
}

/// Hands out an independent stream for each trial index.
///
/// Streams for the same trial index must be identical across calls so that a
/// parallel run reproduces a sequential one.
pub trait SamplerFactory: Sync {
    type Sampler: NormalSampler;

    fn for_trial(&self, trial: usize) -> Self::Sampler;
}

/// Seeded `StdRng` streams, one per trial
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomStreams {
    seed: u64,
}

impl RandomStreams {
    pub fn seeded(seed: u64) -> Self {
        RandomStreams { seed }
    }

    /// Pick a base seed from the thread RNG. The seed is logged so a run can be replayed.
    pub fn from_entropy() -> Self {
        let seed = thread_rng().gen();
        log::debug!("drew simulation seed {}", seed);
        RandomStreams { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SamplerFactory for RandomStreams {
    type Sampler = RngSampler;

    fn for_trial(&self, trial: usize) -> RngSampler {
        // Golden-ratio increment keeps neighbouring trial seeds far apart
        let stream_seed = self.seed ^ (trial as u64).wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        RngSampler {
            rng: StdRng::seed_from_u64(stream_seed),
        }
    }
}

/// Normal draws backed by any `rand` generator
#[derive(Debug)]
pub struct RngSampler<R = StdRng> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        RngSampler { rng }
    }
}

impl<R: Rng> NormalSampler for RngSampler<R> {
    fn sample(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + std_dev * z
    }
}

/// Every draw lands `z` standard deviations from the mean
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantStreams {
    z: f64,
}

impl ConstantStreams {
    pub fn new(z: f64) -> Self {
        ConstantStreams { z }
    }

    /// Every draw equals the mean
    pub fn at_mean() -> Self {
        ConstantStreams { z: 0.0 }
    }
}

impl SamplerFactory for ConstantStreams {
    type Sampler = ConstantStreams;

    fn for_trial(&self, _trial: usize) -> ConstantStreams {
        *self
    }
}

impl NormalSampler for ConstantStreams {
    fn sample(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.z
    }
}

/// Replays a fixed list of standard-normal draws, cycling when exhausted.
/// Every trial starts from the beginning of the list.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedStreams {
    draws: Vec<f64>,
}

impl ScriptedStreams {
    pub fn new(draws: Vec<f64>) -> Self {
        ScriptedStreams { draws }
    }
}

impl SamplerFactory for ScriptedStreams {
    type Sampler = ScriptedSampler;

    fn for_trial(&self, _trial: usize) -> ScriptedSampler {
        ScriptedSampler {
            draws: self.draws.clone(),
            next: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScriptedSampler {
    draws: Vec<f64>,
    next: usize,
}

impl NormalSampler for ScriptedSampler {
    fn sample(&mut self, mean: f64, std_dev: f64) -> f64 {
        if self.draws.is_empty() {
            return mean;
        }
        let z = self.draws[self.next % self.draws.len()];
        self.next += 1;
        mean + std_dev * z
    }
}
