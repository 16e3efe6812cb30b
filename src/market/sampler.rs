use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::market::types::{Capacity, Resource};

/// Draws a fresh size uniformly from `[1, max_capacity]`.
pub fn resample<R: Rng + ?Sized>(resource: &mut Resource, max_capacity: Capacity, rng: &mut R) {
    resource.size = rng.gen_range(1..=max_capacity.max(1));
}

/// Source of randomness for every probe a comparator makes.
pub trait SizeSampler {
    /// Called each time a comparator probes `resource`.
    fn resample(&mut self, resource: &mut Resource, max_capacity: Capacity);

    /// Picks an index in `0..len`. `len` is never zero.
    fn choose(&mut self, len: usize) -> usize;
}

#[derive(Debug, Clone)]
pub struct UniformSampler<R> {
    rng: R,
}

impl<R: Rng> UniformSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl UniformSampler<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SizeSampler for UniformSampler<R> {
    fn resample(&mut self, resource: &mut Resource, max_capacity: Capacity) {
        resample(resource, max_capacity, &mut self.rng);
    }

    fn choose(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Zero-variance sampler: sizes never move and choices walk the pool in order.
#[derive(Debug, Clone, Default)]
pub struct FixedSampler {
    next_choice: usize,
    probes: u64,
}

impl FixedSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probes(&self) -> u64 {
        self.probes
    }
}

impl SizeSampler for FixedSampler {
    fn resample(&mut self, _resource: &mut Resource, _max_capacity: Capacity) {
        self.probes += 1;
    }

    fn choose(&mut self, len: usize) -> usize {
        let index = self.next_choice % len;
        self.next_choice = self.next_choice.wrapping_add(1);
        index
    }
}
