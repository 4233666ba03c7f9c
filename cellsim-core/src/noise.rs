//! Angular noise sources.
//!
//! The engine draws exactly one value per moving agent per tick, in
//! ascending agent order, so a seeded source makes runs reproducible.

/// Uniform draws in `[-1, 1)`.
pub trait NoiseSource {
    fn next_symmetric(&mut self) -> f64;
}

#[cfg(feature = "std")]
impl<R: rand::Rng + ?Sized> NoiseSource for R {
    fn next_symmetric(&mut self) -> f64 {
        self.gen_range(-1.0..1.0)
    }
}

/// Small linear congruential generator for targets without `rand`.
///
/// Not suitable for anything beyond simulation noise.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        // Knuth's MMIX constants
        const A: u64 = 6364136223846793005;
        const C: u64 = 1442695040888963407;

        self.state = self.state.wrapping_mul(A).wrapping_add(C);
        self.state
    }

    /// Float in `[0, 1)` built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl NoiseSource for Lcg {
    fn next_symmetric(&mut self) -> f64 {
        self.next_f64() * 2.0 - 1.0
    }
}

/// Always returns zero; turns noise off regardless of amplitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl NoiseSource for Silent {
    fn next_symmetric(&mut self) -> f64 {
        0.0
    }
}
