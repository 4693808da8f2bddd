//! Seedable randomness for particle creation and overlay jitter.
//!
//! The simulation never touches an ambient global generator. It draws from a
//! [`RandomSource`] handed to it at construction, normally an
//! [`Xorshift64`] seeded from the controller configuration, so every frame
//! sequence is reproducible from a single `u64`.

/// A source of uniform random numbers.
///
/// Object-safe so the simulation can hold a `Box<dyn RandomSource>` and tests
/// can substitute a fixed sequence.
pub trait RandomSource {
    /// Returns a uniformly distributed f64 in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Returns a uniformly distributed f64 in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed f64 in [-1, 1).
    fn next_signed(&mut self) -> f64 {
        (self.next_f64() - 0.5) * 2.0
    }
}

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Shift parameters (13, 7, 17). Seed 0 is replaced with a non-zero fallback
/// to avoid the all-zeros fixed point.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;
    const FORK_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Derives an independent generator from the next value of this one.
    ///
    /// Used to give each restarted simulation its own stream while the
    /// controller stays reproducible from its configured seed.
    pub fn fork(&mut self) -> Xorshift64 {
        // child must not replay the parent stream shifted by one
        Xorshift64::new(self.next_u64() ^ Self::FORK_MIX)
    }
}

impl RandomSource for Xorshift64 {
    /// Upper 53 bits of `next_u64()` divided by 2^53.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of values in a cycle.
///
/// Handy in tests where an overlay's jitter or a particle's spawn point must
/// be pinned. An empty list yields 0.5 forever.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    /// Values outside [0, 1) are clamped into it.
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0 - f64::EPSILON) })
            .collect();
        Self { values, cursor: 0 }
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v
    }
}
