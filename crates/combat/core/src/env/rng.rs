//! Injected randomness for combat rolls.
//!
//! The combat resolver never owns a generator. Callers pass a
//! [`RandomSource`], which keeps resolution deterministic under test and
//! replayable from a seed.
//!
//! # Determinism
//!
//! Given the same seed, [`PcgSource`] yields the same sequence of rolls, and
//! the resolver consumes rolls in a fixed order, so a seeded fight replays
//! exactly.

/// Source of uniform rolls in `[0, 1)`.
pub trait RandomSource {
    /// Next roll in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Seeded PCG generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgSource {
    state: u64,
}

impl PcgSource {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: mix_seed(seed),
        }
    }

    /// Derive an independent stream, e.g. one per actor.
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        Self::new(seed ^ stream.wrapping_mul(0x9e3779b97f4a7c15))
    }

    /// Advance the state and return 32 random bits.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        Self::output(self.state)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for PcgSource {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Scripted rolls for tests and replays.
///
/// Rolls are returned in order and the script repeats once exhausted. An
/// empty script always rolls `0.0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedRolls {
    rolls: Vec<f64>,
    cursor: usize,
}

impl FixedRolls {
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls
                .into_iter()
                .map(|roll| roll.clamp(0.0, MAX_ROLL))
                .collect(),
            cursor: 0,
        }
    }

    /// Every roll is `roll`.
    pub fn constant(roll: f64) -> Self {
        Self::new([roll])
    }

    /// Number of rolls consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedRolls {
    fn next_f64(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }
}

/// Largest `f64` strictly below one.
const MAX_ROLL: f64 = 1.0 - f64::EPSILON / 2.0;

/// SplitMix64 finalizer, so nearby seeds start far apart.
fn mix_seed(seed: u64) -> u64 {
    let mut hash = seed.wrapping_add(0x9e3779b97f4a7c15);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
    hash ^= hash >> 33;
    hash
}
