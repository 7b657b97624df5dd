//! Seeded Random Streams
//!
//! All randomness of a generation run flows through a [`RandomSource`]. The
//! seeded implementation keeps one independent ChaCha stream per logical
//! quantity, keyed by `(seed, run, stream)`, so adding draws to one quantity
//! never shifts the sequence seen by another.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::debug;

/// Logical random quantity
///
/// The discriminants are stream numbers: append new variants, never reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RandomStream {
    /// Lower x bound of candidate femtocell blocks
    BlockX = 0,
    /// Lower y bound of candidate femtocell blocks
    BlockY = 1,
    /// Macro UE x position
    MacroUeX = 2,
    /// Macro UE y position
    MacroUeY = 3,
    /// Macro UE z position
    MacroUeZ = 4,
    /// Choice of the room hosting a home eNB
    HomeEnbRoom = 5,
    /// Home eNB position inside its room
    HomeEnbPosition = 6,
    /// Home UE position inside its room
    HomeUePosition = 7,
}

impl RandomStream {
    /// Stable stream number
    pub fn index(&self) -> u64 {
        *self as u64
    }
}

/// Source of uniformly distributed draws, one logical stream per quantity
pub trait RandomSource {
    /// Draw a real uniformly from `[min, max)`; returns `min` when `min == max`
    fn next_uniform(&mut self, stream: RandomStream, min: f64, max: f64) -> f64;

    /// Draw an index uniformly from `0..len`
    fn next_index(&mut self, stream: RandomStream, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let value = self.next_uniform(stream, 0.0, len as f64);
        (value as usize).min(len - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self, stream: RandomStream, min: f64, max: f64) -> f64 {
        (**self).next_uniform(stream, min, max)
    }

    fn next_index(&mut self, stream: RandomStream, len: usize) -> usize {
        (**self).next_index(stream, len)
    }
}

/// Reproducible random source for a `(seed, run)` pair
#[derive(Debug, Clone)]
pub struct SeededRandomSource {
    seed: u64,
    run: u32,
    streams: HashMap<RandomStream, ChaCha8Rng>,
}

impl SeededRandomSource {
    /// Create a new source; streams are instantiated lazily on first use
    pub fn new(seed: u64, run: u32) -> Self {
        debug!("Creating random source with seed={}, run={}", seed, run);
        Self {
            seed,
            run,
            streams: HashMap::new(),
        }
    }

    /// Base seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run number
    pub fn run(&self) -> u32 {
        self.run
    }

    fn stream_rng(&mut self, stream: RandomStream) -> &mut ChaCha8Rng {
        let seed = self.seed;
        let run = self.run;
        self.streams.entry(stream).or_insert_with(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream((u64::from(run) << 32) | stream.index());
            rng
        })
    }
}

impl RandomSource for SeededRandomSource {
    fn next_uniform(&mut self, stream: RandomStream, min: f64, max: f64) -> f64 {
        let u: f64 = self.stream_rng(stream).gen();
        min + u * (max - min)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted source returning fixed unit values per stream
    ///
    /// Each scripted value `u` in `[0, 1)` is mapped to `min + u * (max - min)`.
    /// Once a stream's script is exhausted its last value repeats forever;
    /// unscripted streams return `min`.
    #[derive(Debug, Default)]
    pub struct ScriptedSource {
        scripts: HashMap<RandomStream, VecDeque<f64>>,
        last: HashMap<RandomStream, f64>,
        draws: HashMap<RandomStream, u32>,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_script(mut self, stream: RandomStream, values: &[f64]) -> Self {
            self.scripts.entry(stream).or_default().extend(values.iter().copied());
            self
        }

        pub fn draws(&self, stream: RandomStream) -> u32 {
            self.draws.get(&stream).copied().unwrap_or(0)
        }
    }

    impl RandomSource for ScriptedSource {
        fn next_uniform(&mut self, stream: RandomStream, min: f64, max: f64) -> f64 {
            *self.draws.entry(stream).or_insert(0) += 1;
            let u = match self.scripts.get_mut(&stream).and_then(|s| s.pop_front()) {
                Some(u) => {
                    self.last.insert(stream, u);
                    u
                }
                None => self.last.get(&stream).copied().unwrap_or(0.0),
            };
            min + u * (max - min)
        }
    }
}
