//! Deterministic sampling context.
//!
//! All randomness in the generator flows through [`SamplingContext`]. A context is
//! never shared between records: each (stream name, record id) pair gets its own
//! ChaCha stream seeded from a Blake2 hash of the key and the global seed. Record ids
//! are positional, so draws for one patient never depend on the order in which other
//! patients are processed, and adding a new stream leaves existing streams untouched.

use blake2::{Blake2b512, Digest};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::RangeInclusive;

/// Weighted table entry: value and its relative weight.
pub type Weighted<T> = (T, f64);

#[derive(Debug, Clone)]
pub struct SamplingContext {
    rng: ChaCha8Rng,
}

impl SamplingContext {
    /// Context seeded directly from an integer seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Derive an independent stream from the global seed and a stable key.
    ///
    /// The key and seed are concatenated and hashed; the first 32 bytes of the hash
    /// seed the stream. The same key always yields the same sequence.
    pub fn derive(global_seed: u64, key: &str) -> Self {
        let message = format!("{key}/{global_seed}");
        let mut hasher = Blake2b512::new();
        hasher.update(message.as_bytes());
        let digest = hasher.finalize();
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest[..32]);
        Self {
            rng: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Stream for one record (patient, encounter, study) within a named stage.
    pub fn for_record(global_seed: u64, stream: &str, record_id: &str) -> Self {
        Self::derive(global_seed, &format!("{stream}/{record_id}"))
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Bernoulli trial with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    pub fn int_in(&mut self, range: RangeInclusive<i64>) -> i64 {
        self.rng.gen_range(range)
    }

    pub fn usize_in(&mut self, range: RangeInclusive<usize>) -> usize {
        self.rng.gen_range(range)
    }

    /// Uniform float in `[low, high]`.
    pub fn float_in(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + (high - low) * self.uniform()
    }

    /// Uniform choice from a non-empty slice.
    ///
    /// # Panics
    /// Panics if `items` is empty. All callers pass static catalogs.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let index = self.rng.gen_range(0..items.len());
        &items[index]
    }

    /// Weighted choice by cumulative weight. Weights need not sum to one.
    ///
    /// # Panics
    /// Panics if `table` is empty.
    pub fn weighted<'a, T>(&mut self, table: &'a [Weighted<T>]) -> &'a T {
        let total: f64 = table.iter().map(|(_, w)| w).sum();
        let mut target = self.uniform() * total;
        for (value, weight) in table {
            if target < *weight {
                return value;
            }
            target -= weight;
        }
        &table[table.len() - 1].0
    }

    /// Up to `amount` distinct elements, in sampled order.
    pub fn sample<T: Clone>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        items
            .choose_multiple(&mut self.rng, amount.min(items.len()))
            .cloned()
            .collect()
    }

    /// Random decimal digits, e.g. for MRN and NPI numbers.
    pub fn digits(&mut self, count: usize) -> String {
        let mut out = String::with_capacity(count);
        out.push(char::from(b'1' + self.rng.gen_range(0..9u8)));
        for _ in 1..count {
            out.push(char::from(b'0' + self.rng.gen_range(0..10u8)));
        }
        out
    }
}
