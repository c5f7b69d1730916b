#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Generators for simulated values.
//!
//! Hospital occupancy and hotspot intensity have no real data source, so
//! the server fills them in from a [`ValueGenerator`]. Production uses
//! [`RandomGenerator`]; tests inject [`FixedGenerator`] or
//! [`SequenceGenerator`] to get predictable output.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng as _;

/// Range for simulated hospital occupancy, in percent.
pub const OCCUPANCY_RANGE: RangeInclusive<u32> = 0..=100;

/// Range for simulated hotspot intensity.
pub const INTENSITY_RANGE: RangeInclusive<u32> = 1..=10;

/// Source of simulated integer values.
pub trait ValueGenerator: Send + Sync {
    /// Returns a value inside `range`.
    fn sample(&self, range: RangeInclusive<u32>) -> u32;
}

/// Uniformly random values from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl ValueGenerator for RandomGenerator {
    fn sample(&self, range: RangeInclusive<u32>) -> u32 {
        if range.is_empty() {
            return *range.start();
        }
        rand::thread_rng().gen_range(range)
    }
}

/// Always returns the same value, clamped into the requested range.
#[derive(Debug, Clone, Copy)]
pub struct FixedGenerator(pub u32);

impl ValueGenerator for FixedGenerator {
    fn sample(&self, range: RangeInclusive<u32>) -> u32 {
        clamp(self.0, &range)
    }
}

/// Cycles through a list of values, each clamped into the requested
/// range. An empty list behaves like `FixedGenerator(0)`.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    values: Vec<u32>,
    next: AtomicUsize,
}

impl SequenceGenerator {
    /// Creates a generator that yields `values` in order, then repeats.
    #[must_use]
    pub const fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            next: AtomicUsize::new(0),
        }
    }
}

impl ValueGenerator for SequenceGenerator {
    fn sample(&self, range: RangeInclusive<u32>) -> u32 {
        if self.values.is_empty() {
            return clamp(0, &range);
        }
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.values.len();
        clamp(self.values[idx], &range)
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    if range.is_empty() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}
