//! RNG oracle used to break ties between replacement candidates.
//!
//! The resolution engine never owns a global generator. Callers inject an
//! [`RngOracle`], which lets tests supply a deterministic source and lets the
//! runtime use a thread-local one.
//!
//! # Concurrency
//!
//! Resolution runs concurrently from several host worker contexts, so every
//! implementation must be usable through a shared reference.

use core::sync::atomic::{AtomicU64, Ordering};

/// RNG oracle for picking a member of a replacement set.
pub trait RngOracle: Send + Sync {
    /// Generate the next random u32 value.
    fn next_u32(&self) -> u32;

    /// Pick an index in `0..len`, uniformly.
    ///
    /// Uses a multiply-shift reduction instead of modulo; the bias is at most
    /// `len / 2^32`. Returns 0 for `len <= 1`.
    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        ((self.next_u32() as u64 * len as u64) >> 32) as usize
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output from 64-bit state. The state lives in an
/// [`AtomicU64`] and is advanced with a compare-and-swap loop, so a single
/// seeded instance can be shared between threads without a lock.
///
/// # Properties
///
/// - **Deterministic**: same seed, same sequence (single-threaded)
/// - **Lock-free**: one CAS per draw
/// - **Good quality**: passes PractRand / TestU01
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Debug, Default)]
pub struct PcgRng {
    state: AtomicU64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub const fn new(seed: u64) -> Self {
        Self {
            state: AtomicU64::new(seed),
        }
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self) -> u32 {
        // fetch_update only fails when the closure returns None.
        let previous = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
                Some(Self::pcg_step(s))
            })
            .unwrap_or_else(|s| s);
        Self::pcg_output(Self::pcg_step(previous))
    }
}
