//! Random sources for the runtime.

use rand::{Rng, RngCore};
use swap_core::RngOracle;

/// [`RngOracle`] backed by the calling thread's own generator.
///
/// Stateless from the caller's point of view: every thread draws from its own
/// `rand::thread_rng()`, so concurrent lookups never contend.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RngOracle for ThreadRandom {
    fn next_u32(&self) -> u32 {
        rand::thread_rng().next_u32()
    }

    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}
