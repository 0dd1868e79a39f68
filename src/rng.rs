use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Master-seeded RNG handing out one independent named stream per content
/// kind. Each stream's seed is a pure function of the master seed and the
/// stream name, so draws for one kind never disturb the draws of another and
/// the order in which streams are first touched does not matter.
pub struct RngManager {
    seed: u64,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            streams: HashMap::new(),
        }
    }

    pub fn stream(&mut self, name: &str) -> StreamRng<'_> {
        let seed = self.seed;
        let entry = self
            .streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha8Rng::from_seed(derive_stream_seed(seed, name)));
        StreamRng { inner: entry }
    }

    /// Rewind every stream to its initial state. A reloaded level replays
    /// the same placements as a fresh run with the same seed.
    pub fn reset(&mut self) {
        self.streams.clear();
    }
}

/// 32-byte ChaCha seed: the master seed in the first word, the stream name
/// position-folded into the rest.
fn derive_stream_seed(seed: u64, name: &str) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    for (i, b) in name.bytes().enumerate() {
        bytes[8 + i % 24] ^= b.rotate_left((i % 7) as u32);
    }
    bytes
}

pub struct StreamRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for StreamRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
