use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rand_core::RngCore;

/// Deterministic ChaCha8 stream. Two sources built from the same seed
/// produce the same values.
pub struct Source {
    source: ChaCha8Rng,
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    pub fn branch(&mut self) -> ([u8; 32], Self) {
        let seed: [u8; 32] = self.new_seed();
        (seed, Source::new(seed))
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.fill_bytes(&mut seed);
        seed
    }

    /// Rejection-samples a value in [0, max) from the masked stream.
    /// mask must cover max - 1.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    /// Returns a uniform value in [0, max).
    #[inline(always)]
    pub fn next_u64_below(&mut self, max: u64) -> u64 {
        debug_assert!(max > 0, "max must be non-zero");
        let mask: u64 = max.next_power_of_two().wrapping_sub(1) | (max - 1);
        self.next_u64n(max, mask)
    }

    /// Fills a with uniform values in [0, max).
    pub fn fill_u64_below(&mut self, max: u64, a: &mut [u64]) {
        a.iter_mut().for_each(|x| *x = self.next_u64_below(max));
    }

    #[inline(always)]
    pub fn next_bool(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Source = Source::new([7u8; 32]);
        let mut b: Source = Source::new([7u8; 32]);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        let (seed, mut c) = a.branch();
        let mut d: Source = Source::new(seed);
        assert_eq!(c.next_u64(), d.next_u64());
    }

    #[test]
    fn below_stays_in_range() {
        let mut source: Source = Source::new([1u8; 32]);
        for max in [1u64, 2, 3, 17, 65537, 0x1fffffffffe00001] {
            for _ in 0..64 {
                assert!(source.next_u64_below(max) < max);
            }
        }
        let mut buf: Vec<u64> = vec![0; 32];
        source.fill_u64_below(5, &mut buf);
        assert!(buf.iter().all(|x| *x < 5));
    }
}
