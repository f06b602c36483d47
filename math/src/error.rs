/// Errors raised while building a ring or handling ring elements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// Ring degree is not a power of two greater than one.
    #[error("invalid ring degree n={0}: must be a power of two >= 2")]
    InvalidDegree(usize),
    /// Modulus is not an odd prime.
    #[error("invalid modulus q={0}: not an odd prime")]
    NotPrime(u64),
    /// Modulus does not leave enough headroom for lazy reductions.
    #[error("invalid modulus q={0}: must be smaller than 2^61")]
    ModulusTooLarge(u64),
    /// Modulus has no primitive root of the order the transform needs.
    #[error("modulus q={q} does not support an NTT of size {nth_root}: q != 1 mod {nth_root}")]
    NoNttSupport { q: u64, nth_root: u64 },
}
