use crate::error::VmError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

/// A signed table slot, the ring monomial X^raw = ±X^slot.
///
/// The raw form lives in [0, 2N): raw < N is (raw, +) and raw >= N is
/// (raw - N, -), since X^N = -1 in the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    raw: u64,
    n: usize,
}

impl Address {
    pub fn new(slot: usize, sign: Sign, n: usize) -> Result<Self, VmError> {
        if slot >= n {
            return Err(VmError::AddressOutOfRange {
                raw: slot as u64,
                limit: n as u64,
            });
        }
        let raw: u64 = match sign {
            Sign::Positive => slot as u64,
            Sign::Negative => (slot + n) as u64,
        };
        Ok(Self { raw, n })
    }

    /// Fails if raw is not in [0, 2N).
    pub fn from_raw(raw: u64, n: usize) -> Result<Self, VmError> {
        let limit: u64 = (n as u64) << 1;
        if raw >= limit {
            return Err(VmError::AddressOutOfRange { raw, limit });
        }
        Ok(Self { raw, n })
    }

    /// Reduces raw mod 2N. Used for addresses derived from data values.
    pub fn from_raw_wrapping(raw: u64, n: usize) -> Self {
        Self {
            raw: raw % ((n as u64) << 1),
            n,
        }
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn slot(&self) -> usize {
        self.raw as usize % self.n
    }

    pub fn sign(&self) -> Sign {
        if (self.raw as usize) < self.n {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    /// Returns X^-raw.
    pub fn inverse(&self) -> Self {
        let two_n: u64 = (self.n as u64) << 1;
        Self {
            raw: (two_n - self.raw) % two_n,
            n: self.n,
        }
    }

    /// Returns X^(raw + other.raw).
    pub fn compose(&self, other: &Address) -> Self {
        debug_assert_eq!(self.n, other.n, "addresses from different rings");
        Self::from_raw_wrapping(self.raw + other.raw, self.n)
    }
}
