use crate::error::RingError;
use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::montgomery::{Montgomery, MontgomeryPrecomp};
use crate::modulus::prime::Prime;
use crate::modulus::ONCE;
use primality_test::is_prime;
use prime_factorization::Factorization;

impl Prime<u64> {
    /// Fails if q is not an odd prime smaller than 2^61.
    pub fn new(q: u64) -> Result<Self, RingError> {
        if q >= 1 << 61 {
            return Err(RingError::ModulusTooLarge(q));
        }
        if q <= 2 || !is_prime(q) {
            return Err(RingError::NotPrime(q));
        }

        let factors: Vec<u64> = Factorization::run(q - 1)
            .prime_factor_repr()
            .iter()
            .map(|factor| factor.0)
            .collect();

        Ok(Self {
            q,
            factors,
            montgomery: MontgomeryPrecomp::new(q),
            barrett: BarrettPrecomp::new(q),
            phi: q - 1,
        })
    }

    pub fn q(&self) -> u64 {
        self.q
    }

    /// Returns x^exponent mod q.
    #[inline(always)]
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let x_mont: Montgomery<u64> = self.montgomery.prepare::<ONCE>(x);
        self.montgomery
            .unprepare::<ONCE>(self.montgomery.pow(x_mont, exponent))
    }

    /// Returns x^-1 mod q.
    /// User must ensure that x is not divisible by q.
    #[inline(always)]
    pub fn inv(&self, x: u64) -> u64 {
        debug_assert!(x % self.q != 0, "x={} is not invertible mod q={}", x, self.q);
        self.pow(x, self.phi - 1)
    }

    /// Returns a * b mod q for a, b in [0, q-1].
    #[inline(always)]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        self.barrett
            .mul_external::<ONCE>(&self.barrett.prepare(a), &b)
    }
}

impl Prime<u64> {
    /// Returns the smallest generator of Z_q^*.
    pub fn primitive_root(&self) -> u64 {
        (2..self.q)
            .find(|&candidate| {
                self.factors
                    .iter()
                    .all(|&factor| self.pow(candidate, self.phi / factor) != 1)
            })
            .unwrap_or_else(|| unreachable!("Z_q^* is cyclic for prime q={}", self.q))
    }

    /// Returns a primitive nth_root-th root of unity mod q.
    /// Fails if nth_root does not divide q-1.
    pub fn primitive_nth_root(&self, nth_root: u64) -> Result<u64, RingError> {
        if nth_root == 0 || self.phi % nth_root != 0 {
            return Err(RingError::NoNttSupport {
                q: self.q,
                nth_root,
            });
        }

        let psi: u64 = self.pow(self.primitive_root(), self.phi / nth_root);

        debug_assert!(
            self.pow(psi, nth_root) == 1,
            "invalid nth primitive root: psi^nth_root != 1 mod q"
        );
        debug_assert!(
            nth_root < 2 || self.pow(psi, nth_root >> 1) == self.q - 1,
            "invalid nth primitive root: psi^(nth_root/2) != -1 mod q"
        );

        Ok(psi)
    }
}
