use math::poly::{Eval, EvalMont, Poly};
use math::ring::Ring;

use crate::address::{Address, Sign};
use crate::bootstrap::AddressEncoder;
use crate::oblivious::Scratch;

/// One-hot program counter, always ±X^slot in the evaluation domain.
#[derive(Clone, Debug)]
pub struct Counter {
    poly: Poly<Eval>,
    mont: Poly<EvalMont>,
}

impl Counter {
    /// Returns the counter at slot 0.
    pub fn new(ring: &Ring<u64>) -> Self {
        Self::at(ring, Address::from_raw_wrapping(0, ring.n()))
    }

    pub fn at(ring: &Ring<u64>, address: Address) -> Self {
        Self {
            poly: ring.bootstrap(address),
            mont: ring.new_poly(),
        }
    }

    /// The counter as a read selector.
    pub fn selector(&self) -> &Poly<Eval> {
        &self.poly
    }

    /// Multiplies the counter by delta = NTT(X^k), moving it k slots.
    pub fn advance(&mut self, ring: &Ring<u64>, delta: &Poly<Eval>) {
        ring.prepare_montgomery(&self.poly, &mut self.mont);
        ring.mul_montgomery_external(&self.mont, delta, &mut self.poly);
    }

    /// Returns true if coefficient slot of the counter is non-zero.
    pub fn is_at(&self, ring: &Ring<u64>, slot: usize, scratch: &mut Scratch) -> bool {
        ring.intt(&self.poly, &mut scratch.coeff);
        scratch.coeff.coeffs()[slot] != 0
    }

    /// Decodes the counter position. Scans every coefficient; meant for
    /// logging and inspection, not for the cycle itself.
    pub fn position(&self, ring: &Ring<u64>, scratch: &mut Scratch) -> Address {
        ring.intt(&self.poly, &mut scratch.coeff);
        let n: usize = ring.n();
        let mut raw: u64 = 0;
        for (slot, c) in scratch.coeff.coeffs().iter().enumerate() {
            if *c == 1 {
                raw = slot as u64;
            } else if *c != 0 {
                raw = (slot + n) as u64;
            }
        }
        Address::from_raw_wrapping(raw, n)
    }

    pub fn sign(&self, ring: &Ring<u64>, scratch: &mut Scratch) -> Sign {
        self.position(ring, scratch).sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_composes() {
        let ring: Ring<u64> = Ring::<u64>::new(16, 65537).unwrap();
        let mut scratch: Scratch = Scratch::new(&ring);
        for (d1, d2) in [(1u64, 2u64), (15, 1), (20, 13), (31, 31), (0, 7)] {
            let mut a: Counter = Counter::new(&ring);
            a.advance(&ring, &ring.bootstrap_raw(d1).unwrap());
            a.advance(&ring, &ring.bootstrap_raw(d2).unwrap());

            let mut b: Counter = Counter::new(&ring);
            let sum: Address = Address::from_raw_wrapping(d1 + d2, 16);
            b.advance(&ring, &ring.bootstrap(sum));

            assert_eq!(a.selector(), b.selector(), "d1={} d2={}", d1, d2);
            assert_eq!(a.position(&ring, &mut scratch), sum);
            assert!(a.is_at(&ring, sum.slot(), &mut scratch));
        }
    }

    #[test]
    fn wraps_into_negated_half() {
        let ring: Ring<u64> = Ring::<u64>::new(8, 17).unwrap();
        let mut scratch: Scratch = Scratch::new(&ring);
        let mut c: Counter = Counter::at(&ring, Address::from_raw(6, 8).unwrap());
        c.advance(&ring, &ring.bootstrap_raw(3).unwrap());
        assert_eq!(c.position(&ring, &mut scratch).raw(), 9);
        assert_eq!(c.sign(&ring, &mut scratch), Sign::Negative);
        assert!(c.is_at(&ring, 1, &mut scratch));
        assert!(!c.is_at(&ring, 0, &mut scratch));
    }
}
