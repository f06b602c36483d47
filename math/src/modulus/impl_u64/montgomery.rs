use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::montgomery::{Montgomery, MontgomeryPrecomp};
use crate::modulus::{ONCE, REDUCEMOD};

impl MontgomeryPrecomp<u64> {
    /// q must be odd.
    pub fn new(q: u64) -> MontgomeryPrecomp<u64> {
        debug_assert!(q & 1 == 1, "gcd(q={}, 2^64) != 1", q);
        // Newton iteration: each step doubles the number of correct low bits.
        let mut q_inv: u64 = q;
        for _ in 0..5 {
            q_inv = q_inv.wrapping_mul(2u64.wrapping_sub(q.wrapping_mul(q_inv)));
        }
        let mut precomp: MontgomeryPrecomp<u64> = Self {
            q,
            barrett: BarrettPrecomp::new(q),
            q_inv,
            one: 0,
        };
        precomp.one = precomp.prepare::<ONCE>(1);
        precomp
    }

    #[inline(always)]
    pub fn one(&self) -> Montgomery<u64> {
        self.one
    }

    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        self.barrett.reduce_assign::<REDUCE>(x)
    }

    /// Returns lhs * 2^64 mod q.
    #[inline(always)]
    pub fn prepare<const REDUCE: REDUCEMOD>(&self, lhs: u64) -> Montgomery<u64> {
        let mut rhs: Montgomery<u64> = 0;
        self.prepare_assign::<REDUCE>(lhs, &mut rhs);
        rhs
    }

    #[inline(always)]
    pub fn prepare_assign<const REDUCE: REDUCEMOD>(&self, lhs: u64, rhs: &mut Montgomery<u64>) {
        *rhs = (((lhs as u128) << 64) % self.q as u128) as u64;
        self.reduce_assign::<REDUCE>(rhs);
    }

    /// Returns lhs * 2^-64 mod q.
    #[inline(always)]
    pub fn unprepare<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>) -> u64 {
        self.mul_external::<REDUCE>(lhs, 1)
    }

    /// Returns lhs * rhs * 2^-64 mod q.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: u64) -> u64 {
        let mut r: u64 = rhs;
        self.mul_external_assign::<REDUCE>(lhs, &mut r);
        r
    }

    /// Assigns lhs * rhs * 2^-64 mod q to rhs, in [0, 2q) before the REDUCE
    /// step.
    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(
        &self,
        lhs: Montgomery<u64>,
        rhs: &mut u64,
    ) {
        let m: u128 = lhs as u128 * *rhs as u128;
        let (mlo, mhi) = (m as u64, (m >> 64) as u64);
        let hhi: u64 = ((self.q as u128 * mlo.wrapping_mul(self.q_inv) as u128) >> 64) as u64;
        *rhs = mhi.wrapping_sub(hhi).wrapping_add(self.q);
        self.reduce_assign::<REDUCE>(rhs);
    }

    /// Returns x^exponent in Montgomery form.
    pub fn pow(&self, x: Montgomery<u64>, exponent: u64) -> Montgomery<u64> {
        let mut y: Montgomery<u64> = self.one();
        let mut x: Montgomery<u64> = x;
        let mut e: u64 = exponent;
        while e > 0 {
            if e & 1 == 1 {
                self.mul_external_assign::<ONCE>(x, &mut y);
            }
            let sq: Montgomery<u64> = x;
            self.mul_external_assign::<ONCE>(sq, &mut x);
            e >>= 1;
        }
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_inv() {
        for q in [17u64, 65537, 0x1fffffffffe00001] {
            let precomp = MontgomeryPrecomp::<u64>::new(q);
            assert_eq!(q.wrapping_mul(precomp.q_inv), 1, "q={}", q);
        }
    }

    #[test]
    fn mul_external() {
        let q: u64 = 0x1fffffffffe00001;
        let precomp = MontgomeryPrecomp::<u64>::new(q);
        let x: u64 = 0x5f876e514845cc8b;
        let y: u64 = 0x0d726f98f24a761a;
        assert_eq!(
            precomp.mul_external::<ONCE>(precomp.prepare::<ONCE>(y), x),
            (x as u128 * y as u128 % q as u128) as u64
        );
    }

    #[test]
    fn prepare_unprepare() {
        let q: u64 = 65537;
        let precomp = MontgomeryPrecomp::<u64>::new(q);
        for x in [0u64, 1, 2, 12345, q - 1] {
            assert_eq!(precomp.unprepare::<ONCE>(precomp.prepare::<ONCE>(x)), x);
        }
    }

    #[test]
    fn pow() {
        let q: u64 = 65537;
        let precomp = MontgomeryPrecomp::<u64>::new(q);
        let three: Montgomery<u64> = precomp.prepare::<ONCE>(3);
        // 3 generates Z_65537^*.
        assert_eq!(precomp.unprepare::<ONCE>(precomp.pow(three, q - 1)), 1);
        assert_eq!(precomp.unprepare::<ONCE>(precomp.pow(three, (q - 1) >> 1)), q - 1);
    }
}
