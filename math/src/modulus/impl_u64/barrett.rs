use crate::modulus::barrett::{Barrett, BarrettPrecomp};
use crate::modulus::ReduceOnce;
use crate::modulus::{BARRETT, NONE, ONCE, REDUCEMOD};

impl BarrettPrecomp<u64> {
    pub fn new(q: u64) -> BarrettPrecomp<u64> {
        debug_assert!(q > 1 && q & 1 == 1, "invalid q={}: must be odd", q);
        // q odd, so floor((2^64-1)/q) == floor(2^64/q).
        Self {
            q,
            ratio: u64::MAX / q,
        }
    }

    /// Reduces x according to REDUCE (see [`crate::modulus::REDUCEMOD`]).
    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            BARRETT => {
                // x - floor(x * ratio / 2^64) * q lies in [0, 2q).
                let mhi: u64 = ((*x as u128 * self.ratio as u128) >> 64) as u64;
                *x -= mhi.wrapping_mul(self.q);
                x.reduce_once_assign(self.q);
            }
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: &u64) -> u64 {
        let mut r: u64 = *x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    /// Prepares v in [0, q) as a Shoup constant.
    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Barrett<u64> {
        debug_assert!(v < self.q, "v={} >= q={}", v, self.q);
        Barrett(v, (((v as u128) << 64) / self.q as u128) as u64)
    }

    /// Returns lhs * rhs mod q, in [0, 2q) before the REDUCE step.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: &Barrett<u64>, rhs: &u64) -> u64 {
        let mut r: u64 = *rhs;
        self.mul_external_assign::<REDUCE>(lhs, &mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: &Barrett<u64>, rhs: &mut u64) {
        let t: u64 = ((*lhs.quotient() as u128 * *rhs as u128) >> 64) as u64;
        *rhs = rhs
            .wrapping_mul(*lhs.value())
            .wrapping_sub(self.q.wrapping_mul(t));
        self.reduce_assign::<REDUCE>(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: u64 = 0x1fffffffffe00001;

    #[test]
    fn reduce_full_range() {
        let precomp: BarrettPrecomp<u64> = BarrettPrecomp::new(Q);
        for x in [0u64, 1, Q - 1, Q, Q + 7, 3 * Q + 5, u64::MAX] {
            assert_eq!(precomp.reduce::<BARRETT>(&x), x % Q, "x={}", x);
        }
        assert_eq!(precomp.reduce::<ONCE>(&(Q + 3)), 3);
        assert_eq!(precomp.reduce::<NONE>(&(Q + 3)), Q + 3);
    }

    #[test]
    fn shoup_product() {
        let precomp: BarrettPrecomp<u64> = BarrettPrecomp::new(Q);
        let x: u64 = 0x5f876e514845cc8b;
        let y: u64 = 0x0d726f98f24a761a;
        assert_eq!(
            precomp.mul_external::<ONCE>(&precomp.prepare(y), &x),
            (x as u128 * y as u128 % Q as u128) as u64
        );
    }
}
