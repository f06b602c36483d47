use crate::modulus::montgomery::Montgomery;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::modulus::REDUCEMOD;
use crate::modulus::{ScalarOperations, VectorOperations};
use itertools::izip;

impl ScalarOperations<u64> for Prime<u64> {
    #[inline(always)]
    fn sa_reduce_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut u64) {
        self.montgomery.reduce_assign::<REDUCE>(a);
    }

    #[inline(always)]
    fn sa_add_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        *c = a.wrapping_add(*b);
        self.sa_reduce_into_sa::<REDUCE>(c);
    }

    #[inline(always)]
    fn sa_sub_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &u64, c: &mut u64) {
        debug_assert!(*b < self.q, "b={} >= q={}", b, self.q);
        *c = a.wrapping_add(self.q - *b);
        self.sa_reduce_into_sa::<REDUCE>(c);
    }

    #[inline(always)]
    fn sa_neg_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        debug_assert!(*a < self.q, "a={} >= q={}", a, self.q);
        *b = self.q - *a;
        self.sa_reduce_into_sa::<REDUCE>(b);
    }

    #[inline(always)]
    fn sa_prepare_montgomery_into_sb<const REDUCE: REDUCEMOD>(
        &self,
        a: &u64,
        b: &mut Montgomery<u64>,
    ) {
        self.montgomery.prepare_assign::<REDUCE>(*a, b);
    }

    #[inline(always)]
    fn sa_mul_sb_montgomery_into_sc<const REDUCE: REDUCEMOD>(
        &self,
        a: &u64,
        b: &Montgomery<u64>,
        c: &mut u64,
    ) {
        *c = self.montgomery.mul_external::<REDUCE>(*b, *a);
    }
}

impl VectorOperations<u64> for Prime<u64> {
    #[inline(always)]
    fn va_add_vb_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &[u64], c: &mut [u64]) {
        debug_assert!(a.len() == c.len() && b.len() == c.len());
        izip!(a, b, c).for_each(|(a, b, c)| self.sa_add_sb_into_sc::<REDUCE>(a, b, c));
    }

    #[inline(always)]
    fn va_add_vb_into_vb<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &mut [u64]) {
        debug_assert!(a.len() == b.len());
        izip!(a, b).for_each(|(a, b)| {
            *b = a.wrapping_add(*b);
            self.sa_reduce_into_sa::<REDUCE>(b)
        });
    }

    #[inline(always)]
    fn va_sub_vb_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &[u64], c: &mut [u64]) {
        debug_assert!(a.len() == c.len() && b.len() == c.len());
        izip!(a, b, c).for_each(|(a, b, c)| self.sa_sub_sb_into_sc::<REDUCE>(a, b, c));
    }

    #[inline(always)]
    fn va_neg_into_vb<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &mut [u64]) {
        debug_assert!(a.len() == b.len());
        izip!(a, b).for_each(|(a, b)| {
            *b = (self.q - *a).reduce_once(self.q);
            self.sa_reduce_into_sa::<REDUCE>(b)
        });
    }

    #[inline(always)]
    fn va_prepare_montgomery_into_vb<const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &mut [Montgomery<u64>],
    ) {
        debug_assert!(a.len() == b.len());
        izip!(a, b).for_each(|(a, b)| self.sa_prepare_montgomery_into_sb::<REDUCE>(a, b));
    }

    #[inline(always)]
    fn va_unprepare_montgomery_into_vb<const REDUCE: REDUCEMOD>(
        &self,
        a: &[Montgomery<u64>],
        b: &mut [u64],
    ) {
        debug_assert!(a.len() == b.len());
        izip!(a, b).for_each(|(a, b)| *b = self.montgomery.unprepare::<REDUCE>(*a));
    }

    #[inline(always)]
    fn va_mul_vb_montgomery_into_vc<const REDUCE: REDUCEMOD>(
        &self,
        a: &[Montgomery<u64>],
        b: &[u64],
        c: &mut [u64],
    ) {
        debug_assert!(a.len() == c.len() && b.len() == c.len());
        izip!(a, b, c).for_each(|(a, b, c)| self.sa_mul_sb_montgomery_into_sc::<REDUCE>(b, a, c));
    }

    #[inline(always)]
    fn va_mul_vb_montgomery_into_vb<const REDUCE: REDUCEMOD>(
        &self,
        a: &[Montgomery<u64>],
        b: &mut [u64],
    ) {
        debug_assert!(a.len() == b.len());
        izip!(a, b).for_each(|(a, b)| self.montgomery.mul_external_assign::<REDUCE>(*a, b));
    }
}
