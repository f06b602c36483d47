use crate::dft::ntt::Table;
use crate::error::RingError;
use crate::modulus::prime::Prime;
use crate::modulus::{ScalarOperations, VectorOperations};
use crate::modulus::ONCE;
use crate::poly::{Coeff, Domain, Eval, EvalMont, Poly};
use crate::ring::Ring;

impl Ring<u64> {
    /// Returns the ring Z_q[X]/(X^n + 1).
    /// Fails unless n is a power of two >= 2 and q is an odd prime
    /// smaller than 2^61 with q = 1 mod 2n.
    pub fn new(n: usize, q: u64) -> Result<Self, RingError> {
        if n < 2 || !n.is_power_of_two() {
            return Err(RingError::InvalidDegree(n));
        }
        let prime: Prime<u64> = Prime::<u64>::new(q)?;
        let table: Table<u64> = Table::<u64>::new(prime.clone(), (n << 1) as u64)?;
        Ok(Self {
            n,
            modulus: prime,
            dft: Box::new(table),
        })
    }

    pub fn q(&self) -> u64 {
        self.modulus.q
    }
}

impl Ring<u64> {
    pub fn ntt_inplace(&self, a: Poly<Coeff>) -> Poly<Eval> {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        let mut a: Poly<Eval> = a.cast();
        self.dft.forward_inplace(a.coeffs_mut());
        a
    }

    pub fn intt_inplace(&self, a: Poly<Eval>) -> Poly<Coeff> {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        let mut a: Poly<Coeff> = a.cast();
        self.dft.backward_inplace(a.coeffs_mut());
        a
    }

    pub fn ntt(&self, a: &Poly<Coeff>, b: &mut Poly<Eval>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        b.coeffs_mut().copy_from_slice(a.coeffs());
        self.dft.forward_inplace(b.coeffs_mut());
    }

    pub fn intt(&self, a: &Poly<Eval>, b: &mut Poly<Coeff>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        b.coeffs_mut().copy_from_slice(a.coeffs());
        self.dft.backward_inplace(b.coeffs_mut());
    }

    /// Assigns a * 2^64 mod q to b.
    pub fn prepare_montgomery(&self, a: &Poly<Eval>, b: &mut Poly<EvalMont>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_prepare_montgomery_into_vb::<ONCE>(a.coeffs(), b.coeffs_mut());
    }

    /// Assigns a * 2^-64 mod q to b.
    pub fn unprepare_montgomery(&self, a: &Poly<EvalMont>, b: &mut Poly<Eval>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_unprepare_montgomery_into_vb::<ONCE>(a.coeffs(), b.coeffs_mut());
    }
}

impl Ring<u64> {
    #[inline(always)]
    pub fn add_inplace<D: Domain>(&self, a: &Poly<D>, b: &mut Poly<D>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_add_vb_into_vb::<ONCE>(a.coeffs(), b.coeffs_mut());
    }

    #[inline(always)]
    pub fn add<D: Domain>(&self, a: &Poly<D>, b: &Poly<D>, c: &mut Poly<D>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_add_vb_into_vc::<ONCE>(a.coeffs(), b.coeffs(), c.coeffs_mut());
    }

    #[inline(always)]
    pub fn sub<D: Domain>(&self, a: &Poly<D>, b: &Poly<D>, c: &mut Poly<D>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_sub_vb_into_vc::<ONCE>(a.coeffs(), b.coeffs(), c.coeffs_mut());
    }

    #[inline(always)]
    pub fn neg<D: Domain>(&self, a: &Poly<D>, b: &mut Poly<D>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus.va_neg_into_vb::<ONCE>(a.coeffs(), b.coeffs_mut());
    }

    /// Assigns a[i] * b[i] mod q to c[i].
    #[inline(always)]
    pub fn mul_montgomery_external(
        &self,
        a: &Poly<EvalMont>,
        b: &Poly<Eval>,
        c: &mut Poly<Eval>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_mul_vb_montgomery_into_vc::<ONCE>(a.coeffs(), b.coeffs(), c.coeffs_mut());
    }

    /// Assigns a[i] * b[i] mod q to b[i].
    #[inline(always)]
    pub fn mul_montgomery_external_inplace(&self, a: &Poly<EvalMont>, b: &mut Poly<Eval>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_mul_vb_montgomery_into_vb::<ONCE>(a.coeffs(), b.coeffs_mut());
    }
}

impl Ring<u64> {
    /// Returns a + b mod q for a, b in [0, q-1].
    #[inline(always)]
    pub fn scalar_add(&self, a: u64, b: u64) -> u64 {
        let mut c: u64 = 0;
        self.modulus.sa_add_sb_into_sc::<ONCE>(&a, &b, &mut c);
        c
    }

    /// Returns a - b mod q for a, b in [0, q-1].
    #[inline(always)]
    pub fn scalar_sub(&self, a: u64, b: u64) -> u64 {
        let mut c: u64 = 0;
        self.modulus.sa_sub_sb_into_sc::<ONCE>(&a, &b, &mut c);
        c
    }

    /// Returns -a mod q for a in [0, q-1].
    #[inline(always)]
    pub fn scalar_neg(&self, a: u64) -> u64 {
        let mut b: u64 = 0;
        self.modulus.sa_neg_into_sb::<ONCE>(&a, &mut b);
        b
    }

    /// Returns a * b mod q for a, b in [0, q-1].
    #[inline(always)]
    pub fn scalar_mul(&self, a: u64, b: u64) -> u64 {
        self.modulus.mul(a, b)
    }
}
