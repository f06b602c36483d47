use crate::dft::DFT;
use crate::error::RingError;
use crate::modulus::barrett::Barrett;
use crate::modulus::montgomery::Montgomery;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::modulus::WordOps;
use crate::modulus::{BARRETT, NONE, ONCE};
use itertools::izip;

/// Precomputed twiddles of the negacyclic NTT of size n = nth_root / 2.
///
/// The forward transform is a Cooley-Tukey decimation in time with
/// bit-reversed powers of a primitive nth_root-th root of unity psi; its
/// output is in bit-reversed order. The backward transform is the matching
/// Gentleman-Sande decimation in frequency, with the scaling by n^-1 folded
/// into its last layer. Pointwise products in the forward domain are
/// products in Z_q[X]/(X^n + 1).
#[derive(Clone, Debug)]
pub struct Table<O> {
    prime: Prime<O>,
    psi_forward_rev: Vec<Barrett<O>>,
    psi_backward_rev: Vec<Barrett<O>>,
    n_inv: Barrett<O>,
    psi_n_inv: Barrett<O>,
    q: O,
    two_q: O,
    four_q: O,
}

impl Table<u64> {
    pub fn new(prime: Prime<u64>, nth_root: u64) -> Result<Table<u64>, RingError> {
        if nth_root < 4 || nth_root & (nth_root - 1) != 0 {
            return Err(RingError::InvalidDegree((nth_root >> 1) as usize));
        }

        let psi: u64 = prime.primitive_nth_root(nth_root)?;

        let psi_mont: Montgomery<u64> = prime.montgomery.prepare::<ONCE>(psi);
        let psi_inv_mont: Montgomery<u64> = prime.montgomery.pow(psi_mont, prime.phi - 1);

        let n: usize = (nth_root >> 1) as usize;

        let mut psi_forward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];
        let mut psi_backward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];

        psi_forward_rev[0] = prime.barrett.prepare(1);
        psi_backward_rev[0] = prime.barrett.prepare(1);

        let log_n: u32 = n.log2() as _;

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 1..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);

            prime
                .montgomery
                .mul_external_assign::<ONCE>(psi_mont, &mut powers_forward);
            prime
                .montgomery
                .mul_external_assign::<ONCE>(psi_inv_mont, &mut powers_backward);

            psi_forward_rev[i_rev] = prime.barrett.prepare(powers_forward);
            psi_backward_rev[i_rev] = prime.barrett.prepare(powers_backward);
        }

        let n_inv: Barrett<u64> = prime.barrett.prepare(prime.inv(n as u64));
        let psi_n_inv: Barrett<u64> = prime.barrett.prepare(
            prime
                .barrett
                .mul_external::<ONCE>(&n_inv, psi_backward_rev[1].value()),
        );

        let q: u64 = prime.q();

        Ok(Self {
            prime,
            psi_forward_rev,
            psi_backward_rev,
            n_inv,
            psi_n_inv,
            q,
            two_q: q << 1,
            four_q: q << 2,
        })
    }

    pub fn n(&self) -> usize {
        self.psi_forward_rev.len()
    }
}

impl DFT<u64> for Table<u64> {
    fn forward_inplace(&self, a: &mut [u64]) {
        self.forward_inplace::<false>(a)
    }

    fn forward_inplace_lazy(&self, a: &mut [u64]) {
        self.forward_inplace::<true>(a)
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        self.backward_inplace::<false>(a)
    }

    fn backward_inplace_lazy(&self, a: &mut [u64]) {
        self.backward_inplace::<true>(a)
    }
}

impl Table<u64> {
    /// Input in [0, 4q-1], output in [0, q-1] (or [0, 2q-1] if LAZY).
    pub fn forward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.n(),
            "invalid a.len()={} != table size={}",
            n,
            self.n()
        );
        let log_n: usize = n.log2();

        for layer in 0..log_n {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            if layer == log_n - 1 {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    if LAZY {
                        self.dit_inplace::<false>(&mut a[0], &mut b[0], psi);
                        debug_assert!(a[0] < self.two_q, "forward output {} > 2q-1", a[0]);
                        debug_assert!(b[0] < self.two_q, "forward output {} > 2q-1", b[0]);
                    } else {
                        self.dit_inplace::<true>(&mut a[0], &mut b[0], psi);
                        self.prime.barrett.reduce_assign::<BARRETT>(&mut a[0]);
                        self.prime.barrett.reduce_assign::<BARRETT>(&mut b[0]);
                    }
                });
            } else {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dit_inplace::<true>(a, b, psi));
                });
            }
        }
    }

    #[inline(always)]
    fn dit_inplace<const LAZY: bool>(&self, a: &mut u64, b: &mut u64, t: &Barrett<u64>) {
        debug_assert!(*a < self.four_q, "a:{} 4q:{}", a, self.four_q);
        debug_assert!(*b < self.four_q, "b:{} 4q:{}", b, self.four_q);
        a.reduce_once_assign(self.two_q);
        let bt: u64 = self.prime.barrett.mul_external::<NONE>(t, b);
        *b = *a + self.two_q - bt;
        *a += bt;
        if !LAZY {
            a.reduce_once_assign(self.two_q);
            b.reduce_once_assign(self.two_q);
        }
    }

    /// Input in [0, 2q-1], output in [0, q-1] (or [0, 2q-1] if LAZY).
    pub fn backward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.n(),
            "invalid a.len()={} != table size={}",
            n,
            self.n()
        );
        let log_n: usize = n.log2();

        for layer in (0..log_n).rev() {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            if layer == 0 {
                let (a, b) = a.split_at_mut(size);
                izip!(a, b).for_each(|(a, b)| self.dif_last_inplace::<LAZY>(a, b));
            } else {
                izip!(a.chunks_exact_mut(2 * size), &self.psi_backward_rev[m..]).for_each(
                    |(a, psi)| {
                        let (a, b) = a.split_at_mut(size);
                        izip!(a, b).for_each(|(a, b)| self.dif_inplace(a, b, psi));
                    },
                );
            }
        }
    }

    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, t: &Barrett<u64>) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let d: u64 = self
            .prime
            .barrett
            .mul_external::<NONE>(t, &(*a + self.two_q - *b));
        *a += *b;
        a.reduce_once_assign(self.two_q);
        *b = d;
    }

    #[inline(always)]
    fn dif_last_inplace<const LAZY: bool>(&self, a: &mut u64, b: &mut u64) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let d: u64 = self
            .prime
            .barrett
            .mul_external::<NONE>(&self.psi_n_inv, &(*a + self.two_q - *b));
        *a = self
            .prime
            .barrett
            .mul_external::<NONE>(&self.n_inv, &(*a + *b));
        *b = d;
        if !LAZY {
            a.reduce_once_assign(self.q);
            b.reduce_once_assign(self.q);
        }
    }
}
