pub mod barrett;
pub mod impl_u64;
pub mod montgomery;
pub mod prime;

/// Reduction applied at the end of a modular operation.
pub type REDUCEMOD = u8;

/// Leaves the result as is.
pub const NONE: REDUCEMOD = 0;
/// Subtracts q once if the result is >= q.
pub const ONCE: REDUCEMOD = 1;
/// Full Barrett reduction into [0, q).
pub const BARRETT: REDUCEMOD = 2;

pub trait WordOps<O> {
    /// ceil(log2(self)).
    fn log2(self) -> usize;
    /// Reverses the n least significant bits.
    fn reverse_bits_msb(self, n: u32) -> O;
}

impl WordOps<u64> for u64 {
    #[inline(always)]
    fn log2(self) -> usize {
        (u64::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> u64 {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (u64::BITS - n)
    }
}

impl WordOps<usize> for usize {
    #[inline(always)]
    fn log2(self) -> usize {
        (usize::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (usize::BITS - n)
    }
}

pub trait ReduceOnce<O> {
    /// Assigns self-q to self if self >= q. 2q must fit in O.
    fn reduce_once_assign(&mut self, q: O);
    /// Returns self-q if self >= q else self. 2q must fit in O.
    fn reduce_once(&self, q: O) -> O;
}

/// Scalar modular operations, inputs in [0, q).
pub trait ScalarOperations<O> {
    fn sa_reduce_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut O);

    // c <- a + b
    fn sa_add_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);

    // c <- a - b
    fn sa_sub_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);

    // b <- -a
    fn sa_neg_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // b <- a * 2^64
    fn sa_prepare_montgomery_into_sb<const REDUCE: REDUCEMOD>(
        &self,
        a: &O,
        b: &mut montgomery::Montgomery<O>,
    );

    // c <- a * b
    fn sa_mul_sb_montgomery_into_sc<const REDUCE: REDUCEMOD>(
        &self,
        a: &O,
        b: &montgomery::Montgomery<O>,
        c: &mut O,
    );
}

/// Coefficient-wise modular operations on equal-length slices.
pub trait VectorOperations<O> {
    // vec(c) <- vec(a) + vec(b)
    fn va_add_vb_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[O], b: &[O], c: &mut [O]);

    // vec(b) <- vec(a) + vec(b)
    fn va_add_vb_into_vb<const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(c) <- vec(a) - vec(b)
    fn va_sub_vb_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[O], b: &[O], c: &mut [O]);

    // vec(b) <- -vec(a)
    fn va_neg_into_vb<const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(b) <- vec(a) * 2^64
    fn va_prepare_montgomery_into_vb<const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &mut [montgomery::Montgomery<O>],
    );

    // vec(b) <- vec(a) * 2^-64
    fn va_unprepare_montgomery_into_vb<const REDUCE: REDUCEMOD>(
        &self,
        a: &[montgomery::Montgomery<O>],
        b: &mut [O],
    );

    // vec(c) <- vec(a) * vec(b)
    fn va_mul_vb_montgomery_into_vc<const REDUCE: REDUCEMOD>(
        &self,
        a: &[montgomery::Montgomery<O>],
        b: &[O],
        c: &mut [O],
    );

    // vec(b) <- vec(a) * vec(b)
    fn va_mul_vb_montgomery_into_vb<const REDUCE: REDUCEMOD>(
        &self,
        a: &[montgomery::Montgomery<O>],
        b: &mut [O],
    );
}
