use crate::modulus::barrett::BarrettPrecomp;

/// x * 2^64 mod q.
pub type Montgomery<O> = O;

/// Precomputations for Montgomery arithmetic with radix 2^64.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MontgomeryPrecomp<O> {
    pub q: O,
    pub barrett: BarrettPrecomp<O>,
    /// q^-1 mod 2^64
    pub q_inv: O,
    /// 2^64 mod q
    pub one: Montgomery<O>,
}
