use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::montgomery::MontgomeryPrecomp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prime<O> {
    pub q: O,
    /// distinct prime factors of q-1
    pub factors: Vec<O>,
    pub montgomery: MontgomeryPrecomp<O>,
    pub barrett: BarrettPrecomp<O>,
    /// q - 1
    pub phi: O,
}
