pub mod impl_u64;

use crate::dft::DFT;
use crate::modulus::prime::Prime;
use crate::modulus::WordOps;
use crate::poly::{Domain, Poly};

/// The ring Z_q[X]/(X^n + 1) with its NTT tables.
/// Immutable once built; share it behind an `Arc`.
pub struct Ring<O> {
    pub n: usize,
    pub modulus: Prime<O>,
    pub dft: Box<dyn DFT<O> + Send + Sync>,
}

impl<O> Ring<O> {
    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn new_poly<D: Domain>(&self) -> Poly<D> {
        Poly::<D>::new(self.n())
    }
}

impl<O: std::fmt::Debug> std::fmt::Debug for Ring<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("n", &self.n)
            .field("modulus", &self.modulus)
            .finish_non_exhaustive()
    }
}
