use crate::modulus::WordOps;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Representation a [`Poly`] lives in.
pub trait Domain: Copy + Clone + Debug + Default + PartialEq + Eq + 'static {}

/// Coefficient domain: value i is the coefficient of X^i.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coeff;

/// Evaluation (NTT) domain, values in bit-reversed order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eval;

/// Evaluation domain with every value multiplied by 2^64 mod q.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalMont;

impl Domain for Coeff {}

impl Domain for Eval {}

impl Domain for EvalMont {}

/// An element of Z_q[X]/(X^N + 1) in the domain D.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly<D> {
    coeffs: Vec<u64>,
    _domain: PhantomData<D>,
}

impl<D: Domain> Poly<D> {
    /// Returns the zero element with n coefficients.
    pub fn new(n: usize) -> Self {
        Self::from_vec(vec![0u64; n])
    }

    /// Wraps raw values already in the domain D.
    pub fn from_vec(coeffs: Vec<u64>) -> Self {
        Self {
            coeffs,
            _domain: PhantomData,
        }
    }

    pub fn n(&self) -> usize {
        self.coeffs.len()
    }

    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    pub fn coeffs_mut(&mut self) -> &mut [u64] {
        &mut self.coeffs
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.coeffs
    }

    pub fn zero(&mut self) {
        self.coeffs.fill(0)
    }

    /// Reinterprets the buffer in another domain. Only the ring performs
    /// conversions, after rewriting the values accordingly.
    pub(crate) fn cast<E: Domain>(self) -> Poly<E> {
        Poly::<E>::from_vec(self.coeffs)
    }
}
