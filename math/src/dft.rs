pub mod ntt;

/// A negacyclic transform over a fixed ring degree.
pub trait DFT<O> {
    fn forward_inplace(&self, a: &mut [O]);
    fn forward_inplace_lazy(&self, a: &mut [O]);
    fn backward_inplace(&self, a: &mut [O]);
    fn backward_inplace_lazy(&self, a: &mut [O]);
}
