/// A constant prepared for Shoup multiplication: (w, floor(w * 2^64 / q)).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Barrett<O>(pub O, pub O);

impl<O> Barrett<O> {
    #[inline(always)]
    pub fn value(&self) -> &O {
        &self.0
    }

    #[inline(always)]
    pub fn quotient(&self) -> &O {
        &self.1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrettPrecomp<O> {
    pub q: O,
    /// floor((2^64 - 1) / q)
    pub ratio: O,
}
