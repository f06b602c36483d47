//! One-hot address encoding.
//!
//! An [`Address`] becomes the evaluation-domain monomial ±X^slot. Multiplying
//! a table by it rotates the addressed slot into coefficient 0, which is how
//! every oblivious access in this crate selects a cell.

use math::poly::{Coeff, Eval, Poly};
use math::ring::Ring;

use crate::address::{Address, Sign};
use crate::error::VmError;

pub trait AddressEncoder {
    /// Returns NTT(±X^slot).
    fn bootstrap(&self, address: Address) -> Poly<Eval>;

    /// Writes NTT(±X^slot) into out, using coeff as scratch.
    fn bootstrap_into(&self, address: Address, coeff: &mut Poly<Coeff>, out: &mut Poly<Eval>);

    /// Same as [`AddressEncoder::bootstrap`] from a raw value in [0, 2N).
    fn bootstrap_raw(&self, raw: u64) -> Result<Poly<Eval>, VmError>;
}

impl AddressEncoder for Ring<u64> {
    fn bootstrap(&self, address: Address) -> Poly<Eval> {
        let mut coeff: Poly<Coeff> = self.new_poly();
        let mut out: Poly<Eval> = self.new_poly();
        self.bootstrap_into(address, &mut coeff, &mut out);
        out
    }

    fn bootstrap_into(&self, address: Address, coeff: &mut Poly<Coeff>, out: &mut Poly<Eval>) {
        debug_assert_eq!(address.n(), self.n(), "address from another ring");
        coeff.zero();
        coeff.coeffs_mut()[address.slot()] = match address.sign() {
            Sign::Positive => 1,
            Sign::Negative => self.q() - 1,
        };
        self.ntt(coeff, out);
    }

    fn bootstrap_raw(&self, raw: u64) -> Result<Poly<Eval>, VmError> {
        Ok(self.bootstrap(Address::from_raw(raw, self.n())?))
    }
}
