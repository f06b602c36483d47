//! Oblivious table access.
//!
//! Both primitives run the same sequence of ring operations over every
//! coefficient of the table whatever the selector, the value or the write
//! enable flag; the only data-dependent work is arithmetic on coefficient 0
//! of a rotated copy.

use math::poly::{Coeff, Eval, EvalMont, Poly};
use math::ring::Ring;

/// Reusable buffers for [`ObliviousStore`] and the address encoder.
#[derive(Clone, Debug)]
pub struct Scratch {
    pub(crate) mont: Poly<EvalMont>,
    pub(crate) eval: Poly<Eval>,
    pub(crate) coeff: Poly<Coeff>,
}

impl Scratch {
    pub fn new(ring: &Ring<u64>) -> Self {
        Self {
            mont: ring.new_poly(),
            eval: ring.new_poly(),
            coeff: ring.new_poly(),
        }
    }
}

pub trait ObliviousStore {
    /// Returns coefficient 0 of data * selector.
    ///
    /// With data in the logical table layout and selector = NTT(±X^slot),
    /// this is the logical value at slot, negated for a negative selector.
    fn read(&self, data: &Poly<Eval>, selector: &Poly<Eval>, scratch: &mut Scratch) -> u64;

    /// Replaces the value at the slot selected by selector_positive with
    /// value when write_enable is 1, and leaves data unchanged when it is 0.
    /// selector_negative must be the inverse monomial of selector_positive.
    fn write(
        &self,
        value: u64,
        write_enable: u64,
        data: &mut Poly<Eval>,
        selector_positive: &Poly<Eval>,
        selector_negative: &Poly<Eval>,
        scratch: &mut Scratch,
    );
}

impl ObliviousStore for Ring<u64> {
    fn read(&self, data: &Poly<Eval>, selector: &Poly<Eval>, scratch: &mut Scratch) -> u64 {
        self.prepare_montgomery(data, &mut scratch.mont);
        self.mul_montgomery_external(&scratch.mont, selector, &mut scratch.eval);
        self.intt(&scratch.eval, &mut scratch.coeff);
        scratch.coeff.coeffs()[0]
    }

    fn write(
        &self,
        value: u64,
        write_enable: u64,
        data: &mut Poly<Eval>,
        selector_positive: &Poly<Eval>,
        selector_negative: &Poly<Eval>,
        scratch: &mut Scratch,
    ) {
        debug_assert!(value < self.q(), "value={} >= q={}", value, self.q());
        debug_assert!(write_enable <= 1, "write_enable={} not in {{0, 1}}", write_enable);

        self.prepare_montgomery(data, &mut scratch.mont);
        self.mul_montgomery_external(&scratch.mont, selector_positive, &mut scratch.eval);
        self.intt(&scratch.eval, &mut scratch.coeff);

        // old * (1 - w) + value * w
        let old: u64 = scratch.coeff.coeffs()[0];
        let keep: u64 = self.scalar_mul(old, self.scalar_sub(1, write_enable));
        let put: u64 = self.scalar_mul(value, write_enable);
        scratch.coeff.coeffs_mut()[0] = self.scalar_add(keep, put);

        self.ntt(&scratch.coeff, &mut scratch.eval);
        self.prepare_montgomery(&scratch.eval, &mut scratch.mont);
        self.mul_montgomery_external(&scratch.mont, selector_negative, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::bootstrap::AddressEncoder;
    use crate::packing::{pack, unpack};

    #[test]
    fn read_every_address() {
        let ring: Ring<u64> = Ring::<u64>::new(8, 17).unwrap();
        let mut scratch: Scratch = Scratch::new(&ring);
        let values: Vec<u64> = vec![3, 1, 4, 1, 5, 9, 2, 6];
        let table: Poly<Eval> = pack(&ring, &values).unwrap();
        for raw in 0..16u64 {
            let got: u64 = ring.read(&table, &ring.bootstrap_raw(raw).unwrap(), &mut scratch);
            let v: u64 = values[raw as usize % 8];
            let want: u64 = if raw < 8 { v } else { (17 - v) % 17 };
            assert_eq!(got, want, "raw={}", raw);
        }
    }

    #[test]
    fn write_touches_only_the_selected_slot() {
        let ring: Ring<u64> = Ring::<u64>::new(8, 17).unwrap();
        let mut scratch: Scratch = Scratch::new(&ring);
        let values: Vec<u64> = vec![3, 1, 4, 1, 5, 9, 2, 6];
        for raw in 0..16u64 {
            let address: Address = Address::from_raw(raw, 8).unwrap();
            let pos: Poly<Eval> = ring.bootstrap(address);
            let neg: Poly<Eval> = ring.bootstrap(address.inverse());

            let mut table: Poly<Eval> = pack(&ring, &values).unwrap();
            ring.write(11, 1, &mut table, &pos, &neg, &mut scratch);
            let mut want: Vec<u64> = values.clone();
            want[address.slot()] = if raw < 8 { 11 } else { 17 - 11 };
            assert_eq!(unpack(&ring, &table), want, "raw={}", raw);
            assert_eq!(ring.read(&table, &pos, &mut scratch), 11);

            let before: Poly<Eval> = table.clone();
            ring.write(7, 0, &mut table, &pos, &neg, &mut scratch);
            assert_eq!(table, before, "raw={}", raw);
        }
    }
}
