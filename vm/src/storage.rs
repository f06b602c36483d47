use std::marker::PhantomData;

use math::poly::{Eval, Poly};
use math::ring::Ring;

use crate::error::VmError;
use crate::oblivious::{ObliviousStore, Scratch};
use crate::packing::{pack, unpack};

pub trait BankKind {
    const NAME: &'static str;
}

#[derive(Clone, Copy, Debug)]
pub struct Registers;

#[derive(Clone, Copy, Debug)]
pub struct Memory;

impl BankKind for Registers {
    const NAME: &'static str = "registers";
}

impl BankKind for Memory {
    const NAME: &'static str = "memory";
}

/// N logical cells held as one evaluation-domain table and touched only
/// through oblivious reads and writes.
#[derive(Clone, Debug)]
pub struct Bank<K> {
    table: Poly<Eval>,
    _kind: PhantomData<K>,
}

pub type RegisterFile = Bank<Registers>;
pub type MemoryBank = Bank<Memory>;

impl<K: BankKind> Bank<K> {
    /// Seeds cells [0, seeds.len()) with seeds (reduced mod q); the others are 0.
    pub fn new(ring: &Ring<u64>, seeds: &[u64]) -> Result<Self, VmError> {
        Ok(Self {
            table: pack(ring, seeds)?,
            _kind: PhantomData,
        })
    }

    pub fn zero(ring: &Ring<u64>) -> Self {
        Self {
            table: ring.new_poly(),
            _kind: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        K::NAME
    }

    pub fn table(&self) -> &Poly<Eval> {
        &self.table
    }

    pub fn read(&self, ring: &Ring<u64>, selector: &Poly<Eval>, scratch: &mut Scratch) -> u64 {
        ring.read(&self.table, selector, scratch)
    }

    pub fn write(
        &mut self,
        ring: &Ring<u64>,
        value: u64,
        write_enable: u64,
        selector_positive: &Poly<Eval>,
        selector_negative: &Poly<Eval>,
        scratch: &mut Scratch,
    ) {
        ring.write(
            value,
            write_enable,
            &mut self.table,
            selector_positive,
            selector_negative,
            scratch,
        )
    }

    /// Decodes all N cells.
    pub fn values(&self, ring: &Ring<u64>) -> Vec<u64> {
        unpack(ring, &self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::bootstrap::AddressEncoder;

    #[test]
    fn seeded_read_write() {
        let ring: Ring<u64> = Ring::<u64>::new(8, 17).unwrap();
        let mut scratch: Scratch = Scratch::new(&ring);
        let mut registers: RegisterFile = RegisterFile::new(&ring, &[4, 5, 6]).unwrap();
        assert_eq!(registers.values(&ring), vec![4, 5, 6, 0, 0, 0, 0, 0]);
        assert_eq!(registers.name(), "registers");

        let a: Address = Address::from_raw(7, 8).unwrap();
        let (pos, neg) = (ring.bootstrap(a), ring.bootstrap(a.inverse()));
        registers.write(&ring, 9, 1, &pos, &neg, &mut scratch);
        assert_eq!(registers.read(&ring, &pos, &mut scratch), 9);
        assert_eq!(registers.values(&ring)[7], 9);

        let memory: MemoryBank = MemoryBank::zero(&ring);
        assert_eq!(memory.values(&ring), vec![0; 8]);
        assert!(matches!(
            MemoryBank::new(&ring, &[0; 9]),
            Err(VmError::TooManyValues { len: 9, n: 8 })
        ));
    }
}
