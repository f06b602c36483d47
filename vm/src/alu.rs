//! Operation table.
//!
//! Every cycle evaluates every operation on the fetched operands; the opcode
//! only picks which result survives, through an oblivious read of the packed
//! results. An operation therefore has to be a total function of its inputs.

use std::collections::HashSet;

use itertools::izip;

use crate::error::VmError;

/// Returns the value written back, in [0, q).
pub type ValueFn = fn(a: u64, b: u64, q: u64) -> u64;

/// Returns the extra forward offset added to the instruction's counter delta.
/// Any u64 is accepted; the offset is taken mod 2N.
pub type CounterFn = fn(a: u64, b: u64) -> u64;

#[derive(Clone, Copy, Debug)]
pub struct Operation {
    pub mnemonic: &'static str,
    pub value: ValueFn,
    pub counter: CounterFn,
}

impl Operation {
    pub const fn new(mnemonic: &'static str, value: ValueFn, counter: CounterFn) -> Self {
        Self {
            mnemonic,
            value,
            counter,
        }
    }
}

/// Opcodes of [`OperationTable::default`].
pub mod opcode {
    pub const NOP: u64 = 0;
    pub const ADD: u64 = 1;
    pub const SUB: u64 = 2;
    pub const MUL: u64 = 3;
    pub const AND: u64 = 4;
    pub const OR: u64 = 5;
    pub const XOR: u64 = 6;
    pub const SLTU: u64 = 7;
    pub const BEQ: u64 = 8;
    pub const BNE: u64 = 9;
    pub const BLTU: u64 = 10;
    pub const BGEU: u64 = 11;
}

fn zero(_: u64, _: u64, _: u64) -> u64 {
    0
}

fn no_jump(_: u64, _: u64) -> u64 {
    0
}

fn add(a: u64, b: u64, q: u64) -> u64 {
    ((a as u128 + b as u128) % q as u128) as u64
}

fn sub(a: u64, b: u64, q: u64) -> u64 {
    ((a as u128 + q as u128 - (b % q) as u128) % q as u128) as u64
}

fn mul(a: u64, b: u64, q: u64) -> u64 {
    ((a as u128 * b as u128) % q as u128) as u64
}

fn and(a: u64, b: u64, q: u64) -> u64 {
    (a & b) % q
}

fn or(a: u64, b: u64, q: u64) -> u64 {
    (a | b) % q
}

fn xor(a: u64, b: u64, q: u64) -> u64 {
    (a ^ b) % q
}

fn sltu(a: u64, b: u64, _: u64) -> u64 {
    (a < b) as u64
}

fn eq(a: u64, b: u64) -> u64 {
    (a == b) as u64
}

fn ne(a: u64, b: u64) -> u64 {
    (a != b) as u64
}

fn lt(a: u64, b: u64) -> u64 {
    (a < b) as u64
}

fn ge(a: u64, b: u64) -> u64 {
    (a >= b) as u64
}

/// An ordered, immutable list of operations; the opcode is the index.
#[derive(Clone, Debug)]
pub struct OperationTable {
    operations: Vec<Operation>,
}

impl OperationTable {
    /// Fails if the table is empty or two operations share a mnemonic.
    pub fn new(operations: Vec<Operation>) -> Result<Self, VmError> {
        if operations.is_empty() {
            return Err(VmError::EmptyOperationTable);
        }
        let mut seen: HashSet<&'static str> = HashSet::with_capacity(operations.len());
        for op in operations.iter() {
            if !seen.insert(op.mnemonic) {
                return Err(VmError::DuplicateMnemonic(op.mnemonic));
            }
        }
        Ok(Self { operations })
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn get(&self, opcode: u64) -> Option<&Operation> {
        self.operations.get(opcode as usize)
    }

    pub fn opcode(&self, mnemonic: &str) -> Option<u64> {
        self.operations
            .iter()
            .position(|op| op.mnemonic == mnemonic)
            .map(|i| i as u64)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// Fails if the results cannot be packed into a table of n slots.
    pub fn check_fits(&self, n: usize) -> Result<(), VmError> {
        if self.len() > n {
            return Err(VmError::OperationTableTooLarge { len: self.len(), n });
        }
        Ok(())
    }

    /// Evaluates every operation on (a, b) in a ring of degree n. Counter
    /// offsets come out reduced mod 2N, so they survive packing mod q.
    pub fn evaluate(
        &self,
        a: u64,
        b: u64,
        q: u64,
        n: usize,
        values: &mut [u64],
        counters: &mut [u64],
    ) {
        debug_assert_eq!(values.len(), self.len());
        debug_assert_eq!(counters.len(), self.len());
        let two_n: u64 = (n as u64) << 1;
        izip!(self.operations.iter(), values.iter_mut(), counters.iter_mut()).for_each(
            |(op, value, counter)| {
                *value = (op.value)(a, b, q);
                *counter = (op.counter)(a, b) % two_n;
            },
        );
    }
}

impl Default for OperationTable {
    fn default() -> Self {
        Self {
            operations: vec![
                Operation::new("nop", zero, no_jump),
                Operation::new("add", add, no_jump),
                Operation::new("sub", sub, no_jump),
                Operation::new("mul", mul, no_jump),
                Operation::new("and", and, no_jump),
                Operation::new("or", or, no_jump),
                Operation::new("xor", xor, no_jump),
                Operation::new("sltu", sltu, no_jump),
                Operation::new("beq", zero, eq),
                Operation::new("bne", zero, ne),
                Operation::new("bltu", zero, lt),
                Operation::new("bgeu", zero, ge),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table() {
        let table: OperationTable = OperationTable::default();
        let q: u64 = 17;
        let mut values: Vec<u64> = vec![0; table.len()];
        let mut counters: Vec<u64> = vec![0; table.len()];

        table.evaluate(12, 9, q, 16, &mut values, &mut counters);
        assert_eq!(values, vec![0, 4, 3, 6, 8, 13, 5, 0, 0, 0, 0, 0]);
        assert_eq!(counters, vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1]);

        table.evaluate(3, 15, q, 16, &mut values, &mut counters);
        // 3 | 15 = 15, 3 ^ 15 = 12, 3 - 15 = -12 = 5
        assert_eq!(values[opcode::SUB as usize], 5);
        assert_eq!(values[opcode::OR as usize], 15);
        assert_eq!(values[opcode::XOR as usize], 12);
        assert_eq!(values[opcode::SLTU as usize], 1);
        assert_eq!(counters[opcode::BLTU as usize], 1);
        assert_eq!(counters[opcode::BGEU as usize], 0);

        table.evaluate(7, 7, q, 16, &mut values, &mut counters);
        assert_eq!(counters[opcode::BEQ as usize], 1);
        assert_eq!(counters[opcode::BNE as usize], 0);

        assert_eq!(table.opcode("mul"), Some(opcode::MUL));
        assert_eq!(table.get(opcode::BGEU).map(|op| op.mnemonic), Some("bgeu"));
        assert!(table.get(12).is_none());
    }

    #[test]
    fn counter_offsets_reduced_mod_two_n() {
        let table: OperationTable = OperationTable::new(vec![
            Operation::new("jump", zero, |_, _| 65537 + 1),
            Operation::new("far", zero, |_, _| u64::MAX),
        ])
        .unwrap();
        let mut values: Vec<u64> = vec![0; 2];
        let mut counters: Vec<u64> = vec![0; 2];
        table.evaluate(0, 0, 65537, 16, &mut values, &mut counters);
        assert_eq!(counters, vec![2, 31]);
    }

    #[test]
    fn validation() {
        assert!(matches!(
            OperationTable::new(vec![]),
            Err(VmError::EmptyOperationTable)
        ));
        assert!(matches!(
            OperationTable::new(vec![
                Operation::new("add", add, no_jump),
                Operation::new("add", sub, no_jump),
            ]),
            Err(VmError::DuplicateMnemonic("add"))
        ));
        let table: OperationTable = OperationTable::default();
        assert!(table.check_fits(16).is_ok());
        assert!(matches!(
            table.check_fits(8),
            Err(VmError::OperationTableTooLarge { len: 12, n: 8 })
        ));
    }
}
