//! Microprogram store.
//!
//! A program is held as one evaluation-domain table per instruction
//! attribute ([`Field`]), slot j of every table describing the instruction
//! at counter slot j. Fetching reads all of them obliviously with the
//! counter as selector.

use std::fmt;

use log::{info, trace};
use math::poly::{Eval, Poly};
use math::ring::Ring;

use crate::address::Address;
use crate::error::VmError;
use crate::oblivious::{ObliviousStore, Scratch};
use crate::packing::pack;

/// Instruction attributes, in table and serialization order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Rs1,
    Rs2,
    RdPositive,
    RdNegative,
    Opcode,
    DeltaPositive,
    DeltaNegative,
    RegisterWrite,
    MemoryLoad,
    MemoryStore,
}

impl Field {
    pub const COUNT: usize = 10;

    pub const ALL: [Field; Field::COUNT] = [
        Field::Rs1,
        Field::Rs2,
        Field::RdPositive,
        Field::RdNegative,
        Field::Opcode,
        Field::DeltaPositive,
        Field::DeltaNegative,
        Field::RegisterWrite,
        Field::MemoryLoad,
        Field::MemoryStore,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::Rs1 => "rs1",
            Field::Rs2 => "rs2",
            Field::RdPositive => "rd+",
            Field::RdNegative => "rd-",
            Field::Opcode => "opcode",
            Field::DeltaPositive => "delta+",
            Field::DeltaNegative => "delta-",
            Field::RegisterWrite => "reg-write",
            Field::MemoryLoad => "mem-load",
            Field::MemoryStore => "mem-store",
        }
    }

    /// Raw address in [0, 2N).
    pub fn is_address(&self) -> bool {
        matches!(
            self,
            Field::Rs1
                | Field::Rs2
                | Field::RdPositive
                | Field::RdNegative
                | Field::DeltaPositive
                | Field::DeltaNegative
        )
    }

    /// Value in {0, 1}.
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            Field::RegisterWrite | Field::MemoryLoad | Field::MemoryStore
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One instruction, before encoding into field tables.
///
/// Register operands and the destination are raw addresses: values >= N
/// read the register negated (and write the negated value). The counter
/// moves by `forward - backward` slots, plus the operation's contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u64,
    pub rs1: u64,
    pub rs2: u64,
    pub rd: u64,
    pub forward: u64,
    pub backward: u64,
    pub reg_write: bool,
    pub mem_load: bool,
    pub mem_store: bool,
}

impl Instruction {
    /// An instruction that reads r0 twice, writes nothing and moves on to
    /// the next slot.
    pub fn new(opcode: u64) -> Self {
        Self {
            opcode,
            rs1: 0,
            rs2: 0,
            rd: 0,
            forward: 1,
            backward: 0,
            reg_write: false,
            mem_load: false,
            mem_store: false,
        }
    }

    pub fn rs1(mut self, raw: u64) -> Self {
        self.rs1 = raw;
        self
    }

    pub fn rs2(mut self, raw: u64) -> Self {
        self.rs2 = raw;
        self
    }

    /// Sets the destination and enables the register write.
    pub fn rd(mut self, raw: u64) -> Self {
        self.rd = raw;
        self.reg_write = true;
        self
    }

    pub fn forward(mut self, offset: u64) -> Self {
        self.forward = offset;
        self
    }

    pub fn backward(mut self, offset: u64) -> Self {
        self.backward = offset;
        self
    }

    /// Writes memory[rs1 value] instead of the operation result to rd.
    pub fn load(mut self) -> Self {
        self.mem_load = true;
        self
    }

    /// Stores the rs2 value at memory[rs1 value].
    pub fn store(mut self) -> Self {
        self.mem_store = true;
        self
    }

    /// Returns the field values, RD-negative derived from rd.
    pub fn encode(&self, n: usize) -> [u64; Field::COUNT] {
        let two_n: u64 = (n as u64) << 1;
        [
            self.rs1,
            self.rs2,
            self.rd,
            (two_n - self.rd % two_n) % two_n,
            self.opcode,
            self.forward,
            self.backward,
            self.reg_write as u64,
            self.mem_load as u64,
            self.mem_store as u64,
        ]
    }
}

/// Lays out a program as field vectors, instruction j at slot j.
pub fn encode_program(
    program: &[Instruction],
    n: usize,
) -> Result<[Vec<u64>; Field::COUNT], VmError> {
    if program.len() > n {
        return Err(VmError::ProgramTooLarge {
            len: program.len(),
            n,
        });
    }
    let mut fields: [Vec<u64>; Field::COUNT] = std::array::from_fn(|_| vec![0u64; n]);
    for (slot, instruction) in program.iter().enumerate() {
        for (field, value) in fields.iter_mut().zip(instruction.encode(n)) {
            field[slot] = value;
        }
    }
    Ok(fields)
}

/// Field values of the instruction under the counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DecodedInstruction {
    values: [u64; Field::COUNT],
}

impl DecodedInstruction {
    pub fn get(&self, field: Field) -> u64 {
        self.values[field.index()]
    }
}

#[derive(Clone, Debug)]
pub struct Microcode {
    tables: Vec<Poly<Eval>>,
    ones: Poly<Eval>,
    opcodes: Vec<u64>,
    len: usize,
}

impl Microcode {
    /// Validates and transforms raw field vectors, each of at most N
    /// values (missing slots are 0).
    pub fn from_fields(
        ring: &Ring<u64>,
        fields: &[Vec<u64>; Field::COUNT],
    ) -> Result<Self, VmError> {
        let n: usize = ring.n();
        let two_n: u64 = (n as u64) << 1;

        for field in fields.iter() {
            if field.len() > n {
                return Err(VmError::ProgramTooLarge {
                    len: field.len(),
                    n,
                });
            }
        }

        let at = |field: Field, slot: usize| -> u64 {
            fields[field.index()].get(slot).copied().unwrap_or(0)
        };

        let mut len: usize = 0;
        for slot in 0..n {
            for field in Field::ALL {
                let value: u64 = at(field, slot);
                if value != 0 {
                    len = slot + 1;
                }
                if field.is_address() {
                    Address::from_raw(value, n)?;
                }
                if field.is_flag() && value > 1 {
                    return Err(VmError::InvalidFlag { field, slot, value });
                }
                if field == Field::Opcode && value >= n as u64 {
                    return Err(VmError::InvalidOpcode {
                        slot,
                        opcode: value,
                        limit: n as u64,
                    });
                }
            }
            let (rd_pos, rd_neg) = (at(Field::RdPositive, slot), at(Field::RdNegative, slot));
            if rd_neg != (two_n - rd_pos) % two_n {
                return Err(VmError::InconsistentDestination {
                    slot,
                    rd_pos,
                    rd_neg,
                });
            }
        }

        let tables: Vec<Poly<Eval>> = fields
            .iter()
            .map(|field| pack(ring, field))
            .collect::<Result<Vec<_>, VmError>>()?;

        let opcodes: Vec<u64> = (0..len).map(|slot| at(Field::Opcode, slot)).collect();

        info!("loaded microcode: {} instruction slots, n={}", len, n);

        Ok(Self {
            tables,
            ones: pack(ring, &vec![1u64; n])?,
            opcodes,
            len,
        })
    }

    pub fn load(ring: &Ring<u64>, program: &[Instruction]) -> Result<Self, VmError> {
        Self::from_fields(ring, &encode_program(program, ring.n())?)
    }

    /// Number of slots up to the last non-empty instruction.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn table(&self, field: Field) -> &Poly<Eval> {
        &self.tables[field.index()]
    }

    /// Opcodes of slots [0, len), for load-time checks.
    pub fn opcodes(&self) -> &[u64] {
        &self.opcodes
    }

    /// Reads every field at the counter slot.
    ///
    /// A counter in its negated half (-X^slot) reads every value negated;
    /// the counter's sign is read from an all-ones table and multiplied back
    /// into each value, so both halves decode the same instruction.
    pub fn fetch(
        &self,
        ring: &Ring<u64>,
        counter: &Poly<Eval>,
        scratch: &mut Scratch,
    ) -> DecodedInstruction {
        let sign: u64 = ring.read(&self.ones, counter, scratch);
        let mut decoded: DecodedInstruction = DecodedInstruction::default();
        for field in Field::ALL {
            let value: u64 = ring.read(self.table(field), counter, scratch);
            decoded.values[field.index()] = ring.scalar_mul(value, sign);
        }
        trace!("fetched {:?}", decoded);
        decoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alu::opcode;
    use crate::bootstrap::AddressEncoder;

    fn ring() -> Ring<u64> {
        Ring::<u64>::new(16, 65537).unwrap()
    }

    #[test]
    fn encode_derives_negative_destination() {
        let i: Instruction = Instruction::new(opcode::ADD).rs1(1).rs2(18).rd(3);
        assert_eq!(i.encode(16), [1, 18, 3, 29, 1, 1, 0, 1, 0, 0]);
        let i: Instruction = Instruction::new(opcode::NOP).forward(0).backward(2).store();
        assert_eq!(i.encode(16), [0, 0, 0, 0, 0, 0, 2, 0, 0, 1]);
    }

    #[test]
    fn fetch_decodes_each_slot_under_both_signs() {
        let ring: Ring<u64> = ring();
        let mut scratch: Scratch = Scratch::new(&ring);
        let program: Vec<Instruction> = vec![
            Instruction::new(opcode::ADD).rs1(0).rs2(1).rd(2),
            Instruction::new(opcode::SUB).rs1(17).rs2(3).rd(20).backward(1),
            Instruction::new(opcode::BNE).rs1(4).rs2(5).forward(3),
            Instruction::new(opcode::NOP).rs1(6).rd(7).load(),
            Instruction::new(opcode::NOP).rs1(6).rs2(8).store(),
        ];
        let microcode: Microcode = Microcode::load(&ring, &program).unwrap();
        assert_eq!(microcode.len(), 5);
        assert_eq!(microcode.opcodes(), &[1, 2, 9, 0, 0]);

        for (slot, instruction) in program.iter().enumerate() {
            let want: [u64; Field::COUNT] = instruction.encode(16);
            for raw in [slot as u64, slot as u64 + 16] {
                let counter: Poly<Eval> = ring.bootstrap_raw(raw).unwrap();
                let decoded: DecodedInstruction = microcode.fetch(&ring, &counter, &mut scratch);
                for field in Field::ALL {
                    assert_eq!(
                        decoded.get(field),
                        want[field.index()],
                        "raw={} field={}",
                        raw,
                        field
                    );
                }
            }
        }

        let counter: Poly<Eval> = ring.bootstrap_raw(9).unwrap();
        assert_eq!(
            microcode.fetch(&ring, &counter, &mut scratch),
            DecodedInstruction::default()
        );
    }

    #[test]
    fn validation() {
        let ring: Ring<u64> = ring();

        let mut fields: [Vec<u64>; Field::COUNT] = encode_program(&[], 16).unwrap();
        fields[Field::Rs1.index()][2] = 32;
        assert!(matches!(
            Microcode::from_fields(&ring, &fields),
            Err(VmError::AddressOutOfRange { raw: 32, limit: 32 })
        ));

        let mut fields: [Vec<u64>; Field::COUNT] = encode_program(&[], 16).unwrap();
        fields[Field::MemoryLoad.index()][1] = 2;
        assert!(matches!(
            Microcode::from_fields(&ring, &fields),
            Err(VmError::InvalidFlag {
                field: Field::MemoryLoad,
                slot: 1,
                value: 2
            })
        ));

        let mut fields: [Vec<u64>; Field::COUNT] = encode_program(&[], 16).unwrap();
        fields[Field::RdPositive.index()][0] = 3;
        assert!(matches!(
            Microcode::from_fields(&ring, &fields),
            Err(VmError::InconsistentDestination {
                slot: 0,
                rd_pos: 3,
                rd_neg: 0
            })
        ));

        let mut fields: [Vec<u64>; Field::COUNT] = encode_program(&[], 16).unwrap();
        fields[Field::Opcode.index()][4] = 16;
        assert!(matches!(
            Microcode::from_fields(&ring, &fields),
            Err(VmError::InvalidOpcode {
                slot: 4,
                opcode: 16,
                limit: 16
            })
        ));

        assert!(matches!(
            Microcode::load(&ring, &vec![Instruction::new(opcode::NOP); 17]),
            Err(VmError::ProgramTooLarge { len: 17, n: 16 })
        ));
    }
}
