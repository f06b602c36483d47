//! Built-in demo program: multiplication by repeated addition.

use crate::alu::opcode::{ADD, BNE, NOP, SUB};
use crate::error::VmError;
use crate::microcode::Instruction;
use crate::wire::ProgramImage;

pub const DEMO_N: usize = 16;
pub const DEMO_Q: u64 = 65537;

/// Registers: r0 = x, r1 = y (counted down), r2 = accumulator,
/// r3 = 1, r4 = 0.
///
/// ```text
/// 0: bne r1, r4        skip slot 1 while y != 0
/// 1: store r2 -> m[r4]  then jump to the halt slot
/// 2: r2 = r2 + r0
/// 3: r1 = r1 - r3      back to slot 0
/// ```
///
/// Halts with r2 = m[0] = x * y mod q after 3y + 2 cycles. Fails unless
/// halt_slot lies in [4, n), past the program.
pub fn multiply_program(halt_slot: usize, n: usize) -> Result<Vec<Instruction>, VmError> {
    const LEN: usize = 4;
    if halt_slot < LEN || halt_slot >= n {
        return Err(VmError::InvalidHaltSlot {
            slot: halt_slot,
            n,
            program_len: LEN,
        });
    }
    Ok(vec![
        Instruction::new(BNE).rs1(1).rs2(4),
        Instruction::new(NOP)
            .rs1(4)
            .rs2(2)
            .store()
            .forward(halt_slot as u64 - 1),
        Instruction::new(ADD).rs1(2).rs2(0).rd(2),
        Instruction::new(SUB)
            .rs1(1)
            .rs2(3)
            .rd(1)
            .forward(0)
            .backward(3),
    ])
}

pub fn multiply_image(x: u64, y: u64) -> Result<ProgramImage, VmError> {
    ProgramImage::new(
        DEMO_N,
        DEMO_Q,
        &multiply_program(DEMO_N - 1, DEMO_N)?,
        vec![x, y, 0, 1, 0],
        vec![],
    )
}
