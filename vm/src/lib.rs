//! # vm
//!
//! An oblivious stored-program engine over `Z_q[X]/(X^N + 1)`.
//!
//! The program, the register file and the memory bank are ring elements in
//! the evaluation domain; the program counter is a monomial ±X^slot. Each
//! cycle fetches and executes the instruction under the counter with the same
//! sequence of ring operations whatever the counter, the operands or the
//! opcode, and moves the counter by multiplying it with another monomial.
//!
//! - [`address`]: signed slots, raw addresses in [0, 2N).
//! - [`bootstrap`]: addresses to one-hot selectors.
//! - [`oblivious`]: selector-driven reads and writes.
//! - [`microcode`]: instruction encoding and the field tables.
//! - [`alu`]: the operation table.
//! - [`engine`]: the cycle loop.
//! - [`wire`]: the program image format.

pub mod address;
pub mod alu;
pub mod bootstrap;
pub mod counter;
pub mod demo;
pub mod engine;
pub mod error;
pub mod microcode;
pub mod oblivious;
pub mod packing;
pub mod storage;
pub mod wire;

pub use address::{Address, Sign};
pub use alu::{Operation, OperationTable};
pub use engine::{Engine, EngineConfig, EngineState, RunReport};
pub use error::{VmError, WireError};
pub use microcode::{Field, Instruction, Microcode};
pub use wire::ProgramImage;
