//! Error types for program loading, execution and the image wire format.

use math::RingError;

use crate::microcode::Field;

/// Error type for reading or writing a program image.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Data ends before the header or the payload is complete.
    #[error("data too short to contain a valid program image")]
    TooShort,
    /// Magic bytes do not match expected value.
    #[error("invalid magic bytes")]
    InvalidMagic,
    /// Version is not supported.
    #[error("unsupported version {got}, expected {expected}")]
    UnsupportedVersion { got: u32, expected: u32 },
    /// Image does not carry exactly one table per microcode field.
    #[error("image has {got} microcode fields, expected {expected}")]
    FieldCount { got: u64, expected: u64 },
    /// Ring degree in the image is not a supported power of two.
    #[error("image ring degree n={0} is not a power of two in [2, 2^20]")]
    InvalidDegree(u64),
    /// Register or memory section holds more values than the ring has slots.
    #[error("image section holds {count} values but the ring only has {n} slots")]
    ValueCount { count: u64, n: u64 },
    /// Underlying reader or writer failed.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for building and running the engine.
#[derive(Debug, thiserror::Error)]
pub enum VmError {
    /// Ring construction or element handling failed.
    #[error("ring error: {0}")]
    Ring(#[from] RingError),
    /// Raw address outside [0, 2N).
    #[error("address {raw} out of range [0, {limit})")]
    AddressOutOfRange { raw: u64, limit: u64 },
    /// Flag field holds something else than 0 or 1.
    #[error("field {field} at slot {slot} holds {value}, expected 0 or 1")]
    InvalidFlag { field: Field, slot: usize, value: u64 },
    /// RD-negative is not the inverse of RD-positive.
    #[error("slot {slot}: negative destination {rd_neg} is not the inverse of {rd_pos}")]
    InconsistentDestination { slot: usize, rd_pos: u64, rd_neg: u64 },
    /// Opcode does not index the operation table.
    #[error("slot {slot}: opcode {opcode} does not index an operation table of {limit} entries")]
    InvalidOpcode { slot: usize, opcode: u64, limit: u64 },
    #[error("operation table is empty")]
    EmptyOperationTable,
    /// Operation table has more entries than the ring has slots.
    #[error("operation table has {len} entries but the ring only has {n} slots")]
    OperationTableTooLarge { len: usize, n: usize },
    #[error("duplicate mnemonic '{0}' in operation table")]
    DuplicateMnemonic(&'static str),
    /// More seed values than table slots.
    #[error("{len} values do not fit in a table of {n} slots")]
    TooManyValues { len: usize, n: usize },
    /// More instructions than counter slots.
    #[error("program of {len} instructions does not fit in {n} slots")]
    ProgramTooLarge { len: usize, n: usize },
    /// Halt slot outside [max(1, program length), N).
    #[error("halt slot {slot} outside [max(1, {program_len}), {n})")]
    InvalidHaltSlot { slot: usize, n: usize, program_len: usize },
    /// Cycle budget ran out before the counter reached the halt slot.
    #[error("program did not halt within {cycles} cycles")]
    NonTermination { cycles: usize },
    /// Program image could not be decoded or encoded.
    #[error("program image: {0}")]
    Wire(#[from] WireError),
}
