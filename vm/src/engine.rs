//! Fetch-decode-execute loop.
//!
//! One cycle is a fixed sequence of ring operations: every field read, both
//! operand reads, every operation of the table, the memory read, both
//! writes and the counter update happen whatever the program, the counter
//! position or the data.

use std::sync::Arc;

use log::{debug, info, log_enabled, warn, Level};
use math::poly::{Coeff, Eval, Poly};
use math::ring::Ring;

use crate::address::Address;
use crate::alu::OperationTable;
use crate::bootstrap::AddressEncoder;
use crate::counter::Counter;
use crate::error::VmError;
use crate::microcode::{DecodedInstruction, Field, Instruction, Microcode};
use crate::oblivious::{ObliviousStore, Scratch};
use crate::packing::pack_into;
use crate::storage::{MemoryBank, RegisterFile};
use crate::wire::ProgramImage;

pub const DEFAULT_MAX_CYCLES: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Cycles a single call to [`Engine::run`] may execute.
    pub max_cycles: usize,
    /// Reserved counter slot that stops the engine; N-1 when unset.
    pub halt_slot: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            halt_slot: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Halted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Cycles executed by this call.
    pub cycles: usize,
    pub halted: bool,
}

pub struct Engine {
    ring: Arc<Ring<u64>>,
    microcode: Microcode,
    operations: OperationTable,
    registers: RegisterFile,
    memory: MemoryBank,
    counter: Counter,
    config: EngineConfig,
    halt_slot: usize,
    state: EngineState,
    cycles: usize,
    scratch: Scratch,
    coeff: Poly<Coeff>,
    selector: Poly<Eval>,
    selector_inverse: Poly<Eval>,
    results: Vec<u64>,
    contributions: Vec<u64>,
    result_table: Poly<Eval>,
    contribution_table: Poly<Eval>,
}

impl Engine {
    /// Fails if the operation table does not fit in the ring, an opcode of
    /// the program does not index it, or the halt slot is not in
    /// [1, N) past the last instruction.
    pub fn new(
        ring: Arc<Ring<u64>>,
        microcode: Microcode,
        operations: OperationTable,
        registers: RegisterFile,
        memory: MemoryBank,
        config: EngineConfig,
    ) -> Result<Self, VmError> {
        let n: usize = ring.n();

        operations.check_fits(n)?;
        for (slot, opcode) in microcode.opcodes().iter().enumerate() {
            if *opcode >= operations.len() as u64 {
                return Err(VmError::InvalidOpcode {
                    slot,
                    opcode: *opcode,
                    limit: operations.len() as u64,
                });
            }
        }

        let halt_slot: usize = config.halt_slot.unwrap_or(n - 1);
        if halt_slot == 0 || halt_slot >= n || halt_slot < microcode.len() {
            return Err(VmError::InvalidHaltSlot {
                slot: halt_slot,
                n,
                program_len: microcode.len(),
            });
        }

        info!(
            "engine ready: n={} q={} operations={} halt slot={} max cycles={}",
            n,
            ring.q(),
            operations.len(),
            halt_slot,
            config.max_cycles
        );

        Ok(Self {
            counter: Counter::new(&ring),
            scratch: Scratch::new(&ring),
            coeff: ring.new_poly(),
            selector: ring.new_poly(),
            selector_inverse: ring.new_poly(),
            results: vec![0; operations.len()],
            contributions: vec![0; operations.len()],
            result_table: ring.new_poly(),
            contribution_table: ring.new_poly(),
            ring,
            microcode,
            operations,
            registers,
            memory,
            config,
            halt_slot,
            state: EngineState::Running,
            cycles: 0,
        })
    }

    /// Builds the engine for a program with seeded registers and memory.
    pub fn load(
        ring: Arc<Ring<u64>>,
        program: &[Instruction],
        registers: &[u64],
        memory: &[u64],
        operations: OperationTable,
        config: EngineConfig,
    ) -> Result<Self, VmError> {
        let microcode: Microcode = Microcode::load(&ring, program)?;
        let registers: RegisterFile = RegisterFile::new(&ring, registers)?;
        let memory: MemoryBank = MemoryBank::new(&ring, memory)?;
        Self::new(ring, microcode, operations, registers, memory, config)
    }

    /// Builds the ring and the engine described by a program image.
    pub fn from_image(
        image: &ProgramImage,
        operations: OperationTable,
        config: EngineConfig,
    ) -> Result<Self, VmError> {
        let ring: Arc<Ring<u64>> = Arc::new(Ring::<u64>::new(image.n, image.q)?);
        let microcode: Microcode = Microcode::from_fields(&ring, &image.fields)?;
        let registers: RegisterFile = RegisterFile::new(&ring, &image.registers)?;
        let memory: MemoryBank = MemoryBank::new(&ring, &image.memory)?;
        Self::new(ring, microcode, operations, registers, memory, config)
    }

    pub fn ring(&self) -> &Arc<Ring<u64>> {
        &self.ring
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Cycles executed since construction.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn halt_slot(&self) -> usize {
        self.halt_slot
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn memory(&self) -> &MemoryBank {
        &self.memory
    }

    pub fn register_values(&self) -> Vec<u64> {
        self.registers.values(&self.ring)
    }

    pub fn memory_values(&self) -> Vec<u64> {
        self.memory.values(&self.ring)
    }

    pub fn counter_position(&mut self) -> Address {
        self.counter.position(&self.ring, &mut self.scratch)
    }

    /// Runs until the counter reaches the halt slot or max_cycles cycles
    /// have run. On budget exhaustion the state is kept and run can be
    /// called again.
    pub fn run(&mut self) -> Result<RunReport, VmError> {
        let mut cycles: usize = 0;
        while self.state == EngineState::Running {
            if cycles == self.config.max_cycles {
                warn!(
                    "no halt after {} cycles ({} in total), stopping",
                    cycles, self.cycles
                );
                return Err(VmError::NonTermination { cycles });
            }
            self.step()?;
            cycles += 1;
        }
        info!("halted after {} cycles ({} in total)", cycles, self.cycles);
        Ok(RunReport {
            cycles,
            halted: true,
        })
    }

    /// Runs exactly one cycle, or nothing if the engine has halted.
    pub fn step(&mut self) -> Result<EngineState, VmError> {
        if self.state == EngineState::Halted {
            return Ok(self.state);
        }

        let ring: &Ring<u64> = &self.ring;
        let n: usize = ring.n();
        let q: u64 = ring.q();
        let two_n: u64 = (n as u64) << 1;

        let slot: Option<Address> = log_enabled!(Level::Debug)
            .then(|| self.counter.position(ring, &mut self.scratch));

        let decoded: DecodedInstruction =
            self.microcode.fetch(ring, self.counter.selector(), &mut self.scratch);

        // Operands, through the register addresses held in the fields.
        let rs1: Address = Address::from_raw(decoded.get(Field::Rs1), n)?;
        ring.bootstrap_into(rs1, &mut self.coeff, &mut self.selector);
        let a: u64 = self.registers.read(ring, &self.selector, &mut self.scratch);

        let rs2: Address = Address::from_raw(decoded.get(Field::Rs2), n)?;
        ring.bootstrap_into(rs2, &mut self.coeff, &mut self.selector);
        let b: u64 = self.registers.read(ring, &self.selector, &mut self.scratch);

        // Every operation, then select by opcode.
        self.operations.evaluate(a, b, q, n, &mut self.results, &mut self.contributions);
        pack_into(ring, &self.results, &mut self.coeff)?;
        ring.ntt(&self.coeff, &mut self.result_table);
        pack_into(ring, &self.contributions, &mut self.coeff)?;
        ring.ntt(&self.coeff, &mut self.contribution_table);

        let opcode: Address = Address::from_raw(decoded.get(Field::Opcode), n)?;
        ring.bootstrap_into(opcode, &mut self.coeff, &mut self.selector);
        let result: u64 = ring.read(&self.result_table, &self.selector, &mut self.scratch);
        let contribution: u64 =
            ring.read(&self.contribution_table, &self.selector, &mut self.scratch);

        // Memory, addressed by the first operand.
        let address: Address = Address::from_raw_wrapping(a, n);
        ring.bootstrap_into(address, &mut self.coeff, &mut self.selector);
        ring.bootstrap_into(address.inverse(), &mut self.coeff, &mut self.selector_inverse);
        let loaded: u64 = self.memory.read(ring, &self.selector, &mut self.scratch);
        self.memory.write(
            ring,
            b,
            decoded.get(Field::MemoryStore),
            &self.selector,
            &self.selector_inverse,
            &mut self.scratch,
        );

        let load: u64 = decoded.get(Field::MemoryLoad);
        let value: u64 = ring.scalar_add(
            ring.scalar_mul(result, ring.scalar_sub(1, load)),
            ring.scalar_mul(loaded, load),
        );

        let rd: Address = Address::from_raw(decoded.get(Field::RdPositive), n)?;
        let rd_inverse: Address = Address::from_raw(decoded.get(Field::RdNegative), n)?;
        ring.bootstrap_into(rd, &mut self.coeff, &mut self.selector);
        ring.bootstrap_into(rd_inverse, &mut self.coeff, &mut self.selector_inverse);
        self.registers.write(
            ring,
            value,
            decoded.get(Field::RegisterWrite),
            &self.selector,
            &self.selector_inverse,
            &mut self.scratch,
        );

        // positive + contribution - negative, mod 2N
        let delta: u64 = (decoded.get(Field::DeltaPositive) + contribution % two_n + two_n
            - decoded.get(Field::DeltaNegative))
            % two_n;
        ring.bootstrap_into(
            Address::from_raw_wrapping(delta, n),
            &mut self.coeff,
            &mut self.selector,
        );
        self.counter.advance(ring, &self.selector);

        self.cycles += 1;

        if let Some(slot) = slot {
            debug!(
                "cycle {}: slot={} opcode={} a={} b={} value={} delta={}",
                self.cycles,
                slot.raw(),
                decoded.get(Field::Opcode),
                a,
                b,
                value,
                delta
            );
        }

        if self.counter.is_at(ring, self.halt_slot, &mut self.scratch) {
            self.state = EngineState::Halted;
        }

        Ok(self.state)
    }
}
