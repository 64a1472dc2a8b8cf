//! The execution engine: one fetch, decode and execute cycle per call to `Vm::step`.
//!
//! A `Vm` owns its memory, registers and I/O channel and shares nothing with other instances, so
//! a scheduler can hold any number of them and step each in turn. A step either completes or,
//! when INPUT finds no value, reports `Step::Blocked` and leaves the VM as it was, so the same
//! step can be retried after feeding more input.

use std::fmt::{Display, Formatter};

use prettytable::{cell, row, table};

use crate::address::Word;
use crate::bytecode::{decode, parse_program, Instruction, MAX_ARITY};
#[cfg(feature = "trace_computation")]
use crate::bytecode::Disassembly;
use crate::error::*;
use crate::instructions::{Context, Effect, INSTRUCTION_TABLE};
use crate::io::IoChannel;
use crate::memory::Memory;
use crate::table::{make_register_table, TABLE_DISPLAY_FORMAT};

/// The outcome of one successful step.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Step {
  /// The instruction completed; execution continues at the given pointer.
  Continue(Word),
  /// INPUT found no value. Nothing changed; step again once input is available.
  Blocked,
  Halted,
}

/// Why `Vm::run_to_completion` returned.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Stop {
  Halted,
  Blocked,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Status {
  Running,
  Blocked,
  Halted,
  /// Faults are final. Every later step returns the same fault.
  Faulted(Fault),
}

#[derive(Clone, Debug)]
pub struct Vm {

  // Memory store
  memory: Memory,

  // I/O channel
  io: IoChannel,

  // Registers //
  pointer      : Word,        // Address of the next instruction
  base_pointer : Word,        // Added to relative operands
  redirect     : Option<Word>, // Jump target not yet taken

  status: Status,
}

impl Vm {

  pub fn new(program: Vec<Word>, input: Vec<Word>) -> Vm {
    Vm {
      memory       : Memory::new(program),
      io           : IoChannel::new(input),
      pointer      : 0,
      base_pointer : 0,
      redirect     : None,
      status       : Status::Running,
    }
  }

  /// Loads a program from its comma separated text form.
  pub fn from_text(text: &str, input: Vec<Word>) -> ParseResult<Vm> {
    Ok(Vm::new(parse_program(text)?, input))
  }

  // region Execution

  /**
    Executes the instruction at the pointer.

    A halted VM keeps reporting `Step::Halted` until `reset_registers` is called. A faulted VM
    reports its fault on every call for the rest of its life.
  */
  pub fn step(&mut self) -> StepResult<Step> {
    match self.status {
      Status::Halted         => return Ok(Step::Halted),
      Status::Faulted(fault) => return Err(fault),
      _                      => {}
    }

    match self.execute() {

      Ok(step) => {
        self.status = match step {
          Step::Continue(_) => Status::Running,
          Step::Blocked     => Status::Blocked,
          Step::Halted      => Status::Halted,
        };
        Ok(step)
      }

      Err(kind) => {
        let fault = Fault::new(self.pointer, kind);
        #[cfg(feature = "trace_computation")] println!("{}", fault);
        self.status = Status::Faulted(fault);
        Err(fault)
      }

    }
  }

  /// Steps until the program halts or blocks on input.
  pub fn run_to_completion(&mut self) -> StepResult<Stop> {
    loop {
      match self.step()? {
        Step::Continue(_) => continue,
        Step::Blocked     => return Ok(Stop::Blocked),
        Step::Halted      => return Ok(Stop::Halted),
      }
    }
  }

  fn execute(&mut self) -> InstructionResult<Step> {
    let word        = self.memory.read(self.pointer)?;
    let instruction = decode(word)?;
    let arity       = instruction.opcode.arity();

    let mut operands = [0; MAX_ARITY];
    for (offset, operand) in operands.iter_mut().enumerate().take(arity) {
      let address = self.pointer
                        .checked_add(1 + offset as Word)
                        .ok_or(InstructionFault::Overflow { opcode: instruction.opcode })?;
      *operand = self.memory.read(address)?;
    }

    #[cfg(feature = "trace_computation")]
      {
        if let Ok(disassembly) = Disassembly::new(&self.memory, self.pointer, self.base_pointer) {
          println!("{}", disassembly);
        }
      }

    let apply = INSTRUCTION_TABLE.get(&instruction.opcode)
                                 .ok_or(InstructionFault::UnknownOpcode(word))?;
    let effect = {
      let mut context = Context {
        memory       : &mut self.memory,
        io           : &mut self.io,
        base_pointer : &mut self.base_pointer,
      };
      apply(&instruction, &operands[..arity], &mut context)?
    };

    match effect {

      Effect::Continue     => self.advance(&instruction),

      Effect::Jump(target) => {
        self.redirect(target)?;
        self.advance(&instruction)
      }

      Effect::Blocked      => {
        #[cfg(feature = "trace_computation")] println!("{}: blocked on input", self.pointer);
        Ok(Step::Blocked)
      }

      Effect::Halt         => {
        #[cfg(feature = "trace_computation")] println!("{}: halted", self.pointer);
        Ok(Step::Halted)
      }

    }
  }

  /// Records a jump target for the next call to `advance`. Only one may be pending.
  fn redirect(&mut self, target: Word) -> Result<(), InstructionFault> {
    match self.redirect {
      Some(pending) => Err(InstructionFault::PendingRedirect { pending, requested: target }),
      None          => {
        self.redirect = Some(target);
        Ok(())
      }
    }
  }

  /// Moves the pointer past `instruction`, or to the pending jump target, which is consumed.
  fn advance(&mut self, instruction: &Instruction) -> InstructionResult<Step> {
    let next = match self.redirect.take() {
      Some(target) => target,
      None         => {
        self.pointer
            .checked_add(instruction.opcode.size() as Word)
            .ok_or(InstructionFault::Overflow { opcode: instruction.opcode })?
      }
    };
    self.pointer = next;
    Ok(Step::Continue(next))
  }

  // endregion

  // region Registers and I/O

  /**
    Resets the pointer and base pointer so the current memory image can be run again.
    Memory, input and output are left alone. A faulted VM stays faulted.
  */
  pub fn reset_registers(&mut self) {
    if let Status::Faulted(_) = self.status {
      return;
    }
    self.pointer      = 0;
    self.base_pointer = 0;
    self.redirect     = None;
    self.status       = Status::Running;
  }

  /// The address of the next instruction, or `None` once halted.
  pub fn pointer(&self) -> Option<Word> {
    match self.status {
      Status::Halted => None,
      _              => Some(self.pointer),
    }
  }

  pub fn base_pointer(&self) -> Word {
    self.base_pointer
  }

  pub fn status(&self) -> Status {
    self.status
  }

  pub fn is_halted(&self) -> bool {
    self.status == Status::Halted
  }

  pub fn is_blocked(&self) -> bool {
    self.status == Status::Blocked
  }

  /// Appends input values after any not yet read.
  pub fn feed_input<I: IntoIterator<Item = Word>>(&mut self, values: I) {
    self.io.extend_input(values);
  }

  /// Replaces the input and reads it from the start.
  pub fn reset_input(&mut self, values: Vec<Word>) {
    self.io.replace_input(values);
    self.io.rewind();
  }

  /// Reads the current input again from the start.
  pub fn rewind_input(&mut self) {
    self.io.rewind();
  }

  pub fn outputs(&self) -> &[Word] {
    self.io.outputs()
  }

  pub fn last_output(&self) -> Option<Word> {
    self.io.last_output()
  }

  /// Removes and returns the output written so far.
  pub fn take_outputs(&mut self) -> Vec<Word> {
    self.io.take_outputs()
  }

  pub fn clear_outputs(&mut self) {
    self.io.clear_outputs();
  }

  pub fn io(&self) -> &IoChannel {
    &self.io
  }

  // endregion

  // region Memory access

  /// Reads memory directly. Like any read, this may allocate scratch space.
  pub fn peek_memory(&mut self, address: Word) -> MemoryResult<Word> {
    self.memory.read(address)
  }

  pub fn poke_memory(&mut self, address: Word, value: Word) -> MemoryResult {
    self.memory.write(address, value)
  }

  /// Word 0, which some programs use to report their result.
  pub fn return_code(&self) -> Option<Word> {
    self.memory.get(0)
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  // endregion
}

impl Display for Vm {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let registers = vec![
      ("IP", self.pointer.to_string()),
      ("BP", self.base_pointer.to_string()),
      ("IN", format!("{}/{}", self.io.cursor(), self.io.inputs().len())),
      ("OUT", format!("{}", self.io.outputs().len())),
    ];
    let r_table = make_register_table(registers, None);

    let highlight = self.memory.locate(self.pointer)
                               .ok()
                               .map(|a| a.idx(self.memory.program_len()));
    let m_table = make_register_table(self.memory.rows(), highlight);

    let mut combined_table = table!([m_table, r_table]);

    combined_table.set_titles(row![ub->"Memory", ub->"Registers"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    let status = match self.status {
      Status::Running        => "Running.".to_string(),
      Status::Blocked        => "Blocked on input.".to_string(),
      Status::Halted         => "Halted.".to_string(),
      Status::Faulted(fault) => format!("Faulted: {}", fault),
    };

    write!(f, "{}\n{}", status, combined_table)
  }
}
