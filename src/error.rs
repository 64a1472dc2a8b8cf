//! Faults raised while decoding or executing a program.
//!
//! A fault is fatal to the VM that raised it. Running out of input is not a fault; it is reported
//! as `Step::Blocked` by the engine.

use thiserror::Error;

use crate::address::Word;
use crate::bytecode::Opcode;

#[derive(Error, Clone, Copy, Eq, PartialEq, Debug)]
pub enum MemoryFault {
  #[error("cannot access negative address {0}")]
  NegativeAddress(Word),
  /// The address is non-negative but the host cannot allocate that far.
  #[error("cannot allocate memory up to address {address}")]
  Exhausted { address: Word },
}

#[derive(Error, Clone, Copy, Eq, PartialEq, Debug)]
pub enum InstructionFault {
  #[error("invalid instruction {0}")]
  UnknownOpcode(Word),
  #[error("cannot write to an immediate operand of {opcode}")]
  ImmediateWrite { opcode: Opcode },
  #[error("invalid parameter mode {digit} in {word}")]
  MalformedMode { word: Word, digit: Word },
  #[error("still executing a previous jump to {pending}, cannot jump to {requested}")]
  PendingRedirect { pending: Word, requested: Word },
  #[error("arithmetic overflow in {opcode}")]
  Overflow { opcode: Opcode },
}

#[derive(Error, Clone, Copy, Eq, PartialEq, Debug)]
pub enum FaultKind {
  #[error(transparent)]
  Memory(#[from] MemoryFault),
  #[error(transparent)]
  Instruction(#[from] InstructionFault),
}

/// A fault together with the instruction pointer at which it happened.
#[derive(Error, Clone, Copy, Eq, PartialEq, Debug)]
#[error("fault at pointer {pointer}: {kind}")]
pub struct Fault {
  pub pointer : Word,
  pub kind    : FaultKind,
}

impl Fault {
  pub fn new<K: Into<FaultKind>>(pointer: Word, kind: K) -> Fault {
    Fault { pointer, kind: kind.into() }
  }

  pub fn is_memory_fault(&self) -> bool {
    matches!(self.kind, FaultKind::Memory(_))
  }

  pub fn is_instruction_fault(&self) -> bool {
    matches!(self.kind, FaultKind::Instruction(_))
  }
}

/// Program text could not be read as a comma separated list of integers.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum ParseError {
  #[error("unexpected input at byte {offset}: {found:?}")]
  Unexpected { offset: usize, found: String },
  #[error("{text} does not fit in a 64 bit word")]
  OutOfRange { text: String },
}

pub type MemoryResult<T = ()>      = Result<T, MemoryFault>;
pub type InstructionResult<T = ()> = Result<T, FaultKind>;
pub type StepResult<T>             = Result<T, Fault>;
pub type ParseResult<T>            = Result<T, ParseError>;
