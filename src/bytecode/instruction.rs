use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString};
use num_enum::{TryFromPrimitive, IntoPrimitive};

/// No instruction takes more than three parameters.
pub const MAX_ARITY: usize = 3;

/**
  Opcodes of the virtual machine. The discriminant is the value of the low two decimal digits of
  an instruction word.
*/
#[derive(
StrumDisplay, EnumString, EnumIter,  TryFromPrimitive, IntoPrimitive,
Clone,        Copy,       Eq,        PartialEq,        Debug,         Hash
)]
#[repr(u8)]
pub enum Opcode {
  #[strum(serialize = "ADD")]
  Add          = 1,  // add( in, in, out )
  #[strum(serialize = "MULT")]
  Mult         = 2,  // mult( in, in, out )
  #[strum(serialize = "INPUT")]
  Input        = 3,  // input( out )
  #[strum(serialize = "OUTPUT")]
  Output       = 4,  // output( in )
  #[strum(serialize = "JUMP_IF_TRUE")]
  JumpIfTrue   = 5,  // jump_if_true( in, in )
  #[strum(serialize = "JUMP_IF_FALSE")]
  JumpIfFalse  = 6,  // jump_if_false( in, in )
  #[strum(serialize = "LESS_THAN")]
  LessThan     = 7,  // less_than( in, in, out )
  #[strum(serialize = "EQUALS")]
  Equals       = 8,  // equals( in, in, out )
  #[strum(serialize = "ADJUST_BASE")]
  AdjustBase   = 9,  // adjust_base( in )
  #[strum(serialize = "HALT")]
  Halt         = 99, // halt
}

/// Whether a parameter is read from or written to.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Role {
  In,
  Out,
}

use Role::{In, Out};

impl Opcode {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// The role of each parameter, in order.
  pub fn roles(&self) -> &'static [Role] {
    match self {
      | Opcode::Add
      | Opcode::Mult
      | Opcode::LessThan
      | Opcode::Equals      => &[In, In, Out],
      | Opcode::JumpIfTrue
      | Opcode::JumpIfFalse => &[In, In],
      Opcode::Input         => &[Out],
      | Opcode::Output
      | Opcode::AdjustBase  => &[In],
      Opcode::Halt          => &[],
    }
  }

  pub fn arity(&self) -> usize {
    self.roles().len()
  }

  /// Size in words of the instruction, opcode word included.
  pub fn size(&self) -> usize {
    1 + self.arity()
  }
}

/// How an operand word is interpreted.
#[derive(
TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum ParameterMode {
  /// The operand is an address.
  Position  = 0,
  /// The operand is the value. Never valid for an output parameter.
  Immediate = 1,
  /// The operand is an offset from the base pointer.
  Relative  = 2,
}

impl Default for ParameterMode {
  fn default() -> Self {
    ParameterMode::Position
  }
}

impl Display for ParameterMode {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      ParameterMode::Position  => write!(f, "position"),
      ParameterMode::Immediate => write!(f, "immediate"),
      ParameterMode::Relative  => write!(f, "relative"),
    }
  }
}

/// A decoded instruction word: the opcode and one mode per parameter.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct Instruction {
  pub opcode : Opcode,
  modes      : [ParameterMode; MAX_ARITY],
}

impl Instruction {
  /// Modes past the opcode's arity are dropped; missing modes are `Position`.
  pub fn new(opcode: Opcode, modes: &[ParameterMode]) -> Instruction {
    let mut padded = [ParameterMode::Position; MAX_ARITY];
    for (slot, mode) in padded.iter_mut().zip(modes).take(opcode.arity()) {
      *slot = *mode;
    }
    Instruction { opcode, modes: padded }
  }

  /// Exactly `opcode.arity()` modes.
  pub fn modes(&self) -> &[ParameterMode] {
    &self.modes[..self.opcode.arity()]
  }

  pub fn mode(&self, parameter: usize) -> ParameterMode {
    self.modes()[parameter]
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}({})",
      self.opcode,
      self.modes()
          .iter()
          .map(ParameterMode::to_string)
          .collect::<Vec<String>>()
          .join(", ")
    )
  }
}
