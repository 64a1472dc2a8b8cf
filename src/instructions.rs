/*!
  The instruction set.

  Each instruction is a plain function from its decoded instruction word, its operand words and
  an execution `Context` to an `Effect`. Functions are looked up in `INSTRUCTION_TABLE`, which is
  built once and never modified. Instructions never keep state between calls: a jump reports its
  target through `Effect::Jump` and the engine decides what the next pointer is.

  | Opcode          | Parameters    | Effect                                   |
  |-----------------|---------------|------------------------------------------|
  | `ADD`           | in, in, out   | `out = a + b`                            |
  | `MULT`          | in, in, out   | `out = a * b`                            |
  | `INPUT`         | out           | `out = next input`, or blocks            |
  | `OUTPUT`        | in            | writes `a` to the output                 |
  | `JUMP_IF_TRUE`  | in, in        | jumps to `b` if `a != 0`                 |
  | `JUMP_IF_FALSE` | in, in        | jumps to `b` if `a == 0`                 |
  | `LESS_THAN`     | in, in, out   | `out = 1` if `a < b` else `0`            |
  | `EQUALS`        | in, in, out   | `out = 1` if `a == b` else `0`           |
  | `ADJUST_BASE`   | in            | `base pointer += a`                      |
  | `HALT`          |               | stops the VM                             |
*/

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::address::{to_index, Word};
use crate::bytecode::{Instruction, Opcode, ParameterMode};
use crate::error::{InstructionFault, InstructionResult};
use crate::io::IoChannel;
use crate::memory::Memory;

/// What the engine should do after an instruction ran.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Effect {
  /// Proceed to the instruction after this one.
  Continue,
  /// Proceed to the given address instead.
  Jump(Word),
  /// No input was available. Nothing was changed.
  Blocked,
  Halt,
}

/// The parts of a VM an instruction may touch.
pub struct Context<'a> {
  pub memory       : &'a mut Memory,
  pub io           : &'a mut IoChannel,
  pub base_pointer : &'a mut Word,
}

pub type InstructionFn = fn(&Instruction, &[Word], &mut Context<'_>) -> InstructionResult<Effect>;

lazy_static! {
  pub static ref INSTRUCTION_TABLE: HashMap<Opcode, InstructionFn> = {
    let mut table: HashMap<Opcode, InstructionFn> = HashMap::new();
    table.insert(Opcode::Add,         add);
    table.insert(Opcode::Mult,        mult);
    table.insert(Opcode::Input,       input);
    table.insert(Opcode::Output,      output);
    table.insert(Opcode::JumpIfTrue,  jump_if_true);
    table.insert(Opcode::JumpIfFalse, jump_if_false);
    table.insert(Opcode::LessThan,    less_than);
    table.insert(Opcode::Equals,      equals);
    table.insert(Opcode::AdjustBase,  adjust_base);
    table.insert(Opcode::Halt,        halt);
    table
  };
}

// region Operand resolution

fn overflow(instruction: &Instruction) -> InstructionFault {
  InstructionFault::Overflow { opcode: instruction.opcode }
}

fn relative(instruction: &Instruction, context: &Context<'_>, offset: Word) -> InstructionResult<Word> {
  context.base_pointer
         .checked_add(offset)
         .ok_or_else(|| overflow(instruction).into())
}

/// The value of input parameter `parameter`.
fn value(
  instruction : &Instruction,
  operands    : &[Word],
  parameter   : usize,
  context     : &mut Context<'_>
) -> InstructionResult<Word> {
  let operand = operands[parameter];
  match instruction.mode(parameter) {
    ParameterMode::Position  => Ok(context.memory.read(operand)?),
    ParameterMode::Immediate => Ok(operand),
    ParameterMode::Relative  => {
      let address = relative(instruction, context, operand)?;
      Ok(context.memory.read(address)?)
    }
  }
}

/// The address output parameter `parameter` writes to. Checked, but not yet allocated.
fn target(
  instruction : &Instruction,
  operands    : &[Word],
  parameter   : usize,
  context     : &Context<'_>
) -> InstructionResult<Word> {
  let operand = operands[parameter];
  let address = match instruction.mode(parameter) {
    ParameterMode::Position  => operand,
    ParameterMode::Relative  => relative(instruction, context, operand)?,
    ParameterMode::Immediate => {
      return Err(InstructionFault::ImmediateWrite { opcode: instruction.opcode }.into());
    }
  };
  to_index(address)?;
  Ok(address)
}

/// Shared body of the `in, in, out` instructions.
fn store<F>(
  instruction : &Instruction,
  operands    : &[Word],
  context     : &mut Context<'_>,
  operation   : F
) -> InstructionResult<Effect>
  where F: Fn(Word, Word) -> Option<Word>
{
  let a   = value(instruction, operands, 0, context)?;
  let b   = value(instruction, operands, 1, context)?;
  let out = target(instruction, operands, 2, context)?;
  let result = operation(a, b).ok_or_else(|| overflow(instruction))?;
  context.memory.write(out, result)?;
  Ok(Effect::Continue)
}

fn jump_if<F>(
  instruction : &Instruction,
  operands    : &[Word],
  context     : &mut Context<'_>,
  condition   : F
) -> InstructionResult<Effect>
  where F: Fn(Word) -> bool
{
  let test        = value(instruction, operands, 0, context)?;
  let destination = value(instruction, operands, 1, context)?;
  match condition(test) {
    true  => Ok(Effect::Jump(destination)),
    false => Ok(Effect::Continue),
  }
}

// endregion

// region Instructions

fn add(instruction: &Instruction, operands: &[Word], context: &mut Context<'_>) -> InstructionResult<Effect> {
  store(instruction, operands, context, Word::checked_add)
}

fn mult(instruction: &Instruction, operands: &[Word], context: &mut Context<'_>) -> InstructionResult<Effect> {
  store(instruction, operands, context, Word::checked_mul)
}

/**
  Writes the next input value. When there is none, returns `Effect::Blocked` before anything is
  modified, so the same step can be executed again later.
*/
fn input(instruction: &Instruction, operands: &[Word], context: &mut Context<'_>) -> InstructionResult<Effect> {
  let out = target(instruction, operands, 0, context)?;
  match context.io.read() {
    Some(received) => {
      context.memory.write(out, received)?;
      Ok(Effect::Continue)
    }
    None => Ok(Effect::Blocked),
  }
}

fn output(instruction: &Instruction, operands: &[Word], context: &mut Context<'_>) -> InstructionResult<Effect> {
  let a = value(instruction, operands, 0, context)?;
  context.io.write(a);
  Ok(Effect::Continue)
}

fn jump_if_true(instruction: &Instruction, operands: &[Word], context: &mut Context<'_>) -> InstructionResult<Effect> {
  jump_if(instruction, operands, context, |test| test != 0)
}

fn jump_if_false(instruction: &Instruction, operands: &[Word], context: &mut Context<'_>) -> InstructionResult<Effect> {
  jump_if(instruction, operands, context, |test| test == 0)
}

fn less_than(instruction: &Instruction, operands: &[Word], context: &mut Context<'_>) -> InstructionResult<Effect> {
  store(instruction, operands, context, |a, b| Some((a < b) as Word))
}

fn equals(instruction: &Instruction, operands: &[Word], context: &mut Context<'_>) -> InstructionResult<Effect> {
  store(instruction, operands, context, |a, b| Some((a == b) as Word))
}

fn adjust_base(instruction: &Instruction, operands: &[Word], context: &mut Context<'_>) -> InstructionResult<Effect> {
  let a = value(instruction, operands, 0, context)?;
  let base = relative(instruction, context, a)?;
  *context.base_pointer = base;
  Ok(Effect::Continue)
}

fn halt(_instruction: &Instruction, _operands: &[Word], _context: &mut Context<'_>) -> InstructionResult<Effect> {
  Ok(Effect::Halt)
}

// endregion

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;
  use crate::bytecode::decode;
  use crate::error::{FaultKind, MemoryFault};

  struct Fixture {
    memory       : Memory,
    io           : IoChannel,
    base_pointer : Word,
  }

  impl Fixture {
    fn new(memory: Vec<Word>, inputs: Vec<Word>) -> Fixture {
      Fixture { memory: Memory::new(memory), io: IoChannel::new(inputs), base_pointer: 0 }
    }

    fn run(&mut self, word: Word, operands: &[Word]) -> InstructionResult<Effect> {
      let instruction = decode(word)?;
      let apply = INSTRUCTION_TABLE[&instruction.opcode];
      let mut context = Context {
        memory       : &mut self.memory,
        io           : &mut self.io,
        base_pointer : &mut self.base_pointer,
      };
      apply(&instruction, operands, &mut context)
    }
  }

  #[test]
  fn table_covers_every_opcode() {
    for opcode in Opcode::iter() {
      assert!(INSTRUCTION_TABLE.contains_key(&opcode), "missing {}", opcode);
    }
  }

  #[test]
  fn add_and_mult_by_position_and_value() {
    let mut fixture = Fixture::new(vec![0, 30, 40], vec![]);
    assert_eq!(fixture.run(1, &[1, 2, 0]), Ok(Effect::Continue));
    assert_eq!(fixture.memory.program(), &[70, 30, 40]);

    assert_eq!(fixture.run(1102, &[-2, 2, 0]), Ok(Effect::Continue));
    assert_eq!(fixture.memory.program(), &[-4, 30, 40]);
  }

  #[test]
  fn relative_parameters_use_the_base_pointer() {
    let mut fixture = Fixture::new(vec![0, 5, 6], vec![]);
    fixture.base_pointer = 1;
    assert_eq!(fixture.run(22201, &[0, 1, -1]), Ok(Effect::Continue));
    assert_eq!(fixture.memory.program(), &[11, 5, 6]);
  }

  #[test]
  fn comparisons_write_one_or_zero() {
    let mut fixture = Fixture::new(vec![0, 0], vec![]);
    fixture.run(1107, &[3, 8, 0]).unwrap();
    fixture.run(1108, &[3, 8, 1]).unwrap();
    assert_eq!(fixture.memory.program(), &[1, 0]);
  }

  #[test]
  fn writing_to_an_immediate_faults_without_side_effects() {
    let mut fixture = Fixture::new(vec![0, 0, 0], vec![5]);
    let fault = FaultKind::Instruction(InstructionFault::ImmediateWrite { opcode: Opcode::Add });
    assert_eq!(fixture.run(10001, &[1, 2, 0]), Err(fault));

    let fault = FaultKind::Instruction(InstructionFault::ImmediateWrite { opcode: Opcode::Input });
    assert_eq!(fixture.run(103, &[0]), Err(fault));
    assert_eq!(fixture.io.pending(), 1);
  }

  #[test]
  fn negative_target_faults_before_consuming_input() {
    let mut fixture = Fixture::new(vec![0], vec![5]);
    assert_eq!(fixture.run(3, &[-1]), Err(FaultKind::Memory(MemoryFault::NegativeAddress(-1))));
    assert_eq!(fixture.io.pending(), 1);
  }

  #[test]
  fn input_blocks_without_changing_anything() {
    let mut fixture = Fixture::new(vec![7], vec![]);
    assert_eq!(fixture.run(3, &[0]), Ok(Effect::Blocked));
    assert_eq!(fixture.memory.program(), &[7]);

    fixture.io.extend_input(vec![9]);
    assert_eq!(fixture.run(3, &[0]), Ok(Effect::Continue));
    assert_eq!(fixture.memory.program(), &[9]);
  }

  #[test]
  fn output_appends() {
    let mut fixture = Fixture::new(vec![12], vec![]);
    fixture.run(4, &[0]).unwrap();
    fixture.run(104, &[-3]).unwrap();
    assert_eq!(fixture.io.outputs(), &[12, -3]);
  }

  #[test]
  fn jumps_report_their_target() {
    let mut fixture = Fixture::new(vec![], vec![]);
    assert_eq!(fixture.run(1105, &[1, 9]), Ok(Effect::Jump(9)));
    assert_eq!(fixture.run(1105, &[0, 9]), Ok(Effect::Continue));
    assert_eq!(fixture.run(1106, &[0, 4]), Ok(Effect::Jump(4)));
    assert_eq!(fixture.run(1106, &[-1, 4]), Ok(Effect::Continue));
  }

  #[test]
  fn adjust_base_accumulates() {
    let mut fixture = Fixture::new(vec![], vec![]);
    fixture.run(109, &[19]).unwrap();
    fixture.run(109, &[-4]).unwrap();
    assert_eq!(fixture.base_pointer, 15);
  }

  #[test]
  fn overflow_faults() {
    let mut fixture = Fixture::new(vec![0], vec![]);
    let fault = FaultKind::Instruction(InstructionFault::Overflow { opcode: Opcode::Mult });
    assert_eq!(fixture.run(1102, &[Word::MAX, 2, 0]), Err(fault));
    assert_eq!(fixture.memory.program(), &[0]);
  }

  #[test]
  fn halt_halts() {
    let mut fixture = Fixture::new(vec![], vec![]);
    assert_eq!(fixture.run(99, &[]), Ok(Effect::Halt));
  }
}
