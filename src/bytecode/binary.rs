/*!
  This module is responsible for the encoding and decoding of instruction words.

  An instruction word is a decimal number. The two lowest digits are the opcode and each higher
  digit is the mode of one parameter, starting with the hundreds digit for the first parameter:
  ```text
      1002  ->  [mode 3 = 0][mode 2 = 1][mode 1 = 0][opcode = 02]  ->  MULT(position, immediate, position)
  ```
  Digits above the last parameter are ignored. Absent digits read as zero, which is `Position`.
*/
use std::convert::TryFrom;

use super::{Instruction, Opcode, ParameterMode, MAX_ARITY};
use crate::address::Word;
use crate::error::InstructionFault;

const OPCODE_SIZE: Word = 100;

/// Decodes an instruction word into its opcode and parameter modes.
pub fn decode(word: Word) -> Result<Instruction, InstructionFault> {
  if word < 0 {
    return Err(InstructionFault::UnknownOpcode(word));
  }

  let opcode = u8::try_from(word % OPCODE_SIZE)
    .ok()
    .and_then(|code| Opcode::try_from(code).ok())
    .ok_or(InstructionFault::UnknownOpcode(word))?;

  let mut modes = [ParameterMode::Position; MAX_ARITY];
  let mut place = OPCODE_SIZE;
  for slot in modes.iter_mut().take(opcode.arity()) {
    let digit = (word / place) % 10;
    *slot = u8::try_from(digit)
      .ok()
      .and_then(|d| ParameterMode::try_from(d).ok())
      .ok_or(InstructionFault::MalformedMode { word, digit })?;
    place *= 10;
  }

  Ok(Instruction::new(opcode, &modes))
}

/**
  Encodes an opcode and its parameter modes as an instruction word. Missing modes are `Position`
  and modes past the opcode's arity are ignored, so this is the inverse of `decode`.
*/
pub fn encode(opcode: Opcode, modes: &[ParameterMode]) -> Word {
  let instruction = Instruction::new(opcode, modes);
  encode_instruction(&instruction)
}

pub fn encode_instruction(instruction: &Instruction) -> Word {
  let mut word  = instruction.opcode.code() as Word;
  let mut place = OPCODE_SIZE;
  for mode in instruction.modes() {
    word  += Into::<u8>::into(*mode) as Word * place;
    place *= 10;
  }
  word
}
