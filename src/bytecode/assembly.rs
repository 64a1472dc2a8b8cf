/*!
  Text forms of a program.

  A program is loaded from its textual form, a comma separated list of signed integers such as
  `1,9,10,3,2,3,11,0,99,30,40,50`. Whitespace and line breaks may appear around any number, and
  a single trailing comma is tolerated.

  For diagnostics, `Disassembly` renders one instruction in memory together with the values its
  input parameters refer to, e.g.
  ```text
      4: 1002 4 3 4 # MULT(*4=33, 3) -> *4
  ```
*/

use std::fmt::{Display, Formatter};

use nom::{
  branch::alt,
  character::complete::{char as one_char, digit1, multispace0},
  combinator::{opt, recognize},
  multi::separated_list0,
  sequence::{delimited, pair, tuple},
  IResult,
};

use super::{decode, Instruction, ParameterMode, Role};
use crate::address::Word;
use crate::error::{InstructionResult, ParseError, ParseResult};
use crate::memory::Memory;

fn word_p(input: &str) -> IResult<&str, &str> {
  recognize(pair(opt(alt((one_char('-'), one_char('+')))), digit1))(input)
}

fn program_p(input: &str) -> IResult<&str, Vec<&str>> {
  delimited(
    multispace0,
    separated_list0(delimited(multispace0, one_char(','), multispace0), word_p),
    tuple((multispace0, opt(one_char(',')), multispace0)),
  )(input)
}

/// Parses the comma separated text form of a program into its words.
pub fn parse_program(text: &str) -> ParseResult<Vec<Word>> {
  let unexpected = |rest: &str| ParseError::Unexpected {
    offset : text.len() - rest.len(),
    found  : rest.chars().take(16).collect(),
  };

  let words = match program_p(text) {
    Ok(("", words))  => words,
    Ok((rest, _))    => return Err(unexpected(rest)),
    Err(nom::Err::Error(e))
    | Err(nom::Err::Failure(e)) => return Err(unexpected(e.input)),
    Err(nom::Err::Incomplete(_)) => return Err(unexpected("")),
  };

  words.into_iter()
       .map(|w| w.parse::<Word>().map_err(|_| ParseError::OutOfRange { text: w.to_string() }))
       .collect()
}

/// Renders a program back to its text form.
pub fn format_program(words: &[Word]) -> String {
  words.iter()
       .map(Word::to_string)
       .collect::<Vec<String>>()
       .join(",")
}

/// One decoded instruction as it sits in memory, for tracing and debugging.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Disassembly {
  pub pointer      : Word,
  pub word         : Word,
  pub instruction  : Instruction,
  pub operands     : Vec<Word>,
  pub base_pointer : Word,
  /// What each input parameter currently refers to, when it can be seen without allocating.
  pub resolved     : Vec<Option<Word>>,
}

impl Disassembly {
  /**
    Disassembles the instruction at `pointer` without modifying memory. Operand words beyond the
    allocated end of memory read as 0, which is what the VM would see.
  */
  pub fn new(memory: &Memory, pointer: Word, base_pointer: Word) -> InstructionResult<Disassembly> {
    let word        = memory.get(pointer).unwrap_or(0);
    let instruction = decode(word)?;
    let operands: Vec<Word> =
      (1..=instruction.opcode.arity() as Word)
        .map(|offset| pointer.checked_add(offset).and_then(|a| memory.get(a)).unwrap_or(0))
        .collect();

    let resolved =
      instruction.modes()
                 .iter()
                 .zip(&operands)
                 .map(|(mode, operand)| {
                   match mode {
                     ParameterMode::Position  => memory.get(*operand).or(Some(0)).filter(|_| *operand >= 0),
                     ParameterMode::Immediate => Some(*operand),
                     ParameterMode::Relative  => {
                       base_pointer.checked_add(*operand)
                                   .filter(|a| *a >= 0)
                                   .map(|a| memory.get(a).unwrap_or(0))
                     }
                   }
                 })
                 .collect();

    Ok(Disassembly { pointer, word, instruction, operands, base_pointer, resolved })
  }

  fn location(&self, mode: ParameterMode, operand: Word) -> String {
    match mode {
      ParameterMode::Position  => format!("*{}", operand),
      ParameterMode::Immediate => format!("!{}", operand),
      ParameterMode::Relative  => format!("*({}{:+})", self.base_pointer, operand),
    }
  }
}

impl Display for Disassembly {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let raw = std::iter::once(self.word)
                .chain(self.operands.iter().copied())
                .map(|w| w.to_string())
                .collect::<Vec<String>>()
                .join(" ");

    let mut inputs = vec![];
    let mut output = None;
    let parameters = self.instruction.opcode.roles().iter()
                         .zip(self.instruction.modes())
                         .zip(&self.operands)
                         .zip(&self.resolved);
    for (((role, mode), operand), value) in parameters {
      match (role, mode) {

        (Role::In, ParameterMode::Immediate) => inputs.push(operand.to_string()),

        (Role::In, _) => {
          let value = value.map(|v| v.to_string()).unwrap_or_else(|| "MemoryFault".to_string());
          inputs.push(format!("{}={}", self.location(*mode, *operand), value));
        }

        (Role::Out, _) => output = Some(self.location(*mode, *operand)),

      }
    }

    write!(f, "{}: {} # {}({})", self.pointer, raw, self.instruction.opcode, inputs.join(", "))?;
    if let Some(target) = output {
      write!(f, " -> {}", target)?;
    }
    Ok(())
  }
}
