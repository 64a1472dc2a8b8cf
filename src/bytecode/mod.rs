/*!

  An Intcode program is a flat sequence of signed 64 bit words. There is no separation between
  code and data: an instruction is simply the word at the instruction pointer followed by one
  operand word per parameter, and programs may overwrite their own instructions.

  The instruction word packs the opcode into its two lowest decimal digits and the addressing
  mode of each parameter into the digits above, one digit per parameter. The modes are:

    Position:   the operand is the address of the value.
    Immediate:  the operand is the value. Not allowed for parameters that are written.
    Relative:   the operand is added to the base pointer to form the address.

  Only the opcode is an enum. Modes are decoded into a small fixed array alongside it, which keeps
  a decoded `Instruction` `Copy` and allocation free.

*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::{format_program, parse_program, Disassembly};
pub use binary::{decode, encode, encode_instruction};
pub use instruction::{Instruction, Opcode, ParameterMode, Role, MAX_ARITY};
