/*!
  A virtual machine for Intcode programs.

  ```
  use intcode::{Vm, Stop};

  let mut vm = Vm::new(vec![3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8], vec![8]);
  assert_eq!(vm.run_to_completion(), Ok(Stop::Halted));
  assert_eq!(vm.outputs(), &[1]);
  ```

  Enable the `trace_computation` feature to print every executed instruction.
*/

mod address;
mod error;
mod instructions;
mod io;
mod memory;
mod table;
mod vm;
pub mod bytecode;

pub use address::{Address, Word};
pub use error::{Fault, FaultKind, InstructionFault, MemoryFault, ParseError};
pub use instructions::{Context, Effect, InstructionFn, INSTRUCTION_TABLE};
pub use io::IoChannel;
pub use memory::{Memory, ALLOC_SIZE};
pub use vm::{Status, Step, Stop, Vm};
