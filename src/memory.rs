/*!
  Word addressable memory.

  Memory is a single buffer. The first `program_len` words are the program image the VM was
  loaded with (segment A). Everything after it is scratch space (segment B), which starts empty
  and is allocated in zeroed chunks of `ALLOC_SIZE` words the first time an address past the end
  is read or written. Both segments are writable, so programs may modify their own code. Memory
  never shrinks.
*/

use std::fmt::{Display, Formatter};

use crate::address::{to_index, Address, AddressNumberType, Word};
use crate::error::{MemoryFault, MemoryResult};
use crate::table::make_register_table;

/// Number of words added to scratch space per allocation.
pub const ALLOC_SIZE: usize = 64;

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Memory {
  cells       : Vec<Word>,
  program_len : AddressNumberType,
}

impl Memory {

  pub fn new(program: Vec<Word>) -> Memory {
    let program_len = program.len();
    Memory {
      cells: program,
      program_len,
    }
  }

  /// Total logical length: program image plus allocated scratch space.
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn program_len(&self) -> usize {
    self.program_len
  }

  pub fn scratch_len(&self) -> usize {
    self.cells.len() - self.program_len
  }

  /// The current contents of segment A.
  pub fn program(&self) -> &[Word] {
    &self.cells[..self.program_len]
  }

  pub fn scratch(&self) -> &[Word] {
    &self.cells[self.program_len..]
  }

  pub fn as_slice(&self) -> &[Word] {
    &self.cells
  }

  pub fn locate(&self, raw: Word) -> MemoryResult<Address> {
    Address::locate(raw, self.program_len)
  }

  /// Every allocated word labelled with its segment address, in address order.
  pub(crate) fn rows(&self) -> impl Iterator<Item = (Address, Word)> + '_ {
    let program_len = self.program_len;
    self.cells
        .iter()
        .enumerate()
        .map(move |(i, word)| match i < program_len {
          true  => (Address::Program(i), *word),
          false => (Address::Scratch(i - program_len), *word),
        })
  }

  /// Reads a word without allocating. `None` for negative or unallocated addresses.
  pub fn get(&self, raw: Word) -> Option<Word> {
    to_index(raw).ok().and_then(|idx| self.cells.get(idx).copied())
  }

  /// Reads a word, allocating scratch space if `raw` is past the end.
  pub fn read(&mut self, raw: Word) -> MemoryResult<Word> {
    let idx = self.allocate(raw)?;
    Ok(self.cells[idx])
  }

  /// Writes a word, allocating scratch space if `raw` is past the end.
  pub fn write(&mut self, raw: Word, value: Word) -> MemoryResult {
    let idx = self.allocate(raw)?;
    self.cells[idx] = value;
    Ok(())
  }

  /**
    Grows scratch space by whole chunks until `raw` is in range and returns it as an index.

    Addresses inside the program image never allocate.
  */
  fn allocate(&mut self, raw: Word) -> MemoryResult<AddressNumberType> {
    let idx = to_index(raw)?;
    if idx < self.cells.len() {
      return Ok(idx);
    }

    let exhausted = MemoryFault::Exhausted { address: raw };
    let missing   = idx - self.cells.len() + 1;
    let chunks    = (missing + ALLOC_SIZE - 1) / ALLOC_SIZE;
    let extra     = chunks.checked_mul(ALLOC_SIZE).ok_or(exhausted)?;
    self.cells.try_reserve_exact(extra).map_err(|_| exhausted)?;
    self.cells.resize(self.cells.len() + extra, 0);

    #[cfg(feature = "trace_computation")]
      println!("Allocated {} scratch words for address {}.", extra, raw);

    Ok(idx)
  }
}

impl Display for Memory {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", make_register_table(self.rows(), None))
  }
}
