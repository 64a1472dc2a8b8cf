//! Words, and an `Either` type that says which memory segment an address lands in.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use crate::error::{MemoryFault, MemoryResult};

/// Every program value and every operand is a signed 64 bit word.
pub type Word = i64;
// `AddressNumberType` is `usize`, as it is naturally an index into a memory store.
pub type AddressNumberType = usize;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Address {
  /// An index into the loaded program image, segment A.
  Program(AddressNumberType),
  /// An index into the scratch space after the program image, segment B. Counts from zero at the
  /// end of the program.
  Scratch(AddressNumberType),
}

impl Address {
  /**
    Classifies a raw word as an address in a memory whose program image is `program_len` words
    long. Negative words are never addresses.
  */
  pub fn locate(raw: Word, program_len: AddressNumberType) -> MemoryResult<Address> {
    let idx = to_index(raw)?;
    match idx < program_len {
      true  => Ok(Address::Program(idx)),
      false => Ok(Address::Scratch(idx - program_len)),
    }
  }

  /// Converts the address back to an index into the whole logical address space.
  pub fn idx(&self, program_len: AddressNumberType) -> AddressNumberType {
    match self {
      Address::Program(i) => *i,
      Address::Scratch(i) => program_len + *i,
    }
  }
}

/// Converts a word to an index, faulting on negative values.
pub fn to_index(raw: Word) -> MemoryResult<AddressNumberType> {
  if raw < 0 {
    return Err(MemoryFault::NegativeAddress(raw));
  }
  AddressNumberType::try_from(raw).map_err(|_| MemoryFault::Exhausted { address: raw })
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Address::Program(i) => {
        write!(f, "A[{}]", i)
      },
      Address::Scratch(i) => {
        write!(f, "B[{}]", i)
      }
    }
  }
}
