//! The VM's input and output channel.
//!
//! Input is a sequence with a read cursor. Reading past the end is not an error: `read` returns
//! `None` and the INPUT instruction turns that into a blocked step that can be retried once more
//! input has been fed. Output is an append-only sequence.

use crate::address::Word;

#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct IoChannel {
  inputs  : Vec<Word>,
  cursor  : usize,
  outputs : Vec<Word>,
}

impl IoChannel {

  pub fn new(inputs: Vec<Word>) -> IoChannel {
    IoChannel {
      inputs,
      ..IoChannel::default()
    }
  }

  /// Takes the next input value, or `None` if every value has been consumed.
  pub fn read(&mut self) -> Option<Word> {
    let value = self.inputs.get(self.cursor).copied()?;
    self.cursor += 1;
    Some(value)
  }

  pub fn write(&mut self, value: Word) {
    self.outputs.push(value);
  }

  /// Appends values after the existing input. The cursor does not move.
  pub fn extend_input<I: IntoIterator<Item = Word>>(&mut self, values: I) {
    self.inputs.extend(values);
  }

  /// Replaces the input sequence. The cursor does not move; see `rewind`.
  pub fn replace_input(&mut self, values: Vec<Word>) {
    self.inputs = values;
  }

  /// Moves the cursor back to the first input value.
  pub fn rewind(&mut self) {
    self.cursor = 0;
  }

  /// Number of input values not yet read.
  pub fn pending(&self) -> usize {
    self.inputs.len().saturating_sub(self.cursor)
  }

  pub fn has_input(&self) -> bool {
    self.pending() > 0
  }

  pub fn inputs(&self) -> &[Word] {
    &self.inputs
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn outputs(&self) -> &[Word] {
    &self.outputs
  }

  pub fn last_output(&self) -> Option<Word> {
    self.outputs.last().copied()
  }

  /// Removes and returns everything written so far.
  pub fn take_outputs(&mut self) -> Vec<Word> {
    std::mem::take(&mut self.outputs)
  }

  pub fn clear_outputs(&mut self) {
    self.outputs.clear();
  }
}
