//! Whole programs run through the public API.

use intcode::{Fault, FaultKind, InstructionFault, MemoryFault, Stop, Vm, Word, ALLOC_SIZE};

fn run(program: &[Word], input: &[Word]) -> Vec<Word> {
  let mut vm = Vm::new(program.to_vec(), input.to_vec());
  assert_eq!(vm.run_to_completion(), Ok(Stop::Halted));
  vm.outputs().to_vec()
}

const QUINE: [Word; 16] = [109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99];

#[test]
fn quine_outputs_itself() {
  assert_eq!(run(&QUINE, &[]), QUINE.to_vec());
}

#[test]
fn quine_grows_scratch_memory() {
  let mut vm = Vm::new(QUINE.to_vec(), vec![]);
  vm.run_to_completion().unwrap();
  assert_eq!(vm.memory().program_len(), QUINE.len());
  assert_eq!(vm.memory().scratch_len(), 2 * ALLOC_SIZE);
  assert_eq!(vm.peek_memory(100), Ok(16));
}

#[test]
fn large_literal() {
  assert_eq!(run(&[104, 1125899906842624, 99], &[]), vec![1125899906842624]);
}

#[test]
fn sixteen_digit_multiply() {
  assert_eq!(run(&[1102, 34915192, 34915192, 7, 4, 7, 99, 0], &[]), vec![1219070632396864]);
}

#[test]
fn echo_input() {
  assert_eq!(run(&[3, 0, 4, 0, 99], &[1]), vec![1]);
}

#[test]
fn add_then_mult_from_data() {
  let mut vm = Vm::new(vec![1, 1, 1, 4, 99, 5, 6, 0, 99], vec![]);
  vm.run_to_completion().unwrap();
  assert_eq!(vm.memory().program(), &[30, 1, 1, 4, 2, 5, 6, 0, 99]);
}

#[test]
fn equals_position() {
  let program = [3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8];
  assert_eq!(run(&program, &[8]), vec![1]);
  assert_eq!(run(&program, &[7]), vec![0]);
  assert_eq!(run(&program, &[16]), vec![0]);
  assert_eq!(run(&program, &[-1]), vec![0]);
}

#[test]
fn less_than_position() {
  let program = [3, 9, 7, 9, 10, 9, 4, 9, 99, -1, 8];
  assert_eq!(run(&program, &[7]), vec![1]);
  assert_eq!(run(&program, &[-1]), vec![1]);
  assert_eq!(run(&program, &[8]), vec![0]);
}

#[test]
fn equals_and_less_than_immediate() {
  assert_eq!(run(&[3, 3, 1108, -1, 8, 3, 4, 3, 99], &[8]), vec![1]);
  assert_eq!(run(&[3, 3, 1108, -1, 8, 3, 4, 3, 99], &[9]), vec![0]);
  assert_eq!(run(&[3, 3, 1107, -1, 8, 3, 4, 3, 99], &[7]), vec![1]);
  assert_eq!(run(&[3, 3, 1107, -1, 8, 3, 4, 3, 99], &[16]), vec![0]);
}

#[test]
fn jump_tests_zero() {
  let position  = [3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9];
  let immediate = [3, 3, 1105, -1, 9, 1101, 0, 0, 12, 4, 12, 99, 1];
  for program in [&position[..], &immediate[..]].iter() {
    assert_eq!(run(program, &[0]), vec![0]);
    assert_eq!(run(program, &[8]), vec![1]);
    assert_eq!(run(program, &[-1]), vec![1]);
  }
}

#[test]
fn larger_jumper() {
  let program = [
    3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31,
    1106, 0, 36, 98, 0, 0, 1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104,
    999, 1105, 1, 46, 1101, 1000, 1, 20, 4, 20, 1105, 1, 46, 98, 99,
  ];
  assert_eq!(run(&program, &[7]), vec![999]);
  assert_eq!(run(&program, &[-1]), vec![999]);
  assert_eq!(run(&program, &[8]), vec![1000]);
  assert_eq!(run(&program, &[9]), vec![1001]);
  assert_eq!(run(&program, &[100]), vec![1001]);
}

#[test]
fn relative_base_reaches_far_scratch_memory() {
  // base += 2000; write input to base+19; output it.
  let program = [109, 2000, 203, 19, 204, 19, 99];
  let mut vm = Vm::new(program.to_vec(), vec![77]);
  vm.run_to_completion().unwrap();
  assert_eq!(vm.outputs(), &[77]);
  assert_eq!(vm.base_pointer(), 2000);
  assert!(vm.memory().len() > 2019);
  assert_eq!(vm.memory().scratch_len() % ALLOC_SIZE, 0);
}

#[test]
fn self_modifying_code() {
  // Overwrites the word at 6 with 99 before it is reached.
  let program = [1101, 90, 9, 6, 104, 5, 1, 0, 0, 0];
  assert_eq!(run(&program, &[]), vec![5]);
}

#[test]
fn run_stops_when_blocked_and_resumes() {
  let mut vm = Vm::new(vec![3, 11, 3, 12, 1, 11, 12, 13, 4, 13, 99, 0, 0, 0], vec![20]);
  assert_eq!(vm.run_to_completion(), Ok(Stop::Blocked));
  assert_eq!(vm.pointer(), Some(2));
  vm.feed_input(vec![22]);
  assert_eq!(vm.run_to_completion(), Ok(Stop::Halted));
  assert_eq!(vm.outputs(), &[42]);
}

#[test]
fn faults_carry_kind_and_pointer() {
  let mut vm = Vm::new(vec![1101, 1, 1, 9, 4, 0, 204, -10, 99, 0], vec![]);
  let fault = vm.run_to_completion().unwrap_err();
  assert_eq!(fault, Fault { pointer: 6, kind: FaultKind::Memory(MemoryFault::NegativeAddress(-10)) });
  assert_eq!(vm.outputs(), &[1101]);
  assert_eq!(fault.to_string(), "fault at pointer 6: cannot access negative address -10");

  let mut vm = Vm::new(vec![1, 0, 0, 0, 77], vec![]);
  assert_eq!(
    vm.run_to_completion(),
    Err(Fault::new(4, InstructionFault::UnknownOpcode(77)))
  );
}

#[test]
fn state_tables_render_in_every_status() {
  let mut vm = Vm::new(QUINE.to_vec(), vec![]);
  assert!(vm.to_string().starts_with("Running."));
  vm.run_to_completion().unwrap();
  let text = vm.to_string();
  assert!(text.starts_with("Halted."));
  assert!(text.contains("B[84] ="));
  assert!(vm.memory().to_string().contains("A[15] ="));

  let mut vm = Vm::new(vec![42], vec![]);
  vm.run_to_completion().unwrap_err();
  assert!(vm.to_string().starts_with("Faulted: fault at pointer 0"));
}
