//! Circuit Text Format Parser for Alsvid
//!
//! This crate parses the Alsvid stabilizer circuit text format: a
//! line-oriented instruction language of named gates applied to qubit
//! indices, with `REPEAT` blocks and measurement-record annotations
//! for detectors and logical observables. Rendering goes the other
//! way through `alsvid_ir`'s `Display` implementations, which emit the
//! same format.
//!
//! # Format
//!
//! | Construct | Example |
//! |-----------|---------|
//! | Gate application | `H 0 1` |
//! | Parens argument | `X_ERROR(0.001) 0` |
//! | Result target with inversion | `M !0 1` |
//! | Pauli target | `CORRELATED_ERROR(0.2) X0 Y1` |
//! | Record lookback | `DETECTOR 0@-1` |
//! | Repetition block | `REPEAT 100 { ... }` |
//! | Comment | `# to end of line` |
//!
//! Instructions are separated by line terminators; leading and
//! trailing whitespace is insignificant, and comment-only or empty
//! lines may appear anywhere. Qubit indices are below 2^24 and record
//! lookbacks range over 1..=15.
//!
//! # Example: Parsing
//!
//! ```rust
//! use alsvid_text::parse;
//!
//! let circuit = parse(
//!     "H 0\n\
//!      CNOT 0 1\n\
//!      M 0 1\n\
//!      DETECTOR 1@-1\n",
//! )
//! .unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_measurements(), 2);
//! assert_eq!(circuit.num_operations(), 4);
//! ```
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use alsvid_text::parse;
//!
//! let circuit = parse("H 0\nM 0 1\n").unwrap();
//! let reparsed = parse(&circuit.to_string()).unwrap();
//! assert_eq!(circuit, reparsed);
//! ```
//!
//! # Example: Streaming One Instruction at a Time
//!
//! ```rust
//! use alsvid_ir::Circuit;
//! use alsvid_text::InstructionReader;
//!
//! let mut reader = InstructionReader::new("H 0\nM 0\n".bytes());
//! let mut circuit = Circuit::new();
//! while reader.read_instruction(&mut circuit).unwrap() {}
//! assert_eq!(circuit.num_operations(), 2);
//! ```
//!
//! The reader pulls single bytes from any `Iterator<Item = u8>`, so a
//! caller can stream from a file or socket by adapting it to an
//! iterator (and can abort a parse by ending the iterator early).

mod error;
mod parser;

pub use error::{ParseError, ParseResult};
pub use parser::{append_from_str, parse, InstructionReader};
