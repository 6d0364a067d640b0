//! Alsvid Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing
//! stabilizer circuits in Alsvid: a straight-line sequence of gate
//! applications over packed 32-bit targets, with measurement-record
//! annotations for detectors and logical observables.
//!
//! # Overview
//!
//! Operations do not own their targets. A [`Circuit`] owns an
//! append-only arena of [`TargetWord`]s and every operation references
//! a contiguous range of it, which makes appending cheap and lets
//! repeat expansion replicate operations without copying target data.
//! Borrowed [`OperationRef`] views resolve the ranges for inspection,
//! comparison, and rendering.
//!
//! # Core Components
//!
//! - **Targets**: [`TargetWord`] packs a qubit index with Pauli tags,
//!   a measurement-record lookback, or a result-inversion bit
//! - **Gates**: [`Gate`] descriptors with [`GateFlags`] behavior
//!   masks, looked up by name in the process-wide [`gate_set`]
//! - **Circuit**: [`Circuit`] with a validating builder
//!   ([`Circuit::append_op`]), adjacent-operation fusion, composition
//!   operators, and equality relations
//! - **Resolution**: [`Circuit::detectors_and_observables`] maps
//!   record lookbacks to absolute measurement indices
//! - **Rendering**: `Display` produces the canonical one-line-per-
//!   operation text form
//!
//! # Example: Building and Rendering
//!
//! ```rust
//! use alsvid_ir::{Circuit, TargetWord};
//!
//! let mut circuit = Circuit::new();
//! circuit.append_op("H", &[TargetWord::qubit(0)], 0.0, true).unwrap();
//! circuit
//!     .append_op(
//!         "CNOT",
//!         &[TargetWord::qubit(0), TargetWord::qubit(1)],
//!         0.0,
//!         true,
//!     )
//!     .unwrap();
//! circuit
//!     .append_op(
//!         "M",
//!         &[TargetWord::qubit(0), TargetWord::qubit(1)],
//!         0.0,
//!         true,
//!     )
//!     .unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_measurements(), 2);
//! assert_eq!(
//!     circuit.to_string(),
//!     "# Circuit [num_qubits=2, num_measurements=2]\nH 0\nCNOT 0 1\nM 0 1"
//! );
//! ```
//!
//! # Example: Detectors and Observables
//!
//! ```rust
//! use alsvid_ir::{Circuit, TargetWord};
//!
//! let mut circuit = Circuit::new();
//! circuit
//!     .append_op(
//!         "M",
//!         &[
//!             TargetWord::qubit(0),
//!             TargetWord::qubit(1),
//!             TargetWord::qubit(2),
//!         ],
//!         0.0,
//!         true,
//!     )
//!     .unwrap();
//! circuit
//!     .append_op(
//!         "DETECTOR",
//!         &[TargetWord::record(0, 1), TargetWord::record(2, 1)],
//!         0.0,
//!         true,
//!     )
//!     .unwrap();
//!
//! let (detectors, _observables) = circuit.detectors_and_observables().unwrap();
//! assert_eq!(detectors[0].indices, vec![0, 2]);
//! ```

pub mod circuit;
mod display;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod target;

pub use circuit::{Circuit, Operation, OperationRef};
pub use error::{IrError, IrResult};
pub use gate::{gate_set, Gate, GateFlags, GateId, GateSet, MAX_GATE_NAME_LEN};
pub use resolver::MeasurementSet;
pub use target::TargetWord;
