//! Error types for the IR crate.

use thiserror::Error;

/// Errors produced by circuit construction and record resolution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate name not present in the catalog.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// A target carries flag bits its gate does not permit.
    #[error("Target {qubit} has invalid flags {flags:#010x} for gate {gate}")]
    InvalidTargetFlags {
        /// Name of the gate.
        gate: &'static str,
        /// Qubit index of the offending target.
        qubit: u32,
        /// The flag bits beyond the qubit index.
        flags: u32,
    },

    /// Non-zero argument on a gate that takes no parens argument.
    #[error("Gate {gate} doesn't take a parens argument")]
    UnexpectedParensArgument {
        /// Name of the gate.
        gate: &'static str,
    },

    /// Parens argument outside the non-negative finite range.
    #[error("Gate {gate} argument must be a non-negative finite real, got {value}")]
    InvalidParensArgument {
        /// Name of the gate.
        gate: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Odd number of targets on a pairwise gate.
    #[error("Two qubit gate {gate} applied to an odd number of targets")]
    OddPairCount {
        /// Name of the gate.
        gate: &'static str,
    },

    /// A target pair names the same qubit twice.
    #[error("Interacting target {qubit} with itself using gate {gate}")]
    SelfInteraction {
        /// Name of the gate.
        gate: &'static str,
        /// The self-interacting qubit index.
        qubit: u32,
    },

    /// Pauli-string target with neither X nor Z component.
    #[error("Gate {gate} requires a Pauli component on every target")]
    MissingPauliComponent {
        /// Name of the gate.
        gate: &'static str,
    },

    /// Record-only gate target without a lookback.
    #[error("Gate {gate} requires a record lookback (like '2@-3') on every target")]
    MissingRecordLookback {
        /// Name of the gate.
        gate: &'static str,
    },

    /// Record lookback of zero reached the resolver.
    #[error("Record lookback can't be 0 (unspecified)")]
    UnspecifiedLookback,

    /// Lookback farther back than the qubit's measurement history.
    #[error("Referred to a measurement result before the beginning of time")]
    LookbackBeforeFirstMeasurement,

    /// Observable index with a fractional part or negative sign.
    #[error("Observable index must be a non-negative integer, got {0}")]
    ObservableIndexNotInteger(f64),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
