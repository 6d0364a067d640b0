//! Error types for the circuit text parser.

use alsvid_ir::IrError;
use thiserror::Error;

/// Errors that can occur while parsing circuit text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A character that cannot start a gate name.
    #[error("Unexpected character {found} where a gate name should start")]
    UnexpectedCharacter {
        /// The offending character, or "end of input".
        found: String,
    },

    /// Gate name not present in the catalog.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Two targets without spacing between them.
    #[error("Gate targets must be separated by spacing")]
    MissingTargetSeparator,

    /// A digit was required.
    #[error("Expected a digit but got {found}")]
    ExpectedDigit {
        /// The offending character, or "end of input".
        found: String,
    },

    /// A numeric target at or above 2^24.
    #[error("Number too large (qubit indices must be below 2^24)")]
    NumberTooLarge,

    /// Parens argument token that is not a non-negative finite real.
    #[error("Not a non-negative real number: '{0}'")]
    NotANonNegativeReal(String),

    /// Gate requires a parens argument but none was given.
    #[error("Gate {gate}(X) missing a parens argument")]
    MissingParensArgument {
        /// Name of the gate.
        gate: &'static str,
    },

    /// Parens argument without a closing ')'.
    #[error("Gate {gate}(X) missing a closing parens for its argument")]
    UnclosedParensArgument {
        /// Name of the gate.
        gate: &'static str,
    },

    /// Block gate without a '{' on the same line.
    #[error("Missing '{{' at start of {gate} block")]
    MissingBlockOpen {
        /// Name of the gate.
        gate: &'static str,
    },

    /// '{' after a gate that opens no block.
    #[error("Unexpected '{{' after non-block gate {gate}")]
    UnexpectedBlockOpen {
        /// Name of the gate.
        gate: &'static str,
    },

    /// End of input inside a block.
    #[error("Unterminated block: got a '{{' without an eventual '}}'")]
    UnterminatedBlock,

    /// '}' outside any block.
    #[error("Uninitiated block: got a '}}' without a '{{'")]
    StrayBlockClose,

    /// Record target without the '@' marker.
    #[error("Missing @ in record target (like '2@-3')")]
    MissingRecordAt,

    /// Record target '@' not followed by '-'.
    #[error("Missing - after @ in record target (like '2@-3')")]
    MissingRecordMinus,

    /// Record lookback of zero.
    #[error("Minimum lookback in a record target (like '2@-3') is -1, not -0")]
    ZeroLookback,

    /// Record lookback beyond the representable range.
    #[error("Maximum lookback in a record target (like '2@-3') is -15")]
    LookbackTooLarge,

    /// Pauli target without a leading X, Y or Z.
    #[error("Expected a Pauli (X, Y or Z) but got {found}")]
    ExpectedPauli {
        /// The offending character, or "end of input".
        found: String,
    },

    /// Space between a Pauli letter and its qubit index.
    #[error("Unexpected space after Pauli before target qubit index")]
    SpaceAfterPauli,

    /// REPEAT with anything but a single repetition count.
    #[error("Invalid instruction: expected one repetition count like 'REPEAT 100 {{'")]
    RepeatArity,

    /// REPEAT with a repetition count of zero.
    #[error("Repeating 0 times is not supported")]
    ZeroRepetitions,

    /// Schema rejection from the circuit builder.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
