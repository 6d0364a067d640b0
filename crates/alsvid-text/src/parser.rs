//! Streaming parser for the circuit text format.
//!
//! The parser pulls one byte at a time from a caller-supplied source
//! and keeps a single byte of lookahead, so it can run over in-memory
//! text and over byte streams alike. Operations are staged in a
//! scratch buffer and appended to the target circuit atomically, so a
//! failed instruction leaves no partial operation behind.

use alsvid_ir::gate::{gate_set, Gate};
use alsvid_ir::target::{MAX_LOOKBACK, QUBIT_MASK};
use alsvid_ir::{Circuit, TargetWord};
use tracing::debug;

use crate::error::{ParseError, ParseResult};

/// How much input a single read call consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadCondition {
    /// Read until the source is exhausted.
    UntilEndOfFile,
    /// Read until the balanced `}` closing the current block.
    UntilEndOfBlock,
    /// Read a single top-level instruction.
    AsLittleAsPossible,
}

/// Longest accepted parens-argument token.
const MAX_ARG_TOKEN_LEN: usize = 63;

/// Parse a complete circuit from text.
///
/// # Example
///
/// ```rust
/// let circuit = alsvid_text::parse("H 0\nCNOT 0 1\nM 0 1\n").unwrap();
/// assert_eq!(circuit.num_operations(), 3);
/// assert_eq!(circuit.num_measurements(), 2);
/// ```
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let mut circuit = Circuit::new();
    append_from_str(&mut circuit, source)?;
    Ok(circuit)
}

/// Parse `source` and append its instructions to `circuit`.
///
/// Returns whether any operations were appended. Fusion applies within
/// the parsed text but never merges a parsed operation into an
/// operation that predates this call.
pub fn append_from_str(circuit: &mut Circuit, source: &str) -> ParseResult<bool> {
    let mut reader = InstructionReader::new(source.bytes());
    let appended = reader.read_operations(circuit, ReadCondition::UntilEndOfFile)?;
    debug!(operations = appended, "parsed circuit text");
    Ok(appended > 0)
}

/// A streaming instruction reader over a byte source.
///
/// [`read_instruction`](Self::read_instruction) consumes exactly one
/// top-level instruction per call, which lets callers interleave
/// parsing with execution without buffering whole programs.
pub struct InstructionReader<I: Iterator<Item = u8>> {
    source: std::iter::Fuse<I>,
    /// Current byte of lookahead; `None` at end of input.
    cur: Option<u8>,
    /// Scratch buffer for the targets of the instruction being read.
    targets: Vec<TargetWord>,
}

impl<I: Iterator<Item = u8>> InstructionReader<I> {
    /// Create a reader over a byte source.
    pub fn new(source: I) -> Self {
        Self {
            source: source.fuse(),
            cur: None,
            targets: Vec::new(),
        }
    }

    /// Read a single top-level instruction into `circuit`.
    ///
    /// A `REPEAT` block counts as one instruction: its whole expansion
    /// is appended. Returns `false` once the source is exhausted.
    pub fn read_instruction(&mut self, circuit: &mut Circuit) -> ParseResult<bool> {
        Ok(self.read_operations(circuit, ReadCondition::AsLittleAsPossible)? > 0)
    }

    /// Read instructions into `circuit` until the source is exhausted.
    /// Returns the number of operations appended.
    pub fn read_all(&mut self, circuit: &mut Circuit) -> ParseResult<usize> {
        self.read_operations(circuit, ReadCondition::UntilEndOfFile)
    }

    fn bump(&mut self) {
        self.cur = self.source.next();
    }

    fn skip_inline_ws(&mut self) {
        while matches!(self.cur, Some(b' ') | Some(b'\t')) {
            self.bump();
        }
    }

    /// Skip whitespace (including line terminators) and comment lines
    /// between instructions.
    fn skip_dead_space(&mut self) {
        loop {
            while matches!(self.cur, Some(c) if c.is_ascii_whitespace()) {
                self.bump();
            }
            if self.cur == Some(b'#') {
                while !matches!(self.cur, None | Some(b'\n')) {
                    self.bump();
                }
            } else {
                return;
            }
        }
    }

    fn read_operations(
        &mut self,
        circuit: &mut Circuit,
        condition: ReadCondition,
    ) -> ParseResult<usize> {
        let before = circuit.num_operations();
        let repeat_id = gate_set().repeat_id();
        let mut can_fuse = false;
        loop {
            self.bump();
            self.skip_dead_space();
            match self.cur {
                None => {
                    if condition == ReadCondition::UntilEndOfBlock {
                        return Err(ParseError::UnterminatedBlock);
                    }
                    break;
                }
                Some(b'}') => {
                    if condition != ReadCondition::UntilEndOfBlock {
                        return Err(ParseError::StrayBlockClose);
                    }
                    break;
                }
                Some(_) => {}
            }
            let (gate, arg) = self.read_operation()?;
            if gate.id == repeat_id {
                if self.targets.len() != 1 || self.targets[0].flag_bits() != 0 {
                    return Err(ParseError::RepeatArity);
                }
                let repetitions = self.targets[0].qubit_index() as usize;
                if repetitions == 0 {
                    return Err(ParseError::ZeroRepetitions);
                }
                let mut body = Circuit::new();
                self.read_operations(&mut body, ReadCondition::UntilEndOfBlock)?;
                circuit.append_repeated(&body, repetitions);
                // Fusion never crosses a block boundary: merging into
                // the last replica would change one copy of the body.
                can_fuse = false;
            } else {
                circuit.append_op(gate.name, &self.targets, arg, can_fuse)?;
                can_fuse = true;
            }
            if condition == ReadCondition::AsLittleAsPossible {
                break;
            }
        }
        Ok(circuit.num_operations() - before)
    }

    /// Read one instruction's name, optional parens argument, and
    /// targets (into the scratch buffer). On return the lookahead sits
    /// on the line terminator, a `{`, or end of input.
    fn read_operation(&mut self) -> ParseResult<(&'static Gate, f64)> {
        let gate = self.read_gate_name()?;

        let mut separated = false;
        if matches!(self.cur, Some(b' ') | Some(b'\t')) {
            self.skip_inline_ws();
            separated = true;
        }
        let mut arg = 0.0;
        if self.cur == Some(b'(') {
            arg = self.read_parens_argument(gate)?;
            separated = false;
        } else if gate.takes_parens_argument() {
            return Err(ParseError::MissingParensArgument { gate: gate.name });
        }

        self.targets.clear();
        self.read_targets(gate, separated)?;

        if gate.is_block() && self.cur != Some(b'{') {
            return Err(ParseError::MissingBlockOpen { gate: gate.name });
        }
        if self.cur == Some(b'{') && !gate.is_block() {
            return Err(ParseError::UnexpectedBlockOpen { gate: gate.name });
        }
        Ok((gate, arg))
    }

    fn read_gate_name(&mut self) -> ParseResult<&'static Gate> {
        // One byte longer than any valid name, so an overlong name
        // fails the catalog lookup instead of being truncated into a
        // valid one.
        let mut buf = [0u8; 32];
        let mut len = 0;
        while let Some(c) = self.cur {
            if len == buf.len() || !is_name_char(c) {
                break;
            }
            buf[len] = c;
            len += 1;
            self.bump();
        }
        if len == 0 {
            return Err(ParseError::UnexpectedCharacter {
                found: printable(self.cur),
            });
        }
        let name = std::str::from_utf8(&buf[..len]).expect("gate name bytes are ASCII");
        gate_set()
            .get(name)
            .ok_or_else(|| ParseError::UnknownGate(name.to_string()))
    }

    fn read_parens_argument(&mut self, gate: &'static Gate) -> ParseResult<f64> {
        // Lookahead is the '('.
        self.bump();
        self.skip_inline_ws();
        let value = self.read_non_negative_real()?;
        self.skip_inline_ws();
        if self.cur != Some(b')') {
            return Err(ParseError::UnclosedParensArgument { gate: gate.name });
        }
        self.bump();
        Ok(value)
    }

    fn read_non_negative_real(&mut self) -> ParseResult<f64> {
        let mut buf = [0u8; MAX_ARG_TOKEN_LEN];
        let mut len = 0;
        while len < buf.len() {
            match self.cur {
                Some(c) if is_real_char(c) => {
                    buf[len] = c;
                    len += 1;
                    self.bump();
                }
                _ => break,
            }
        }
        let token = std::str::from_utf8(&buf[..len]).expect("real-number bytes are ASCII");
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(ParseError::NotANonNegativeReal(token.to_string())),
        }
    }

    fn read_uint24(&mut self) -> ParseResult<u32> {
        let mut value = match self.cur {
            Some(c @ b'0'..=b'9') => u32::from(c - b'0'),
            other => {
                return Err(ParseError::ExpectedDigit {
                    found: printable(other),
                })
            }
        };
        self.bump();
        while let Some(c @ b'0'..=b'9') = self.cur {
            value = value * 10 + u32::from(c - b'0');
            if value > QUBIT_MASK {
                return Err(ParseError::NumberTooLarge);
            }
            self.bump();
        }
        Ok(value)
    }

    /// Advance past the separator before the next target. Returns
    /// `false` when the target list ends (line terminator, block
    /// opener, comment, or end of input).
    fn next_line_arg(&mut self, already_separated: bool) -> ParseResult<bool> {
        if !already_separated
            && !matches!(
                self.cur,
                None | Some(b' ') | Some(b'\t') | Some(b'#') | Some(b'\n') | Some(b'{')
            )
        {
            return Err(ParseError::MissingTargetSeparator);
        }
        self.skip_inline_ws();
        if self.cur == Some(b'#') {
            while !matches!(self.cur, None | Some(b'\n')) {
                self.bump();
            }
        }
        Ok(!matches!(self.cur, None | Some(b'\n') | Some(b'{')))
    }

    fn read_targets(&mut self, gate: &'static Gate, mut separated: bool) -> ParseResult<()> {
        while self.next_line_arg(separated)? {
            separated = false;
            let word = if gate.only_targets_records() {
                self.read_record_target(true)?
            } else if gate.can_target_records() {
                self.read_record_target(false)?
            } else if gate.produces_results() {
                self.read_result_target()?
            } else if gate.targets_pauli_string() {
                self.read_pauli_target()?
            } else {
                // '!' lexes here too; gates where inversion is
                // meaningless reject it through their schema.
                self.read_result_target()?
            };
            self.targets.push(word);
        }
        Ok(())
    }

    fn read_result_target(&mut self) -> ParseResult<TargetWord> {
        let inverted = self.cur == Some(b'!');
        if inverted {
            self.bump();
        }
        let q = self.read_uint24()?;
        Ok(if inverted {
            TargetWord::inverted(q)
        } else {
            TargetWord::qubit(q)
        })
    }

    fn read_pauli_target(&mut self) -> ParseResult<TargetWord> {
        let (x, z) = match self.cur {
            Some(b'X' | b'x') => (true, false),
            Some(b'Y' | b'y') => (true, true),
            Some(b'Z' | b'z') => (false, true),
            other => {
                return Err(ParseError::ExpectedPauli {
                    found: printable(other),
                })
            }
        };
        self.bump();
        if self.cur == Some(b' ') {
            return Err(ParseError::SpaceAfterPauli);
        }
        let q = self.read_uint24()?;
        Ok(TargetWord::pauli(q, x, z))
    }

    fn read_record_target(&mut self, required: bool) -> ParseResult<TargetWord> {
        let q = self.read_uint24()?;
        if self.cur == Some(b'@') {
            self.bump();
            if self.cur != Some(b'-') {
                return Err(ParseError::MissingRecordMinus);
            }
            self.bump();
            let dt = self.read_uint24()?;
            if dt == 0 {
                return Err(ParseError::ZeroLookback);
            }
            if dt > MAX_LOOKBACK {
                return Err(ParseError::LookbackTooLarge);
            }
            Ok(TargetWord::record(q, dt))
        } else if required {
            Err(ParseError::MissingRecordAt)
        } else {
            Ok(TargetWord::qubit(q))
        }
    }
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn is_real_char(c: u8) -> bool {
    c.is_ascii_digit() || matches!(c, b'.' | b'e' | b'E' | b'+' | b'-')
}

fn printable(c: Option<u8>) -> String {
    match c {
        Some(c) => format!("'{}'", char::from(c)),
        None => "end of input".to_string(),
    }
}
