//! Circuit data model: target arena, operations, builder, composition.

use std::ops::{Add, AddAssign, Mul, MulAssign};

use crate::error::{IrError, IrResult};
use crate::gate::{gate_set, Gate};
use crate::target::{
    TargetWord, INVERTED_MASK, PAULI_X_MASK, PAULI_Z_MASK, QUBIT_MASK, RECORD_MASK,
};

/// Append-only storage for the target words of every operation in a
/// circuit. Operations reference contiguous ranges of it, so copies of
/// an operation can share storage.
#[derive(Debug, Clone, Default)]
struct TargetArena {
    words: Vec<TargetWord>,
}

impl TargetArena {
    fn len(&self) -> u32 {
        self.words.len() as u32
    }

    /// Append `targets` at the tail and return the range they occupy.
    fn append(&mut self, targets: &[TargetWord]) -> TargetRange {
        let offset = self.len();
        self.words.extend_from_slice(targets);
        TargetRange {
            offset,
            len: targets.len() as u32,
        }
    }

    fn slice(&self, range: TargetRange) -> &[TargetWord] {
        &self.words[range.offset as usize..(range.offset + range.len) as usize]
    }

    fn clear(&mut self) {
        self.words.clear();
    }
}

/// Range of the owning circuit's arena holding one operation's targets.
#[derive(Debug, Clone, Copy)]
struct TargetRange {
    offset: u32,
    len: u32,
}

/// One instruction: a gate, a scalar argument, and an arena range.
///
/// Operations are arena-relative views; resolving their targets goes
/// through the owning [`Circuit`], which hands out [`OperationRef`]s.
#[derive(Debug, Clone)]
pub struct Operation {
    gate: &'static Gate,
    arg: f64,
    targets: TargetRange,
}

impl Operation {
    /// The gate descriptor.
    pub fn gate(&self) -> &'static Gate {
        self.gate
    }

    /// The scalar parens argument (0 when the gate takes none).
    pub fn arg(&self) -> f64 {
        self.arg
    }

    /// Number of targets.
    pub fn num_targets(&self) -> usize {
        self.targets.len as usize
    }
}

/// A borrowed view of an operation with its targets resolved against
/// the owning circuit's arena.
#[derive(Debug, Clone, Copy)]
pub struct OperationRef<'a> {
    gate: &'static Gate,
    arg: f64,
    targets: &'a [TargetWord],
}

impl<'a> OperationRef<'a> {
    /// The gate descriptor.
    pub fn gate(&self) -> &'static Gate {
        self.gate
    }

    /// The canonical gate name.
    pub fn name(&self) -> &'static str {
        self.gate.name
    }

    /// The scalar parens argument (0 when the gate takes none).
    pub fn arg(&self) -> f64 {
        self.arg
    }

    /// The operation's target words.
    pub fn targets(&self) -> &'a [TargetWord] {
        self.targets
    }

    /// Whether a following operation with this view's gate and
    /// argument could merge into it.
    pub fn can_fuse(&self, other: &OperationRef<'_>) -> bool {
        self.gate.id == other.gate.id && self.arg == other.arg && self.gate.is_fusable()
    }

    /// Equality up to an absolute tolerance on the argument.
    pub fn approx_equals(&self, other: &OperationRef<'_>, atol: f64) -> bool {
        self.gate.id == other.gate.id
            && self.targets == other.targets
            && (self.arg - other.arg).abs() <= atol
    }
}

impl PartialEq for OperationRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.gate.id == other.gate.id && self.arg == other.arg && self.targets == other.targets
    }
}

/// A straight-line stabilizer circuit: an ordered operation sequence
/// over an arena of packed targets, plus derived counters.
///
/// Invariants maintained by every mutating method:
/// - each operation's target range lies in the arena, appended in
///   program order;
/// - `num_measurements` is the total target count over
///   result-producing operations;
/// - `num_qubits` is one past the highest referenced qubit index;
/// - adjacent operations appended with fusing allowed never remain
///   separately when they could merge.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    arena: TargetArena,
    operations: Vec<Operation>,
    num_qubits: usize,
    num_measurements: usize,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// One past the highest referenced qubit index, or 0 when empty.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total number of measurement results the circuit produces.
    pub fn num_measurements(&self) -> usize {
        self.num_measurements
    }

    /// Number of operations (after fusion and repeat expansion).
    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    /// Whether the circuit holds no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The operation at `index`, if any.
    pub fn operation(&self, index: usize) -> Option<OperationRef<'_>> {
        self.operations.get(index).map(|op| self.resolve(op))
    }

    /// Iterate over the operations in program order.
    pub fn operations(&self) -> impl Iterator<Item = OperationRef<'_>> + '_ {
        self.operations.iter().map(move |op| self.resolve(op))
    }

    /// Drop every operation and target, keeping allocations.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.operations.clear();
        self.num_qubits = 0;
        self.num_measurements = 0;
    }

    fn resolve<'a>(&'a self, op: &Operation) -> OperationRef<'a> {
        OperationRef {
            gate: op.gate,
            arg: op.arg,
            targets: self.arena.slice(op.targets),
        }
    }

    fn update_counters(&mut self, gate: &'static Gate, appended: &[TargetWord]) {
        if gate.produces_results() {
            self.num_measurements += appended.len();
        }
        for t in appended {
            self.num_qubits = self.num_qubits.max(t.qubit_index() as usize + 1);
        }
    }

    /// Append one instruction by gate name.
    ///
    /// The gate is looked up in the catalog and `targets` are validated
    /// against its schema. A non-zero `arg` requires a gate that takes
    /// a parens argument. When `allow_fusing` is set and the previous
    /// operation has the same gate and argument (and the gate is
    /// fusable), the new targets extend the previous operation instead
    /// of starting a fresh one.
    pub fn append_op(
        &mut self,
        gate_name: &str,
        targets: &[TargetWord],
        arg: f64,
        allow_fusing: bool,
    ) -> IrResult<()> {
        let gate = gate_set()
            .get(gate_name)
            .ok_or_else(|| IrError::UnknownGate(gate_name.to_string()))?;
        validate_targets(gate, targets)?;
        if gate.takes_parens_argument() {
            if !(arg.is_finite() && arg >= 0.0) {
                return Err(IrError::InvalidParensArgument {
                    gate: gate.name,
                    value: arg,
                });
            }
        } else if arg != 0.0 {
            return Err(IrError::UnexpectedParensArgument { gate: gate.name });
        }

        if allow_fusing && gate.is_fusable() {
            if let Some(last) = self.operations.last_mut() {
                if last.gate.id == gate.id && last.arg == arg {
                    // The previous operation's range ends at the arena
                    // tail, so extending it is appending.
                    self.arena.words.extend_from_slice(targets);
                    last.targets.len += targets.len() as u32;
                    self.update_counters(gate, targets);
                    return Ok(());
                }
            }
        }
        let range = self.arena.append(targets);
        self.operations.push(Operation {
            gate,
            arg,
            targets: range,
        });
        self.update_counters(gate, targets);
        Ok(())
    }

    /// Append a single already-validated operation from another
    /// circuit, copying its target words into the local arena. Never
    /// fuses with the previous operation.
    pub fn append_operation(&mut self, op: OperationRef<'_>) {
        let range = self.arena.append(op.targets());
        self.operations.push(Operation {
            gate: op.gate(),
            arg: op.arg(),
            targets: range,
        });
        self.update_counters(op.gate(), op.targets());
    }

    /// Append `other`'s operations `repetitions` times.
    ///
    /// The first copy moves target words into the local arena; further
    /// copies replicate the operation sequence and share the freshly
    /// appended ranges. Counters reflect every logical copy. Zero
    /// repetitions appends nothing.
    pub fn append_repeated(&mut self, other: &Circuit, repetitions: usize) {
        if repetitions == 0 {
            return;
        }
        let start = self.operations.len();
        for op in other.operations() {
            self.append_operation(op);
        }
        let end = self.operations.len();
        for _ in 1..repetitions {
            self.operations.extend_from_within(start..end);
        }
        self.num_measurements += other.num_measurements * (repetitions - 1);
    }

    /// Equality up to an absolute tolerance on operation arguments.
    pub fn approx_equals(&self, other: &Circuit, atol: f64) -> bool {
        self.num_qubits == other.num_qubits
            && self.num_measurements == other.num_measurements
            && self.operations.len() == other.operations.len()
            && self
                .operations()
                .zip(other.operations())
                .all(|(a, b)| a.approx_equals(&b, atol))
    }
}

impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        self.num_qubits == other.num_qubits
            && self.num_measurements == other.num_measurements
            && self.operations.len() == other.operations.len()
            && self.operations().zip(other.operations()).all(|(a, b)| a == b)
    }
}

impl AddAssign<&Circuit> for Circuit {
    /// Concatenate another circuit onto this one.
    fn add_assign(&mut self, other: &Circuit) {
        self.append_repeated(other, 1);
    }
}

impl Add<&Circuit> for &Circuit {
    type Output = Circuit;

    fn add(self, other: &Circuit) -> Circuit {
        let mut result = self.clone();
        result += other;
        result
    }
}

impl MulAssign<usize> for Circuit {
    /// Repeat this circuit in place. A factor of 0 clears it; the
    /// replicated operations share arena ranges with their originals.
    fn mul_assign(&mut self, repetitions: usize) {
        if repetitions == 0 {
            self.clear();
            return;
        }
        let original = self.operations.len();
        for _ in 1..repetitions {
            self.operations.extend_from_within(0..original);
        }
        self.num_measurements *= repetitions;
    }
}

impl Mul<usize> for &Circuit {
    type Output = Circuit;

    fn mul(self, repetitions: usize) -> Circuit {
        let mut result = self.clone();
        result *= repetitions;
        result
    }
}

fn validate_targets(gate: &'static Gate, targets: &[TargetWord]) -> IrResult<()> {
    let mut valid_mask = QUBIT_MASK;
    if gate.produces_results() {
        valid_mask |= INVERTED_MASK;
    }
    if gate.targets_pauli_string() {
        valid_mask |= PAULI_X_MASK | PAULI_Z_MASK;
    }
    if gate.only_targets_records() || gate.can_target_records() {
        valid_mask |= RECORD_MASK;
    }
    for t in targets {
        if t.raw() & !valid_mask != 0 {
            return Err(IrError::InvalidTargetFlags {
                gate: gate.name,
                qubit: t.qubit_index(),
                flags: t.flag_bits(),
            });
        }
        if gate.targets_pauli_string() && !t.has_pauli_x() && !t.has_pauli_z() {
            return Err(IrError::MissingPauliComponent { gate: gate.name });
        }
        if gate.only_targets_records() && t.lookback() == 0 {
            return Err(IrError::MissingRecordLookback { gate: gate.name });
        }
    }
    if gate.targets_pairs() {
        if targets.len() % 2 != 0 {
            return Err(IrError::OddPairCount { gate: gate.name });
        }
        for pair in targets.chunks_exact(2) {
            if pair[0].qubit_index() == pair[1].qubit_index() {
                return Err(IrError::SelfInteraction {
                    gate: gate.name,
                    qubit: pair[0].qubit_index(),
                });
            }
        }
    }
    Ok(())
}
