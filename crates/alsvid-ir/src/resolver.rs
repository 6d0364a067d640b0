//! Detector and observable resolution over the measurement record.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, OperationRef};
use crate::error::{IrError, IrResult};
use crate::gate::gate_set;

/// An ordered collection of absolute measurement indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementSet {
    /// Global 0-based measurement ordinals, in reference order.
    pub indices: Vec<usize>,
}

impl MeasurementSet {
    /// Combine with another set by concatenation (the multiplicative
    /// combination of the stabilizer interpretation).
    pub fn merge(&mut self, other: &MeasurementSet) {
        self.indices.extend_from_slice(&other.indices);
    }
}

impl Circuit {
    /// Resolve every `DETECTOR` and `OBSERVABLE_INCLUDE` operation to
    /// absolute measurement indices.
    ///
    /// Walks the circuit once, assigning each result-producing target
    /// the next global measurement ordinal and recording it against
    /// the target's qubit. A lookback target `q@-dt` resolves to the
    /// `dt`-th most recent measurement of qubit `q`. Observables are
    /// indexed by the operation's argument and grown on demand; each
    /// `OBSERVABLE_INCLUDE` contributes by concatenation.
    ///
    /// Fails when a lookback is unspecified or reaches before the
    /// qubit's first measurement, or when an observable index is not
    /// a non-negative integer.
    pub fn detectors_and_observables(
        &self,
    ) -> IrResult<(Vec<MeasurementSet>, Vec<MeasurementSet>)> {
        let gates = gate_set();
        let detector = gates.detector_id();
        let observable_include = gates.observable_include_id();

        let mut history: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
        let mut next_index = 0usize;
        let mut detectors = Vec::new();
        let mut observables: Vec<MeasurementSet> = Vec::new();

        for op in self.operations() {
            if op.gate().produces_results() {
                for t in op.targets() {
                    history.entry(t.qubit_index()).or_default().push(next_index);
                    next_index += 1;
                }
            } else if op.gate().id == detector {
                detectors.push(resolve_lookbacks(&op, &history)?);
            } else if op.gate().id == observable_include {
                let arg = op.arg();
                if arg < 0.0 || arg.fract() != 0.0 {
                    return Err(IrError::ObservableIndexNotInteger(arg));
                }
                let index = arg as usize;
                if observables.len() <= index {
                    observables.resize_with(index + 1, MeasurementSet::default);
                }
                let contribution = resolve_lookbacks(&op, &history)?;
                observables[index].merge(&contribution);
            }
        }
        Ok((detectors, observables))
    }
}

fn resolve_lookbacks(
    op: &OperationRef<'_>,
    history: &FxHashMap<u32, Vec<usize>>,
) -> IrResult<MeasurementSet> {
    let mut set = MeasurementSet::default();
    for t in op.targets() {
        let dt = t.lookback() as usize;
        if dt == 0 {
            return Err(IrError::UnspecifiedLookback);
        }
        let seen = history.get(&t.qubit_index()).map_or(&[][..], Vec::as_slice);
        if dt > seen.len() {
            return Err(IrError::LookbackBeforeFirstMeasurement);
        }
        set.indices.push(seen[seen.len() - dt]);
    }
    Ok(set)
}
