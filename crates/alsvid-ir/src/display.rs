//! Canonical textual rendering.
//!
//! The output shape is the circuit text format itself: parsing the
//! rendering of a fusion-canonical circuit reproduces it exactly.

use std::fmt;

use crate::circuit::{Circuit, OperationRef};

impl fmt::Display for OperationRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        let arg = self.arg();
        if arg != 0.0 {
            if arg.fract() == 0.0 {
                write!(f, "({})", arg as u64)?;
            } else {
                write!(f, "({arg})")?;
            }
        }
        for t in self.targets() {
            write!(f, " ")?;
            if self.gate().produces_results() {
                if t.is_inverted() {
                    write!(f, "!")?;
                }
                write!(f, "{}", t.qubit_index())?;
            } else if self.gate().targets_pauli_string() {
                let selector = usize::from(t.has_pauli_x()) + 2 * usize::from(t.has_pauli_z());
                let pauli = ['I', 'X', 'Z', 'Y'][selector];
                write!(f, "{pauli}{}", t.qubit_index())?;
            } else {
                write!(f, "{}", t.qubit_index())?;
                if t.lookback() != 0 {
                    write!(f, "@-{}", t.lookback())?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "# Circuit [num_qubits={}, num_measurements={}]",
            self.num_qubits(),
            self.num_measurements()
        )?;
        for op in self.operations() {
            write!(f, "\n{op}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::circuit::Circuit;
    use crate::target::TargetWord;

    fn q(index: u32) -> TargetWord {
        TargetWord::qubit(index)
    }

    #[test]
    fn test_render_plain_operations() {
        let mut circuit = Circuit::new();
        circuit.append_op("H", &[q(0), q(2)], 0.0, true).unwrap();
        circuit.append_op("CNOT", &[q(0), q(1)], 0.0, true).unwrap();
        assert_eq!(
            circuit.to_string(),
            "# Circuit [num_qubits=3, num_measurements=0]\nH 0 2\nCNOT 0 1"
        );
    }

    #[test]
    fn test_render_argument_forms() {
        let mut circuit = Circuit::new();
        circuit.append_op("X_ERROR", &[q(0)], 0.125, true).unwrap();
        circuit
            .append_op("DEPOLARIZE1", &[q(1)], 1.0, true)
            .unwrap();
        let text = circuit.to_string();
        assert!(text.contains("X_ERROR(0.125) 0"));
        // Integral arguments print without a decimal point.
        assert!(text.contains("DEPOLARIZE1(1) 1"));
    }

    #[test]
    fn test_render_result_targets() {
        let mut circuit = Circuit::new();
        circuit
            .append_op("M", &[TargetWord::inverted(0), q(1)], 0.0, true)
            .unwrap();
        assert!(circuit.to_string().ends_with("M !0 1"));
    }

    #[test]
    fn test_render_pauli_targets() {
        let mut circuit = Circuit::new();
        circuit
            .append_op(
                "CORRELATED_ERROR",
                &[
                    TargetWord::pauli_x(0),
                    TargetWord::pauli_z(1),
                    TargetWord::pauli_y(2),
                ],
                0.25,
                true,
            )
            .unwrap();
        assert!(circuit
            .to_string()
            .ends_with("CORRELATED_ERROR(0.25) X0 Z1 Y2"));
    }

    #[test]
    fn test_render_record_targets() {
        let mut circuit = Circuit::new();
        circuit.append_op("M", &[q(0), q(1)], 0.0, true).unwrap();
        circuit
            .append_op(
                "DETECTOR",
                &[TargetWord::record(0, 2), TargetWord::record(1, 1)],
                0.0,
                true,
            )
            .unwrap();
        assert!(circuit.to_string().ends_with("DETECTOR 0@-2 1@-1"));
    }

    #[test]
    fn test_render_optional_record_targets() {
        let mut circuit = Circuit::new();
        circuit.append_op("M", &[q(1)], 0.0, true).unwrap();
        circuit
            .append_op("CNOT", &[TargetWord::record(1, 1), q(0)], 0.0, true)
            .unwrap();
        assert!(circuit.to_string().ends_with("CNOT 1@-1 0"));
    }

    #[test]
    fn test_render_header_counts() {
        let mut circuit = Circuit::new();
        circuit.append_op("M", &[q(4)], 0.0, true).unwrap();
        assert!(circuit
            .to_string()
            .starts_with("# Circuit [num_qubits=5, num_measurements=1]"));
    }

    #[test]
    fn test_render_canonical_alias_name() {
        let mut circuit = Circuit::new();
        circuit.append_op("cx", &[q(0), q(1)], 0.0, true).unwrap();
        assert!(circuit.to_string().ends_with("CNOT 0 1"));
    }

    #[test]
    fn test_render_empty_target_list() {
        let mut circuit = Circuit::new();
        circuit.append_op("H", &[], 0.0, true).unwrap();
        assert_eq!(
            circuit.to_string(),
            "# Circuit [num_qubits=0, num_measurements=0]\nH"
        );
    }
}
