//! End-to-end scenarios for the circuit text format: parsing, fusion,
//! repeat expansion, record resolution, and canonical round-trips.

use alsvid_ir::{Circuit, IrError, TargetWord};
use alsvid_text::{parse, ParseError};

#[test]
fn test_bell_pair_program() {
    let circuit = parse("H 0\nCNOT 0 1\nM 0 1\n").unwrap();
    assert_eq!(circuit.num_operations(), 3);
    assert_eq!(circuit.num_qubits(), 2);
    assert_eq!(circuit.num_measurements(), 2);

    let ops: Vec<_> = circuit.operations().collect();
    assert_eq!(ops[0].name(), "H");
    assert_eq!(ops[0].targets(), &[TargetWord::qubit(0)]);
    assert_eq!(ops[1].name(), "CNOT");
    assert_eq!(ops[1].targets(), &[TargetWord::qubit(0), TargetWord::qubit(1)]);
    assert_eq!(ops[2].name(), "M");
    assert_eq!(ops[2].targets(), &[TargetWord::qubit(0), TargetWord::qubit(1)]);

    let reparsed = parse(&circuit.to_string()).unwrap();
    assert_eq!(reparsed, circuit);
}

#[test]
fn test_repeated_measurement_rounds() {
    let circuit = parse("REPEAT 3 {\n  M 0\n  DETECTOR 0@-1\n}\n").unwrap();
    assert_eq!(circuit.num_operations(), 6);
    assert_eq!(circuit.num_measurements(), 3);

    let (detectors, observables) = circuit.detectors_and_observables().unwrap();
    let sets: Vec<_> = detectors.iter().map(|d| d.indices.clone()).collect();
    assert_eq!(sets, vec![vec![0], vec![1], vec![2]]);
    assert!(observables.is_empty());
}

#[test]
fn test_fusion_is_gate_and_adjacency_sensitive() {
    let circuit = parse("X 0\nX 1\nY 2\n").unwrap();
    assert_eq!(circuit.num_operations(), 2);
    assert_eq!(circuit.num_qubits(), 3);
    let ops: Vec<_> = circuit.operations().collect();
    assert_eq!(ops[0].name(), "X");
    assert_eq!(ops[0].targets(), &[TargetWord::qubit(0), TargetWord::qubit(1)]);
    assert_eq!(ops[1].name(), "Y");
}

#[test]
fn test_observables_accumulate_across_operations() {
    let circuit = parse(
        "M 0\n\
         M 0\n\
         OBSERVABLE_INCLUDE(2) 0@-2 0@-1\n\
         OBSERVABLE_INCLUDE(2) 0@-2\n",
    )
    .unwrap();

    let (detectors, observables) = circuit.detectors_and_observables().unwrap();
    assert!(detectors.is_empty());
    assert_eq!(observables.len(), 3);
    assert!(observables[0].indices.is_empty());
    assert!(observables[1].indices.is_empty());
    assert_eq!(observables[2].indices, vec![0, 1, 0]);
}

#[test]
fn test_self_interaction_is_rejected() {
    assert!(matches!(
        parse("CNOT 0 0\n"),
        Err(ParseError::Ir(IrError::SelfInteraction { qubit: 0, .. }))
    ));
}

#[test]
fn test_zero_repetitions_is_rejected() {
    assert!(matches!(
        parse("REPEAT 0 {\n H 0\n}\n"),
        Err(ParseError::ZeroRepetitions)
    ));
}

#[test]
fn test_repeat_expansion_equals_appended_copies() {
    let body = parse("M 0\nDETECTOR 0@-1\nH 1\n").unwrap();
    for k in 1..=4 {
        let repeated = parse(&format!("REPEAT {k} {{\n M 0\n DETECTOR 0@-1\n H 1\n}}\n")).unwrap();
        let mut unrolled = Circuit::new();
        for _ in 0..k {
            unrolled += &body;
        }
        assert_eq!(repeated, unrolled, "expansion mismatch at k={k}");
        assert_eq!(repeated.num_measurements(), k);
    }
}

#[test]
fn test_self_composition_doubles_everything() {
    let mut circuit = parse("H 0\nM 0 1\n").unwrap();
    let snapshot = circuit.clone();
    circuit += &snapshot;
    assert_eq!(circuit.num_operations(), 4);
    assert_eq!(circuit.num_measurements(), 4);
}

#[test]
fn test_detector_resolution_scenario() {
    let circuit = parse(
        "M 0 1 2\n\
         DETECTOR 0@-1 2@-1\n\
         OBSERVABLE_INCLUDE(3) 1@-1\n",
    )
    .unwrap();
    let (detectors, observables) = circuit.detectors_and_observables().unwrap();
    assert_eq!(detectors.len(), 1);
    assert_eq!(detectors[0].indices, vec![0, 2]);
    assert_eq!(observables.len(), 4);
    assert_eq!(observables[3].indices, vec![1]);
}

#[test]
fn test_lookback_before_first_measurement_is_rejected() {
    let circuit = parse("DETECTOR 0@-1\n").unwrap();
    assert!(matches!(
        circuit.detectors_and_observables(),
        Err(IrError::LookbackBeforeFirstMeasurement)
    ));
}

#[test]
fn test_pair_arity_scenarios() {
    assert!(parse("CNOT 0 1 2 3\n").is_ok());
    assert!(matches!(
        parse("CNOT 0 1 2\n"),
        Err(ParseError::Ir(IrError::OddPairCount { .. }))
    ));
}

#[test]
fn test_parens_discipline() {
    // A zero argument is semantically "no argument" and legal anywhere.
    let circuit = parse("H(0) 0\n").unwrap();
    assert_eq!(circuit.operation(0).unwrap().arg(), 0.0);
    assert!(matches!(
        parse("H(0.5) 0\n"),
        Err(ParseError::Ir(IrError::UnexpectedParensArgument { gate: "H" }))
    ));
}

#[test]
fn test_roundtrip_of_mixed_target_forms() {
    let text = "M !0 1\n\
                CORRELATED_ERROR(0.25) X0 Z1 Y2\n\
                DETECTOR 0@-2 1@-1\n\
                CNOT 1@-1 0\n\
                DEPOLARIZE2(0.001) 0 1\n";
    let circuit = parse(text).unwrap();
    let rendered = circuit.to_string();
    let reparsed = parse(&rendered).unwrap();
    assert_eq!(reparsed, circuit);
    assert_eq!(reparsed.to_string(), rendered);
}

#[test]
fn test_roundtrip_of_repeat_expansion() {
    // Repeat bodies whose edges cannot fuse survive a render/parse
    // cycle even though the expansion is written out fully.
    let circuit = parse("REPEAT 3 {\n M 0\n DETECTOR 0@-1\n}\n").unwrap();
    let reparsed = parse(&circuit.to_string()).unwrap();
    assert_eq!(reparsed, circuit);
}

#[test]
fn test_streaming_and_bulk_parse_agree_without_adjacent_fusion() {
    let text = "H 0\nM 0\nDETECTOR 0@-1\n";
    let bulk = parse(text).unwrap();

    let mut reader = alsvid_text::InstructionReader::new(text.bytes());
    let mut streamed = Circuit::new();
    while reader.read_instruction(&mut streamed).unwrap() {}
    assert_eq!(streamed, bulk);
}

#[test]
fn test_crlf_is_not_inline_whitespace() {
    // A carriage return is not a target separator.
    assert!(parse("H 0\r\n").is_err());
}

#[test]
fn test_header_comment_reparses_as_comment() {
    let circuit = parse("M 0\n").unwrap();
    let rendered = circuit.to_string();
    assert!(rendered.starts_with("# Circuit [num_qubits=1, num_measurements=1]"));
    assert_eq!(parse(&rendered).unwrap(), circuit);
}
