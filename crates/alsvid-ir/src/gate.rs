//! Gate descriptors and the process-wide gate catalog.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Longest gate name (in characters) the catalog will consider.
pub const MAX_GATE_NAME_LEN: usize = 31;

/// Stable identifier of a gate in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateId(pub u16);

/// Behavior flags of a gate, packed into a bitmask.
///
/// The flags drive target parsing and validation: which textual target
/// forms the gate accepts, whether it contributes measurements, whether
/// adjacent same-gate operations may merge, and whether the gate opens
/// a `{ ... }` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateFlags(pub u16);

impl GateFlags {
    /// No flags.
    pub const NONE: GateFlags = GateFlags(0);
    /// The gate requires a `(real)` argument before its targets.
    pub const TAKES_PARENS_ARGUMENT: GateFlags = GateFlags(1 << 0);
    /// Each target produces one measurement result.
    pub const PRODUCES_RESULTS: GateFlags = GateFlags(1 << 1);
    /// Targets are X/Y/Z-tagged qubits.
    pub const TARGETS_PAULI_STRING: GateFlags = GateFlags(1 << 2);
    /// Every target must carry a `@-dt` record lookback.
    pub const ONLY_TARGETS_MEASUREMENT_RECORD: GateFlags = GateFlags(1 << 3);
    /// Targets may optionally carry a `@-dt` record lookback.
    pub const CAN_TARGET_MEASUREMENT_RECORD: GateFlags = GateFlags(1 << 4);
    /// Target count must be even; paired targets must differ.
    pub const TARGETS_PAIRS: GateFlags = GateFlags(1 << 5);
    /// The operation is followed by a `{ ... }` body.
    pub const IS_BLOCK: GateFlags = GateFlags(1 << 6);
    /// Adjacent same-gate operations must not merge.
    pub const IS_NOT_FUSABLE: GateFlags = GateFlags(1 << 7);

    /// Whether every flag in `other` is set in `self`.
    pub const fn contains(self, other: GateFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bitwise union, usable in const context.
    pub const fn union(self, other: GateFlags) -> GateFlags {
        GateFlags(self.0 | other.0)
    }
}

impl std::ops::BitOr for GateFlags {
    type Output = GateFlags;

    fn bitor(self, rhs: GateFlags) -> GateFlags {
        self.union(rhs)
    }
}

/// A gate descriptor: stable id, canonical name, and behavior flags.
#[derive(Debug)]
pub struct Gate {
    /// Stable integer id, equal to the gate's catalog position.
    pub id: GateId,
    /// Canonical (upper-case) name used for rendering.
    pub name: &'static str,
    /// Behavior flags.
    pub flags: GateFlags,
}

impl Gate {
    pub fn takes_parens_argument(&self) -> bool {
        self.flags.contains(GateFlags::TAKES_PARENS_ARGUMENT)
    }

    pub fn produces_results(&self) -> bool {
        self.flags.contains(GateFlags::PRODUCES_RESULTS)
    }

    pub fn targets_pauli_string(&self) -> bool {
        self.flags.contains(GateFlags::TARGETS_PAULI_STRING)
    }

    pub fn only_targets_records(&self) -> bool {
        self.flags.contains(GateFlags::ONLY_TARGETS_MEASUREMENT_RECORD)
    }

    pub fn can_target_records(&self) -> bool {
        self.flags.contains(GateFlags::CAN_TARGET_MEASUREMENT_RECORD)
    }

    pub fn targets_pairs(&self) -> bool {
        self.flags.contains(GateFlags::TARGETS_PAIRS)
    }

    pub fn is_block(&self) -> bool {
        self.flags.contains(GateFlags::IS_BLOCK)
    }

    pub fn is_fusable(&self) -> bool {
        !self.flags.contains(GateFlags::IS_NOT_FUSABLE)
    }
}

const PAIRS_CC: GateFlags =
    GateFlags::TARGETS_PAIRS.union(GateFlags::CAN_TARGET_MEASUREMENT_RECORD);
const NOISY_PAULI_STRING: GateFlags = GateFlags::TAKES_PARENS_ARGUMENT
    .union(GateFlags::TARGETS_PAULI_STRING)
    .union(GateFlags::IS_NOT_FUSABLE);
const ANNOTATION: GateFlags =
    GateFlags::ONLY_TARGETS_MEASUREMENT_RECORD.union(GateFlags::IS_NOT_FUSABLE);

const fn gate(id: u16, name: &'static str, flags: GateFlags) -> Gate {
    Gate {
        id: GateId(id),
        name,
        flags,
    }
}

/// The gate catalog, ordered by id.
static GATES: &[Gate] = &[
    gate(0, "I", GateFlags::NONE),
    gate(1, "X", GateFlags::NONE),
    gate(2, "Y", GateFlags::NONE),
    gate(3, "Z", GateFlags::NONE),
    gate(4, "H", GateFlags::NONE),
    gate(5, "S", GateFlags::NONE),
    gate(6, "S_DAG", GateFlags::NONE),
    gate(7, "SQRT_X", GateFlags::NONE),
    gate(8, "SQRT_X_DAG", GateFlags::NONE),
    gate(9, "CNOT", PAIRS_CC),
    gate(10, "CY", PAIRS_CC),
    gate(11, "CZ", PAIRS_CC),
    gate(12, "SWAP", GateFlags::TARGETS_PAIRS),
    gate(13, "R", GateFlags::NONE),
    gate(14, "M", GateFlags::PRODUCES_RESULTS),
    gate(15, "MR", GateFlags::PRODUCES_RESULTS),
    gate(16, "X_ERROR", GateFlags::TAKES_PARENS_ARGUMENT),
    gate(17, "Y_ERROR", GateFlags::TAKES_PARENS_ARGUMENT),
    gate(18, "Z_ERROR", GateFlags::TAKES_PARENS_ARGUMENT),
    gate(19, "DEPOLARIZE1", GateFlags::TAKES_PARENS_ARGUMENT),
    gate(
        20,
        "DEPOLARIZE2",
        GateFlags::TAKES_PARENS_ARGUMENT.union(GateFlags::TARGETS_PAIRS),
    ),
    gate(21, "CORRELATED_ERROR", NOISY_PAULI_STRING),
    gate(22, "ELSE_CORRELATED_ERROR", NOISY_PAULI_STRING),
    gate(23, "DETECTOR", ANNOTATION),
    gate(
        24,
        "OBSERVABLE_INCLUDE",
        ANNOTATION.union(GateFlags::TAKES_PARENS_ARGUMENT),
    ),
    gate(
        25,
        "REPEAT",
        GateFlags::IS_BLOCK.union(GateFlags::IS_NOT_FUSABLE),
    ),
];

/// Alternative spellings accepted by lookup, mapped to canonical names.
static ALIASES: &[(&str, &str)] = &[
    ("CX", "CNOT"),
    ("ZCX", "CNOT"),
    ("ZCY", "CY"),
    ("ZCZ", "CZ"),
    ("E", "CORRELATED_ERROR"),
];

/// The immutable name-to-descriptor catalog.
pub struct GateSet {
    by_name: FxHashMap<&'static str, &'static Gate>,
    repeat: GateId,
    detector: GateId,
    observable_include: GateId,
}

impl GateSet {
    /// Look up a gate by name, case-insensitively.
    ///
    /// Names longer than [`MAX_GATE_NAME_LEN`] characters never match.
    pub fn get(&self, name: &str) -> Option<&'static Gate> {
        if name.is_empty() || name.len() > MAX_GATE_NAME_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_GATE_NAME_LEN];
        for (slot, byte) in buf.iter_mut().zip(name.bytes()) {
            *slot = byte.to_ascii_uppercase();
        }
        let key = std::str::from_utf8(&buf[..name.len()]).ok()?;
        self.by_name.get(key).copied()
    }

    /// Look up a gate id by name, case-insensitively.
    pub fn id_of(&self, name: &str) -> Option<GateId> {
        self.get(name).map(|g| g.id)
    }

    /// Id of the `REPEAT` block pseudo-gate.
    pub fn repeat_id(&self) -> GateId {
        self.repeat
    }

    /// Id of the `DETECTOR` annotation gate.
    pub fn detector_id(&self) -> GateId {
        self.detector
    }

    /// Id of the `OBSERVABLE_INCLUDE` annotation gate.
    pub fn observable_include_id(&self) -> GateId {
        self.observable_include
    }
}

static GATE_SET: LazyLock<GateSet> = LazyLock::new(|| {
    let mut by_name = FxHashMap::default();
    for g in GATES {
        by_name.insert(g.name, g);
    }
    for (alias, canonical) in ALIASES {
        let g = by_name[canonical];
        by_name.insert(*alias, g);
    }
    let id = |name: &str| by_name[name].id;
    GateSet {
        repeat: id("REPEAT"),
        detector: id("DETECTOR"),
        observable_include: id("OBSERVABLE_INCLUDE"),
        by_name,
    }
});

/// The process-wide gate catalog.
pub fn gate_set() -> &'static GateSet {
    &GATE_SET
}
