use serde::{Deserialize, Serialize};

string_id!(
    /// Identifier of a node (switch, gate, light, group or junction)
    NodeId
);

string_id!(
    /// Identifier of a port; unique across the whole circuit
    PortId
);

string_id!(
    /// Identifier of a wire
    WireId
);

/// Layout coordinates. Irrelevant to simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by an offset
    pub fn offset(&self, by: Position) -> Position {
        Position::new(self.x + by.x, self.y + by.y)
    }
}

/// Direction of a port. Wires always run from an output to an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Input,
    Output,
}

impl PortKind {
    /// Check if a wire may run from a port of this kind to a port of `other`
    pub fn can_connect_to(&self, other: &PortKind) -> bool {
        matches!((self, other), (PortKind::Output, PortKind::Input))
    }
}

impl std::fmt::Display for PortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortKind::Input => write!(f, "input"),
            PortKind::Output => write!(f, "output"),
        }
    }
}

/// A directionally-typed connection point owned by exactly one node
///
/// Ports are derived from node data rather than stored on their own; see
/// [`Node::ports`](crate::core::circuit::Node::ports).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: PortId,
    pub node_id: NodeId,
    pub kind: PortKind,
    pub index: usize,
}

/// Boolean function computed by a gate node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateType {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl GateType {
    /// Input count a freshly placed gate of this type receives
    pub fn default_input_count(&self) -> usize {
        match self {
            GateType::Not => 1,
            _ => 2,
        }
    }

    /// Compute the gate's truth function over its resolved inputs.
    ///
    /// NOT negates its first input; a NOT with no inputs sees `false` and yields `true`.
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        let high = inputs.iter().filter(|v| **v).count();
        match self {
            GateType::And => inputs.iter().all(|v| *v),
            GateType::Or => high > 0,
            GateType::Not => !inputs.first().copied().unwrap_or(false),
            GateType::Nand => !inputs.iter().all(|v| *v),
            GateType::Nor => high == 0,
            GateType::Xor => high % 2 == 1,
            GateType::Xnor => high % 2 == 0,
        }
    }
}

impl std::fmt::Display for GateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GateType::And => "AND",
            GateType::Or => "OR",
            GateType::Not => "NOT",
            GateType::Nand => "NAND",
            GateType::Nor => "NOR",
            GateType::Xor => "XOR",
            GateType::Xnor => "XNOR",
        };
        write!(f, "{}", name)
    }
}
