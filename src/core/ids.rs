use super::circuit::Circuit;
use super::types::{NodeId, PortId, WireId};
use uuid::Uuid;

/// Source of fresh identifiers for commands that create nodes, ports or wires.
///
/// Passed explicitly into every command so no hidden global counter exists and tests can
/// predict the ids a command hands out.
pub trait IdGenerator {
    /// Produce a new id with the given prefix (`"node"`, `"port"`, `"wire"`, ...)
    fn next_id(&mut self, prefix: &str) -> String;

    fn node_id(&mut self) -> NodeId {
        NodeId::new(self.next_id("node"))
    }

    fn port_id(&mut self) -> PortId {
        PortId::new(self.next_id("port"))
    }

    fn wire_id(&mut self) -> WireId {
        WireId::new(self.next_id("wire"))
    }
}

/// Deterministic generator: `node-1`, `port-2`, `wire-3`, ...
///
/// The counter is shared across prefixes so every id is unique on its own.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    namespace: Option<String>,
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every id with a namespace, e.g. `doc1:node-1`
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            counter: 0,
        }
    }

    /// Continue counting after `start`; useful when extending a loaded circuit
    pub fn starting_at(start: u64) -> Self {
        Self {
            namespace: None,
            counter: start,
        }
    }

    /// Continue past the highest numeric suffix used by any node, port or wire in `circuit`.
    ///
    /// Use this when editing a loaded circuit so the first ids handed out are already free.
    pub fn after(circuit: &Circuit) -> Self {
        let node_ids = circuit.nodes().iter().map(|n| n.id.as_str());
        let port_ids = circuit
            .nodes()
            .iter()
            .flat_map(|n| n.ports())
            .map(|p| id_suffix(p.id.as_str()));
        let wire_ids = circuit.wires().iter().map(|w| w.id.as_str());
        let highest = node_ids
            .chain(wire_ids)
            .map(id_suffix)
            .chain(port_ids)
            .flatten()
            .max()
            .unwrap_or(0);
        Self::starting_at(highest)
    }

    /// Number of ids handed out so far (plus the starting offset)
    pub fn issued(&self) -> u64 {
        self.counter
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        match &self.namespace {
            Some(ns) => format!("{}:{}-{}", ns, prefix, self.counter),
            None => format!("{}-{}", prefix, self.counter),
        }
    }
}

/// Numeric tail of an id such as `node-12` or `doc:port-7`
fn id_suffix(id: &str) -> Option<u64> {
    id.rsplit('-').next().and_then(|tail| tail.parse().ok())
}

/// Wraps a generator for one command so ids already present in `circuit` are skipped.
///
/// Ids issued within the same command never collide because the inner generator never
/// repeats itself.
pub(crate) struct FreshIds<'a, G: IdGenerator + ?Sized> {
    circuit: &'a Circuit,
    inner: &'a mut G,
}

impl<'a, G: IdGenerator + ?Sized> FreshIds<'a, G> {
    pub(crate) fn new(circuit: &'a Circuit, inner: &'a mut G) -> Self {
        Self { circuit, inner }
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for FreshIds<'_, G> {
    fn next_id(&mut self, prefix: &str) -> String {
        self.inner.next_id(prefix)
    }

    fn node_id(&mut self) -> NodeId {
        loop {
            let id = self.inner.node_id();
            if !self.circuit.has_node(&id) {
                return id;
            }
        }
    }

    fn port_id(&mut self) -> PortId {
        loop {
            let id = self.inner.port_id();
            if self.circuit.port_entry(&id).is_none() {
                return id;
            }
        }
    }

    fn wire_id(&mut self) -> WireId {
        loop {
            let id = self.inner.wire_id();
            if self.circuit.wire(&id).is_none() {
                return id;
            }
        }
    }
}

/// Random v4 UUID generator for hosts where several editors create ids independently
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4())
    }
}
