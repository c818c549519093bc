//! Per-run node table: arena owner of every built node plus the identity
//! indexes the later stages resolve cross-tree references through.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ContractDefinition, FunctionDefinition, Node, NodeId};

/// First id handed to a node the compiler did not number.
const FIRST_SYNTHETIC_ID: i64 = -100;

/// Arena and indexes for one analysis run.
///
/// Populated as a side effect of building (every constructor registers the
/// node it just built), read throughout traversal, instrumentation and
/// rendering, and discarded at end of run. Exclusive lock to insert or
/// mutate, shared lock to read; build finishes before traversal starts, so
/// in practice population and lookup never actually race.
pub struct Registry {
    tables: RwLock<Tables>,
    next_synthetic: AtomicI64,
}

#[derive(Default)]
struct Tables {
    nodes: HashMap<NodeId, Node>,
    contracts: BTreeSet<NodeId>,
    contracts_by_name: HashMap<String, NodeId>,
    functions: BTreeSet<NodeId>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_synthetic: AtomicI64::new(FIRST_SYNTHETIC_ID),
        }
    }

    /// Allocate a fresh negative id for a node without a compiler identity.
    pub fn fresh_id(&self) -> NodeId {
        NodeId(self.next_synthetic.fetch_sub(1, Ordering::Relaxed))
    }

    /// Register a built node under its id, updating the contract and
    /// function indexes when the kind warrants it.
    pub fn insert(&self, node: Node) -> NodeId {
        let mut tables = self.tables.write().expect("registry lock poisoned");
        tables.register(node)
    }

    /// Shared view for the traversal and rendering stages.
    pub fn read(&self) -> Reader<'_> {
        Reader(self.tables.read().expect("registry lock poisoned"))
    }

    /// Exclusive view for instrumentation splices.
    pub fn write(&self) -> Writer<'_> {
        Writer(self.tables.write().expect("registry lock poisoned"))
    }

    /// Deep-copy the subtree at `id` under fresh synthetic ids.
    ///
    /// A child id may appear in only one parent slot, so grafting an
    /// existing expression into a synthesized statement goes through a
    /// copy. Must not be called with a lock guard held.
    pub fn clone_subtree(&self, id: NodeId) -> Option<NodeId> {
        let mut node = {
            let tables = self.tables.read().expect("registry lock poisoned");
            tables.nodes.get(&id)?.clone()
        };
        node.map_children(&mut |child| self.clone_subtree(child).unwrap_or(child));
        *node.id_mut() = self.fresh_id();
        Some(self.insert(node))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Tables {
    fn register(&mut self, node: Node) -> NodeId {
        let id = node.id();
        match &node {
            Node::ContractDefinition(cd) => {
                self.contracts.insert(id);
                self.contracts_by_name.insert(cd.name.clone(), id);
            }
            Node::FunctionDefinition(_) => {
                self.functions.insert(id);
            }
            _ => {}
        }
        self.nodes.insert(id, node);
        id
    }
}

pub struct Reader<'a>(RwLockReadGuard<'a, Tables>);

pub struct Writer<'a>(RwLockWriteGuard<'a, Tables>);

impl Reader<'_> {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.0.nodes.get(&id)
    }

    pub fn contract(&self, id: NodeId) -> Option<&ContractDefinition> {
        self.0.nodes.get(&id).and_then(Node::as_contract)
    }

    pub fn contract_by_name(&self, name: &str) -> Option<&ContractDefinition> {
        let id = self.0.contracts_by_name.get(name)?;
        self.0.nodes.get(id).and_then(Node::as_contract)
    }

    pub fn function(&self, id: NodeId) -> Option<&FunctionDefinition> {
        self.0.nodes.get(&id).and_then(Node::as_function)
    }

    /// All registered function ids, in ascending id order.
    pub fn function_ids(&self) -> Vec<NodeId> {
        self.0.functions.iter().copied().collect()
    }

    /// All registered contract ids, in ascending id order.
    pub fn contract_ids(&self) -> Vec<NodeId> {
        self.0.contracts.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.0.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.nodes.is_empty()
    }
}

impl Writer<'_> {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.0.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.0.nodes.get_mut(&id)
    }

    pub fn contract(&self, id: NodeId) -> Option<&ContractDefinition> {
        self.0.nodes.get(&id).and_then(Node::as_contract)
    }

    pub fn contract_by_name(&self, name: &str) -> Option<&ContractDefinition> {
        let id = self.0.contracts_by_name.get(name)?;
        self.0.nodes.get(id).and_then(Node::as_contract)
    }

    pub fn function(&self, id: NodeId) -> Option<&FunctionDefinition> {
        self.0.nodes.get(&id).and_then(Node::as_function)
    }

    pub fn function_ids(&self) -> Vec<NodeId> {
        self.0.functions.iter().copied().collect()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.0.register(node)
    }
}
