//! Scope Tree - hierarchical name tables.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `ScopeData` (name -> symbol table of one scope)
//! - Edges: `Contains` from a scope to each of its child scopes
//!
//! Every definition owns a scope holding its member names; its parent is the
//! scope the definition is declared in. Lookups walk the parent chain, which
//! is also how overload groups find their fallback group.

use genus_core::{FieldId, GroupId, PropertyId, ScopeId, TypeId};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};

/// What a name in a scope refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A builtin, class, interface or typeclass.
    Type(TypeId),
    /// Functions or methods sharing the name.
    Group(GroupId),
    Field(FieldId),
    Property(PropertyId),
}

impl Symbol {
    pub fn as_group(&self) -> Option<GroupId> {
        match self {
            Symbol::Group(group) => Some(*group),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<TypeId> {
        match self {
            Symbol::Type(ty) => Some(*ty),
            _ => None,
        }
    }
}

/// Edge types in the scope graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEdge {
    /// Parent scope contains child scope.
    Contains,
}

/// Data stored in each scope node.
#[derive(Debug, Default)]
pub struct ScopeData {
    symbols: FxHashMap<String, Symbol>,
}

impl ScopeData {
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over the symbols of this scope in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Symbol)> {
        self.symbols.iter().map(|(name, symbol)| (name.as_str(), *symbol))
    }
}

/// The scope graph.
pub struct ScopeTree {
    graph: DiGraph<ScopeData, ScopeEdge>,
    root: NodeIndex,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn node(scope: ScopeId) -> NodeIndex {
    NodeIndex::new(scope.slot())
}

#[inline]
fn scope_id(node: NodeIndex) -> ScopeId {
    ScopeId::new(node.index() as u32)
}

impl ScopeTree {
    /// Create a tree holding only the root (global) scope.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(ScopeData::default());
        Self { graph, root }
    }

    /// The root scope.
    pub fn root(&self) -> ScopeId {
        scope_id(self.root)
    }

    /// Check if `scope` exists.
    pub fn contains(&self, scope: ScopeId) -> bool {
        self.graph.node_weight(node(scope)).is_some()
    }

    /// Number of scopes, including the root.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn get_scope(&self, scope: ScopeId) -> Option<&ScopeData> {
        self.graph.node_weight(node(scope))
    }

    /// Create a child scope of `parent`.
    pub fn create_scope(&mut self, parent: ScopeId) -> ScopeId {
        let child = self.graph.add_node(ScopeData::default());
        self.graph.add_edge(node(parent), child, ScopeEdge::Contains);
        scope_id(child)
    }

    /// Find the parent of a scope. The root has none.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.graph
            .edges_directed(node(scope), Direction::Incoming)
            .find(|edge| *edge.weight() == ScopeEdge::Contains)
            .map(|edge| scope_id(edge.source()))
    }

    /// Move `scope` under `parent`.
    pub fn set_parent(&mut self, scope: ScopeId, parent: ScopeId) {
        let incoming: Vec<_> = self
            .graph
            .edges_directed(node(scope), Direction::Incoming)
            .map(|edge| edge.id())
            .collect();
        for edge in incoming {
            self.graph.remove_edge(edge);
        }
        self.graph
            .add_edge(node(parent), node(scope), ScopeEdge::Contains);
    }

    /// Look a name up in `scope` only.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<Symbol> {
        self.get_scope(scope)?.get(name)
    }

    /// Look a name up in `scope` and then each ancestor in turn.
    ///
    /// Returns the scope the name was found in.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, Symbol)> {
        let mut visited = FxHashSet::default();
        let mut current = Some(scope);
        while let Some(scope) = current {
            if !visited.insert(scope) {
                break;
            }
            if let Some(symbol) = self.lookup_local(scope, name) {
                return Some((scope, symbol));
            }
            current = self.parent(scope);
        }
        None
    }

    /// Check if `scope` is `ancestor` or lies anywhere below it.
    pub fn is_within(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        let mut visited = FxHashSet::default();
        let mut current = Some(scope);
        while let Some(scope) = current {
            if scope == ancestor {
                return true;
            }
            if !visited.insert(scope) {
                break;
            }
            current = self.parent(scope);
        }
        false
    }

    /// Bind `name` in `scope`, returning the symbol it replaced.
    ///
    /// Callers check for collisions first; the tree itself does not reject
    /// anything.
    pub fn insert(&mut self, scope: ScopeId, name: &str, symbol: Symbol) -> Option<Symbol> {
        self.graph
            .node_weight_mut(node(scope))?
            .symbols
            .insert(name.to_string(), symbol)
    }

    /// Remove `name` from `scope`.
    pub fn remove(&mut self, scope: ScopeId, name: &str) -> Option<Symbol> {
        self.graph.node_weight_mut(node(scope))?.symbols.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_parent() {
        let tree = ScopeTree::new();
        assert_eq!(tree.parent(tree.root()), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn lookup_walks_parents() {
        let mut tree = ScopeTree::new();
        let outer = tree.create_scope(tree.root());
        let inner = tree.create_scope(outer);

        tree.insert(tree.root(), "T", Symbol::Type(TypeId::new(0)));
        tree.insert(outer, "f", Symbol::Group(GroupId::new(1)));

        assert_eq!(
            tree.lookup(inner, "f"),
            Some((outer, Symbol::Group(GroupId::new(1))))
        );
        assert_eq!(
            tree.lookup(inner, "T"),
            Some((tree.root(), Symbol::Type(TypeId::new(0))))
        );
        assert_eq!(tree.lookup_local(inner, "f"), None);
        assert_eq!(tree.lookup(inner, "missing"), None);
    }

    #[test]
    fn inner_name_shadows_outer() {
        let mut tree = ScopeTree::new();
        let inner = tree.create_scope(tree.root());

        tree.insert(tree.root(), "x", Symbol::Field(FieldId::new(0)));
        tree.insert(inner, "x", Symbol::Field(FieldId::new(1)));

        assert_eq!(
            tree.lookup(inner, "x"),
            Some((inner, Symbol::Field(FieldId::new(1))))
        );
    }

    #[test]
    fn set_parent_moves_scope() {
        let mut tree = ScopeTree::new();
        let a = tree.create_scope(tree.root());
        let b = tree.create_scope(tree.root());
        let child = tree.create_scope(a);

        tree.insert(b, "g", Symbol::Group(GroupId::new(0)));
        assert_eq!(tree.lookup(child, "g"), None);

        tree.set_parent(child, b);
        assert_eq!(tree.parent(child), Some(b));
        assert!(tree.lookup(child, "g").is_some());
    }

    #[test]
    fn lookup_stops_on_parent_loop() {
        let mut tree = ScopeTree::new();
        let a = tree.create_scope(tree.root());
        let b = tree.create_scope(a);
        tree.set_parent(a, b);

        assert_eq!(tree.lookup(b, "missing"), None);
        assert!(tree.is_within(b, a));
        assert!(!tree.is_within(b, tree.root()));
    }

    #[test]
    fn is_within_follows_ancestors() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let a = tree.create_scope(root);
        let child = tree.create_scope(a);
        let other = tree.create_scope(root);

        assert!(tree.is_within(child, child));
        assert!(tree.is_within(child, a));
        assert!(tree.is_within(child, root));
        assert!(!tree.is_within(a, child));
        assert!(!tree.is_within(child, other));
    }

    #[test]
    fn remove_symbol() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.insert(root, "x", Symbol::Property(PropertyId::new(0)));
        assert_eq!(
            tree.remove(root, "x"),
            Some(Symbol::Property(PropertyId::new(0)))
        );
        assert_eq!(tree.lookup_local(root, "x"), None);
    }
}
