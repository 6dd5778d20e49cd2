//! Tree operations: insert, move, remove, walk.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};
use super::{parser, printer};
use crate::error::ParseError;

const EMPTY_CHILDREN: &[NodeId] = &[];

/// A parsed style sheet, backed by a slotmap arena.
///
/// The root node always exists. Child order lives in per-container id lists
/// and parent links are kept in a secondary map, so moving or removing a node
/// never leaves a dangling owner.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: NodeId,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Stylesheet {
    /// Create a sheet holding only an empty root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::root());
        let mut children = SecondaryMap::new();
        children.insert(root, Vec::new());
        Self {
            nodes,
            children,
            parent: SecondaryMap::new(),
            root,
        }
    }

    /// Parse style-sheet source into a tree.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        parser::parse(source)
    }

    /// Print the tree back to source text.
    pub fn to_css(&self) -> String {
        printer::print(self)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Ordered children of a node; empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Position of a node within its parent's children.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Append a new node as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is missing or cannot hold children.
    pub fn append(&mut self, parent: NodeId, data: NodeData) -> Option<NodeId> {
        if !self.nodes.get(parent)?.is_container() {
            return None;
        }
        let id = self.alloc(data);
        self.attach(parent, None, id);
        Some(id)
    }

    /// Append without checking the parent kind; the parser only calls this
    /// for containers it has just opened.
    pub(crate) fn push_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.alloc(data);
        self.attach(parent, None, id);
        id
    }

    /// Insert a new node immediately before `reference` in its parent.
    ///
    /// Returns `None` if `reference` has no parent.
    pub fn insert_before(&mut self, reference: NodeId, data: NodeData) -> Option<NodeId> {
        let parent = self.parent(reference)?;
        let index = self.index_of(reference)?;
        let id = self.alloc(data);
        self.attach(parent, Some(index), id);
        Some(id)
    }

    /// Detach `node` (with its subtree) and re-insert it before `reference`.
    ///
    /// Returns false if either node is missing, `reference` has no parent, or
    /// `reference` lies inside `node`'s own subtree.
    pub fn move_before(&mut self, reference: NodeId, node: NodeId) -> bool {
        if reference == node || !self.contains(node) || self.is_ancestor(node, reference) {
            return false;
        }
        let Some(new_parent) = self.parent(reference) else {
            return false;
        };
        self.detach(node);
        let Some(index) = self.index_of(reference) else {
            return false;
        };
        self.attach(new_parent, Some(index), node);
        true
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the removed node's data, or `None` for the root and unknown ids.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if id == self.root || !self.contains(id) {
            return None;
        }
        self.detach(id);

        let mut stack = vec![id];
        let mut removed = None;
        while let Some(current) = stack.pop() {
            if let Some(kids) = self.children.remove(current) {
                stack.extend(kids);
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed = data;
            }
        }
        removed
    }

    /// Pre-order snapshot of every descendant of `from` (excluding `from`).
    ///
    /// The snapshot is taken up front, so callers may mutate the tree while
    /// iterating; ids removed in the meantime should be skipped via
    /// [`contains`](Self::contains).
    pub fn walk(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Snapshot of every rule node, in document order.
    pub fn walk_rules(&self) -> Vec<NodeId> {
        self.walk_matching(NodeData::is_rule)
    }

    /// Snapshot of every declaration node, in document order.
    pub fn walk_decls(&self) -> Vec<NodeId> {
        self.walk_matching(NodeData::is_declaration)
    }

    fn walk_matching(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.walk(self.root)
            .into_iter()
            .filter(|&id| self.nodes.get(id).is_some_and(&predicate))
            .collect()
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let is_container = data.is_container();
        let id = self.nodes.insert(data);
        if is_container {
            self.children.insert(id, Vec::new());
        }
        id
    }

    fn attach(&mut self, parent: NodeId, index: Option<usize>, id: NodeId) {
        self.parent.insert(id, parent);
        let siblings = self.children.entry(parent).map(|entry| entry.or_default());
        if let Some(siblings) = siblings {
            match index {
                Some(index) if index <= siblings.len() => siblings.insert(index, id),
                _ => siblings.push(id),
            }
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent.remove(id)
            && let Some(siblings) = self.children.get_mut(parent)
        {
            siblings.retain(|&child| child != id);
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        while let Some(parent) = self.parent(node) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }
}
