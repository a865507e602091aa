use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Item, SelectionState};
use crate::domain::error::{DomainError, TreeResult};

/// Handle of a node inside an [`ItemTree`].
pub type NodeId = Index;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Item carried by this node, None only for the virtual root
    pub data: Option<Item>,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<NodeId>,
    /// Whether the node is currently chosen
    pub selected: bool,
    /// Whether the node may be toggled by the user; false means locked
    pub selectable: bool,
}

impl TreeNode {
    fn new(data: Option<Item>, parent: Option<NodeId>) -> Self {
        Self {
            data,
            parent,
            children: Vec::new(),
            selected: false,
            selectable: true,
        }
    }

    pub fn state(&self) -> SelectionState {
        SelectionState::from_flags(self.selected, self.selectable)
    }

    pub fn is_locked(&self) -> bool {
        !self.selectable
    }

    pub fn name(&self) -> Option<&str> {
        self.data.as_ref().map(|item| item.name.as_str())
    }
}

/// Arena-based item tree with a virtual root.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Alongside the nodes it keeps an occurrence index from item to every node
/// carrying an equal item, so tree-wide "same entity" updates are lookups.
#[derive(Debug)]
pub struct ItemTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the virtual root node
    root: NodeId,
    /// Item -> nodes carrying it, in insertion order
    occurrences: HashMap<Item, Vec<NodeId>>,
}

impl Default for ItemTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode::new(None, None));
        Self {
            arena,
            root,
            occurrences: HashMap::new(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, item: Item, parent: NodeId) -> TreeResult<NodeId> {
        validate_name(&item.name)?;
        if !self.arena.contains(parent) {
            return Err(DomainError::ParentNotFound(parent));
        }

        let node_idx = self
            .arena
            .insert(TreeNode::new(Some(item.clone()), Some(parent)));
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        self.occurrences.entry(item).or_default().push(node_idx);

        Ok(node_idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub(crate) fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_root(&self, idx: NodeId) -> bool {
        idx == self.root
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    /// Number of nodes, the virtual root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// A tree holding only its virtual root.
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 1
    }

    /// All nodes carrying an item equal to `item`, in insertion order.
    pub fn occurrences(&self, item: &Item) -> &[NodeId] {
        self.occurrences
            .get(item)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_selected(&self, idx: NodeId) -> bool {
        self.get_node(idx).is_some_and(|n| n.selected)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Levels below the virtual root; 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root).saturating_sub(1)
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Items of `idx` and of every node below it, pre-order.
    ///
    /// The root contributes no item; an unknown index yields nothing.
    #[instrument(level = "trace", skip(self))]
    pub fn nested_items(&self, idx: NodeId) -> Vec<Item> {
        let mut items = Vec::new();
        self.collect_items(idx, &mut items);
        items
    }

    fn collect_items(&self, node_idx: NodeId, items: &mut Vec<Item>) {
        if let Some(node) = self.get_node(node_idx) {
            if let Some(item) = &node.data {
                items.push(item.clone());
            }
            for &child in &node.children {
                self.collect_items(child, items);
            }
        }
    }

    /// Resolve a node by its names from the top level down.
    ///
    /// The first child with a matching name wins at every level.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_path<S: AsRef<str> + std::fmt::Debug>(&self, path: &[S]) -> Option<NodeId> {
        if path.is_empty() {
            return None;
        }
        path.iter().try_fold(self.root, |current, segment| {
            self.get_node(current)?
                .children
                .iter()
                .copied()
                .find(|&child| {
                    self.get_node(child)
                        .and_then(TreeNode::name)
                        .is_some_and(|name| name == segment.as_ref())
                })
        })
    }

    /// Names from the top-level node down to `idx`; empty for the root.
    pub fn path_of(&self, idx: NodeId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(idx);
        while let Some(node) = current.and_then(|i| self.get_node(i)) {
            if let Some(name) = node.name() {
                names.push(name);
            }
            current = node.parent;
        }
        names.reverse();
        names
    }
}

/// Names are stored verbatim, so they must survive a round trip through a
/// `/` separated, segment-trimmed node path.
fn validate_name(name: &str) -> TreeResult<()> {
    let invalid = |reason: &'static str| -> TreeResult<()> {
        Err(DomainError::InvalidItemName {
            name: name.to_string(),
            reason,
        })
    };

    if name.trim().is_empty() {
        Err(DomainError::EmptyItemName)
    } else if name.trim() != name {
        invalid("leading or trailing whitespace")
    } else if name.contains('/') {
        invalid("contains the path separator '/'")
    } else {
        Ok(())
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ItemTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ItemTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a ItemTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ItemTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root(), false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> (ItemTree, NodeId, NodeId, NodeId) {
        let mut tree = ItemTree::new();
        let team = tree.insert_node(Item::new("TeamX"), tree.root()).unwrap();
        let bob = tree.insert_node(Item::new("Bob"), team).unwrap();
        let carl = tree.insert_node(Item::new("Carl"), team).unwrap();
        (tree, team, bob, carl)
    }

    #[test]
    fn given_new_tree_when_created_then_only_virtual_root_exists() {
        let tree = ItemTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.depth(), 0);
        let root = tree.get_node(tree.root()).unwrap();
        assert!(root.data.is_none());
        assert!(root.parent.is_none());
        assert!(!root.selected);
        assert!(root.selectable);
    }

    #[test]
    fn given_inserted_nodes_when_iterating_then_preorder_and_postorder_match_layout() {
        let (tree, team, bob, carl) = small_tree();

        let pre: Vec<_> = tree.iter().map(|(idx, _)| idx).collect();
        assert_eq!(pre, vec![tree.root(), team, bob, carl]);

        let post: Vec<_> = tree.iter_postorder().map(|(idx, _)| idx).collect();
        assert_eq!(post, vec![bob, carl, team, tree.root()]);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn given_unknown_parent_when_inserting_then_errors() {
        let (mut tree, team, _, _) = small_tree();
        let missing = NodeId::from_raw_parts(99, 0);

        assert_eq!(
            tree.insert_node(Item::new("c"), missing),
            Err(DomainError::ParentNotFound(missing))
        );
        assert_eq!(tree.len(), 4);
        assert_eq!(
            tree.insert_node(Item::new("  "), team),
            Err(DomainError::EmptyItemName)
        );
    }

    #[test]
    fn given_shared_item_when_inserted_twice_then_occurrences_lists_both() {
        let (mut tree, team, bob, _) = small_tree();
        let other_team = tree.insert_node(Item::new("TeamY"), tree.root()).unwrap();
        let bob2 = tree.insert_node(Item::new("Bob"), other_team).unwrap();

        assert_eq!(tree.occurrences(&Item::new("Bob")), &[bob, bob2]);
        assert!(tree.occurrences(&Item::new("Nobody")).is_empty());
        assert_eq!(tree.get_node(bob2).unwrap().parent, Some(other_team));
        assert_ne!(tree.get_node(bob2).unwrap().parent, Some(team));
    }

    #[test]
    fn given_subtree_when_collecting_nested_items_then_self_first_root_skipped() {
        let (tree, team, _, _) = small_tree();

        assert_eq!(
            tree.nested_items(team),
            vec![Item::new("TeamX"), Item::new("Bob"), Item::new("Carl")]
        );
        assert_eq!(tree.nested_items(tree.root()).len(), 3);
    }

    #[test]
    fn given_name_path_when_resolving_then_finds_node_and_round_trips_path() {
        let (tree, _, _, carl) = small_tree();

        assert_eq!(tree.find_by_path(&["TeamX", "Carl"]), Some(carl));
        assert_eq!(tree.path_of(carl), vec!["TeamX", "Carl"]);
        assert_eq!(tree.find_by_path(&["TeamX", "Dave"]), None);
        assert_eq!(tree.find_by_path::<&str>(&[]), None);
        assert!(tree.path_of(tree.root()).is_empty());
    }
}
