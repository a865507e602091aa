//! Selection synchronization engine
//!
//! Keeps `selected` / `selectable` consistent across the whole tree after a
//! single toggle. Every toggle runs four passes in order:
//!
//! 1. collect the items of the toggled node and its subtree,
//! 2. propagate the toggle to every node carrying one of those items (top-down),
//! 3. auto-select fully covered nodes and lock their nested items (bottom-up),
//! 4. rebuild the flat list of selected nodes.
//!
//! The virtual root never takes part: it is never selected, unselected, locked
//! or reported. Auto-selection is sticky, a later unselect of a child does not
//! retract it.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::arena::{ItemTree, NodeId};
use crate::domain::entities::Item;
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::projector::collect_selected;

/// Owns an [`ItemTree`] and applies toggle events to it.
///
/// Toggles take `&mut self`, so events are serialized by construction.
#[derive(Debug)]
pub struct SelectionSync {
    tree: ItemTree,
    /// Pre-order position of every node; the tree shape is frozen from here on
    rank: HashMap<NodeId, usize>,
    currently_selected: Vec<NodeId>,
}

impl SelectionSync {
    pub fn new(tree: ItemTree) -> Self {
        let rank = tree
            .iter()
            .enumerate()
            .map(|(pos, (idx, _))| (idx, pos))
            .collect();
        let currently_selected = collect_selected(&tree);
        Self {
            tree,
            rank,
            currently_selected,
        }
    }

    pub fn tree(&self) -> &ItemTree {
        &self.tree
    }

    /// Selected nodes as of the last toggle, in display order.
    pub fn currently_selected(&self) -> &[NodeId] {
        &self.currently_selected
    }

    pub fn on_node_select(&mut self, node: NodeId) -> TreeResult<()> {
        self.on_toggle(node, true)
    }

    pub fn on_node_unselect(&mut self, node: NodeId) -> TreeResult<()> {
        self.on_toggle(node, false)
    }

    /// Apply a user toggle on `node` and resynchronize the whole tree.
    ///
    /// # Errors
    /// * [`DomainError::RootNotTogglable`] for the virtual root
    /// * [`DomainError::NodeNotFound`] for a node of another tree
    ///
    /// The tree is left untouched on error.
    #[instrument(level = "debug", skip(self))]
    pub fn on_toggle(&mut self, node: NodeId, selected: bool) -> TreeResult<()> {
        if self.tree.is_root(node) {
            return Err(DomainError::RootNotTogglable);
        }
        if !self.tree.contains(node) {
            return Err(DomainError::NodeNotFound(node));
        }

        let items_to_sync: HashSet<Item> = self.tree.nested_items(node).into_iter().collect();
        debug!("on_toggle: {} items to sync", items_to_sync.len());

        self.update_node_selection(&items_to_sync, selected);
        self.select_parents_and_lock_children();
        self.update_currently_selected();
        Ok(())
    }

    /// Nodes carrying any of `items`, parents before children.
    fn nodes_carrying(&self, items: &HashSet<Item>) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = items
            .iter()
            .flat_map(|item| self.tree.occurrences(item).iter().copied())
            .collect();
        nodes.sort_by_key(|idx| self.rank.get(idx).copied().unwrap_or(usize::MAX));
        nodes.dedup();
        nodes
    }

    /// Pass 2: select, or unselect-to-parent-state and unlock, every occurrence.
    ///
    /// Must run top-down: an unselected node takes the value its parent holds
    /// at that moment, which this same pass may just have changed.
    #[instrument(level = "trace", skip(self, items_to_sync))]
    fn update_node_selection(&mut self, items_to_sync: &HashSet<Item>, selected: bool) {
        let nodes = self.nodes_carrying(items_to_sync);
        debug!("update_node_selection: {} occurrences", nodes.len());

        for idx in nodes {
            if self.tree.is_root(idx) {
                continue;
            }
            let parent_selected = self.is_parent_selected(idx);
            if let Some(node) = self.tree.get_node_mut(idx) {
                if selected {
                    node.selected = true;
                } else {
                    node.selected = parent_selected;
                    node.selectable = true;
                }
            }
        }
    }

    fn is_parent_selected(&self, idx: NodeId) -> bool {
        self.tree
            .get_node(idx)
            .and_then(|node| node.parent)
            .is_some_and(|parent| self.tree.is_selected(parent))
    }

    /// Pass 3: bottom-up sweep selecting fully covered nodes.
    ///
    /// Locks land immediately, so nodes visited later in the sweep see them;
    /// a covered team can complete its division within the same sweep.
    #[instrument(level = "trace", skip(self))]
    fn select_parents_and_lock_children(&mut self) {
        let postorder: Vec<NodeId> = self
            .tree
            .iter_postorder()
            .map(|(idx, _)| idx)
            .filter(|&idx| !self.tree.is_root(idx))
            .collect();

        for idx in postorder {
            if self.are_all_children_selected(idx) {
                if let Some(node) = self.tree.get_node_mut(idx) {
                    node.selected = true;
                }
                self.lock_nested(idx);
            }
        }
    }

    /// Leaves never qualify.
    fn are_all_children_selected(&self, idx: NodeId) -> bool {
        self.tree.get_node(idx).is_some_and(|node| {
            !node.children.is_empty()
                && node
                    .children
                    .iter()
                    .all(|&child| self.tree.is_selected(child))
        })
    }

    /// Select and lock, tree-wide, every occurrence of an item nested below
    /// `parent`. The parent's own entry is not part of the set.
    fn lock_nested(&mut self, parent: NodeId) {
        let children = self
            .tree
            .get_node(parent)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        let items: HashSet<Item> = children
            .iter()
            .flat_map(|&child| self.tree.nested_items(child))
            .collect();

        let nodes = self.nodes_carrying(&items);
        debug!("lock_nested: locking {} nodes", nodes.len());
        for idx in nodes {
            if self.tree.is_root(idx) {
                continue;
            }
            if let Some(node) = self.tree.get_node_mut(idx) {
                node.selected = true;
                node.selectable = false;
            }
        }
    }

    /// Pass 4
    fn update_currently_selected(&mut self) {
        self.currently_selected = collect_selected(&self.tree);
        debug!(
            "update_currently_selected: {} selected",
            self.currently_selected.len()
        );
    }
}
