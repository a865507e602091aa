//! Flat view of the currently selected nodes

use tracing::instrument;

use crate::domain::arena::{ItemTree, NodeId};

/// Selected nodes in display order (pre-order), the virtual root excluded.
#[instrument(level = "debug", skip(tree))]
pub fn collect_selected(tree: &ItemTree) -> Vec<NodeId> {
    tree.iter()
        .filter(|(idx, node)| !tree.is_root(*idx) && node.selected)
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Item;

    #[test]
    fn given_selected_nodes_when_projecting_then_preorder_without_root() {
        let mut tree = ItemTree::new();
        let team = tree.insert_node(Item::new("TeamX"), tree.root()).unwrap();
        let bob = tree.insert_node(Item::new("Bob"), team).unwrap();
        let carl = tree.insert_node(Item::new("Carl"), team).unwrap();
        for idx in [carl, bob, team] {
            tree.get_node_mut(idx).unwrap().selected = true;
        }

        assert_eq!(collect_selected(&tree), vec![team, bob, carl]);
        // read-only
        assert_eq!(collect_selected(&tree), vec![team, bob, carl]);
    }

    #[test]
    fn given_nothing_selected_when_projecting_then_empty() {
        let mut tree = ItemTree::new();
        tree.insert_node(Item::new("TeamX"), tree.root()).unwrap();
        assert!(collect_selected(&tree).is_empty());
    }
}
