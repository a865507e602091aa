/*
Rendering of an ItemTree as a termtree::Tree.

Every node is labelled with its selection marker:
  [ ] unselected
  [x] selected
  [#] selected and locked
The virtual root carries no item and is labelled with the caller's title.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{ItemTree, NodeId, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self, title: &str) -> Tree<String>;
}

pub fn node_label(node: &TreeNode) -> String {
    format!("{} {}", node.state().marker(), node.name().unwrap_or_default())
}

impl TreeNodeConvert for ItemTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, title: &str) -> Tree<String> {
        fn build_tree(tree: &ItemTree, node_idx: NodeId, parent_tree: &mut Tree<String>) {
            if let Some(node) = tree.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = tree.get_node(child_idx) {
                        let mut child_tree = Tree::new(node_label(child));
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut root = Tree::new(title.to_string());
        build_tree(self, self.root(), &mut root);
        root
    }
}
