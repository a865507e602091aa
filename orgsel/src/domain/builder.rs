//! Tree builder for item definitions and the built-in demo organisation.

use tracing::{debug, instrument};

use crate::domain::arena::{ItemTree, NodeId};
use crate::domain::entities::{Item, ItemDef, TreeDefinition};
use crate::domain::error::TreeResult;

/// Constructs item trees below a virtual root.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: ItemTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a definition, keeping document order.
    #[instrument(level = "debug", skip(definition))]
    pub fn build(definition: &TreeDefinition) -> TreeResult<ItemTree> {
        let mut builder = Self::new();
        let root = builder.tree.root();
        for def in &definition.items {
            builder.add_subtree(def, root)?;
        }
        debug!("build: {} nodes", builder.tree.len());
        Ok(builder.finish())
    }

    /// Add `def` and everything below it under `parent`.
    pub fn add_subtree(&mut self, def: &ItemDef, parent: NodeId) -> TreeResult<NodeId> {
        let mut stack = vec![(def, parent)];
        let mut first = None;

        while let Some((current, parent_idx)) = stack.pop() {
            let current_idx = self
                .tree
                .insert_node(Item::new(current.name.as_str()), parent_idx)?;
            first.get_or_insert(current_idx);

            // Reverse so children are inserted in document order
            for child in current.children.iter().rev() {
                stack.push((child, current_idx));
            }
        }

        Ok(first.unwrap_or(parent))
    }

    pub fn finish(self) -> ItemTree {
        self.tree
    }

    /// The demo organisation: two organisations, divisions, teams and
    /// employees shared between teams (Employee 1, 4, 9 and 10).
    pub fn demo() -> TreeResult<ItemTree> {
        Self::build(&demo_definition())
    }
}

/// Definition behind [`TreeBuilder::demo`].
pub fn demo_definition() -> TreeDefinition {
    let leaf = ItemDef::leaf;
    let node = ItemDef::with_children;

    TreeDefinition {
        items: vec![
            node(
                "Organisation A",
                vec![
                    node(
                        "Division A",
                        vec![
                            node(
                                "Team B",
                                vec![
                                    leaf("Employee 1"),
                                    leaf("Employee 4"),
                                    leaf("Employee 5"),
                                    leaf("Employee 9"),
                                ],
                            ),
                            node(
                                "Team C",
                                vec![
                                    leaf("Employee 6"),
                                    leaf("Employee 7"),
                                    leaf("Employee 8"),
                                    leaf("Employee 9"),
                                ],
                            ),
                        ],
                    ),
                    node(
                        "Division B",
                        vec![node(
                            "Team D",
                            vec![
                                leaf("Employee 4"),
                                leaf("Employee 10"),
                                leaf("Employee 11"),
                            ],
                        )],
                    ),
                    node(
                        "Team A",
                        vec![
                            leaf("Employee 1"),
                            leaf("Employee 2"),
                            leaf("Employee 3"),
                            leaf("Employee 9"),
                            leaf("Employee 10"),
                        ],
                    ),
                ],
            ),
            node(
                "Organisation B",
                vec![node(
                    "Team E",
                    vec![
                        leaf("Employee 1"),
                        leaf("Employee 12"),
                        leaf("Employee 13"),
                    ],
                )],
            ),
        ],
    }
}
