//! Tree loading and toggle replay service
//!
//! Reads tree definitions through the filesystem abstraction, resolves node
//! paths and feeds toggle events into a [`SelectionSync`] engine.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    DomainError, ItemTree, NodeId, SelectionSync, ToggleEvent, TreeBuilder, TreeDefinition,
};
use crate::infrastructure::traits::FileSystem;

/// Result of replaying a sequence of toggle events.
#[derive(Debug, Clone)]
pub struct ReplayOutput {
    /// Events applied, in order
    pub applied: Vec<ToggleEvent>,
    /// Paths of the selected nodes after the last event, in display order
    pub selected: Vec<String>,
}

/// Service for loading item trees and driving selection.
pub struct TreeService {
    fs: Arc<dyn FileSystem>,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load and build a tree from a TOML definition file.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<ItemTree> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::TreeFileNotFound(path.to_path_buf()));
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree file", path)?;
        let definition = Self::parse(&content).map_err(|message| {
            ApplicationError::InvalidTreeFile {
                path: path.to_path_buf(),
                message,
            }
        })?;

        let tree = TreeBuilder::build(&definition)?;
        debug!("load: {} nodes from {}", tree.len(), path.display());
        Ok(tree)
    }

    /// Load `path` if given, otherwise the built-in demo organisation.
    pub fn load_or_demo(&self, path: Option<&Path>) -> ApplicationResult<ItemTree> {
        match path {
            Some(p) => self.load(p),
            None => {
                info!("No tree file configured, using demo organisation");
                Ok(TreeBuilder::demo()?)
            }
        }
    }

    fn parse(content: &str) -> Result<TreeDefinition, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Resolve a name path to a node.
    pub fn resolve(&self, tree: &ItemTree, path: &[String]) -> ApplicationResult<NodeId> {
        tree.find_by_path(path)
            .ok_or_else(|| DomainError::NodePathNotFound(path.join("/")).into())
    }

    /// Apply `events` in order. Stops at the first event that fails.
    #[instrument(level = "debug", skip(self, sync, events))]
    pub fn replay(
        &self,
        sync: &mut SelectionSync,
        events: &[ToggleEvent],
    ) -> ApplicationResult<ReplayOutput> {
        let mut applied = Vec::with_capacity(events.len());

        for event in events {
            let node = self.resolve(sync.tree(), &event.path)?;
            debug!("replay: {}", event);
            sync.on_toggle(node, event.selected)?;
            applied.push(event.clone());
        }

        Ok(ReplayOutput {
            applied,
            selected: Self::selected_paths(sync),
        })
    }

    /// Paths of the currently selected nodes, `/` separated.
    pub fn selected_paths(sync: &SelectionSync) -> Vec<String> {
        sync.currently_selected()
            .iter()
            .map(|&idx| sync.tree().path_of(idx).join("/"))
            .collect()
    }
}
