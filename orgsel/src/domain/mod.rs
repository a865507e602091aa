//! Domain layer: item tree and selection synchronization
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod projector;
pub mod sync;

pub use arena::{ItemTree, NodeId, TreeNode};
pub use builder::{demo_definition, TreeBuilder};
pub use entities::*;
pub use error::{DomainError, TreeResult};
pub use projector::collect_selected;
pub use sync::SelectionSync;
