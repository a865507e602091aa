//! orgsel: tri-state selection sync for organisation trees
//!
//! Toggling one node keeps the whole tree consistent: every occurrence of the
//! same item is updated, fully covered nodes are auto-selected and their
//! nested items locked.
//!
//! Layers:
//! - [`domain`]: item tree, selection engine, builder (no I/O)
//! - [`application`]: services loading trees and replaying toggle events
//! - [`infrastructure`]: I/O boundary traits and DI container
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
