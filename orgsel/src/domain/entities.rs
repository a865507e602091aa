//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Payload of a tree node: an organisation, division, team or employee.
///
/// Two items are interchangeable when their names are equal. The same employee
/// listed under several teams is one logical entity carried by several nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Nested item definition as read from a tree file.
///
/// ```toml
/// [[items]]
/// name = "Organisation A"
///
/// [[items.children]]
/// name = "Team A"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemDef>,
}

impl ItemDef {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<ItemDef>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// Top-level nodes of a tree; the virtual root is implied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDefinition {
    #[serde(default)]
    pub items: Vec<ItemDef>,
}

/// Display state of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Unselected,
    Selected,
    /// Selected and not independently togglable
    Locked,
}

impl SelectionState {
    pub fn from_flags(selected: bool, selectable: bool) -> Self {
        match (selected, selectable) {
            (true, false) => SelectionState::Locked,
            (true, true) => SelectionState::Selected,
            (false, _) => SelectionState::Unselected,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            SelectionState::Unselected => "[ ]",
            SelectionState::Selected => "[x]",
            SelectionState::Locked => "[#]",
        }
    }
}

/// A user interaction on one node, addressed by its name path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleEvent {
    /// Names from the top-level node down to the toggled node
    pub path: Vec<String>,
    /// `true` for select, `false` for unselect
    pub selected: bool,
}

impl ToggleEvent {
    pub fn select(path: &str) -> Self {
        Self {
            path: split_path(path),
            selected: true,
        }
    }

    pub fn unselect(path: &str) -> Self {
        Self {
            path: split_path(path),
            selected: false,
        }
    }

    pub fn path_string(&self) -> String {
        self.path.join("/")
    }
}

/// Parses `+Org/Team/Employee` (select) and `-Org/Team/Employee` (unselect).
impl FromStr for ToggleEvent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidToggleEvent {
            event: s.to_string(),
            reason: reason.to_string(),
        };

        let (selected, rest) = if let Some(rest) = s.strip_prefix('+') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('-') {
            (false, rest)
        } else {
            return Err(invalid("expected '+' (select) or '-' (unselect) prefix"));
        };

        let path = split_path(rest);
        if path.is_empty() {
            return Err(invalid("empty node path"));
        }
        Ok(Self { path, selected })
    }
}

impl fmt::Display for ToggleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.selected { '+' } else { '-' };
        write!(f, "{}{}", sign, self.path_string())
    }
}

/// Split a `/` separated node path, trimming segments and dropping empty ones.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn given_items_with_same_name_when_compared_then_equal_and_hash_once() {
        let a = Item::new("Employee 1");
        let b = Item::new("Employee 1".to_string());

        assert_eq!(a, b);
        let set: HashSet<Item> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn given_flags_when_mapping_state_then_lock_requires_selection() {
        assert_eq!(SelectionState::from_flags(true, false), SelectionState::Locked);
        assert_eq!(SelectionState::from_flags(true, true), SelectionState::Selected);
        assert_eq!(
            SelectionState::from_flags(false, false),
            SelectionState::Unselected
        );
    }

    #[test]
    fn given_prefixed_paths_when_parsing_events_then_direction_and_segments_match() {
        let ev: ToggleEvent = "+Organisation A/ Team A /Employee 1".parse().unwrap();
        assert!(ev.selected);
        assert_eq!(ev.path, vec!["Organisation A", "Team A", "Employee 1"]);
        assert_eq!(ev.to_string(), "+Organisation A/Team A/Employee 1");

        let ev: ToggleEvent = "-Organisation B".parse().unwrap();
        assert!(!ev.selected);
        assert_eq!(ev.path, vec!["Organisation B"]);
    }

    #[test]
    fn given_malformed_events_when_parsing_then_errors() {
        assert!("Organisation A".parse::<ToggleEvent>().is_err());
        assert!("+".parse::<ToggleEvent>().is_err());
        assert!("-//".parse::<ToggleEvent>().is_err());
    }

    #[test]
    fn given_nested_toml_when_deserializing_then_children_kept_in_order() {
        let content = r#"
[[items]]
name = "Org"

[[items.children]]
name = "Team"

[[items.children.children]]
name = "Bob"

[[items.children.children]]
name = "Carl"
"#;
        let def: TreeDefinition = toml::from_str(content).unwrap();
        assert_eq!(def.items.len(), 1);
        let team = &def.items[0].children[0];
        assert_eq!(team.name, "Team");
        let names: Vec<_> = team.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Carl"]);
    }
}
