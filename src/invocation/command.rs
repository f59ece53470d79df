//! Command model
//!
//! All index mutations and content reads route through this enum.
//! Commands are immutable values carrying only data; execution lives
//! behind the `CommandExecutor` seam.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::content::ContentEntry;

/// Index mutation payload: entries added or replaced, ids removed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyChanges {
    /// Entries whose documents are added or replaced
    pub added: Vec<ContentEntry>,
    /// Entry ids whose documents are removed
    pub removed: BTreeSet<String>,
}

impl ApplyChanges {
    /// Returns true if the payload holds no mutations
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// All commands route through this enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Apply added/removed documents to the index
    ApplyChanges(ApplyChanges),

    /// Fetch a content entry by id
    FetchEntry {
        id: String,
    },

    /// Fetch the child entries of a parent id
    FetchChildren {
        parent_id: String,
    },
}

impl Command {
    /// Get the command name for metrics/logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::ApplyChanges(_) => "apply_changes",
            Self::FetchEntry { .. } => "fetch_entry",
            Self::FetchChildren { .. } => "fetch_children",
        }
    }
}

/// What a successfully executed command produced
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Mutations were buffered for the next commit
    Applied {
        /// Documents added or replaced
        added: usize,
        /// Documents removed
        removed: usize,
    },
    /// A fetched content entry
    Entry(ContentEntry),
    /// Fetched child entries, sorted by id
    Children(Vec<ContentEntry>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        let json = r#"{"cmd": "fetch_entry", "id": "e1"}"#;
        let command: Command = serde_json::from_str(json).unwrap();

        assert!(matches!(command, Command::FetchEntry { .. }));
        assert_eq!(command.name(), "fetch_entry");
    }

    #[test]
    fn test_apply_changes_parsing() {
        let json = r#"{
            "cmd": "apply_changes",
            "added": [],
            "removed": ["gone_1", "gone_2"]
        }"#;
        let command: Command = serde_json::from_str(json).unwrap();

        if let Command::ApplyChanges(changes) = command {
            assert!(changes.added.is_empty());
            assert_eq!(changes.removed.len(), 2);
            assert!(!changes.is_empty());
        } else {
            panic!("Expected ApplyChanges command");
        }
    }

    #[test]
    fn test_fetch_children_round_trip() {
        let command = Command::FetchChildren {
            parent_id: "folder_1".into(),
        };
        let json = serde_json::to_string(&command).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();

        assert_eq!(command, back);
        assert_eq!(back.name(), "fetch_children");
    }
}
