//! Resource names and the dependency map supplied by the host.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::board::Board;

/// Fully qualified name of a host resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName {
    pub namespace: String,
    pub kind: String,
    pub subtype: String,
    pub name: String,
}

impl ResourceName {
    /// Name of a board component
    pub fn board(name: &str) -> Self {
        Self {
            namespace: "rdk".to_string(),
            kind: "component".to_string(),
            subtype: "board".to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}/{}", self.namespace, self.kind, self.subtype, self.name)
    }
}

/// Resolved resources this controller may depend on
#[derive(Clone, Default)]
pub struct Dependencies {
    boards: HashMap<ResourceName, Arc<dyn Board>>,
}

impl Dependencies {
    /// Create an empty dependency map
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a board under its own name
    pub fn with_board(mut self, board: Arc<dyn Board>) -> Self {
        self.insert_board(board);
        self
    }

    /// Register a board under its own name
    pub fn insert_board(&mut self, board: Arc<dyn Board>) {
        self.boards.insert(ResourceName::board(board.name()), board);
    }

    /// Look up a board by its short name
    pub fn board(&self, name: &str) -> Option<Arc<dyn Board>> {
        self.boards.get(&ResourceName::board(name)).cloned()
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Whether no resources are registered
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.boards.keys().map(ToString::to_string).collect();
        names.sort();
        f.debug_struct("Dependencies").field("resources", &names).finish()
    }
}
