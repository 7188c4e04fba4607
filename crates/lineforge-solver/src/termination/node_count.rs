//! Node-count termination.

use super::Termination;
use crate::scope::SolveScope;

/// Terminates after exploring a number of search nodes.
#[derive(Debug, Clone)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        scope.nodes_explored() >= self.limit
    }
}
