//! Termination conditions for solve attempts.

mod composite;
mod external;
mod node_count;
mod time;

use std::fmt::Debug;

use crate::scope::SolveScope;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use node_count::NodeCountTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop searching.
pub trait Termination: Send + Debug {
    /// Returns true if the search should stop.
    fn is_terminated(&self, scope: &SolveScope) -> bool;
}

/// An absent termination never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }
}

#[cfg(test)]
mod tests;
