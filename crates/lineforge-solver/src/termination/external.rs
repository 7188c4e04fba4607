//! External termination via the scope's cancellation flag.

use super::Termination;
use crate::scope::SolveScope;

/// Terminates when the caller sets the flag attached to the [`SolveScope`].
///
/// # Example
///
/// ```
/// use std::sync::atomic::AtomicBool;
/// use std::sync::Arc;
/// use lineforge_solver::scope::SolveScope;
/// use lineforge_solver::termination::ExternalTermination;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let scope = SolveScope::new().with_terminate_flag(flag.clone());
/// let term = ExternalTermination;
///
/// // Later: flag.store(true, Ordering::SeqCst);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalTermination;

impl Termination for ExternalTermination {
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        scope.is_terminate_early()
    }
}
