//! Composite termination (OR).
//!
//! Uses macro-generated tuple implementations, so no boxing is needed.

use super::Termination;
use crate::scope::SolveScope;

/// Combines multiple terminations with OR logic (any must terminate).
///
/// # Examples
///
/// ```
/// use lineforge_solver::termination::{
///     ExternalTermination, NodeCountTermination, OrTermination, TimeTermination,
/// };
///
/// // Stop after 30 seconds, a million nodes, or a caller cancellation
/// let termination = OrTermination::new((
///     TimeTermination::seconds(30),
///     NodeCountTermination::new(1_000_000),
///     ExternalTermination,
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    /// Creates a new OR termination from a tuple of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Generates `Termination` implementations for OR tuples.
macro_rules! impl_or_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Termination for OrTermination<($($T,)+)>
        where
            $($T: Termination,)+
        {
            fn is_terminated(&self, scope: &SolveScope) -> bool {
                $((self.0).$idx.is_terminated(scope))||+
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
