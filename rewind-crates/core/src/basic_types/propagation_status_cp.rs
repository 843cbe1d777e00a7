use thiserror::Error;

use crate::engine::variables::DomainId;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// The result of invoking a propagator. The propagation can either succeed or identify an
/// inconsistency, after which the caller is expected to backtrack.
pub type PropagationStatusCP = Result<(), Inconsistency>;

/// The reason why the current partial assignment cannot be extended to a solution.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Inconsistency {
    #[error(transparent)]
    EmptyDomain(#[from] EmptyDomain),
    #[error(transparent)]
    Conflict(#[from] PropagatorConflict),
}

/// A domain operation would have removed the last value from the domain of `domain`.
///
/// The operation that fails with this error leaves the domain untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("the domain of {domain} would become empty")]
pub struct EmptyDomain {
    pub domain: DomainId,
}

/// A conflict detected by a propagator that is not an empty domain.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("propagator {propagator} failed on local variable {variable}: {message}")]
pub struct PropagatorConflict {
    pub propagator: PropagatorId,
    /// The variable the conflict is attributed to.
    pub variable: LocalId,
    pub message: String,
}
