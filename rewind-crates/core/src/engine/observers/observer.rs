use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enumset::EnumSet;

use crate::containers::StorageKey;
use crate::engine::Assignments;
use crate::engine::IntDomainEvent;
use crate::propagation::LocalId;

impl_downcast!(VariableObserver);

/// A subscriber that keeps derived state in sync with the domains of the variables it watches,
/// without filtering them itself; for example a view or a value counter.
///
/// Observers are notified synchronously, before any propagator, so a propagator woken up by the
/// same change already sees the updated derived state.
pub trait VariableObserver: Downcast {
    fn name(&self) -> &str;

    /// Called for every batch of `events` on the variable registered with `local_id`.
    ///
    /// The observer may update reversible cells through `assignments` but must not modify
    /// domains.
    fn notify(
        &mut self,
        assignments: &mut Assignments,
        local_id: LocalId,
        events: EnumSet<IntDomainEvent>,
    );
}

/// The identifier an observer receives when it is added to a [`State`](crate::State).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObserverId(u32);

impl StorageKey for ObserverId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ObserverId(index as u32)
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObserverId({})", self.0)
    }
}

/// A variable as it is known to the observer that registered it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) struct ObserverVarId {
    pub(crate) observer: ObserverId,
    pub(crate) variable: LocalId,
}
