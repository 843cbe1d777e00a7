use super::ObserverId;
use super::ObserverVarId;
use super::VariableObserver;
use crate::engine::delta::DeltaMonitor;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::Assignments;
use crate::engine::DomainEvents;
use crate::engine::Subscriber;
use crate::engine::WatchList;
use crate::engine::Watchers;
use crate::propagation::HasAssignments;
use crate::propagation::LocalId;

/// Creates a fully initialised [`VariableObserver`].
pub trait ObserverConstructor {
    type ObserverImpl: VariableObserver;

    fn create(self, context: &mut ObserverConstructorContext<'_>) -> Self::ObserverImpl;
}

/// The communication point between a [`State`](crate::State) and an observer while the observer
/// is being created.
#[derive(Debug)]
pub struct ObserverConstructorContext<'a> {
    watch_list: &'a mut WatchList,
    assignments: &'a mut Assignments,
    observer_id: ObserverId,
}

impl<'a> ObserverConstructorContext<'a> {
    pub(crate) fn new(
        watch_list: &'a mut WatchList,
        assignments: &'a mut Assignments,
        observer_id: ObserverId,
    ) -> Self {
        ObserverConstructorContext {
            watch_list,
            assignments,
            observer_id,
        }
    }

    pub fn observer_id(&self) -> ObserverId {
        self.observer_id
    }

    /// Subscribe to every event of `var`, and return a monitor over its removals.
    ///
    /// The monitor starts at the current end of the removal log, so removals that happened before
    /// the observer existed are never reported to it.
    pub fn register(&mut self, var: DomainId, local_id: LocalId) -> DeltaMonitor {
        let observer_var = ObserverVarId {
            observer: self.observer_id,
            variable: local_id,
        };

        let mut watchers = Watchers::new(Subscriber::Observer(observer_var), self.watch_list);
        var.watch_all(&mut watchers, DomainEvents::ANY_INT.get_int_events());

        let mut monitor = DeltaMonitor::new(var);
        monitor.clear(self.assignments);
        monitor
    }

    /// Access to the assignments, to allocate the reversible state of the observer.
    pub fn assignments_mut(&mut self) -> &mut Assignments {
        self.assignments
    }
}

impl HasAssignments for ObserverConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
