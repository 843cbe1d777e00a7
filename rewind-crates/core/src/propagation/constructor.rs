use super::HasAssignments;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
use crate::engine::variables::IntegerVariable;
use crate::engine::Assignments;
use crate::engine::DomainEvents;
use crate::engine::Subscriber;
use crate::engine::TrailedInteger;
use crate::engine::WatchList;
use crate::engine::Watchers;

/// A propagator constructor creates a fully initialized instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which events the propagator should be
/// enqueued. Additionally, the propagator can be initialized with values that come from the
/// current domains and can allocate reversible cells for its own state.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> Self::PropagatorImpl;
}

/// The communication point between a [`State`](crate::State) and a propagator while the
/// propagator is being created.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    watch_list: &'a mut WatchList,
    assignments: &'a mut Assignments,
    propagator_id: PropagatorId,
    /// A [`LocalId`] that is guaranteed not to be used to register any variables yet.
    next_local_id: LocalId,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        watch_list: &'a mut WatchList,
        assignments: &'a mut Assignments,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagatorConstructorContext {
            watch_list,
            assignments,
            propagator_id,
            next_local_id: LocalId::from(0),
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Subscribes the propagator to the given [`DomainEvents`] of `var`.
    ///
    /// The [`LocalId`] identifies the variable when [`Propagator::notify`] is called, and each
    /// variable *must* have a unique [`LocalId`]. Most often this is the index of the variable in
    /// the internal array of variables.
    pub fn register(
        &mut self,
        var: impl IntegerVariable,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };

        if local_id >= self.next_local_id {
            self.next_local_id = LocalId::from(local_id.unpack() + 1);
        }

        let mut watchers = Watchers::new(Subscriber::Propagator(propagator_var), self.watch_list);
        var.watch_all(&mut watchers, domain_events.get_int_events());
    }

    /// Allocate a reversible cell for the state of the propagator.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.assignments.trailed_values_mut().grow(initial_value)
    }

    /// The number of variables registered so far, assuming local ids were handed out densely.
    pub(crate) fn num_variables(&self) -> u32 {
        self.next_local_id.unpack()
    }
}

impl HasAssignments for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
