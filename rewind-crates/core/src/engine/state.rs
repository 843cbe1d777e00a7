use enumset::EnumSet;
use log::debug;
use log::trace;

use super::observers::ObserverConstructor;
use super::observers::ObserverConstructorContext;
use super::observers::ObserverHandle;
use super::observers::ObserverStore;
use super::observers::VariableObserver;
use super::propagator_queue::PropagatorQueue;
use super::trailed::TrailedInteger;
use super::variables::DomainId;
use super::variables::IntegerVariable;
use super::watch_list::Subscriber;
use super::watch_list::WatchList;
use super::Assignments;
use super::IntDomainEvent;
use super::TrailOptions;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Entailment;
use crate::basic_types::Inconsistency;
use crate::containers::StorageKey;
use crate::propagation::EnqueueDecision;
use crate::propagation::ExplanationContext;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorStore;
use crate::propagation::RuleStore;
use crate::rewind_asserts::print_rewind_assert_warning_message;
use crate::rewind_asserts::rewind_assert_advanced;
use crate::rewind_asserts::rewind_assert_eq_simple;
use crate::rewind_asserts::rewind_assert_extreme;
use crate::rewind_asserts::rewind_assert_simple;

/// The [`State`] is the container of variables, propagators and observers, and owns all
/// reversible state.
///
/// The search loop drives it by pushing and popping worlds around decisions:
/// ```
/// # use rewind_core::State;
/// let mut state = State::default();
/// let x = state.new_interval_variable(0, 10);
///
/// state.push_world();
/// let _ = state.set_upper_bound(x, 5).expect("non-empty domain");
/// state.propagate_to_fixed_point().expect("no conflict");
/// assert_eq!(state.upper_bound(x), 5);
///
/// state.pop_world();
/// assert_eq!(state.upper_bound(x), 10);
/// ```
#[derive(Debug)]
pub struct State {
    /// The domains of all variables, and the reversible cells they live in.
    assignments: Assignments,
    /// The list of propagators; propagators live here and are queried when events (domain changes)
    /// happen.
    propagators: PropagatorStore,
    observers: ObserverStore,
    /// For every domain, who should be notified of its events.
    watch_list: WatchList,
    /// Dictates the order in which propagators will be called to propagate.
    propagator_queue: PropagatorQueue,
    /// Events which observers have already seen but propagators have not.
    event_buffer: Vec<(DomainId, EnumSet<IntDomainEvent>)>,
}

impl Default for State {
    fn default() -> Self {
        State::new(TrailOptions::default())
    }
}

impl State {
    pub fn new(options: TrailOptions) -> State {
        print_rewind_assert_warning_message!();

        State {
            assignments: Assignments::new(options),
            propagators: PropagatorStore::default(),
            observers: ObserverStore::default(),
            watch_list: WatchList::default(),
            propagator_queue: PropagatorQueue::default(),
            event_buffer: Vec::new(),
        }
    }

    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }
}

/// Operations to create and read variables and reversible cells.
impl State {
    /// Create a new integer variable with the domain `[lower_bound, upper_bound]`.
    pub fn new_interval_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        let domain_id = self.assignments.grow(lower_bound, upper_bound);
        self.watch_list.grow();
        domain_id
    }

    /// Create a new integer variable whose domain consists of `values`.
    pub fn new_sparse_variable(&mut self, values: &[i32]) -> DomainId {
        let domain_id = self.assignments.grow_sparse(values);
        self.watch_list.grow();
        domain_id
    }

    pub fn lower_bound<Var: IntegerVariable>(&self, variable: Var) -> i32 {
        variable.lower_bound(&self.assignments)
    }

    pub fn upper_bound<Var: IntegerVariable>(&self, variable: Var) -> i32 {
        variable.upper_bound(&self.assignments)
    }

    pub fn contains<Var: IntegerVariable>(&self, variable: Var, value: i32) -> bool {
        variable.contains(&self.assignments, value)
    }

    /// Returns the value of `variable` if it is fixed, and [`None`] otherwise.
    pub fn fixed_value<Var: IntegerVariable>(&self, variable: Var) -> Option<i32> {
        variable
            .is_fixed(&self.assignments)
            .then(|| variable.lower_bound(&self.assignments))
    }

    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.assignments.trailed_values_mut().grow(initial_value)
    }

    pub fn read_trailed(&self, trailed_integer: TrailedInteger) -> i64 {
        self.assignments.trailed_values().read(trailed_integer)
    }

    pub fn assign_trailed(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.assignments
            .trailed_values_mut()
            .assign(trailed_integer, value);
    }
}

/// Operations to modify domains outside of propagation, e.g. to apply search decisions.
///
/// Observers see the changes before these operations return. Propagators are only notified by
/// the next call to [`State::propagate_to_fixed_point`].
impl State {
    pub fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let result = variable.set_lower_bound(&mut self.assignments, bound);
        self.notify_observers();
        result
    }

    pub fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let result = variable.set_upper_bound(&mut self.assignments, bound);
        self.notify_observers();
        result
    }

    pub fn remove<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let result = variable.remove(&mut self.assignments, value);
        self.notify_observers();
        result
    }

    pub fn assign<Var: IntegerVariable>(
        &mut self,
        variable: Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let result = variable.assign(&mut self.assignments, value);
        self.notify_observers();
        result
    }
}

/// Operations for worlds.
impl State {
    pub fn current_world(&self) -> usize {
        self.assignments.current_world()
    }

    /// The clock value of the current search node. It increases on every push and pop.
    pub fn timestamp(&self) -> u64 {
        self.assignments.timestamp()
    }

    /// Enter a new world. Every reversible change from now on is undone by the matching
    /// [`State::pop_world`].
    ///
    /// All changes have to be propagated before a world can be pushed.
    pub fn push_world(&mut self) {
        rewind_assert_simple!(
            self.propagator_queue.is_empty()
                && self.event_buffer.is_empty()
                && !self.assignments.has_pending_events(),
            "Can only push a world when all propagation has occurred"
        );

        self.assignments.push_world();
        debug!("entered world {}", self.current_world());
    }

    /// Leave the current world, restoring all reversible state to what it was when the world was
    /// pushed.
    pub fn pop_world(&mut self) {
        self.leave_world();
        self.synchronise_propagators();
    }

    /// Pop worlds until `world` is the current world.
    ///
    /// If `world` is the current world this is a no-op; it cannot be larger than the current
    /// world.
    pub fn restore_to(&mut self, world: usize) {
        rewind_assert_simple!(
            world <= self.current_world(),
            "Cannot restore to world {world} from world {}",
            self.current_world()
        );

        if world == self.current_world() {
            return;
        }

        while self.current_world() > world {
            self.leave_world();
        }
        self.synchronise_propagators();
    }

    fn leave_world(&mut self) {
        rewind_assert_simple!(self.current_world() > 0, "Cannot pop the root world");

        self.assignments.pop_world();
        self.event_buffer.clear();
        self.propagator_queue.clear();
        debug!("returned to world {}", self.current_world());
    }

    fn synchronise_propagators(&mut self) {
        for index in 0..self.propagators.num_propagators() {
            let propagator_id = PropagatorId::create_from_index(index);
            let context = PropagationContext::new(&self.assignments);
            self.propagators[propagator_id].synchronise(context);
        }
    }
}

/// Operations for adding and retrieving propagators and observers.
impl State {
    /// Add a new propagator to the [`State`]. The constructor for that propagator should
    /// subscribe to the appropriate domain events so that the propagator is called when
    /// necessary.
    ///
    /// While the propagator is added to the queue for propagation, this function does _not_
    /// trigger a round of propagation. An explicit call to [`State::propagate_to_fixed_point`] is
    /// necessary to run the new propagator for the first time.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
    {
        let slot = self.propagators.new_propagator();
        let original_handle = slot.key();

        let mut context = PropagatorConstructorContext::new(
            &mut self.watch_list,
            &mut self.assignments,
            original_handle.untyped(),
        );
        let propagator = constructor.create(&mut context);
        let num_variables = context.num_variables();

        let passive = self.assignments.trailed_values_mut().grow(0);
        let priority = propagator.priority();
        let handle = slot.populate(propagator, passive, num_variables);
        rewind_assert_eq_simple!(handle.untyped(), original_handle.untyped());

        self.propagator_queue
            .enqueue_propagator(handle.untyped(), priority, EnumSet::all());

        handle
    }

    /// Get a reference to the propagator identified by the given handle.
    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    /// Get an exclusive reference to the propagator identified by the given handle.
    pub fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.propagators.get_propagator_mut(handle)
    }

    /// Whether the propagator became entailed in the current world or one of its ancestors, in
    /// which case it is no longer called.
    pub fn is_passive(&self, propagator: PropagatorId) -> bool {
        self.propagators.is_passive(propagator, &self.assignments)
    }

    /// Ask the propagator whether its constraint is decided by the current domains.
    pub fn is_entailed(&self, propagator: PropagatorId) -> Entailment {
        self.propagators[propagator].is_entailed(PropagationContext::new(&self.assignments))
    }

    /// Add the rules justifying `event` with `value` on the variable `local_id` of `propagator`
    /// to `rules`. Returns whether any rule was added.
    pub fn explain(
        &self,
        propagator: PropagatorId,
        local_id: LocalId,
        event: IntDomainEvent,
        value: i32,
        rules: &mut RuleStore,
    ) -> bool {
        let num_variables = self.propagators.num_variables(propagator);
        let mut context = ExplanationContext::new(rules, propagator, num_variables);
        self.propagators[propagator].explain(&mut context, local_id, event, value)
    }

    /// Add a new observer to the [`State`]. From now on it is notified of every event on the
    /// variables it registered.
    pub fn add_observer<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> ObserverHandle<Constructor::ObserverImpl>
    where
        Constructor: ObserverConstructor,
    {
        let observer_id = self.observers.next_id();
        let mut context =
            ObserverConstructorContext::new(&mut self.watch_list, &mut self.assignments, observer_id);
        let observer = constructor.create(&mut context);

        let handle = self.observers.push(observer);
        rewind_assert_eq_simple!(handle.untyped(), observer_id);
        handle
    }

    pub fn get_observer<O: VariableObserver>(&self, handle: ObserverHandle<O>) -> Option<&O> {
        self.observers.get_observer(handle)
    }

    /// Run `operation` on the observer identified by `handle`, with access to the assignments so
    /// that operations of the observer which modify domains can be applied.
    ///
    /// The domain changes made by `operation` are passed on to all observers before this returns.
    /// Returns [`None`] if `handle` does not refer to an observer.
    pub fn update_observer<O: VariableObserver, R>(
        &mut self,
        handle: ObserverHandle<O>,
        operation: impl FnOnce(&mut O, &mut Assignments) -> R,
    ) -> Option<R> {
        let observer = self.observers.get_observer_mut(handle)?;
        let result = operation(observer, &mut self.assignments);
        self.notify_observers();
        Some(result)
    }
}

/// Operations for propagation.
impl State {
    /// Performs fixed-point propagation using the propagators defined in the [`State`].
    ///
    /// First the pending domain changes are dispatched to observers and propagators. Then the
    /// enqueued propagators run by priority until none of them changes a domain anymore.
    ///
    /// It could be that the current [`State`] implies a conflict by propagation. In that case, an
    /// error with [`Inconsistency`] is returned. Once the [`State`] is conflicting, then the only
    /// operations that are defined are [`State::pop_world`] and [`State::restore_to`].
    pub fn propagate_to_fixed_point(&mut self) -> Result<(), Inconsistency> {
        self.notify_about_domain_events();

        // Keep propagating until there are unprocessed propagators, or a conflict is detected.
        while let Some((propagator_id, events)) = self.propagator_queue.pop() {
            self.propagate(propagator_id, events)?;
        }

        rewind_assert_extreme!(
            self.debug_fixed_point_propagation(),
            "A propagator could still propagate at the fixed point"
        );

        Ok(())
    }

    fn propagate(
        &mut self,
        propagator_id: PropagatorId,
        events: EnumSet<IntDomainEvent>,
    ) -> Result<(), Inconsistency> {
        if self.is_passive(propagator_id) {
            return Ok(());
        }

        trace!(
            "propagating {} ({propagator_id}) for {events:?}",
            self.propagators[propagator_id].name()
        );

        let propagation_status = {
            let propagator = &mut self.propagators[propagator_id];
            let context = PropagationContextMut::new(&mut self.assignments, propagator_id);
            propagator.propagate(context, events)
        };

        match propagation_status {
            Ok(()) => {
                let entailment = self.is_entailed(propagator_id);
                rewind_assert_advanced!(
                    entailment != Entailment::False,
                    "{} is violated after propagating successfully",
                    self.propagators[propagator_id].name()
                );

                if entailment == Entailment::True {
                    debug!(
                        "{} ({propagator_id}) is entailed",
                        self.propagators[propagator_id].name()
                    );
                    let flag = self.propagators.passive_flag(propagator_id);
                    self.assignments.trailed_values_mut().assign_bool(flag, true);
                }

                // Notify observers and other propagators of the propagations and continue.
                self.notify_about_domain_events();
                Ok(())
            }
            Err(inconsistency) => {
                debug!(
                    "{} ({propagator_id}) failed: {inconsistency}",
                    self.propagators[propagator_id].name()
                );
                Err(inconsistency)
            }
        }
    }

    /// Pass the domain changes since the last call on to the observers, and keep them for the
    /// propagators.
    fn notify_observers(&mut self) {
        let first_new = self.event_buffer.len();
        self.event_buffer
            .extend(self.assignments.drain_domain_events());

        for &(domain, events) in self.event_buffer[first_new..].iter() {
            trace!("{domain} changed: {events:?}");

            for watcher in self.watch_list.watchers(domain) {
                let Subscriber::Observer(observer_var) = watcher.subscriber else {
                    continue;
                };
                let triggered = watcher.events & events;
                if triggered.is_empty() {
                    continue;
                }

                self.observers[observer_var.observer].notify(
                    &mut self.assignments,
                    observer_var.variable,
                    triggered,
                );
            }
        }
        rewind_assert_simple!(
            !self.assignments.has_pending_events(),
            "Observers are not allowed to modify domains while being notified"
        );
    }

    /// Dispatch the pending domain events, first to observers and then to propagators.
    fn notify_about_domain_events(&mut self) {
        self.notify_observers();

        let mut buffer = std::mem::take(&mut self.event_buffer);
        for &(domain, events) in buffer.iter() {
            for watcher in self.watch_list.watchers(domain) {
                let Subscriber::Propagator(propagator_var) = watcher.subscriber else {
                    continue;
                };
                let triggered = watcher.events & events;
                if triggered.is_empty()
                    || self
                        .propagators
                        .is_passive(propagator_var.propagator, &self.assignments)
                {
                    continue;
                }

                let propagator = &mut self.propagators[propagator_var.propagator];
                let mut enqueue = false;
                for event in triggered.iter() {
                    let context = PropagationContext::new(&self.assignments);
                    enqueue |= propagator.notify(context, propagator_var.variable, event)
                        == EnqueueDecision::Enqueue;
                }

                if enqueue {
                    let priority = propagator.priority();
                    self.propagator_queue.enqueue_propagator(
                        propagator_var.propagator,
                        priority,
                        triggered,
                    );
                }
            }
        }

        buffer.clear();
        self.event_buffer = buffer;
    }

    /// Checks that no active propagator can propagate anything from scratch.
    fn debug_fixed_point_propagation(&self) -> bool {
        self.propagators
            .ids()
            .filter(|&propagator_id| !self.is_passive(propagator_id))
            .all(|propagator_id| {
                let mut assignments = self.assignments.clone();
                let context = PropagationContextMut::new(&mut assignments, propagator_id);
                self.propagators[propagator_id]
                    .propagate_from_scratch(context)
                    .is_ok()
                    && !assignments.has_pending_events()
            })
    }
}
