//! This module exposes helpers that aid testing of propagators and observers. The [`TestSolver`]
//! allows setting up specific scenarios under which to test the various operations of a
//! propagator.
use super::observers::ObserverConstructor;
use super::observers::ObserverHandle;
use super::observers::VariableObserver;
use super::variables::DomainId;
use super::Assignments;
use super::State;
use crate::basic_types::Entailment;
use crate::basic_types::Inconsistency;
use crate::propagation::IntDomainEvent;
use crate::propagation::LocalId;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;
use crate::propagation::RuleStore;

/// A container for variables, which can be used to test propagators and observers.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    pub(crate) state: State,
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state.new_interval_variable(lb, ub)
    }

    pub(crate) fn new_sparse_variable(&mut self, values: &[i32]) -> DomainId {
        self.state.new_sparse_variable(values)
    }

    /// Add the propagator and run propagation until a fixed point is reached.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Inconsistency>
    where
        Constructor: PropagatorConstructor,
    {
        let handle = self.state.add_propagator(constructor);
        self.state.propagate_to_fixed_point()?;
        Ok(handle)
    }

    pub(crate) fn new_observer<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> ObserverHandle<Constructor::ObserverImpl>
    where
        Constructor: ObserverConstructor,
    {
        self.state.add_observer(constructor)
    }

    pub(crate) fn observer<O: VariableObserver>(&self, handle: ObserverHandle<O>) -> &O {
        self.state
            .get_observer(handle)
            .expect("the handle refers to an observer of this type")
    }

    pub(crate) fn update_observer<O: VariableObserver, R>(
        &mut self,
        handle: ObserverHandle<O>,
        operation: impl FnOnce(&mut O, &mut Assignments) -> R,
    ) -> R {
        self.state
            .update_observer(handle, operation)
            .expect("the handle refers to an observer of this type")
    }

    pub(crate) fn propagate(&mut self) -> Result<(), Inconsistency> {
        self.state.propagate_to_fixed_point()
    }

    pub(crate) fn lower_bound(&self, var: DomainId) -> i32 {
        self.state.lower_bound(var)
    }

    pub(crate) fn upper_bound(&self, var: DomainId) -> i32 {
        self.state.upper_bound(var)
    }

    pub(crate) fn contains(&self, var: DomainId, value: i32) -> bool {
        self.state.contains(var, value)
    }

    pub(crate) fn set_lower_bound(&mut self, var: DomainId, value: i32) {
        let result = self.state.set_lower_bound(var, value);
        assert!(
            result.is_ok(),
            "The provided value to `set_lower_bound` caused an empty domain"
        );
    }

    pub(crate) fn set_upper_bound(&mut self, var: DomainId, value: i32) {
        let result = self.state.set_upper_bound(var, value);
        assert!(
            result.is_ok(),
            "The provided value to `set_upper_bound` caused an empty domain"
        );
    }

    pub(crate) fn remove(&mut self, var: DomainId, value: i32) {
        let result = self.state.remove(var, value);
        assert!(
            result.is_ok(),
            "The provided value to `remove` caused an empty domain"
        );
    }

    pub(crate) fn assign(&mut self, var: DomainId, value: i32) {
        let result = self.state.assign(var, value);
        assert!(
            result.is_ok(),
            "The provided value to `assign` caused an empty domain"
        );
    }

    pub(crate) fn is_entailed<P: Propagator>(
        &self,
        handle: PropagatorHandle<P>,
    ) -> Entailment {
        self.state.is_entailed(handle.untyped())
    }

    pub(crate) fn explain<P: Propagator>(
        &self,
        handle: PropagatorHandle<P>,
        local_id: u32,
        event: IntDomainEvent,
        value: i32,
    ) -> RuleStore {
        let mut rules = RuleStore::default();
        let _ = self.state.explain(
            handle.untyped(),
            LocalId::from(local_id),
            event,
            value,
            &mut rules,
        );
        rules
    }

    pub(crate) fn assert_bounds(&self, var: DomainId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub), (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }
}
