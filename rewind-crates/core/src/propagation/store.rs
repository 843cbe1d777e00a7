use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::containers::Slot;
use crate::engine::Assignments;
use crate::engine::TrailedInteger;

struct PropagatorEntry {
    propagator: Box<dyn Propagator>,
    /// Set when the propagator is entailed; reset by backtracking.
    passive: TrailedInteger,
    num_variables: u32,
}

/// A central store for propagators.
#[derive(Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, PropagatorEntry>,
}

/// A typed wrapper around a [`PropagatorId`] that allows retrieving concrete propagators from a
/// [`State`](crate::State).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    /// Get a type-erased handle to the propagator.
    pub fn untyped(self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl PropagatorStore {
    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = PropagatorId> {
        self.propagators.keys()
    }

    pub(crate) fn new_propagator<P>(&mut self) -> NewPropagator<'_, P> {
        NewPropagator {
            underlying: self.propagators.new_slot(),
            propagator: PhantomData,
        }
    }

    pub(crate) fn is_passive(&self, propagator_id: PropagatorId, assignments: &Assignments) -> bool {
        assignments
            .trailed_values()
            .read_bool(self.propagators[propagator_id].passive)
    }

    pub(crate) fn passive_flag(&self, propagator_id: PropagatorId) -> TrailedInteger {
        self.propagators[propagator_id].passive
    }

    pub(crate) fn num_variables(&self, propagator_id: PropagatorId) -> u32 {
        self.propagators[propagator_id].num_variables
    }

    /// Get a reference to the propagator identified by the given handle.
    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators
            .get(handle.id)?
            .propagator
            .downcast_ref()
    }

    /// Get an exclusive reference to the propagator identified by the given handle.
    pub(crate) fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.propagators
            .get_mut(handle.id)?
            .propagator
            .downcast_mut()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].propagator.as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        self.propagators[index].propagator.as_mut()
    }
}

pub(crate) struct NewPropagator<'a, P> {
    underlying: Slot<'a, PropagatorId, PropagatorEntry>,
    propagator: PhantomData<P>,
}

impl<P: Propagator> NewPropagator<'_, P> {
    /// The handle corresponding to this slot.
    pub(crate) fn key(&self) -> PropagatorHandle<P> {
        PropagatorHandle {
            id: self.underlying.key(),
            propagator: PhantomData,
        }
    }

    /// Put a propagator into the slot.
    pub(crate) fn populate(
        self,
        propagator: P,
        passive: TrailedInteger,
        num_variables: u32,
    ) -> PropagatorHandle<P> {
        PropagatorHandle {
            id: self.underlying.populate(PropagatorEntry {
                propagator: Box::new(propagator),
                passive,
                num_variables,
            }),
            propagator: PhantomData,
        }
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.propagators.iter().map(|entry| entry.propagator.name()))
            .finish()
    }
}
