use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::ObserverId;
use super::VariableObserver;
use crate::containers::KeyedVec;

/// A central store for observers.
#[derive(Default)]
pub(crate) struct ObserverStore {
    observers: KeyedVec<ObserverId, Box<dyn VariableObserver>>,
}

/// A typed wrapper around an [`ObserverId`] that allows retrieving the concrete observer from a
/// [`State`](crate::State).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ObserverHandle<O> {
    id: ObserverId,
    observer: PhantomData<O>,
}

impl<O> ObserverHandle<O> {
    pub fn untyped(self) -> ObserverId {
        self.id
    }
}

impl<O> Clone for ObserverHandle<O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Copy for ObserverHandle<O> {}

impl ObserverStore {
    /// The id the next observer will receive.
    pub(crate) fn next_id(&self) -> ObserverId {
        self.observers.new_slot_key()
    }

    pub(crate) fn push<O: VariableObserver>(&mut self, observer: O) -> ObserverHandle<O> {
        ObserverHandle {
            id: self.observers.push(Box::new(observer)),
            observer: PhantomData,
        }
    }

    pub(crate) fn get_observer<O: VariableObserver>(&self, handle: ObserverHandle<O>) -> Option<&O> {
        self.observers.get(handle.id)?.downcast_ref()
    }

    pub(crate) fn get_observer_mut<O: VariableObserver>(
        &mut self,
        handle: ObserverHandle<O>,
    ) -> Option<&mut O> {
        self.observers.get_mut(handle.id)?.downcast_mut()
    }
}

impl Index<ObserverId> for ObserverStore {
    type Output = dyn VariableObserver;

    fn index(&self, index: ObserverId) -> &Self::Output {
        self.observers[index].as_ref()
    }
}

impl IndexMut<ObserverId> for ObserverStore {
    fn index_mut(&mut self, index: ObserverId) -> &mut Self::Output {
        self.observers[index].as_mut()
    }
}

impl Debug for ObserverStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|observer| observer.name()))
            .finish()
    }
}
