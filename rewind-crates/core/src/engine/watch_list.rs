use enumset::EnumSet;

use super::observers::ObserverVarId;
use super::variables::DomainId;
use super::IntDomainEvent;
use crate::containers::KeyedVec;
use crate::propagation::PropagatorVarId;
use crate::rewind_asserts::rewind_assert_moderate;

/// Who is notified of events on a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Subscriber {
    Propagator(PropagatorVarId),
    Observer(ObserverVarId),
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Watcher {
    pub(crate) subscriber: Subscriber,
    pub(crate) events: EnumSet<IntDomainEvent>,
}

/// For every domain, the subscribers that watch it and the events they are interested in.
#[derive(Default, Debug, Clone)]
pub(crate) struct WatchList {
    watchers: KeyedVec<DomainId, Vec<Watcher>>,
}

impl WatchList {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(Vec::new());
    }

    pub(crate) fn watchers(&self, domain: DomainId) -> &[Watcher] {
        &self.watchers[domain]
    }

    fn watch(&mut self, domain: DomainId, subscriber: Subscriber, events: EnumSet<IntDomainEvent>) {
        let watchers = &mut self.watchers[domain];
        rewind_assert_moderate!(
            watchers.iter().all(|watcher| watcher.subscriber != subscriber),
            "{domain} is watched twice by the same subscriber"
        );

        watchers.push(Watcher { subscriber, events });
    }
}

/// The handle through which a variable registers the watches of one subscriber.
#[derive(Debug)]
pub struct Watchers<'a> {
    subscriber: Subscriber,
    watch_list: &'a mut WatchList,
}

impl<'a> Watchers<'a> {
    pub(crate) fn new(subscriber: Subscriber, watch_list: &'a mut WatchList) -> Self {
        Watchers {
            subscriber,
            watch_list,
        }
    }

    pub fn watch_all(&mut self, domain: DomainId, events: EnumSet<IntDomainEvent>) {
        self.watch_list.watch(domain, self.subscriber, events);
    }
}
