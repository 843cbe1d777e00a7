use enumset::EnumSet;

use super::variables::DomainId;
use super::IntDomainEvent;
use crate::containers::KeyedVec;

/// While domains are modified, the kinds of modification are captured in the event sink. The
/// dispatcher drains it to notify the observers and propagators that subscribe to those events.
///
/// Events are accumulated per domain, so a domain that is changed several times between two
/// drains is reported once with the union of its events.
#[derive(Default, Debug, Clone)]
pub(crate) struct EventSink {
    present: KeyedVec<DomainId, EnumSet<IntDomainEvent>>,
    modified: Vec<DomainId>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
    }

    pub(crate) fn event_occurred(&mut self, event: IntDomainEvent, domain: DomainId) {
        let elem = &mut self.present[domain];

        if elem.is_empty() {
            self.modified.push(domain);
        }

        let _ = elem.insert(event);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.modified.is_empty()
    }

    /// Drain the modified domains in the order in which they were first modified.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (DomainId, EnumSet<IntDomainEvent>)> + '_ {
        let present = &mut self.present;
        self.modified
            .drain(..)
            .map(move |domain| (domain, std::mem::take(&mut present[domain])))
    }

    pub(crate) fn clear(&mut self) {
        for domain in self.modified.drain(..) {
            self.present[domain].clear();
        }
    }
}
