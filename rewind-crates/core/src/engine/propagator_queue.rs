use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use enumset::EnumSet;

use crate::containers::KeyedVec;
use crate::engine::IntDomainEvent;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;
use crate::rewind_asserts::rewind_assert_moderate;

/// Propagators waiting to run, grouped by priority and FIFO within one priority.
///
/// The events that caused a propagator to be enqueued are accumulated until it is popped, so a
/// propagator receives every event kind that happened to its variables since it last ran.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    /// For every enqueued propagator, the events it was woken up by.
    pending_events: KeyedVec<PropagatorId, Option<EnumSet<IntDomainEvent>>>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<u32>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        Self::new(4)
    }
}

impl PropagatorQueue {
    pub(crate) fn new(num_priority_levels: u32) -> PropagatorQueue {
        PropagatorQueue {
            queues: vec![VecDeque::new(); num_priority_levels as usize],
            pending_events: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    pub(crate) fn enqueue_propagator(
        &mut self,
        propagator_id: PropagatorId,
        priority: Priority,
        events: EnumSet<IntDomainEvent>,
    ) {
        rewind_assert_moderate!((priority as usize) < self.queues.len());

        self.pending_events.accomodate(propagator_id, None);
        match &mut self.pending_events[propagator_id] {
            Some(pending) => *pending |= events,
            slot => {
                *slot = Some(events);
                self.num_enqueued += 1;

                if self.queues[priority as usize].is_empty() {
                    self.present_priorities.push(Reverse(priority as u32));
                }
                self.queues[priority as usize].push_back(propagator_id);
            }
        }
    }

    /// Pop the propagator that should run next, together with the events it was woken by.
    pub(crate) fn pop(&mut self) -> Option<(PropagatorId, EnumSet<IntDomainEvent>)> {
        let top_priority = self.present_priorities.peek()?.0 as usize;
        rewind_assert_moderate!(!self.queues[top_priority].is_empty());

        let propagator_id = self.queues[top_priority].pop_front()?;
        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }
        self.num_enqueued -= 1;

        let events = self.pending_events[propagator_id]
            .take()
            .unwrap_or_default();
        Some((propagator_id, events))
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(priority)) = self.present_priorities.pop() {
            for propagator_id in self.queues[priority as usize].drain(..) {
                self.pending_events[propagator_id] = None;
            }
        }

        self.num_enqueued = 0;
    }

    #[cfg(test)]
    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.pending_events
            .get(propagator_id)
            .is_some_and(Option::is_some)
    }
}
