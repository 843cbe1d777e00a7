use enumset::EnumSet;

use crate::engine::variables::DomainId;
use crate::engine::Assignments;
use crate::engine::IntDomainEvent;
use crate::rewind_asserts::rewind_assert_simple;

/// A read cursor into the removal log of one domain, owned by a single observer.
///
/// A monitor is consumed in freeze/unfreeze passes:
/// ```text
/// monitor.freeze(assignments);
/// monitor.for_each_removed(assignments, filter, |value| ...);
/// monitor.unfreeze();
/// ```
/// [`DeltaMonitor::freeze`] captures the values removed since the previous pass; values removed
/// while the monitor is frozen only become visible in the next pass.
///
/// Removals made at an earlier search node are never reported. Instead of clearing every monitor
/// on every node transition, a monitor compares the clock it last saw with the clock of
/// [`Assignments`] when it is frozen, and skips what became stale.
#[derive(Debug, Clone, Copy)]
pub struct DeltaMonitor {
    domain: DomainId,
    /// Position in the removal log up to which values were consumed.
    first: usize,
    /// The visible window while frozen.
    window: Option<(usize, usize)>,
    /// The clock of the assignments when the monitor was last synchronised.
    timestamp: Option<u64>,
    /// The timestamp of the removal log when the monitor was last synchronised.
    delta_timestamp: Option<u64>,
}

impl DeltaMonitor {
    pub fn new(domain: DomainId) -> DeltaMonitor {
        DeltaMonitor {
            domain,
            first: 0,
            window: None,
            timestamp: None,
            delta_timestamp: None,
        }
    }

    pub fn domain(&self) -> DomainId {
        self.domain
    }

    pub fn is_frozen(&self) -> bool {
        self.window.is_some()
    }

    fn synchronise(&mut self, assignments: &Assignments) {
        let delta = assignments.delta(self.domain);
        let clock = assignments.timestamp();

        if self.timestamp != Some(clock) || self.delta_timestamp != delta.timestamp() {
            self.first = if delta.timestamp() == Some(clock) {
                0
            } else {
                delta.len()
            };
            self.timestamp = Some(clock);
            self.delta_timestamp = delta.timestamp();
        }
    }

    /// Capture the values removed since the last pass.
    pub fn freeze(&mut self, assignments: &Assignments) {
        rewind_assert_simple!(
            !self.is_frozen(),
            "Delta monitor of {} is frozen twice, a call to unfreeze is missing",
            self.domain
        );

        self.synchronise(assignments);
        self.window = Some((self.first, assignments.delta(self.domain).len()));
    }

    /// Mark the captured values as consumed.
    pub fn unfreeze(&mut self) {
        rewind_assert_simple!(
            self.is_frozen(),
            "Delta monitor of {} is unfrozen without being frozen",
            self.domain
        );

        if let Some((_, last)) = self.window.take() {
            self.first = last;
        }
    }

    /// Forget every removal made so far, without reporting it.
    pub fn clear(&mut self, assignments: &Assignments) {
        rewind_assert_simple!(
            !self.is_frozen(),
            "Delta monitor of {} is cleared while frozen",
            self.domain
        );

        self.synchronise(assignments);
        self.first = assignments.delta(self.domain).len();
    }

    /// Iterate the captured values whose removal was caused by one of `events`.
    pub fn removed_values<'a>(
        &self,
        assignments: &'a Assignments,
        events: EnumSet<IntDomainEvent>,
    ) -> impl Iterator<Item = i32> + 'a {
        rewind_assert_simple!(
            self.is_frozen(),
            "Delta monitor of {} is read without being frozen",
            self.domain
        );

        let (first, last) = self.window.unwrap_or((0, 0));
        assignments
            .delta(self.domain)
            .entries(first, last)
            .iter()
            .filter(move |entry| events.contains(entry.event))
            .map(|entry| entry.value)
    }

    /// Call `visitor` for every captured value whose removal was caused by one of `events`.
    pub fn for_each_removed(
        &self,
        assignments: &Assignments,
        events: EnumSet<IntDomainEvent>,
        visitor: impl FnMut(i32),
    ) {
        self.removed_values(assignments, events).for_each(visitor)
    }
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::*;
    use crate::engine::State;

    fn removed(monitor: &DeltaMonitor, state: &State) -> Vec<i32> {
        let mut values = vec![];
        monitor.for_each_removed(state.assignments(), EnumSet::all(), |value| {
            values.push(value)
        });
        values
    }

    #[test]
    fn removals_are_reported_once() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10);
        let mut monitor = DeltaMonitor::new(x);

        let _ = state.remove(x, 5).expect("non-empty domain");
        monitor.freeze(state.assignments());
        assert_eq!(removed(&monitor, &state), vec![5]);
        monitor.unfreeze();

        monitor.freeze(state.assignments());
        assert!(removed(&monitor, &state).is_empty());
        monitor.unfreeze();
    }

    #[test]
    fn removals_while_frozen_are_visible_in_the_next_pass() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10);
        let mut monitor = DeltaMonitor::new(x);

        let _ = state.remove(x, 3).expect("non-empty domain");
        monitor.freeze(state.assignments());
        let _ = state.remove(x, 4).expect("non-empty domain");
        assert_eq!(removed(&monitor, &state), vec![3]);
        monitor.unfreeze();

        monitor.freeze(state.assignments());
        assert_eq!(removed(&monitor, &state), vec![4]);
        monitor.unfreeze();
    }

    #[test]
    fn copied_monitors_read_independently() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10);
        let mut monitor = DeltaMonitor::new(x);

        let _ = state.remove(x, 2).expect("non-empty domain");
        let mut copy = monitor;

        monitor.freeze(state.assignments());
        assert_eq!(removed(&monitor, &state), vec![2]);
        monitor.unfreeze();

        copy.freeze(state.assignments());
        assert_eq!(removed(&copy, &state), vec![2]);
        copy.unfreeze();
    }

    #[test]
    fn filter_selects_the_cause_of_removal() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10);
        let mut monitor = DeltaMonitor::new(x);

        let _ = state.remove(x, 5).expect("non-empty domain");
        let _ = state.set_lower_bound(x, 2).expect("non-empty domain");

        monitor.freeze(state.assignments());
        let mut bound_removals = vec![];
        monitor.for_each_removed(
            state.assignments(),
            IntDomainEvent::LowerBound.into(),
            |value| bound_removals.push(value),
        );
        let explicit = monitor
            .removed_values(state.assignments(), IntDomainEvent::Removal.into())
            .collect::<Vec<_>>();
        monitor.unfreeze();

        assert_eq!(bound_removals, vec![0, 1]);
        assert_eq!(explicit, vec![5]);
    }

    #[test]
    fn removals_at_an_earlier_node_are_not_reported() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10);
        let mut monitor = DeltaMonitor::new(x);

        state.push_world();
        let _ = state.remove(x, 7).expect("non-empty domain");
        state.pop_world();

        monitor.freeze(state.assignments());
        assert!(removed(&monitor, &state).is_empty());
        monitor.unfreeze();
    }

    #[test]
    fn stale_monitor_starts_fresh_at_a_new_node() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10);
        let mut monitor = DeltaMonitor::new(x);

        let _ = state.remove(x, 1).expect("non-empty domain");
        monitor.freeze(state.assignments());
        assert_eq!(removed(&monitor, &state), vec![1]);
        monitor.unfreeze();

        let _ = state.remove(x, 2).expect("non-empty domain");
        state
            .propagate_to_fixed_point()
            .expect("no propagators to fail");
        state.push_world();
        let _ = state.remove(x, 3).expect("non-empty domain");

        monitor.freeze(state.assignments());
        assert_eq!(removed(&monitor, &state), vec![3]);
        monitor.unfreeze();
    }

    #[test]
    fn freezing_twice_at_the_same_node_is_idempotent() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10);
        let mut monitor = DeltaMonitor::new(x);

        monitor.freeze(state.assignments());
        monitor.unfreeze();
        monitor.freeze(state.assignments());
        assert!(removed(&monitor, &state).is_empty());
        monitor.unfreeze();

        let _ = state.remove(x, 6).expect("non-empty domain");
        monitor.freeze(state.assignments());
        assert_eq!(removed(&monitor, &state), vec![6]);
        monitor.unfreeze();
    }

    #[test]
    fn cleared_monitor_skips_earlier_removals() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10);
        let mut monitor = DeltaMonitor::new(x);

        let _ = state.remove(x, 1).expect("non-empty domain");
        monitor.clear(state.assignments());
        let _ = state.remove(x, 2).expect("non-empty domain");

        monitor.freeze(state.assignments());
        assert_eq!(removed(&monitor, &state), vec![2]);
        monitor.unfreeze();
    }

    #[test]
    #[should_panic]
    fn freezing_a_frozen_monitor_panics() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 1);
        let mut monitor = DeltaMonitor::new(x);

        monitor.freeze(state.assignments());
        monitor.freeze(state.assignments());
    }

    #[test]
    #[should_panic]
    fn reading_an_idle_monitor_panics() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 1);
        let monitor = DeltaMonitor::new(x);

        let _ = monitor.removed_values(state.assignments(), EnumSet::all()).count();
    }
}
