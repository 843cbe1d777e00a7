use enumset::EnumSet;

use super::delta::DomainDelta;
use super::event_sink::EventSink;
use super::trailed::TrailedBitSet;
use super::trailed::TrailedInteger;
use super::trailed::TrailedValues;
use super::variables::DomainId;
use super::IntDomainEvent;
use super::TrailOptions;
use crate::basic_types::EmptyDomain;
use crate::containers::KeyedVec;
use crate::rewind_asserts::rewind_assert_moderate;
use crate::rewind_asserts::rewind_assert_simple;

/// The domains of all integer variables, together with the reversible cells they are stored in.
///
/// A domain is a set of values, stored as a [`TrailedBitSet`] over its initial range plus trailed
/// bounds. Every value that leaves a domain is appended to the removal log of that domain, and
/// the kind of change is reported to the event sink.
///
/// The assignments also hold the clock used for lazy clearing of removal logs: it increases on
/// every world push and pop, so every search node sees a different clock value.
#[derive(Debug, Clone)]
pub struct Assignments {
    trailed_values: TrailedValues,
    domains: KeyedVec<DomainId, IntegerDomain>,
    deltas: KeyedVec<DomainId, DomainDelta>,
    events: EventSink,
    timestamp: u64,
}

#[derive(Debug, Clone)]
struct IntegerDomain {
    initial_lower_bound: i32,
    initial_upper_bound: i32,
    lower_bound: TrailedInteger,
    upper_bound: TrailedInteger,
    values: TrailedBitSet,
}

impl Default for Assignments {
    fn default() -> Self {
        Assignments::new(TrailOptions::default())
    }
}

impl Assignments {
    pub(crate) fn new(options: TrailOptions) -> Self {
        Assignments {
            trailed_values: TrailedValues::new(options),
            domains: KeyedVec::default(),
            deltas: KeyedVec::default(),
            events: EventSink::default(),
            timestamp: 0,
        }
    }

    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        rewind_assert_simple!(
            lower_bound <= upper_bound,
            "Cannot create the empty domain [{lower_bound}, {upper_bound}]"
        );

        let values = TrailedBitSet::new(&mut self.trailed_values, lower_bound, upper_bound, true);
        let domain = IntegerDomain {
            initial_lower_bound: lower_bound,
            initial_upper_bound: upper_bound,
            lower_bound: self.trailed_values.grow(i64::from(lower_bound)),
            upper_bound: self.trailed_values.grow(i64::from(upper_bound)),
            values,
        };

        let _ = self.deltas.push(DomainDelta::default());
        self.events.grow();
        self.domains.push(domain)
    }

    /// Create a domain containing exactly `values`, which may contain duplicates.
    pub(crate) fn grow_sparse(&mut self, values: &[i32]) -> DomainId {
        let lower_bound = values.iter().copied().min();
        let upper_bound = values.iter().copied().max();
        let (Some(lower_bound), Some(upper_bound)) = (lower_bound, upper_bound) else {
            panic!("Cannot create a variable with an empty domain");
        };

        let domain_id = self.grow(lower_bound, upper_bound);
        let set = &self.domains[domain_id].values;
        for value in lower_bound..=upper_bound {
            if !values.contains(&value) {
                let _ = set.remove(&mut self.trailed_values, value);
            }
        }

        domain_id
    }

    pub fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub fn domains(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.domains.keys()
    }

    pub fn trailed_values(&self) -> &TrailedValues {
        &self.trailed_values
    }

    /// Mutable access to the reversible cells, for observers and propagators which keep
    /// reversible state of their own.
    pub fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        &mut self.trailed_values
    }

    /// The clock value of the current search node.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn current_world(&self) -> usize {
        self.trailed_values.current_world()
    }

    pub(crate) fn delta(&self, domain_id: DomainId) -> &DomainDelta {
        &self.deltas[domain_id]
    }

    pub(crate) fn drain_domain_events(
        &mut self,
    ) -> impl Iterator<Item = (DomainId, EnumSet<IntDomainEvent>)> + '_ {
        self.events.drain()
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub(crate) fn push_world(&mut self) {
        self.trailed_values.push_world();
        self.timestamp += 1;
    }

    pub(crate) fn pop_world(&mut self) {
        self.trailed_values.pop_world();
        self.timestamp += 1;
        self.events.clear();
    }
}

// methods for getting info about the domains
impl Assignments {
    pub fn lower_bound(&self, domain_id: DomainId) -> i32 {
        self.trailed_values.read(self.domains[domain_id].lower_bound) as i32
    }

    pub fn upper_bound(&self, domain_id: DomainId) -> i32 {
        self.trailed_values.read(self.domains[domain_id].upper_bound) as i32
    }

    pub fn initial_lower_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].initial_lower_bound
    }

    pub fn initial_upper_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].initial_upper_bound
    }

    pub fn contains(&self, domain_id: DomainId, value: i32) -> bool {
        self.domains[domain_id]
            .values
            .contains(&self.trailed_values, value)
    }

    pub fn is_fixed(&self, domain_id: DomainId) -> bool {
        self.lower_bound(domain_id) == self.upper_bound(domain_id)
    }

    pub fn fixed_value(&self, domain_id: DomainId) -> Option<i32> {
        self.is_fixed(domain_id)
            .then(|| self.lower_bound(domain_id))
    }

    pub fn domain_size(&self, domain_id: DomainId) -> usize {
        self.domains[domain_id].values.len(&self.trailed_values)
    }

    pub fn iterate_domain(&self, domain_id: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.domains[domain_id].values.iter(&self.trailed_values)
    }

    /// The smallest value in the domain in `[from, upper_bound]`.
    fn next_value(&self, domain_id: DomainId, from: i32) -> i32 {
        let upper_bound = self.upper_bound(domain_id);
        (from..=upper_bound)
            .find(|&value| self.contains(domain_id, value))
            .unwrap_or(upper_bound)
    }

    /// The largest value in the domain in `[lower_bound, from]`.
    fn previous_value(&self, domain_id: DomainId, from: i32) -> i32 {
        let lower_bound = self.lower_bound(domain_id);
        (lower_bound..=from)
            .rev()
            .find(|&value| self.contains(domain_id, value))
            .unwrap_or(lower_bound)
    }

    fn debug_bounds_are_in_domain(&self, domain_id: DomainId) -> bool {
        self.contains(domain_id, self.lower_bound(domain_id))
            && self.contains(domain_id, self.upper_bound(domain_id))
            && self.lower_bound(domain_id) <= self.upper_bound(domain_id)
    }
}

// methods to change the domains
impl Assignments {
    fn erase(&mut self, domain_id: DomainId, value: i32, event: IntDomainEvent) {
        let domain = &self.domains[domain_id];
        if domain.values.remove(&mut self.trailed_values, value) {
            self.deltas[domain_id].record(value, event, self.timestamp);
        }
    }

    fn set_lower_bound_cell(&mut self, domain_id: DomainId, value: i32) {
        let cell = self.domains[domain_id].lower_bound;
        self.trailed_values.assign(cell, i64::from(value));
        self.events
            .event_occurred(IntDomainEvent::LowerBound, domain_id);
    }

    fn set_upper_bound_cell(&mut self, domain_id: DomainId, value: i32) {
        let cell = self.domains[domain_id].upper_bound;
        self.trailed_values.assign(cell, i64::from(value));
        self.events
            .event_occurred(IntDomainEvent::UpperBound, domain_id);
    }

    fn raise_assign_if_fixed(&mut self, domain_id: DomainId) {
        if self.is_fixed(domain_id) {
            self.events.event_occurred(IntDomainEvent::Assign, domain_id);
        }
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain_id: DomainId,
        new_lower_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let lower_bound = self.lower_bound(domain_id);
        let upper_bound = self.upper_bound(domain_id);

        if new_lower_bound <= lower_bound {
            return Ok(false);
        }
        if new_lower_bound > upper_bound {
            return Err(EmptyDomain { domain: domain_id });
        }

        for value in lower_bound..new_lower_bound {
            self.erase(domain_id, value, IntDomainEvent::LowerBound);
        }
        let actual_lower_bound = self.next_value(domain_id, new_lower_bound);
        self.set_lower_bound_cell(domain_id, actual_lower_bound);
        self.raise_assign_if_fixed(domain_id);

        rewind_assert_moderate!(self.debug_bounds_are_in_domain(domain_id));
        Ok(true)
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain_id: DomainId,
        new_upper_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let lower_bound = self.lower_bound(domain_id);
        let upper_bound = self.upper_bound(domain_id);

        if new_upper_bound >= upper_bound {
            return Ok(false);
        }
        if new_upper_bound < lower_bound {
            return Err(EmptyDomain { domain: domain_id });
        }

        for value in (new_upper_bound + 1)..=upper_bound {
            self.erase(domain_id, value, IntDomainEvent::UpperBound);
        }
        let actual_upper_bound = self.previous_value(domain_id, new_upper_bound);
        self.set_upper_bound_cell(domain_id, actual_upper_bound);
        self.raise_assign_if_fixed(domain_id);

        rewind_assert_moderate!(self.debug_bounds_are_in_domain(domain_id));
        Ok(true)
    }

    pub(crate) fn remove_value(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if !self.contains(domain_id, value) {
            return Ok(false);
        }
        if self.is_fixed(domain_id) {
            return Err(EmptyDomain { domain: domain_id });
        }

        self.erase(domain_id, value, IntDomainEvent::Removal);
        self.events.event_occurred(IntDomainEvent::Removal, domain_id);

        if value == self.lower_bound(domain_id) {
            let new_lower_bound = self.next_value(domain_id, value + 1);
            self.set_lower_bound_cell(domain_id, new_lower_bound);
        } else if value == self.upper_bound(domain_id) {
            let new_upper_bound = self.previous_value(domain_id, value - 1);
            self.set_upper_bound_cell(domain_id, new_upper_bound);
        }
        self.raise_assign_if_fixed(domain_id);

        rewind_assert_moderate!(self.debug_bounds_are_in_domain(domain_id));
        Ok(true)
    }

    pub(crate) fn make_assignment(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if !self.contains(domain_id, value) {
            return Err(EmptyDomain { domain: domain_id });
        }
        if self.is_fixed(domain_id) {
            return Ok(false);
        }

        let _ = self.tighten_lower_bound(domain_id, value)?;
        let _ = self.tighten_upper_bound(domain_id, value)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;

    #[test]
    fn lower_bound_change_lower_bound_event() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(1, 5);

        assert!(assignment.tighten_lower_bound(d1, 2).expect("non-empty domain"));

        let events = assignment.drain_domain_events().collect::<Vec<_>>();
        assert_eq!(events, vec![(d1, enum_set!(IntDomainEvent::LowerBound))]);
    }

    #[test]
    fn upper_bound_change_triggers_upper_bound_event() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(1, 5);

        assert!(assignment.tighten_upper_bound(d1, 2).expect("non-empty domain"));

        let events = assignment.drain_domain_events().collect::<Vec<_>>();
        assert_eq!(events, vec![(d1, enum_set!(IntDomainEvent::UpperBound))]);
    }

    #[test]
    fn bounds_change_can_also_trigger_assign_event() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(1, 5);
        let d2 = assignment.grow(1, 5);

        let _ = assignment.tighten_lower_bound(d1, 5).expect("non-empty domain");
        let _ = assignment.tighten_upper_bound(d2, 1).expect("non-empty domain");

        let events = assignment.drain_domain_events().collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![
                (
                    d1,
                    enum_set!(IntDomainEvent::LowerBound | IntDomainEvent::Assign)
                ),
                (
                    d2,
                    enum_set!(IntDomainEvent::UpperBound | IntDomainEvent::Assign)
                ),
            ]
        );
    }

    #[test]
    fn removal_triggers_removal_event() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(1, 5);

        assert!(assignment.remove_value(d1, 2).expect("non-empty domain"));

        let events = assignment.drain_domain_events().collect::<Vec<_>>();
        assert_eq!(events, vec![(d1, enum_set!(IntDomainEvent::Removal))]);
    }

    #[test]
    fn removing_the_lower_bound_skips_holes() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(1, 5);

        let _ = assignment.remove_value(d1, 2).expect("non-empty domain");
        let _ = assignment.remove_value(d1, 3).expect("non-empty domain");
        let _ = assignment.remove_value(d1, 1).expect("non-empty domain");

        assert_eq!(assignment.lower_bound(d1), 4);
        assert_eq!(assignment.iterate_domain(d1).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn tightening_into_a_hole_moves_to_the_next_value() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(0, 10);

        let _ = assignment.remove_value(d1, 8).expect("non-empty domain");
        let _ = assignment.remove_value(d1, 9).expect("non-empty domain");
        let _ = assignment.tighten_upper_bound(d1, 9).expect("non-empty domain");

        assert_eq!(assignment.upper_bound(d1), 7);
    }

    #[test]
    fn removing_the_last_value_fails_without_change() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(3, 3);

        let result = assignment.remove_value(d1, 3);

        assert_eq!(result, Err(EmptyDomain { domain: d1 }));
        assert!(assignment.contains(d1, 3));
    }

    #[test]
    fn crossing_bounds_fails_without_change() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(0, 4);

        assert!(assignment.tighten_lower_bound(d1, 5).is_err());
        assert!(assignment.tighten_upper_bound(d1, -1).is_err());
        assert!(assignment.make_assignment(d1, 9).is_err());

        assert_eq!(assignment.domain_size(d1), 5);
    }

    #[test]
    fn every_removed_value_is_logged_once_with_its_cause() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(0, 6);

        let _ = assignment.remove_value(d1, 2).expect("non-empty domain");
        let _ = assignment.tighten_lower_bound(d1, 3).expect("non-empty domain");
        let _ = assignment.tighten_upper_bound(d1, 4).expect("non-empty domain");

        let delta = assignment.delta(d1);
        let logged = delta
            .entries(0, delta.len())
            .iter()
            .map(|entry| (entry.value, entry.event))
            .collect::<Vec<_>>();
        assert_eq!(
            logged,
            vec![
                (2, IntDomainEvent::Removal),
                (0, IntDomainEvent::LowerBound),
                (1, IntDomainEvent::LowerBound),
                (5, IntDomainEvent::UpperBound),
                (6, IntDomainEvent::UpperBound),
            ]
        );
    }

    #[test]
    fn domains_are_restored_when_a_world_is_popped() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow(0, 9);

        assignment.push_world();
        let _ = assignment.remove_value(d1, 4).expect("non-empty domain");
        let _ = assignment.make_assignment(d1, 7).expect("non-empty domain");
        assert_eq!(assignment.fixed_value(d1), Some(7));

        assignment.pop_world();
        assert_eq!(assignment.lower_bound(d1), 0);
        assert_eq!(assignment.upper_bound(d1), 9);
        assert_eq!(assignment.domain_size(d1), 10);
        assert_eq!(assignment.drain_domain_events().count(), 0);
    }

    #[test]
    fn sparse_domains_only_contain_the_given_values() {
        let mut assignment = Assignments::default();
        let d1 = assignment.grow_sparse(&[7, 1, 4, 4]);

        assert_eq!(assignment.iterate_domain(d1).collect::<Vec<_>>(), vec![1, 4, 7]);
        assert_eq!(assignment.lower_bound(d1), 1);
        assert_eq!(assignment.upper_bound(d1), 7);
    }
}
