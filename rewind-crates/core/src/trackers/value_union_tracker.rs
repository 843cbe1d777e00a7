use enumset::EnumSet;

use crate::engine::delta::DeltaMonitor;
use crate::engine::observers::ObserverConstructor;
use crate::engine::observers::ObserverConstructorContext;
use crate::engine::observers::VariableObserver;
use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::Assignments;
use crate::engine::IntDomainEvent;
use crate::propagation::HasAssignments;
use crate::propagation::LocalId;
use crate::rewind_asserts::rewind_assert_simple;

/// The arguments of a [`ValueUnionTracker`].
#[derive(Clone, Debug)]
pub struct ValueUnionTrackerArgs {
    pub variables: Box<[DomainId]>,
}

impl ObserverConstructor for ValueUnionTrackerArgs {
    type ObserverImpl = ValueUnionTracker;

    fn create(self, context: &mut ObserverConstructorContext<'_>) -> Self::ObserverImpl {
        rewind_assert_simple!(
            context.assignments().current_world() == 0,
            "A value union tracker can only be created in the root world"
        );

        let monitors = self
            .variables
            .iter()
            .enumerate()
            .map(|(index, &variable)| context.register(variable, LocalId::from(index as u32)))
            .collect();

        let assignments = context.assignments_mut();
        let min_value = self
            .variables
            .iter()
            .map(|&variable| assignments.initial_lower_bound(variable))
            .min()
            .unwrap_or(0);
        let max_value = self
            .variables
            .iter()
            .map(|&variable| assignments.initial_upper_bound(variable))
            .max()
            .unwrap_or(-1);

        let num_values = (i64::from(max_value) - i64::from(min_value) + 1).max(0) as usize;
        let mut initial_counts = vec![0_i64; num_values];
        for &variable in self.variables.iter() {
            for value in variable.iterate_domain(assignments) {
                initial_counts[(value - min_value) as usize] += 1;
            }
        }
        let union_size = initial_counts.iter().filter(|&&count| count > 0).count();
        let num_unfixed = self
            .variables
            .iter()
            .filter(|variable| !variable.is_fixed(assignments))
            .count();
        let counted_fixed = self
            .variables
            .iter()
            .map(|variable| variable.is_fixed(assignments))
            .collect::<Vec<_>>();

        let trailed_values = assignments.trailed_values_mut();
        let num_variables = self.variables.len();
        ValueUnionTracker {
            variables: self.variables,
            monitors,
            counts: UnionCounts {
                min_value,
                occurrences: initial_counts
                    .into_iter()
                    .map(|count| trailed_values.grow(count))
                    .collect(),
                union_size: trailed_values.grow(union_size as i64),
                num_unfixed: trailed_values.grow(num_unfixed as i64),
                num_variables,
            },
            counted_fixed: counted_fixed
                .into_iter()
                .map(|fixed| trailed_values.grow(i64::from(fixed)))
                .collect(),
            removed_buffer: Vec::new(),
        }
    }
}

/// Counts, for every value, how many of a group of variables can still take it.
///
/// The counts are kept up to date from the values each variable loses, so reading them never
/// scans the domains. A value stays counted for a variable that is fixed to it; it is only
/// retired when it is actually removed from a domain.
#[derive(Debug)]
pub struct ValueUnionTracker {
    variables: Box<[DomainId]>,
    monitors: Box<[DeltaMonitor]>,
    counts: UnionCounts,
    /// Whether the fixing of each variable has been accounted for in `num_unfixed`.
    counted_fixed: Box<[TrailedInteger]>,
    removed_buffer: Vec<i32>,
}

impl ValueUnionTracker {
    pub fn variables(&self) -> &[DomainId] {
        &self.variables
    }

    /// A read-only handle on the counts. It stays valid for as long as the tracker exists, so a
    /// propagator can keep it and consult it in [`Propagator::notify`].
    ///
    /// [`Propagator::notify`]: crate::propagation::Propagator::notify
    pub fn counts(&self) -> UnionCounts {
        self.counts.clone()
    }

    /// The number of tracked variables whose domain contains `value`.
    pub fn occurrences(&self, assignments: &Assignments, value: i32) -> usize {
        self.counts.occurrences(assignments, value)
    }

    /// The number of values that some tracked variable can still take.
    pub fn union_size(&self, assignments: &Assignments) -> usize {
        self.counts.union_size(assignments)
    }

    pub fn num_unfixed(&self, assignments: &Assignments) -> usize {
        self.counts.num_unfixed(assignments)
    }

    pub fn is_pigeonhole_violated(&self, assignments: &Assignments) -> bool {
        self.counts.is_pigeonhole_violated(assignments)
    }

    pub fn value_slack(&self, assignments: &Assignments) -> i64 {
        self.counts.value_slack(assignments)
    }
}

/// The reversible counts of a [`ValueUnionTracker`], together with the decisions derived from
/// them about waking an all-different propagator.
///
/// Only the tracker writes the counts. Observers are notified before propagators, so the counts
/// already include the changes a propagator is being notified about.
#[derive(Clone, Debug)]
pub struct UnionCounts {
    /// The smallest initial value; `occurrences[0]` belongs to it.
    min_value: i32,
    occurrences: Box<[TrailedInteger]>,
    /// The number of values with a non-zero count.
    union_size: TrailedInteger,
    num_unfixed: TrailedInteger,
    num_variables: usize,
}

impl UnionCounts {
    fn cell(&self, value: i32) -> Option<TrailedInteger> {
        let position = i64::from(value) - i64::from(self.min_value);
        usize::try_from(position)
            .ok()
            .and_then(|position| self.occurrences.get(position).copied())
    }

    /// The number of tracked variables whose domain contains `value`.
    pub fn occurrences(&self, assignments: &Assignments, value: i32) -> usize {
        self.cell(value)
            .map_or(0, |cell| assignments.trailed_values().read(cell) as usize)
    }

    /// The number of values that some tracked variable can still take.
    pub fn union_size(&self, assignments: &Assignments) -> usize {
        assignments.trailed_values().read(self.union_size) as usize
    }

    pub fn num_unfixed(&self, assignments: &Assignments) -> usize {
        assignments.trailed_values().read(self.num_unfixed) as usize
    }

    /// Whether there are fewer values left than variables, in which case the variables cannot
    /// all take different values.
    pub fn is_pigeonhole_violated(&self, assignments: &Assignments) -> bool {
        self.union_size(assignments) < self.num_variables
    }

    /// The number of values left minus the number of unfixed variables.
    pub fn value_slack(&self, assignments: &Assignments) -> i64 {
        self.union_size(assignments) as i64 - self.num_unfixed(assignments) as i64
    }

    /// Whether fixing a variable to `value` forces an all-different constraint to remove it from
    /// another tracked variable.
    pub fn fixing_forces_removals(&self, assignments: &Assignments, value: i32) -> bool {
        self.occurrences(assignments, value) > 1
    }

    /// An estimate of how likely an all-different constraint over the tracked variables can
    /// filter something.
    ///
    /// The fixed variables are assumed to hold distinct values of the union, and the `n` unfixed
    /// variables to pick uniformly among the `m` values left. The estimate is the probability that
    /// two of them pick the same value, `1 - m! / ((m - n)! * m^n)`, and `1` when `m < n`.
    pub fn filtering_probability(&self, assignments: &Assignments) -> f64 {
        let num_unfixed = self.num_unfixed(assignments);
        let num_fixed = self.num_variables - num_unfixed;
        let free_values = self.union_size(assignments).saturating_sub(num_fixed);

        if free_values < num_unfixed {
            return 1.0;
        }

        let free_values = free_values as f64;
        let all_distinct = (0..num_unfixed)
            .map(|taken| (free_values - taken as f64) / free_values)
            .product::<f64>();
        1.0 - all_distinct
    }

    /// Whether an all-different propagator should be woken up for a change to one of the tracked
    /// variables. `fixed_to` is the value the variable was fixed to, if the change fixed it.
    ///
    /// A fixing which forces removals always wakes the propagator. Otherwise it is woken when
    /// [`UnionCounts::filtering_probability`] reaches `threshold`.
    pub fn should_wake(
        &self,
        assignments: &Assignments,
        fixed_to: Option<i32>,
        threshold: f64,
    ) -> bool {
        fixed_to.is_some_and(|value| self.fixing_forces_removals(assignments, value))
            || self.filtering_probability(assignments) >= threshold
    }
}

impl VariableObserver for ValueUnionTracker {
    fn name(&self) -> &str {
        "ValueUnionTracker"
    }

    fn notify(
        &mut self,
        assignments: &mut Assignments,
        local_id: LocalId,
        _events: EnumSet<IntDomainEvent>,
    ) {
        let index = local_id.unpack() as usize;

        let monitor = &mut self.monitors[index];
        monitor.freeze(assignments);
        self.removed_buffer.clear();
        self.removed_buffer
            .extend(monitor.removed_values(assignments, EnumSet::all()));
        monitor.unfreeze();

        let trailed_values = assignments.trailed_values_mut();
        for &value in self.removed_buffer.iter() {
            let Some(count) = self.counts.cell(value) else {
                continue;
            };
            trailed_values.add_assign(count, -1);
            if trailed_values.read(count) == 0 {
                trailed_values.add_assign(self.counts.union_size, -1);
            }
        }

        let counted_fixed = self.counted_fixed[index];
        let newly_fixed = !assignments.trailed_values().read_bool(counted_fixed)
            && self.variables[index].is_fixed(assignments);
        if newly_fixed {
            let trailed_values = assignments.trailed_values_mut();
            trailed_values.assign_bool(counted_fixed, true);
            trailed_values.add_assign(self.counts.num_unfixed, -1);
        }
    }
}
