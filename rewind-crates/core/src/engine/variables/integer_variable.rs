use std::fmt::Debug;

use enumset::EnumSet;

use crate::basic_types::EmptyDomain;
use crate::engine::Assignments;
use crate::engine::IntDomainEvent;
use crate::engine::Watchers;

/// An integer variable whose domain lives in [`Assignments`].
///
/// Every modification returns whether the domain changed, and fails with [`EmptyDomain`] without
/// touching the domain when it would remove the last value.
pub trait IntegerVariable: Clone + Debug {
    /// Get the lower bound of the variable.
    fn lower_bound(&self, assignments: &Assignments) -> i32;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, assignments: &Assignments) -> i32;

    /// Determine whether the value is in the domain of this variable.
    fn contains(&self, assignments: &Assignments, value: i32) -> bool;

    /// Iterate over the values of the domain in increasing order.
    fn iterate_domain<'a>(&self, assignments: &'a Assignments) -> impl Iterator<Item = i32> + 'a;

    /// Remove a value from the domain of this variable.
    fn remove(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain>;

    /// Tighten the lower bound of the domain of this variable.
    fn set_lower_bound(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain>;

    /// Tighten the upper bound of the domain of this variable.
    fn set_upper_bound(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain>;

    /// Register a watch for this variable on the given domain events.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<IntDomainEvent>);

    fn is_fixed(&self, assignments: &Assignments) -> bool {
        self.lower_bound(assignments) == self.upper_bound(assignments)
    }

    /// Fix the variable to `value`.
    fn assign(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain>;
}
