use crate::basic_types::EmptyDomain;
use crate::engine::Assignments;

/// A set variable, described by a lower bound (the kernel: the elements in every solution) and an
/// upper bound (the envelope: the elements in some solution).
pub trait SetVariable {
    /// Iterate the kernel in increasing order.
    fn lower_bound<'a>(&'a self, assignments: &'a Assignments) -> impl Iterator<Item = i32> + 'a;

    /// Iterate the envelope in increasing order.
    fn upper_bound<'a>(&'a self, assignments: &'a Assignments) -> impl Iterator<Item = i32> + 'a;

    fn lower_bound_contains(&self, assignments: &Assignments, element: i32) -> bool;

    fn upper_bound_contains(&self, assignments: &Assignments, element: i32) -> bool;

    /// Add `element` to the kernel. Returns whether anything changed.
    fn force_include(
        &mut self,
        assignments: &mut Assignments,
        element: i32,
    ) -> Result<bool, EmptyDomain>;

    /// Remove `element` from the envelope. Returns whether anything changed.
    fn force_exclude(
        &mut self,
        assignments: &mut Assignments,
        element: i32,
    ) -> Result<bool, EmptyDomain>;

    /// Make `elements` the value of the set: include all of them and exclude everything else.
    ///
    /// Stops at the first failure, without undoing the changes that were already made.
    fn instantiate_to(
        &mut self,
        assignments: &mut Assignments,
        elements: &[i32],
    ) -> Result<bool, EmptyDomain>;

    /// Whether the kernel and the envelope coincide.
    fn is_instantiated(&self, assignments: &Assignments) -> bool;

    /// The value of the set, if it is instantiated.
    fn value(&self, assignments: &Assignments) -> Option<Vec<i32>> {
        self.is_instantiated(assignments)
            .then(|| self.lower_bound(assignments).collect())
    }
}

/// A change to the bounds of a [`SetVariable`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum SetDomainEvent {
    AddedToKernel(i32),
    RemovedFromEnvelope(i32),
}
