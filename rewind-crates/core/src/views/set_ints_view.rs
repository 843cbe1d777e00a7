use enumset::EnumSet;
use log::trace;

use super::SetDomainEvent;
use super::SetVariable;
use crate::basic_types::EmptyDomain;
use crate::containers::HashSet;
use crate::engine::delta::DeltaMonitor;
use crate::engine::observers::ObserverConstructor;
use crate::engine::observers::ObserverConstructorContext;
use crate::engine::observers::VariableObserver;
use crate::engine::trailed::TrailedBitSet;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::Assignments;
use crate::engine::IntDomainEvent;
use crate::propagation::HasAssignments;
use crate::propagation::LocalId;
use crate::rewind_asserts::rewind_assert_extreme;
use crate::rewind_asserts::rewind_assert_simple;

/// The arguments of a [`SetIntsView`].
#[derive(Clone, Debug)]
pub struct SetIntsViewArgs {
    pub variables: Box<[DomainId]>,
    /// The value `t[i]` which puts the element `i + offset` in the set.
    pub values: Box<[i32]>,
    pub offset: i32,
}

impl ObserverConstructor for SetIntsViewArgs {
    type ObserverImpl = SetIntsView;

    fn create(self, context: &mut ObserverConstructorContext<'_>) -> Self::ObserverImpl {
        rewind_assert_simple!(
            self.variables.len() == self.values.len(),
            "Expected one value per variable of the set view"
        );
        rewind_assert_simple!(
            !self.variables.is_empty(),
            "A set view needs at least one variable"
        );
        rewind_assert_simple!(
            context.assignments().current_world() == 0,
            "A set view can only be created in the root world"
        );

        let monitors = self
            .variables
            .iter()
            .enumerate()
            .map(|(index, &variable)| context.register(variable, LocalId::from(index as u32)))
            .collect();

        let max = i64::from(self.offset) + self.variables.len() as i64 - 1;
        rewind_assert_simple!(
            max <= i64::from(i32::MAX),
            "The elements of a set view starting at {} do not fit in an i32",
            self.offset
        );
        let min = self.offset;
        let max = max as i32;
        let trailed_values = context.assignments_mut().trailed_values_mut();
        let kernel = TrailedBitSet::new(trailed_values, min, max, false);
        let envelope = TrailedBitSet::new(trailed_values, min, max, false);

        let view = SetIntsView {
            variables: self.variables,
            values: self.values,
            offset: self.offset,
            monitors,
            kernel,
            envelope,
            events: Vec::new(),
        };

        let assignments = context.assignments_mut();
        for (index, (&variable, &value)) in view.variables.iter().zip(view.values.iter()).enumerate()
        {
            let element = view.element(index);
            if variable.is_fixed(assignments) && variable.lower_bound(assignments) == value {
                let _ = view.kernel.insert(assignments.trailed_values_mut(), element);
            }
            if variable.contains(assignments, value) {
                let _ = view.envelope.insert(assignments.trailed_values_mut(), element);
            }
        }

        view
    }
}

/// A set variable over integer variables `v[i]` and values `t[i]`: the element `i + offset` is in
/// the set exactly when `v[i] = t[i]`.
///
/// The kernel holds the elements whose variable is fixed to its value, and the envelope those
/// whose variable can still take its value.
#[derive(Debug)]
pub struct SetIntsView {
    variables: Box<[DomainId]>,
    values: Box<[i32]>,
    offset: i32,
    monitors: Box<[DeltaMonitor]>,
    kernel: TrailedBitSet,
    envelope: TrailedBitSet,
    /// Changes which were not yet drained.
    events: Vec<SetDomainEvent>,
}

impl SetIntsView {
    fn element(&self, index: usize) -> i32 {
        index as i32 + self.offset
    }

    fn index(&self, element: i32) -> Option<usize> {
        let index = i64::from(element) - i64::from(self.offset);
        (0..self.variables.len() as i64)
            .contains(&index)
            .then_some(index as usize)
    }

    /// Take the changes to the bounds of the set since the last call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SetDomainEvent> + '_ {
        self.events.drain(..)
    }

    pub fn variables(&self) -> &[DomainId] {
        &self.variables
    }

    fn add_to_kernel(&mut self, assignments: &mut Assignments, element: i32) {
        if self.kernel.insert(assignments.trailed_values_mut(), element) {
            trace!("{element} added to the kernel");
            self.events.push(SetDomainEvent::AddedToKernel(element));
        }
    }

    fn remove_from_envelope(&mut self, assignments: &mut Assignments, element: i32) {
        if self.envelope.remove(assignments.trailed_values_mut(), element) {
            trace!("{element} removed from the envelope");
            self.events.push(SetDomainEvent::RemovedFromEnvelope(element));
        }
    }

    /// Whether the caches of `index` agree with the domain of its variable.
    fn debug_caches_agree(&self, assignments: &Assignments, index: usize) -> bool {
        let variable = self.variables[index];
        let value = self.values[index];
        let element = self.element(index);
        let trailed_values = assignments.trailed_values();

        let in_kernel = variable.is_fixed(assignments) && variable.lower_bound(assignments) == value;
        let in_envelope = variable.contains(assignments, value);

        self.kernel.contains(trailed_values, element) == in_kernel
            && self.envelope.contains(trailed_values, element) == in_envelope
    }
}

impl SetVariable for SetIntsView {
    fn lower_bound<'a>(&'a self, assignments: &'a Assignments) -> impl Iterator<Item = i32> + 'a {
        self.kernel.iter(assignments.trailed_values())
    }

    fn upper_bound<'a>(&'a self, assignments: &'a Assignments) -> impl Iterator<Item = i32> + 'a {
        self.envelope.iter(assignments.trailed_values())
    }

    fn lower_bound_contains(&self, assignments: &Assignments, element: i32) -> bool {
        self.kernel.contains(assignments.trailed_values(), element)
    }

    fn upper_bound_contains(&self, assignments: &Assignments, element: i32) -> bool {
        self.envelope.contains(assignments.trailed_values(), element)
    }

    fn force_include(
        &mut self,
        assignments: &mut Assignments,
        element: i32,
    ) -> Result<bool, EmptyDomain> {
        let index = self.index(element);
        rewind_assert_simple!(
            index.is_some(),
            "{element} cannot be included, it is outside the set view"
        );
        let Some(index) = index else {
            return Ok(false);
        };

        let changed = self.variables[index].assign(assignments, self.values[index])?;
        if changed {
            self.add_to_kernel(assignments, element);
        }
        Ok(changed)
    }

    fn force_exclude(
        &mut self,
        assignments: &mut Assignments,
        element: i32,
    ) -> Result<bool, EmptyDomain> {
        let Some(index) = self.index(element) else {
            return Ok(false);
        };

        let changed = self.variables[index].remove(assignments, self.values[index])?;
        if changed {
            self.remove_from_envelope(assignments, element);
        }
        Ok(changed)
    }

    fn instantiate_to(
        &mut self,
        assignments: &mut Assignments,
        elements: &[i32],
    ) -> Result<bool, EmptyDomain> {
        rewind_assert_simple!(
            elements.iter().all(|&element| self.index(element).is_some()),
            "Cannot instantiate the set view to elements outside of it"
        );

        let elements = elements.iter().copied().collect::<HashSet<_>>();
        let mut changed = false;
        for index in 0..self.variables.len() {
            let element = self.element(index);
            changed |= if elements.contains(&element) {
                self.force_include(assignments, element)?
            } else {
                self.force_exclude(assignments, element)?
            };
        }

        Ok(changed)
    }

    fn is_instantiated(&self, assignments: &Assignments) -> bool {
        self.variables
            .iter()
            .zip(self.values.iter())
            .all(|(variable, &value)| {
                variable.is_fixed(assignments) || !variable.contains(assignments, value)
            })
    }
}

impl VariableObserver for SetIntsView {
    fn name(&self) -> &str {
        "SetIntsView"
    }

    fn notify(
        &mut self,
        assignments: &mut Assignments,
        local_id: LocalId,
        _events: EnumSet<IntDomainEvent>,
    ) {
        let index = local_id.unpack() as usize;
        let variable = self.variables[index];
        let value = self.values[index];
        let element = self.element(index);

        self.monitors[index].freeze(assignments);

        if variable.is_fixed(assignments) && variable.lower_bound(assignments) == value {
            self.add_to_kernel(assignments, element);
        } else if self.monitors[index]
            .removed_values(assignments, EnumSet::all())
            .any(|removed| removed == value)
        {
            self.remove_from_envelope(assignments, element);
        }

        self.monitors[index].unfreeze();

        rewind_assert_extreme!(
            self.debug_caches_agree(assignments, index),
            "The caches of the set view disagree with {variable}"
        );
    }
}
