use super::LocalId;
use super::PropagatorId;
use crate::basic_types::EmptyDomain;
use crate::basic_types::PropagatorConflict;
use crate::engine::variables::IntegerVariable;
use crate::engine::Assignments;
use crate::engine::TrailedInteger;

pub trait HasAssignments {
    fn assignments(&self) -> &Assignments;
}

/// Read access to the domains of variables.
pub trait ReadDomains: HasAssignments {
    fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.lower_bound(self.assignments())
    }

    fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.upper_bound(self.assignments())
    }

    fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool {
        var.contains(self.assignments(), value)
    }

    fn is_fixed<Var: IntegerVariable>(&self, var: &Var) -> bool {
        var.is_fixed(self.assignments())
    }

    fn read_trailed(&self, trailed_integer: TrailedInteger) -> i64 {
        self.assignments().trailed_values().read(trailed_integer)
    }
}

impl<T: HasAssignments> ReadDomains for T {}

/// Read-only view of the domains, given to propagators when they are not allowed to modify them.
#[derive(Clone, Copy, Debug)]
pub struct PropagationContext<'a> {
    assignments: &'a Assignments,
}

impl<'a> PropagationContext<'a> {
    pub fn new(assignments: &'a Assignments) -> Self {
        PropagationContext { assignments }
    }
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

/// The context through which a propagator modifies domains.
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
    assignments: &'a mut Assignments,
    propagator_id: PropagatorId,
}

impl<'a> PropagationContextMut<'a> {
    pub(crate) fn new(assignments: &'a mut Assignments, propagator_id: PropagatorId) -> Self {
        PropagationContextMut {
            assignments,
            propagator_id,
        }
    }

    pub fn as_readonly(&self) -> PropagationContext<'_> {
        PropagationContext::new(self.assignments)
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    pub fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<(), EmptyDomain> {
        let _ = var.set_lower_bound(self.assignments, bound)?;
        Ok(())
    }

    pub fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<(), EmptyDomain> {
        let _ = var.set_upper_bound(self.assignments, bound)?;
        Ok(())
    }

    pub fn remove<Var: IntegerVariable>(&mut self, var: &Var, value: i32) -> Result<(), EmptyDomain> {
        let _ = var.remove(self.assignments, value)?;
        Ok(())
    }

    pub fn assign<Var: IntegerVariable>(&mut self, var: &Var, value: i32) -> Result<(), EmptyDomain> {
        let _ = var.assign(self.assignments, value)?;
        Ok(())
    }

    pub fn assign_trailed(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.assignments
            .trailed_values_mut()
            .assign(trailed_integer, value);
    }

    /// Describe a conflict of this propagator, attributed to the variable with `variable`.
    pub fn conflict(&self, variable: LocalId, message: impl Into<String>) -> PropagatorConflict {
        PropagatorConflict {
            propagator: self.propagator_id,
            variable,
            message: message.into(),
        }
    }
}

impl HasAssignments for PropagationContextMut<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
