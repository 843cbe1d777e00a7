use std::fmt::Display;

use enumset::EnumSet;

use super::IntegerVariable;
use crate::basic_types::EmptyDomain;
use crate::containers::StorageKey;
use crate::engine::Assignments;
use crate::engine::IntDomainEvent;
use crate::engine::Watchers;

/// A structure which represents the most basic [`IntegerVariable`]; it is simply the id which
/// links to a domain (hence the name).
#[derive(Clone, PartialEq, Eq, Copy, Hash, Debug, PartialOrd, Ord)]
pub struct DomainId {
    id: u32,
}

impl DomainId {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl IntegerVariable for DomainId {
    fn lower_bound(&self, assignments: &Assignments) -> i32 {
        assignments.lower_bound(*self)
    }

    fn upper_bound(&self, assignments: &Assignments) -> i32 {
        assignments.upper_bound(*self)
    }

    fn contains(&self, assignments: &Assignments, value: i32) -> bool {
        assignments.contains(*self, value)
    }

    fn iterate_domain<'a>(&self, assignments: &'a Assignments) -> impl Iterator<Item = i32> + 'a {
        assignments.iterate_domain(*self)
    }

    fn remove(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain> {
        assignments.remove_value(*self, value)
    }

    fn set_lower_bound(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain> {
        assignments.tighten_lower_bound(*self, value)
    }

    fn set_upper_bound(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain> {
        assignments.tighten_upper_bound(*self, value)
    }

    fn assign(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain> {
        assignments.make_assignment(*self, value)
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<IntDomainEvent>) {
        watchers.watch_all(*self, events);
    }
}

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId { id: index as u32 }
    }
}

impl Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
