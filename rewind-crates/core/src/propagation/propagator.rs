use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enumset::EnumSet;

use super::ExplanationContext;
use super::LocalId;
use super::PropagationContext;
use super::PropagationContextMut;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatusCP;
use crate::engine::DomainEvents;
use crate::engine::IntDomainEvent;

// We need to use this to cast from `Box<dyn Propagator>` to the concrete propagator behind a
// `PropagatorHandle`.
impl_downcast!(Propagator);

/// A propagator removes values from domains which will never be in any solution, or raises
/// explicit conflicts.
///
/// The required functions are [`Propagator::name`], [`Propagator::propagate_from_scratch`] and
/// [`Propagator::is_entailed`]; all other functions have default implementations.
pub trait Propagator: Downcast {
    /// Return the name of the propagator.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// The events on the variable with `local_id` that should wake this propagator up. A
    /// [`PropagatorConstructor`](super::PropagatorConstructor) usually registers its variables
    /// with these conditions.
    ///
    /// By default the propagator is woken up by every event.
    fn propagation_conditions(&self, _local_id: LocalId) -> DomainEvents {
        DomainEvents::ANY_INT
    }

    /// Performs propagation from scratch, only relying on the current domains.
    ///
    /// Removes values which cannot be part of any solution, and returns an
    /// [`Inconsistency`](crate::Inconsistency) when no solution remains. Calling it again without
    /// any change to the domains in between must not remove anything.
    fn propagate_from_scratch(&self, context: PropagationContextMut) -> PropagationStatusCP;

    /// Performs propagation with access to internal data structures. The `event_mask` contains
    /// every event that woke the propagator since it last ran.
    ///
    /// By default, this function calls [`Propagator::propagate_from_scratch`].
    fn propagate(
        &mut self,
        context: PropagationContextMut,
        _event_mask: EnumSet<IntDomainEvent>,
    ) -> PropagationStatusCP {
        self.propagate_from_scratch(context)
    }

    /// Returns whether the propagator should be enqueued for propagation when `event` happens to
    /// the variable with `local_id`.
    ///
    /// This should only be used for computationally cheap logic. By default the propagator is
    /// always enqueued.
    fn notify(
        &mut self,
        _context: PropagationContext,
        _local_id: LocalId,
        _event: IntDomainEvent,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after backtracking, allowing the propagator to update its internal data structures
    /// given the new variable domains.
    fn synchronise(&mut self, _context: PropagationContext) {}

    /// Returns the [`Priority`] of the propagator, used for determining the order in which
    /// propagators are called.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Whether the constraint is satisfied by every remaining combination of values
    /// ([`Entailment::True`]), by none ([`Entailment::False`]), or neither.
    ///
    /// It may answer [`Entailment::Undefined`] when it cannot cheaply decide, but it must never
    /// answer wrongly. An entailed propagator is not called again until the search backtracks.
    fn is_entailed(&self, context: PropagationContext) -> Entailment;

    /// State which rules justify `event` (with `value`) on the variable with `local_id`, as
    /// propagated by this propagator. Returns whether any rule was added.
    ///
    /// By default the propagation is attributed to the full domains of all variables.
    fn explain(
        &self,
        context: &mut ExplanationContext,
        _local_id: LocalId,
        _event: IntDomainEvent,
        _value: i32,
    ) -> bool {
        context.add_default_rules()
    }
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The priority of a propagator, used for determining the order in which propagators will be
/// called.
///
/// The levels loosely follow the arity of the filtering: unary propagators are `High`, binary
/// ones `Medium`, linear ones `Low` and global constraints `VeryLow`. The order in which
/// propagators run does not influence the fixed point that is reached.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        ((*self) as u8).partial_cmp(&((*other) as u8))
    }
}
