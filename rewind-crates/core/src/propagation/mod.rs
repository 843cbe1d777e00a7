//! Contains the main building blocks for propagators.
//!
//! A propagator is created by a [`PropagatorConstructor`], which registers the variables of the
//! propagator together with the [`DomainEvents`] that should wake it up. After every change to
//! the domains the [`State`](crate::State) notifies the affected propagators through
//! [`Propagator::notify`], enqueues them by [`Priority`], and runs them until no propagator
//! changes a domain anymore (a fixed point) or one of them reports an
//! [`Inconsistency`](crate::Inconsistency).
//!
//! After every successful run, the state asks the propagator whether it is entailed
//! ([`Propagator::is_entailed`]). An entailed propagator is marked passive and is not run again
//! until the search backtracks past the point where it became entailed.
//!
//! Propagators never explain their inferences eagerly. When asked, [`Propagator::explain`]
//! records the [`Rule`]s that justify an inference into an [`ExplanationContext`].
mod constructor;
mod contexts;
mod explanation;
mod local_id;
mod propagator;
mod propagator_id;
mod store;

pub use constructor::*;
pub use contexts::*;
pub use explanation::*;
pub use local_id::*;
pub use propagator::*;
pub use propagator_id::PropagatorId;
pub(crate) use propagator_id::PropagatorVarId;
pub(crate) use store::PropagatorStore;
pub use store::PropagatorHandle;

pub use crate::basic_types::Entailment;
pub use crate::basic_types::PropagationStatusCP;
pub use crate::engine::DomainEvents;
pub use crate::engine::IntDomainEvent;
