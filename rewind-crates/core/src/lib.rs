//! # Rewind
//! Rewind is the reversible core of a constraint solver. It provides the pieces a search engine
//! needs to explore a tree of decisions and undo them cheaply:
//! - A chunked trail organised in worlds, with reversible integer cells and bitsets
//!   ([`trailed`]).
//! - Integer variables whose domain changes are logged per search node, and read incrementally
//!   through delta monitors ([`monitoring`]).
//! - A propagation loop that wakes propagators on domain events, runs them by priority until a
//!   fixed point, and lets them explain their inferences ([`propagation`]).
//! - A knapsack bound propagator ([`propagators`]), a set view over an integer array ([`views`])
//!   and an incremental tracker of the values taken by a group of variables ([`trackers`]).
//!
//! All of these live in a [`State`]:
//! ```
//! use rewind_core::propagators::Knapsack;
//! use rewind_core::State;
//!
//! let mut state = State::default();
//! let items = [0, 1, 2].map(|_| state.new_interval_variable(0, 1));
//! let capacity = state.new_interval_variable(0, 5);
//! let power = state.new_interval_variable(0, 100);
//!
//! let _ = state.add_propagator(Knapsack::new(
//!     items,
//!     capacity,
//!     power,
//!     vec![2, 3, 4],
//!     vec![3, 4, 5],
//! ));
//! state.propagate_to_fixed_point().expect("the knapsack is satisfiable");
//!
//! assert_eq!(state.upper_bound(power), 7);
//! ```
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub(crate) mod math;
pub mod propagation;
pub mod propagators;
pub(crate) mod rewind_asserts;
pub mod trackers;
pub mod views;

pub use crate::basic_types::EmptyDomain;
pub use crate::basic_types::Entailment;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PropagatorConflict;
pub use crate::engine::Assignments;
pub use crate::engine::State;
pub use crate::engine::TrailOptions;

pub mod variables {
    //! Integer variables and the events that their domains raise.
    pub use crate::engine::variables::DomainId;
    pub use crate::engine::variables::IntegerVariable;
    pub use crate::engine::DomainEvents;
    pub use crate::engine::IntDomainEvent;
    pub use crate::engine::Watchers;
}

pub mod trailed {
    //! Reversible state that is restored when a world is popped.
    pub use crate::engine::TrailedBitSet;
    pub use crate::engine::TrailedInteger;
    pub use crate::engine::TrailedValues;
}

pub mod monitoring {
    //! Observers and the delta monitors through which they read which values were removed.
    pub use crate::engine::delta::DeltaMonitor;
    pub use crate::engine::observers::ObserverConstructor;
    pub use crate::engine::observers::ObserverConstructorContext;
    pub use crate::engine::observers::ObserverHandle;
    pub use crate::engine::observers::ObserverId;
    pub use crate::engine::observers::VariableObserver;
}
