//! The reversible state of a constraint solver.
//!
//! The [`State`] owns the domains of the variables ([`Assignments`]), the reversible cells
//! ([`TrailedValues`]), the propagators and the observers. All reversible state is organised in
//! worlds: [`State::push_world`] opens a new world and [`State::pop_world`] undoes every change
//! made since.
pub(crate) mod assignments;
pub(crate) mod delta;
mod domain_events;
pub(crate) mod event_sink;
pub(crate) mod observers;
mod options;
pub(crate) mod propagator_queue;
mod state;
#[cfg(test)]
pub(crate) mod test_solver;
pub(crate) mod trailed;
pub(crate) mod variables;
pub(crate) mod watch_list;

pub use assignments::Assignments;
pub use domain_events::*;
pub use options::TrailOptions;
pub use state::State;
pub use trailed::TrailedBitSet;
pub use trailed::TrailedInteger;
pub use trailed::TrailedValues;
pub(crate) use watch_list::Subscriber;
pub(crate) use watch_list::WatchList;
pub use watch_list::Watchers;
