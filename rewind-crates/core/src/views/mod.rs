//! Views present a group of integer variables as a variable of another kind.
//!
//! A view is a [`VariableObserver`](crate::monitoring::VariableObserver): it holds no domain of
//! its own, but caches its bounds in reversible sets which it updates whenever one of the
//! underlying variables changes. Operations on the view are translated into operations on the
//! underlying variables.
mod set_ints_view;
mod set_variable;

pub use set_ints_view::*;
pub use set_variable::*;
