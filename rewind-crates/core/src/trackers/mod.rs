//! Incremental bookkeeping over groups of variables, maintained by observers.
mod value_union_tracker;

pub use value_union_tracker::*;
