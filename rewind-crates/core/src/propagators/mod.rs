//! Propagators that are built on top of the [`propagation`](crate::propagation) building blocks.
mod knapsack;

pub use knapsack::*;
