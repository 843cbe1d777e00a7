mod delta_monitor;
mod domain_delta;

pub use delta_monitor::*;
pub(crate) use domain_delta::*;
