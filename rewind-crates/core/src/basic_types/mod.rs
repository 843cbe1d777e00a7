mod entailment;
mod propagation_status_cp;
mod trail;

pub use entailment::*;
pub use propagation_status_cp::*;
pub(crate) use trail::*;
