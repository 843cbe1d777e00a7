mod domain_id;
mod integer_variable;

pub use domain_id::*;
pub use integer_variable::*;
