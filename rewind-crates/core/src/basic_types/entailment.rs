/// Whether a constraint is decided by the current domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entailment {
    /// The constraint holds for every remaining combination of values.
    True,
    /// No remaining combination of values satisfies the constraint.
    False,
    Undefined,
}
