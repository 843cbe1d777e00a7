use super::LocalId;
use super::PropagatorId;
use crate::containers::HashSet;

/// A declarative justification of a propagation, in terms of the variables of the propagator.
///
/// Rules name which part of which domain an inference depends on; reconstructing a proof from
/// them is up to the consumer of the [`RuleStore`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Rule {
    /// The propagator itself was active.
    PropagatorActivation { propagator: PropagatorId },
    LowerBound {
        propagator: PropagatorId,
        variable: LocalId,
    },
    UpperBound {
        propagator: PropagatorId,
        variable: LocalId,
    },
    /// Both bounds of the variable.
    Bounds {
        propagator: PropagatorId,
        variable: LocalId,
    },
    /// The entire domain of the variable, holes included.
    Domain {
        propagator: PropagatorId,
        variable: LocalId,
    },
}

/// An ordered collection of [`Rule`]s without duplicates.
#[derive(Clone, Debug, Default)]
pub struct RuleStore {
    rules: Vec<Rule>,
    present: HashSet<Rule>,
}

impl RuleStore {
    /// Add a rule. Returns whether the rule was not yet present.
    pub fn add(&mut self, rule: Rule) -> bool {
        if !self.present.insert(rule) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    pub fn contains(&self, rule: &Rule) -> bool {
        self.present.contains(rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
        self.present.clear();
    }
}

/// The context through which a propagator adds the rules that explain one of its propagations.
#[derive(Debug)]
pub struct ExplanationContext<'a> {
    rules: &'a mut RuleStore,
    propagator: PropagatorId,
    num_variables: u32,
}

impl<'a> ExplanationContext<'a> {
    pub(crate) fn new(rules: &'a mut RuleStore, propagator: PropagatorId, num_variables: u32) -> Self {
        ExplanationContext {
            rules,
            propagator,
            num_variables,
        }
    }

    pub fn add_propagator_activation_rule(&mut self) -> bool {
        self.rules.add(Rule::PropagatorActivation {
            propagator: self.propagator,
        })
    }

    pub fn add_lower_bound_rule(&mut self, variable: LocalId) -> bool {
        self.rules.add(Rule::LowerBound {
            propagator: self.propagator,
            variable,
        })
    }

    pub fn add_upper_bound_rule(&mut self, variable: LocalId) -> bool {
        self.rules.add(Rule::UpperBound {
            propagator: self.propagator,
            variable,
        })
    }

    pub fn add_bounds_rule(&mut self, variable: LocalId) -> bool {
        self.rules.add(Rule::Bounds {
            propagator: self.propagator,
            variable,
        })
    }

    pub fn add_domain_rule(&mut self, variable: LocalId) -> bool {
        self.rules.add(Rule::Domain {
            propagator: self.propagator,
            variable,
        })
    }

    /// The activation of the propagator and the full domain of every variable it registered.
    pub fn add_default_rules(&mut self) -> bool {
        let mut added = self.add_propagator_activation_rule();
        for variable in 0..self.num_variables {
            added |= self.add_domain_rule(LocalId::from(variable));
        }
        added
    }
}
