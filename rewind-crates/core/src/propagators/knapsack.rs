use itertools::Itertools;

use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::IntegerVariable;
use crate::engine::DomainEvents;
use crate::engine::IntDomainEvent;
use crate::math::NumExt;
use crate::propagation::ExplanationContext;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::Priority;
use crate::propagation::ReadDomains;
use crate::rewind_asserts::rewind_assert_simple;

/// The arguments of a knapsack constraint over item counts `x_i`, a `capacity` and a `power`:
/// ```text
/// \sum w_i * x_i <= capacity
/// \sum e_i * x_i = power
/// ```
/// where every weight `w_i` is strictly positive and every energy `e_i` is non-negative.
#[derive(Clone, Debug)]
pub struct Knapsack<Var> {
    items: Box<[Var]>,
    capacity: Var,
    power: Var,
    weights: Box<[i32]>,
    energies: Box<[i32]>,
}

impl<Var: IntegerVariable> Knapsack<Var> {
    pub fn new(
        items: impl Into<Box<[Var]>>,
        capacity: Var,
        power: Var,
        weights: impl Into<Box<[i32]>>,
        energies: impl Into<Box<[i32]>>,
    ) -> Self {
        let items = items.into();
        let weights = weights.into();
        let energies = energies.into();

        rewind_assert_simple!(
            items.len() == weights.len() && items.len() == energies.len(),
            "Expected one weight and one energy per item"
        );
        rewind_assert_simple!(
            weights.iter().all(|&weight| weight > 0),
            "The weights of the items should be strictly positive"
        );
        rewind_assert_simple!(
            energies.iter().all(|&energy| energy >= 0),
            "The energies of the items should be non-negative"
        );

        Knapsack {
            items,
            capacity,
            power,
            weights,
            energies,
        }
    }
}

impl<Var: IntegerVariable + 'static> PropagatorConstructor for Knapsack<Var> {
    type PropagatorImpl = KnapsackPropagator<Var>;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> Self::PropagatorImpl {
        let weights: Box<[i64]> = self.weights.iter().map(|&weight| weight as i64).collect();
        let energies: Box<[i64]> = self.energies.iter().map(|&energy| energy as i64).collect();

        // Most efficient items first; `e_a / w_a > e_b / w_b` is compared as
        // `e_a * w_b > e_b * w_a` to stay in integer arithmetic.
        let order = (0..self.items.len())
            .sorted_by(|&a, &b| {
                (energies[b] * weights[a])
                    .cmp(&(energies[a] * weights[b]))
                    .then(a.cmp(&b))
            })
            .collect();

        let propagator = KnapsackPropagator {
            items: self.items,
            capacity: self.capacity,
            power: self.power,
            weights,
            energies,
            order,
        };

        for (index, item) in propagator.items.iter().enumerate() {
            let local_id = LocalId::from(index as u32);
            context.register(
                item.clone(),
                propagator.propagation_conditions(local_id),
                local_id,
            );
        }
        let capacity_id = propagator.capacity_id();
        context.register(
            propagator.capacity.clone(),
            propagator.propagation_conditions(capacity_id),
            capacity_id,
        );
        let power_id = propagator.power_id();
        context.register(
            propagator.power.clone(),
            propagator.propagation_conditions(power_id),
            power_id,
        );

        propagator
    }
}

/// Bounds filtering for the knapsack constraint.
///
/// The lower bound of the power is the energy of the items that are certainly taken. The upper
/// bound is the optimum of the fractional relaxation: the remaining capacity is greedily filled
/// with the most efficient items, and the first item that does not fit is taken fractionally
/// (rounded up).
///
/// The item counts and the capacity are never filtered.
#[derive(Clone, Debug)]
pub struct KnapsackPropagator<Var> {
    items: Box<[Var]>,
    capacity: Var,
    power: Var,
    weights: Box<[i64]>,
    energies: Box<[i64]>,
    /// The item indices by decreasing efficiency.
    order: Box<[usize]>,
}

/// The part of the load and energy that every solution shares.
struct MandatoryLoad {
    /// The capacity left after taking the lower bound of every item; negative when even those do
    /// not fit.
    remaining: i64,
    min_power: i64,
}

impl<Var: IntegerVariable> KnapsackPropagator<Var> {
    fn capacity_id(&self) -> LocalId {
        LocalId::from(self.items.len() as u32)
    }

    fn power_id(&self) -> LocalId {
        LocalId::from(self.items.len() as u32 + 1)
    }

    fn mandatory_load(&self, context: &impl ReadDomains) -> MandatoryLoad {
        let mut remaining = context.upper_bound(&self.capacity) as i64;
        let mut min_power = 0_i64;

        for (index, item) in self.items.iter().enumerate() {
            let lower_bound = context.lower_bound(item) as i64;
            remaining -= self.weights[index] * lower_bound;
            min_power += self.energies[index] * lower_bound;
        }

        MandatoryLoad {
            remaining,
            min_power,
        }
    }

    /// The largest power that the fractional relaxation allows, assuming `load.remaining >= 0`.
    fn max_power(&self, context: &impl ReadDomains, load: &MandatoryLoad) -> i64 {
        let mut remaining = load.remaining;
        let mut power = load.min_power;

        for &index in self.order.iter() {
            if remaining == 0 {
                break;
            }

            let item = &self.items[index];
            let slack = context.upper_bound(item) as i64 - context.lower_bound(item) as i64;
            let slack_weight = self.weights[index].saturating_mul(slack);

            if slack_weight <= remaining {
                power = power.saturating_add(self.energies[index].saturating_mul(slack));
                remaining -= slack_weight;
            } else {
                power += NumExt::div_ceil(remaining * self.energies[index], self.weights[index]);
                break;
            }
        }

        power
    }
}

impl<Var: IntegerVariable + 'static> Propagator for KnapsackPropagator<Var> {
    fn name(&self) -> &str {
        "Knapsack"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagation_conditions(&self, _local_id: LocalId) -> DomainEvents {
        DomainEvents::BOUNDS_AND_ASSIGN
    }

    fn propagate_from_scratch(&self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let load = self.mandatory_load(&context);

        if load.remaining < 0 {
            return Err(context
                .conflict(
                    self.capacity_id(),
                    format!(
                        "the mandatory items exceed the capacity by {}",
                        -load.remaining
                    ),
                )
                .into());
        }

        context.set_lower_bound(&self.power, load.min_power.saturating_to_i32())?;

        let max_power = self.max_power(&context, &load);
        context.set_upper_bound(&self.power, max_power.saturating_to_i32())?;

        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let load = self.mandatory_load(&context);

        if load.remaining < 0 || load.min_power > context.upper_bound(&self.power) as i64 {
            return Entailment::False;
        }

        if self.max_power(&context, &load) < context.lower_bound(&self.power) as i64 {
            return Entailment::False;
        }

        let all_fixed = self.items.iter().all(|item| context.is_fixed(item))
            && context.is_fixed(&self.power);
        let load_fits = context.upper_bound(&self.capacity) as i64 - load.remaining
            <= context.lower_bound(&self.capacity) as i64;

        if all_fixed && load.min_power == context.lower_bound(&self.power) as i64 && load_fits {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }

    fn explain(
        &self,
        context: &mut ExplanationContext,
        local_id: LocalId,
        event: IntDomainEvent,
        _value: i32,
    ) -> bool {
        if local_id != self.power_id() {
            return context.add_default_rules();
        }

        match event {
            IntDomainEvent::LowerBound => {
                let mut added = context.add_propagator_activation_rule();
                for index in 0..self.items.len() {
                    added |= context.add_lower_bound_rule(LocalId::from(index as u32));
                }
                added
            }
            IntDomainEvent::UpperBound => {
                let mut added = context.add_propagator_activation_rule();
                for index in 0..self.items.len() {
                    added |= context.add_bounds_rule(LocalId::from(index as u32));
                }
                added |= context.add_upper_bound_rule(self.capacity_id());
                added
            }
            _ => context.add_default_rules(),
        }
    }
}
