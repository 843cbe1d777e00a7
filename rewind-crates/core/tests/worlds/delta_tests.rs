#![cfg(test)]

use enumset::EnumSet;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use rewind_core::monitoring::DeltaMonitor;
use rewind_core::monitoring::ObserverConstructor;
use rewind_core::monitoring::ObserverConstructorContext;
use rewind_core::monitoring::VariableObserver;
use rewind_core::propagation::LocalId;
use rewind_core::variables::DomainId;
use rewind_core::variables::IntDomainEvent;
use rewind_core::Assignments;
use rewind_core::State;

use crate::init_logging;
use crate::random_change;

/// Collects every value its variables lose, per variable.
#[derive(Debug)]
struct RemovalLog {
    variables: Vec<DomainId>,
}

#[derive(Debug)]
struct RemovalLogObserver {
    monitors: Vec<DeltaMonitor>,
    removed: Vec<Vec<i32>>,
}

impl ObserverConstructor for RemovalLog {
    type ObserverImpl = RemovalLogObserver;

    fn create(self, context: &mut ObserverConstructorContext<'_>) -> Self::ObserverImpl {
        let monitors = self
            .variables
            .iter()
            .enumerate()
            .map(|(index, &variable)| context.register(variable, LocalId::from(index as u32)))
            .collect::<Vec<_>>();
        let removed = vec![Vec::new(); monitors.len()];

        RemovalLogObserver { monitors, removed }
    }
}

impl VariableObserver for RemovalLogObserver {
    fn name(&self) -> &str {
        "RemovalLog"
    }

    fn notify(
        &mut self,
        assignments: &mut Assignments,
        local_id: LocalId,
        _events: EnumSet<IntDomainEvent>,
    ) {
        let index = local_id.unpack() as usize;
        let monitor = &mut self.monitors[index];

        monitor.freeze(assignments);
        monitor.for_each_removed(assignments, EnumSet::all(), |value| {
            self.removed[index].push(value)
        });
        monitor.unfreeze();
    }
}

fn domain(state: &State, variable: DomainId) -> Vec<i32> {
    state.assignments().iterate_domain(variable).collect()
}

#[test]
fn every_removal_is_reported_once_in_the_world_where_it_happens() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(5);
    let mut state = State::default();
    let variables = (0..4)
        .map(|_| state.new_interval_variable(0, 9))
        .collect::<Vec<_>>();
    let handle = state.add_observer(RemovalLog {
        variables: variables.clone(),
    });

    for _ in 0..300 {
        if state.current_world() > 0 && rng.gen_bool(0.35) {
            let target = rng.gen_range(0..state.current_world());
            state.restore_to(target);
            continue;
        }

        let before = variables
            .iter()
            .map(|&variable| domain(&state, variable))
            .collect::<Vec<_>>();

        state.push_world();
        for _ in 0..rng.gen_range(1..=3) {
            random_change(&mut state, &variables, &mut rng);
        }
        state
            .propagate_to_fixed_point()
            .expect("there are no propagators that can fail");

        let checked = state.update_observer(handle, |log, assignments| {
            for (index, &variable) in variables.iter().enumerate() {
                let mut reported = std::mem::take(&mut log.removed[index]);
                reported.sort_unstable();

                let expected = before[index]
                    .iter()
                    .copied()
                    .filter(|&value| !assignments.contains(variable, value))
                    .collect::<Vec<_>>();

                assert_eq!(reported, expected, "removals of {variable} were misreported");
            }
        });
        assert!(checked.is_some(), "the handle is a removal log");
    }
}

#[test]
fn removals_before_registration_are_not_reported() {
    init_logging();
    let mut state = State::default();
    let x = state.new_interval_variable(0, 9);
    let _ = state.remove(x, 4).expect("non-empty domain");
    state
        .propagate_to_fixed_point()
        .expect("there are no propagators that can fail");

    let handle = state.add_observer(RemovalLog { variables: vec![x] });

    let _ = state.remove(x, 5).expect("non-empty domain");
    state
        .propagate_to_fixed_point()
        .expect("there are no propagators that can fail");

    let log = state.get_observer(handle).expect("the handle is a removal log");
    assert_eq!(log.removed[0], vec![5]);
}
