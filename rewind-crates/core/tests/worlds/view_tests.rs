#![cfg(test)]

use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use rewind_core::monitoring::ObserverHandle;
use rewind_core::variables::DomainId;
use rewind_core::views::SetDomainEvent;
use rewind_core::views::SetIntsView;
use rewind_core::views::SetIntsViewArgs;
use rewind_core::views::SetVariable;
use rewind_core::State;

use crate::init_logging;
use crate::random_change;
use crate::random_walk;

const OFFSET: i32 = 3;

fn expected_kernel(state: &State, variables: &[DomainId], values: &[i32]) -> Vec<i32> {
    variables
        .iter()
        .zip(values)
        .enumerate()
        .filter(|&(_, (&variable, &value))| state.fixed_value(variable) == Some(value))
        .map(|(index, _)| index as i32 + OFFSET)
        .collect()
}

fn expected_envelope(state: &State, variables: &[DomainId], values: &[i32]) -> Vec<i32> {
    variables
        .iter()
        .zip(values)
        .enumerate()
        .filter(|&(_, (&variable, &value))| state.contains(variable, value))
        .map(|(index, _)| index as i32 + OFFSET)
        .collect()
}

#[test]
fn view_bounds_follow_the_underlying_domains() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(17);
    let mut state = State::default();
    let variables = (0..6)
        .map(|_| state.new_interval_variable(0, 4))
        .collect::<Vec<_>>();
    let values = (0..6).map(|_| rng.gen_range(0..=4)).collect::<Vec<_>>();
    let handle = state.add_observer(SetIntsViewArgs {
        variables: variables.clone().into(),
        values: values.clone().into(),
        offset: OFFSET,
    });

    random_walk(&mut state, &variables, &mut rng, 400, |state| {
        let view = state.get_observer(handle).expect("the handle is a set view");
        let assignments = state.assignments();

        assert_eq!(
            view.lower_bound(assignments).collect::<Vec<_>>(),
            expected_kernel(state, &variables, &values)
        );
        assert_eq!(
            view.upper_bound(assignments).collect::<Vec<_>>(),
            expected_envelope(state, &variables, &values)
        );
    });
}

fn assert_view_matches(
    state: &State,
    handle: ObserverHandle<SetIntsView>,
    variables: &[DomainId],
    values: &[i32],
) {
    let view = state.get_observer(handle).expect("the handle is a set view");
    let assignments = state.assignments();
    let kernel = expected_kernel(state, variables, values);
    let envelope = expected_envelope(state, variables, values);

    assert_eq!(view.lower_bound(assignments).collect::<Vec<_>>(), kernel);
    assert_eq!(view.upper_bound(assignments).collect::<Vec<_>>(), envelope);
    assert_eq!(view.is_instantiated(assignments), kernel == envelope);
}

#[test]
fn forced_changes_are_visible_through_the_variables() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(23);
    let mut state = State::default();
    let variables = (0..6)
        .map(|_| state.new_interval_variable(0, 2))
        .collect::<Vec<_>>();
    let values = vec![0, 1, 2, 0, 1, 2];
    let handle = state.add_observer(SetIntsViewArgs {
        variables: variables.clone().into(),
        values: values.clone().into(),
        offset: OFFSET,
    });

    for _ in 0..300 {
        if state.current_world() > 0 && rng.gen_bool(0.3) {
            let target = rng.gen_range(0..state.current_world());
            state.restore_to(target);
        } else {
            state.push_world();
            let element = rng.gen_range(OFFSET..OFFSET + 6);
            let include = rng.gen_bool(0.5);
            let (result, last_event) = state
                .update_observer(handle, |view, assignments| {
                    let result = if include {
                        view.force_include(assignments, element)
                    } else {
                        view.force_exclude(assignments, element)
                    };
                    (result, view.drain_events().last())
                })
                .expect("the handle is a set view");

            // A failed operation leaves the domain untouched, so the view stays consistent.
            if result == Ok(true) {
                assert!(matches!(
                    last_event,
                    Some(SetDomainEvent::AddedToKernel(e) | SetDomainEvent::RemovedFromEnvelope(e))
                        if e == element
                ));
            }

            assert_view_matches(&state, handle, &variables, &values);
            state
                .propagate_to_fixed_point()
                .expect("there are no propagators that can fail");
        }

        assert_view_matches(&state, handle, &variables, &values);
    }
}

#[test]
fn instantiations_are_undone_by_backtracking() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(31);
    let mut state = State::default();
    let variables = (0..5)
        .map(|_| state.new_interval_variable(0, 3))
        .collect::<Vec<_>>();
    let values = vec![1, 2, 3, 0, 1];
    let handle = state.add_observer(SetIntsViewArgs {
        variables: variables.clone().into(),
        values: values.clone().into(),
        offset: OFFSET,
    });

    for _ in 0..300 {
        if state.current_world() > 0 && rng.gen_bool(0.4) {
            let target = rng.gen_range(0..state.current_world());
            state.restore_to(target);
        } else if rng.gen_bool(0.5) {
            state.push_world();
            random_change(&mut state, &variables, &mut rng);
        } else {
            state.push_world();
            let target = (OFFSET..OFFSET + 5)
                .filter(|_| rng.gen_bool(0.5))
                .collect::<Vec<_>>();

            let result = state
                .update_observer(handle, |view, assignments| {
                    view.instantiate_to(assignments, &target)
                })
                .expect("the handle is a set view");

            let view = state.get_observer(handle).expect("the handle is a set view");
            let assignments = state.assignments();
            if result.is_ok() {
                assert!(view.is_instantiated(assignments));
                assert_eq!(view.lower_bound(assignments).collect::<Vec<_>>(), target);
                assert_eq!(view.upper_bound(assignments).collect::<Vec<_>>(), target);
                assert_eq!(view.value(assignments), Some(target));
            }
        }

        assert_view_matches(&state, handle, &variables, &values);
        state
            .propagate_to_fixed_point()
            .expect("there are no propagators that can fail");
        assert_view_matches(&state, handle, &variables, &values);
    }
}
