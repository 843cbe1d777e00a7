#![cfg(test)]

use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use rewind_core::State;
use rewind_core::TrailOptions;

use crate::init_logging;

#[test]
fn cells_are_restored_to_the_value_of_their_world() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(3);
    let mut state = State::new(TrailOptions {
        initial_world_capacity: 2,
        initial_world_size: 1,
        load_factor: 1.5,
    });
    let cells = (0..10)
        .map(|initial| state.new_trailed_integer(initial))
        .collect::<Vec<_>>();

    // The expected values of the cells in every world on the current path.
    let mut history = vec![(0..10).collect::<Vec<i64>>()];

    for _ in 0..500 {
        if state.current_world() > 0 && rng.gen_bool(0.4) {
            let target = rng.gen_range(0..state.current_world());
            state.restore_to(target);
            history.truncate(target + 1);
        } else {
            state.push_world();
            let mut values = history.last().expect("the root is never popped").clone();
            for _ in 0..rng.gen_range(0..20) {
                let index = rng.gen_range(0..cells.len());
                let value = rng.gen_range(-100..100);
                state.assign_trailed(cells[index], value);
                values[index] = value;
            }
            history.push(values);
        }

        let expected = history.last().expect("the root is never popped");
        for (cell, &value) in cells.iter().zip(expected) {
            assert_eq!(state.read_trailed(*cell), value);
        }
        assert_eq!(state.current_world() + 1, history.len());
    }
}

#[test]
fn domains_are_restored_to_the_value_of_their_world() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(11);
    let mut state = State::default();
    let variables = (0..5)
        .map(|_| state.new_interval_variable(-5, 5))
        .collect::<Vec<_>>();

    let snapshot = |state: &State| {
        variables
            .iter()
            .map(|&variable| {
                (-5..=5)
                    .filter(|&value| state.contains(variable, value))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
    };
    let mut history = vec![snapshot(&state)];

    for _ in 0..300 {
        if state.current_world() > 0 && rng.gen_bool(0.4) {
            let target = rng.gen_range(0..state.current_world());
            state.restore_to(target);
            history.truncate(target + 1);
            assert_eq!(&snapshot(&state), history.last().expect("root exists"));
        } else {
            state.push_world();
            crate::random_change(&mut state, &variables, &mut rng);
            state
                .propagate_to_fixed_point()
                .expect("there are no propagators that can fail");
            history.push(snapshot(&state));
        }

        for &variable in variables.iter() {
            let domain = (-5..=5)
                .filter(|&value| state.contains(variable, value))
                .collect::<Vec<_>>();
            assert_eq!(state.lower_bound(variable), domain[0]);
            assert_eq!(state.upper_bound(variable), domain[domain.len() - 1]);
        }
    }
}
