#![cfg(test)]

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rewind_core::trackers::ValueUnionTrackerArgs;
use rewind_core::State;

use crate::init_logging;
use crate::random_walk;

#[test]
fn tracker_counts_match_the_domains() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(29);
    let mut state = State::default();
    let variables = [(0, 5), (2, 7), (0, 3), (4, 9), (1, 6)]
        .map(|(lb, ub)| state.new_interval_variable(lb, ub));
    let handle = state.add_observer(ValueUnionTrackerArgs {
        variables: variables.into(),
    });

    random_walk(&mut state, &variables, &mut rng, 400, |state| {
        let tracker = state
            .get_observer(handle)
            .expect("the handle is a value union tracker");
        let assignments = state.assignments();

        let mut union_size = 0;
        for value in 0..=9 {
            let occurrences = variables
                .iter()
                .filter(|&&variable| state.contains(variable, value))
                .count();
            assert_eq!(tracker.occurrences(assignments, value), occurrences);
            union_size += usize::from(occurrences > 0);
        }
        let num_unfixed = variables
            .iter()
            .filter(|&&variable| state.fixed_value(variable).is_none())
            .count();

        assert_eq!(tracker.union_size(assignments), union_size);
        assert_eq!(tracker.num_unfixed(assignments), num_unfixed);
        assert_eq!(
            tracker.is_pigeonhole_violated(assignments),
            union_size < variables.len()
        );
        assert_eq!(
            tracker.value_slack(assignments),
            union_size as i64 - num_unfixed as i64
        );
    });
}
