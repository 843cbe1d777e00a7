//! Randomised scenarios that interleave domain changes with pushing and popping worlds, and
//! compare the incremental state against a recomputation from the domains.
mod delta_tests;
mod trail_tests;
mod tracker_tests;
mod view_tests;

use rand::rngs::SmallRng;
use rand::Rng;
use rewind_core::variables::DomainId;
use rewind_core::State;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Apply a random domain change to one of `variables`. Changes that would empty a domain are
/// rejected by the state and leave it untouched.
pub(crate) fn random_change(state: &mut State, variables: &[DomainId], rng: &mut SmallRng) {
    let variable = variables[rng.gen_range(0..variables.len())];
    let lower_bound = state.lower_bound(variable);
    let upper_bound = state.upper_bound(variable);
    let value = rng.gen_range(lower_bound..=upper_bound);

    let _ = match rng.gen_range(0..4) {
        0 => state.remove(variable, value),
        1 => state.set_lower_bound(variable, value),
        2 => state.set_upper_bound(variable, value),
        _ => state.assign(variable, value),
    };
}

/// Run `steps` random steps: each step either pushes a world and changes some domains, or pops
/// back to an earlier world. After every step `check` is called.
pub(crate) fn random_walk(
    state: &mut State,
    variables: &[DomainId],
    rng: &mut SmallRng,
    steps: usize,
    mut check: impl FnMut(&mut State),
) {
    for _ in 0..steps {
        if state.current_world() > 0 && rng.gen_bool(0.3) {
            let target = rng.gen_range(0..state.current_world());
            state.restore_to(target);
        } else {
            state.push_world();
            for _ in 0..rng.gen_range(1..=3) {
                random_change(state, variables, rng);
            }
            state
                .propagate_to_fixed_point()
                .expect("there are no propagators that can fail");
        }

        check(state);
    }
}
