use log::warn;

/// Sizing of the trail that backs all reversible state of a [`State`](crate::State).
///
/// None of these values limit the search; they only determine how much is allocated up front and
/// how quickly the trail grows when more worlds are needed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct TrailOptions {
    /// The number of worlds for which a slot is reserved up front.
    #[cfg_attr(feature = "clap", arg(long = "trail-worlds", default_value_t = 16))]
    pub initial_world_capacity: usize,
    /// The initial number of undo records reserved per world.
    #[cfg_attr(feature = "clap", arg(long = "trail-world-size", default_value_t = 64))]
    pub initial_world_size: usize,
    /// The factor by which the number of world slots grows when the last one is entered.
    #[cfg_attr(feature = "clap", arg(long = "trail-load-factor", default_value_t = 1.5))]
    pub load_factor: f64,
}

impl Default for TrailOptions {
    fn default() -> Self {
        TrailOptions {
            initial_world_capacity: 16,
            initial_world_size: 64,
            load_factor: 1.5,
        }
    }
}

impl TrailOptions {
    /// Replace values with which the trail cannot operate by their defaults.
    pub(crate) fn sanitised(self) -> TrailOptions {
        let defaults = TrailOptions::default();
        let mut options = self;

        if options.load_factor.is_nan() || options.load_factor <= 1.0 {
            warn!(
                "Trail load factor {} does not grow the trail, using {} instead",
                options.load_factor, defaults.load_factor
            );
            options.load_factor = defaults.load_factor;
        }

        if options.initial_world_capacity < 2 {
            warn!(
                "Trail needs room for at least two worlds, reserving {} instead of {}",
                defaults.initial_world_capacity, options.initial_world_capacity
            );
            options.initial_world_capacity = defaults.initial_world_capacity;
        }

        options
    }
}
