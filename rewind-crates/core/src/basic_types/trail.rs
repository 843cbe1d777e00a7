use std::iter::Rev;
use std::vec::Drain;

use crate::rewind_asserts::rewind_assert_eq_simple;
use crate::rewind_asserts::rewind_assert_simple;

/// An undo log which keeps the entries of every world in a separate store.
///
/// Stores are indexed by world. When a world is popped its store is drained but kept, so that
/// the next push of the same world index reuses the allocation. The array of stores grows by
/// `load_factor` whenever the last slot is entered.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    worlds: Vec<Option<Vec<T>>>,
    current_world: usize,
    /// Initial capacity of a newly allocated world store.
    world_size: usize,
    load_factor: f64,
}

impl<T> Trail<T> {
    pub(crate) fn new(initial_world_capacity: usize, world_size: usize, load_factor: f64) -> Self {
        rewind_assert_simple!(
            load_factor > 1.0,
            "The trail must grow when it runs out of worlds, got load factor {load_factor}."
        );

        let mut worlds = Vec::with_capacity(initial_world_capacity.max(2));
        worlds.resize_with(initial_world_capacity.max(2), || None);
        worlds[0] = Some(Vec::with_capacity(world_size));

        Trail {
            worlds,
            current_world: 0,
            world_size,
            load_factor,
        }
    }

    pub(crate) fn current_world(&self) -> usize {
        self.current_world
    }

    /// The number of world slots currently allocated.
    #[cfg(test)]
    pub(crate) fn world_capacity(&self) -> usize {
        self.worlds.len()
    }

    pub(crate) fn num_entries_in_current_world(&self) -> usize {
        self.worlds[self.current_world].as_ref().map_or(0, Vec::len)
    }

    /// Make `world_index` the current world. Its store is allocated if this index was never
    /// entered before, and cleared otherwise.
    pub(crate) fn push_world(&mut self, world_index: usize) {
        rewind_assert_eq_simple!(
            world_index,
            self.current_world + 1,
            "Worlds have to be pushed one level at a time."
        );

        let world_size = self.world_size;
        self.worlds[world_index]
            .get_or_insert_with(|| Vec::with_capacity(world_size))
            .clear();
        self.current_world = world_index;

        if world_index == self.worlds.len() - 1 {
            let grown = (self.worlds.len() as f64 * self.load_factor).ceil() as usize;
            let new_len = grown.max(self.worlds.len() + 1);
            self.worlds.resize_with(new_len, || None);
        }
    }

    /// Append an entry to the store of the current world.
    pub(crate) fn record(&mut self, entry: T) {
        self.worlds[self.current_world]
            .as_mut()
            .expect("the current world always has a store")
            .push(entry);
    }

    /// Leave the current world. The entries recorded in it are returned last-to-first, which is
    /// the order in which they have to be undone.
    pub(crate) fn pop_world(&mut self) -> Rev<Drain<'_, T>> {
        rewind_assert_simple!(self.current_world > 0, "Cannot pop the root world.");

        let world_index = self.current_world;
        self.current_world -= 1;

        self.worlds[world_index]
            .as_mut()
            .expect("a pushed world always has a store")
            .drain(..)
            .rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popping_returns_entries_of_the_current_world_in_reverse() {
        let mut trail = Trail::new(4, 8, 1.5);
        trail.record(0);

        trail.push_world(1);
        trail.record(1);
        trail.record(2);

        let undone = trail.pop_world().collect::<Vec<_>>();

        assert_eq!(undone, vec![2, 1]);
        assert_eq!(trail.current_world(), 0);
        assert_eq!(trail.num_entries_in_current_world(), 1);
    }

    #[test]
    fn reentered_world_starts_with_an_empty_store() {
        let mut trail = Trail::new(4, 8, 1.5);

        trail.push_world(1);
        trail.record(10);
        trail.push_world(2);
        trail.record(20);
        let _ = trail.pop_world();
        let _ = trail.pop_world();

        trail.push_world(1);
        assert_eq!(trail.num_entries_in_current_world(), 0);
        trail.push_world(2);
        assert_eq!(trail.num_entries_in_current_world(), 0);
    }

    #[test]
    fn entering_the_last_slot_grows_the_worlds() {
        let mut trail: Trail<u32> = Trail::new(2, 1, 1.5);
        assert_eq!(trail.world_capacity(), 2);

        trail.push_world(1);
        assert_eq!(trail.world_capacity(), 3);

        trail.push_world(2);
        assert!(trail.world_capacity() > 3);

        for world in 3..100 {
            trail.push_world(world);
            trail.record(world as u32);
        }
        assert_eq!(trail.current_world(), 99);
        assert!(trail.world_capacity() > 99);
    }

    #[test]
    #[should_panic]
    fn popping_the_root_world_panics() {
        let mut trail: Trail<u32> = Trail::new(2, 1, 1.5);
        let _ = trail.pop_world();
    }
}
