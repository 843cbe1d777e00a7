use log::trace;

use super::TrailedChange;
use super::TrailedInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::engine::TrailOptions;

/// A cell in the arena: the live value and the world in which it was last written.
#[derive(Debug, Clone, Copy)]
struct TrailedCell {
    value: i64,
    stamp: usize,
}

/// An arena of reversible integer cells.
///
/// A write records the previous value of a cell at most once per world: only the first write
/// after entering a world needs a restore point, later writes in the same world are undone by
/// that same record. Writes at the root world are never recorded since the root is never popped.
#[derive(Debug, Clone)]
pub struct TrailedValues {
    trail: Trail<TrailedChange>,
    cells: KeyedVec<TrailedInteger, TrailedCell>,
}

impl Default for TrailedValues {
    fn default() -> Self {
        TrailedValues::new(TrailOptions::default())
    }
}

impl TrailedValues {
    pub fn new(options: TrailOptions) -> Self {
        let options = options.sanitised();
        TrailedValues {
            trail: Trail::new(
                options.initial_world_capacity,
                options.initial_world_size,
                options.load_factor,
            ),
            cells: KeyedVec::default(),
        }
    }

    /// Create a new cell holding `initial_value`.
    pub fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.cells.push(TrailedCell {
            value: initial_value,
            stamp: 0,
        })
    }

    pub fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.cells[trailed_integer].value
    }

    pub fn read_bool(&self, trailed_integer: TrailedInteger) -> bool {
        self.read(trailed_integer) != 0
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let world = self.trail.current_world();
        let cell = &mut self.cells[trailed_integer];
        if cell.value == value {
            return;
        }

        if cell.stamp != world {
            if world > 0 {
                self.trail.record(TrailedChange {
                    reference: trailed_integer,
                    old_value: cell.value,
                    old_stamp: cell.stamp,
                });
            }
            cell.stamp = world;
        }
        cell.value = value;
    }

    pub fn assign_bool(&mut self, trailed_integer: TrailedInteger, value: bool) {
        self.assign(trailed_integer, i64::from(value));
    }

    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        let value = self.read(trailed_integer) + addition;
        self.assign(trailed_integer, value);
    }

    pub fn current_world(&self) -> usize {
        self.trail.current_world()
    }

    /// The number of undo records made since the current world was entered.
    pub fn num_records_in_current_world(&self) -> usize {
        self.trail.num_entries_in_current_world()
    }

    pub(crate) fn push_world(&mut self) {
        let next = self.trail.current_world() + 1;
        self.trail.push_world(next);
    }

    pub(crate) fn pop_world(&mut self) {
        let mut restored = 0_usize;
        for change in self.trail.pop_world() {
            self.cells[change.reference] = TrailedCell {
                value: change.old_value,
                stamp: change.old_stamp,
            };
            restored += 1;
        }
        trace!("restored {restored} trailed cells");
    }
}
