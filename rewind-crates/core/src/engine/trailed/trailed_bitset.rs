use super::TrailedInteger;
use super::TrailedValues;
use crate::rewind_asserts::rewind_assert_simple;

const WORD_SIZE: usize = 64;

/// A set of integers from a fixed range `[min, max]` whose membership is reversible.
///
/// The set stores 64 elements per [`TrailedInteger`] word, plus one cell for its cardinality.
/// Since every word is a trailed cell, the set rolls back together with all other trailed state.
#[derive(Debug, Clone)]
pub struct TrailedBitSet {
    min: i32,
    capacity: usize,
    words: Box<[TrailedInteger]>,
    size: TrailedInteger,
}

impl TrailedBitSet {
    /// Create a set over `[min, max]`, which contains every element of the range if `full`, or
    /// is empty otherwise. If `max < min` the range is empty.
    pub fn new(values: &mut TrailedValues, min: i32, max: i32, full: bool) -> TrailedBitSet {
        let capacity = if max < min {
            0
        } else {
            (i64::from(max) - i64::from(min) + 1) as usize
        };

        let num_words = capacity.div_ceil(WORD_SIZE);
        let words = (0..num_words)
            .map(|word_index| {
                let initial = if !full {
                    0_u64
                } else if word_index + 1 < num_words || capacity % WORD_SIZE == 0 {
                    u64::MAX
                } else {
                    (1_u64 << (capacity % WORD_SIZE)) - 1
                };
                values.grow(initial as i64)
            })
            .collect();

        let size = values.grow(if full { capacity as i64 } else { 0 });

        TrailedBitSet {
            min,
            capacity,
            words,
            size,
        }
    }

    fn position(&self, element: i32) -> Option<(usize, u64)> {
        if element < self.min {
            return None;
        }
        let position = (i64::from(element) - i64::from(self.min)) as usize;
        (position < self.capacity).then(|| (position / WORD_SIZE, 1_u64 << (position % WORD_SIZE)))
    }

    pub fn contains(&self, values: &TrailedValues, element: i32) -> bool {
        self.position(element)
            .is_some_and(|(word, mask)| values.read(self.words[word]) as u64 & mask != 0)
    }

    /// Add `element` to the set. Returns whether the set changed.
    ///
    /// The element has to be inside the range the set was created with.
    pub fn insert(&self, values: &mut TrailedValues, element: i32) -> bool {
        let position = self.position(element);
        rewind_assert_simple!(
            position.is_some(),
            "{element} is outside the range of the set"
        );
        let Some((word, mask)) = position else {
            return false;
        };

        let bits = values.read(self.words[word]) as u64;
        if bits & mask != 0 {
            return false;
        }

        values.assign(self.words[word], (bits | mask) as i64);
        values.add_assign(self.size, 1);
        true
    }

    /// Remove `element` from the set. Returns whether the set changed.
    pub fn remove(&self, values: &mut TrailedValues, element: i32) -> bool {
        let Some((word, mask)) = self.position(element) else {
            return false;
        };

        let bits = values.read(self.words[word]) as u64;
        if bits & mask == 0 {
            return false;
        }

        values.assign(self.words[word], (bits & !mask) as i64);
        values.add_assign(self.size, -1);
        true
    }

    pub fn len(&self, values: &TrailedValues) -> usize {
        values.read(self.size) as usize
    }

    pub fn is_empty(&self, values: &TrailedValues) -> bool {
        self.len(values) == 0
    }

    /// The elements of the set in increasing order.
    pub fn iter<'a>(&'a self, values: &'a TrailedValues) -> impl Iterator<Item = i32> + 'a {
        self.words
            .iter()
            .enumerate()
            .flat_map(move |(word_index, &word)| {
                let mut bits = values.read(word) as u64;
                std::iter::from_fn(move || {
                    if bits == 0 {
                        return None;
                    }
                    let bit = bits.trailing_zeros() as usize;
                    bits &= bits - 1;
                    Some(self.min + (word_index * WORD_SIZE + bit) as i32)
                })
            })
    }
}
