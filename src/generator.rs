//! Initial hypothesis universe for an unseen hand.

use crate::debug_log;
use crate::hand::Hand;
use crate::tile::{DECK_SIZE, FiveSlot, TileId};

/// Lexicographic k-subsets of the deck, yielded as hands.
pub struct Combinations {
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(k: usize) -> Self {
        Self {
            indices: (0..k).collect(),
            done: k > DECK_SIZE,
        }
    }
}

impl Iterator for Combinations {
    type Item = Hand;

    fn next(&mut self) -> Option<Hand> {
        if self.done {
            return None;
        }
        let hand = Hand::from_ids(
            self.indices
                .iter()
                .filter_map(|&i| TileId::new(i as u8)),
        );

        // Advance the right-most index that still has room.
        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] < DECK_SIZE - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }
        Some(hand)
    }
}

/// Every hand of `hand_size` tiles disjoint from `excluded`.
///
/// When `excluded` holds no 5 tile, the two 5 slots are interchangeable for
/// anyone else, so a hand holding exactly one 5 is only kept in its slot-A
/// form.
pub fn generate_universe(excluded: Hand, hand_size: usize) -> Vec<Hand> {
    let collapse = excluded.five_count() == 0;
    let slot_b = FiveSlot::B.id();
    let universe: Vec<Hand> = Combinations::new(hand_size)
        .filter(|hand| hand.is_disjoint(excluded))
        .filter(|hand| !(collapse && hand.five_count() == 1 && hand.contains(slot_b)))
        .collect();
    debug_log!(
        "generate_universe: {} hands of {} tiles (collapsed fives: {})",
        universe.len(),
        hand_size,
        collapse
    );
    universe
}
