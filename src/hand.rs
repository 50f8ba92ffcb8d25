use std::cmp::Ordering;
use std::fmt;

use crate::tile::{FiveSlot, TileId};

/// Position labels used at the table, left to right.
pub const POSITION_LABELS: [char; 5] = ['a', 'b', 'c', 'd', 'e'];

/// A set of tile ids, kept as a bit mask over the 20-tile deck.
///
/// Iteration is always in ascending id order, which is also the order the
/// tiles sit on the table, so position `a` is the first id yielded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand(u32);

impl Hand {
    pub const EMPTY: Hand = Hand(0);

    pub fn from_ids<I: IntoIterator<Item = TileId>>(ids: I) -> Self {
        ids.into_iter().fold(Self::EMPTY, Self::with)
    }

    #[must_use]
    pub fn with(self, id: TileId) -> Self {
        Self(self.0 | 1 << id.index())
    }

    #[must_use]
    pub fn without(self, id: TileId) -> Self {
        Self(self.0 & !(1 << id.index()))
    }

    #[must_use]
    pub fn union(self, other: Hand) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub fn intersection(self, other: Hand) -> Self {
        Self(self.0 & other.0)
    }

    pub fn contains(self, id: TileId) -> bool {
        self.0 & (1 << id.index()) != 0
    }

    pub fn is_disjoint(self, other: Hand) -> bool {
        self.0 & other.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn ids(self) -> impl Iterator<Item = TileId> {
        TileId::all().filter(move |id| self.contains(*id))
    }

    pub fn to_vec(self) -> Vec<TileId> {
        self.ids().collect()
    }

    pub fn ranks(self) -> Vec<u8> {
        self.ids().map(TileId::rank).collect()
    }

    pub fn five_count(self) -> usize {
        FiveSlot::BOTH
            .iter()
            .filter(|slot| self.contains(slot.id()))
            .count()
    }

    /// Same hand with every rank-5 id removed.
    #[must_use]
    pub fn without_fives(self) -> Self {
        FiveSlot::BOTH
            .iter()
            .fold(self, |hand, slot| hand.without(slot.id()))
    }

    /// A hand holding a single 5 in slot B, rewritten to hold it in slot A.
    #[must_use]
    pub fn with_five_in_slot_a(self) -> Self {
        let (a, b) = (FiveSlot::A.id(), FiveSlot::B.id());
        if self.contains(b) && !self.contains(a) {
            self.without(b).with(a)
        } else {
            self
        }
    }
}

impl Ord for Hand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ids().cmp(other.ids())
    }
}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tiles: Vec<String> = self.ids().map(|id| id.to_string()).collect();
        write!(f, "{}", tiles.join(" "))
    }
}

impl fmt::Debug for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hand[{self}]")
    }
}

/// A set of table positions (`a`..`e`), as a bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Slots(u8);

impl Slots {
    pub const NONE: Slots = Slots(0);

    pub fn single(position: usize) -> Self {
        Self(1 << position)
    }

    /// Contiguous positions `start..end`.
    pub fn run(start: usize, end: usize) -> Self {
        (start..end).fold(Self::NONE, |slots, p| slots.with(p))
    }

    #[must_use]
    pub fn with(self, position: usize) -> Self {
        Self(self.0 | 1 << position)
    }

    pub fn contains(self, position: usize) -> bool {
        self.0 & (1 << position) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn first(self) -> Option<usize> {
        (!self.is_empty()).then(|| self.0.trailing_zeros() as usize)
    }

    pub fn last(self) -> Option<usize> {
        (!self.is_empty()).then(|| 7 - self.0.leading_zeros() as usize)
    }

    /// True when the positions form a single unbroken run.
    pub fn is_run(self) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last - first + 1 == self.len(),
            _ => false,
        }
    }

    /// Parse position letters such as `bc`. `-` or an empty string is no
    /// position. Letters beyond the hand size are rejected.
    pub fn parse(input: &str, hand_size: usize) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input == "-" {
            return Some(Self::NONE);
        }
        let mut slots = Self::NONE;
        for c in input.chars() {
            let position = POSITION_LABELS[..hand_size]
                .iter()
                .position(|&label| label == c.to_ascii_lowercase())?;
            if slots.contains(position) {
                return None;
            }
            slots = slots.with(position);
        }
        Some(slots)
    }
}

impl fmt::Display for Slots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let labels: String = POSITION_LABELS
            .iter()
            .enumerate()
            .filter(|(p, _)| self.contains(*p))
            .map(|(_, label)| *label)
            .collect();
        write!(f, "{labels}")
    }
}

impl fmt::Debug for Slots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slots({self})")
    }
}
