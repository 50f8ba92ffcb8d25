//! Tile identities and hand encoding.
//!
//! The deck holds twenty tiles: ranks 0-4 and 6-9 in black and white, plus
//! two identical green 5 tiles. Every tile maps to a [`TileId`] in `0..20`
//! whose ascending order matches the left-to-right order tiles are laid out
//! in during play (ascending rank, black before white).

use std::fmt;

use crate::error::ValidationError;
use crate::hand::Hand;

pub const DECK_SIZE: usize = 20;
pub const FIVE_RANK: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
    Green,
}

impl Color {
    pub fn letter(self) -> char {
        match self {
            Self::Black => 'b',
            Self::White => 'w',
            Self::Green => 'g',
        }
    }
}

/// The two interchangeable green 5 tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiveSlot {
    A,
    B,
}

impl FiveSlot {
    pub const BOTH: [FiveSlot; 2] = [FiveSlot::A, FiveSlot::B];

    pub const fn id(self) -> TileId {
        match self {
            Self::A => TileId(2 * FIVE_RANK),
            Self::B => TileId(2 * FIVE_RANK + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(u8);

impl TileId {
    pub fn new(raw: u8) -> Option<Self> {
        (usize::from(raw) < DECK_SIZE).then_some(Self(raw))
    }

    /// Id of a rank/color pair. Rank 5 resolves to slot A.
    pub fn from_tile(rank: u8, color: Color) -> Option<Self> {
        match (rank, color) {
            (FIVE_RANK, Color::Green) => Some(FiveSlot::A.id()),
            (FIVE_RANK, _) | (_, Color::Green) => None,
            (r, Color::Black) if r < 10 => Some(Self(2 * r)),
            (r, Color::White) if r < 10 => Some(Self(2 * r + 1)),
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = TileId> {
        (0..DECK_SIZE as u8).map(TileId)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn rank(self) -> u8 {
        self.0 / 2
    }

    pub fn color(self) -> Color {
        if self.rank() == FIVE_RANK {
            Color::Green
        } else if self.0 % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn is_five(self) -> bool {
        self.rank() == FIVE_RANK
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.color().letter())
    }
}

/// Parse one tile token (`3b`, `7w`, `5`, `5g`). Case-insensitive.
pub fn parse_tile(token: &str) -> Result<TileId, ValidationError> {
    let normalized = token.trim().to_lowercase();
    let unknown = || ValidationError::UnknownTile(token.trim().to_string());
    let mut chars = normalized.chars();
    let rank = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(unknown)? as u8;
    let color = match (rank, chars.next(), chars.next()) {
        (FIVE_RANK, None | Some('g'), None) => Color::Green,
        (_, Some('b'), None) => Color::Black,
        (_, Some('w'), None) => Color::White,
        _ => return Err(unknown()),
    };
    TileId::from_tile(rank, color).ok_or_else(unknown)
}

/// Number of participants at the table, 2 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCount(u8);

impl PlayerCount {
    pub fn new(players: u8) -> Result<Self, ValidationError> {
        if (2..=4).contains(&players) {
            Ok(Self(players))
        } else {
            Err(ValidationError::InvalidPlayerCount(players))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn hand_size(self) -> usize {
        if self.0 < 4 { 5 } else { 4 }
    }

    /// Agents whose hands are unknown to the querying player.
    pub fn opponents(self) -> usize {
        usize::from(self.0) - 1
    }
}

/// Encode a hand from tile tokens.
///
/// `others` are hands already recorded for other players; a single 5 tile
/// moves to slot B when another hand already holds slot A.
pub fn encode_hand<S: AsRef<str>>(
    tokens: &[S],
    players: PlayerCount,
    others: &[Hand],
) -> Result<Hand, ValidationError> {
    let expected = players.hand_size();
    if tokens.len() != expected {
        return Err(ValidationError::WrongTileCount {
            expected,
            got: tokens.len(),
        });
    }

    let taken = others.iter().fold(Hand::EMPTY, |acc, hand| acc.union(*hand));
    let mut hand = Hand::EMPTY;
    let mut fives = 0;
    for token in tokens {
        let id = parse_tile(token.as_ref())?;
        if id.is_five() {
            fives += 1;
            if fives > 2 {
                return Err(ValidationError::DuplicateTile(id.to_string()));
            }
            continue;
        }
        if hand.contains(id) {
            return Err(ValidationError::DuplicateTile(id.to_string()));
        }
        if taken.contains(id) {
            return Err(ValidationError::TileTaken(id.to_string()));
        }
        hand = hand.with(id);
    }

    let free_fives: Vec<TileId> = FiveSlot::BOTH
        .iter()
        .map(|slot| slot.id())
        .filter(|id| !taken.contains(*id))
        .collect();
    if fives > free_fives.len() {
        return Err(ValidationError::TileTaken(FiveSlot::A.id().to_string()));
    }
    for id in free_fives.into_iter().take(fives) {
        hand = hand.with(id);
    }
    Ok(hand)
}

/// Hand from tile tokens for tests. A second `5` lands in slot B; any other
/// repeated tile panics.
#[cfg(test)]
pub(crate) fn test_hand(tokens: &[&str]) -> Hand {
    tokens.iter().fold(Hand::EMPTY, |hand, token| {
        let mut id = parse_tile(token).unwrap();
        if id.is_five() && hand.contains(id) {
            id = FiveSlot::B.id();
        }
        assert!(!hand.contains(id), "tile {token} given twice");
        hand.with(id)
    })
}
