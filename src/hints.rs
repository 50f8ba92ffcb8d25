//! Hint registry.
//!
//! Every hint card of the game is a [`Hint`]: a short code, the question
//! printed on the card, and the [`Query`] that answers it for a hand. The
//! engine only ever calls [`Hint::evaluate`] and compares the resulting
//! [`Answer`]s, so the registry is plain data.

use std::fmt;

use crate::hand::{Hand, Slots};
use crate::tile::{Color, TileId};

/// Shape of an answer. Fixed per hint code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerKind {
    Number,
    Flag,
    Positions,
    Groups,
}

impl AnswerKind {
    /// Input example shown next to the question.
    pub fn example(self) -> &'static str {
        match self {
            Self::Number => "(e.g.: 12)",
            Self::Flag => "(y/n)",
            Self::Positions => "(e.g.: bc) [leave empty if no tiles]",
            Self::Groups => "(e.g.: ab de) [leave empty if none]",
        }
    }
}

impl fmt::Display for AnswerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "number",
            Self::Flag => "yes/no",
            Self::Positions => "positions",
            Self::Groups => "position groups",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Answer {
    Number(u8),
    Flag(bool),
    /// Where the tiles of one number sit.
    Positions(Slots),
    /// Runs of neighbouring tiles, left to right.
    Groups(Vec<Slots>),
}

impl Answer {
    pub fn kind(&self) -> AnswerKind {
        match self {
            Self::Number(_) => AnswerKind::Number,
            Self::Flag(_) => AnswerKind::Flag,
            Self::Positions(_) => AnswerKind::Positions,
            Self::Groups(_) => AnswerKind::Groups,
        }
    }
}

/// Single-token rendering, accepted back by [`Hint::parse_answer`].
impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(true) => write!(f, "y"),
            Self::Flag(false) => write!(f, "n"),
            Self::Positions(slots) => write!(f, "{slots}"),
            Self::Groups(groups) if groups.is_empty() => write!(f, "-"),
            Self::Groups(groups) => {
                let runs: Vec<String> = groups.iter().map(Slots::to_string).collect();
                write!(f, "{}", runs.join(","))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    SumAll,
    SumColor(Color),
    SumLeft(usize),
    SumRight(usize),
    /// Every tile except the two ends.
    SumCentral,
    CountEven,
    CountOdd,
    CountColor(Color),
    /// Tiles sharing their number with another tile.
    CountPaired,
    RankPositions(u8),
    SameColorGroups,
    ConsecutiveGroups,
    Spread,
    /// Is the C tile strictly greater than the threshold?
    CTileAbove(u8),
}

impl Query {
    pub fn kind(self) -> AnswerKind {
        match self {
            Self::RankPositions(_) => AnswerKind::Positions,
            Self::SameColorGroups | Self::ConsecutiveGroups => AnswerKind::Groups,
            Self::CTileAbove(_) => AnswerKind::Flag,
            _ => AnswerKind::Number,
        }
    }

    pub fn evaluate(self, hand: Hand) -> Answer {
        let ids = hand.to_vec();
        let ranks = hand.ranks();
        let sum = |ranks: &[u8]| ranks.iter().sum::<u8>();

        match self {
            Self::SumAll => Answer::Number(sum(&ranks)),
            Self::SumColor(color) => Answer::Number(
                ids.iter()
                    .filter(|id| id.color() == color)
                    .map(|id| id.rank())
                    .sum(),
            ),
            Self::SumLeft(n) => Answer::Number(sum(&ranks[..n.min(ranks.len())])),
            Self::SumRight(n) => Answer::Number(sum(&ranks[ranks.len().saturating_sub(n)..])),
            Self::SumCentral if ranks.len() > 2 => Answer::Number(sum(&ranks[1..ranks.len() - 1])),
            Self::SumCentral => Answer::Number(0),
            Self::CountEven => Answer::Number(count_where(&ids, |id| id.rank() % 2 == 0)),
            Self::CountOdd => Answer::Number(count_where(&ids, |id| id.rank() % 2 == 1)),
            Self::CountColor(color) => Answer::Number(count_where(&ids, |id| id.color() == color)),
            Self::CountPaired => Answer::Number(count_where(&ids, |id| {
                ranks.iter().filter(|&&r| r == id.rank()).count() > 1
            })),
            Self::RankPositions(rank) => Answer::Positions(
                ranks
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| **r == rank)
                    .fold(Slots::NONE, |slots, (p, _)| slots.with(p)),
            ),
            Self::SameColorGroups => {
                Answer::Groups(neighbour_groups(&ids, |l, r| l.color() == r.color()))
            }
            Self::ConsecutiveGroups => {
                Answer::Groups(neighbour_groups(&ids, |l, r| r.rank() == l.rank() + 1))
            }
            Self::Spread => Answer::Number(match (ranks.first(), ranks.last()) {
                (Some(low), Some(high)) => high - low,
                _ => 0,
            }),
            Self::CTileAbove(threshold) => {
                Answer::Flag(ranks.get(2).is_some_and(|&rank| rank > threshold))
            }
        }
    }
}

fn count_where(ids: &[TileId], keep: impl Fn(TileId) -> bool) -> u8 {
    ids.iter().filter(|id| keep(**id)).count() as u8
}

/// Maximal runs of at least two neighbours where every adjacent pair is linked.
fn neighbour_groups(ids: &[TileId], linked: impl Fn(TileId, TileId) -> bool) -> Vec<Slots> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=ids.len() {
        if i == ids.len() || !linked(ids[i - 1], ids[i]) {
            if i - start >= 2 {
                groups.push(Slots::run(start, i));
            }
            start = i;
        }
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub code: &'static str,
    pub description: &'static str,
    pub query: Query,
}

impl Hint {
    pub fn kind(&self) -> AnswerKind {
        self.query.kind()
    }

    pub fn evaluate(&self, hand: Hand) -> Answer {
        self.query.evaluate(hand)
    }

    /// Validate raw answer input for this hint, for hands of `hand_size` tiles.
    pub fn parse_answer(&self, input: &str, hand_size: usize) -> Option<Answer> {
        let input = input.trim();
        match self.kind() {
            AnswerKind::Number => input.parse().ok().map(Answer::Number),
            AnswerKind::Flag => match input.to_lowercase().as_str() {
                "y" | "yes" => Some(Answer::Flag(true)),
                "n" | "no" => Some(Answer::Flag(false)),
                _ => None,
            },
            AnswerKind::Positions => {
                let slots = Slots::parse(input, hand_size)?;
                (slots.is_empty() || (slots.is_run() && slots.len() <= 2))
                    .then_some(Answer::Positions(slots))
            }
            AnswerKind::Groups => parse_groups(input, hand_size).map(Answer::Groups),
        }
    }
}

fn parse_groups(input: &str, hand_size: usize) -> Option<Vec<Slots>> {
    if input == "-" {
        return Some(Vec::new());
    }
    let mut groups: Vec<Slots> = Vec::new();
    for token in input.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
        let run = Slots::parse(token, hand_size)?;
        if !run.is_run() || run.len() < 2 {
            return None;
        }
        if let Some(previous) = groups.last()
            && run.first() <= previous.last()
        {
            return None;
        }
        groups.push(run);
    }
    Some(groups)
}

static CATALOG: [Hint; 25] = [
    Hint { code: "st", description: "What is the sum of your tiles?", query: Query::SumAll },
    Hint { code: "sb", description: "What is the sum of your black numbers?", query: Query::SumColor(Color::Black) },
    Hint { code: "sw", description: "What is the sum of your white numbers?", query: Query::SumColor(Color::White) },
    Hint { code: "sl", description: "What is the sum of your 3 left-most tiles?", query: Query::SumLeft(3) },
    Hint { code: "sr", description: "What is the sum of your 3 right-most tiles?", query: Query::SumRight(3) },
    Hint { code: "sc", description: "What is the sum of your central tiles?", query: Query::SumCentral },
    Hint { code: "te", description: "How many even tiles do you have?", query: Query::CountEven },
    Hint { code: "to", description: "How many odd tiles do you have?", query: Query::CountOdd },
    Hint { code: "tb", description: "How many of your tiles have a black number?", query: Query::CountColor(Color::Black) },
    Hint { code: "tw", description: "How many of your tiles have a white number?", query: Query::CountColor(Color::White) },
    Hint { code: "ts", description: "How many of your tiles have the same number?", query: Query::CountPaired },
    Hint { code: "0", description: "Where are your #0 tiles?", query: Query::RankPositions(0) },
    Hint { code: "1", description: "Where are your #1 tiles?", query: Query::RankPositions(1) },
    Hint { code: "2", description: "Where are your #2 tiles?", query: Query::RankPositions(2) },
    Hint { code: "3", description: "Where are your #3 tiles?", query: Query::RankPositions(3) },
    Hint { code: "4", description: "Where are your #4 tiles?", query: Query::RankPositions(4) },
    Hint { code: "5", description: "Where are your #5 tiles?", query: Query::RankPositions(5) },
    Hint { code: "6", description: "Where are your #6 tiles?", query: Query::RankPositions(6) },
    Hint { code: "7", description: "Where are your #7 tiles?", query: Query::RankPositions(7) },
    Hint { code: "8", description: "Where are your #8 tiles?", query: Query::RankPositions(8) },
    Hint { code: "9", description: "Where are your #9 tiles?", query: Query::RankPositions(9) },
    Hint { code: "nc", description: "Which neighboring tiles have the same color?", query: Query::SameColorGroups },
    Hint { code: "nn", description: "Which neighboring tiles have consecutive numbers?", query: Query::ConsecutiveGroups },
    Hint { code: "d", description: "What is the difference between your highest and lowest number?", query: Query::Spread },
    Hint { code: "c", description: "Is your C tile greater than 4?", query: Query::CTileAbove(4) },
];

/// Every hint card, in menu order.
pub fn catalog() -> &'static [Hint] {
    &CATALOG
}

pub fn find_hint(code: &str) -> Option<&'static Hint> {
    let code = code.trim().to_lowercase();
    CATALOG.iter().find(|hint| hint.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::test_hand;

    fn hand(tokens: &[&str]) -> Hand {
        test_hand(tokens)
    }

    fn ask(code: &str, tokens: &[&str]) -> Answer {
        find_hint(code).unwrap().evaluate(hand(tokens))
    }

    #[test]
    fn test_catalog_codes_are_unique() {
        let mut codes: Vec<&str> = catalog().iter().map(|h| h.code).collect();
        assert_eq!(codes.len(), 25);
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 25);
    }

    #[test]
    fn test_every_hint_answers_with_its_kind() {
        let h = hand(&["0b", "3w", "5", "6b", "9b"]);
        for hint in catalog() {
            assert_eq!(hint.evaluate(h).kind(), hint.kind(), "hint {}", hint.code);
        }
    }

    #[test]
    fn test_sum_hints() {
        let tiles = ["1b", "2w", "5", "7b", "9w"];
        assert_eq!(ask("st", &tiles), Answer::Number(24));
        assert_eq!(ask("sb", &tiles), Answer::Number(8));
        assert_eq!(ask("sw", &tiles), Answer::Number(11));
        assert_eq!(ask("sl", &tiles), Answer::Number(8));
        assert_eq!(ask("sr", &tiles), Answer::Number(21));
        assert_eq!(ask("sc", &tiles), Answer::Number(14));
        assert_eq!(ask("sc", &["1b", "2w", "7b", "9w"]), Answer::Number(9));
    }

    #[test]
    fn test_count_hints() {
        let tiles = ["0b", "0w", "5", "6w", "8b"];
        assert_eq!(ask("te", &tiles), Answer::Number(4));
        assert_eq!(ask("to", &tiles), Answer::Number(1));
        assert_eq!(ask("tb", &tiles), Answer::Number(2));
        assert_eq!(ask("tw", &tiles), Answer::Number(2));
        assert_eq!(ask("ts", &tiles), Answer::Number(2));
        assert_eq!(ask("ts", &["0b", "0w", "5", "5", "8b"]), Answer::Number(4));
        assert_eq!(ask("d", &tiles), Answer::Number(8));
    }

    #[test]
    fn test_rank_position_hint() {
        let tiles = ["1b", "3b", "3w", "5", "9w"];
        assert_eq!(ask("3", &tiles), Answer::Positions(Slots::run(1, 3)));
        assert_eq!(ask("5", &tiles), Answer::Positions(Slots::single(3)));
        assert_eq!(ask("4", &tiles), Answer::Positions(Slots::NONE));
    }

    #[test]
    fn test_neighbour_hints() {
        // 1b 2b | 4w 6w | 5g sits between 4 and 6.
        let tiles = ["1b", "2b", "4w", "5", "6w"];
        assert_eq!(ask("nc", &tiles), Answer::Groups(vec![Slots::run(0, 2)]));
        assert_eq!(ask("nn", &tiles), Answer::Groups(vec![Slots::run(0, 2), Slots::run(2, 5)]));

        let mono = ["0w", "2w", "4w", "7w", "9w"];
        assert_eq!(ask("nc", &mono), Answer::Groups(vec![Slots::run(0, 5)]));
        assert_eq!(ask("nn", &mono), Answer::Groups(Vec::new()));
    }

    #[test]
    fn test_c_tile_hint() {
        assert_eq!(ask("c", &["0b", "1b", "5", "6b", "7b"]), Answer::Flag(true));
        assert_eq!(ask("c", &["0b", "1b", "4b", "6b", "7b"]), Answer::Flag(false));
    }

    #[test]
    fn test_parse_answer_validation() {
        let st = find_hint("st").unwrap();
        assert_eq!(st.parse_answer(" 17 ", 5), Some(Answer::Number(17)));
        assert_eq!(st.parse_answer("x", 5), None);

        let c = find_hint("C").unwrap();
        assert_eq!(c.parse_answer("Y", 5), Some(Answer::Flag(true)));
        assert_eq!(c.parse_answer("maybe", 5), None);

        let three = find_hint("3").unwrap();
        assert_eq!(three.parse_answer("bc", 5), Some(Answer::Positions(Slots::run(1, 3))));
        assert_eq!(three.parse_answer("", 5), Some(Answer::Positions(Slots::NONE)));
        assert_eq!(three.parse_answer("ac", 5), None);
        assert_eq!(three.parse_answer("abc", 5), None);
        assert_eq!(three.parse_answer("e", 4), None);

        let nc = find_hint("nc").unwrap();
        assert_eq!(
            nc.parse_answer("ab de", 5),
            Some(Answer::Groups(vec![Slots::run(0, 2), Slots::run(3, 5)]))
        );
        assert_eq!(
            nc.parse_answer("ab,cd", 5),
            Some(Answer::Groups(vec![Slots::run(0, 2), Slots::run(2, 4)]))
        );
        assert_eq!(nc.parse_answer("", 5), Some(Answer::Groups(Vec::new())));
        assert_eq!(nc.parse_answer("abc bc", 5), None);
        assert_eq!(nc.parse_answer("a", 5), None);
        assert_eq!(nc.parse_answer("ac", 5), None);
    }

    #[test]
    fn test_answer_display_is_accepted_back() {
        let h = hand(&["1b", "2b", "4w", "5", "6w"]);
        for hint in catalog() {
            let answer = hint.evaluate(h);
            assert_eq!(hint.parse_answer(&answer.to_string(), 5), Some(answer), "hint {}", hint.code);
        }
    }
}
