use std::fmt;
use std::path::Path;

use crate::board::Board;
use crate::error::{BoardError, HintError, ValidationError};
use crate::hand::Hand;
use crate::hints::{Answer, Hint};
use crate::history::{HintRecord, write_session};
use crate::scorer::{Simulation, rank_simulations};
use crate::tile::{PlayerCount, TileId, encode_hand};
use crate::{debug_log, info_log};

/// A hand the player is trying to deduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    Central,
    Opponent(usize),
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Central => write!(f, "central"),
            Self::Opponent(index) => write!(f, "opponent #{}", index + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    /// The guess is the only hand left.
    Solved,
    Possible { remaining: usize },
    Impossible,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    pub agent: Agent,
    pub remaining: usize,
    pub positions: Vec<Vec<TileId>>,
}

/// Everything a front end shows between two actions.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub players: u8,
    pub own_hand: Hand,
    pub central: AgentView,
    pub opponents: Vec<AgentView>,
    pub hints: Vec<String>,
    pub simulations: Vec<(&'static str, Simulation)>,
}

/// One game from the player's seat: the board plus everything needed to
/// rebuild it.
#[derive(Debug, Clone)]
pub struct Session {
    players: PlayerCount,
    board: Board,
    history: Vec<HintRecord>,
    simulations: Vec<(&'static Hint, Simulation)>,
}

impl Session {
    pub fn new(own: Hand, players: PlayerCount) -> Self {
        Self {
            players,
            board: Board::new(own, players),
            history: Vec::new(),
            simulations: Vec::new(),
        }
    }

    pub fn from_tokens<S: AsRef<str>>(
        tokens: &[S],
        players: PlayerCount,
    ) -> Result<Self, ValidationError> {
        let own = encode_hand(tokens, players, &[])?;
        Ok(Self::new(own, players))
    }

    pub fn players(&self) -> PlayerCount {
        self.players
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[HintRecord] {
        &self.history
    }

    pub fn simulations(&self) -> &[(&'static Hint, Simulation)] {
        &self.simulations
    }

    pub fn hands(&self, agent: Agent) -> Result<&[Hand], BoardError> {
        match agent {
            Agent::Central => Ok(self.board.central()),
            Agent::Opponent(index) => self.board.opponent(index),
        }
    }

    /// Apply a hint and record it. Cached simulations are dropped.
    pub fn apply_hint(
        &mut self,
        hint: &'static Hint,
        answers: Vec<Answer>,
    ) -> Result<&HintRecord, HintError> {
        let eliminated = apply_counting(&mut self.board, hint, &answers)?;
        info_log!("Hint {} applied, eliminated {:?}", hint.code, eliminated);
        self.simulations.clear();
        self.history.push(HintRecord {
            hint,
            answers,
            eliminated,
        });
        Ok(&self.history[self.history.len() - 1])
    }

    /// Simulate every hint not already simulated, then rank the results.
    pub fn simulate(&mut self, hints: &[&'static Hint]) -> &[(&'static Hint, Simulation)] {
        for &hint in hints {
            if self.simulations.iter().any(|(done, _)| done.code == hint.code) {
                continue;
            }
            let result = self.board.simulate(hint);
            debug_log!(
                "simulate({}) - mean {:.3}, stdev {:.2}",
                hint.code,
                result.mean,
                result.stdev
            );
            self.simulations.push((hint, result));
        }
        rank_simulations(&mut self.simulations);
        &self.simulations
    }

    /// Forget the last hint and rebuild the board from the rest.
    pub fn undo(&mut self) -> Option<HintRecord> {
        let record = self.history.pop()?;
        self.rebuild();
        Some(record)
    }

    /// Forget the hint at `index` (a suspected wrong answer) and rebuild.
    pub fn remove_hint(&mut self, index: usize) -> Option<HintRecord> {
        if index >= self.history.len() {
            return None;
        }
        let record = self.history.remove(index);
        self.rebuild();
        Some(record)
    }

    /// Fresh universe, then every recorded hint replayed in order. A record
    /// that no longer applies is dropped so history matches the board.
    fn rebuild(&mut self) {
        let board = &mut self.board;
        *board = Board::new(board.own_hand(), self.players);
        self.simulations.clear();
        self.history
            .retain_mut(|record| match apply_counting(board, record.hint, &record.answers) {
                Ok(eliminated) => {
                    record.eliminated = eliminated;
                    true
                }
                Err(e) => {
                    info_log!("Dropping hint {} from history: {}", record.hint.code, e);
                    false
                }
            });
        info_log!("Rebuilt board from {} hints", self.history.len());
    }

    /// Sets left with no hand at all: some recorded answer is wrong.
    pub fn contradictions(&self) -> Vec<Agent> {
        let mut empty: Vec<Agent> = self
            .board
            .opponents()
            .enumerate()
            .filter(|(_, set)| set.is_empty())
            .map(|(index, _)| Agent::Opponent(index))
            .collect();
        if self.board.opponent_count() > 1 && self.board.central().is_empty() {
            empty.push(Agent::Central);
        }
        empty
    }

    /// Is `guess` still a possible central hand?
    pub fn check(&self, guess: Hand) -> CheckResult {
        let central = self.board.central();
        if !self.board.central_contains(guess) {
            CheckResult::Impossible
        } else if central.len() == 1 {
            CheckResult::Solved
        } else {
            CheckResult::Possible {
                remaining: central.len(),
            }
        }
    }

    pub fn overview(&self) -> Overview {
        let view = |agent: Agent, hands: &[Hand]| AgentView {
            agent,
            remaining: hands.len(),
            positions: self.board.position_options(hands),
        };
        Overview {
            players: self.players.get(),
            own_hand: self.board.own_hand(),
            central: view(Agent::Central, self.board.central()),
            opponents: self
                .board
                .opponents()
                .enumerate()
                .map(|(index, hands)| view(Agent::Opponent(index), hands))
                .collect(),
            hints: self.history.iter().map(HintRecord::summary).collect(),
            simulations: self
                .simulations
                .iter()
                .map(|(hint, sim)| (hint.description, *sim))
                .collect(),
        }
    }
}

fn apply_counting(
    board: &mut Board,
    hint: &Hint,
    answers: &[Answer],
) -> Result<Vec<usize>, HintError> {
    board.check_answers(hint, answers)?;
    let before: Vec<usize> = board.opponents().map(<[Hand]>::len).collect();
    board.apply_hint(hint, answers)?;
    Ok(board
        .opponents()
        .zip(before)
        .map(|(set, before)| before - set.len())
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    AddHint {
        hint: &'static Hint,
        answers: Vec<Answer>,
    },
    Simulate(Vec<&'static Hint>),
    ShowHands(Agent),
    /// Guess for the central hand.
    Check(Hand),
    Undo,
    /// 1-based, as shown in the hint list.
    RemoveHint(usize),
    Save,
    Exit,
}

pub trait GameInterface {
    fn display_overview(&mut self, overview: &Overview);
    /// `None` means the input was rejected and the turn should be retried.
    fn read_action(&mut self, session: &Session) -> Option<UserAction>;
    fn display_hands(&mut self, agent: Agent, hands: &[Hand]);
    fn display_message(&mut self, message: &str);
    fn display_error(&mut self, message: &str);
    fn display_exit_message(&mut self);
}

/// Drive a session until the interface asks to exit.
pub fn game_loop<I: GameInterface + ?Sized>(
    session: &mut Session,
    interface: &mut I,
    save_path: Option<&Path>,
) {
    loop {
        interface.display_overview(&session.overview());
        let Some(action) = interface.read_action(session) else {
            continue;
        };
        debug_log!("game_loop() - action {:?}", action);

        match action {
            UserAction::AddHint { hint, answers } => match session.apply_hint(hint, answers) {
                Ok(record) => {
                    let message = format!("Recorded: {}", record.summary());
                    interface.display_message(&message);
                    report_contradictions(session, interface);
                }
                Err(e) => interface.display_error(&e.to_string()),
            },
            UserAction::Simulate(hints) => {
                session.simulate(&hints);
            }
            UserAction::ShowHands(agent) => match session.hands(agent) {
                Ok(hands) => interface.display_hands(agent, hands),
                Err(e) => interface.display_error(&e.to_string()),
            },
            UserAction::Check(guess) => {
                let message = match session.check(guess) {
                    CheckResult::Solved => format!("{guess} is the only hand left. You're correct"),
                    CheckResult::Possible { remaining } => {
                        format!("{guess} is still possible ({remaining} hands left)")
                    }
                    CheckResult::Impossible => format!("{guess} is no longer possible"),
                };
                interface.display_message(&message);
            }
            UserAction::Undo => match session.undo() {
                Some(record) => {
                    interface.display_message(&format!("Removed: {}", record.hint.description));
                }
                None => interface.display_error("No hints to undo"),
            },
            UserAction::RemoveHint(number) => {
                match number.checked_sub(1).and_then(|index| session.remove_hint(index)) {
                    Some(record) => {
                        interface.display_message(&format!("Removed: {}", record.hint.description));
                        report_contradictions(session, interface);
                    }
                    None => interface.display_error(&format!("There is no hint #{number}")),
                }
            }
            UserAction::Save => match save_path {
                Some(path) => match write_session(path, session) {
                    Ok(()) => interface.display_message(&format!("Saved to {}", path.display())),
                    Err(e) => interface.display_error(&format!("Could not save: {e}")),
                },
                None => interface.display_error("No session file location available"),
            },
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
        }
    }
}

fn report_contradictions<I: GameInterface + ?Sized>(session: &Session, interface: &mut I) {
    for agent in session.contradictions() {
        interface.display_error(&format!(
            "No hand left for {agent}: an answer must be wrong. Undo or remove the suspect hint."
        ));
    }
}

/// Encode a guessed central hand against the player's own tiles.
pub fn encode_guess<S: AsRef<str>>(session: &Session, tokens: &[S]) -> Result<Hand, ValidationError> {
    encode_hand(tokens, session.players(), &[session.board().own_hand()])
}
