use clap::Parser;
use crate::hand::{Hand, POSITION_LABELS};
use crate::hints::{Answer, AnswerKind, Hint, catalog, find_hint};
use crate::session::{Agent, GameInterface, Overview, Session, UserAction, encode_guess};
use crate::error::HintError;
use crate::tile::PlayerCount;
use std::io::BufRead;
use std::path::PathBuf;

const MAX_HANDS_DISPLAY: usize = 50;
const END_OF_INPUT: &str = "end of input";

/// Break the Code deduction helper options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of players at the table (2 to 4)
    #[arg(short = 'p', long = "players", default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=4))]
    pub players: u8,

    /// Your own tiles, e.g. `-t 0b 1w 5 7w 9b`
    #[arg(short = 't', long = "tiles", num_args = 1..)]
    pub tiles: Option<Vec<String>>,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,

    /// Continue the game stored in the session file
    #[arg(long)]
    pub resume: bool,

    /// Session file location (defaults to the user data directory)
    #[arg(long = "session-file")]
    pub session_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Read one trimmed line. `None` at end of input.
pub fn read_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

/// Parse a one-line command such as `h st 12 9` or `k 0b 1w 3b 7w 9b`.
///
/// Answers are one token per opponent, so a groups answer joins its groups
/// with commas (`h nc ab,de -`) and `-` stands for no group.
pub fn parse_command(line: &str, session: &Session) -> Result<UserAction, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err("Empty command".to_string());
    };
    let args: Vec<&str> = words.collect();

    match command.to_lowercase().as_str() {
        "h" | "hint" => {
            let (code, tokens) = args
                .split_first()
                .ok_or_else(|| "Usage: h <code> <answer per opponent>".to_string())?;
            let hint = lookup_hint(code)?;
            let opponents = session.board().opponent_count();
            if hint.kind() == AnswerKind::Groups && tokens.len() != opponents {
                return Err(format!(
                    "'{}' needs {opponents} answer(s), one token per opponent: join groups with commas (ab,de), '-' for none",
                    hint.code
                ));
            }
            let answers = tokens
                .iter()
                .map(|token| parse_answer(hint, token, session))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(UserAction::AddHint { hint, answers })
        }
        "s" | "sim" => {
            let hints = if args.is_empty() {
                catalog().iter().collect()
            } else {
                args.iter().map(|code| lookup_hint(code)).collect::<Result<Vec<_>, _>>()?
            };
            Ok(UserAction::Simulate(hints))
        }
        "c" | "hands" => parse_agent(args.first().copied().unwrap_or("0"), session)
            .map(UserAction::ShowHands),
        "k" | "check" => encode_guess(session, &args)
            .map(UserAction::Check)
            .map_err(|e| e.to_string()),
        "u" | "undo" => Ok(UserAction::Undo),
        "r" | "remove" => args
            .first()
            .and_then(|n| n.parse().ok())
            .map(UserAction::RemoveHint)
            .ok_or_else(|| "Usage: r <hint number>".to_string()),
        "w" | "save" => Ok(UserAction::Save),
        "q" | "quit" | "exit" => Ok(UserAction::Exit),
        other => Err(format!("Unknown command '{other}'")),
    }
}

fn lookup_hint(code: &str) -> Result<&'static Hint, String> {
    find_hint(code).ok_or_else(|| HintError::UnknownHint(code.to_string()).to_string())
}

fn parse_answer(hint: &'static Hint, input: &str, session: &Session) -> Result<Answer, String> {
    hint.parse_answer(input, session.board().hand_size()).ok_or_else(|| {
        HintError::InvalidAnswer {
            code: hint.code,
            input: input.to_string(),
        }
        .to_string()
    })
}

/// `0` (or `central`) is the central hand, `1`.. are opponents.
fn parse_agent(input: &str, session: &Session) -> Result<Agent, String> {
    if input.eq_ignore_ascii_case("central") {
        return Ok(Agent::Central);
    }
    match input.parse::<usize>() {
        Ok(0) => Ok(Agent::Central),
        Ok(n) if n <= session.board().opponent_count() => Ok(Agent::Opponent(n - 1)),
        _ => Err(format!(
            "Choose 0 for the central hand or 1 to {} for an opponent",
            session.board().opponent_count()
        )),
    }
}

pub fn display_overview(overview: &Overview) {
    println!("\n=== {} players | your hand: {} ===", overview.players, overview.own_hand);
    for view in std::iter::once(&overview.central).chain(&overview.opponents) {
        if overview.opponents.len() == 1 && view.agent == Agent::Central {
            continue;
        }
        println!("{} ({} possible hands):", view.agent, view.remaining);
        for (label, options) in POSITION_LABELS.iter().zip(&view.positions) {
            let tiles: Vec<String> = options.iter().map(ToString::to_string).collect();
            println!("  {label}: {}", tiles.join(" "));
        }
    }

    if !overview.hints.is_empty() {
        println!("Hints:");
        for (i, line) in overview.hints.iter().enumerate() {
            println!("  {}. {line}", i + 1);
        }
    }

    if !overview.simulations.is_empty() {
        println!("Simulations:");
        for (description, sim) in &overview.simulations {
            println!(
                "  {description} - eliminates {:.2}% (stdev {:.2})",
                sim.mean * 100.0,
                sim.stdev
            );
        }
    }
}

pub fn display_hands(agent: Agent, hands: &[Hand]) {
    println!("Possible hands for {agent} ({}):", hands.len());
    for hand in hands.iter().take(MAX_HANDS_DISPLAY) {
        println!("  {hand}");
    }
    if hands.len() > MAX_HANDS_DISPLAY {
        println!("  ...and {} more", hands.len() - MAX_HANDS_DISPLAY);
    }
}

pub fn display_hint_list() {
    for hint in catalog() {
        println!("  {:>2} - {}", hint.code, hint.description);
    }
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// Ask for the player's own tiles until they are valid.
pub fn read_own_tiles<R: BufRead>(reader: &mut R, players: PlayerCount) -> Option<Session> {
    loop {
        println!(
            "\nEnter your {} tiles (e.g. 0b 1w 5 7w 9b):",
            players.hand_size()
        );
        let input = read_line(reader)?;
        let tokens: Vec<&str> = input.split_whitespace().collect();
        match Session::from_tokens(&tokens, players) {
            Ok(session) => return Some(session),
            Err(e) => println!("Invalid hand: {e}"),
        }
    }
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn prompt(&mut self, text: &str) -> Option<String> {
        println!("{text}");
        read_line(&mut self.reader)
    }

    fn read_hint(&mut self, session: &Session) -> Result<UserAction, String> {
        let code = loop {
            let code = self
                .prompt("Hint code (? to list):")
                .ok_or_else(|| END_OF_INPUT.to_string())?;
            if code == "?" {
                display_hint_list();
            } else {
                break code;
            }
        };
        let hint = lookup_hint(&code)?;
        println!("{}", hint.description);

        let mut answers = Vec::with_capacity(session.board().opponent_count());
        for index in 0..session.board().opponent_count() {
            let text = format!("Answer from {} {}:", Agent::Opponent(index), hint.kind().example());
            let input = self.prompt(&text).ok_or_else(|| END_OF_INPUT.to_string())?;
            answers.push(parse_answer(hint, &input, session)?);
        }
        Ok(UserAction::AddHint { hint, answers })
    }

    fn read_menu_action(&mut self, choice: &str, session: &Session) -> Result<UserAction, String> {
        let eof = || END_OF_INPUT.to_string();
        match choice {
            "h" => self.read_hint(session),
            "s" => {
                let codes = self.prompt("Hint codes to simulate (empty for all):").ok_or_else(eof)?;
                parse_command(&format!("s {codes}"), session)
            }
            "c" => {
                let text = format!(
                    "Which hand? 0: central, 1-{}: opponent",
                    session.board().opponent_count()
                );
                let agent = self.prompt(&text).ok_or_else(eof)?;
                parse_command(&format!("c {agent}"), session)
            }
            "k" => {
                let tiles = self.prompt("Your guess for the central hand:").ok_or_else(eof)?;
                parse_command(&format!("k {tiles}"), session)
            }
            "r" => {
                let number = self.prompt("Number of the hint to remove:").ok_or_else(eof)?;
                parse_command(&format!("r {number}"), session)
            }
            _ => parse_command(choice, session),
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_overview(&mut self, overview: &Overview) {
        display_overview(overview);
    }

    fn read_action(&mut self, session: &Session) -> Option<UserAction> {
        println!(
            "\n[h] add hint  [s] simulate  [c] show hands  [k] check guess  [u] undo  [r] remove hint  [w] save  [q] quit"
        );
        let Some(line) = read_line(&mut self.reader) else {
            return Some(UserAction::Exit);
        };
        let choice = line.to_lowercase();
        let result = if choice.contains(char::is_whitespace) {
            parse_command(&choice, session)
        } else {
            self.read_menu_action(&choice, session)
        };
        match result {
            Ok(action) => Some(action),
            Err(message) if message == END_OF_INPUT => Some(UserAction::Exit),
            Err(message) => {
                println!("{message}");
                None
            }
        }
    }

    fn display_hands(&mut self, agent: Agent, hands: &[Hand]) {
        display_hands(agent, hands);
    }

    fn display_message(&mut self, message: &str) {
        println!("{message}");
    }

    fn display_error(&mut self, message: &str) {
        println!("Error: {message}");
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
