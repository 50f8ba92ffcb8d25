//! Hint history and its on-disk form.
//!
//! A session file is plain text: the player count, the player's own tiles,
//! then one `hint` line per recorded hint with one answer token per
//! opponent. Loading rebuilds the session by replaying every hint.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HistoryError;
use crate::hints::{Answer, Hint, find_hint};
use crate::session::Session;
use crate::tile::{PlayerCount, encode_hand};
use crate::{debug_log, info_log};

#[derive(Debug, Clone, PartialEq)]
pub struct HintRecord {
    pub hint: &'static Hint,
    /// One answer per opponent, in opponent order.
    pub answers: Vec<Answer>,
    /// Hands each answer removed from its opponent's set when applied.
    pub eliminated: Vec<usize>,
}

impl HintRecord {
    /// One display line: the question, then each answer with its effect.
    pub fn summary(&self) -> String {
        let results: Vec<String> = self
            .answers
            .iter()
            .zip(&self.eliminated)
            .map(|(answer, removed)| format!("{answer} (-{removed} combinations)"))
            .collect();
        format!("{}: {}", self.hint.description, results.join(", "))
    }
}

/// Default session file, under the user's data directory.
pub fn get_session_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("break-the-code-helper").join("session.txt"))
}

pub fn format_session(session: &Session) -> String {
    let mut lines = vec![
        format!(
            "# break-the-code-helper session, saved {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!("players {}", session.players().get()),
        format!("hand {}", session.board().own_hand()),
    ];
    lines.extend(session.history().iter().map(|record| {
        let answers: Vec<String> = record.answers.iter().map(Answer::to_string).collect();
        format!("hint {} {}", record.hint.code, answers.join(" "))
    }));
    lines.join("\n") + "\n"
}

pub fn parse_session(data: &str) -> Result<Session, HistoryError> {
    let mut players = None;
    let mut session: Option<Session> = None;

    for (index, raw) in data.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let keyword = fields.next().unwrap_or_default();
        let rest: Vec<&str> = fields.collect();
        let parse_error = |message: &str| HistoryError::Parse {
            line: line_no,
            message: message.to_string(),
        };

        match keyword {
            "players" => {
                let count: u8 = rest
                    .first()
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| parse_error("expected a player count"))?;
                players = Some(PlayerCount::new(count)?);
            }
            "hand" => {
                let players = players.ok_or_else(|| parse_error("'hand' before 'players'"))?;
                let own = encode_hand(&rest, players, &[])?;
                session = Some(Session::new(own, players));
            }
            "hint" => {
                let session = session
                    .as_mut()
                    .ok_or_else(|| parse_error("'hint' before 'hand'"))?;
                let (code, tokens) = rest
                    .split_first()
                    .ok_or_else(|| parse_error("expected a hint code"))?;
                let hint = find_hint(code)
                    .ok_or_else(|| parse_error(&format!("unknown hint '{code}'")))?;
                let hand_size = session.board().hand_size();
                let answers = tokens
                    .iter()
                    .map(|token| {
                        hint.parse_answer(token, hand_size)
                            .ok_or_else(|| parse_error(&format!("bad answer '{token}' for '{code}'")))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                session.apply_hint(hint, answers)?;
            }
            other => return Err(parse_error(&format!("unknown entry '{other}'"))),
        }
    }

    session.ok_or(HistoryError::Parse {
        line: data.lines().count(),
        message: "no 'hand' entry".to_string(),
    })
}

pub fn write_session(path: &Path, session: &Session) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format_session(session))?;
    info_log!("Saved {} hints to {}", session.history().len(), path.display());
    Ok(())
}

pub fn read_session(path: &Path) -> Result<Session, HistoryError> {
    debug_log!("read_session() - loading {}", path.display());
    let data = fs::read_to_string(path)?;
    parse_session(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: u8) -> PlayerCount {
        PlayerCount::new(n).unwrap()
    }

    #[test]
    fn test_summary_line() {
        let mut session = Session::from_tokens(&["0b", "1w", "3b", "7w", "9b"], players(3)).unwrap();
        let st = find_hint("st").unwrap();
        session
            .apply_hint(st, vec![Answer::Number(20), Answer::Number(25)])
            .unwrap();
        let line = session.history()[0].summary();
        assert!(line.starts_with("What is the sum of your tiles?: 20 (-"));
        assert!(line.contains(", 25 (-"));
    }

    #[test]
    fn test_format_then_parse_replays_history() {
        let mut session = Session::from_tokens(&["0b", "1w", "5", "7w", "9b"], players(3)).unwrap();
        let nc = find_hint("nc").unwrap();
        let two = find_hint("2").unwrap();
        session
            .apply_hint(nc, vec![nc.parse_answer("ab de", 5).unwrap(), nc.parse_answer("", 5).unwrap()])
            .unwrap();
        session
            .apply_hint(two, vec![two.parse_answer("b", 5).unwrap(), two.parse_answer("", 5).unwrap()])
            .unwrap();

        let text = format_session(&session);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("# break-the-code-helper session, saved 20"));
        assert_eq!(lines.next(), Some("players 3"));
        assert!(text.ends_with("hint 2 b -\n"));
        assert!(text.contains("players 3\n"));
        assert!(text.contains("hand 0b 1w 5g 7w 9b\n"));
        assert!(text.contains("hint nc ab,de -\n"));
        assert!(text.contains("hint 2 b -\n"));

        let restored = parse_session(&text).unwrap();
        assert_eq!(restored.history(), session.history());
        assert_eq!(restored.board(), session.board());
    }

    #[test]
    fn test_parse_session_errors() {
        assert!(matches!(
            parse_session("hand 0b 1w 3b 7w 9b\n"),
            Err(HistoryError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_session("players 9\n"),
            Err(HistoryError::Validation(_))
        ));
        assert!(matches!(
            parse_session("players 2\nhand 0b 1w 3b 7w 9b\nhint zz 3\n"),
            Err(HistoryError::Parse { line: 3, .. })
        ));
        assert!(matches!(
            parse_session("players 2\nhand 0b 1w 3b 7w 9b\nhint st 3 4\n"),
            Err(HistoryError::Hint(_))
        ));
        assert!(matches!(parse_session("# nothing\n"), Err(HistoryError::Parse { .. })));
    }

    #[test]
    fn test_write_and_read_session_file() {
        let path = std::env::temp_dir()
            .join("break-the-code-helper-test")
            .join("history_roundtrip.txt");
        let _ = fs::remove_file(&path);

        let mut session = Session::from_tokens(&["0b", "1w", "3b", "7w", "9b"], players(2)).unwrap();
        session
            .apply_hint(find_hint("tw").unwrap(), vec![Answer::Number(2)])
            .unwrap();
        write_session(&path, &session).unwrap();

        let restored = read_session(&path).unwrap();
        assert_eq!(restored.board().central(), session.board().central());

        let _ = fs::remove_file(&path);
    }
}
