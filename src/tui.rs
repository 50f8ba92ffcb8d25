//! TUI (Terminal User Interface) module for the Break the Code helper
//!
//! This module provides an interactive terminal interface using Ratatui.
//! Every action is typed as a one-line command (`h st 12 9`, `s st tw`,
//! `c 2`, `k 0b 1w 3b 7w 9b`, `u`, `r 3`, `w`, `q`).
//!
//! # State Machine
//! - `EnteringCommand` → `ViewingHands` (after `c`) → back to `EnteringCommand`

use crate::cli::parse_command;
use crate::hand::{Hand, POSITION_LABELS};
use crate::hints::catalog;
use crate::session::{Agent, AgentView, GameInterface, Overview, Session, UserAction};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const MAX_HANDS_DISPLAY: usize = 200;
const MAX_SIMULATIONS_DISPLAY: usize = 8;
const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

#[derive(Debug)]
enum TuiState {
    EnteringCommand,
    /// A hand list fills the board panel until a key is pressed.
    ViewingHands,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    overview: Option<&'a Overview>,
    hands_title: &'a str,
    hands: &'a [Hand],
    current_input: &'a str,
    state: &'a TuiState,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and session display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    overview: Option<Overview>,
    hands_title: String,
    hands: Vec<Hand>,
    current_input: String,
    state: TuiState,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal backend created");

        Ok(Self {
            terminal,
            overview: None,
            hands_title: String::new(),
            hands: Vec::new(),
            current_input: String::new(),
            state: TuiState::EnteringCommand,
            message: String::new(),
            error_message: String::new(),
            status: "Type a command, ? for the hint list".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            overview: self.overview.as_ref(),
            hands_title: &self.hands_title,
            hands: &self.hands,
            current_input: &self.current_input,
            state: &self.state,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(10),   // Hypothesis sets or hand list
                Constraint::Length(12), // Hints and simulations
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Command input
            ])
            .split(f.area());

        Self::render_title(f, chunks[0], ctx.overview);
        match ctx.state {
            TuiState::EnteringCommand => Self::render_board(f, chunks[1], ctx.overview),
            TuiState::ViewingHands => Self::render_hands(f, chunks[1], ctx.hands_title, ctx.hands),
        }
        Self::render_info(f, chunks[2], ctx.overview, ctx.message, ctx.error_message);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_input(f, chunks[4], ctx.current_input, ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect, overview: Option<&Overview>) {
        let text = match overview {
            Some(o) => format!("BREAK THE CODE HELPER - {} players - your hand: {}", o.players, o.own_hand),
            None => "BREAK THE CODE HELPER".to_string(),
        };
        let title = Paragraph::new(text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, overview: Option<&Overview>) {
        let block = Block::default().title("Possible tiles").borders(Borders::ALL);
        let Some(overview) = overview else {
            f.render_widget(block, area);
            return;
        };

        let mut views: Vec<&AgentView> = overview.opponents.iter().collect();
        if overview.opponents.len() > 1 {
            views.push(&overview.central);
        }

        let mut lines = Vec::new();
        for view in views {
            let style = if view.remaining == 0 { ERROR_STYLE } else { INFO_STYLE };
            lines.push(Line::from(vec![Span::styled(
                format!("{} ({} possible hands)", view.agent, view.remaining),
                style,
            )]));
            for (label, options) in POSITION_LABELS.iter().zip(&view.positions) {
                let tiles: Vec<String> = options.iter().map(ToString::to_string).collect();
                lines.push(Line::from(format!("  {label}: {}", tiles.join(" "))));
            }
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_hands(f: &mut Frame, area: Rect, title: &str, hands: &[Hand]) {
        let mut lines: Vec<Line> = hands
            .iter()
            .take(MAX_HANDS_DISPLAY)
            .map(|hand| Line::from(format!("  {hand}")))
            .collect();
        if hands.len() > MAX_HANDS_DISPLAY {
            lines.push(Line::from(format!(
                "  ... and {} more",
                hands.len() - MAX_HANDS_DISPLAY
            )));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title(title.to_string()).borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_info(
        f: &mut Frame,
        area: Rect,
        overview: Option<&Overview>,
        message: &str,
        error_message: &str,
    ) {
        let mut lines = Vec::new();

        if let Some(overview) = overview {
            if !overview.hints.is_empty() {
                lines.push(Line::from(vec![Span::styled("Hints:", HEADER_STYLE)]));
                for (i, hint) in overview.hints.iter().enumerate() {
                    let num = i + 1;
                    lines.push(Line::from(format!("  {num}. {hint}")));
                }
            }
            if !overview.simulations.is_empty() {
                lines.push(Line::from(vec![Span::styled("Best hints to ask:", HEADER_STYLE)]));
                for (description, sim) in overview.simulations.iter().take(MAX_SIMULATIONS_DISPLAY) {
                    lines.push(Line::from(vec![Span::styled(
                        format!(
                            "  {description} - {:.2}% (stdev {:.2})",
                            sim.mean * 100.0,
                            sim.stdev
                        ),
                        SUCCESS_STYLE,
                    )]));
                }
            }
        }

        if !message.is_empty() {
            lines.push(Line::from(vec![Span::styled(message, MESSAGE_STYLE)]));
        }

        if !error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn render_input(f: &mut Frame, area: Rect, current_input: &str, state: &TuiState) {
        let (title, text) = match state {
            TuiState::EnteringCommand => (
                "h <code> <answer per opponent, groups as ab,de or -> | s [codes] | c <n> | k <tiles> | u | r <n> | w | q",
                format!("> {current_input}_"),
            ),
            TuiState::ViewingHands => ("Hands", "Press any key to go back".to_string()),
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self, session: &Session) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let event = event::read()?;
        debug_log!("handle_input() - Event received: {:?}", event);

        let Event::Key(key) = event else {
            debug_log!("handle_input() - Ignoring non-key event");
            return Ok(None);
        };
        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }
        // Garbage from escape sequences when alt-tabbing
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("handle_input() - Ignoring invalid character: {:?}", c);
            return Ok(None);
        }

        match self.state {
            TuiState::ViewingHands => {
                self.state = TuiState::EnteringCommand;
                Ok(None)
            }
            TuiState::EnteringCommand => Ok(self.handle_command_input(key, session)),
        }
    }

    fn handle_command_input(&mut self, key: KeyEvent, session: &Session) -> Option<UserAction> {
        match key.code {
            KeyCode::Char(c) if !Self::has_modifier_keys(&key) => {
                self.current_input.push(c);
            }
            KeyCode::Backspace => {
                self.current_input.pop();
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.current_input);
                if line.trim() == "?" {
                    self.show_hint_list();
                    return None;
                }
                self.error_message.clear();
                match parse_command(&line, session) {
                    Ok(action) => {
                        info_log!("handle_command_input() - '{}' parsed as {:?}", line, action);
                        return Some(action);
                    }
                    Err(message) => {
                        self.error_message = message;
                        self.current_input = line;
                    }
                }
            }
            KeyCode::Esc => {
                info_log!("handle_command_input() - ESC pressed, returning Exit");
                return Some(UserAction::Exit);
            }
            _ => {
                debug_log!("handle_command_input() - Ignoring key: {:?}", key.code);
            }
        }
        None
    }

    fn show_hint_list(&mut self) {
        let codes: Vec<String> = catalog()
            .iter()
            .map(|hint| format!("{}: {}", hint.code, hint.description))
            .collect();
        self.message = codes.join(" | ");
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(event::KeyModifiers::ALT)
            || key.modifiers.contains(event::KeyModifiers::CONTROL)
    }
}

impl GameInterface for TuiInterface {
    fn display_overview(&mut self, overview: &Overview) {
        self.overview = Some(overview.clone());
        self.draw_or_log();
    }

    fn read_action(&mut self, session: &Session) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            match self.handle_input(session) {
                Ok(Some(action)) => {
                    self.message.clear();
                    self.status = "Ready".to_string();
                    return Some(action);
                }
                Ok(None) => {}
                Err(e) => {
                    info_log!("read_action() - Error handling input: {}", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_hands(&mut self, agent: Agent, hands: &[Hand]) {
        self.hands_title = format!("Possible hands for {agent} ({})", hands.len());
        self.hands = hands.to_vec();
        self.state = TuiState::ViewingHands;
        self.draw_or_log();
    }

    fn display_message(&mut self, message: &str) {
        self.message = message.to_string();
        self.draw_or_log();
    }

    fn display_error(&mut self, message: &str) {
        if self.error_message.is_empty() {
            self.error_message = message.to_string();
        } else {
            self.error_message = format!("{} | {message}", self.error_message);
        }
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
