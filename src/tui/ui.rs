//! UI rendering using ratatui
//!
//! Supports two screens:
//! - Menu: pick an opponent
//! - Playing: the word, scores, move history and feedback

use crate::app::{App, AppCoordinator, MenuOption, Screen, Tone};
use crate::game::round::{Phase, ROUNDS_TO_WIN};
use crate::game::word_points;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Menu { selected } => render_menu(frame, *selected),
        Screen::Playing { app } => render_game(frame, app),
    }
}

/// Render the main menu
fn render_menu(frame: &mut Frame, selected: usize) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Logo
            Constraint::Length(2), // Tagline
            Constraint::Min(6),    // Menu options
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
  ____ _   _  ___  ____ _____
 / ___| | | |/ _ \/ ___|_   _|
| |  _| |_| | | | \___ \ | |
| |_| |  _  | |_| |___) || |
 \____|_| |_|\___/|____/ |_|
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Magenta).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    let tagline = Paragraph::new("Add a letter. Don't finish the word.")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(tagline, layout[1]);

    let items: Vec<ListItem> = MenuOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, opt.label())).style(style)
        })
        .collect();

    let menu = List::new(items).block(Block::default());
    frame.render_widget(menu, layout[2]);

    let footer = Paragraph::new("↑↓ Navigate  Enter Select  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[3]);
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with word and clock
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Key help
        ])
        .split(area);

    render_header(frame, layout[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(30),    // Play area
            Constraint::Length(24), // Scoreboard
            Constraint::Length(22), // Move history
        ])
        .split(layout[1]);

    render_play_area(frame, columns[0], app);
    render_scoreboard(frame, columns[1], app);
    render_moves(frame, columns[2], app);

    let help = Paragraph::new(key_help(app))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, layout[2]);
}

/// Render the header: logo, round number, turn clock
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10), // Logo
            Constraint::Min(20),    // Round
            Constraint::Length(10), // Clock
        ])
        .split(inner);

    let logo = Paragraph::new("GHOST")
        .style(Style::default().fg(Color::Magenta).bold())
        .alignment(Alignment::Left);
    frame.render_widget(logo, header_layout[0]);

    let round_number = app
        .state()
        .current_round()
        .map(|round| round.round_number)
        .unwrap_or_default();
    let round = Paragraph::new(format!("Round {}  (first to {})", round_number, ROUNDS_TO_WIN))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(round, header_layout[1]);

    if let Some(seconds) = app.time_remaining {
        let color = if seconds <= 5 {
            Color::Red
        } else if seconds <= 10 {
            Color::Yellow
        } else {
            Color::Green
        };
        let timer = Paragraph::new(format_timer(seconds))
            .style(Style::default().fg(color).bold())
            .alignment(Alignment::Right);
        frame.render_widget(timer, header_layout[2]);
    }
}

/// Render the word, whose turn it is, the challenge input and feedback
fn render_play_area(frame: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Word
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Status
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Challenge input
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Feedback
            Constraint::Min(0),
        ])
        .split(area);

    let word = Paragraph::new(format_word(app.current_word()))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(word, layout[0]);

    let status = Paragraph::new(status_line(app))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);
    frame.render_widget(status, layout[2]);

    if app.is_defending() {
        let input = Paragraph::new(format!("> {}_", app.input)).style(Style::default().fg(Color::Yellow));
        frame.render_widget(input, layout[4]);
    }

    let feedback = Paragraph::new(app.feedback.as_str())
        .style(Style::default().fg(tone_color(app.tone)))
        .alignment(Alignment::Center);
    frame.render_widget(feedback, layout[6]);
}

/// Render both players' scores and rounds won
fn render_scoreboard(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.state();
    let winner = state.winner();
    let items: Vec<ListItem> = state
        .players
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let to_move = i == state.turn.index() && !app.is_round_over();
            let marker = if to_move { "▶" } else { " " };
            let style = if winner.is_some_and(|seat| seat.index() == i) {
                Style::default().fg(Color::Yellow).bold()
            } else if to_move {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(
                "{} {} {} pts, {}/{}",
                marker, player.name, player.score, player.rounds_won, ROUNDS_TO_WIN
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Score"),
    );
    frame.render_widget(list, area);
}

/// Render the letters played this round, most recent first
fn render_moves(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .move_history()
        .iter()
        .rev()
        .map(|mv| ListItem::new(format!("{} {}", mv.letter, app.player_name(mv.player))))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Moves"),
    );
    frame.render_widget(list, area);
}

/// Who is to act, or how the round ended
fn status_line(app: &App) -> String {
    let state = app.state();
    let to_move = app.player_name(state.turn);
    match state.phase {
        Phase::Playing if app.is_human_turn() => format!("{} to play", to_move),
        Phase::Playing => format!("{} is thinking...", to_move),
        Phase::Challenge { .. } if app.is_human_turn() => {
            format!("{}: type a word starting with {}", to_move, app.current_word())
        }
        Phase::Challenge { .. } => format!("{} is answering the challenge...", to_move),
        Phase::RoundOver => match app.last_result() {
            Some(result) => format!("Round to {}", app.player_name(result.winner)),
            None => "Round over".to_string(),
        },
        Phase::MatchOver => match state.winner() {
            Some(seat) => format!("{} wins the match!", app.player_name(seat)),
            None => "Match over".to_string(),
        },
    }
}

fn key_help(app: &App) -> &'static str {
    match app.phase() {
        Phase::Playing => "A-Z Play  Tab Call word  ? Challenge  Backspace Letter bomb  Esc Menu",
        Phase::Challenge { .. } => "A-Z Type  Backspace Delete  Enter Submit  Esc Menu",
        Phase::RoundOver => "Enter Next round  Esc Menu",
        Phase::MatchOver => "Esc Menu",
    }
}

/// Format the word with spacing and its current point value
fn format_word(word: &str) -> String {
    if word.is_empty() {
        return String::from("[ ]");
    }

    let spaced = word
        .chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    format!("[ {} ]  {} pts", spaced, word_points(word))
}

/// Format the timer display
fn format_timer(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::White,
        Tone::Good => Color::Green,
        Tone::Bad => Color::Red,
    }
}
