//! Ghost - the word game where nobody wants to finish the word
//!
//! Add a letter. Don't spell anything.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ghost::app::AppCoordinator;
use ghost::config::parse_cli;
use ghost::game::dictionary::WordOracle;
use ghost::logging;
use ghost::tui::{self, Tui};
use log::{info, warn};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn main() -> io::Result<()> {
    let cli = parse_cli();
    logging::init_logging(cli.log_file.as_deref())?;

    let oracle = load_dictionary(cli.words_path.as_deref());
    let mut coordinator = AppCoordinator::new(oracle, cli.game_options(), cli.difficulty);

    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, &coordinator))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut coordinator, key);
                }
            }
        }

        // The AI moves on the tick after the human
        if last_tick.elapsed() >= tick_rate {
            coordinator.tick();
            last_tick = Instant::now();
        }

        if coordinator.should_quit {
            break;
        }
    }

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

/// Dictionary from `--words`, or the built-in list when that is missing or unreadable
fn load_dictionary(path: Option<&Path>) -> Arc<WordOracle> {
    let Some(path) = path else {
        let oracle = WordOracle::embedded();
        info!("using built-in word list ({} words)", oracle.len());
        return oracle;
    };

    let oracle = WordOracle::load_or_unloaded(path);
    if oracle.is_loaded() {
        Arc::new(oracle)
    } else {
        warn!("falling back to the built-in word list");
        WordOracle::embedded()
    }
}

fn handle_key(coordinator: &mut AppCoordinator, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        coordinator.back();
        return;
    }

    if let Some(app) = coordinator.app_mut() {
        match key.code {
            KeyCode::Enter => app.on_submit(),
            KeyCode::Backspace => app.on_backspace(),
            KeyCode::Tab => app.on_call_word(),
            KeyCode::Char('?') => app.on_challenge(),
            KeyCode::Char(c) if c.is_ascii_alphabetic() => app.on_char(c.to_ascii_uppercase()),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Up => coordinator.menu_up(),
        KeyCode::Down => coordinator.menu_down(),
        KeyCode::Enter => coordinator.menu_select(),
        _ => {}
    }
}
