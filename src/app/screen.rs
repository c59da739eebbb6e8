//! Application screen state management
//!
//! Two screens: the main menu, where the opponent is picked, and the
//! match itself. `Esc` on a match returns to the menu; on the menu it quits.

use crate::config::GameOptions;
use crate::game::dictionary::WordOracle;
use crate::game::round::GameMode;
use crate::game::Difficulty;
use log::info;
use std::sync::Arc;

use super::state::App;

/// Menu option on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    PlayAi(Difficulty),
    TwoPlayer,
    Quit,
}

impl MenuOption {
    /// Get all menu options in order
    pub fn all() -> &'static [MenuOption] {
        &[
            MenuOption::PlayAi(Difficulty::Easy),
            MenuOption::PlayAi(Difficulty::Medium),
            MenuOption::PlayAi(Difficulty::Hard),
            MenuOption::PlayAi(Difficulty::Superior),
            MenuOption::TwoPlayer,
            MenuOption::Quit,
        ]
    }

    /// Get the display label for this option
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::PlayAi(Difficulty::Easy) => "Play Ghost (Easy)",
            MenuOption::PlayAi(Difficulty::Medium) => "Play Ghost (Medium)",
            MenuOption::PlayAi(Difficulty::Hard) => "Play Ghost (Hard)",
            MenuOption::PlayAi(Difficulty::Superior) => "Play Ghost (Superior)",
            MenuOption::TwoPlayer => "Two Players",
            MenuOption::Quit => "Quit",
        }
    }
}

/// The current application screen
pub enum Screen {
    /// Main menu
    Menu { selected: usize },
    /// A match in progress (or just finished)
    Playing { app: Box<App> },
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    oracle: Arc<WordOracle>,
    options: GameOptions,
    /// Menu entry highlighted when returning to the menu
    default_selection: usize,
}

impl AppCoordinator {
    /// Start at the menu with `difficulty` highlighted.
    pub fn new(oracle: Arc<WordOracle>, options: GameOptions, difficulty: Difficulty) -> Self {
        let default_selection = MenuOption::all()
            .iter()
            .position(|opt| *opt == MenuOption::PlayAi(difficulty))
            .unwrap_or(0);

        Self {
            screen: Screen::Menu {
                selected: default_selection,
            },
            should_quit: false,
            oracle,
            options,
            default_selection,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Go back to the main menu
    pub fn go_to_menu(&mut self) {
        self.screen = Screen::Menu {
            selected: self.default_selection,
        };
    }

    /// Esc: leave a match, or quit from the menu
    pub fn back(&mut self) {
        match self.screen {
            Screen::Menu { .. } => self.quit(),
            Screen::Playing { .. } => self.go_to_menu(),
        }
    }

    /// Handle menu navigation (up)
    pub fn menu_up(&mut self) {
        if let Screen::Menu { selected } = &mut self.screen {
            if *selected > 0 {
                *selected -= 1;
            }
        }
    }

    /// Handle menu navigation (down)
    pub fn menu_down(&mut self) {
        if let Screen::Menu { selected } = &mut self.screen {
            if *selected < MenuOption::all().len() - 1 {
                *selected += 1;
            }
        }
    }

    /// Handle menu selection (Enter)
    pub fn menu_select(&mut self) {
        let Screen::Menu { selected } = self.screen else {
            return;
        };

        let mode = match MenuOption::all()[selected] {
            MenuOption::PlayAi(difficulty) => GameMode::VsAi(difficulty),
            MenuOption::TwoPlayer => GameMode::LocalTwoPlayer,
            MenuOption::Quit => {
                self.should_quit = true;
                return;
            }
        };

        info!("starting {:?} match", mode);
        self.default_selection = selected;
        let app = App::new(Arc::clone(&self.oracle), mode, self.options);
        self.screen = Screen::Playing { app: Box::new(app) };
    }

    /// The match in progress, if any
    pub fn app_mut(&mut self) -> Option<&mut App> {
        match &mut self.screen {
            Screen::Playing { app } => Some(app.as_mut()),
            Screen::Menu { .. } => None,
        }
    }

    /// Clock tick
    pub fn tick(&mut self) {
        if let Some(app) = self.app_mut() {
            app.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator(difficulty: Difficulty) -> AppCoordinator {
        let options = GameOptions {
            seed: Some(1),
            ..GameOptions::default()
        };
        AppCoordinator::new(WordOracle::embedded(), options, difficulty)
    }

    #[test]
    fn test_menu_starts_on_configured_difficulty() {
        let coord = coordinator(Difficulty::Hard);
        match coord.screen {
            Screen::Menu { selected } => {
                assert_eq!(MenuOption::all()[selected], MenuOption::PlayAi(Difficulty::Hard))
            }
            Screen::Playing { .. } => panic!("expected menu"),
        }
    }

    #[test]
    fn test_menu_navigation_clamps() {
        let mut coord = coordinator(Difficulty::Easy);
        coord.menu_up();
        assert!(matches!(coord.screen, Screen::Menu { selected: 0 }));
        for _ in 0..20 {
            coord.menu_down();
        }
        let last = MenuOption::all().len() - 1;
        assert!(matches!(coord.screen, Screen::Menu { selected } if selected == last));
    }

    #[test]
    fn test_select_starts_match_and_back_returns() {
        let mut coord = coordinator(Difficulty::Medium);
        coord.menu_select();
        let app = coord.app_mut().expect("match should start");
        assert_eq!(app.difficulty(), Some(Difficulty::Medium));

        coord.back();
        assert!(matches!(coord.screen, Screen::Menu { .. }));
        assert!(!coord.should_quit);
        coord.back();
        assert!(coord.should_quit);
    }

    #[test]
    fn test_two_player_has_no_ai() {
        let mut coord = coordinator(Difficulty::Easy);
        for _ in 0..4 {
            coord.menu_down();
        }
        coord.menu_select();
        let app = coord.app_mut().expect("match should start");
        assert_eq!(app.difficulty(), None);
        assert!(app.is_human_turn());
    }

    #[test]
    fn test_quit_option() {
        let mut coord = coordinator(Difficulty::Easy);
        for _ in 0..5 {
            coord.menu_down();
        }
        coord.menu_select();
        assert!(coord.should_quit);
    }

    #[test]
    fn test_labels_unique() {
        let labels: std::collections::HashSet<&str> =
            MenuOption::all().iter().map(|o| o.label()).collect();
        assert_eq!(labels.len(), MenuOption::all().len());
    }
}
